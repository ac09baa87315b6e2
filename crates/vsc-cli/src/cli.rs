//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// vsc-sync - Resolve layered editor configuration into VS Code profiles
#[derive(Parser, Debug)]
#[command(name = "vsc-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configs repository root (overrides `configs_path` from the config file)
    #[arg(long, global = true, env = "VSC_SYNC_CONFIGS")]
    pub configs: Option<PathBuf>,

    /// Tool config file
    #[arg(long, global = true, env = "VSC_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Which layers take part in a resolution.
///
/// The base layer is included whenever the configs root has one.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// App layer, also the alias of the managed editor profile
    #[arg(short, long)]
    pub app: String,

    /// Stack layers, lowest priority first (repeatable)
    #[arg(short, long = "stack")]
    pub stacks: Vec<String>,

    /// Project layer, applied last
    #[arg(short, long)]
    pub project: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the resolved configuration
    ///
    /// Examples:
    ///   vsc-sync resolve --app vscode --stack python
    ///   vsc-sync resolve -a vscode -s python -s web -c settings --json
    Resolve {
        #[command(flatten)]
        selection: Selection,

        /// Only these components (repeatable); each one must be provided by
        /// some layer
        #[arg(short, long = "component")]
        components: Vec<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Compare the resolved configuration with the editor's profile
    ///
    /// Without --app, every app registered in the tool config is checked
    /// against its base and app layers.
    ///
    /// Examples:
    ///   vsc-sync status
    ///   vsc-sync status --app vscode --stack python
    Status {
        /// App layer and profile alias; all registered apps when omitted
        #[arg(short, long)]
        app: Option<String>,

        /// Stack layers, lowest priority first (repeatable)
        #[arg(short, long = "stack", requires = "app")]
        stacks: Vec<String>,

        /// Project layer, applied last
        #[arg(short, long, requires = "app")]
        project: Option<String>,

        /// Profile directory (defaults to the app's `config_path`)
        #[arg(short, long, requires = "app")]
        target: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Write the resolved configuration into the editor's profile
    Apply {
        #[command(flatten)]
        selection: Selection,

        /// Profile directory (defaults to the app's `config_path`)
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Leave tasks.json alone
        #[arg(long)]
        no_tasks: bool,

        /// Overwrite the profile without copying it aside first
        #[arg(long)]
        no_backup: bool,

        /// Name the backup `<target>.<SUFFIX>` instead of `<target>.bak.<unix time>`
        #[arg(long, value_name = "SUFFIX", conflicts_with = "no_backup")]
        backup_suffix: Option<String>,
    },

    /// Sort a settings or keybindings file in place
    Sort {
        #[command(subcommand)]
        target: SortTarget,
    },

    /// List the layers in the configs repository
    Layers {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Files that `sort` understands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SortTarget {
    /// Drop superseded keybindings and sort the rest
    Keybindings {
        file: PathBuf,

        /// Report without writing; fails if the file is not sorted
        #[arg(long)]
        check: bool,
    },

    /// Sort settings keys alphabetically
    Settings {
        file: PathBuf,

        /// Report without writing; fails if the file is not sorted
        #[arg(long)]
        check: bool,
    },
}
