//! vsc-sync CLI
//!
//! Resolves layered editor configuration and writes it into VS Code style
//! profile directories.

mod cli;
mod commands;
mod context;
mod error;

use std::path::Path;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vsc_core::ApplyOptions;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cli.config.as_deref(), cli.configs.as_deref(), cmd),
        None => {
            // No command provided - show help hint
            println!("{} layered editor configuration", "vsc-sync".green().bold());
            println!();
            println!("Run {} for available commands.", "vsc-sync --help".cyan());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let installed = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    if installed.is_err() {
        eprintln!("{}: tracing subscriber already installed", "warning".yellow());
    }
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(config: Option<&Path>, configs: Option<&Path>, cmd: Commands) -> Result<()> {
    let context = || Context::load(config, configs);
    match cmd {
        Commands::Resolve {
            selection,
            components,
            json,
        } => commands::run_resolve(&context()?, &selection, &components, json),
        Commands::Status {
            app: Some(app),
            stacks,
            project,
            target,
            json,
        } => {
            let selection = cli::Selection {
                app,
                stacks,
                project,
            };
            commands::run_status(&context()?, &selection, target.as_deref(), json)
        }
        Commands::Status { app: None, json, .. } => commands::run_status_all(&context()?, json),
        Commands::Apply {
            selection,
            target,
            dry_run,
            no_tasks,
            no_backup,
            backup_suffix,
        } => {
            let options = ApplyOptions {
                dry_run,
                backup: commands::apply::backup_policy(no_backup, backup_suffix),
            };
            commands::run_apply(&context()?, &selection, target.as_deref(), &options, no_tasks)
        }
        Commands::Layers { json } => commands::run_layers(&context()?, json),
        Commands::Sort { target } => commands::run_sort(&target),
    }
}
