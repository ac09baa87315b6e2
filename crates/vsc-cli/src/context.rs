//! Command context: tool config, configs root and layer selection
//!
//! Every command that touches layers goes through [`Context`], which settles
//! where the configs repository is and which profile directory an app
//! alias maps to.

use std::collections::BTreeMap;
use std::path::Path;

use vsc_core::{AppDetails, LayerKind, LayerOrder, LayerReader, SyncConfig};
use vsc_fs::NormalizedPath;

use crate::cli::Selection;
use crate::error::{CliError, Result};

#[derive(Debug, Clone)]
pub struct Context {
    config: SyncConfig,
    configs_root: NormalizedPath,
}

impl Context {
    /// Load the tool config and apply command-line overrides.
    ///
    /// `config_file` falls back to the platform config location; a missing
    /// file yields the default config.
    pub fn load(config_file: Option<&Path>, configs_override: Option<&Path>) -> Result<Self> {
        let config = match config_file.map(Path::to_path_buf).or_else(SyncConfig::default_path) {
            Some(path) => SyncConfig::load(&NormalizedPath::new(path))?,
            None => SyncConfig::default(),
        };
        Ok(Self::from_config(config, configs_override))
    }

    pub fn from_config(config: SyncConfig, configs_override: Option<&Path>) -> Self {
        let configs_root = match configs_override {
            Some(path) => NormalizedPath::new(path),
            None => config.configs_root(),
        };
        tracing::debug!(configs = %configs_root, "using configs root");
        Self {
            config,
            configs_root,
        }
    }

    pub fn configs_root(&self) -> &NormalizedPath {
        &self.configs_root
    }

    /// Apps registered in the tool config, by alias.
    pub fn registered_apps(&self) -> &BTreeMap<String, AppDetails> {
        &self.config.apps
    }

    pub fn reader(&self) -> LayerReader {
        LayerReader::new(self.configs_root.clone())
    }

    /// Fail early with a readable message when the configs root is missing.
    pub fn ensure_configs_root(&self) -> Result<()> {
        if self.configs_root.is_dir() {
            return Ok(());
        }
        Err(CliError::user(format!(
            "configs repository not found at {} (set --configs or configs_path)",
            self.configs_root
        )))
    }

    /// Layer order for a selection: base (when present), app, stacks,
    /// project.
    pub fn layer_order(&self, selection: &Selection) -> Result<LayerOrder> {
        self.ensure_configs_root()?;

        let mut builder = LayerOrder::builder(self.configs_root.clone())
            .app(&selection.app)
            .stacks(selection.stacks.iter().cloned());
        if self.configs_root.join(LayerKind::Base.directory()).is_dir() {
            builder = builder.base();
        } else {
            tracing::debug!("no base layer in configs root");
        }
        if let Some(project) = &selection.project {
            builder = builder.project(project);
        }
        Ok(builder.build()?)
    }

    /// Profile directory to compare against or write into.
    pub fn target_dir(&self, selection: &Selection, target: Option<&Path>) -> Result<NormalizedPath> {
        if let Some(target) = target {
            return Ok(NormalizedPath::new(target));
        }
        match self.config.app(&selection.app) {
            Ok(app) => Ok(NormalizedPath::new(&app.config_path)),
            Err(_) => Err(CliError::user(format!(
                "app '{}' has no config_path in the tool config; pass --target",
                selection.app
            ))),
        }
    }
}
