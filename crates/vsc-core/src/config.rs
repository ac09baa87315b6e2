//! Tool configuration
//!
//! Where the configs repository lives and which editor profiles are
//! managed. Stored as TOML at `<config_dir>/vsc-sync/config.toml`:
//!
//! ```toml
//! configs_path = "/home/me/vscode-configs"
//!
//! [apps.vscode]
//! config_path = "/home/me/.config/Code/User"
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use vsc_fs::{ConfigStore, NormalizedPath};

use crate::{Error, Result};

/// A managed editor profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDetails {
    /// The editor's user settings directory
    pub config_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Root of the configs repository holding the layer directories
    pub configs_path: PathBuf,

    /// Managed apps by alias
    #[serde(default)]
    pub apps: BTreeMap<String, AppDetails>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            configs_path: dirs::home_dir()
                .unwrap_or_default()
                .join("vscode-configs"),
            apps: BTreeMap::new(),
        }
    }
}

impl SyncConfig {
    /// Platform location of the config file:
    /// - Linux: `~/.config/vsc-sync/config.toml`
    /// - macOS: `~/Library/Application Support/vsc-sync/config.toml`
    /// - Windows: `%APPDATA%\vsc-sync\config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("vsc-sync").join("config.toml"))
    }

    /// Load from `path`, or defaults when the file does not exist.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load_or_default(path)?)
    }

    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        Ok(ConfigStore::new().save(path, self)?)
    }

    pub fn app(&self, alias: &str) -> Result<&AppDetails> {
        self.apps.get(alias).ok_or_else(|| Error::UnknownApp {
            alias: alias.to_string(),
        })
    }

    pub fn configs_root(&self) -> NormalizedPath {
        NormalizedPath::new(&self.configs_path)
    }
}
