//! Layered configuration resolution for vsc-sync
//!
//! A configs repository holds editor configuration split into layers:
//! a shared base, per-editor apps, technology stacks and projects. This
//! crate decides which layers apply, reads them, and combines them into one
//! effective configuration per component:
//!
//! - **settings**: deep merge, higher layers override lower ones
//! - **extensions**: union of recommendations
//! - **snippets**: union of files, the highest layer owns each path
//! - **keybindings / tasks**: the highest layer providing the file wins
//!
//! It also compares a resolved configuration with an editor's live
//! profile directory and writes it there.
//!
//! # Architecture
//!
//! ```text
//!                     vsc-cli
//!                        |
//!                    vsc-core
//!                        |
//!               +--------+--------+
//!               |                 |
//!            vsc-fs          vsc-content
//! ```
//!
//! # Example
//!
//! ```no_run
//! use vsc_core::{ComponentSet, LayerOrder, resolve};
//!
//! fn example() -> vsc_core::Result<()> {
//!     let order = LayerOrder::builder("/home/me/vscode-configs")
//!         .base()
//!         .app("vscode")
//!         .stack("python")
//!         .build()?;
//!     let resolved = resolve(&order, &ComponentSet::all())?;
//!     println!("{:?}", resolved.absent());
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod component;
pub mod config;
pub mod edit;
pub mod error;
pub mod keybindings;
pub mod layer;
pub mod profile;
pub mod reader;
pub mod resolver;
pub mod status;

pub use backup::{BackupPolicy, ProfileBackup, backup_profile};
pub use component::{ComponentKind, ComponentSet, Strategy};
pub use config::{AppDetails, SyncConfig};
pub use edit::{SortOutcome, sort_keybindings_file, sort_settings, sort_settings_file};
pub use error::{Error, Result};
pub use keybindings::{
    DiscardedEntry, KeybindingEntry, NormalizedKeybindings, normalize_keybindings,
    parse_keybindings, render_keybindings,
};
pub use layer::{Layer, LayerId, LayerKind, LayerOrder, LayerOrderBuilder};
pub use profile::{ApplyOptions, ApplyReport, FileAction, FileChange, write_profile};
pub use reader::{ComponentFile, LayerContents, LayerReader, SnippetFiles, read_layer};
pub use resolver::{ResolvedConfiguration, resolve, resolve_contents};
pub use status::{ComponentStatus, LocalDocument, LocalState, SyncState, diff};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_not_found_displays_layer_and_path() {
        let error = Error::LayerNotFound {
            layer: LayerId::new(LayerKind::Stack, "python"),
            path: vsc_fs::NormalizedPath::new("/configs/stacks/python"),
        };

        let display = error.to_string();
        assert!(display.contains("stack:python"), "got: {}", display);
        assert!(display.contains("/configs/stacks/python"), "got: {}", display);
    }

    #[test]
    fn empty_resolution_names_component() {
        let error = Error::EmptyResolution {
            component: ComponentKind::Keybindings,
        };
        assert_eq!(error.to_string(), "No layer provides keybindings");
    }
}
