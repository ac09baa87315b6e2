//! Command implementations for vsc-cli

pub mod apply;
pub mod layers;
pub mod resolve;
pub mod sort;
pub mod status;

pub use apply::run_apply;
pub use layers::run_layers;
pub use resolve::run_resolve;
pub use sort::run_sort;
pub use status::{run_status, run_status_all};

use colored::Colorize;
use vsc_core::LayerId;

/// `base -> app:vscode -> stack:python` with the arrows dimmed.
fn layer_chain(layers: &[LayerId]) -> String {
    if layers.is_empty() {
        return "(no layers)".dimmed().to_string();
    }
    layers
        .iter()
        .map(|id| id.to_string().cyan().to_string())
        .collect::<Vec<_>>()
        .join(&format!(" {} ", "->".dimmed()))
}
