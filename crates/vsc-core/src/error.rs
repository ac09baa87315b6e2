//! Error types for vsc-core

use vsc_fs::NormalizedPath;

use crate::component::ComponentKind;
use crate::layer::LayerId;

/// Result type for vsc-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vsc-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A layer named in the order has no directory
    #[error("Layer {layer} not found at {path}")]
    LayerNotFound { layer: LayerId, path: NormalizedPath },

    /// A component file exists but cannot be parsed or has the wrong shape
    #[error("Malformed {path} in layer {layer}: {reason}")]
    MalformedComponentFile {
        layer: LayerId,
        path: NormalizedPath,
        reason: String,
    },

    /// The same layer was selected twice, so no single winner exists
    #[error("Layer {layer} is selected more than once")]
    AmbiguousSelection { layer: LayerId },

    /// A required component is absent from every layer
    #[error("No layer provides {component}")]
    EmptyResolution { component: ComponentKind },

    /// Layers are not in base, app, stack, project order
    #[error("Invalid layer order: {reason}")]
    InvalidLayerOrder { reason: String },

    /// Layer names must be a single path segment
    #[error("Invalid layer name: {name:?}")]
    InvalidLayerName { name: String },

    #[error("Unknown component: {name} (expected one of {expected})")]
    UnknownComponent { name: String, expected: String },

    /// The tool config has no entry for this app alias
    #[error("Unknown app: {alias}")]
    UnknownApp { alias: String },

    /// A backup directory with the requested suffix is already there
    #[error("Backup already exists at {path}")]
    BackupExists { path: NormalizedPath },

    #[error("Invalid backup suffix: {suffix:?}")]
    InvalidBackupSuffix { suffix: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from vsc-fs
    #[error(transparent)]
    Fs(#[from] vsc_fs::Error),

    /// Content error from vsc-content
    #[error(transparent)]
    Content(#[from] vsc_content::Error),
}

impl Error {
    pub(crate) fn malformed(
        layer: &LayerId,
        path: &NormalizedPath,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::MalformedComponentFile {
            layer: layer.clone(),
            path: path.clone(),
            reason: reason.to_string(),
        }
    }
}
