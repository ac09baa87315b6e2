//! Error types for vsc-content

/// Result type for vsc-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vsc-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {format} content: {message}")]
    ParseError { format: String, message: String },

    #[error("Expected {expected}, found {found}")]
    UnexpectedShape { expected: String, found: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn shape(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
