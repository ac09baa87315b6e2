//! Filesystem helpers for vsc-sync
//!
//! Path normalization, atomic writes, content checksums and a
//! format-by-extension config store shared by the other crates.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::compute_bytes_checksum;
pub use config::{ConfigStore, Format};
pub use error::{Error, Result};
pub use path::NormalizedPath;
