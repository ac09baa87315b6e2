//! SHA-256 checksum utilities
//!
//! Checksums use the `sha256:<hex>` format and identify which layer file a
//! selected keybindings, tasks or snippet file came from in reports.

use sha2::{Digest, Sha256};

const PREFIX: &str = "sha256:";

/// Checksum of raw bytes in the `sha256:<hex>` format.
pub fn compute_bytes_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Shorten a checksum to its prefix and first twelve hex digits.
pub fn short(checksum: &str) -> &str {
    let end = (PREFIX.len() + 12).min(checksum.len());
    &checksum[..end]
}
