//! SHA-256 checksum utilities
//!
//! Checksums use the canonical `sha256:<hex>` format and are used to tell
//! whether a regenerated file actually changed.

use sha2::{Digest, Sha256};
use std::path::Path;

const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of in-memory content.
pub fn compute_content_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 checksum of a file's contents.
///
/// Returns `None` when the file does not exist or cannot be read.
pub fn compute_file_checksum(path: &Path) -> Option<String> {
    let content = std::fs::read(path).ok()?;
    Some(compute_content_checksum(&content))
}
