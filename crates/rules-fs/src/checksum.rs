//! SHA-256 checksum utilities
//!
//! Checksums use the canonical format `sha256:<hex>` and identify the
//! content written to the managed rule file in logs.

use sha2::{Digest, Sha256};

const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of raw content.
pub fn compute_content_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}
