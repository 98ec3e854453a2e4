//! SHA-256 digest utilities
//!
//! Short hex digests disambiguate cache directory names.

use sha2::{Digest, Sha256};

fn hex_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// First `len` hex characters of the SHA-256 digest of `content`.
///
/// `len` is clamped to the 64 characters a SHA-256 digest has.
pub fn short_digest(content: &[u8], len: usize) -> String {
    let mut hex = hex_digest(content);
    hex.truncate(len.min(64));
    hex
}
