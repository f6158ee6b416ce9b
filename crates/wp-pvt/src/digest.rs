//! Content digests of rendered tables.

use sha2::{Digest, Sha256};

/// SHA-256 of a rendered `.tab` text, as lowercase hex.
///
/// Conversions are deterministic, so equal inputs give equal digests.
pub fn table_digest(rendered: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rendered.as_bytes());
    format!("{:x}", hasher.finalize())
}
