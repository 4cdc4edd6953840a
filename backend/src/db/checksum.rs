//! Checksums of cached schedule payloads.

use sha2::{Digest, Sha256};

use crate::models::ScheduleEntry;

/// Calculate the SHA-256 checksum of `content`, hex encoded.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Checksum of the JSON encoding of `entries`.
///
/// Two fetches returning the same lessons in the same order share a checksum,
/// which lets callers skip rewriting an unchanged cache.
pub fn entries_checksum(entries: &[ScheduleEntry]) -> serde_json::Result<String> {
    let payload = serde_json::to_string(entries)?;
    Ok(calculate_checksum(&payload))
}
