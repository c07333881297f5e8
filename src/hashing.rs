//! Canonical output and digests
//!
//! The layout is always written as canonical JSON so that identical inputs
//! give byte-identical files; the digest makes that easy to check.

use serde::Serialize;
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

use crate::layout::Layout;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Convert to canonical JSON (sorted keys, no whitespace)
///
/// Going through `Value` sorts every object's keys, struct fields included,
/// since `serde_json::Map` is ordered without the `preserve_order` feature.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&v)
}

/// Digest of the layout's canonical JSON text.
pub fn layout_digest(layout: &Layout) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(layout)?;
    Ok(sha256_hex(canonical.as_bytes()))
}
