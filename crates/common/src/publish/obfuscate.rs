//! Pure path obfuscation.
//!
//! Builds the public path segment for a source file without touching the
//! filesystem. The directory part of the source path is hashed, hiding the
//! real layout; the filename is kept readable so published entries stay
//! human-inspectable and content-type detection keeps working downstream.
//! The context hash sits in its own segment, which lets an operator remove
//! one subtree to drop all anonymous or all per-session entries at once.

use std::path::Path;

use sha1::{Digest, Sha1};

/// Lowercase hex SHA-1 of arbitrary bytes.
pub fn sha1_hex(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Build the obfuscated public path segment for a source file.
///
/// Output is `location_id/context_hash/sha1(dirname)/basename`, always
/// joined with forward slashes. Deterministic: two calls with equal inputs
/// produce equal segments, and two distinct sources only collide if their
/// whole dirname+basename tuples are equal.
///
/// The caller guarantees a non-empty source path with a filename component.
pub fn public_path_segment(location_id: &str, context_hash: &str, source_path: &Path) -> String {
    let dir = source_path
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = source_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let dir_hash = sha1_hex(dir.as_bytes());
    [location_id, context_hash, dir_hash.as_str(), base.as_str()].join("/")
}
