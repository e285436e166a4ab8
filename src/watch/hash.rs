// src/watch/hash.rs

use tracing::trace;

/// Hash of in-memory catalog contents, hex encoded (blake3).
///
/// Editors often emit several filesystem events per save; equal hashes let
/// the session ignore all but the first.
pub fn content_hash(contents: &str) -> String {
    let hash = blake3::hash(contents.as_bytes()).to_hex().to_string();
    trace!(hash = %hash, bytes = contents.len(), "hashed catalog contents");
    hash
}
