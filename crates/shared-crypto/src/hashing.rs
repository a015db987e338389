//! # Block Hashing
//!
//! SHA-256 over the canonical encoding of
//! `{index, previous_hash, timestamp, data, nonce}`.

use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::canonical::canonical_json;

/// Length of a block hash rendered as lowercase hex (256 bits).
pub const HASH_HEX_LENGTH: usize = 64;

/// SHA-256 of `bytes` as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Compute the hash binding a block's five content fields.
///
/// `data` may be any map-like serializable value; its keys are sorted
/// before hashing so callers never need to pre-sort.
///
/// # Panics
///
/// Panics if `data` is not JSON-serializable (programming error).
pub fn block_hash<D: Serialize + ?Sized>(
    index: u64,
    previous_hash: &str,
    timestamp: &str,
    data: &D,
    nonce: u64,
) -> String {
    let data = serde_json::to_value(data)
        .unwrap_or_else(|e| panic!("hash engine input is not JSON-serializable: {e}"));

    let payload = json!({
        "index": index,
        "previous_hash": previous_hash,
        "timestamp": timestamp,
        "data": data,
        "nonce": nonce,
    });

    sha256_hex(canonical_json(&payload).as_bytes())
}
