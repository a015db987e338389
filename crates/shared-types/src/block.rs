//! # Ledger Block
//!
//! One entry of the hash-linked ledger.
//!
//! ## Wire Format
//!
//! ```text
//! {
//!     "index": 1,
//!     "previous_hash": "<64 hex>",
//!     "timestamp": "2025-06-01T12:30:45",
//!     "data": { ...record snapshot, keys sorted... },
//!     "nonce": 0,
//!     "hash": "<64 hex>"
//! }
//! ```
//!
//! `data` is a `BTreeMap`, so keys are sorted both in memory and on disk.
//! The timestamp is stored as text and never re-rendered after the block is
//! built, which keeps the hash reproducible from the stored fields alone.

use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_crypto::block_hash;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::entities::AcademicRecord;

/// Record snapshot carried by a block. Keys are always sorted.
pub type BlockData = BTreeMap<String, Value>;

/// `previous_hash` of the genesis block.
pub const ZERO_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Fixed genesis timestamp, identical on every installation.
pub const GENESIS_TIMESTAMP: &str = "2024-01-01T00:00:00";

/// Second-precision ISO-8601 layout used for every stored timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Nonce value; there is no proof-of-work.
pub const DEFAULT_NONCE: u64 = 0;

/// Timestamp text that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid timestamp '{input}': expected ISO-8601")]
pub struct TimestampError {
    pub input: String,
}

/// Render a timestamp at second precision (sub-second part dropped).
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse ISO-8601 text, with or without fraction or offset.
///
/// Offsets are converted to UTC; the fraction is discarded.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, TimestampError> {
    let trimmed = input.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(truncate_to_seconds(with_offset.naive_utc()));
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .map(truncate_to_seconds)
        .map_err(|_| TimestampError {
            input: input.to_string(),
        })
}

fn truncate_to_seconds(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp.with_nanosecond(0).unwrap_or(timestamp)
}

/// A single ledger entry.
///
/// Field order matches the on-disk object layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBlock {
    /// Position in the chain, 0 for genesis.
    pub index: u64,
    /// Hash of the block at `index - 1`; [`ZERO_HASH`] for genesis.
    pub previous_hash: String,
    /// Second-precision ISO-8601, fixed once written.
    pub timestamp: String,
    /// Record snapshot, keys sorted.
    pub data: BlockData,
    /// Always 0.
    pub nonce: u64,
    /// Hash engine output over the five fields above.
    pub hash: String,
}

impl LedgerBlock {
    /// Build a block, normalizing the timestamp and computing the hash.
    pub fn build(
        index: u64,
        previous_hash: impl Into<String>,
        timestamp: NaiveDateTime,
        data: BlockData,
        nonce: u64,
    ) -> Self {
        Self::assemble(index, previous_hash.into(), format_timestamp(&timestamp), data, nonce)
    }

    /// The fixed zeroth block.
    ///
    /// Constant timestamp and payload, so every installation produces a
    /// byte-identical genesis.
    pub fn genesis() -> Self {
        Self::assemble(
            0,
            ZERO_HASH.to_string(),
            GENESIS_TIMESTAMP.to_string(),
            AcademicRecord::genesis().snapshot(),
            DEFAULT_NONCE,
        )
    }

    fn assemble(
        index: u64,
        previous_hash: String,
        timestamp: String,
        data: BlockData,
        nonce: u64,
    ) -> Self {
        let hash = block_hash(index, &previous_hash, &timestamp, &data, nonce);
        Self {
            index,
            previous_hash,
            timestamp,
            data,
            nonce,
            hash,
        }
    }

    /// Recompute the hash from the stored fields.
    pub fn recompute_hash(&self) -> String {
        block_hash(
            self.index,
            &self.previous_hash,
            &self.timestamp,
            &self.data,
            self.nonce,
        )
    }

    /// Self-consistency check: does the stored hash match the fields?
    pub fn is_valid(&self) -> bool {
        self.recompute_hash() == self.hash
    }

    /// Whether this block is the canonical genesis block.
    pub fn is_genesis(&self) -> bool {
        *self == Self::genesis()
    }

    /// The record id carried in `data.id`, stringified.
    ///
    /// Strings are returned verbatim and numbers in decimal; `None` when the
    /// payload has no `id` or it is not a scalar.
    pub fn record_id_string(&self) -> Option<String> {
        match self.data.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Whether `identifier` names this block by hash or by record id.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.hash == identifier || self.record_id_string().as_deref() == Some(identifier)
    }

    /// String field from `data`, if present.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}
