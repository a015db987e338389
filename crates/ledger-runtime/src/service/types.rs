//! Request and report types of the ledger service.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{BlockId, BlockRow, LedgerBlock, OwnerId, RecordId};

/// A degree to be registered; the service stamps `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub owner_id: OwnerId,
    pub degree_name: String,
    pub institution: String,
    pub field_of_study: String,
    pub year_awarded: i32,
}

/// Denormalized view of a verified ledger block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub record_id: Option<String>,
    pub student_id: Option<String>,
    pub degree_name: Option<String>,
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    pub year_awarded: Option<i64>,
    pub hash: String,
    pub timestamp: String,
    pub index: u64,
}

impl VerificationResult {
    pub(crate) fn from_block(block: &LedgerBlock) -> Self {
        let text = |key: &str| block.data_str(key).map(str::to_string);
        Self {
            record_id: block.record_id_string(),
            student_id: text("student_id"),
            degree_name: text("degree_name"),
            institution: text("institution"),
            field_of_study: text("field_of_study"),
            year_awarded: block.data.get("year_awarded").and_then(Value::as_i64),
            hash: block.hash.clone(),
            timestamp: block.timestamp.clone(),
            index: block.index,
        }
    }
}

/// Whole-ledger integrity report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAudit {
    pub length: usize,
    pub valid: bool,
    /// First block failing the self-hash, linkage or genesis check.
    pub first_invalid_index: Option<usize>,
}

/// Where a record stands, derived from its block row and votes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordStatus {
    NotSubmitted,
    Pending { block_id: BlockId, affirmative: u32 },
    /// Another block was committed on this block's parent first; submit the
    /// record again to rebuild it on the tip.
    Stale { block_id: BlockId, previous_hash: String },
    Committed { block_id: BlockId, index: u64, hash: String },
}

/// Entry of the approval queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBlock {
    pub block_id: BlockId,
    pub record_id: RecordId,
    pub index: u64,
    pub previous_hash: String,
    pub hash: String,
    pub affirmative: u32,
}

impl PendingBlock {
    pub(crate) fn new(row: &BlockRow, affirmative: u32) -> Self {
        Self {
            block_id: row.id,
            record_id: row.record_id,
            index: row.block.index,
            previous_hash: row.block.previous_hash.clone(),
            hash: row.block.hash.clone(),
            affirmative,
        }
    }
}

/// What `initialize_genesis` changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisReport {
    pub genesis_hash: String,
    /// The ledger file was absent or empty and now holds genesis.
    pub ledger_created: bool,
    /// The registry had no genesis row and now has one.
    pub registry_seeded: bool,
    /// Pending rows found already committed and flipped.
    pub reconciled: Vec<BlockId>,
}
