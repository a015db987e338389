//! # Core Domain Entities
//!
//! Record kinds held by the record registry.
//!
//! ## Clusters
//!
//! - **Owners & Records**: `Owner` (student), `AcademicRecord` (degree)
//! - **Approval**: `Approver`, `ApprovalVote`
//! - **Chain Projection**: `BlockRow` (pending or committed ledger entry)

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use crate::block::{format_timestamp, BlockData, LedgerBlock, GENESIS_TIMESTAMP, TIMESTAMP_FORMAT};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Stable owner identifier (student number).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Academic record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Reserved for the genesis record.
    pub const GENESIS: RecordId = RecordId(0);
}

/// Approver (admin) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApproverId(pub u64);

/// Registry key of a block row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

macro_rules! display_numeric_id {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

display_numeric_id!(RecordId, ApproverId, BlockId);

// =============================================================================
// OWNERS & RECORDS
// =============================================================================

/// The owner of academic records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub full_name: String,
    pub email: String,
}

impl Owner {
    /// Owner of the genesis record.
    pub fn genesis() -> Self {
        Self {
            id: OwnerId::new("GENESIS_STUDENT"),
            full_name: "Genesis Student".to_string(),
            email: "genesis@example.com".to_string(),
        }
    }
}

/// A degree awarded to an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicRecord {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub degree_name: String,
    pub institution: String,
    pub field_of_study: String,
    pub year_awarded: i32,
    pub created_at: NaiveDateTime,
}

impl AcademicRecord {
    /// The fixed record carried by the genesis block.
    pub fn genesis() -> Self {
        Self {
            id: RecordId::GENESIS,
            owner_id: Owner::genesis().id,
            degree_name: "Genesis Degree".to_string(),
            institution: "Blockchain Authority".to_string(),
            field_of_study: "Genesis Block".to_string(),
            year_awarded: 2024,
            created_at: NaiveDateTime::parse_from_str(GENESIS_TIMESTAMP, TIMESTAMP_FORMAT)
                .unwrap_or_default(),
        }
    }

    /// Snapshot of the record as carried in a block's `data`.
    pub fn snapshot(&self) -> BlockData {
        let mut data = BlockData::new();
        data.insert("id".to_string(), json!(self.id.0));
        data.insert("student_id".to_string(), json!(self.owner_id.0));
        data.insert("degree_name".to_string(), json!(self.degree_name));
        data.insert("institution".to_string(), json!(self.institution));
        data.insert("field_of_study".to_string(), json!(self.field_of_study));
        data.insert("year_awarded".to_string(), json!(self.year_awarded));
        data.insert(
            "created_at".to_string(),
            json!(format_timestamp(&self.created_at)),
        );
        data
    }
}

// =============================================================================
// APPROVAL
// =============================================================================

/// An identity that may vote on pending blocks.
///
/// Being registered does not make an approver trusted; only membership of
/// the configured allow-list counts at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approver {
    pub id: ApproverId,
    pub username: String,
}

/// One approver's decision on one pending block.
///
/// At most one vote exists per (approver, block) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalVote {
    pub block_id: BlockId,
    pub approver_id: ApproverId,
    pub decision: bool,
    pub comment: Option<String>,
    pub cast_at: NaiveDateTime,
}

impl ApprovalVote {
    pub fn is_affirmative(&self) -> bool {
        self.decision
    }
}

// =============================================================================
// CHAIN PROJECTION
// =============================================================================

/// Registry projection of a ledger entry.
///
/// Created pending at submission; `approved` flips exactly once, on commit.
/// `block` is the same value that is appended to the ledger file. A pending
/// row the ledger has moved past is rebuilt on the new tip by resubmitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRow {
    pub id: BlockId,
    pub record_id: RecordId,
    pub block: LedgerBlock,
    pub approved: bool,
}

impl BlockRow {
    pub fn previous_hash(&self) -> &str {
        &self.block.previous_hash
    }

    pub fn current_hash(&self) -> &str {
        &self.block.hash
    }

    pub fn nonce(&self) -> u64 {
        self.block.nonce
    }
}
