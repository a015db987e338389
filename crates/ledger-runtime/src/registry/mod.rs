//! # Record Registry
//!
//! Durable store for owners, academic records, approvers, votes and block
//! rows. The ledger service consults and updates it; the hash chain itself
//! lives in the chain store.
//!
//! ## Adapters
//!
//! - `InMemoryRegistry`: process-local, for tests
//! - `JsonFileRegistry`: one JSON document, temp file + rename per write
//!
//! Every call is atomic: a failed write leaves the previous state in place.

mod state;
mod store;

pub use state::{RecordDraft, RegistryState};
pub use store::{InMemoryRegistry, JsonFileRegistry, JsonSnapshot, NoPersistence, Snapshotter, StateRegistry};

use async_trait::async_trait;
use shared_types::{
    AcademicRecord, ApprovalVote, Approver, ApproverId, BlockId, BlockRow, ErrorKind,
    LedgerBlock, Owner, OwnerId, RecordId, ReportableError,
};
use thiserror::Error;

/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Referenced row does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Unique key already taken.
    #[error("{entity} already exists: {key}")]
    Conflict { entity: &'static str, key: String },

    /// (approver, block) pair already voted.
    #[error("Approver {approver_id} already voted on block {block_id}")]
    DuplicateVote {
        approver_id: ApproverId,
        block_id: BlockId,
    },

    /// Registry document cannot be decoded.
    #[error("Registry document is corrupted: {reason}")]
    Corrupted { reason: String },

    /// Reading or writing the registry document failed.
    #[error("Registry I/O error: {message}")]
    Io { message: String },
}

impl RegistryError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        RegistryError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub(crate) fn conflict(entity: &'static str, key: impl ToString) -> Self {
        RegistryError::Conflict {
            entity,
            key: key.to_string(),
        }
    }
}

impl ReportableError for RegistryError {
    fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::NotFound { .. } => ErrorKind::NotFound,
            RegistryError::Conflict { .. } => ErrorKind::InvalidInput,
            RegistryError::DuplicateVote { .. } => ErrorKind::DuplicateVote,
            RegistryError::Corrupted { .. } | RegistryError::Io { .. } => ErrorKind::Storage,
        }
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Port to the record registry.
#[async_trait]
pub trait RecordRegistry: Send + Sync {
    // --- owners ---

    /// Insert an owner; `Conflict` if the id is taken.
    async fn insert_owner(&self, owner: Owner) -> RegistryResult<Owner>;

    async fn owner(&self, id: &OwnerId) -> RegistryResult<Option<Owner>>;

    // --- academic records ---

    /// Insert a record with the next free id (ids start at 1).
    async fn create_record(&self, draft: RecordDraft) -> RegistryResult<AcademicRecord>;

    /// Insert a record with an explicit id; `Conflict` if the id is taken.
    async fn insert_record(&self, record: AcademicRecord) -> RegistryResult<AcademicRecord>;

    async fn record(&self, id: RecordId) -> RegistryResult<Option<AcademicRecord>>;

    async fn records_of(&self, owner: &OwnerId) -> RegistryResult<Vec<AcademicRecord>>;

    // --- approvers ---

    /// Register an approver; `Conflict` if the username is taken.
    async fn create_approver(&self, username: &str) -> RegistryResult<Approver>;

    async fn approver(&self, id: ApproverId) -> RegistryResult<Option<Approver>>;

    async fn approver_by_username(&self, username: &str) -> RegistryResult<Option<Approver>>;

    // --- block rows ---

    /// Insert a block row for a record; `Conflict` if the record has one.
    async fn insert_block_row(
        &self,
        record_id: RecordId,
        block: LedgerBlock,
        approved: bool,
    ) -> RegistryResult<BlockRow>;

    async fn block_row(&self, id: BlockId) -> RegistryResult<Option<BlockRow>>;

    async fn block_row_for_record(&self, record_id: RecordId) -> RegistryResult<Option<BlockRow>>;

    /// Replace the block of a pending row and drop the votes cast on it.
    ///
    /// `NotFound` if missing, `Conflict` if the row is already approved.
    async fn rebase_block_row(&self, id: BlockId, block: LedgerBlock) -> RegistryResult<BlockRow>;

    /// All rows in insertion order.
    async fn block_rows(&self) -> RegistryResult<Vec<BlockRow>>;

    /// Flip a row to approved; `NotFound` if missing.
    async fn mark_block_approved(&self, id: BlockId) -> RegistryResult<()>;

    // --- votes ---

    /// Insert a vote; `DuplicateVote` if the pair exists.
    async fn insert_vote(&self, vote: ApprovalVote) -> RegistryResult<()>;

    async fn votes_for_block(&self, id: BlockId) -> RegistryResult<Vec<ApprovalVote>>;

    async fn votes_by_approver(&self, id: ApproverId) -> RegistryResult<Vec<ApprovalVote>>;
}
