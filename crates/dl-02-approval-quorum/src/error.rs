//! Error types for the Approval Quorum subsystem

use shared_types::{ApproverId, BlockId, ErrorKind, ReportableError};
use thiserror::Error;

/// Approval quorum errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuorumError {
    /// No pending or committed block row with this id
    #[error("Block not found: {block_id}")]
    BlockNotFound { block_id: BlockId },

    /// Voter is not a registered approver
    #[error("Approver not found: {approver_id}")]
    ApproverNotFound { approver_id: ApproverId },

    /// Approver already voted on this block
    #[error("Approver {approver_id} already voted on block {block_id}")]
    DuplicateVote {
        approver_id: ApproverId,
        block_id: BlockId,
    },

    /// Block is already committed
    #[error("Block {block_id} is already committed")]
    AlreadyCommitted { block_id: BlockId },

    /// An affirmative voter is outside the allow-list
    #[error("Approver '{username}' is not on the approver allow-list")]
    UnauthorizedApprover { username: String },

    /// Pending block no longer links to the ledger tip
    #[error("Chain integrity invalid: {reason}")]
    ChainIntegrityInvalid { reason: String },

    /// Ledger has no genesis block
    #[error("Ledger is uninitialized")]
    Uninitialized,

    /// Ledger file cannot be decoded
    #[error("Ledger file is corrupted: {reason}")]
    CorruptedLedger { reason: String },

    /// Registry or ledger I/O failed
    #[error("Storage error: {reason}")]
    Storage { reason: String },
}

impl ReportableError for QuorumError {
    fn kind(&self) -> ErrorKind {
        match self {
            QuorumError::BlockNotFound { .. } | QuorumError::ApproverNotFound { .. } => {
                ErrorKind::NotFound
            }
            QuorumError::DuplicateVote { .. } => ErrorKind::DuplicateVote,
            QuorumError::AlreadyCommitted { .. } => ErrorKind::AlreadyCommitted,
            QuorumError::UnauthorizedApprover { .. } => ErrorKind::UnauthorizedApprover,
            QuorumError::ChainIntegrityInvalid { .. } => ErrorKind::ChainIntegrityInvalid,
            QuorumError::Uninitialized => ErrorKind::Uninitialized,
            QuorumError::CorruptedLedger { .. } => ErrorKind::CorruptedLedgerFile,
            QuorumError::Storage { .. } => ErrorKind::Storage,
        }
    }
}

/// Result type for quorum operations
pub type QuorumResult<T> = Result<T, QuorumError>;
