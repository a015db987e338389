//! Driven Ports (SPI - Outbound Dependencies)

use crate::error::QuorumResult;
use async_trait::async_trait;
use shared_types::{ApprovalVote, Approver, ApproverId, BlockId, BlockRow, LedgerBlock};

/// Registry access needed to record and tally votes
///
/// Each call is treated as atomic; rollback on error is the registry's job.
#[async_trait]
pub trait BallotBox: Send + Sync {
    /// Fetch a block row by id
    async fn block_row(&self, block_id: BlockId) -> QuorumResult<Option<BlockRow>>;

    /// Fetch a registered approver by id
    async fn approver(&self, approver_id: ApproverId) -> QuorumResult<Option<Approver>>;

    /// All votes on a block, in insertion order
    async fn votes_for(&self, block_id: BlockId) -> QuorumResult<Vec<ApprovalVote>>;

    /// Insert a vote
    ///
    /// Must fail with `DuplicateVote` if the (approver, block) pair exists.
    async fn record_vote(&self, vote: ApprovalVote) -> QuorumResult<()>;

    /// Flip the block row to approved (terminal)
    async fn mark_committed(&self, block_id: BlockId) -> QuorumResult<()>;
}

/// Ledger access needed at commit time
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Hash of the last committed block
    async fn tip_hash(&self) -> QuorumResult<String>;

    /// Append a committed block after the tip
    async fn append(&self, block: LedgerBlock) -> QuorumResult<()>;
}
