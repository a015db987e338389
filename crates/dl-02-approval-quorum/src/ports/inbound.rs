//! Driving Ports (API - Inbound)

use crate::domain::{QuorumState, VoteRequest};
use crate::error::QuorumResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::BlockId;

/// Result of casting one vote
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VoteOutcome {
    /// Vote stored; quorum not (yet) reached
    Recorded { state: QuorumState },
    /// Vote completed the quorum and the block was appended
    Committed { index: u64, hash: String },
}

impl VoteOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, VoteOutcome::Committed { .. })
    }
}

/// Primary Approval Quorum API
#[async_trait]
pub trait ApprovalApi: Send + Sync {
    /// Record a vote and commit the block if it completes the quorum
    ///
    /// Errors: `BlockNotFound`, `ApproverNotFound`, `AlreadyCommitted`,
    /// `DuplicateVote`, and at the threshold `UnauthorizedApprover` or
    /// `ChainIntegrityInvalid`. A vote that triggers a refused commit stays
    /// recorded.
    async fn cast_vote(&self, request: VoteRequest) -> QuorumResult<VoteOutcome>;

    /// Count of affirmative votes
    async fn tally(&self, block_id: BlockId) -> QuorumResult<u32>;

    /// Derived quorum state
    async fn state(&self, block_id: BlockId) -> QuorumResult<QuorumState>;
}
