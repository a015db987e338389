//! # Ballot Box Adapter
//!
//! Implements dl-02's `BallotBox` over the record registry.

use async_trait::async_trait;
use dl_02_approval_quorum::{BallotBox, QuorumError, QuorumResult};
use shared_types::{ApprovalVote, Approver, ApproverId, BlockId, BlockRow};
use std::sync::Arc;

use crate::registry::{RecordRegistry, RegistryError};

pub struct RegistryBallotBox<R: RecordRegistry> {
    registry: Arc<R>,
}

impl<R: RecordRegistry> RegistryBallotBox<R> {
    pub fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl<R: RecordRegistry> BallotBox for RegistryBallotBox<R> {
    async fn block_row(&self, block_id: BlockId) -> QuorumResult<Option<BlockRow>> {
        self.registry.block_row(block_id).await.map_err(registry_to_quorum)
    }

    async fn approver(&self, approver_id: ApproverId) -> QuorumResult<Option<Approver>> {
        self.registry.approver(approver_id).await.map_err(registry_to_quorum)
    }

    async fn votes_for(&self, block_id: BlockId) -> QuorumResult<Vec<ApprovalVote>> {
        self.registry
            .votes_for_block(block_id)
            .await
            .map_err(registry_to_quorum)
    }

    async fn record_vote(&self, vote: ApprovalVote) -> QuorumResult<()> {
        let block_id = vote.block_id;
        let approver_id = vote.approver_id;
        self.registry.insert_vote(vote).await.map_err(|e| match e {
            RegistryError::NotFound { entity: "block", .. } => QuorumError::BlockNotFound { block_id },
            RegistryError::NotFound {
                entity: "approver", ..
            } => QuorumError::ApproverNotFound { approver_id },
            other => registry_to_quorum(other),
        })
    }

    async fn mark_committed(&self, block_id: BlockId) -> QuorumResult<()> {
        self.registry
            .mark_block_approved(block_id)
            .await
            .map_err(|e| match e {
                RegistryError::NotFound { .. } => QuorumError::BlockNotFound { block_id },
                other => registry_to_quorum(other),
            })
    }
}

fn registry_to_quorum(err: RegistryError) -> QuorumError {
    match err {
        RegistryError::DuplicateVote {
            approver_id,
            block_id,
        } => QuorumError::DuplicateVote {
            approver_id,
            block_id,
        },
        other => QuorumError::Storage {
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryRegistry;
    use shared_types::parse_timestamp;

    fn vote(block: u64, approver: u64) -> ApprovalVote {
        ApprovalVote {
            block_id: BlockId(block),
            approver_id: ApproverId(approver),
            decision: true,
            comment: None,
            cast_at: parse_timestamp("2025-06-01T12:00:00").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_vote_on_missing_block_maps_to_block_not_found() {
        let registry = Arc::new(InMemoryRegistry::new());
        registry.create_approver("admin1").await.unwrap();
        let ballots = RegistryBallotBox::new(registry);

        assert_eq!(
            ballots.record_vote(vote(7, 1)).await,
            Err(QuorumError::BlockNotFound { block_id: BlockId(7) })
        );
        assert_eq!(
            ballots.mark_committed(BlockId(7)).await,
            Err(QuorumError::BlockNotFound { block_id: BlockId(7) })
        );
    }
}
