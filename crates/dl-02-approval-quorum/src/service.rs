//! Approval Quorum Service - Core business logic
//!
//! ## Commit Path
//!
//! ```text
//! cast_vote ──→ row exists? ──→ approver exists? ──→ not committed? ──→ not duplicate?
//!                                                                          │
//!                                                                    record vote
//!                                                                          │
//!                                                affirmative < threshold ──┴── affirmative >= threshold
//!                                                        │                              │
//!                                                    Recorded              every voter allow-listed?
//!                                                                                       │
//!                                                                         previous_hash == tip?
//!                                                                                       │
//!                                                                   append to ledger, then mark row
//!                                                                                       │
//!                                                                                   Committed
//! ```
//!
//! The ledger append happens before the registry flip. A crash between the
//! two leaves a row that is pending in the registry but present in the
//! ledger; the runtime's reconcile pass repairs that.

use crate::domain::{ApproverSet, QuorumState, Tally, VoteRequest};
use crate::error::{QuorumError, QuorumResult};
use crate::ports::inbound::{ApprovalApi, VoteOutcome};
use crate::ports::outbound::{BallotBox, ChainGateway};
use async_trait::async_trait;
use shared_types::{BlockId, BlockRow};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Number of affirmative votes required by default
pub const DEFAULT_QUORUM_THRESHOLD: u32 = 3;

/// Quorum configuration
#[derive(Clone, Debug)]
pub struct QuorumConfig {
    /// Affirmative votes required to commit
    pub threshold: u32,
    /// Usernames allowed to commit
    pub allow_list: ApproverSet,
}

impl Default for QuorumConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_QUORUM_THRESHOLD,
            allow_list: ApproverSet::new(["admin1", "admin2", "admin3"]),
        }
    }
}

/// Approval Quorum Service implementation
pub struct ApprovalQuorum<B, C>
where
    B: BallotBox,
    C: ChainGateway,
{
    config: QuorumConfig,
    ballots: Arc<B>,
    chain: Arc<C>,
    /// Serializes vote handling so two final votes cannot both commit
    commit_lock: Mutex<()>,
}

impl<B, C> ApprovalQuorum<B, C>
where
    B: BallotBox,
    C: ChainGateway,
{
    pub fn new(config: QuorumConfig, ballots: Arc<B>, chain: Arc<C>) -> Self {
        Self {
            config,
            ballots,
            chain,
            commit_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &QuorumConfig {
        &self.config
    }

    /// Full tally (affirmative, negative, voters) for a block
    pub async fn tally_details(&self, block_id: BlockId) -> QuorumResult<Tally> {
        self.require_row(block_id).await?;
        let votes = self.ballots.votes_for(block_id).await?;
        Ok(Tally::from_votes(&votes))
    }

    async fn require_row(&self, block_id: BlockId) -> QuorumResult<BlockRow> {
        self.ballots
            .block_row(block_id)
            .await?
            .ok_or(QuorumError::BlockNotFound { block_id })
    }

    /// Every counted affirmative voter must be on the allow-list.
    async fn check_allow_list(&self, tally: &Tally) -> QuorumResult<()> {
        for approver_id in &tally.affirmative_voters {
            let approver = self
                .ballots
                .approver(*approver_id)
                .await?
                .ok_or(QuorumError::ApproverNotFound {
                    approver_id: *approver_id,
                })?;

            if !self.config.allow_list.contains(&approver.username) {
                return Err(QuorumError::UnauthorizedApprover {
                    username: approver.username,
                });
            }
        }
        Ok(())
    }

    async fn commit(&self, row: BlockRow) -> QuorumResult<VoteOutcome> {
        let tip_hash = self.chain.tip_hash().await?;
        if row.block.previous_hash != tip_hash {
            return Err(QuorumError::ChainIntegrityInvalid {
                reason: format!(
                    "block {} links to {} but the ledger tip is {}",
                    row.id, row.block.previous_hash, tip_hash
                ),
            });
        }

        let (index, hash) = (row.block.index, row.block.hash.clone());
        self.chain.append(row.block).await?;
        self.ballots.mark_committed(row.id).await?;

        tracing::info!(
            block_index = index,
            block_hash = %hash,
            "[dl-02] ✅ Block {} committed at index {}",
            row.id,
            index
        );
        Ok(VoteOutcome::Committed { index, hash })
    }
}

#[async_trait]
impl<B, C> ApprovalApi for ApprovalQuorum<B, C>
where
    B: BallotBox,
    C: ChainGateway,
{
    async fn cast_vote(&self, request: VoteRequest) -> QuorumResult<VoteOutcome> {
        let _guard = self.commit_lock.lock().await;
        let block_id = request.block_id;
        let approver_id = request.approver_id;

        // 1. Block row and approver must exist
        let row = self.require_row(block_id).await?;
        let approver = self
            .ballots
            .approver(approver_id)
            .await?
            .ok_or(QuorumError::ApproverNotFound { approver_id })?;

        // 2. Committed blocks accept no further votes
        if row.approved {
            return Err(QuorumError::AlreadyCommitted { block_id });
        }

        // 3. One vote per (approver, block)
        let votes = self.ballots.votes_for(block_id).await?;
        if votes.iter().any(|v| v.approver_id == approver_id) {
            tracing::debug!(
                approver = %approver.username,
                "[dl-02] Duplicate vote on block {} rejected",
                block_id
            );
            return Err(QuorumError::DuplicateVote {
                approver_id,
                block_id,
            });
        }

        // 4. Record and re-tally
        let decision = request.decision;
        self.ballots.record_vote(request.into_vote()).await?;
        let votes = self.ballots.votes_for(block_id).await?;
        let tally = Tally::from_votes(&votes);

        tracing::info!(
            approver = %approver.username,
            affirmative = tally.affirmative,
            "[dl-02] 🗳️ Vote {} on block {} ({}/{})",
            if decision { "for" } else { "against" },
            block_id,
            tally.affirmative,
            self.config.threshold
        );

        if !tally.reaches(self.config.threshold) {
            return Ok(VoteOutcome::Recorded {
                state: QuorumState::derive(false, tally.affirmative),
            });
        }

        // 5. Threshold reached: authorize, re-check linkage, append
        if let Err(e) = self.check_allow_list(&tally).await {
            tracing::warn!("[dl-02] ⛔ Commit of block {} refused: {}", block_id, e);
            return Err(e);
        }

        self.commit(row).await.inspect_err(|e| {
            tracing::warn!("[dl-02] ⛔ Commit of block {} failed: {}", block_id, e);
        })
    }

    async fn tally(&self, block_id: BlockId) -> QuorumResult<u32> {
        Ok(self.tally_details(block_id).await?.affirmative)
    }

    async fn state(&self, block_id: BlockId) -> QuorumResult<QuorumState> {
        let row = self.require_row(block_id).await?;
        let votes = self.ballots.votes_for(block_id).await?;
        Ok(QuorumState::derive(
            row.approved,
            Tally::from_votes(&votes).affirmative,
        ))
    }
}
