//! Vote request
//!
//! A caller's ballot before it is recorded. `cast_at` comes from the
//! caller's clock so the quorum stays free of wall-clock reads.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shared_types::{ApprovalVote, ApproverId, BlockId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub block_id: BlockId,
    pub approver_id: ApproverId,
    pub decision: bool,
    pub comment: Option<String>,
    pub cast_at: NaiveDateTime,
}

impl VoteRequest {
    pub fn approve(block_id: BlockId, approver_id: ApproverId, cast_at: NaiveDateTime) -> Self {
        Self {
            block_id,
            approver_id,
            decision: true,
            comment: None,
            cast_at,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn into_vote(self) -> ApprovalVote {
        ApprovalVote {
            block_id: self.block_id,
            approver_id: self.approver_id,
            decision: self.decision,
            comment: self.comment,
            cast_at: self.cast_at,
        }
    }
}
