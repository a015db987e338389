//! Quorum state
//!
//! State progression: Pending → PartiallyApproved(n) → Committed
//!
//! The state is never stored. It is derived from the votes on a block and
//! the block row's commit flag, so there is one source for "is this
//! approved".

use serde::{Deserialize, Serialize};
use shared_types::{ApprovalVote, ApproverId};

/// Quorum state of one pending block
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "state", content = "affirmative", rename_all = "snake_case")]
pub enum QuorumState {
    /// No affirmative votes yet
    #[default]
    Pending,
    /// Some affirmative votes, below threshold or commit refused
    PartiallyApproved(u32),
    /// Appended to the ledger (terminal)
    Committed,
}

impl QuorumState {
    /// Derive the state from the commit flag and the affirmative count.
    pub fn derive(committed: bool, affirmative: u32) -> Self {
        match (committed, affirmative) {
            (true, _) => QuorumState::Committed,
            (false, 0) => QuorumState::Pending,
            (false, n) => QuorumState::PartiallyApproved(n),
        }
    }

    pub fn is_committed(&self) -> bool {
        *self == QuorumState::Committed
    }
}

/// Vote count for one block
///
/// Negative votes are recorded but never counted toward quorum.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub affirmative: u32,
    pub negative: u32,
    /// Approvers whose affirmative votes were counted, in vote order
    pub affirmative_voters: Vec<ApproverId>,
}

impl Tally {
    pub fn from_votes(votes: &[ApprovalVote]) -> Self {
        votes.iter().fold(Tally::default(), |mut tally, vote| {
            if vote.is_affirmative() {
                tally.affirmative += 1;
                tally.affirmative_voters.push(vote.approver_id);
            } else {
                tally.negative += 1;
            }
            tally
        })
    }

    pub fn reaches(&self, threshold: u32) -> bool {
        self.affirmative >= threshold
    }
}
