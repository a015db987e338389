//! Domain entities for the Approval Quorum subsystem

pub mod approvers;
pub mod quorum;
pub mod vote;

pub use approvers::ApproverSet;
pub use quorum::{QuorumState, Tally};
pub use vote::VoteRequest;
