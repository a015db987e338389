//! # dl-02-approval-quorum
//!
//! Multi-admin approval gate deciding when a pending ledger block is
//! committed.
//!
//! ## Overview
//!
//! - **Threshold**: a fixed number (default 3) of affirmative votes
//! - **Allow-List**: every counted affirmative voter must be a configured
//!   approver, otherwise the whole commit is refused
//! - **One Vote Each**: a second vote by the same approver is rejected, never
//!   overwritten
//! - **Advisory Negatives**: negative votes are stored and never counted
//!
//! ## State Machine
//!
//! ```text
//! [Pending] ──vote──→ [PartiallyApproved(n)] ──threshold + allow-list + tip──→ [Committed]
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use dl_02_approval_quorum::{ApprovalQuorum, QuorumConfig, VoteRequest};
//! use dl_02_approval_quorum::ports::inbound::ApprovalApi;
//!
//! let quorum = ApprovalQuorum::new(QuorumConfig::default(), ballots, chain);
//! let outcome = quorum.cast_vote(VoteRequest::approve(block_id, approver_id, now)).await?;
//! ```

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{ApproverSet, QuorumState, Tally, VoteRequest};
pub use error::{QuorumError, QuorumResult};
pub use ports::inbound::{ApprovalApi, VoteOutcome};
pub use ports::outbound::{BallotBox, ChainGateway};
pub use service::{ApprovalQuorum, QuorumConfig, DEFAULT_QUORUM_THRESHOLD};
