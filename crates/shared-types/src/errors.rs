//! # Error Taxonomy
//!
//! Every recoverable failure in the ledger maps onto one [`ErrorKind`].
//! Subsystem error enums stay local to their crates and implement
//! [`ReportableError`] so callers (CLI, HTTP layer, tests) can switch on the
//! kind without matching on every subsystem's variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Ledger has no genesis block yet.
    Uninitialized,
    /// Owner, record, approver or block row does not exist.
    NotFound,
    /// Approver already voted on this block.
    DuplicateVote,
    /// Owner already has the maximum number of submitted records.
    SubmissionCapExceeded,
    /// Append would break hash linkage or index ordering.
    ChainIntegrityInvalid,
    /// An affirmative voter is not on the allow-list.
    UnauthorizedApprover,
    /// A stored block's hash no longer matches its fields.
    TamperedBlock,
    /// Ledger file exists but cannot be decoded.
    CorruptedLedgerFile,
    /// Record already has a block row.
    AlreadySubmitted,
    /// Block is already committed; no further votes are accepted.
    AlreadyCommitted,
    /// Underlying I/O or persistence failure.
    Storage,
    /// Malformed caller input.
    InvalidInput,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Uninitialized => "uninitialized",
            ErrorKind::NotFound => "not_found",
            ErrorKind::DuplicateVote => "duplicate_vote",
            ErrorKind::SubmissionCapExceeded => "submission_cap_exceeded",
            ErrorKind::ChainIntegrityInvalid => "chain_integrity_invalid",
            ErrorKind::UnauthorizedApprover => "unauthorized_approver",
            ErrorKind::TamperedBlock => "tampered_block",
            ErrorKind::CorruptedLedgerFile => "corrupted_ledger_file",
            ErrorKind::AlreadySubmitted => "already_submitted",
            ErrorKind::AlreadyCommitted => "already_committed",
            ErrorKind::Storage => "storage",
            ErrorKind::InvalidInput => "invalid_input",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable error summary returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

/// Implemented by every subsystem error enum.
pub trait ReportableError: std::error::Error {
    fn kind(&self) -> ErrorKind;

    fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}
