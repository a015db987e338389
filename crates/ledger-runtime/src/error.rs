//! # Ledger Service Errors
//!
//! `LedgerError` wraps every subsystem error and adds the failures only the
//! orchestration layer can detect. Callers switch on [`ReportableError::kind`].

use dl_01_chain_store::ChainStoreError;
use dl_02_approval_quorum::QuorumError;
use ledger_telemetry::LEDGER_ERRORS;
use shared_types::{ErrorKind, OwnerId, RecordId, ReportableError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::registry::RegistryError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Chain(#[from] ChainStoreError),

    #[error(transparent)]
    Quorum(#[from] QuorumError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("Owner {owner} already has {cap} submitted records")]
    SubmissionCapExceeded { owner: OwnerId, cap: u32 },

    #[error("Record {record_id} is already on the chain or pending approval")]
    AlreadySubmitted { record_id: RecordId },

    #[error("Block {index} has been tampered with (stored hash {hash} does not verify)")]
    TamperedBlock { index: u64, hash: String },

    #[error("Chain integrity invalid: {reason}")]
    ChainIntegrityInvalid { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl LedgerError {
    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        LedgerError::NotFound { what: what.into() }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        LedgerError::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl ReportableError for LedgerError {
    fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Chain(e) => e.kind(),
            LedgerError::Quorum(e) => e.kind(),
            LedgerError::Registry(e) => e.kind(),
            LedgerError::Config(e) => e.kind(),
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::SubmissionCapExceeded { .. } => ErrorKind::SubmissionCapExceeded,
            LedgerError::AlreadySubmitted { .. } => ErrorKind::AlreadySubmitted,
            LedgerError::TamperedBlock { .. } => ErrorKind::TamperedBlock,
            LedgerError::ChainIntegrityInvalid { .. } => ErrorKind::ChainIntegrityInvalid,
            LedgerError::InvalidInput { .. } => ErrorKind::InvalidInput,
        }
    }
}

/// Result type for ledger service operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Count an error surfaced to a caller.
pub(crate) fn count_error(err: &LedgerError) {
    ledger_telemetry::metric_inc!(LEDGER_ERRORS, &[err.kind().as_str()]);
}
