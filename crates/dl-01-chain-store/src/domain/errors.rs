//! # Domain Errors
//!
//! Error types for the Chain Store subsystem.
//!
//! ## Design Principles
//!
//! - Each error maps to one chain invariant or one failure of the file
//! - A corrupted file is reported, never repaired here
//! - No panics in domain logic (use Result instead)

use shared_types::{ErrorKind, ReportableError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during chain store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainStoreError {
    /// The ledger holds no blocks (no genesis yet).
    #[error("Ledger is uninitialized: no genesis block")]
    Uninitialized,

    /// The ledger file exists but cannot be decoded.
    #[error("Ledger file is corrupted: {reason}")]
    CorruptedLedgerFile { reason: String },

    /// An append would break linkage, ordering or the block's own hash.
    #[error("Chain integrity violation: {reason}")]
    ChainIntegrityInvalid { reason: String },

    /// Reading or writing the ledger file failed.
    #[error("Ledger I/O error: {message}")]
    Io { message: String },

    /// Another process holds the ledger lock.
    #[error("Ledger {} is locked{}", path.display(), pid.map(|p| format!(" by process {p}")).unwrap_or_default())]
    LedgerLocked { path: PathBuf, pid: Option<u32> },
}

impl ChainStoreError {
    pub(crate) fn io(err: impl std::fmt::Display) -> Self {
        ChainStoreError::Io {
            message: err.to_string(),
        }
    }

    pub(crate) fn integrity(reason: impl Into<String>) -> Self {
        ChainStoreError::ChainIntegrityInvalid {
            reason: reason.into(),
        }
    }
}

impl ReportableError for ChainStoreError {
    fn kind(&self) -> ErrorKind {
        match self {
            ChainStoreError::Uninitialized => ErrorKind::Uninitialized,
            ChainStoreError::CorruptedLedgerFile { .. } => ErrorKind::CorruptedLedgerFile,
            ChainStoreError::ChainIntegrityInvalid { .. } => ErrorKind::ChainIntegrityInvalid,
            ChainStoreError::Io { .. } | ChainStoreError::LedgerLocked { .. } => ErrorKind::Storage,
        }
    }
}
