//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the Chain Store service.

use crate::domain::errors::ChainStoreError;

/// Whole-document storage for the ledger file.
///
/// Production: `JsonLedgerFile` (temp file + rename, process lock)
/// Testing: `InMemoryLedgerFile`
pub trait LedgerFile: Send + Sync {
    /// Current content, or `None` when the document does not exist.
    fn read(&self) -> Result<Option<Vec<u8>>, ChainStoreError>;

    /// Replace the whole document.
    ///
    /// Readers observe either the old or the new content, never a mix.
    fn replace(&self, content: &[u8]) -> Result<(), ChainStoreError>;

    /// Human-readable location for logs.
    fn location(&self) -> String;
}
