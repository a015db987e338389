//! # Inbound Ports (Driving Ports)
//!
//! The primary API for the Chain Store subsystem.

use crate::domain::errors::ChainStoreError;
use shared_types::LedgerBlock;

/// Primary API for the Chain Store subsystem.
///
/// Every mutation runs inside one critical section covering
/// "read tip, validate, write".
pub trait ChainStoreApi: Send + Sync {
    /// Read and decode the whole ledger.
    ///
    /// ## Errors
    ///
    /// - `CorruptedLedgerFile`: content is not a block array
    /// - `Io`: the file could not be read
    fn load(&self) -> Result<Vec<LedgerBlock>, ChainStoreError>;

    /// Last committed block.
    ///
    /// ## Errors
    ///
    /// - `Uninitialized`: the ledger is absent or empty
    fn tip(&self) -> Result<LedgerBlock, ChainStoreError>;

    /// Append a block after the current tip.
    ///
    /// ## Errors
    ///
    /// - `ChainIntegrityInvalid`: linkage, index or self-hash check failed
    /// - `CorruptedLedgerFile`: the existing content cannot be decoded
    fn append(&self, block: LedgerBlock) -> Result<(), ChainStoreError>;

    /// Write a single-genesis ledger if the file is absent or empty.
    ///
    /// Returns `true` when genesis was written. A corrupted file is an
    /// error, never overwritten.
    fn initialize_if_empty(&self) -> Result<bool, ChainStoreError>;

    /// Discard the current content and start over from genesis.
    ///
    /// Only for explicit operator action; never called implicitly.
    fn reinitialize(&self) -> Result<(), ChainStoreError>;

    /// First block whose hash or stringified record id equals `identifier`.
    fn find(&self, identifier: &str) -> Result<Option<LedgerBlock>, ChainStoreError> {
        Ok(self
            .load()?
            .into_iter()
            .find(|block| block.matches_identifier(identifier)))
    }

    /// Number of blocks in the ledger.
    fn len(&self) -> Result<usize, ChainStoreError> {
        Ok(self.load()?.len())
    }

    /// Whether the ledger holds no blocks.
    fn is_empty(&self) -> Result<bool, ChainStoreError> {
        Ok(self.len()? == 0)
    }
}
