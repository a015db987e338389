//! # In-Memory Ledger File
//!
//! Test double for [`LedgerFile`]. Clones share the same buffer, so a test
//! can keep a handle and inspect or tamper with what the service wrote.

use crate::domain::errors::ChainStoreError;
use crate::ports::outbound::LedgerFile;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerFile {
    content: Arc<RwLock<Option<Vec<u8>>>>,
}

impl InMemoryLedgerFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing document bytes.
    pub fn with_content(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: Arc::new(RwLock::new(Some(content.into()))),
        }
    }

    /// Raw document, bypassing the service.
    pub fn snapshot(&self) -> Option<Vec<u8>> {
        self.content.read().clone()
    }

    /// Overwrite the raw document, bypassing the service.
    pub fn overwrite(&self, content: impl Into<Vec<u8>>) {
        *self.content.write() = Some(content.into());
    }
}

impl LedgerFile for InMemoryLedgerFile {
    fn read(&self) -> Result<Option<Vec<u8>>, ChainStoreError> {
        Ok(self.content.read().clone())
    }

    fn replace(&self, content: &[u8]) -> Result<(), ChainStoreError> {
        *self.content.write() = Some(content.to_vec());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
