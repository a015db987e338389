//! # Chain Gateway Adapter
//!
//! Implements dl-02's `ChainGateway` over the dl-01 chain store.

use async_trait::async_trait;
use dl_01_chain_store::{ChainStore, ChainStoreApi, ChainStoreError, LedgerFile};
use dl_02_approval_quorum::{ChainGateway, QuorumError, QuorumResult};
use shared_types::LedgerBlock;
use std::sync::Arc;

pub struct ChainStoreGateway<F: LedgerFile> {
    store: Arc<ChainStore<F>>,
}

impl<F: LedgerFile> ChainStoreGateway<F> {
    pub fn new(store: Arc<ChainStore<F>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<F: LedgerFile> ChainGateway for ChainStoreGateway<F> {
    async fn tip_hash(&self) -> QuorumResult<String> {
        self.store
            .tip()
            .map(|tip| tip.hash)
            .map_err(chain_to_quorum)
    }

    async fn append(&self, block: LedgerBlock) -> QuorumResult<()> {
        self.store.append(block).map_err(chain_to_quorum)
    }
}

pub(crate) fn chain_to_quorum(err: ChainStoreError) -> QuorumError {
    match err {
        ChainStoreError::Uninitialized => QuorumError::Uninitialized,
        ChainStoreError::CorruptedLedgerFile { reason } => QuorumError::CorruptedLedger { reason },
        ChainStoreError::ChainIntegrityInvalid { reason } => {
            QuorumError::ChainIntegrityInvalid { reason }
        }
        other @ (ChainStoreError::Io { .. } | ChainStoreError::LedgerLocked { .. }) => {
            QuorumError::Storage {
                reason: other.to_string(),
            }
        }
    }
}
