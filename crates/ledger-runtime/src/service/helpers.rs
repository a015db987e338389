//! Classification of block rows against the committed ledger.

use dl_01_chain_store::{ChainStoreApi, ChainStoreError, LedgerFile};
use shared_types::{BlockRow, LedgerBlock};
use std::collections::HashSet;

use super::LedgerService;
use crate::error::LedgerResult;
use crate::registry::RecordRegistry;

/// Tip and committed hashes of the ledger at one point in time.
pub(crate) struct ChainView {
    tip: LedgerBlock,
    committed: HashSet<String>,
}

impl ChainView {
    /// `None` for an empty ledger.
    pub(crate) fn new(chain: Vec<LedgerBlock>) -> Option<Self> {
        let committed = chain.iter().map(|b| b.hash.clone()).collect();
        let tip = chain.into_iter().last()?;
        Some(Self { tip, committed })
    }

    pub(crate) fn tip(&self) -> &LedgerBlock {
        &self.tip
    }

    /// A pending row the ledger has moved past.
    ///
    /// Its parent is no longer the tip and the block itself was never
    /// appended, so no quorum can commit it.
    pub(crate) fn is_stale(&self, row: &BlockRow) -> bool {
        !row.approved
            && row.previous_hash() != self.tip.hash
            && !self.committed.contains(&row.block.hash)
    }
}

impl<R, F> LedgerService<R, F>
where
    R: RecordRegistry,
    F: LedgerFile,
{
    /// Snapshot of the ledger; `Uninitialized` when it holds no blocks.
    pub(crate) fn chain_view(&self) -> LedgerResult<ChainView> {
        ChainView::new(self.chain.load()?).ok_or_else(|| ChainStoreError::Uninitialized.into())
    }
}
