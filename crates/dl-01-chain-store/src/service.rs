//! # Chain Store Service
//!
//! Owns the ledger file and enforces the append rules.
//!
//! ## Critical Section
//!
//! `append`, `initialize_if_empty` and `reinitialize` run under one write
//! mutex spanning "read tip, validate, replace". Reads (`load`, `tip`,
//! `find`) take no lock: the file adapter replaces the document atomically,
//! so a reader never sees a partial write.

use crate::domain::chain::{check_append, find_violation};
use crate::domain::codec::{decode_chain, encode_chain};
use crate::domain::errors::ChainStoreError;
use crate::ports::inbound::ChainStoreApi;
use crate::ports::outbound::LedgerFile;
use parking_lot::Mutex;
use shared_types::LedgerBlock;

#[cfg(feature = "locking")]
use crate::adapters::JsonLedgerFile;

/// The Chain Store Service.
pub struct ChainStore<F: LedgerFile> {
    file: F,
    write_lock: Mutex<()>,
}

impl<F: LedgerFile> ChainStore<F> {
    pub fn new(file: F) -> Self {
        Self {
            file,
            write_lock: Mutex::new(()),
        }
    }

    /// Access the underlying file adapter.
    pub fn file(&self) -> &F {
        &self.file
    }

    /// Index of the first invalid block in the stored ledger, if any.
    pub fn first_violation(&self) -> Result<Option<usize>, ChainStoreError> {
        let chain = self.load()?;
        let violation = find_violation(&chain);
        if let Some(index) = violation {
            tracing::warn!(
                block_index = index,
                "[dl-01] ⚠️ Chain audit failed at index {} of {}",
                index,
                self.file.location()
            );
        }
        Ok(violation)
    }

    fn write_chain(&self, chain: &[LedgerBlock]) -> Result<(), ChainStoreError> {
        let bytes = encode_chain(chain)?;
        self.file.replace(&bytes)
    }
}

#[cfg(feature = "locking")]
impl ChainStore<JsonLedgerFile> {
    /// Open (and lock) the JSON ledger at `path`.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ChainStoreError> {
        Ok(Self::new(JsonLedgerFile::open(path)?))
    }
}

impl<F: LedgerFile> ChainStoreApi for ChainStore<F> {
    fn load(&self) -> Result<Vec<LedgerBlock>, ChainStoreError> {
        match self.file.read()? {
            None => Ok(Vec::new()),
            Some(bytes) => decode_chain(&bytes).inspect_err(|e| {
                tracing::error!("[dl-01] ❌ Cannot decode {}: {}", self.file.location(), e);
            }),
        }
    }

    fn tip(&self) -> Result<LedgerBlock, ChainStoreError> {
        self.load()?.pop().ok_or(ChainStoreError::Uninitialized)
    }

    fn append(&self, block: LedgerBlock) -> Result<(), ChainStoreError> {
        let _guard = self.write_lock.lock();

        let mut chain = self.load()?;
        if let Err(e) = check_append(chain.last(), &block) {
            tracing::warn!(
                block_index = block.index,
                block_hash = %block.hash,
                "[dl-01] ⛔ Append rejected: {}",
                e
            );
            return Err(e);
        }

        let (index, hash) = (block.index, block.hash.clone());
        chain.push(block);
        self.write_chain(&chain)?;

        tracing::info!(
            block_index = index,
            block_hash = %hash,
            "[dl-01] 📦 Appended block #{} to {}",
            index,
            self.file.location()
        );
        Ok(())
    }

    fn initialize_if_empty(&self) -> Result<bool, ChainStoreError> {
        let _guard = self.write_lock.lock();

        if !self.load()?.is_empty() {
            return Ok(false);
        }

        let genesis = LedgerBlock::genesis();
        self.write_chain(std::slice::from_ref(&genesis))?;
        tracing::info!(
            block_hash = %genesis.hash,
            "[dl-01] 🌱 Wrote genesis block to {}",
            self.file.location()
        );
        Ok(true)
    }

    fn reinitialize(&self) -> Result<(), ChainStoreError> {
        let _guard = self.write_lock.lock();

        let previous = self.file.read()?.map(|b| b.len()).unwrap_or(0);
        self.write_chain(&[LedgerBlock::genesis()])?;
        tracing::warn!(
            "[dl-01] ♻️ Ledger {} re-initialized to genesis (discarded {} bytes)",
            self.file.location(),
            previous
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLedgerFile;
    use crate::domain::chain::verify_chain;
    use crate::test_utils::make_test_block;
    use std::sync::Arc;

    fn store() -> (ChainStore<InMemoryLedgerFile>, InMemoryLedgerFile) {
        let file = InMemoryLedgerFile::new();
        (ChainStore::new(file.clone()), file)
    }

    #[test]
    fn test_missing_file_is_uninitialized() {
        let (store, _) = store();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.tip(), Err(ChainStoreError::Uninitialized));
    }

    #[test]
    fn test_initialize_if_empty_is_idempotent() {
        let (store, file) = store();
        assert!(store.initialize_if_empty().unwrap());
        let first = file.snapshot();
        assert!(!store.initialize_if_empty().unwrap());
        assert_eq!(file.snapshot(), first);
        assert_eq!(store.load().unwrap(), vec![LedgerBlock::genesis()]);
    }

    #[test]
    fn test_append_links_to_tip() {
        let (store, _) = store();
        store.initialize_if_empty().unwrap();
        let tip = store.tip().unwrap();

        let block = make_test_block(&tip, 1);
        store.append(block.clone()).unwrap();

        let chain = store.load().unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[1].previous_hash, tip.hash);
        assert!(verify_chain(&chain));
    }

    #[test]
    fn test_append_on_stale_tip_rejected() {
        let (store, _) = store();
        store.initialize_if_empty().unwrap();
        let genesis = store.tip().unwrap();

        store.append(make_test_block(&genesis, 1)).unwrap();
        let stale = make_test_block(&genesis, 2);

        assert!(matches!(
            store.append(stale),
            Err(ChainStoreError::ChainIntegrityInvalid { .. })
        ));
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_empty_store_requires_index_zero() {
        let (store, _) = store();
        let block = make_test_block(&LedgerBlock::genesis(), 1);
        assert!(matches!(
            store.append(block),
            Err(ChainStoreError::ChainIntegrityInvalid { .. })
        ));
    }

    #[test]
    fn test_corrupted_file_is_never_overwritten_implicitly() {
        let file = InMemoryLedgerFile::with_content(&b"[{\"index\": 0"[..]);
        let store = ChainStore::new(file.clone());

        assert!(matches!(store.load(), Err(ChainStoreError::CorruptedLedgerFile { .. })));
        assert!(matches!(
            store.initialize_if_empty(),
            Err(ChainStoreError::CorruptedLedgerFile { .. })
        ));
        assert_eq!(file.snapshot().as_deref(), Some(&b"[{\"index\": 0"[..]));

        store.reinitialize().unwrap();
        assert_eq!(store.load().unwrap(), vec![LedgerBlock::genesis()]);
    }

    #[test]
    fn test_find_by_hash_and_record_id() {
        let (store, _) = store();
        store.initialize_if_empty().unwrap();
        let genesis = store.tip().unwrap();

        let by_hash = store.find(&genesis.hash).unwrap();
        let by_id = store.find("0").unwrap();
        assert_eq!(by_hash, Some(genesis.clone()));
        assert_eq!(by_hash, by_id);
        assert_eq!(store.find("404").unwrap(), None);
    }

    #[test]
    fn test_first_violation_reports_tampered_index() {
        let (store, file) = store();
        store.initialize_if_empty().unwrap();
        store.append(make_test_block(&store.tip().unwrap(), 1)).unwrap();

        let text = String::from_utf8(file.snapshot().unwrap()).unwrap();
        file.overwrite(text.replace("BSc Test", "PhD Test"));

        assert_eq!(store.first_violation().unwrap(), Some(1));
    }

    #[test]
    fn test_concurrent_appends_on_same_tip_yield_one_winner() {
        let (store, _) = store();
        store.initialize_if_empty().unwrap();
        let genesis = store.tip().unwrap();
        let store = Arc::new(store);

        let handles: Vec<_> = (1..=8)
            .map(|id| {
                let store = Arc::clone(&store);
                let block = make_test_block(&genesis, id);
                std::thread::spawn(move || store.append(block).is_ok())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(winners, 1);
        let chain = store.load().unwrap();
        assert_eq!(chain.len(), 2);
        assert!(verify_chain(&chain));
    }

    #[cfg(feature = "locking")]
    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blockchain.json");
        {
            let store = ChainStore::open(&path).unwrap();
            store.initialize_if_empty().unwrap();
            store.append(make_test_block(&store.tip().unwrap(), 1)).unwrap();
        }
        let store = ChainStore::open(&path).unwrap();
        let chain = store.load().unwrap();
        assert_eq!(chain.len(), 2);
        assert!(verify_chain(&chain));
    }
}
