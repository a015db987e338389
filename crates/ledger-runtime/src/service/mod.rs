//! # Ledger Service
//!
//! Orchestrates the chain store, the approval quorum and the record registry.
//!
//! ## Flow
//!
//! ```text
//! add_record ──→ submit ──→ pending BlockRow (registry only)
//!                               │
//!                    cast_approval × threshold
//!                               │
//!                  ApprovalQuorum commits: ledger append, then row flip
//!                               │
//!                verify(identifier) reads the ledger file only
//! ```
//!
//! The block built at submission is the block appended at commit; the
//! registry row and the ledger entry never diverge. A pending row whose
//! parent is no longer the tip is stale: it no longer counts toward the
//! submission cap, and resubmitting its record rebuilds it on the tip.

mod helpers;
mod maintenance;
mod queries;
mod submission;
pub mod types;

pub use types::{
    ChainAudit, GenesisReport, NewRecord, PendingBlock, RecordStatus, VerificationResult,
};

use dl_01_chain_store::{ChainStore, InMemoryLedgerFile, JsonLedgerFile, LedgerFile};
use dl_02_approval_quorum::ApprovalQuorum;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::adapters::{ChainStoreGateway, RegistryBallotBox, SystemTimeSource, TimeSource};
use crate::config::LedgerConfig;
use crate::error::LedgerResult;
use crate::registry::{InMemoryRegistry, JsonFileRegistry, RecordRegistry};

/// Service over the on-disk ledger and registry document.
pub type FileLedgerService = LedgerService<JsonFileRegistry, JsonLedgerFile>;

/// Service over in-memory adapters.
pub type InMemoryLedgerService = LedgerService<InMemoryRegistry, InMemoryLedgerFile>;

/// The Ledger Service.
pub struct LedgerService<R, F>
where
    R: RecordRegistry,
    F: LedgerFile,
{
    pub(crate) config: LedgerConfig,
    pub(crate) registry: Arc<R>,
    pub(crate) chain: Arc<ChainStore<F>>,
    pub(crate) quorum: ApprovalQuorum<RegistryBallotBox<R>, ChainStoreGateway<F>>,
    pub(crate) clock: Arc<dyn TimeSource>,
    /// Serializes submissions so the cap and duplicate checks hold.
    pub(crate) submit_lock: Mutex<()>,
}

impl<R, F> LedgerService<R, F>
where
    R: RecordRegistry,
    F: LedgerFile,
{
    /// Wire a service over the given adapters.
    ///
    /// Fails with `Config` when the configuration does not validate.
    pub fn new(
        config: LedgerConfig,
        registry: Arc<R>,
        chain: Arc<ChainStore<F>>,
        clock: Arc<dyn TimeSource>,
    ) -> LedgerResult<Self> {
        config.validate()?;

        let quorum = ApprovalQuorum::new(
            config.quorum(),
            Arc::new(RegistryBallotBox::new(Arc::clone(&registry))),
            Arc::new(ChainStoreGateway::new(Arc::clone(&chain))),
        );

        tracing::debug!(
            threshold = config.quorum_threshold,
            approvers = config.approvers.len(),
            "[runtime] Ledger service wired"
        );

        Ok(Self {
            config,
            registry,
            chain,
            quorum,
            clock,
            submit_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    pub fn chain_store(&self) -> &Arc<ChainStore<F>> {
        &self.chain
    }

    pub fn quorum(&self) -> &ApprovalQuorum<RegistryBallotBox<R>, ChainStoreGateway<F>> {
        &self.quorum
    }
}

impl FileLedgerService {
    /// Open the ledger file and registry document named by `config`.
    ///
    /// The ledger file stays locked until the service is dropped. The
    /// registry document is read only after the lock is held, so a process
    /// waiting on the lock never starts from a stale copy.
    pub fn open(config: LedgerConfig) -> LedgerResult<Self> {
        config.validate()?;
        let chain = Arc::new(ChainStore::new(JsonLedgerFile::open(&config.ledger_path)?));
        let registry = Arc::new(JsonFileRegistry::open(&config.registry_path)?);
        Self::new(config, registry, chain, Arc::new(SystemTimeSource))
    }
}

impl InMemoryLedgerService {
    pub fn in_memory(config: LedgerConfig, clock: Arc<dyn TimeSource>) -> LedgerResult<Self> {
        Self::new(
            config,
            Arc::new(InMemoryRegistry::new()),
            Arc::new(ChainStore::new(InMemoryLedgerFile::new())),
            clock,
        )
    }
}
