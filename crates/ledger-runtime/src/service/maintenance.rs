//! Genesis setup, reconciliation and explicit re-initialization.

use dl_01_chain_store::{ChainStoreApi, LedgerFile};
use shared_types::{AcademicRecord, BlockId, LedgerBlock, Owner, RecordId};

use super::{GenesisReport, LedgerService};
use crate::error::{count_error, LedgerError, LedgerResult};
use crate::registry::RecordRegistry;

impl<R, F> LedgerService<R, F>
where
    R: RecordRegistry,
    F: LedgerFile,
{
    /// Make sure both the ledger file and the registry start with genesis.
    ///
    /// Idempotent. Both projections come from one [`LedgerBlock::genesis`]
    /// value, so their hash and payload are identical. Ends with a
    /// [`reconcile`](Self::reconcile) pass.
    pub async fn initialize_genesis(&self) -> LedgerResult<GenesisReport> {
        self.initialize_genesis_inner()
            .await
            .inspect_err(count_error)
    }

    async fn initialize_genesis_inner(&self) -> LedgerResult<GenesisReport> {
        let genesis = LedgerBlock::genesis();

        let ledger_created = self.chain.initialize_if_empty()?;
        let first = self.chain.load()?.into_iter().next();
        if first.as_ref() != Some(&genesis) {
            tracing::error!(
                "[runtime] ❌ Ledger does not start with the canonical genesis block"
            );
            return Err(LedgerError::ChainIntegrityInvalid {
                reason: "ledger does not start with the canonical genesis block".into(),
            });
        }

        let registry_seeded = self.seed_registry_genesis(&genesis).await?;
        let reconciled = self.reconcile().await?;

        if ledger_created || registry_seeded {
            tracing::info!(
                block_hash = %genesis.hash,
                "[runtime] 🌱 Genesis initialized (ledger: {}, registry: {})",
                ledger_created,
                registry_seeded
            );
        } else {
            tracing::debug!("[runtime] Genesis already present");
        }

        Ok(GenesisReport {
            genesis_hash: genesis.hash,
            ledger_created,
            registry_seeded,
            reconciled,
        })
    }

    async fn seed_registry_genesis(&self, genesis: &LedgerBlock) -> LedgerResult<bool> {
        if let Some(row) = self.registry.block_row_for_record(RecordId::GENESIS).await? {
            if &row.block != genesis {
                return Err(LedgerError::ChainIntegrityInvalid {
                    reason: format!(
                        "registry genesis row {} differs from the ledger genesis block",
                        row.id
                    ),
                });
            }
            return Ok(false);
        }

        let owner = Owner::genesis();
        if self.registry.owner(&owner.id).await?.is_none() {
            self.registry.insert_owner(owner).await?;
        }
        if self.registry.record(RecordId::GENESIS).await?.is_none() {
            self.registry.insert_record(AcademicRecord::genesis()).await?;
        }
        self.registry
            .insert_block_row(RecordId::GENESIS, genesis.clone(), true)
            .await?;
        Ok(true)
    }

    /// Flip pending rows whose block is already in the ledger file.
    ///
    /// Repairs a crash between the ledger append and the registry update.
    /// Returns the ids of the repaired rows.
    pub async fn reconcile(&self) -> LedgerResult<Vec<BlockId>> {
        let chain = self.chain.load()?;
        let mut repaired = Vec::new();

        for row in self.registry.block_rows().await? {
            if row.approved || !chain.iter().any(|block| block == &row.block) {
                continue;
            }
            self.registry.mark_block_approved(row.id).await?;
            tracing::warn!(
                block_index = row.block.index,
                block_hash = %row.block.hash,
                "[runtime] 🔧 Block {} was committed to the ledger but still pending; marked approved",
                row.id
            );
            repaired.push(row.id);
        }

        Ok(repaired)
    }

    /// Discard the ledger file and write a fresh genesis.
    ///
    /// Explicit operator action only. Registry rows are left as they are.
    pub async fn reinitialize_ledger(&self) -> LedgerResult<()> {
        let committed = self
            .registry
            .block_rows()
            .await?
            .iter()
            .filter(|row| row.approved && row.record_id != RecordId::GENESIS)
            .count();

        self.chain.reinitialize()?;
        tracing::warn!(
            "[runtime] ♻️ Ledger re-initialized; {} committed registry rows no longer have a ledger entry",
            committed
        );
        Ok(())
    }
}
