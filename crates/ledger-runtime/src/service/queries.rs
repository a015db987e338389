//! Read-only operations: verification, audit and derived status.

use dl_01_chain_store::{find_violation, verify_chain, ChainStoreApi, ChainStoreError, LedgerFile};
use dl_02_approval_quorum::ApprovalApi;
use ledger_telemetry::{metric_inc, TAMPER_DETECTED, VERIFICATIONS};
use shared_types::{ApprovalVote, ApproverId, LedgerBlock, RecordId};

use super::{ChainAudit, LedgerService, PendingBlock, RecordStatus, VerificationResult};
use crate::error::{count_error, LedgerError, LedgerResult};
use crate::registry::RecordRegistry;

impl<R, F> LedgerService<R, F>
where
    R: RecordRegistry,
    F: LedgerFile,
{
    /// Look up a committed block by hash or record id and check its hash.
    ///
    /// Reads the ledger file only; the registry is never consulted.
    ///
    /// ## Errors
    ///
    /// - `InvalidInput`: blank identifier
    /// - `Uninitialized`: the ledger is absent or empty
    /// - `CorruptedLedgerFile`: the ledger cannot be decoded
    /// - `NotFound`: no block matches
    /// - `TamperedBlock`: the matching block's stored hash does not verify
    pub async fn verify(&self, identifier: &str) -> LedgerResult<VerificationResult> {
        let result = self.verify_inner(identifier.trim());
        let outcome = match &result {
            Ok(_) => "verified",
            Err(LedgerError::NotFound { .. }) => "not_found",
            Err(LedgerError::TamperedBlock { .. }) => "tampered",
            Err(_) => "error",
        };
        metric_inc!(VERIFICATIONS, &[outcome]);
        result.inspect_err(count_error)
    }

    fn verify_inner(&self, identifier: &str) -> LedgerResult<VerificationResult> {
        if identifier.is_empty() {
            return Err(LedgerError::invalid("identifier must not be empty"));
        }

        let chain = self.chain.load()?;
        if chain.is_empty() {
            return Err(ChainStoreError::Uninitialized.into());
        }

        let block = chain
            .iter()
            .find(|block| block.matches_identifier(identifier))
            .ok_or_else(|| LedgerError::not_found(format!("Hash or degree id '{identifier}'")))?;

        if !block.is_valid() {
            metric_inc!(TAMPER_DETECTED);
            tracing::warn!(
                block_index = block.index,
                block_hash = %block.hash,
                "[runtime] 🚨 Block {} failed verification: stored hash does not match its fields",
                block.index
            );
            return Err(LedgerError::TamperedBlock {
                index: block.index,
                hash: block.hash.clone(),
            });
        }

        tracing::debug!(block_index = block.index, "[runtime] Verified block {}", block.index);
        Ok(VerificationResult::from_block(block))
    }

    /// The committed ledger, in order.
    pub async fn get_chain(&self) -> LedgerResult<Vec<LedgerBlock>> {
        Ok(self.chain.load()?)
    }

    /// Check every block's self-hash, the linkage and the genesis block.
    pub async fn audit_chain(&self) -> LedgerResult<ChainAudit> {
        let chain = self.chain.load()?;
        let first_invalid_index = find_violation(&chain);
        let valid = verify_chain(&chain);

        if let Some(index) = first_invalid_index {
            if chain.get(index).is_some_and(|b| !b.is_valid()) {
                metric_inc!(TAMPER_DETECTED);
            }
            tracing::warn!(
                block_index = index,
                "[runtime] 🚨 Chain audit failed at block {} of {}",
                index,
                chain.len()
            );
        } else {
            tracing::info!("[runtime] 🔍 Chain audit passed ({} blocks)", chain.len());
        }

        Ok(ChainAudit {
            length: chain.len(),
            valid,
            first_invalid_index,
        })
    }

    /// Status of a record derived from its block row and current votes.
    pub async fn record_status(&self, record_id: RecordId) -> LedgerResult<RecordStatus> {
        if self.registry.record(record_id).await?.is_none() {
            return Err(LedgerError::not_found(format!("Degree {record_id}")));
        }

        let Some(row) = self.registry.block_row_for_record(record_id).await? else {
            return Ok(RecordStatus::NotSubmitted);
        };

        if row.approved {
            return Ok(RecordStatus::Committed {
                block_id: row.id,
                index: row.block.index,
                hash: row.block.hash,
            });
        }

        if self.chain_view()?.is_stale(&row) {
            return Ok(RecordStatus::Stale {
                block_id: row.id,
                previous_hash: row.block.previous_hash,
            });
        }

        Ok(RecordStatus::Pending {
            block_id: row.id,
            affirmative: self.quorum.tally(row.id).await?,
        })
    }

    /// Blocks awaiting approval, newest first. Stale blocks are left out.
    pub async fn pending_blocks(&self) -> LedgerResult<Vec<PendingBlock>> {
        let rows = self.registry.block_rows().await?;
        if rows.iter().all(|row| row.approved) {
            return Ok(Vec::new());
        }

        let view = self.chain_view()?;
        let mut pending = Vec::new();
        for row in rows.iter().rev() {
            if row.approved || view.is_stale(row) {
                continue;
            }
            let affirmative = self.quorum.tally(row.id).await?;
            pending.push(PendingBlock::new(row, affirmative));
        }
        Ok(pending)
    }

    /// Every vote cast by one approver.
    pub async fn approver_votes(&self, approver_id: ApproverId) -> LedgerResult<Vec<ApprovalVote>> {
        if self.registry.approver(approver_id).await?.is_none() {
            return Err(LedgerError::not_found(format!("Approver {approver_id}")));
        }
        Ok(self.registry.votes_by_approver(approver_id).await?)
    }
}

