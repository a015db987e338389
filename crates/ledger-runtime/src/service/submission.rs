//! Registration, submission and approval.

use dl_01_chain_store::LedgerFile;
use dl_02_approval_quorum::{ApprovalApi, QuorumError, VoteOutcome, VoteRequest};
use ledger_telemetry::{metric_inc, BLOCKS_COMMITTED, SUBMISSIONS, VOTES_RECORDED};
use shared_types::{
    AcademicRecord, Approver, ApproverId, BlockId, BlockRow, LedgerBlock, Owner, OwnerId, RecordId,
    DEFAULT_NONCE,
};

use super::{LedgerService, NewRecord};
use crate::error::{count_error, LedgerError, LedgerResult};
use crate::registry::{RecordDraft, RecordRegistry};

fn require_text(field: &str, value: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

impl<R, F> LedgerService<R, F>
where
    R: RecordRegistry,
    F: LedgerFile,
{
    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Register a record owner (student).
    pub async fn register_owner(&self, owner: Owner) -> LedgerResult<Owner> {
        require_text("student id", owner.id.as_str())?;
        require_text("full name", &owner.full_name)?;
        require_text("email", &owner.email)?;
        if owner.id == Owner::genesis().id {
            return Err(LedgerError::invalid(format!(
                "student id {} is reserved",
                owner.id
            )));
        }

        let owner = self.registry.insert_owner(owner).await?;
        tracing::info!("[runtime] 👤 Registered student {}", owner.id);
        Ok(owner)
    }

    /// Register a degree for an existing owner, stamped with the clock.
    pub async fn add_record(&self, record: NewRecord) -> LedgerResult<AcademicRecord> {
        require_text("degree name", &record.degree_name)?;
        require_text("institution", &record.institution)?;
        require_text("field of study", &record.field_of_study)?;
        self.require_owner(&record.owner_id).await?;

        let record = self
            .registry
            .create_record(RecordDraft {
                owner_id: record.owner_id,
                degree_name: record.degree_name,
                institution: record.institution,
                field_of_study: record.field_of_study,
                year_awarded: record.year_awarded,
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(
            "[runtime] 🎓 Registered degree {} for student {}",
            record.id,
            record.owner_id
        );
        Ok(record)
    }

    /// Register an approver identity.
    ///
    /// Registration alone grants nothing: only allow-listed usernames can
    /// complete a commit.
    pub async fn register_approver(&self, username: &str) -> LedgerResult<Approver> {
        require_text("username", username)?;
        let approver = self.registry.create_approver(username.trim()).await?;

        if self.config.allow_list().contains(&approver.username) {
            tracing::info!("[runtime] 🔑 Registered approver {}", approver.username);
        } else {
            tracing::warn!(
                "[runtime] ⚠️ Approver {} is not on the allow-list; their approvals will block commits",
                approver.username
            );
        }
        Ok(approver)
    }

    /// Look up an approver by username.
    pub async fn find_approver(&self, username: &str) -> LedgerResult<Approver> {
        self.registry
            .approver_by_username(username.trim())
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("Approver '{}'", username.trim())))
    }

    // =========================================================================
    // SUBMISSION
    // =========================================================================

    /// Create a pending block for `record_id` linked to the current ledger tip.
    ///
    /// Nothing is written to the ledger file until the quorum commits it. A
    /// record whose pending block went stale (another block was committed on
    /// its parent first) is rebuilt on the current tip under the same block
    /// id; votes cast on the stale block are dropped.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: unknown owner, or the record is not the owner's
    /// - `Uninitialized`: the ledger has no genesis block
    /// - `AlreadySubmitted`: the record is committed or pending on the tip
    /// - `SubmissionCapExceeded`: the owner has `submission_cap` live submissions
    pub async fn submit(&self, owner_id: &OwnerId, record_id: RecordId) -> LedgerResult<BlockRow> {
        self.submit_inner(owner_id, record_id)
            .await
            .inspect_err(count_error)
    }

    async fn submit_inner(&self, owner_id: &OwnerId, record_id: RecordId) -> LedgerResult<BlockRow> {
        let _guard = self.submit_lock.lock().await;

        self.require_owner(owner_id).await?;
        let record = self
            .registry
            .record(record_id)
            .await?
            .filter(|r| &r.owner_id == owner_id)
            .ok_or_else(|| {
                LedgerError::not_found(format!("Degree {record_id} of student {owner_id}"))
            })?;

        let view = self.chain_view()?;
        let stale = match self.registry.block_row_for_record(record_id).await? {
            Some(row) if view.is_stale(&row) => Some(row),
            Some(_) => return Err(LedgerError::AlreadySubmitted { record_id }),
            None => None,
        };

        // Committed rows and rows still pending on the tip count; stale ones do not
        let mut submitted = 0u32;
        for owned in self.registry.records_of(owner_id).await? {
            if owned.id == record_id {
                continue;
            }
            if let Some(row) = self.registry.block_row_for_record(owned.id).await? {
                if !view.is_stale(&row) {
                    submitted += 1;
                }
            }
        }
        if submitted >= self.config.submission_cap {
            tracing::info!(
                "[runtime] ⛔ Student {} reached the submission cap ({})",
                owner_id,
                self.config.submission_cap
            );
            return Err(LedgerError::SubmissionCapExceeded {
                owner: owner_id.clone(),
                cap: self.config.submission_cap,
            });
        }

        let tip = view.tip();
        let block = LedgerBlock::build(
            tip.index + 1,
            tip.hash.clone(),
            self.clock.now(),
            record.snapshot(),
            DEFAULT_NONCE,
        );
        let row = match stale {
            Some(stale) => {
                let row = self.registry.rebase_block_row(stale.id, block).await?;
                tracing::warn!(
                    block_index = row.block.index,
                    block_hash = %row.block.hash,
                    "[runtime] ♻️ Degree {} resubmitted: stale block {} rebuilt on tip #{}",
                    record_id,
                    row.id,
                    tip.index
                );
                row
            }
            None => {
                let row = self.registry.insert_block_row(record_id, block, false).await?;
                tracing::info!(
                    block_index = row.block.index,
                    block_hash = %row.block.hash,
                    "[runtime] 📝 Degree {} submitted as pending block {}",
                    record_id,
                    row.id
                );
                row
            }
        };

        metric_inc!(SUBMISSIONS);
        Ok(row)
    }

    // =========================================================================
    // APPROVAL
    // =========================================================================

    /// Cast one approver's vote; the vote completing the quorum commits.
    pub async fn cast_approval(
        &self,
        block_id: BlockId,
        approver_id: ApproverId,
        decision: bool,
        comment: Option<String>,
    ) -> LedgerResult<VoteOutcome> {
        let request = VoteRequest {
            block_id,
            approver_id,
            decision,
            comment: comment.filter(|c| !c.trim().is_empty()),
            cast_at: self.clock.now(),
        };

        match self.quorum.cast_vote(request).await {
            Ok(outcome) => {
                metric_inc!(VOTES_RECORDED);
                if outcome.is_committed() {
                    metric_inc!(BLOCKS_COMMITTED);
                }
                Ok(outcome)
            }
            Err(e) => {
                // Refused commits keep the vote that triggered them
                if matches!(
                    e,
                    QuorumError::UnauthorizedApprover { .. }
                        | QuorumError::ChainIntegrityInvalid { .. }
                ) {
                    metric_inc!(VOTES_RECORDED);
                }
                let err = LedgerError::from(e);
                count_error(&err);
                Err(err)
            }
        }
    }

    pub(crate) async fn require_owner(&self, owner_id: &OwnerId) -> LedgerResult<Owner> {
        self.registry
            .owner(owner_id)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("Student {owner_id}")))
    }
}
