//! Registry document and its operations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shared_types::{
    AcademicRecord, ApprovalVote, Approver, ApproverId, BlockId, BlockRow, LedgerBlock, Owner,
    OwnerId, RecordId,
};

use super::{RegistryError, RegistryResult};

/// A record before the registry assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub owner_id: OwnerId,
    pub degree_name: String,
    pub institution: String,
    pub field_of_study: String,
    pub year_awarded: i32,
    pub created_at: NaiveDateTime,
}

/// Whole registry content. Rows keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    #[serde(default)]
    pub owners: Vec<Owner>,
    #[serde(default)]
    pub records: Vec<AcademicRecord>,
    #[serde(default)]
    pub approvers: Vec<Approver>,
    #[serde(default)]
    pub block_rows: Vec<BlockRow>,
    #[serde(default)]
    pub votes: Vec<ApprovalVote>,
}

impl RegistryState {
    pub fn owner(&self, id: &OwnerId) -> Option<&Owner> {
        self.owners.iter().find(|o| &o.id == id)
    }

    pub fn insert_owner(&mut self, owner: Owner) -> RegistryResult<Owner> {
        if self.owner(&owner.id).is_some() {
            return Err(RegistryError::conflict("owner", &owner.id));
        }
        self.owners.push(owner.clone());
        Ok(owner)
    }

    pub fn record(&self, id: RecordId) -> Option<&AcademicRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn records_of(&self, owner: &OwnerId) -> Vec<AcademicRecord> {
        self.records
            .iter()
            .filter(|r| &r.owner_id == owner)
            .cloned()
            .collect()
    }

    pub fn create_record(&mut self, draft: RecordDraft) -> RegistryResult<AcademicRecord> {
        if self.owner(&draft.owner_id).is_none() {
            return Err(RegistryError::not_found("owner", &draft.owner_id));
        }
        let next = self.records.iter().map(|r| r.id.0).max().unwrap_or(0) + 1;
        let record = AcademicRecord {
            id: RecordId(next),
            owner_id: draft.owner_id,
            degree_name: draft.degree_name,
            institution: draft.institution,
            field_of_study: draft.field_of_study,
            year_awarded: draft.year_awarded,
            created_at: draft.created_at,
        };
        self.records.push(record.clone());
        Ok(record)
    }

    pub fn insert_record(&mut self, record: AcademicRecord) -> RegistryResult<AcademicRecord> {
        if self.record(record.id).is_some() {
            return Err(RegistryError::conflict("record", record.id));
        }
        if self.owner(&record.owner_id).is_none() {
            return Err(RegistryError::not_found("owner", &record.owner_id));
        }
        self.records.push(record.clone());
        Ok(record)
    }

    pub fn approver(&self, id: ApproverId) -> Option<&Approver> {
        self.approvers.iter().find(|a| a.id == id)
    }

    pub fn approver_by_username(&self, username: &str) -> Option<&Approver> {
        self.approvers.iter().find(|a| a.username == username)
    }

    pub fn create_approver(&mut self, username: &str) -> RegistryResult<Approver> {
        if self.approver_by_username(username).is_some() {
            return Err(RegistryError::conflict("approver", username));
        }
        let next = self.approvers.iter().map(|a| a.id.0).max().unwrap_or(0) + 1;
        let approver = Approver {
            id: ApproverId(next),
            username: username.to_string(),
        };
        self.approvers.push(approver.clone());
        Ok(approver)
    }

    pub fn block_row(&self, id: BlockId) -> Option<&BlockRow> {
        self.block_rows.iter().find(|b| b.id == id)
    }

    pub fn block_row_for_record(&self, record_id: RecordId) -> Option<&BlockRow> {
        self.block_rows.iter().find(|b| b.record_id == record_id)
    }

    pub fn insert_block_row(
        &mut self,
        record_id: RecordId,
        block: LedgerBlock,
        approved: bool,
    ) -> RegistryResult<BlockRow> {
        if self.record(record_id).is_none() {
            return Err(RegistryError::not_found("record", record_id));
        }
        if self.block_row_for_record(record_id).is_some() {
            return Err(RegistryError::conflict("block row for record", record_id));
        }
        let next = self.block_rows.iter().map(|b| b.id.0).max().unwrap_or(0) + 1;
        let row = BlockRow {
            id: BlockId(next),
            record_id,
            block,
            approved,
        };
        self.block_rows.push(row.clone());
        Ok(row)
    }

    pub fn mark_block_approved(&mut self, id: BlockId) -> RegistryResult<()> {
        let row = self
            .block_rows
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| RegistryError::not_found("block", id))?;
        row.approved = true;
        Ok(())
    }

    pub fn rebase_block_row(&mut self, id: BlockId, block: LedgerBlock) -> RegistryResult<BlockRow> {
        let row = self
            .block_rows
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| RegistryError::not_found("block", id))?;
        if row.approved {
            return Err(RegistryError::conflict("approved block", id));
        }
        row.block = block;
        let row = row.clone();
        self.votes.retain(|v| v.block_id != id);
        Ok(row)
    }

    pub fn insert_vote(&mut self, vote: ApprovalVote) -> RegistryResult<()> {
        if self.block_row(vote.block_id).is_none() {
            return Err(RegistryError::not_found("block", vote.block_id));
        }
        if self.approver(vote.approver_id).is_none() {
            return Err(RegistryError::not_found("approver", vote.approver_id));
        }
        let duplicate = self
            .votes
            .iter()
            .any(|v| v.block_id == vote.block_id && v.approver_id == vote.approver_id);
        if duplicate {
            return Err(RegistryError::DuplicateVote {
                approver_id: vote.approver_id,
                block_id: vote.block_id,
            });
        }
        self.votes.push(vote);
        Ok(())
    }

    pub fn votes_for_block(&self, id: BlockId) -> Vec<ApprovalVote> {
        self.votes
            .iter()
            .filter(|v| v.block_id == id)
            .cloned()
            .collect()
    }

    pub fn votes_by_approver(&self, id: ApproverId) -> Vec<ApprovalVote> {
        self.votes
            .iter()
            .filter(|v| v.approver_id == id)
            .cloned()
            .collect()
    }
}
