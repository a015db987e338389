//! Shared builders for the integration scenarios.

use std::sync::Arc;

use dl_02_approval_quorum::VoteOutcome;
use ledger_runtime::{
    FixedTimeSource, InMemoryLedgerService, LedgerConfig, LedgerError, LedgerResult, NewRecord,
    RecordRegistry,
};
use shared_types::{parse_timestamp, AcademicRecord, Approver, BlockId, Owner, OwnerId};

pub const ADMINS: [&str; 3] = ["admin1", "admin2", "admin3"];

pub fn clock() -> Arc<FixedTimeSource> {
    let start = parse_timestamp("2025-06-01T09:30:00").unwrap_or_default();
    Arc::new(FixedTimeSource::new(start))
}

pub fn student(id: &str, name: &str) -> Owner {
    Owner {
        id: OwnerId::new(id),
        full_name: name.to_string(),
        email: format!("{}@university.example", id.to_lowercase()),
    }
}

pub fn degree(owner: &str, name: &str, field: &str) -> NewRecord {
    NewRecord {
        owner_id: OwnerId::new(owner),
        degree_name: name.to_string(),
        institution: "University of Testing".to_string(),
        field_of_study: field.to_string(),
        year_awarded: 2025,
    }
}

/// An initialized in-memory ledger with the default allow-list registered.
pub struct Ledger {
    pub service: InMemoryLedgerService,
    pub clock: Arc<FixedTimeSource>,
    pub admins: Vec<Approver>,
}

impl Ledger {
    pub async fn start() -> LedgerResult<Self> {
        Self::with_config(LedgerConfig::default()).await
    }

    pub async fn with_config(config: LedgerConfig) -> LedgerResult<Self> {
        let clock = clock();
        let service = InMemoryLedgerService::in_memory(config, clock.clone())?;
        service.initialize_genesis().await?;

        let mut admins = Vec::new();
        for name in ADMINS {
            admins.push(service.register_approver(name).await?);
        }
        Ok(Self {
            service,
            clock,
            admins,
        })
    }

    /// Register a student with one degree.
    pub async fn enroll(&self, id: &str, degree_name: &str) -> LedgerResult<AcademicRecord> {
        if self.service.registry().owner(&OwnerId::new(id)).await?.is_none() {
            self.service
                .register_owner(student(id, &format!("Student {id}")))
                .await?;
        }
        self.service
            .add_record(degree(id, degree_name, "Engineering"))
            .await
    }

    /// Every registered admin approves `block_id`; returns the last outcome.
    pub async fn approve_by_all(&self, block_id: BlockId) -> LedgerResult<VoteOutcome> {
        let mut outcome = None;
        for admin in &self.admins {
            outcome = Some(
                self.service
                    .cast_approval(block_id, admin.id, true, None)
                    .await?,
            );
        }
        outcome.ok_or_else(|| LedgerError::InvalidInput {
            reason: "no admins registered".into(),
        })
    }
}
