//! # Ledger Flows
//!
//! Genesis, submission, the quorum commit and verification end to end.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{student, Ledger};
    use dl_01_chain_store::ChainStoreApi;
    use dl_02_approval_quorum::{QuorumState, VoteOutcome};
    use ledger_runtime::{FileLedgerService, LedgerConfig, RecordRegistry, RecordStatus};
    use shared_types::{ErrorKind, LedgerBlock, RecordId, ReportableError};

    // =========================================================================
    // GENESIS
    // =========================================================================

    #[tokio::test]
    async fn test_genesis_identical_in_registry_and_ledger() {
        let ledger = Ledger::start().await.unwrap();
        ledger.service.initialize_genesis().await.unwrap();

        let chain = ledger.service.get_chain().await.unwrap();
        let rows = ledger.service.registry().block_rows().await.unwrap();

        assert_eq!(chain, vec![LedgerBlock::genesis()]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].block, chain[0]);
        assert_eq!(
            chain[0].hash,
            "deac4bfbd4186f406421fbd795a9d3688e29f4ffe28ab273bcb37e45102ed547"
        );
    }

    #[tokio::test]
    async fn test_verify_genesis_by_hash_equals_by_id() {
        let ledger = Ledger::start().await.unwrap();
        let genesis = LedgerBlock::genesis();

        let by_hash = ledger.service.verify(&genesis.hash).await.unwrap();
        let by_id = ledger.service.verify("0").await.unwrap();
        assert_eq!(by_hash, by_id);
        assert_eq!(by_id.student_id.as_deref(), Some("GENESIS_STUDENT"));
    }

    // =========================================================================
    // SUBMIT → APPROVE → VERIFY
    // =========================================================================

    #[tokio::test]
    async fn test_submission_to_commit_scenario() {
        let ledger = Ledger::start().await.unwrap();
        let h0 = ledger.service.chain_store().tip().unwrap().hash;

        let record = ledger.enroll("S-2025-001", "BEng Civil").await.unwrap();
        ledger.clock.advance(60);
        let b1 = ledger
            .service
            .submit(&record.owner_id, record.id)
            .await
            .unwrap();
        assert_eq!(b1.previous_hash(), h0);

        let first = ledger
            .service
            .cast_approval(b1.id, ledger.admins[0].id, true, None)
            .await
            .unwrap();
        let second = ledger
            .service
            .cast_approval(b1.id, ledger.admins[1].id, true, None)
            .await
            .unwrap();
        assert_eq!(
            second,
            VoteOutcome::Recorded {
                state: QuorumState::PartiallyApproved(2)
            }
        );
        assert!(!first.is_committed());
        assert_eq!(ledger.service.get_chain().await.unwrap().len(), 1);

        ledger.clock.advance(3600);
        let third = ledger
            .service
            .cast_approval(b1.id, ledger.admins[2].id, true, None)
            .await
            .unwrap();
        assert!(third.is_committed());

        let chain = ledger.service.get_chain().await.unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[1].previous_hash, h0);
        // Committed block keeps its submission timestamp
        assert_eq!(chain[1].timestamp, "2025-06-01T09:31:00");

        let verified = ledger.service.verify(&b1.block.hash).await.unwrap();
        assert_eq!(verified.record_id.as_deref(), Some("1"));
        assert_eq!(verified.student_id.as_deref(), Some("S-2025-001"));
        assert_eq!(verified.degree_name.as_deref(), Some("BEng Civil"));
        assert_eq!(verified.institution.as_deref(), Some("University of Testing"));
        assert_eq!(verified.index, 1);
        assert_eq!(ledger.service.verify("1").await.unwrap(), verified);
    }

    #[tokio::test]
    async fn test_chain_grows_in_commit_order() {
        let ledger = Ledger::start().await.unwrap();

        for (n, id) in ["S-1", "S-2", "S-3"].iter().enumerate() {
            let record = ledger.enroll(id, "BSc").await.unwrap();
            let row = ledger.service.submit(&record.owner_id, record.id).await.unwrap();
            assert_eq!(row.block.index, n as u64 + 1);
            ledger.approve_by_all(row.id).await.unwrap();
        }

        let audit = ledger.service.audit_chain().await.unwrap();
        assert!(audit.valid);
        assert_eq!(audit.length, 4);
    }

    #[tokio::test]
    async fn test_duplicate_vote_leaves_tally() {
        let ledger = Ledger::start().await.unwrap();
        let record = ledger.enroll("S-9", "BA").await.unwrap();
        let row = ledger.service.submit(&record.owner_id, record.id).await.unwrap();
        let admin = ledger.admins[0].id;

        ledger.service.cast_approval(row.id, admin, true, None).await.unwrap();
        let err = ledger
            .service
            .cast_approval(row.id, admin, true, None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateVote);
        assert_eq!(
            ledger.service.record_status(record.id).await.unwrap(),
            RecordStatus::Pending {
                block_id: row.id,
                affirmative: 1
            }
        );
    }

    #[tokio::test]
    async fn test_unauthorized_approver_keeps_ledger_length() {
        let ledger = Ledger::start().await.unwrap();
        let eve = ledger.service.register_approver("eve").await.unwrap();
        let record = ledger.enroll("S-4", "BSc").await.unwrap();
        let row = ledger.service.submit(&record.owner_id, record.id).await.unwrap();

        for approver in [ledger.admins[0].id, ledger.admins[1].id] {
            ledger.service.cast_approval(row.id, approver, true, None).await.unwrap();
        }
        let err = ledger
            .service
            .cast_approval(row.id, eve.id, true, None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnauthorizedApprover);
        assert_eq!(ledger.service.get_chain().await.unwrap().len(), 1);
        let report = err.report();
        assert!(report.message.contains("eve"));
    }

    #[tokio::test]
    async fn test_submission_cap_per_student() {
        let config = LedgerConfig::default().with_submission_cap(2);
        let ledger = Ledger::with_config(config).await.unwrap();

        let mut rows = Vec::new();
        for name in ["BSc", "MSc", "PhD"] {
            let record = ledger.enroll("S-5", name).await.unwrap();
            rows.push(ledger.service.submit(&record.owner_id, record.id).await);
        }

        assert!(rows[0].is_ok() && rows[1].is_ok());
        assert_eq!(
            rows[2].as_ref().unwrap_err().kind(),
            ErrorKind::SubmissionCapExceeded
        );
    }

    #[tokio::test]
    async fn test_status_of_unknown_record() {
        let ledger = Ledger::start().await.unwrap();
        let err = ledger.service.record_status(RecordId(77)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // =========================================================================
    // ON DISK
    // =========================================================================

    #[tokio::test]
    async fn test_ledger_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let ledger_path = dir.path().join("blockchain.json");
        let config = LedgerConfig::default()
            .with_ledger_path(&ledger_path)
            .with_registry_path(dir.path().join("registry.json"));

        let service = FileLedgerService::open(config).unwrap();
        service.initialize_genesis().await.unwrap();
        service.register_owner(student("S-6", "Grace Hopper")).await.unwrap();

        let text = std::fs::read_to_string(&ledger_path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        let block = &parsed[0];
        let keys: Vec<_> = block.as_object().unwrap().keys().cloned().collect();

        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert!(keys.iter().all(|k| {
            ["index", "previous_hash", "timestamp", "data", "nonce", "hash"].contains(&k.as_str())
        }));
        assert_eq!(block["nonce"], 0);
        assert_eq!(block["previous_hash"].as_str().unwrap(), "0".repeat(64));
        assert!(dir.path().join("blockchain.lock").exists());
    }
}
