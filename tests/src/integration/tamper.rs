//! # Tamper Evidence
//!
//! Edits made to the ledger file behind the service's back, corrupted
//! files, explicit re-initialization and the reconcile pass.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::Ledger;
    use dl_01_chain_store::ChainStoreApi;
    use ledger_runtime::{ChainAudit, LedgerError, RecordStatus};
    use serde_json::json;
    use shared_types::{parse_timestamp, ErrorKind, LedgerBlock, ReportableError};

    /// Ledger with genesis plus one committed degree.
    async fn committed() -> (Ledger, LedgerBlock) {
        let ledger = Ledger::start().await.unwrap();
        let record = ledger.enroll("S-10", "BSc Chemistry").await.unwrap();
        let row = ledger
            .service
            .submit(&record.owner_id, record.id)
            .await
            .unwrap();
        ledger.approve_by_all(row.id).await.unwrap();
        (ledger, row.block)
    }

    fn rewrite(ledger: &Ledger, chain: &[LedgerBlock]) {
        let bytes = serde_json::to_vec_pretty(chain).unwrap();
        ledger.service.chain_store().file().overwrite(bytes);
    }

    #[tokio::test]
    async fn test_edited_degree_name_is_tampered() {
        let (ledger, block) = committed().await;
        let mut chain = ledger.service.get_chain().await.unwrap();
        chain[1].data.insert("degree_name".into(), json!("PhD Chemistry"));
        rewrite(&ledger, &chain);

        let err = ledger.service.verify(&block.hash).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TamperedBlock);
        assert_eq!(
            ledger.service.audit_chain().await.unwrap(),
            ChainAudit {
                length: 2,
                valid: false,
                first_invalid_index: Some(1)
            }
        );

        // Untouched genesis still verifies
        assert!(ledger.service.verify("0").await.is_ok());
    }

    #[tokio::test]
    async fn test_recomputed_hash_breaks_linkage() {
        let (ledger, block) = committed().await;
        let record = ledger.enroll("S-12", "BSc Biology").await.unwrap();
        let row = ledger
            .service
            .submit(&record.owner_id, record.id)
            .await
            .unwrap();
        ledger.approve_by_all(row.id).await.unwrap();

        // A forger recomputes the edited block's own hash
        let mut chain = ledger.service.get_chain().await.unwrap();
        let mut forged = chain[1].data.clone();
        forged.insert("year_awarded".into(), json!(1999));
        chain[1] = LedgerBlock::build(
            1,
            block.previous_hash.clone(),
            parse_timestamp(&block.timestamp).unwrap(),
            forged,
            0,
        );
        rewrite(&ledger, &chain);

        let audit = ledger.service.audit_chain().await.unwrap();
        assert!(!audit.valid);
        assert_eq!(audit.first_invalid_index, Some(2));

        // The original hash no longer names any block
        assert_eq!(
            ledger.service.verify(&block.hash).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_corrupted_file_blocks_everything_until_reinit() {
        let (ledger, _) = committed().await;
        ledger
            .service
            .chain_store()
            .file()
            .overwrite(b"not json at all".to_vec());

        let err = ledger.service.verify("1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptedLedgerFile);
        assert_eq!(
            ledger.service.initialize_genesis().await.unwrap_err().kind(),
            ErrorKind::CorruptedLedgerFile
        );
        assert_eq!(
            ledger.service.chain_store().file().snapshot(),
            Some(b"not json at all".to_vec())
        );

        ledger.service.reinitialize_ledger().await.unwrap();
        assert_eq!(
            ledger.service.get_chain().await.unwrap(),
            vec![LedgerBlock::genesis()]
        );
        assert!(matches!(
            ledger.service.verify("1").await,
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_crash_between_append_and_flag_is_reconciled() {
        let ledger = Ledger::start().await.unwrap();
        let record = ledger.enroll("S-11", "MA Linguistics").await.unwrap();
        let row = ledger
            .service
            .submit(&record.owner_id, record.id)
            .await
            .unwrap();

        // The ledger write landed; the registry update did not
        ledger.service.chain_store().append(row.block.clone()).unwrap();
        assert!(matches!(
            ledger.service.record_status(record.id).await.unwrap(),
            RecordStatus::Pending { .. }
        ));

        let report = ledger.service.initialize_genesis().await.unwrap();
        assert_eq!(report.reconciled, vec![row.id]);
        assert_eq!(
            ledger.service.record_status(record.id).await.unwrap(),
            RecordStatus::Committed {
                block_id: row.id,
                index: 1,
                hash: row.block.hash.clone()
            }
        );

        let err = ledger
            .service
            .cast_approval(row.id, ledger.admins[0].id, true, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyCommitted);
        assert_eq!(ledger.service.get_chain().await.unwrap().len(), 2);
    }
}
