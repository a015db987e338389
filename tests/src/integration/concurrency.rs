//! # Racing Commits
//!
//! Several records pending on one tip: the first to reach quorum commits,
//! the rest fail the linkage check and never fork the chain. A losing record
//! is resubmitted on the new tip.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::Ledger;
    use dl_02_approval_quorum::ApprovalApi;
    use ledger_runtime::RecordStatus;
    use shared_types::{ErrorKind, ReportableError};

    #[tokio::test]
    async fn test_racing_quorums_commit_exactly_one() {
        let ledger = Ledger::start().await.unwrap();
        let a = ledger.enroll("S-20", "BSc").await.unwrap();
        let b = ledger.enroll("S-21", "BSc").await.unwrap();
        let row_a = ledger.service.submit(&a.owner_id, a.id).await.unwrap();
        let row_b = ledger.service.submit(&b.owner_id, b.id).await.unwrap();
        assert_eq!(row_a.previous_hash(), row_b.previous_hash());

        let (first, second) = tokio::join!(
            ledger.approve_by_all(row_a.id),
            ledger.approve_by_all(row_b.id)
        );

        let outcomes = [first, second];
        let committed = outcomes
            .iter()
            .filter(|o| o.as_ref().is_ok_and(|o| o.is_committed()))
            .count();
        let stale = outcomes
            .iter()
            .filter(|o| {
                o.as_ref()
                    .is_err_and(|e| e.kind() == ErrorKind::ChainIntegrityInvalid)
            })
            .count();
        assert_eq!((committed, stale), (1, 1));

        let audit = ledger.service.audit_chain().await.unwrap();
        assert!(audit.valid);
        assert_eq!(audit.length, 2);
        // The loser is stale and leaves the approval queue
        assert!(ledger.service.pending_blocks().await.unwrap().is_empty());
        let mut stale_records = 0;
        for record in [&a, &b] {
            if let RecordStatus::Stale { .. } = ledger.service.record_status(record.id).await.unwrap() {
                stale_records += 1;
            }
        }
        assert_eq!(stale_records, 1);
    }

    #[tokio::test]
    async fn test_lost_race_is_rebuilt_on_resubmission() {
        let ledger = Ledger::start().await.unwrap();
        let a = ledger.enroll("S-30", "BSc").await.unwrap();
        let b = ledger.enroll("S-31", "BSc").await.unwrap();
        let row_a = ledger.service.submit(&a.owner_id, a.id).await.unwrap();
        let row_b = ledger.service.submit(&b.owner_id, b.id).await.unwrap();
        ledger.approve_by_all(row_a.id).await.unwrap();

        let err = ledger.approve_by_all(row_b.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChainIntegrityInvalid);

        // Same block row, rebuilt on the new tip with a fresh ballot
        let rebuilt = ledger.service.submit(&b.owner_id, b.id).await.unwrap();
        assert_eq!(rebuilt.id, row_b.id);
        assert_eq!(rebuilt.block.index, 2);
        assert_eq!(rebuilt.previous_hash(), row_a.current_hash());
        assert_eq!(ledger.service.quorum().tally(rebuilt.id).await.unwrap(), 0);

        assert!(ledger.approve_by_all(rebuilt.id).await.unwrap().is_committed());
        let chain = ledger.service.get_chain().await.unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[2], rebuilt.block);
        assert_eq!(
            ledger.service.submit(&b.owner_id, b.id).await.unwrap_err().kind(),
            ErrorKind::AlreadySubmitted
        );
    }
}
