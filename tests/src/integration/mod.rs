//! # Integration Flows
//!
//! End-to-end scenarios through `LedgerService`, wired over the in-memory
//! ledger file and registry with a fixed clock unless a test needs the disk.
//!
//! - `flows` - genesis, submission, quorum commit, verification
//! - `tamper` - tampering, corruption, re-initialization, reconciliation
//! - `concurrency` - racing commits on one tip

pub mod fixtures;

mod concurrency;
mod flows;
mod tamper;
