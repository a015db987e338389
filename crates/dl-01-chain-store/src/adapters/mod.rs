//! # Adapters Layer
//!
//! Implementations of the outbound `LedgerFile` port.
//!
//! - `file`: JSON document on disk, atomic replace, process lock
//! - `memory`: in-memory buffer for tests
//! - `lock`: `fs2` lock file guarding a ledger path

pub mod file;
#[cfg(feature = "locking")]
pub mod lock;
pub mod memory;

pub use file::JsonLedgerFile;
#[cfg(feature = "locking")]
pub use lock::{LedgerLock, LockError};
pub use memory::InMemoryLedgerFile;
