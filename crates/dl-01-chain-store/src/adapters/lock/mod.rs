//! # Ledger Process Locking
//!
//! Prevents two processes from appending to the same ledger file.
//!
//! ## Modules
//!
//! - `flock`: `LedgerLock` implementation using fs2

mod flock;
#[cfg(test)]
mod tests;

pub use flock::{LedgerLock, LockError, DEFAULT_LOCK_TIMEOUT};
