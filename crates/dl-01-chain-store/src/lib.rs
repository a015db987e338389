//! # Chain Store (dl-01)
//!
//! The Chain Store is the single source of truth for committed ledger
//! blocks. It owns one JSON file holding an ordered array of blocks and
//! only ever appends to it.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Fixed Genesis | `chain[0]` equals `LedgerBlock::genesis()` |
//! | 2 | Hash Linkage | `chain[i].previous_hash == chain[i-1].hash` |
//! | 3 | Self-Consistency | every stored hash recomputes from its fields |
//! | 4 | Atomic Replace | readers never observe a partially written file |
//! | 5 | Serialized Appends | one critical section per "read tip, validate, write" |
//! | 6 | No Silent Repair | a corrupted file is reported, replaced only by `reinitialize` |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Chain validation, file codec, errors
//! - `ports/` - Port traits (inbound API, outbound SPI)
//! - `adapters/` - JSON file, in-memory file, process lock
//! - `service.rs` - `ChainStore` implementing the API
//!
//! ## Usage
//!
//! ```ignore
//! use dl_01_chain_store::{ChainStore, ChainStoreApi};
//!
//! let store = ChainStore::open("data/blockchain.json")?;
//! store.initialize_if_empty()?;
//! let tip = store.tip()?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
mod test_utils;

// Re-export key types for convenience
pub use adapters::{InMemoryLedgerFile, JsonLedgerFile};
pub use domain::{check_append, find_violation, verify_chain, ChainStoreError};
pub use ports::inbound::ChainStoreApi;
pub use ports::outbound::LedgerFile;
pub use service::ChainStore;
