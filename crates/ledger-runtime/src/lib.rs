//! # Ledger Runtime
//!
//! Wires the chain store (dl-01), the approval quorum (dl-02) and the record
//! registry into the [`LedgerService`], and hosts the `degree-ledger` binary.
//!
//! ## Modules
//!
//! - `config/` - `LedgerConfig` loaded from the environment
//! - `registry/` - `RecordRegistry` port with in-memory and JSON adapters
//! - `adapters/` - quorum port implementations and the clock
//! - `service/` - `LedgerService` orchestration
//! - `error` - `LedgerError`, the service-level error

pub mod adapters;
pub mod config;
pub mod error;
pub mod registry;
pub mod service;

pub use adapters::{FixedTimeSource, SystemTimeSource, TimeSource};
pub use config::{ConfigError, LedgerConfig};
pub use error::{LedgerError, LedgerResult};
pub use registry::{InMemoryRegistry, JsonFileRegistry, RecordRegistry, RegistryError};
pub use service::{
    ChainAudit, FileLedgerService, GenesisReport, InMemoryLedgerService, LedgerService,
    NewRecord, PendingBlock, RecordStatus, VerificationResult,
};
