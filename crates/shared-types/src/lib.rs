//! # Shared Types Crate
//!
//! This crate contains the ledger block value type, the record kinds held by
//! the record registry, and the error taxonomy every subsystem reports in.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: a block is built exactly once through
//!   [`LedgerBlock::build`] (or [`LedgerBlock::genesis`]); the registry row and
//!   the ledger-file entry are two projections of that one value.
//! - **Hash Integrity**: `hash` is always derived from the other five fields;
//!   there is no setter for it.
//! - **Structured Errors**: every recoverable failure maps to an
//!   [`ErrorKind`] and is reported as an [`ErrorReport`].

pub mod block;
pub mod entities;
pub mod errors;

pub use block::*;
pub use entities::*;
pub use errors::*;
