//! # Shared Crypto - Hash Engine
//!
//! Deterministic hashing of ledger blocks.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `canonical` | Sorted-key compact JSON | Hash pre-image encoding |
//! | `hashing` | SHA-256 | Block digests (lowercase hex) |
//!
//! ## Determinism
//!
//! Two semantically equal inputs (same keys and values, any insertion order)
//! always produce the same pre-image and therefore the same digest. Any
//! byte-level change to any field changes the digest, which is what makes
//! tamper detection work.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod hashing;

// Re-exports
pub use canonical::{canonical_json, to_canonical_json};
pub use hashing::{block_hash, sha256_hex, HASH_HEX_LENGTH};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
