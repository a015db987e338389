//! # Domain Layer
//!
//! Pure chain logic: validation rules, the file codec and error types.

pub mod chain;
pub mod codec;
pub mod errors;

pub use chain::{check_append, find_violation, verify_chain};
pub use errors::ChainStoreError;
