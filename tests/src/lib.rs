//! # Degree-Ledger Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks (hashing, chain checks)
//! └── src/integration/  # End-to-end flows across dl-01, dl-02 and the runtime
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p dl-tests
//! cargo test -p dl-tests integration::tamper
//! cargo bench -p dl-tests
//! ```

pub mod integration;
