//! # Runtime Adapters
//!
//! Wire the subsystems together:
//!
//! - `RegistryBallotBox` - dl-02 `BallotBox` over the record registry
//! - `ChainStoreGateway` - dl-02 `ChainGateway` over the dl-01 chain store
//! - `TimeSource` - clock for records, blocks and votes

pub mod ballot;
pub mod chain;
pub mod time;

pub use ballot::RegistryBallotBox;
pub use chain::ChainStoreGateway;
pub use time::{FixedTimeSource, SystemTimeSource, TimeSource};
