//! # Ports Layer
//!
//! - `inbound`: the API this crate exposes (`ChainStoreApi`)
//! - `outbound`: what it needs from the host (`LedgerFile`)

pub mod inbound;
pub mod outbound;
