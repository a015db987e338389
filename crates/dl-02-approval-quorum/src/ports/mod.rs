//! Ports for the Approval Quorum subsystem

pub mod inbound;
pub mod outbound;
