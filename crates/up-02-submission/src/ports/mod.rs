//! # Ports Layer
//!
//! - **Driving Port (Inbound)**: `TransactionApi`
//! - **Driven Ports (Outbound)**: `NodeConnection`, `Signer`, `MetadataRegistry`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
