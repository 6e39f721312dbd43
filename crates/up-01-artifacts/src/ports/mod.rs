//! # Ports Layer
//!
//! - **Driving Port (Inbound)**: `ArtifactSource`
//! - No outbound ports; the loader only touches the local filesystem.

pub mod inbound;

pub use inbound::*;
