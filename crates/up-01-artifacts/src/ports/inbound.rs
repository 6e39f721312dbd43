//! # Driving Ports (API - Inbound)
//!
//! The interface the deployment orchestrator and workflow driver use to
//! obtain contract artifacts.

use crate::domain::ContractArtifact;
use crate::errors::ArtifactError;

/// Resolves a contract name to its code and metadata.
///
/// Loading is synchronous and side-effect free apart from reads; calling it
/// twice for the same name yields equal artifacts.
pub trait ArtifactSource: Send + Sync {
    /// Load the artifact named `name`.
    ///
    /// # Errors
    ///
    /// * `NotFound` - code blob or metadata is missing
    /// * `Io` - a file exists but could not be read
    /// * `Malformed` - metadata is not valid JSON or lacks a code hash
    fn load(&self, name: &str) -> Result<ContractArtifact, ArtifactError>;
}
