//! # Error Types

use thiserror::Error;
use up_01_artifacts::ArtifactError;
use up_02_submission::{ConnectionError, TxError};
use up_03_deployment::DeployError;

/// Errors that abort the workflow. Each carries the step that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Artifact loading, call encoding or output decoding failed.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// A deployment failed.
    #[error("{step} failed: {source}")]
    Deploy {
        /// Step name.
        step: String,
        /// Underlying error.
        #[source]
        source: DeployError,
    },

    /// A state-changing call failed.
    #[error("{step} failed: {source}")]
    Transaction {
        /// Step name.
        step: String,
        /// Underlying error.
        #[source]
        source: TxError,
    },

    /// A read-only query could not be made.
    #[error("{step} failed: {source}")]
    Query {
        /// Step name.
        step: String,
        /// Underlying error.
        #[source]
        source: ConnectionError,
    },

    /// `average` returned something other than the configured value.
    #[error("{step}: expected average {expected}, got {actual}")]
    UnexpectedAverage {
        /// Step name.
        step: String,
        /// Configured value.
        expected: i32,
        /// Returned value.
        actual: i32,
    },
}

impl WorkflowError {
    /// Transaction error behind this failure, if any.
    #[must_use]
    pub fn tx_error(&self) -> Option<&TxError> {
        match self {
            Self::Transaction { source, .. } => Some(source),
            Self::Deploy {
                source: DeployError::Transaction(source),
                ..
            } => Some(source),
            _ => None,
        }
    }
}
