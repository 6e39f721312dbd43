//! # Error Types

use thiserror::Error;
use up_01_artifacts::ArtifactError;
use up_02_submission::{Confirmation, TxError};

/// Errors from deploying a contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeployError {
    /// Constructor lookup or argument encoding failed. Nothing was submitted.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// The instantiation transaction failed.
    #[error(transparent)]
    Transaction(#[from] TxError),

    /// The transaction succeeded but no `Instantiated` event reported an address.
    #[error("instantiation of `{contract}` resolved as {confirmation:?} without a contract address")]
    MissingAddress {
        /// Contract name.
        contract: String,
        /// What the engine resolved with instead.
        confirmation: Confirmation,
    },
}
