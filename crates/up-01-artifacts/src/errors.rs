//! # Error Types
//!
//! Errors raised while loading contract artifacts or encoding calls against
//! their metadata. All of them are fatal before any submission happens.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the artifact loader and the call encoder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArtifactError {
    /// Code blob or metadata file does not exist.
    #[error("artifact not found for `{name}`: {}", path.display())]
    NotFound { name: String, path: PathBuf },

    /// File exists but could not be read.
    #[error("failed to read {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },

    /// Metadata could not be parsed as structured data.
    #[error("malformed metadata for `{name}`: {reason}")]
    Malformed { name: String, reason: String },

    /// No constructor or message with this label.
    #[error("`{contract}` has no {kind} named `{label}`")]
    UnknownCall {
        contract: String,
        kind: &'static str,
        label: String,
    },

    /// Wrong number of arguments for a call.
    #[error("`{label}` expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },

    /// Argument value does not fit the declared type.
    #[error("argument `{arg}` of `{label}` expects {expected}, got {actual}")]
    TypeMismatch {
        label: String,
        arg: String,
        expected: String,
        actual: &'static str,
    },

    /// Return data could not be decoded into the expected type.
    #[error("cannot decode {expected} from {actual} byte(s) of output")]
    OutputDecode { expected: &'static str, actual: usize },

    /// The message returned the `Err` side of its `Result`.
    #[error("contract returned an error instead of {expected} ({} byte(s))", error.len())]
    ContractError {
        expected: &'static str,
        error: Vec<u8>,
    },
}
