//! # Error Types
//!
//! | Error | Raised by | Meaning |
//! |-------|-----------|---------|
//! | `TxError` | Confirmation engine, submitter | Terminal failure of one transaction |
//! | `ConnectionError` | Node connection adapters | Transport or JSON-RPC failure |
//! | `SignerError` | Signer adapters, extrinsic codec | Key or envelope problems |

use shared_types::{ModuleErrorIndex, TxPhase};
use std::fmt;
use thiserror::Error;

/// A module error resolved through the metadata registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedModuleError {
    /// Pallet name, e.g. `Contracts`.
    pub section: String,
    /// Error variant, e.g. `ContractTrapped`.
    pub method: String,
    /// Documentation lines of the variant.
    pub docs: Vec<String>,
    /// Raw position in the runtime metadata.
    pub index: ModuleErrorIndex,
}

impl fmt::Display for DecodedModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.section, self.method, self.docs.join(" "))
    }
}

/// Terminal failure of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    /// The node refused the transaction before reporting any outcome.
    #[error("submission rejected: {reason}")]
    SubmissionRejected {
        /// RPC error text or the rejecting status.
        reason: String,
    },

    /// `ExtrinsicFailed` with a module error the registry knows.
    #[error("{0}")]
    Module(DecodedModuleError),

    /// `ExtrinsicFailed` that could not be decoded. Carries the raw text.
    #[error("{raw}")]
    Opaque {
        /// Raw error descriptor.
        raw: String,
    },

    /// The event stream ended before a terminal outcome.
    #[error("subscription lost before the transaction resolved")]
    SubscriptionLost,

    /// Transport failure while preparing or sending the transaction.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// The call could not be signed.
    #[error("signing failed: {0}")]
    Signing(#[from] SignerError),
}

impl TxError {
    /// Rejection caused by a pool status such as `Invalid`.
    #[must_use]
    pub fn rejected_by(phase: TxPhase) -> Self {
        Self::SubmissionRejected {
            reason: format!("transaction {phase:?} by the pool"),
        }
    }

    /// Short name for logging and statistics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SubmissionRejected { .. } => "submission_rejected",
            Self::Module(_) => "module",
            Self::Opaque { .. } => "opaque",
            Self::SubscriptionLost => "subscription_lost",
            Self::Connection(_) => "connection",
            Self::Signing(_) => "signing",
        }
    }
}

/// Errors from a node connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// Could not open the connection.
    #[error("failed to connect to {url}: {reason}")]
    Connect {
        /// Endpoint.
        url: String,
        /// Underlying error.
        reason: String,
    },

    /// The connection is closed.
    #[error("connection closed")]
    Closed,

    /// The node answered with a JSON-RPC error.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
    },

    /// The node's answer did not have the expected shape.
    #[error("unexpected response to {method}: {reason}")]
    Decode {
        /// Method that was called.
        method: String,
        /// What was wrong.
        reason: String,
    },

    /// A read-only contract call reported an error.
    #[error("contract query failed: {0}")]
    QueryFailed(String),

    /// No response within the request timeout.
    #[error("{method} timed out after {timeout_ms}ms")]
    Timeout {
        /// Method that was called.
        method: String,
        /// Timeout that elapsed.
        timeout_ms: u64,
    },
}

/// Errors from signing or envelope encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// Secret URI is neither `//Name` nor a `0x` 32-byte seed.
    #[error("invalid secret uri: {0}")]
    InvalidUri(String),

    /// Envelope could not be encoded or decoded.
    #[error("extrinsic encoding: {0}")]
    Encoding(String),

    /// Signature does not verify.
    #[error("bad signature: {0}")]
    BadSignature(String),
}
