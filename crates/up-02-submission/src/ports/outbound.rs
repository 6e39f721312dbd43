//! # Driven Ports (SPI - Outbound)
//!
//! Collaborators the submission engine depends on:
//! - the node connection (JSON-RPC)
//! - a signer that can sign and submit
//! - a read-only registry of runtime module errors

use crate::domain::{CallDescriptor, ContractQuery, SignedExtrinsic, TxSubscription};
use crate::errors::{ConnectionError, TxError};
use async_trait::async_trait;
use shared_types::{AccountId, Bytes, ModuleErrorIndex, Nonce};

// =============================================================================
// NODE CONNECTION
// =============================================================================

/// A live connection to a chain node.
#[async_trait]
pub trait NodeConnection: Send + Sync {
    /// `author_submitAndWatchExtrinsic`: broadcast and subscribe to updates.
    ///
    /// A JSON-RPC error here means the node refused the transaction.
    async fn submit_and_watch(
        &self,
        extrinsic: &SignedExtrinsic,
    ) -> Result<TxSubscription, ConnectionError>;

    /// `system_accountNextIndex`: next nonce the pool expects for `account`.
    async fn account_next_index(&self, account: &AccountId) -> Result<Nonce, ConnectionError>;

    /// `contracts_call`: read-only execution, returns the raw output.
    async fn query(&self, query: &ContractQuery) -> Result<Bytes, ConnectionError>;
}

// =============================================================================
// SIGNER
// =============================================================================

/// A broadcast transaction and its update stream.
#[derive(Debug)]
pub struct Submission {
    /// What was sent.
    pub extrinsic: SignedExtrinsic,
    /// Where updates arrive.
    pub subscription: TxSubscription,
}

/// Signing capability for one account.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Account that signs.
    fn account(&self) -> AccountId;

    /// Sign `call` at `nonce` (or the node's next index when `None`) and
    /// broadcast it.
    async fn sign_and_submit(
        &self,
        call: &CallDescriptor,
        nonce: Option<Nonce>,
    ) -> Result<Submission, TxError>;
}

// =============================================================================
// METADATA REGISTRY
// =============================================================================

/// Runtime metadata for one module error variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleErrorMeta {
    /// Pallet name.
    pub section: String,
    /// Variant name.
    pub method: String,
    /// Documentation lines.
    pub docs: Vec<String>,
}

/// Read-only lookup of module errors by position.
pub trait MetadataRegistry: Send + Sync {
    /// Resolve `(index, error)`; `None` if unknown.
    fn lookup(&self, index: ModuleErrorIndex) -> Option<ModuleErrorMeta>;
}
