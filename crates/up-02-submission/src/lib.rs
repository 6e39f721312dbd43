//! # UP-02 Submission - Transaction Submitter & Confirmation Engine
//!
//! **Component ID:** 2
//! **Status:** Core component
//!
//! ## Purpose
//!
//! Signs a call, broadcasts it, subscribes to the node's update stream and
//! resolves to exactly one outcome: a decoded success or a decoded failure.
//!
//! ## Lifecycle
//!
//! ```text
//! Signer::sign_and_submit ──→ PendingTransaction { subscription, engine }
//!                                   │
//!                   update batches  ▼
//!                            ConfirmationEngine::apply ──→ Outcome
//!                                   │
//!                                   └──→ subscription released
//! ```
//!
//! ## Outcomes
//!
//! | Outcome | Source |
//! |---------|--------|
//! | `Confirmation::Instantiated` | `Instantiated` event |
//! | `Confirmation::Succeeded` | `ExtrinsicSuccess` event |
//! | `Confirmation::Included` | `InBlock`/`Finalized` with no runtime event |
//! | `TxError::Module` | `ExtrinsicFailed` with a registered module error |
//! | `TxError::Opaque` | `ExtrinsicFailed` that cannot be decoded |
//! | `TxError::SubmissionRejected` | RPC refusal, or `Invalid`/`Dropped`/`Usurped` |
//! | `TxError::SubscriptionLost` | Stream ended before resolution |
//!
//! ## Concurrency
//!
//! No internal timeouts. Each pending transaction exclusively owns its
//! subscription; dropping the future or the handle releases it. The
//! metadata registry is read-only and shared behind an `Arc`.
//!
//! ## Usage Example
//!
//! ```ignore
//! use up_02_submission::prelude::*;
//!
//! let node: Arc<dyn NodeConnection> =
//!     Arc::new(WsNodeConnection::connect("ws://127.0.0.1:9944", timeout).await?);
//! let alice = LocalSigner::from_uri("//Alice", node.clone())?;
//! let submitter = Submitter::new(Arc::new(JsonMetadataRegistry::empty()), SubmitterConfig::default());
//!
//! let confirmation = tokio::time::timeout(
//!     Duration::from_secs(60),
//!     submitter.submit_and_await(&alice, call, SubmitOptions::default()),
//! )
//! .await??;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::{
        decode_module_error, evaluate_batch, signing_payload, CallDescriptor, Confirmation,
        ConfirmationEngine, ContractQuery, InclusionPolicy, Outcome, PendingTransaction,
        SignedExtrinsic, SubmitOptions, TxState, TxSubscription,
    };

    // Ports
    pub use crate::ports::{
        MetadataRegistry, ModuleErrorMeta, NodeConnection, Signer, Submission, TransactionApi,
    };

    // Adapters
    pub use crate::adapters::{
        seed_from_uri, ErrorVariant, JsonMetadataRegistry, LocalSigner, ModuleErrors,
        RegistryError, WsNodeConnection, EXTRINSIC_UPDATE,
    };

    // Errors
    pub use crate::errors::{ConnectionError, DecodedModuleError, SignerError, TxError};

    // Service
    pub use crate::service::{Submitter, SubmitterConfig, SubmitterStats};
}

pub use prelude::*;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
