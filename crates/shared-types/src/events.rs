//! # Chain Events
//!
//! Everything the node reports back about one submitted transaction.
//!
//! A node notification carries a transaction status plus the runtime events
//! emitted so far. Events inside one notification are not ordered relative
//! to each other; consumers must apply their own priority.

use crate::entities::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a transaction as reported by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TxPhase {
    /// Queued behind a missing nonce.
    Future,
    /// Ready for inclusion.
    Ready,
    /// Gossiped to peers.
    Broadcast,
    /// Included in a block.
    InBlock,
    /// Included in a finalized block.
    Finalized,
    /// Replaced by another transaction with the same nonce.
    Usurped,
    /// Dropped from the pool.
    Dropped,
    /// Declared invalid by the pool.
    Invalid,
}

impl TxPhase {
    /// Returns true once the transaction sits in a block.
    #[must_use]
    pub fn is_included(&self) -> bool {
        matches!(self, Self::InBlock | Self::Finalized)
    }

    /// Returns true if the node gave up on the transaction.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Usurped | Self::Dropped | Self::Invalid)
    }
}

/// Position of a module error in the runtime metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleErrorIndex {
    /// Pallet (section) index.
    pub index: u8,
    /// Error variant index within the pallet.
    pub error: u8,
}

/// Failure reason attached to `ExtrinsicFailed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorDescriptor {
    /// Structured runtime error; resolved through a metadata registry.
    Module(ModuleErrorIndex),
    /// Anything the node could not classify.
    Other(String),
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(m) => write!(
                f,
                "{{\"module\":{{\"index\":{},\"error\":{}}}}}",
                m.index, m.error
            ),
            Self::Other(text) => f.write_str(text),
        }
    }
}

/// A single event observed for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ChainEvent {
    /// `contracts.Instantiated`: a contract was created.
    Instantiated {
        /// Account that paid for the instantiation.
        deployer: AccountId,
        /// Address of the new contract.
        contract: AccountId,
    },

    /// `system.ExtrinsicFailed`.
    ExtrinsicFailed {
        /// Why it failed.
        error: ErrorDescriptor,
    },

    /// `system.ExtrinsicSuccess`.
    ExtrinsicSuccess,

    /// Status transition of the transaction itself.
    Status {
        /// New phase.
        phase: TxPhase,
    },
}

impl ChainEvent {
    /// Short name for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Instantiated { .. } => "instantiated",
            Self::ExtrinsicFailed { .. } => "extrinsic_failed",
            Self::ExtrinsicSuccess => "extrinsic_success",
            Self::Status { .. } => "status",
        }
    }
}

/// One node notification for a watched transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxUpdate {
    /// Current status.
    pub status: TxPhase,
    /// Runtime events emitted for the transaction so far.
    #[serde(default)]
    pub events: Vec<ChainEvent>,
}

impl TxUpdate {
    /// Creates a status-only update.
    #[must_use]
    pub fn status(phase: TxPhase) -> Self {
        Self {
            status: phase,
            events: Vec::new(),
        }
    }

    /// Creates an update carrying runtime events.
    #[must_use]
    pub fn with_events(phase: TxPhase, events: Vec<ChainEvent>) -> Self {
        Self {
            status: phase,
            events,
        }
    }

    /// Flattens the update into one batch: runtime events first, then the
    /// status transition.
    #[must_use]
    pub fn into_batch(self) -> Vec<ChainEvent> {
        let mut batch = self.events;
        batch.push(ChainEvent::Status { phase: self.status });
        batch
    }
}
