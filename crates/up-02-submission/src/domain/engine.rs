//! # Confirmation Engine
//!
//! State machine that turns batches of node events into exactly one
//! terminal outcome.
//!
//! ```text
//! Created ──submit──→ Submitted ──status──→ InBlock ──→ Finalized
//!    │                    │                    │            │
//!    └── rejected ────────┴────── batch matches a rule ─────┴──→ Resolved
//! ```
//!
//! ## Batch Rules (first match wins, order inside a batch is irrelevant)
//!
//! | Priority | Event | Outcome |
//! |----------|-------|---------|
//! | 1 | `Instantiated` | `Ok(Instantiated { deployer, contract })` |
//! | 2 | `ExtrinsicFailed` | `Err(Module)` or `Err(Opaque)` |
//! | 3 | `ExtrinsicSuccess` | `Ok(Succeeded)` |
//! | 4 | `Status(InBlock \| Finalized)` | `Ok(Included)` under `InclusionPolicy::ResolveOnInclusion` |
//! | 5 | `Status(Invalid \| Dropped \| Usurped)` | `Err(SubmissionRejected)` |
//!
//! Once resolved, further batches are counted and ignored.

use crate::errors::{DecodedModuleError, TxError};
use crate::ports::MetadataRegistry;
use shared_types::{AccountId, ChainEvent, ErrorDescriptor, TxPhase};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Terminal result of one transaction.
pub type Outcome = Result<Confirmation, TxError>;

/// Successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// A contract was created.
    Instantiated {
        /// Account that paid for it.
        deployer: AccountId,
        /// Address of the new contract.
        contract: AccountId,
    },
    /// `ExtrinsicSuccess` without a payload.
    Succeeded,
    /// Inclusion without any runtime event.
    Included(TxPhase),
}

impl Confirmation {
    /// Address of the instantiated contract, if any.
    #[must_use]
    pub fn contract_address(&self) -> Option<AccountId> {
        match self {
            Self::Instantiated { contract, .. } => Some(*contract),
            Self::Succeeded | Self::Included(_) => None,
        }
    }
}

/// What to do when a block includes the transaction but no runtime event
/// has been seen yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InclusionPolicy {
    /// Resolve as success on `InBlock`/`Finalized`.
    #[default]
    ResolveOnInclusion,
    /// Keep waiting for `Instantiated`/`ExtrinsicFailed`/`ExtrinsicSuccess`.
    AwaitEvents,
}

/// Lifecycle state of one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    /// Not yet handed to the node.
    Created,
    /// Accepted by the node, not yet in a block.
    Submitted,
    /// Included in a block.
    InBlock,
    /// Included in a finalized block.
    Finalized,
    /// Terminal outcome known.
    Resolved,
}

/// Resolve a failure descriptor to a [`TxError`].
///
/// Pure: the result depends only on the descriptor and the registry.
pub fn decode_module_error(error: &ErrorDescriptor, registry: &dyn MetadataRegistry) -> TxError {
    match error {
        ErrorDescriptor::Module(index) => match registry.lookup(*index) {
            Some(meta) => TxError::Module(DecodedModuleError {
                section: meta.section,
                method: meta.method,
                docs: meta.docs,
                index: *index,
            }),
            None => TxError::Opaque {
                raw: error.to_string(),
            },
        },
        ErrorDescriptor::Other(raw) => TxError::Opaque { raw: raw.clone() },
    }
}

/// Apply the batch rules. Returns the outcome if the batch is terminal.
pub fn evaluate_batch(
    batch: &[ChainEvent],
    policy: InclusionPolicy,
    registry: &dyn MetadataRegistry,
) -> Option<Outcome> {
    if let Some((deployer, contract)) = batch.iter().find_map(|e| match e {
        ChainEvent::Instantiated { deployer, contract } => Some((*deployer, *contract)),
        _ => None,
    }) {
        return Some(Ok(Confirmation::Instantiated { deployer, contract }));
    }

    if let Some(error) = batch.iter().find_map(|e| match e {
        ChainEvent::ExtrinsicFailed { error } => Some(error),
        _ => None,
    }) {
        return Some(Err(decode_module_error(error, registry)));
    }

    if batch.iter().any(|e| matches!(e, ChainEvent::ExtrinsicSuccess)) {
        return Some(Ok(Confirmation::Succeeded));
    }

    let phases = || {
        batch.iter().filter_map(|e| match e {
            ChainEvent::Status { phase } => Some(*phase),
            _ => None,
        })
    };

    if policy == InclusionPolicy::ResolveOnInclusion {
        if let Some(phase) = phases().find(TxPhase::is_included) {
            return Some(Ok(Confirmation::Included(phase)));
        }
    }

    phases()
        .find(TxPhase::is_rejection)
        .map(|phase| Err(TxError::rejected_by(phase)))
}

/// Per-transaction confirmation state machine.
pub struct ConfirmationEngine {
    registry: Arc<dyn MetadataRegistry>,
    policy: InclusionPolicy,
    state: TxState,
    outcome: Option<Outcome>,
    batches_applied: usize,
    batches_ignored: usize,
}

impl fmt::Debug for ConfirmationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationEngine")
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl ConfirmationEngine {
    /// Create an engine in the `Created` state.
    pub fn new(registry: Arc<dyn MetadataRegistry>, policy: InclusionPolicy) -> Self {
        Self {
            registry,
            policy,
            state: TxState::Created,
            outcome: None,
            batches_applied: 0,
            batches_ignored: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TxState {
        self.state
    }

    /// Terminal outcome, once known.
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Returns true once an outcome is known.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    /// Batches that were evaluated.
    #[must_use]
    pub fn batches_applied(&self) -> usize {
        self.batches_applied
    }

    /// Batches that arrived after resolution and were dropped.
    #[must_use]
    pub fn batches_ignored(&self) -> usize {
        self.batches_ignored
    }

    /// The node accepted the transaction.
    pub fn mark_submitted(&mut self) {
        if self.state == TxState::Created {
            self.state = TxState::Submitted;
        }
    }

    /// The node refused the transaction before any event.
    pub fn reject(&mut self, reason: impl Into<String>) -> Outcome {
        self.resolve(Err(TxError::SubmissionRejected {
            reason: reason.into(),
        }))
    }

    /// Fail with an error raised before the node saw the transaction.
    pub fn fail(&mut self, error: TxError) -> Outcome {
        self.resolve(Err(error))
    }

    /// Feed one batch. Returns the outcome if this batch resolved the
    /// transaction; `None` if still pending or already resolved.
    pub fn apply(&mut self, batch: &[ChainEvent]) -> Option<Outcome> {
        if self.is_resolved() {
            self.batches_ignored += 1;
            trace!(events = batch.len(), "Ignoring batch after resolution");
            return None;
        }

        self.batches_applied += 1;
        self.mark_submitted();

        if let Some(outcome) = evaluate_batch(batch, self.policy, self.registry.as_ref()) {
            return Some(self.resolve(outcome));
        }

        for event in batch {
            if let ChainEvent::Status { phase } = event {
                self.advance(*phase);
            }
        }
        debug!(state = ?self.state, events = batch.len(), "Batch did not resolve transaction");
        None
    }

    /// The update stream ended. Resolves with `SubscriptionLost` unless an
    /// outcome is already known.
    pub fn end_of_stream(&mut self) -> Outcome {
        match &self.outcome {
            Some(outcome) => outcome.clone(),
            None => self.resolve(Err(TxError::SubscriptionLost)),
        }
    }

    fn advance(&mut self, phase: TxPhase) {
        self.state = match (self.state, phase) {
            (TxState::Finalized, _) | (_, TxPhase::Finalized) => TxState::Finalized,
            (TxState::InBlock, _) | (_, TxPhase::InBlock) => TxState::InBlock,
            (state, _) => state,
        };
    }

    fn resolve(&mut self, outcome: Outcome) -> Outcome {
        match &self.outcome {
            Some(existing) => existing.clone(),
            None => {
                self.state = TxState::Resolved;
                self.outcome = Some(outcome.clone());
                outcome
            }
        }
    }
}
