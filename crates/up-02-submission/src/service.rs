//! # Submitter Service
//!
//! Glues a signer to a fresh confirmation engine per transaction and keeps
//! outcome counters.

use crate::domain::{
    CallDescriptor, Confirmation, ConfirmationEngine, InclusionPolicy, Outcome,
    PendingTransaction, SubmitOptions,
};
use crate::errors::TxError;
use crate::ports::{MetadataRegistry, Signer, TransactionApi};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Submitter configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmitterConfig {
    /// How to treat inclusion without runtime events.
    pub inclusion_policy: InclusionPolicy,
}

/// Outcome counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SubmitterStats {
    /// Transactions accepted by the node.
    pub submitted: u64,
    /// Resolved as success.
    pub succeeded: u64,
    /// Resolved with a module or opaque failure.
    pub failed: u64,
    /// Refused by the node or the pool.
    pub rejected: u64,
    /// Update stream ended before resolution.
    pub lost: u64,
}

/// Signs, broadcasts and tracks transactions.
pub struct Submitter {
    registry: Arc<dyn MetadataRegistry>,
    config: SubmitterConfig,
    stats: Arc<RwLock<SubmitterStats>>,
}

impl Submitter {
    /// Create a submitter resolving module errors through `registry`.
    pub fn new(registry: Arc<dyn MetadataRegistry>, config: SubmitterConfig) -> Self {
        Self {
            registry,
            config,
            stats: Arc::new(RwLock::new(SubmitterStats::default())),
        }
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> SubmitterStats {
        *self.stats.read()
    }

    /// Sign and broadcast `call`, returning the handle to await.
    ///
    /// Fails with `SubmissionRejected` if the node refuses it outright.
    pub async fn submit(
        &self,
        signer: &dyn Signer,
        call: CallDescriptor,
        options: SubmitOptions,
    ) -> Result<PendingTransaction, TxError> {
        match signer.sign_and_submit(&call, options.nonce).await {
            Ok(submission) => {
                self.stats.write().submitted += 1;
                let engine = ConfirmationEngine::new(
                    Arc::clone(&self.registry),
                    self.config.inclusion_policy,
                );
                Ok(PendingTransaction::new(
                    submission.extrinsic,
                    submission.subscription,
                    engine,
                ))
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Submission refused");
                self.record(Err(&e));
                Err(e)
            }
        }
    }

    fn record(&self, outcome: Result<&Confirmation, &TxError>) {
        let mut stats = self.stats.write();
        match outcome {
            Ok(_) => stats.succeeded += 1,
            Err(TxError::SubmissionRejected { .. }) => stats.rejected += 1,
            Err(TxError::SubscriptionLost) => stats.lost += 1,
            Err(_) => stats.failed += 1,
        }
    }
}

#[async_trait]
impl TransactionApi for Submitter {
    #[instrument(skip_all, fields(kind = call.kind(), nonce = ?options.nonce))]
    async fn submit_and_await(
        &self,
        signer: &dyn Signer,
        call: CallDescriptor,
        options: SubmitOptions,
    ) -> Outcome {
        let mut pending = self.submit(signer, call, options).await?;
        let outcome = pending.wait().await;
        self.record(outcome.as_ref());
        info!(
            tx_id = %pending.id(),
            nonce = pending.extrinsic().nonce,
            ok = outcome.is_ok(),
            "Transaction finished"
        );
        outcome
    }
}
