//! # Pending Transaction
//!
//! A submitted transaction together with its update stream and engine.
//! The subscription is exclusively owned; it is released on resolution,
//! on [`PendingTransaction::cancel`], or when the handle is dropped.

use crate::domain::engine::{ConfirmationEngine, Outcome, TxState};
use crate::domain::extrinsic::SignedExtrinsic;
use crate::domain::subscription::TxSubscription;
use shared_types::ChainEvent;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One in-flight transaction.
#[derive(Debug)]
pub struct PendingTransaction {
    id: Uuid,
    extrinsic: SignedExtrinsic,
    subscription: Option<TxSubscription>,
    engine: ConfirmationEngine,
    observed: Vec<ChainEvent>,
}

impl PendingTransaction {
    /// Wrap an accepted submission.
    pub fn new(
        extrinsic: SignedExtrinsic,
        subscription: TxSubscription,
        mut engine: ConfirmationEngine,
    ) -> Self {
        engine.mark_submitted();
        Self {
            id: Uuid::new_v4(),
            extrinsic,
            subscription: Some(subscription),
            engine,
            observed: Vec::new(),
        }
    }

    /// Local correlation id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The signed envelope that was broadcast.
    #[must_use]
    pub fn extrinsic(&self) -> &SignedExtrinsic {
        &self.extrinsic
    }

    /// Every event processed so far, in arrival order.
    #[must_use]
    pub fn observed_events(&self) -> &[ChainEvent] {
        &self.observed
    }

    /// Current engine state.
    #[must_use]
    pub fn state(&self) -> TxState {
        self.engine.state()
    }

    /// Returns true while the node-side subscription is held.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(TxSubscription::is_active)
    }

    /// Drive the update stream until the transaction resolves.
    ///
    /// Calling it again after resolution returns the same outcome without
    /// reading any further updates.
    pub async fn wait(&mut self) -> Outcome {
        if let Some(outcome) = self.engine.outcome() {
            return outcome.clone();
        }

        loop {
            let next = match self.subscription.as_mut() {
                Some(subscription) => subscription.next().await,
                None => None,
            };

            let Some(update) = next else {
                warn!(
                    tx_id = %self.id,
                    state = ?self.engine.state(),
                    "Update stream ended before resolution"
                );
                let outcome = self.engine.end_of_stream();
                self.release();
                return outcome;
            };

            let batch = update.into_batch();
            debug!(
                tx_id = %self.id,
                events = ?batch.iter().map(ChainEvent::kind).collect::<Vec<_>>(),
                "Received update batch"
            );
            self.observed.extend(batch.iter().cloned());

            if let Some(outcome) = self.engine.apply(&batch) {
                self.release();
                match &outcome {
                    Ok(confirmation) => {
                        info!(tx_id = %self.id, ?confirmation, "Transaction resolved")
                    }
                    Err(e) => {
                        warn!(tx_id = %self.id, kind = e.kind(), error = %e, "Transaction failed")
                    }
                }
                return outcome;
            }
        }
    }

    /// Stop tracking and release the subscription. A later [`wait`]
    /// resolves with `SubscriptionLost` unless an outcome was already known.
    ///
    /// [`wait`]: PendingTransaction::wait
    pub fn cancel(&mut self) {
        if self.subscription.is_some() {
            debug!(tx_id = %self.id, "Cancelling pending transaction");
        }
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}
