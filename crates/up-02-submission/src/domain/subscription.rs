//! # Transaction Subscription
//!
//! Handle to the node's update stream for one watched transaction.
//!
//! The handle owns a release action supplied by the connection that created
//! it. The action runs exactly once: on [`TxSubscription::unsubscribe`], or
//! when the handle is dropped.

use shared_types::TxUpdate;
use std::fmt;
use tokio::sync::mpsc;
use tracing::debug;

type ReleaseFn = Box<dyn FnOnce(&str) + Send>;

/// Update stream for one transaction.
pub struct TxSubscription {
    id: String,
    updates: mpsc::UnboundedReceiver<TxUpdate>,
    release: Option<ReleaseFn>,
}

impl TxSubscription {
    /// Create a subscription whose release action is `release(id)`.
    pub fn new(
        id: impl Into<String>,
        updates: mpsc::UnboundedReceiver<TxUpdate>,
        release: impl FnOnce(&str) + Send + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            updates,
            release: Some(Box::new(release)),
        }
    }

    /// Create a subscription with nothing to release on the node side.
    pub fn detached(id: impl Into<String>, updates: mpsc::UnboundedReceiver<TxUpdate>) -> Self {
        Self {
            id: id.into(),
            updates,
            release: None,
        }
    }

    /// Node-assigned subscription id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Next update, or `None` once the stream has ended or been released.
    pub async fn next(&mut self) -> Option<TxUpdate> {
        self.updates.recv().await
    }

    /// Stop receiving updates and release the node-side subscription.
    /// Calling it again does nothing.
    pub fn unsubscribe(&mut self) {
        self.updates.close();
        if let Some(release) = self.release.take() {
            debug!(subscription = %self.id, "Releasing transaction subscription");
            release(&self.id);
        }
    }

    /// Returns true until the subscription has been released.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }
}

impl Drop for TxSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for TxSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxSubscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
