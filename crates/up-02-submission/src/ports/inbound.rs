//! # Driving Ports (API - Inbound)
//!
//! What the deployment orchestrator and workflow driver call.

use crate::domain::{CallDescriptor, Confirmation, SubmitOptions};
use crate::errors::TxError;
use crate::ports::outbound::Signer;
use async_trait::async_trait;

/// Submit one state-changing call and wait for its terminal outcome.
#[async_trait]
pub trait TransactionApi: Send + Sync {
    /// Sign, broadcast and track `call` until the node's event stream
    /// yields a terminal outcome.
    ///
    /// There is no internal timeout. Wrap the future in
    /// `tokio::time::timeout` to bound it; dropping the future releases the
    /// node-side subscription.
    async fn submit_and_await(
        &self,
        signer: &dyn Signer,
        call: CallDescriptor,
        options: SubmitOptions,
    ) -> Result<Confirmation, TxError>;
}
