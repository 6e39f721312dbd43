//! WebSocket JSON-RPC connection to a node.
//!
//! One reader task routes responses to request waiters (by JSON-RPC id)
//! and `author_extrinsicUpdate` notifications to per-subscription channels.
//! One writer task drains an outgoing queue, so release actions can send
//! `author_unwatchExtrinsic` from synchronous `Drop` code.
//!
//! When the socket closes, every waiter fails with `Closed` and every
//! subscription channel ends, which the engine reports as
//! `SubscriptionLost`.
//!
//! A submission whose acknowledgement times out leaves a tombstone under
//! its request id. If the node acknowledges it later, the subscription it
//! reports is unwatched at once; the transaction itself may still execute.

use crate::domain::{ContractQuery, SignedExtrinsic, TxSubscription};
use crate::errors::ConnectionError;
use crate::ports::NodeConnection;
use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::{AccountId, Bytes, Nonce, TxUpdate};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, trace, warn};

/// Notification method carrying transaction updates.
pub const EXTRINSIC_UPDATE: &str = "author_extrinsicUpdate";

type RpcResult = Result<Value, ConnectionError>;
type WatchResult = Result<(String, mpsc::UnboundedReceiver<TxUpdate>), ConnectionError>;

/// JSON-RPC request frame.
#[derive(Debug, Serialize)]
struct WsRequest<T: Serialize> {
    jsonrpc: &'static str,
    method: &'static str,
    params: T,
    id: u64,
}

/// Any frame the node sends: a response or a notification.
#[derive(Debug, Deserialize)]
struct RpcMessage {
    id: Option<u64>,
    result: Option<Value>,
    error: Option<RpcErrorObject>,
    method: Option<String>,
    params: Option<NotificationParams>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct NotificationParams {
    subscription: String,
    result: Value,
}

/// `contracts_call` result.
#[derive(Debug, Deserialize)]
struct CallResult {
    #[serde(default)]
    data: Option<Bytes>,
    #[serde(default)]
    error: Option<Value>,
}

enum Waiter {
    Call {
        method: &'static str,
        reply: oneshot::Sender<RpcResult>,
    },
    Watch {
        reply: oneshot::Sender<WatchResult>,
    },
    /// Submission whose caller stopped waiting for the acknowledgement.
    Abandoned,
}

/// State shared by the handle, the tasks and the release actions.
struct Shared {
    outgoing: mpsc::UnboundedSender<Message>,
    pending: DashMap<u64, Waiter>,
    subscriptions: DashMap<String, mpsc::UnboundedSender<TxUpdate>>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl Shared {
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn send<T: Serialize>(
        &self,
        id: u64,
        method: &'static str,
        params: T,
    ) -> Result<(), ConnectionError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ConnectionError::Closed);
        }
        let frame = serde_json::to_string(&WsRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        })
        .map_err(|e| ConnectionError::Decode {
            method: method.to_string(),
            reason: e.to_string(),
        })?;
        self.outgoing
            .send(Message::Text(frame.into()))
            .map_err(|_| ConnectionError::Closed)
    }

    /// Forget a subscription and tell the node. Fire-and-forget.
    fn unwatch(&self, subscription: &str) {
        if self.subscriptions.remove(subscription).is_some() {
            self.send_unwatch(subscription);
        }
    }

    fn send_unwatch(&self, subscription: &str) {
        let id = self.next_id();
        match self.send(id, "author_unwatchExtrinsic", [subscription]) {
            Ok(()) => debug!(subscription, "Sent author_unwatchExtrinsic"),
            Err(e) => trace!(subscription, error = %e, "Skipped unwatch on closed connection"),
        }
    }

    /// Stop waiting for request `id`. A pending submission becomes a
    /// tombstone so a late acknowledgement can still be unwatched.
    fn abandon(&self, id: u64) {
        let tombstoned = match self.pending.get_mut(&id) {
            Some(mut waiter) if matches!(*waiter, Waiter::Watch { .. }) => {
                *waiter = Waiter::Abandoned;
                true
            }
            _ => false,
        };
        if !tombstoned {
            self.pending.remove(&id);
        }
    }

    fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let ids: Vec<u64> = self.pending.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            if let Some((_, waiter)) = self.pending.remove(&id) {
                match waiter {
                    Waiter::Call { reply, .. } => {
                        let _ = reply.send(Err(ConnectionError::Closed));
                    }
                    Waiter::Watch { reply } => {
                        let _ = reply.send(Err(ConnectionError::Closed));
                    }
                    Waiter::Abandoned => {}
                }
            }
        }
        let open = self.subscriptions.len();
        self.subscriptions.clear();
        warn!(open_subscriptions = open, "Node connection closed");
    }

    fn handle_text(self: &Arc<Self>, text: &str) {
        let message = match serde_json::from_str::<RpcMessage>(text) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Ignoring unparseable frame");
                return;
            }
        };

        if let Some(id) = message.id {
            self.handle_response(id, message.result, message.error);
        } else if message.method.as_deref() == Some(EXTRINSIC_UPDATE) {
            if let Some(params) = message.params {
                self.handle_notification(params);
            }
        } else {
            trace!(method = ?message.method, "Ignoring notification");
        }
    }

    fn handle_response(
        self: &Arc<Self>,
        id: u64,
        result: Option<Value>,
        error: Option<RpcErrorObject>,
    ) {
        let Some((_, waiter)) = self.pending.remove(&id) else {
            trace!(id, "Response for unknown request id");
            return;
        };

        let result = match error {
            Some(e) => Err(ConnectionError::Rpc {
                code: e.code,
                message: e.message,
            }),
            None => Ok(result.unwrap_or(Value::Null)),
        };

        match waiter {
            Waiter::Call { method, reply } => {
                trace!(id, method, "Completed request");
                let _ = reply.send(result);
            }
            Waiter::Watch { reply } => {
                let watched = result.and_then(|value| match value {
                    Value::String(subscription) => Ok(subscription),
                    other => Err(ConnectionError::Decode {
                        method: "author_submitAndWatchExtrinsic".into(),
                        reason: format!("expected subscription id, got {other}"),
                    }),
                });
                match watched {
                    Ok(subscription) => {
                        // Registered here, before the next frame is read, so no
                        // update can overtake the subscription id.
                        let (tx, rx) = mpsc::unbounded_channel();
                        self.subscriptions.insert(subscription.clone(), tx);
                        if let Err(Ok((subscription, _))) = reply.send(Ok((subscription, rx))) {
                            self.unwatch(&subscription);
                        }
                    }
                    Err(e) => {
                        let _ = reply.send(Err(e));
                    }
                }
            }
            Waiter::Abandoned => match result {
                Ok(Value::String(subscription)) => {
                    warn!(id, %subscription, "Submission acknowledged after timeout; unwatching");
                    self.send_unwatch(&subscription);
                }
                other => trace!(id, reply = ?other, "Late reply to abandoned submission"),
            },
        }
    }

    fn handle_notification(&self, params: NotificationParams) {
        let update = match serde_json::from_value::<TxUpdate>(params.result) {
            Ok(update) => update,
            Err(e) => {
                warn!(
                    subscription = %params.subscription,
                    error = %e,
                    "Malformed extrinsic update"
                );
                return;
            }
        };
        let delivered = match self.subscriptions.get(&params.subscription) {
            Some(sender) => sender.send(update).is_ok(),
            None => {
                trace!(subscription = %params.subscription, "Update for released subscription");
                return;
            }
        };
        if !delivered {
            self.unwatch(&params.subscription);
        }
    }
}

/// Persistent WebSocket JSON-RPC 2.0 connection.
pub struct WsNodeConnection {
    url: String,
    shared: Arc<Shared>,
    request_timeout: Duration,
    tasks: Vec<JoinHandle<()>>,
}

impl WsNodeConnection {
    /// Connect to `url` (e.g. `ws://127.0.0.1:9944`).
    ///
    /// `request_timeout` bounds plain requests and the submission
    /// acknowledgement; it never bounds waiting for transaction updates.
    pub async fn connect(url: &str, request_timeout: Duration) -> Result<Self, ConnectionError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| ConnectionError::Connect {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        let (mut write, mut read) = stream.split();
        let (outgoing, mut outgoing_rx) = mpsc::unbounded_channel::<Message>();

        let shared = Arc::new(Shared {
            outgoing,
            pending: DashMap::new(),
            subscriptions: DashMap::new(),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        });

        let writer_shared = Arc::clone(&shared);
        let writer = tokio::spawn(async move {
            while let Some(message) = outgoing_rx.recv().await {
                if let Err(e) = write.send(message).await {
                    warn!(error = %e, "WebSocket write failed");
                    break;
                }
            }
            writer_shared.shutdown();
        });

        let reader_shared = Arc::clone(&shared);
        let reader = tokio::spawn(async move {
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(text)) => reader_shared.handle_text(text.as_str()),
                    Ok(Message::Ping(data)) => {
                        let _ = reader_shared.outgoing.send(Message::Pong(data));
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "WebSocket read failed");
                        break;
                    }
                }
            }
            reader_shared.shutdown();
        });

        info!(url, "Connected to node");
        Ok(Self {
            url: url.to_string(),
            shared,
            request_timeout,
            tasks: vec![writer, reader],
        })
    }

    /// Endpoint this connection was opened to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns true once the socket has closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Number of live transaction subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.shared.subscriptions.len()
    }

    async fn await_reply<T>(
        &self,
        id: u64,
        method: &'static str,
        rx: oneshot::Receiver<Result<T, ConnectionError>>,
    ) -> Result<T, ConnectionError> {
        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ConnectionError::Closed),
            Err(_) => {
                self.shared.abandon(id);
                let timeout_ms =
                    u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX);
                Err(ConnectionError::Timeout {
                    method: method.to_string(),
                    timeout_ms,
                })
            }
        }
    }

    async fn request<T: Serialize>(&self, method: &'static str, params: T) -> RpcResult {
        let id = self.shared.next_id();
        let (reply, rx) = oneshot::channel();
        self.shared.pending.insert(id, Waiter::Call { method, reply });
        if let Err(e) = self.shared.send(id, method, params) {
            self.shared.pending.remove(&id);
            return Err(e);
        }
        self.await_reply(id, method, rx).await
    }

    fn release_action(&self) -> impl FnOnce(&str) + Send + 'static {
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        move |subscription: &str| {
            if let Some(shared) = shared.upgrade() {
                shared.unwatch(subscription);
            }
        }
    }
}

impl Drop for WsNodeConnection {
    fn drop(&mut self) {
        self.shared.shutdown();
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[async_trait]
impl NodeConnection for WsNodeConnection {
    async fn submit_and_watch(
        &self,
        extrinsic: &SignedExtrinsic,
    ) -> Result<TxSubscription, ConnectionError> {
        const METHOD: &str = "author_submitAndWatchExtrinsic";
        let encoded = extrinsic.to_hex().map_err(|e| ConnectionError::Decode {
            method: METHOD.to_string(),
            reason: e.to_string(),
        })?;

        let id = self.shared.next_id();
        let (reply, rx) = oneshot::channel();
        self.shared.pending.insert(id, Waiter::Watch { reply });
        if let Err(e) = self.shared.send(id, METHOD, [encoded]) {
            self.shared.pending.remove(&id);
            return Err(e);
        }

        let (subscription, updates) = self.await_reply(id, METHOD, rx).await?;
        debug!(%subscription, nonce = extrinsic.nonce, "Watching extrinsic");
        Ok(TxSubscription::new(subscription, updates, self.release_action()))
    }

    async fn account_next_index(&self, account: &AccountId) -> Result<Nonce, ConnectionError> {
        const METHOD: &str = "system_accountNextIndex";
        let value = self.request(METHOD, [account.to_string()]).await?;
        value.as_u64().ok_or_else(|| ConnectionError::Decode {
            method: METHOD.to_string(),
            reason: format!("expected integer nonce, got {value}"),
        })
    }

    async fn query(&self, query: &ContractQuery) -> Result<Bytes, ConnectionError> {
        const METHOD: &str = "contracts_call";
        let value = self.request(METHOD, json!([query])).await?;
        let result: CallResult =
            serde_json::from_value(value).map_err(|e| ConnectionError::Decode {
                method: METHOD.to_string(),
                reason: e.to_string(),
            })?;
        match (result.data, result.error) {
            (_, Some(error)) => Err(ConnectionError::QueryFailed(error.to_string())),
            (Some(data), None) => Ok(data),
            (None, None) => Err(ConnectionError::Decode {
                method: METHOD.to_string(),
                reason: "missing data".into(),
            }),
        }
    }
}
