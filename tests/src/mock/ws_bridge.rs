//! # WebSocket Bridge
//!
//! Serves a [`MockNode`] over JSON-RPC on a local WebSocket so the real
//! `WsNodeConnection` can be driven end to end.

use crate::mock::node::MockNode;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use shared_types::AccountId;
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};
use tracing::debug;
use up_02_submission::{
    ConnectionError, ContractQuery, NodeConnection, SignedExtrinsic, TxSubscription,
    EXTRINSIC_UPDATE,
};

/// Bind a local listener and serve `node` to every client. Returns the URL.
pub async fn serve(node: Arc<MockNode>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let node = Arc::clone(&node);
            tokio::spawn(async move {
                if let Ok(ws) = accept_async(stream).await {
                    session(node, ws).await;
                }
            });
        }
    });

    format!("ws://{addr}")
}

fn response(id: &Value, result: Result<Value, ConnectionError>) -> Value {
    match result {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(ConnectionError::Rpc { code, message }) => {
            json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
        }
        Err(other) => {
            let error = json!({ "code": -32603, "message": other.to_string() });
            json!({ "jsonrpc": "2.0", "id": id, "error": error })
        }
    }
}

fn invalid_params(reason: impl ToString) -> ConnectionError {
    ConnectionError::Rpc {
        code: -32602,
        message: format!("Invalid params: {}", reason.to_string()),
    }
}

async fn session(node: Arc<MockNode>, ws: WebSocketStream<TcpStream>) {
    let (mut write, mut read) = ws.split();
    let (out, mut out_rx) = mpsc::unbounded_channel::<Value>();

    let writer = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if write.send(Message::Text(frame.to_string().into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(frame)) = read.next().await {
        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        let Ok(request) = serde_json::from_str::<Value>(text.as_str()) else {
            continue;
        };
        let id = request["id"].clone();
        let param = request["params"][0].clone();
        let method = request["method"].as_str().unwrap_or_default().to_string();
        debug!(%method, "Bridge request");

        let result = match method.as_str() {
            "author_submitAndWatchExtrinsic" => match submit(&node, &param).await {
                Ok(subscription) => {
                    // The id goes out before any update for it.
                    let _ = out.send(response(&id, Ok(json!(subscription.id()))));
                    tokio::spawn(forward(subscription, out.clone()));
                    continue;
                }
                Err(e) => Err(e),
            },
            "author_unwatchExtrinsic" => Ok(json!(true)),
            "system_accountNextIndex" => match param.as_str().map(AccountId::from_str) {
                Some(Ok(account)) => node.account_next_index(&account).await.map(|n| json!(n)),
                _ => Err(invalid_params("expected account")),
            },
            "contracts_call" => match serde_json::from_value::<ContractQuery>(param) {
                Ok(query) => match node.query(&query).await {
                    Ok(data) => Ok(json!({ "data": data })),
                    Err(ConnectionError::QueryFailed(reason)) => Ok(json!({ "error": reason })),
                    Err(e) => Err(e),
                },
                Err(e) => Err(invalid_params(e)),
            },
            other => Err(ConnectionError::Rpc {
                code: -32601,
                message: format!("Method not found: {other}"),
            }),
        };
        let _ = out.send(response(&id, result));
    }

    writer.abort();
}

async fn submit(node: &MockNode, param: &Value) -> Result<TxSubscription, ConnectionError> {
    let encoded = param.as_str().ok_or_else(|| invalid_params("expected hex"))?;
    let extrinsic = SignedExtrinsic::from_hex(encoded).map_err(invalid_params)?;
    node.submit_and_watch(&extrinsic).await
}

async fn forward(mut subscription: TxSubscription, out: mpsc::UnboundedSender<Value>) {
    let id = subscription.id().to_string();
    while let Some(update) = subscription.next().await {
        let frame = json!({
            "jsonrpc": "2.0",
            "method": EXTRINSIC_UPDATE,
            "params": { "subscription": id, "result": update },
        });
        if out.send(frame).is_err() {
            break;
        }
    }
}
