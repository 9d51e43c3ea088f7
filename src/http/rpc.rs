//! Stateless JSON-RPC over HTTP at `/mcp`.
//!
//! Each POST body is either one message or a batch array. Nothing is kept
//! between requests.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::mcp::protocol::{parse_value, JsonRpcError, JsonRpcReply, PROTOCOL_LABEL, SERVER_NAME};
use crate::mcp::McpHandler;

/// `GET /mcp`: health check.
pub async fn health(State(handler): State<McpHandler>) -> Json<Value> {
    Json(json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy",
        "protocol": PROTOCOL_LABEL,
        "tools": handler.registry().len(),
    }))
}

/// `POST /mcp`: one message or a batch.
pub async fn rpc(State(handler): State<McpHandler>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected malformed HTTP body");
            let reply = JsonRpcReply::from(JsonRpcError::parse_error(e));
            return (StatusCode::BAD_REQUEST, Json(reply)).into_response();
        }
    };

    match payload {
        Value::Array(batch) => batch_response(handle_batch(&handler, batch)),
        single => match handle_one(&handler, single) {
            Some(reply) => Json(reply).into_response(),
            None => StatusCode::ACCEPTED.into_response(),
        },
    }
}

fn handle_one(handler: &McpHandler, value: Value) -> Option<JsonRpcReply> {
    handler.handle(parse_value(value))
}

/// Processes batch elements in order, dropping the ones with no reply.
fn handle_batch(handler: &McpHandler, batch: Vec<Value>) -> Vec<JsonRpcReply> {
    batch
        .into_iter()
        .filter_map(|value| handle_one(handler, value))
        .collect()
}

/// A lone surviving reply is sent bare; anything else as an array.
fn batch_response(mut replies: Vec<JsonRpcReply>) -> Response {
    if replies.len() == 1 {
        if let Some(reply) = replies.pop() {
            return Json(reply).into_response();
        }
    }
    Json(replies).into_response()
}
