//! Transport-independent JSON-RPC method table.
//!
//! Every adapter (stdio, stateless HTTP) parses its input into
//! [`IncomingMessage`]s and hands them to [`McpHandler::handle`]. The handler
//! keeps no per-connection state: `tools/list` and `tools/call` are served
//! whether or not `initialize` was seen first.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::mcp::protocol::{
    IncomingMessage, InitializeParams, InitializeResult, JsonRpcError, JsonRpcReply,
    JsonRpcRequest, JsonRpcResponse, RequestId, ToolCallParams, ToolCallResult,
};
use crate::tools::ToolRegistry;

/// Notification sent by clients once initialisation completes.
pub const INITIALIZED_NOTIFICATION: &str = "notifications/initialized";

/// Dispatches MCP methods against a tool registry.
#[derive(Debug, Clone)]
pub struct McpHandler {
    registry: Arc<ToolRegistry>,
}

impl McpHandler {
    /// Creates a handler serving the given registry.
    #[must_use]
    pub const fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry this handler serves.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handles one message. Returns `None` when no reply must be sent.
    #[must_use]
    pub fn handle(&self, message: IncomingMessage) -> Option<JsonRpcReply> {
        match message {
            IncomingMessage::Request(req) => self.handle_request(&req),
            IncomingMessage::Notification(notif) => {
                tracing::debug!(method = %notif.method, "Notification received");
                None
            }
            IncomingMessage::Invalid { id: Some(id), reason } => {
                tracing::debug!(%id, reason, "Invalid request");
                Some(JsonRpcError::internal_error(id, reason).into())
            }
            IncomingMessage::Invalid { id: None, reason } => {
                tracing::debug!(reason, "Dropped invalid message without ID");
                None
            }
        }
    }

    /// Handles a request that carries an ID.
    ///
    /// `notifications/initialized` is never answered, even when sent with an ID.
    #[must_use]
    pub fn handle_request(&self, req: &JsonRpcRequest) -> Option<JsonRpcReply> {
        tracing::debug!(method = %req.method, id = %req.id, "Request received");

        let reply = match req.method.as_str() {
            INITIALIZED_NOTIFICATION => return None,
            "initialize" => Ok(Self::handle_initialize(req)),
            "tools/list" => Ok(self.handle_tools_list(req)),
            "tools/call" => self.handle_tools_call(req),
            "ping" => Ok(JsonRpcResponse::success(req.id.clone(), json!({}))),
            other => {
                tracing::warn!(method = other, "Unknown method");
                Err(JsonRpcError::unknown_method(req.id.clone(), other))
            }
        };

        Some(match reply {
            Ok(response) => response.into(),
            Err(error) => error.into(),
        })
    }

    fn handle_initialize(req: &JsonRpcRequest) -> JsonRpcResponse {
        let client = req
            .params
            .clone()
            .and_then(|p| serde_json::from_value::<InitializeParams>(p).ok())
            .and_then(|p| p.client_info);
        if let Some(client) = client {
            tracing::info!(
                client = %client.name,
                version = client.version.as_deref().unwrap_or("unknown"),
                "Client initialising"
            );
        }

        Self::success(req.id.clone(), &InitializeResult::default())
    }

    fn handle_tools_list(&self, req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(
            req.id.clone(),
            json!({ "tools": self.registry.definitions() }),
        )
    }

    fn handle_tools_call(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        let params: ToolCallParams = req
            .params
            .as_ref()
            .map(|p| serde_json::from_value(p.clone()))
            .transpose()
            .map_err(|e| {
                JsonRpcError::internal_error(req.id.clone(), format!("Invalid tool call params: {e}"))
            })?
            .ok_or_else(|| JsonRpcError::internal_error(req.id.clone(), "Missing tool call params"))?;

        tracing::info!(tool = %params.name, "Tool call");

        let text = self
            .registry
            .call(&params.name, params.arguments)
            .map_err(|e| JsonRpcError::internal_error(req.id.clone(), e.to_string()))?;

        Ok(Self::success(req.id.clone(), &ToolCallResult::text(text)))
    }

    fn success(id: RequestId, result: &impl serde::Serialize) -> JsonRpcResponse {
        // Serialising these plain structs cannot fail
        let value = serde_json::to_value(result).unwrap_or(Value::Null);
        JsonRpcResponse::success(id, value)
    }
}
