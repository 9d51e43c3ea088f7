//! REST bridge at `/bridge`.
//!
//! Each tool is exposed as `POST /bridge/tools/{name}` taking the tool's
//! arguments as the JSON body and answering `{"content": "<text>"}`. Calls are
//! forwarded as `tools/call` over HTTP to a JSON-RPC backend, by default this
//! server's own `/mcp` endpoint on the address it is bound to. The backend is
//! never derived from request headers.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::http::auth::BridgeAuth;
use crate::http::openapi;
use crate::tools::ToolRegistry;

/// Bridge settings fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct BridgeSettings {
    /// Who may call tools.
    pub auth: BridgeAuth,
    /// JSON-RPC endpoint to forward to. See [`Self::with_local_backend`].
    pub backend_url: Option<String>,
    /// Base URL advertised in the OpenAPI document. Defaults to the origin.
    pub public_url: Option<String>,
}

impl BridgeSettings {
    /// Fills in `backend_url` with this server's own `/mcp` at `addr`, unless
    /// one is configured.
    #[must_use]
    pub fn with_local_backend(mut self, addr: SocketAddr) -> Self {
        if self.backend_url.is_none() {
            self.backend_url = Some(local_backend_url(addr));
        }
        self
    }
}

/// `/mcp` on a bound address. Wildcard binds are reached over loopback.
#[must_use]
pub fn local_backend_url(addr: SocketAddr) -> String {
    let ip = match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    format!("http://{}/mcp", SocketAddr::new(ip, addr.port()))
}

/// Shared state of the bridge handlers.
#[derive(Debug, Clone)]
pub struct BridgeState {
    registry: Arc<ToolRegistry>,
    settings: Arc<BridgeSettings>,
    client: reqwest::Client,
}

impl BridgeState {
    /// Creates the bridge state.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>, settings: BridgeSettings) -> Self {
        Self {
            registry,
            settings: Arc::new(settings),
            client: reqwest::Client::new(),
        }
    }

    fn backend_url(&self) -> Result<&str, BridgeError> {
        self.settings
            .backend_url
            .as_deref()
            .ok_or(BridgeError::NoBackend)
    }

    fn public_url(&self, headers: &HeaderMap) -> String {
        self.settings.public_url.as_deref().map_or_else(
            || request_origin(headers),
            |url| url.trim_end_matches('/').to_string(),
        )
    }

    /// Forwards one tool call and extracts the first text part of the result.
    async fn call_backend(
        &self,
        url: &str,
        tool: &str,
        arguments: Value,
    ) -> Result<String, BridgeError> {
        let request = json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": { "name": tool, "arguments": arguments },
            "id": 1,
        });

        let response = self.client.post(url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let data: Value = serde_json::from_str(&body).map_err(|_| BridgeError::NonJson {
            status: status.as_u16(),
        })?;

        if !status.is_success() {
            let message = data
                .pointer("/error/message")
                .and_then(Value::as_str)
                .or_else(|| data.get("message").and_then(Value::as_str))
                .or_else(|| status.canonical_reason())
                .unwrap_or("Upstream error")
                .to_string();
            return Err(BridgeError::UpstreamStatus {
                status: status.as_u16(),
                message,
            });
        }

        if let Some(error) = data.get("error").filter(|e| !e.is_null()) {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("MCP error");
            return Err(BridgeError::Rpc(message.to_string()));
        }

        Ok(first_text(&data))
    }
}

/// Failures of a bridged tool call, each mapped to an HTTP status.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No tool with this name is registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Credentials missing or wrong.
    #[error("Missing or invalid API key")]
    Unauthorized,

    /// The request body is not JSON.
    #[error("Invalid JSON body")]
    InvalidBody,

    /// No backend URL is configured.
    #[error("MCP backend not configured")]
    NoBackend,

    /// The backend answered with a non-success HTTP status.
    #[error("{message}")]
    UpstreamStatus {
        /// Backend HTTP status.
        status: u16,
        /// Message taken from the backend body, or the status reason.
        message: String,
    },

    /// The backend answered with a JSON-RPC error.
    #[error("{0}")]
    Rpc(String),

    /// The backend body is not JSON.
    #[error("MCP backend returned non-JSON: {status}")]
    NonJson {
        /// Backend HTTP status.
        status: u16,
    },

    /// The backend could not be reached or its body could not be read.
    #[error("MCP backend unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
}

impl BridgeError {
    /// Returns the HTTP status reported to the caller.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UnknownTool(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidBody | Self::Rpc(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamStatus { status, .. } if *status >= 400 && *status < 500 => {
                StatusCode::BAD_REQUEST
            }
            Self::NoBackend
            | Self::UpstreamStatus { .. }
            | Self::NonJson { .. }
            | Self::Unreachable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// `GET /bridge/openapi.json`.
pub async fn openapi_document(
    State(state): State<BridgeState>,
    headers: HeaderMap,
) -> Json<Value> {
    Json(openapi::document(&state.registry, &state.public_url(&headers)))
}

/// `POST /bridge/tools/{name}`.
pub async fn call_tool(
    State(state): State<BridgeState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, BridgeError> {
    let name = name.trim();
    if !state.registry.contains(name) {
        return Err(BridgeError::UnknownTool(name.to_string()));
    }

    if !state.settings.auth.authorize(&headers) {
        tracing::debug!(tool = name, "Bridge call rejected: unauthorized");
        return Err(BridgeError::Unauthorized);
    }

    let arguments = parse_arguments(&body)?;
    let url = state.backend_url()?;

    match state.call_backend(url, name, arguments).await {
        Ok(content) => Ok(Json(json!({ "content": content }))),
        Err(e) => {
            tracing::warn!(tool = name, backend = %url, error = %e, "Bridge upstream failure");
            Err(e)
        }
    }
}

/// Answers `/bridge/tools/` with no tool name.
pub async fn missing_tool_name() -> Response {
    not_found_with("Tool name missing")
}

/// Fallback for everything the router does not match.
pub async fn not_found() -> Response {
    not_found_with("Not found")
}

fn not_found_with(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// An empty or `null` body means no arguments.
fn parse_arguments(body: &[u8]) -> Result<Value, BridgeError> {
    if body.is_empty() {
        return Ok(json!({}));
    }
    match serde_json::from_slice(body).map_err(|_| BridgeError::InvalidBody)? {
        Value::Null => Ok(json!({})),
        value => Ok(value),
    }
}

fn first_text(data: &Value) -> String {
    data.pointer("/result/content")
        .and_then(Value::as_array)
        .and_then(|parts| {
            parts
                .iter()
                .find(|p| p.get("type").and_then(Value::as_str) == Some("text"))
        })
        .and_then(|p| p.get("text"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Reconstructs `{scheme}://{host}` from the request headers.
///
/// The scheme is `https` only when `x-forwarded-proto` says so.
fn request_origin(headers: &HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let scheme = match headers.get("x-forwarded-proto").and_then(|v| v.to_str().ok()) {
        Some("https") => "https",
        _ => "http",
    };
    format!("{scheme}://{host}")
}
