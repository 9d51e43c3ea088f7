//! JSON-RPC 2.0 message types for MCP protocol.
//!
//! This module defines the core message types used in the Model Context Protocol.
//! All messages follow the JSON-RPC 2.0 specification with MCP-specific extensions.
//!
//! # Message Types
//!
//! - **Request**: A message expecting a response (has `id`)
//! - **Response**: A reply to a request (success or error)
//! - **Notification**: A one-way message (no `id`, no response expected)
//!
//! Request IDs may be strings, any JSON number or `null`. Numeric IDs are
//! echoed back exactly as received. A `null` ID is also used on error replies
//! when the request ID could not be determined.
//!
//! The `jsonrpc` member is not required on incoming messages. A message is a
//! request when it has an `id` member and a notification otherwise.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// The MCP protocol version this implementation supports.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name for capability negotiation.
pub const SERVER_NAME: &str = "wcag-mcp";

/// Human-readable protocol label reported by the HTTP health check.
pub const PROTOCOL_LABEL: &str = "MCP JSON-RPC 2.0";

/// A JSON-RPC 2.0 request ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID, integer or fractional.
    Number(Number),
    /// String request ID.
    String(String),
    /// Explicit `null` ID.
    Null,
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => f.write_str("null"),
        }
    }
}

/// A JSON-RPC 2.0 request message.
///
/// Requests expect a response from the server.
#[derive(Debug, Clone)]
pub struct JsonRpcRequest {
    /// Request identifier.
    pub id: RequestId,

    /// The method to invoke.
    pub method: String,

    /// Optional parameters for the method.
    pub params: Option<Value>,
}

/// A JSON-RPC 2.0 notification message (incoming).
///
/// Notifications do not have an ID and do not expect a response.
#[derive(Debug, Clone)]
pub struct JsonRpcNotification {
    /// The notification method.
    pub method: String,

    /// Optional parameters for the notification.
    pub params: Option<Value>,
}

/// A successful JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this response corresponds to.
    pub id: RequestId,

    /// The result of the method call.
    pub result: Value,
}

impl JsonRpcResponse {
    /// Creates a new success response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result,
        }
    }
}

/// Standard JSON-RPC 2.0 error codes used by this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid JSON was received by the server.
    ParseError,
    /// Application-level failure: unknown method, unknown tool, bad arguments.
    InternalError,
}

impl ErrorCode {
    /// Returns the numeric code for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InternalError => -32603,
        }
    }

    /// Returns the default message for this error code.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InternalError => "Internal error",
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorData {
    /// The error code.
    pub code: i32,

    /// A short description of the error.
    pub message: String,
}

impl JsonRpcErrorData {
    /// Creates a new error with a custom message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
        }
    }
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this error corresponds to (`null` if unknown).
    pub id: RequestId,

    /// The error details.
    pub error: JsonRpcErrorData,
}

impl JsonRpcError {
    /// Creates a new error response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // JsonRpcErrorData contains String
    pub fn new(id: RequestId, error: JsonRpcErrorData) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            error,
        }
    }

    /// Creates a parse error response (ID cannot be determined).
    #[must_use]
    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(
            RequestId::Null,
            JsonRpcErrorData::with_message(
                ErrorCode::ParseError,
                format!("{}: {detail}", ErrorCode::ParseError.default_message()),
            ),
        )
    }

    /// Creates an unknown method error response.
    #[must_use]
    pub fn unknown_method(id: RequestId, method: &str) -> Self {
        Self::internal_error(id, format!("Unknown method: {method}"))
    }

    /// Creates an internal error response.
    #[must_use]
    pub fn internal_error(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::InternalError, message),
        )
    }
}

/// Either kind of reply to a request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JsonRpcReply {
    /// A success response.
    Success(JsonRpcResponse),
    /// An error response.
    Error(JsonRpcError),
}

impl JsonRpcReply {
    /// Returns the request ID this reply answers.
    #[must_use]
    pub const fn id(&self) -> &RequestId {
        match self {
            Self::Success(resp) => &resp.id,
            Self::Error(err) => &err.id,
        }
    }

    /// Returns `true` if this is an error reply.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<JsonRpcResponse> for JsonRpcReply {
    fn from(response: JsonRpcResponse) -> Self {
        Self::Success(response)
    }
}

impl From<JsonRpcError> for JsonRpcReply {
    fn from(error: JsonRpcError) -> Self {
        Self::Error(error)
    }
}

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    pub tools: ToolCapabilities,
}

/// Tool-specific capabilities (the tool list never changes).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Result of the `initialize` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Negotiated protocol version.
    pub protocol_version: String,
    /// Server capabilities.
    pub capabilities: ServerCapabilities,
    /// Server identity.
    pub server_info: ServerInfo,
}

impl Default for InitializeResult {
    fn default() -> Self {
        Self {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities::default(),
            server_info: ServerInfo::default(),
        }
    }
}

/// Client information received during initialisation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    #[serde(default)]
    pub protocol_version: Option<String>,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
}

impl ToolCallResult {
    /// Creates a text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
        }
    }
}

/// An incoming message that could be either a request or notification.
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    /// A request expecting a response.
    Request(JsonRpcRequest),
    /// A notification (no response expected).
    Notification(JsonRpcNotification),
    /// A value that names no method. Answered only when it carries an ID.
    Invalid {
        /// The ID, if the value had one.
        id: Option<RequestId>,
        /// What was wrong with it.
        reason: &'static str,
    },
}

impl IncomingMessage {
    /// Returns the method name of this message (empty when invalid).
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::Request(req) => &req.method,
            Self::Notification(notif) => &notif.method,
            Self::Invalid { .. } => "",
        }
    }

    /// Returns the request ID, if the message carried one.
    #[must_use]
    pub const fn id(&self) -> Option<&RequestId> {
        match self {
            Self::Request(req) => Some(&req.id),
            Self::Notification(_) => None,
            Self::Invalid { id, .. } => id.as_ref(),
        }
    }
}

/// Parses a JSON string into an incoming message.
///
/// # Errors
///
/// Returns a parse error reply if the text is not JSON at all.
pub fn parse_message(json: &str) -> Result<IncomingMessage, JsonRpcError> {
    let value: Value = serde_json::from_str(json).map_err(JsonRpcError::parse_error)?;
    Ok(parse_value(value))
}

/// Interprets an already-parsed JSON value as an incoming message.
///
/// Used directly for the elements of a batch. The `jsonrpc` member is
/// ignored; only `method` must be present.
#[must_use]
pub fn parse_value(value: Value) -> IncomingMessage {
    let Value::Object(mut obj) = value else {
        return IncomingMessage::Invalid {
            id: None,
            reason: "message is not a JSON object",
        };
    };

    // An ID of an unusable type still makes this a request, answered with null
    let id = obj
        .remove("id")
        .map(|raw| serde_json::from_value::<RequestId>(raw).unwrap_or(RequestId::Null));

    let Some(method) = take_method(&mut obj) else {
        return IncomingMessage::Invalid {
            id,
            reason: "Invalid request: missing method",
        };
    };
    let params = obj.remove("params").filter(|p| !p.is_null());

    match id {
        Some(id) => IncomingMessage::Request(JsonRpcRequest { id, method, params }),
        None => IncomingMessage::Notification(JsonRpcNotification { method, params }),
    }
}

fn take_method(obj: &mut Map<String, Value>) -> Option<String> {
    match obj.remove("method")? {
        Value::String(method) if !method.is_empty() => Some(method),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_request() {
        let json = r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}"#;
        let msg = parse_message(json).unwrap();

        let IncomingMessage::Request(req) = msg else {
            panic!("Expected Request, got Notification");
        };
        assert_eq!(req.id, RequestId::Number(1.into()));
        assert_eq!(req.method, "initialize");
    }

    #[test]
    fn parse_valid_notification() {
        let json = r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#;
        let msg = parse_message(json).unwrap();

        let IncomingMessage::Notification(notif) = msg else {
            panic!("Expected Notification, got Request");
        };
        assert_eq!(notif.method, "notifications/initialized");
    }

    #[test]
    fn parse_string_and_null_ids() {
        let json = r#"{"jsonrpc": "2.0", "id": "abc-123", "method": "test"}"#;
        let IncomingMessage::Request(req) = parse_message(json).unwrap() else {
            panic!("Expected Request, got Notification");
        };
        assert_eq!(req.id, RequestId::String("abc-123".to_string()));

        let json = r#"{"jsonrpc": "2.0", "id": null, "method": "ping"}"#;
        let IncomingMessage::Request(req) = parse_message(json).unwrap() else {
            panic!("Expected Request, got Notification");
        };
        assert_eq!(req.id, RequestId::Null);
    }

    #[test]
    fn parse_invalid_json() {
        let err = parse_message("not valid json").unwrap_err();
        assert_eq!(err.error.code, ErrorCode::ParseError.code());
        assert!(err.error.message.starts_with("Parse error: "));
        assert_eq!(err.id, RequestId::Null);
    }

    #[test]
    fn parse_without_jsonrpc_member() {
        let IncomingMessage::Request(req) = parse_message(r#"{"id": 7, "method": "ping"}"#).unwrap()
        else {
            panic!("Expected Request");
        };
        assert_eq!(req.id, RequestId::Number(7.into()));
        assert_eq!(req.method, "ping");

        let msg = parse_message(r#"{"method": "notifications/initialized"}"#).unwrap();
        assert!(matches!(msg, IncomingMessage::Notification(_)));
    }

    #[test]
    fn parse_ignores_jsonrpc_version() {
        let msg = parse_message(r#"{"jsonrpc": "1.0", "id": 1, "method": "ping"}"#).unwrap();
        assert_eq!(msg.method(), "ping");
        assert_eq!(msg.id(), Some(&RequestId::Number(1.into())));
    }

    #[test]
    fn numeric_ids_echo_unchanged() {
        for raw in ["1.5", "18446744073709551615", "-3", "0"] {
            let line = format!(r#"{{"id": {raw}, "method": "ping"}}"#);
            let msg = parse_message(&line).unwrap();
            let id = msg.id().unwrap().clone();
            let reply = serde_json::to_string(&JsonRpcResponse::success(id, Value::Null)).unwrap();
            assert!(reply.contains(&format!(r#""id":{raw}"#)), "{reply}");
        }
    }

    #[test]
    fn missing_method_keeps_id() {
        let msg = parse_message(r#"{"id": 7, "params": {}}"#).unwrap();
        let IncomingMessage::Invalid { id, .. } = msg else {
            panic!("Expected Invalid");
        };
        assert_eq!(id, Some(RequestId::Number(7.into())));
    }

    #[test]
    fn non_object_value_has_no_id() {
        for value in [serde_json::json!(42), serde_json::json!("ping"), serde_json::json!({"method": 3})] {
            let msg = parse_value(value);
            assert!(matches!(msg, IncomingMessage::Invalid { id: None, .. }));
        }
    }

    #[test]
    fn serialise_success_response() {
        let response =
            JsonRpcResponse::success(RequestId::Number(1.into()), serde_json::json!({"ok": true}));
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""jsonrpc":"2.0""#));
        assert!(json.contains(r#""id":1"#));
        assert!(json.contains(r#""result":{"ok":true}"#));
    }

    #[test]
    fn serialise_error_response() {
        let error = JsonRpcError::unknown_method(RequestId::Number(1.into()), "unknown/method");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains(r#""jsonrpc":"2.0""#));
        assert!(json.contains(r#""id":1"#));
        assert!(json.contains(r#""code":-32603"#));
        assert!(json.contains("Unknown method: unknown/method"));
    }

    #[test]
    fn parse_error_serialises_null_id() {
        let json = serde_json::to_value(JsonRpcError::parse_error("eof")).unwrap();
        assert_eq!(json["id"], Value::Null);
        assert_eq!(json["error"]["code"], -32700);
    }

    #[test]
    fn reply_round_trip_preserves_shape() {
        let replies: Vec<JsonRpcReply> = vec![
            JsonRpcResponse::success(RequestId::String("a".into()), serde_json::json!({})).into(),
            JsonRpcError::internal_error(RequestId::Number(9.into()), "boom").into(),
        ];

        for reply in replies {
            let text = serde_json::to_string(&reply).unwrap();
            let reparsed: Value = serde_json::from_str(&text).unwrap();
            let id: RequestId = serde_json::from_value(reparsed["id"].clone()).unwrap();
            assert_eq!(&id, reply.id());
            assert_eq!(reparsed.get("error").is_some(), reply.is_error());
            assert_eq!(reparsed.get("result").is_some(), !reply.is_error());
        }
    }

    #[test]
    fn initialize_result_shape() {
        let value = serde_json::to_value(InitializeResult::default()).unwrap();
        assert_eq!(value["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(value["capabilities"]["tools"], serde_json::json!({}));
        assert_eq!(value["serverInfo"]["name"], SERVER_NAME);
    }

    #[test]
    fn request_id_display() {
        assert_eq!(format!("{}", RequestId::Number(42.into())), "42");
        assert_eq!(format!("{}", RequestId::String("abc".to_string())), "abc");
        assert_eq!(format!("{}", RequestId::Null), "null");
    }
}
