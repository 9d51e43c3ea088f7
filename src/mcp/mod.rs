//! Model Context Protocol (MCP) server implementation.
//!
//! This module implements the MCP specification for exposing the WCAG tool
//! catalog to AI assistants. Messages are JSON-RPC 2.0.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        MCP Server                            │
//! │                                                              │
//! │   ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │   │  Transport  │───▶│  Dispatch   │───▶│   Tools     │     │
//! │   │ (stdio/http)│    │ (methods)   │    │  (registry) │     │
//! │   └─────────────┘    └─────────────┘    └─────────────┘     │
//! │          │                  │                  │             │
//! │          ▼                  ▼                  ▼             │
//! │   ┌─────────────────────────────────────────────────┐       │
//! │   │              JSON-RPC Messages                  │       │
//! │   └─────────────────────────────────────────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stdio server lives here; the HTTP adapters in [`crate::http`] share
//! the same [`dispatch::McpHandler`].
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod dispatch;
pub mod protocol;
pub mod server;
pub mod transport;

pub use dispatch::McpHandler;
pub use protocol::{
    JsonRpcError, JsonRpcReply, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION,
};
pub use server::McpServer;
pub use transport::{LineTransport, StdioTransport};
