//! wcag-mcp: MCP server and REST bridge for the WCAG 2.2 dataset
//!
//! This library exposes WCAG 2.2 principles, guidelines, success criteria,
//! techniques and glossary terms as a catalog of read-only tools that AI
//! assistants call over the Model Context Protocol.
//!
//! # Architecture
//!
//! ```text
//! wcag.json ─▶ WcagDocument ─▶ ToolRegistry ─▶ McpHandler ─┬─▶ stdio
//!               (query layer)   (20 tools)     (JSON-RPC)  ├─▶ POST /mcp
//!                                                          └─▶ /bridge (REST, via /mcp)
//! ```
//!
//! Every tool returns Markdown-flavoured text. Lookups that find nothing
//! answer with explanatory text, never with a protocol error.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Configuration error types
//! - [`wcag`]: Dataset model and query layer
//! - [`tools`]: Tool catalog and registry
//! - [`mcp`]: MCP protocol, dispatch and stdio server
//! - [`http`]: Stateless JSON-RPC endpoint and REST bridge

pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod tools;
pub mod wcag;
