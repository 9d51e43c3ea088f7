//! Stdio MCP server.
//!
//! Reads newline-delimited JSON-RPC from stdin, dispatches each message
//! through [`McpHandler`], and writes replies to stdout. Logging goes to
//! stderr only.
//!
//! The server tracks the lifecycle for logging but never gates on it:
//! `tools/list` and `tools/call` are served before `initialize`, matching the
//! stateless HTTP adapter.
//!
//! The loop ends on EOF, SIGINT or SIGTERM (Ctrl+C on Windows).

use std::sync::Arc;

use crate::mcp::dispatch::McpHandler;
use crate::mcp::protocol::{parse_message, IncomingMessage, JsonRpcReply};
use crate::mcp::transport::StdioTransport;
use crate::tools::ToolRegistry;

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// No `initialize` request seen yet.
    AwaitingInit,
    /// `initialize` answered.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// The stdio MCP server.
pub struct McpServer {
    /// Current server state.
    state: ServerState,
    /// The transport layer.
    transport: StdioTransport,
    /// Shared method table.
    handler: McpHandler,
}

impl McpServer {
    /// Creates a server over stdin/stdout serving the given registry.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            transport: StdioTransport::stdio(),
            handler: McpHandler::new(registry),
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Runs the MCP server main loop with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        tracing::info!(tools = self.handler.registry().len(), "Stdio server ready");
        self.run_with_shutdown().await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(std::io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(std::io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: std::io::Result<Option<String>>,
    ) -> std::io::Result<bool> {
        let Some(line) = line_result? else {
            tracing::info!("stdin closed, shutting down");
            self.state = ServerState::ShuttingDown;
            return Ok(true);
        };

        if line.trim().is_empty() {
            return Ok(false);
        }

        self.handle_line(&line).await?;
        Ok(false)
    }

    /// Handles a single line of input.
    async fn handle_line(&mut self, line: &str) -> std::io::Result<()> {
        match parse_message(line) {
            Ok(msg) => self.handle_message(msg).await,
            Err(error) => {
                tracing::debug!(code = error.error.code, "Rejected malformed message");
                self.transport.write_reply(&JsonRpcReply::from(error)).await
            }
        }
    }

    /// Handles a parsed incoming message.
    async fn handle_message(&mut self, msg: IncomingMessage) -> std::io::Result<()> {
        self.track_lifecycle(&msg);

        match self.handler.handle(msg) {
            Some(reply) => self.transport.write_reply(&reply).await,
            None => Ok(()),
        }
    }

    fn track_lifecycle(&mut self, msg: &IncomingMessage) {
        if self.state == ServerState::AwaitingInit && msg.method() == "initialize" {
            self.state = ServerState::Running;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wcag::WcagDocument;

    fn server() -> McpServer {
        let document = WcagDocument::from_json(
            r#"{"principles": [{"id": "robust", "num": "4", "handle": "Robust"}]}"#,
        )
        .unwrap();
        McpServer::new(Arc::new(ToolRegistry::new(Arc::new(document))))
    }

    #[test]
    fn server_starts_awaiting_init() {
        assert_eq!(server().state(), ServerState::AwaitingInit);
    }

    #[test]
    fn initialize_moves_to_running() {
        let mut server = server();
        let msg = parse_message(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).unwrap();
        server.track_lifecycle(&msg);
        assert_eq!(server.state(), ServerState::AwaitingInit);

        let msg = parse_message(r#"{"jsonrpc":"2.0","id":2,"method":"initialize"}"#).unwrap();
        server.track_lifecycle(&msg);
        assert_eq!(server.state(), ServerState::Running);
    }
}
