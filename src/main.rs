//! wcag-mcp: MCP server and REST bridge for the WCAG 2.2 dataset
//!
//! Serves the tool catalog over stdio (default) or over HTTP at `/mcp` and
//! `/bridge`.

use std::error::Error as _;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use wcag_mcp::config::{self, Config};
use wcag_mcp::error::ConfigError;
use wcag_mcp::http::{self, BridgeAuth, BridgeSettings};
use wcag_mcp::mcp::server::McpServer;
use wcag_mcp::tools::ToolRegistry;
use wcag_mcp::wcag::WcagDocument;

/// MCP server for WCAG 2.2 success criteria, techniques and glossary.
///
/// Speaks newline-delimited JSON-RPC on stdin/stdout by default, or serves
/// a stateless JSON-RPC endpoint and a REST bridge over HTTP.
#[derive(Parser, Debug)]
#[command(name = "wcag-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Path to the WCAG dataset (overrides `data_path`)
    #[arg(long, value_name = "PATH", env = "WCAG_DATA_PATH")]
    data: Option<PathBuf>,

    /// Transport to serve
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// HTTP listen address (overrides `http.listen`)
    #[arg(long, value_name = "ADDR", env = "WCAG_LISTEN")]
    listen: Option<String>,

    /// API key required by the REST bridge (open when unset)
    #[arg(long, value_name = "KEY", env = "BRIDGE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// JSON-RPC over stdin/stdout
    Stdio,
    /// `/mcp` and `/bridge` over HTTP
    Http,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
///
/// Always writes to stderr; stdout carries MCP messages.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Applies CLI and environment overrides on top of the file configuration.
fn apply_overrides(mut cfg: Config, args: &Args) -> Result<Config, ConfigError> {
    if let Some(data) = &args.data {
        cfg.data_path.clone_from(data);
    }
    if let Some(listen) = &args.listen {
        cfg.http.listen.clone_from(listen);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Prints an error and its source chain to stderr.
fn report(context: &str, e: &dyn std::error::Error) {
    eprintln!("{context}: {e}");
    let mut source = e.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}

/// Entry point for the wcag-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path).and_then(|cfg| apply_overrides(cfg, &args)) {
        Ok(cfg) => cfg,
        Err(e) => {
            report("Configuration error", &e);
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?args.transport,
        "Starting wcag-mcp server"
    );

    // Load the dataset
    let document = match WcagDocument::load(&cfg.data_path) {
        Ok(document) => document,
        Err(e) => {
            report("Dataset error", &e);
            return ExitCode::FAILURE;
        }
    };
    let registry = Arc::new(ToolRegistry::new(Arc::new(document)));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = match args.transport {
        Transport::Stdio => {
            let mut server = McpServer::new(registry);
            info!("MCP server ready, waiting for client connection...");
            runtime.block_on(server.run())
        }
        Transport::Http => {
            let settings = BridgeSettings {
                auth: BridgeAuth::from_secret(args.api_key),
                backend_url: cfg.bridge.backend_url.clone(),
                public_url: cfg.bridge.public_url.clone(),
            };
            if settings.auth.is_open() {
                info!("No bridge API key configured; /bridge is open");
            }
            runtime.block_on(serve_http(&cfg, registry, settings))
        }
    };

    match result {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, source = ?e.source(), "Server error");
            ExitCode::FAILURE
        }
    }
}

async fn serve_http(
    cfg: &Config,
    registry: Arc<ToolRegistry>,
    settings: BridgeSettings,
) -> std::io::Result<()> {
    let addr: SocketAddr = cfg.http.listen_addr().map_err(std::io::Error::other)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let settings = settings.with_local_backend(listener.local_addr()?);
    http::serve(listener, http::router(registry, settings)).await
}
