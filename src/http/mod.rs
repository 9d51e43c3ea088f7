//! HTTP adapters.
//!
//! One axum router carries both HTTP surfaces:
//!
//! - `/mcp`: stateless JSON-RPC ([`rpc`]), sharing the stdio server's
//!   [`McpHandler`].
//! - `/bridge`: REST bridge with OpenAPI and API key auth ([`bridge`]).
//!
//! Every response carries permissive CORS headers ([`cors`]).

pub mod auth;
pub mod bridge;
pub mod cors;
pub mod openapi;
pub mod rpc;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use auth::BridgeAuth;
pub use bridge::{local_backend_url, BridgeError, BridgeSettings, BridgeState};

use crate::mcp::McpHandler;
use crate::tools::ToolRegistry;

/// Builds the router serving `/mcp` and `/bridge`.
pub fn router(registry: Arc<ToolRegistry>, settings: BridgeSettings) -> Router {
    let rpc = Router::new()
        .route(
            "/mcp",
            get(rpc::health)
                .post(rpc::rpc)
                .fallback(bridge::not_found),
        )
        .with_state(McpHandler::new(Arc::clone(&registry)));

    let bridge = Router::new()
        .route(
            "/bridge/openapi.json",
            get(bridge::openapi_document).fallback(bridge::not_found),
        )
        .route(
            "/bridge/tools/{name}",
            post(bridge::call_tool).fallback(bridge::not_found),
        )
        .route(
            "/bridge/tools/",
            post(bridge::missing_tool_name).fallback(bridge::not_found),
        )
        .with_state(BridgeState::new(registry, settings));

    rpc.merge(bridge)
        .fallback(bridge::not_found)
        .layer(axum::middleware::from_fn(cors::cors))
        .layer(TraceLayer::new_for_http())
}

/// Serves `app` on `listener` until SIGINT or SIGTERM (Ctrl+C on Windows).
///
/// # Errors
///
/// Returns an error if the listener fails.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "HTTP server listening (/mcp, /bridge)");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (Ok(mut sigint), Ok(mut sigterm)) = (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) else {
        tracing::warn!("Could not install signal handlers; stop the server by killing it");
        return std::future::pending().await;
    };

    tokio::select! {
        _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown"),
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

#[cfg(windows)]
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Received Ctrl+C, initiating graceful shutdown");
    } else {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::tools::test_support::registry;

    fn app() -> Router {
        router(Arc::new(registry()), BridgeSettings::default())
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn preflight_is_answered_everywhere() {
        for uri in ["/mcp", "/bridge/tools/get-criterion", "/elsewhere"] {
            let response = app()
                .oneshot(
                    Request::builder()
                        .method(Method::OPTIONS)
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NO_CONTENT, "{uri}");
            assert_eq!(response.headers()["access-control-allow-origin"], "*");
            assert_eq!(
                response.headers()["access-control-allow-methods"],
                "GET, POST, OPTIONS"
            );
        }
    }

    #[tokio::test]
    async fn responses_carry_cors_headers() {
        let response = app()
            .oneshot(Request::get("/mcp").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .contains("x-api-key"));
    }

    #[tokio::test]
    async fn unmatched_paths_are_json_not_found() {
        for request in [
            Request::get("/bridge/other").body(Body::empty()).unwrap(),
            Request::get("/bridge/tools/get-criterion")
                .body(Body::empty())
                .unwrap(),
            Request::delete("/mcp").body(Body::empty()).unwrap(),
        ] {
            let response = app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(json_body(response).await["error"], "Not found");
        }
    }

    #[tokio::test]
    async fn missing_tool_name_is_reported() {
        let response = app()
            .oneshot(Request::post("/bridge/tools/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Tool name missing");
    }
}
