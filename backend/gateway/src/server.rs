//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use finscope_agent::FishAnalyzer;
use tokio::net::TcpListener;
use tokio::signal::{self, ctrl_c};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use crate::health_api;
use crate::session_registry::SessionRegistry;
use crate::sessions_api;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub analyzer: Arc<FishAnalyzer>,
    pub sessions: SessionRegistry,
}

impl GatewayState {
    pub fn new(analyzer: FishAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            sessions: SessionRegistry::new(),
        }
    }
}

/// Build the router with all API routes.
///
/// The transport body limit sits well above the upload policy so oversize
/// photos reach validation and get its message.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.analyzer.policy().max_bytes.saturating_mul(2);

    Router::new()
        .route("/api/health", get(health_api::get_health))
        .route("/api/sessions", post(sessions_api::create_session))
        .route(
            "/api/sessions/:id",
            get(sessions_api::get_session).delete(sessions_api::delete_session),
        )
        .route("/api/sessions/:id/upload", post(sessions_api::upload_image))
        .route("/api/sessions/:id/analyze", post(sessions_api::analyze_session))
        .route("/api/sessions/:id/error", delete(sessions_api::dismiss_error))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the HTTP server and runs until Ctrl+C or SIGTERM.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let provider = state.analyzer.provider().to_string();
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, provider = %provider, "Gateway HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
