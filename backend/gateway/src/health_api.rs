//! Gateway Health API

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::server::GatewayState;

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "finscope",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.analyzer.provider(),
        "sessions": state.sessions.len().await,
    }))
}
