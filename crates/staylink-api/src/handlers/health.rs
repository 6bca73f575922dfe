//! Health check handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Basic liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" while the process is serving.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Readiness response with dependency and session detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    /// Overall status: "ok" or "degraded".
    pub status: String,
    /// Database connectivity.
    pub database: String,
    /// Live WebSocket sessions.
    pub sessions: usize,
    /// Distinct online users.
    pub online_users: usize,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let database = match state.db.health_check().await {
        Ok(true) => "connected",
        _ => "unavailable",
    };
    let status = if database == "connected" { "ok" } else { "degraded" };

    Json(DetailedHealthResponse {
        status: status.to_string(),
        database: database.to_string(),
        sessions: state.registry.session_count(),
        online_users: state.registry.user_count(),
    })
}
