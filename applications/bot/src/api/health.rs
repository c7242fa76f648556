/// Liveness routes
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Rooms with a live session
    pub sessions: usize,
    pub uptime_secs: i64,
}

/// GET / - Plain liveness probe
pub async fn root() -> &'static str {
    "Bot is running!"
}

/// GET /api/health - Health check endpoint
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now() - app_state.started_at;

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: app_state.registry().len().await,
        uptime_secs: uptime.num_seconds().max(0),
    })
}
