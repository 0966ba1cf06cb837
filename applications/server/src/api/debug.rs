/// Diagnostic API routes
use crate::state::AppState;
use axum::{extract::State, Json};
use roster_core::PoolStats;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DebugVars {
    pub cmdline: Vec<String>,
    pub version: &'static str,
    pub uptime_secs: u64,
    #[serde(rename = "db-stats")]
    pub db_stats: Option<PoolStats>,
}

/// GET /health
/// Liveness of the HTTP process only; the store is checked at start-up
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /debug/vars
/// Process and connection pool statistics
pub async fn vars(State(app_state): State<AppState>) -> Json<DebugVars> {
    Json(DebugVars {
        cmdline: std::env::args().collect(),
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: app_state.started_at.elapsed().as_secs(),
        db_stats: app_state.users.pool_stats(),
    })
}
