//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use telemetry::health;

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health - Service status and sink configuration.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        google_sheet_configured: state.mirror_configured(),
        store_available: state.store_available(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.environment.clone(),
        components: health().report(),
    })
}

/// GET /api/health/ready - Ready when at least one data source exists.
pub async fn ready_handler(State(state): State<AppState>) -> StatusCode {
    if state.store_available() || state.mirror_configured() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /api/health/live - Liveness check (service is running).
pub async fn live_handler() -> StatusCode {
    StatusCode::OK
}
