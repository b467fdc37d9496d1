//! API routes.

pub mod health;
pub mod responses;
pub mod survey;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use survey_core::limits::MAX_SUBMISSION_BYTES;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/survey", post(survey::submit_handler))
        .route("/api/responses", get(responses::responses_handler))
        .route("/api/health", get(health::health_handler))
        .route("/api/health/ready", get(health::ready_handler))
        .route("/api/health/live", get(health::live_handler))
        .layer(DefaultBodyLimit::max(MAX_SUBMISSION_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
