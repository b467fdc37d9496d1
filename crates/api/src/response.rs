//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use survey_core::error::ValidationErrorCode;
use telemetry::ComponentHealthReport;

/// Generic message for submissions that could not be processed.
pub const PROCESSING_FAILED: &str = "Failed to process survey";

/// Code attached to uncoded server errors.
pub const INTERNAL_CODE: &str = "INTERNAL_ERROR";

/// Success response for a submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
}

impl SubmitResponse {
    pub fn accepted() -> Self {
        Self { success: true }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub google_sheet_configured: bool,
    pub store_available: bool,
    pub version: String,
    pub environment: String,
    #[serde(default, skip_deserializing)]
    pub components: Vec<ComponentHealthReport>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// API error carrying a status and a JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
        }
    }

    pub fn payload_too_large(limit_bytes: usize) -> Self {
        Self::with_code(
            StatusCode::PAYLOAD_TOO_LARGE,
            ValidationErrorCode::PayloadTooLarge.code(),
            format!("Submission exceeds {}KB limit", limit_bytes / 1024),
        )
    }

    /// The generic failure returned when a submission cannot be processed.
    pub fn processing_failed() -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_CODE, PROCESSING_FAILED)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}
