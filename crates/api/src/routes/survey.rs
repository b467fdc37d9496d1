//! Survey submission endpoint.
//!
//! Each accepted submission goes to two independent sinks at once: a
//! normalized row in the record store and the request body, byte for byte,
//! to the mirror. Sink failures and over-long fields are logged and never
//! change the response.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use record_store::insert_response;
use serde_json::Value;
use std::time::Instant;
use survey_core::error::DbErrorCode;
use survey_core::{limits::MAX_SUBMISSION_BYTES, Error, ResponseRow, SurveySubmission};
use telemetry::{health, metrics};
use tracing::{debug, error, info, warn};

use crate::response::{ApiError, SubmitResponse};
use crate::state::AppState;

/// POST /api/survey - Record one survey submission.
pub async fn submit_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let start = Instant::now();
    metrics().submissions_received.inc();

    let (body, payload) = decode(body).inspect_err(|_| metrics().submissions_rejected.inc())?;

    let submission = SurveySubmission::from_value(&payload).map_err(|e| {
        metrics().submissions_rejected.inc();
        error!(error = %e, "Submission is not a survey object");
        ApiError::processing_failed()
    })?;

    // Over-long fields are kept as entered
    if let Err(Error::ValidationWithCode { details, .. }) = submission.check() {
        warn!(fields = ?details, "Submission exceeds field limits, accepting as entered");
    }

    let row = submission.to_row();
    let (stored, mirrored) = tokio::join!(store_row(&state, row), forward_raw(&state, body));

    let latency_ms = start.elapsed().as_millis() as u64;
    metrics().submit_latency_ms.observe(latency_ms);

    info!(
        respondent_type = submission.respondent_label(),
        stored = stored,
        mirrored = mirrored,
        latency_ms = latency_ms,
        "Submission processed"
    );

    Ok(Json(SubmitResponse::accepted()))
}

/// Read the body and decode it as JSON, keeping the original bytes.
fn decode(body: Result<Bytes, BytesRejection>) -> Result<(Bytes, Value), ApiError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large(MAX_SUBMISSION_BYTES)
        } else {
            error!(error = %rejection, "Failed to read submission body");
            ApiError::processing_failed()
        }
    })?;

    if body.len() > MAX_SUBMISSION_BYTES {
        return Err(ApiError::payload_too_large(MAX_SUBMISSION_BYTES));
    }

    debug!(payload_size = body.len(), "Received submission");

    let payload = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Submission body is not JSON");
        ApiError::processing_failed()
    })?;
    Ok((body, payload))
}

/// Insert the normalized row. Returns whether it was stored.
async fn store_row(state: &AppState, row: ResponseRow) -> bool {
    let Some(store) = &state.store else {
        metrics().store_insert_errors.inc();
        let e = Error::database(DbErrorCode::Unavailable, "record store not open");
        warn!(error = %e, "Submission not stored locally");
        return false;
    };

    match insert_response(store, row).await {
        Ok(id) => {
            metrics().store_inserts.inc();
            health().store.set_healthy();
            debug!(id = id, "Stored submission");
            true
        }
        Err(e) => {
            metrics().store_insert_errors.inc();
            health().store.set_unhealthy(e.to_string());
            warn!(error = %e, "Failed to store submission locally");
            false
        }
    }
}

/// Forward the body exactly as received. Returns whether the mirror accepted it.
async fn forward_raw(state: &AppState, body: Bytes) -> bool {
    let Some(mirror) = &state.mirror else {
        warn!("Mirror not configured, submission kept locally only");
        return false;
    };

    match mirror.forward(body).await {
        Ok(()) => {
            metrics().mirror_forwards.inc();
            health().mirror.set_healthy();
            true
        }
        Err(e) => {
            metrics().mirror_forward_errors.inc();
            health().mirror.set_unhealthy(e.to_string());
            error!(error = %e, "Failed to forward submission to mirror");
            false
        }
    }
}
