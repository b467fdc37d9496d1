//! Analytics read endpoint.

use axum::{extract::State, Json};
use std::time::Instant;
use survey_core::{aggregate, AnalyticsSummary};
use telemetry::metrics;
use tracing::info;

use crate::source::{load_records, RecordSource};
use crate::state::AppState;

/// GET /api/responses - Aggregate every known response.
///
/// Never fails: when no source is reachable the summary is zeroed.
pub async fn responses_handler(State(state): State<AppState>) -> Json<AnalyticsSummary> {
    let start = Instant::now();
    metrics().reads.inc();

    let (source, records) = load_records(&state).await;
    match source {
        RecordSource::Mirror => metrics().reads_from_mirror.inc(),
        RecordSource::Store => metrics().reads_from_store.inc(),
        RecordSource::Empty => metrics().reads_empty.inc(),
    }

    let summary = aggregate(&records);

    let latency_ms = start.elapsed().as_millis() as u64;
    metrics().read_latency_ms.observe(latency_ms);

    info!(
        source = source.as_str(),
        total = summary.total,
        latency_ms = latency_ms,
        "Served analytics summary"
    );

    Json(summary)
}
