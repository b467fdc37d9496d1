//! Record source selection for the read path.
//!
//! The mirror is tried first. The record store is used when the mirror is
//! not configured, fails, or has nothing. If neither yields records the
//! read path works on an empty sequence rather than failing.

use record_store::list_responses;
use serde_json::Value;
use telemetry::{health, metrics};
use tracing::{debug, error, warn};

use crate::state::AppState;

/// Where a read's records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    Mirror,
    Store,
    /// Neither tier produced records.
    Empty,
}

impl RecordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mirror => "mirror",
            Self::Store => "store",
            Self::Empty => "empty",
        }
    }
}

/// Load raw records, one attempt per tier.
pub async fn load_records(state: &AppState) -> (RecordSource, Vec<Value>) {
    if let Some(mirror) = &state.mirror {
        match mirror.fetch_all().await {
            Ok(records) if !records.is_empty() => {
                health().mirror.set_healthy();
                return (RecordSource::Mirror, records);
            }
            Ok(_) => {
                health().mirror.set_healthy();
                debug!("Mirror returned no records, falling back to store");
            }
            Err(e) => {
                metrics().mirror_read_errors.inc();
                health().mirror.set_unhealthy(e.to_string());
                warn!(error = %e, "Mirror read failed, falling back to store");
            }
        }
    }

    if let Some(store) = &state.store {
        match list_responses(store).await {
            Ok(records) => return (RecordSource::Store, records),
            Err(e) => {
                metrics().store_read_errors.inc();
                health().store.set_unhealthy(e.to_string());
                error!(error = %e, "Record store read failed");
            }
        }
    }

    (RecordSource::Empty, Vec::new())
}
