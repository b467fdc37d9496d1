//! Application state shared across handlers.

use record_store::RecordStore;
use sheet_mirror::ResponseMirror;
use std::sync::Arc;

/// Shared application state.
///
/// Both sinks are optional: the store may have failed to open and the
/// mirror may not be configured. Handlers degrade around whichever is
/// missing.
#[derive(Clone)]
pub struct AppState {
    /// Local record store
    pub store: Option<Arc<RecordStore>>,
    /// Spreadsheet mirror (HTTP in production, mock in tests)
    pub mirror: Option<Arc<dyn ResponseMirror>>,
    /// Deployment environment label reported by health
    pub environment: String,
}

impl AppState {
    pub fn new(
        store: Option<Arc<RecordStore>>,
        mirror: Option<Arc<dyn ResponseMirror>>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            store,
            mirror,
            environment: environment.into(),
        }
    }

    pub fn store_available(&self) -> bool {
        self.store.is_some()
    }

    pub fn mirror_configured(&self) -> bool {
        self.mirror.is_some()
    }
}
