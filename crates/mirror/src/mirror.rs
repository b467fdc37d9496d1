//! The mirror seam used by the API layer.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use survey_core::Result;

/// A best-effort replica of submissions that can also serve reads.
///
/// Implemented by [`crate::SheetMirror`] in production and by in-memory
/// mocks in tests.
#[async_trait]
pub trait ResponseMirror: Send + Sync {
    /// Append one submission. `payload` is the JSON request body exactly as
    /// received.
    async fn forward(&self, payload: Bytes) -> Result<()>;

    /// List every record the mirror holds, in the mirror's column shape.
    async fn fetch_all(&self) -> Result<Vec<Value>>;
}
