//! Mock implementations for testing.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::Value;
use sheet_mirror::ResponseMirror;
use std::sync::Arc;
use survey_core::error::MirrorErrorCode;
use survey_core::{Error, Result};

/// Mock mirror that captures forwarded payloads in memory.
///
/// Implements the same `ResponseMirror` trait as `SheetMirror`, so tests
/// see exactly what would be posted to the spreadsheet and control what a
/// listing returns.
#[derive(Clone)]
pub struct MockMirror {
    /// Bodies forwarded through this mirror.
    forwarded: Arc<Mutex<Vec<Bytes>>>,
    /// Records returned by `fetch_all`.
    records: Arc<Mutex<Vec<Value>>>,
    fail_forward: Arc<Mutex<bool>>,
    fail_fetch: Arc<Mutex<bool>>,
}

impl MockMirror {
    pub fn new() -> Self {
        Self {
            forwarded: Arc::new(Mutex::new(Vec::new())),
            records: Arc::new(Mutex::new(Vec::new())),
            fail_forward: Arc::new(Mutex::new(false)),
            fail_fetch: Arc::new(Mutex::new(false)),
        }
    }

    /// Mirror whose listing returns `records`.
    pub fn with_records(records: Vec<Value>) -> Self {
        let mock = Self::new();
        *mock.records.lock() = records;
        mock
    }

    /// Get all forwarded bodies, decoded.
    pub fn forwarded(&self) -> Vec<Value> {
        self.forwarded
            .lock()
            .iter()
            .map(|body| serde_json::from_slice(body).expect("Forwarded body is not JSON"))
            .collect()
    }

    /// Get all forwarded bodies as sent.
    pub fn forwarded_bytes(&self) -> Vec<Bytes> {
        self.forwarded.lock().clone()
    }

    pub fn forwarded_count(&self) -> usize {
        self.forwarded.lock().len()
    }

    pub fn set_records(&self, records: Vec<Value>) {
        *self.records.lock() = records;
    }

    /// Make `forward` fail like a rejected append.
    pub fn set_fail_forward(&self, fail: bool) {
        *self.fail_forward.lock() = fail;
    }

    /// Make `fetch_all` fail like an unreachable endpoint.
    pub fn set_fail_fetch(&self, fail: bool) {
        *self.fail_fetch.lock() = fail;
    }
}

impl Default for MockMirror {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseMirror for MockMirror {
    async fn forward(&self, payload: Bytes) -> Result<()> {
        if *self.fail_forward.lock() {
            return Err(Error::mirror(
                MirrorErrorCode::Status,
                "mirror append returned 500 Internal Server Error",
            ));
        }
        self.forwarded.lock().push(payload);
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Value>> {
        if *self.fail_fetch.lock() {
            return Err(Error::mirror(MirrorErrorCode::Transport, "connection refused"));
        }
        Ok(self.records.lock().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_mirror_captures_payloads() {
        let mock = MockMirror::new();
        mock.forward(Bytes::from_static(br#"{"name":"Asha"}"#))
            .await
            .unwrap();

        assert_eq!(mock.forwarded_count(), 1);
        assert_eq!(mock.forwarded()[0]["name"], "Asha");
        assert_eq!(mock.forwarded_bytes()[0], &br#"{"name":"Asha"}"#[..]);
        assert!(mock.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_mirror_failure_modes() {
        let mock = MockMirror::with_records(vec![json!({"current_brand": "Bisleri"})]);
        assert_eq!(mock.fetch_all().await.unwrap().len(), 1);

        mock.set_fail_forward(true);
        mock.set_fail_fetch(true);
        assert!(mock.forward(Bytes::from_static(b"{}")).await.is_err());
        let err = mock.fetch_all().await.unwrap_err();
        assert_eq!(err.error_code(), Some("MIRROR_001"));
        assert_eq!(mock.forwarded_count(), 0);
    }
}
