//! HTTP client for the spreadsheet web app.

use crate::config::MirrorConfig;
use crate::mirror::ResponseMirror;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::{Duration, Instant};
use survey_core::error::MirrorErrorCode;
use survey_core::{Error, Result};
use telemetry::metrics;
use tracing::debug;
use url::Url;

/// Mirror backed by a spreadsheet web app.
///
/// POST appends one submission body byte for byte; GET returns every row
/// as a JSON array of objects keyed by the sheet's column headers.
pub struct SheetMirror {
    url: Url,
    http: reqwest::Client,
}

impl SheetMirror {
    /// Creates a client for `url`. Only http and https URLs are accepted.
    pub fn new(url: &str, timeout: Option<Duration>) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| Error::config(format!("invalid mirror url {:?}: {}", url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "mirror url must be http or https, got {}",
                url.scheme()
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::config(format!("failed to build mirror client: {}", e)))?;

        Ok(Self { url, http })
    }

    /// Builds the client when a URL is configured.
    pub fn from_config(config: &MirrorConfig) -> Result<Option<Self>> {
        match config.url() {
            Some(url) => {
                let timeout = config.timeout_secs.map(Duration::from_secs);
                Self::new(url, timeout).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ResponseMirror for SheetMirror {
    async fn forward(&self, payload: Bytes) -> Result<()> {
        let start = Instant::now();
        let result = self
            .http
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await;
        metrics().mirror_latency_ms.observe(start.elapsed().as_millis() as u64);

        let response = result.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::mirror(
                MirrorErrorCode::Status,
                format!("mirror append returned {}", status),
            ));
        }

        debug!(status = %status, "Forwarded submission to mirror");
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Value>> {
        let start = Instant::now();
        let result = self.http.get(self.url.clone()).send().await;
        metrics().mirror_latency_ms.observe(start.elapsed().as_millis() as u64);

        let response = result.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::mirror(
                MirrorErrorCode::Status,
                format!("mirror listing returned {}", status),
            ));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        let records = parse_listing(&body)?;
        debug!(records = records.len(), "Fetched mirror listing");
        Ok(records)
    }
}

/// Decode a listing body. Anything other than a JSON array is rejected.
pub fn parse_listing(body: &[u8]) -> Result<Vec<Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(other) => Err(Error::mirror(
            MirrorErrorCode::InvalidBody,
            format!("mirror listing is not an array (got {})", kind(&other)),
        )),
        Err(e) => Err(Error::mirror(
            MirrorErrorCode::InvalidBody,
            format!("mirror listing is not JSON: {}", e),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    Error::mirror(MirrorErrorCode::Transport, e.to_string())
}
