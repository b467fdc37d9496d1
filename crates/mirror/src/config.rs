//! Mirror configuration.

use serde::{Deserialize, Serialize};

/// Spreadsheet mirror configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Web app URL accepting POST (append) and GET (list). Unset disables the mirror.
    #[serde(default)]
    pub url: Option<String>,
    /// Request timeout in seconds. Unset leaves the transport default (none).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl MirrorConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            timeout_secs: None,
        }
    }

    /// The configured URL, ignoring blank values.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.url().is_some()
    }
}
