//! Record store configuration.

use serde::{Deserialize, Serialize};

/// Special path selecting a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file, or ":memory:"
    #[serde(default = "default_path")]
    pub path: String,
    /// Open without write access (inserts fail, reads work)
    #[serde(default)]
    pub read_only: bool,
}

fn default_path() -> String {
    "survey.db".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            read_only: false,
        }
    }
}

impl StoreConfig {
    /// Configuration for a private in-memory store.
    pub fn in_memory() -> Self {
        Self {
            path: IN_MEMORY.to_string(),
            read_only: false,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY
    }
}
