//! Record store handle and connection lifecycle.

use crate::config::StoreConfig;
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use survey_core::error::DbErrorCode;
use survey_core::{Error, Result};
use tracing::{debug, info, warn};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the SQLite record store.
///
/// One connection guarded by a mutex. Every statement runs on the blocking
/// pool so request tasks never hold the lock across an await.
pub struct RecordStore {
    conn: Arc<Mutex<Connection>>,
    config: StoreConfig,
}

impl RecordStore {
    /// Opens the store and creates the schema if missing.
    ///
    /// Read-only stores skip schema creation.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let conn = if config.read_only {
            Connection::open_with_flags(
                &config.path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
            )
            .map_err(open_error)?
        } else {
            if !config.is_in_memory() {
                if let Some(parent) = Path::new(&config.path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).map_err(|e| {
                            Error::database(
                                DbErrorCode::OpenFailed,
                                format!("cannot create {}: {}", parent.display(), e),
                            )
                        })?;
                    }
                }
            }
            Connection::open(&config.path).map_err(open_error)?
        };

        conn.busy_timeout(BUSY_TIMEOUT).map_err(open_error)?;

        if !config.read_only {
            crate::health::init_schema(&conn)?;
        }

        info!(
            path = %config.path,
            read_only = config.read_only,
            "Opened record store"
        );

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Run `f` against the connection on the blocking pool.
    pub async fn run<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Connection) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            f(&guard)
        })
        .await
        .map_err(|e| Error::internal(format!("store task failed: {}", e)))?
    }

    /// Close the connection, flushing SQLite state.
    ///
    /// If a statement is still in flight elsewhere the connection is left to
    /// close when its last handle drops.
    pub fn close(self) -> Result<()> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                mutex.into_inner().close().map_err(|(_, e)| {
                    Error::database(DbErrorCode::QueryFailed, format!("close failed: {}", e))
                })?;
                info!(path = %self.config.path, "Closed record store");
            }
            Err(_) => {
                warn!(path = %self.config.path, "Record store still in use, deferring close");
            }
        }
        Ok(())
    }
}

fn open_error(e: rusqlite::Error) -> Error {
    debug!(error = %e, "SQLite open failed");
    Error::database(DbErrorCode::OpenFailed, e.to_string())
}
