//! Record store health checks and schema setup.

use crate::client::RecordStore;
use crate::query::count_responses;
use crate::schema::all_tables;
use rusqlite::Connection;
use survey_core::error::DbErrorCode;
use survey_core::{Error, Result};
use tracing::{debug, error};

/// Check that the store answers queries and the responses table exists.
pub async fn check_connection(store: &RecordStore) -> bool {
    match count_responses(store).await {
        Ok(rows) => {
            debug!(rows, "Record store healthy");
            true
        }
        Err(e) => {
            error!("Record store health check failed: {}", e);
            false
        }
    }
}

/// Create the schema if it does not exist.
pub fn init_schema(conn: &Connection) -> Result<()> {
    for ddl in all_tables() {
        conn.execute_batch(ddl).map_err(|e| {
            Error::database(DbErrorCode::OpenFailed, format!("failed to execute DDL: {}", e))
        })?;
    }

    debug!("Record store schema initialized");
    Ok(())
}
