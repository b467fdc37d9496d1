//! Reading responses back out of the record store.

use crate::client::RecordStore;
use rusqlite::types::ValueRef;
use serde_json::{Map, Number, Value};
use survey_core::error::DbErrorCode;
use survey_core::{Error, Result};

/// All responses, most recent first. Rows created in the same second are
/// ordered by descending id.
const LIST_SQL: &str = "SELECT * FROM responses ORDER BY created_at DESC, id DESC";

/// List every stored response as a JSON object keyed by column name.
pub async fn list_responses(store: &RecordStore) -> Result<Vec<Value>> {
    store
        .run(|conn| {
            let mut stmt = conn.prepare(LIST_SQL).map_err(query_error)?;
            let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

            let rows = stmt
                .query_map([], |row| {
                    let mut obj = Map::with_capacity(columns.len());
                    for (idx, name) in columns.iter().enumerate() {
                        obj.insert(name.clone(), column_value(row.get_ref(idx)?));
                    }
                    Ok(Value::Object(obj))
                })
                .map_err(query_error)?;

            let records = rows
                .collect::<rusqlite::Result<Vec<Value>>>()
                .map_err(query_error)?;
            Ok(records)
        })
        .await
}

/// Count stored responses.
pub async fn count_responses(store: &RecordStore) -> Result<u64> {
    store
        .run(|conn| {
            conn.query_row("SELECT count(*) FROM responses", [], |row| row.get::<_, i64>(0))
                .map(|n| n.max(0) as u64)
                .map_err(query_error)
        })
        .await
}

fn column_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn query_error(e: rusqlite::Error) -> Error {
    Error::database(DbErrorCode::QueryFailed, e.to_string())
}
