//! Inserting submissions into the record store.

use crate::client::RecordStore;
use crate::schema::insert_statement;
use rusqlite::params;
use survey_core::error::DbErrorCode;
use survey_core::{Error, ResponseRow, Result};
use tracing::debug;

/// Insert one normalized submission. Returns the assigned row id.
///
/// `id` and `created_at` are assigned by SQLite.
pub async fn insert_response(store: &RecordStore, row: ResponseRow) -> Result<i64> {
    let id = store
        .run(move |conn| {
            conn.execute(
                &insert_statement(),
                params![
                    row.name,
                    row.mobile,
                    row.area,
                    row.respondent_type,
                    row.other_type,
                    row.water_types,
                    row.other_water_type,
                    row.current_brand,
                    row.price_20l,
                    row.price_1l,
                    row.price_500ml,
                    row.monthly_20l,
                    row.daily_bottles,
                    row.problems,
                    row.switching_reasons,
                    row.cheaper_switch,
                    row.retailer_fastest_size,
                    row.retailer_margin,
                    row.retailer_credit,
                    row.retailer_try_hero_agro_foods,
                    row.comments,
                ],
            )
            .map_err(insert_error)?;
            Ok(conn.last_insert_rowid())
        })
        .await?;

    debug!(id, "Inserted survey response");
    Ok(id)
}

fn insert_error(e: rusqlite::Error) -> Error {
    Error::database(DbErrorCode::InsertFailed, e.to_string())
}
