//! [`QueryExecutor`] backed by sqlx's `Any` driver.
//!
//! One connection is opened per call and closed before returning; there is no
//! pool and no transaction. The driver (SQLite, Postgres, MySQL) is chosen by
//! the URL scheme.
//!
//! Column values are decoded by trying integer, float, bool, text and bytes in
//! that order. Types the `Any` driver cannot represent (decimals, dates on
//! some backends) fail the whole query with the driver's message.

use serde_json::Value;
use sqlconsole_core::Record;
use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Column, Connection, Row};
use tracing::{debug, warn};

use super::QueryExecutor;

#[derive(Debug, Clone)]
pub struct AnyExecutor {
    url: String,
}

impl AnyExecutor {
    pub fn new(url: impl Into<String>) -> Self {
        sqlx::any::install_default_drivers();
        Self { url: url.into() }
    }
}

impl QueryExecutor for AnyExecutor {
    async fn fetch_records(&self, sql: &str) -> Result<Vec<Record>, sqlx::Error> {
        let mut conn = AnyConnection::connect(&self.url).await?;
        debug!("connection opened");

        let fetched = sqlx::query::<sqlx::Any>(sql).fetch_all(&mut conn).await;

        if let Err(e) = conn.close().await {
            warn!(error = %e, "failed to close database connection");
        }

        fetched?.iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: &AnyRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new();
    for column in row.columns() {
        let value = decode_value(row, column.ordinal())?;
        record.insert(column.name().to_owned(), value);
    }
    Ok(record)
}

fn decode_value(row: &AnyRow, index: usize) -> Result<Value, sqlx::Error> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.map_or(Value::Null, Value::from));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v.map_or(Value::Null, Value::from));
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(index) {
        return Ok(v.map_or(Value::Null, |f| Value::from(f64::from(f))));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return Ok(v.map_or(Value::Null, Value::Bool));
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v.map_or(Value::Null, Value::String));
    }
    let bytes = row.try_get::<Option<Vec<u8>>, _>(index)?;
    Ok(bytes.map_or(Value::Null, |b| Value::String(to_hex(&b))))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
