//! Row representation shared by the gateway and the console.

use serde_json::{Map, Value};

/// One result row: column name → scalar JSON value, in result-set column order.
pub type Record = Map<String, Value>;

/// Column names of a result set, taken from the first record.
pub fn column_names(rows: &[Record]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

/// Text shown for a single cell; strings are unquoted, `null` is `NULL`.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_owned(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
