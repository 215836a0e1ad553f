//! JSON import/export for whole tables.
//!
//! The file format is a pretty-printed JSON array of entity objects with
//! camelCase field names.
//!
//! Import order matters: the payload is parsed and shape-checked first,
//! every element is rebuilt through the entity's default-filling
//! constructor, and only then is the table cleared and refilled one record
//! at a time. The refill is not wrapped in a transaction, so a storage
//! failure partway through (for example two records sharing an id) leaves
//! the table holding whatever was inserted before the failure.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::{InventoryError, Result};
use crate::store::Table;

/// Serialize every record in `table` as an indented JSON array.
pub async fn export<T: Table>(table: &T) -> Result<String> {
    let records = table.all().await?;
    let json = to_pretty_json(&records)?;
    tracing::info!(table = T::NAME, count = records.len(), "exported records");
    Ok(json)
}

/// Replace the contents of `table` with the records in `json`.
///
/// Returns the number of records written. Parse and shape errors are
/// reported as [`InventoryError::Format`] before anything is deleted;
/// storage errors pass through unchanged.
pub async fn import<T: Table>(table: &T, json: &str) -> Result<usize> {
    let values = parse_array(json)?;
    let records: Vec<T::Record> = values.iter().map(T::reconstruct).collect();

    table.clear().await?;
    for record in &records {
        table.insert(record).await?;
    }

    tracing::info!(table = T::NAME, count = records.len(), "imported records");
    Ok(records.len())
}

/// Parse `json` and require the top-level value to be an array.
pub fn parse_array(json: &str) -> Result<Vec<Value>> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| InventoryError::Format(e.to_string()))?;

    match value {
        Value::Array(values) => Ok(values),
        other => Err(InventoryError::Format(format!(
            "expected a JSON array at the top level, found {}",
            kind_of(&other)
        ))),
    }
}

/// Two-space indented JSON.
pub fn to_pretty_json<S: Serialize + ?Sized>(value: &S) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// File name used when exporting `table` into a directory.
///
/// Items get a dated backup name; other tables are named after the table.
pub fn default_export_filename(table: &str, date: NaiveDate) -> String {
    match table {
        "items" => format!("home-inventory-{}.json", date.format("%Y-%m-%d")),
        other => format!("{}.json", other),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
