//! Conversion of engine cell values into JSON.
//!
//! Used for column sample values in schema summaries and for the inline
//! data embedded by writers. Temporal values become ISO strings so that
//! Vega-Lite parses them as dates.

use crate::{ChartError, DataFrame, Result};
use polars::prelude::{AnyValue, TimeUnit};
use serde_json::{json, Map, Value};

/// Convert a single cell value to JSON.
///
/// Total: types without a natural JSON form fall back to their display string.
pub fn any_value_to_json(value: &AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => json!(v),
        AnyValue::Int8(v) => json!(v),
        AnyValue::Int16(v) => json!(v),
        AnyValue::Int32(v) => json!(v),
        AnyValue::Int64(v) => json!(v),
        AnyValue::UInt8(v) => json!(v),
        AnyValue::UInt16(v) => json!(v),
        AnyValue::UInt32(v) => json!(v),
        AnyValue::UInt64(v) => json!(v),
        AnyValue::Float32(v) => json!(v),
        AnyValue::Float64(v) => json!(v),
        AnyValue::String(s) => json!(s),
        AnyValue::StringOwned(s) => json!(s.as_str()),
        AnyValue::Date(days) => {
            // Days since epoch -> "YYYY-MM-DD"
            let date = chrono::NaiveDate::from_ymd_opt(1970, 1, 1)
                .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(*days as i64)));
            match date {
                Some(date) => json!(date.format("%Y-%m-%d").to_string()),
                None => Value::Null,
            }
        }
        AnyValue::Datetime(timestamp, time_unit, _) => {
            let micros = match time_unit {
                TimeUnit::Microseconds => *timestamp,
                TimeUnit::Milliseconds => timestamp * 1_000,
                TimeUnit::Nanoseconds => timestamp / 1_000,
            };
            let secs = micros.div_euclid(1_000_000);
            let nsecs = (micros.rem_euclid(1_000_000) * 1_000) as u32;
            match chrono::DateTime::<chrono::Utc>::from_timestamp(secs, nsecs) {
                Some(dt) => json!(dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()),
                None => Value::Null,
            }
        }
        AnyValue::Time(nanos) => {
            let hours = nanos / 3_600_000_000_000;
            let minutes = (nanos % 3_600_000_000_000) / 60_000_000_000;
            let seconds = (nanos % 60_000_000_000) / 1_000_000_000;
            let millis = (nanos % 1_000_000_000) / 1_000_000;
            json!(format!(
                "{:02}:{:02}:{:02}.{:03}",
                hours, minutes, seconds, millis
            ))
        }
        other => json!(other.to_string()),
    }
}

/// All values of one column, in row order.
pub fn column_values(df: &DataFrame, column: &str) -> Result<Vec<Value>> {
    let col = df.column(column).map_err(|e| {
        ChartError::ReaderError(format!("Column '{}' not found in result: {}", column, e))
    })?;
    let series = col.as_materialized_series();

    (0..series.len())
        .map(|idx| {
            series
                .get(idx)
                .map(|v| any_value_to_json(&v))
                .map_err(|e| {
                    ChartError::ReaderError(format!(
                        "Failed to read row {} of column '{}': {}",
                        idx, column, e
                    ))
                })
        })
        .collect()
}

/// Convert a DataFrame to an array of row objects, keeping at most `limit` rows.
pub fn dataframe_to_values(df: &DataFrame, limit: Option<usize>) -> Result<Vec<Value>> {
    let height = limit.map_or(df.height(), |n| n.min(df.height()));
    let mut rows = vec![Map::new(); height];

    for column in df.get_columns() {
        let name = column.name().to_string();
        let series = column.as_materialized_series();
        for (row_idx, row) in rows.iter_mut().enumerate() {
            let value = series.get(row_idx).map_err(|e| {
                ChartError::WriterError(format!(
                    "Failed to read row {} of column '{}': {}",
                    row_idx, name, e
                ))
            })?;
            row.insert(name.clone(), any_value_to_json(&value));
        }
    }

    Ok(rows.into_iter().map(Value::Object).collect())
}
