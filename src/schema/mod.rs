//! Schema extraction for loaded tables.
//!
//! [`query_schema`] reduces an engine's `DESCRIBE` output and a small row
//! sample into a [`TableSummary`]. It never fails: any engine error is
//! reported through the diagnostic sink and turned into `None`.

pub mod cache;
pub mod data_type;

pub use cache::SchemaCache;
pub use data_type::{
    classify_data_type, data_type_metadata, simplified_data_type, DataType, DataTypeMetadata,
    SimplifiedType, TypeIcon,
};

use polars::prelude::DataType as EngineType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diagnostics::Diagnostics;
use crate::reader::Reader;
use crate::value::{any_value_to_json, column_values};
use crate::{ChartError, DataFrame, Result};

pub use crate::settings::DEFAULT_SAMPLE_SIZE;

/// Inferred metadata for one column of a loaded table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Column name, unique within its table
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    /// Preview values from the sample query, in sample row order
    pub sample_values: Vec<Value>,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub default_value: Option<String>,
    pub comment: Option<String>,
}

impl ColumnSummary {
    pub fn simplified_type(&self) -> SimplifiedType {
        self.data_type.simplified()
    }
}

/// Schema of one loaded table.
///
/// Built fresh by every [`query_schema`] call; a reload produces a new summary
/// rather than updating an old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    /// Table name as registered in the engine
    pub name: String,
    /// Columns in engine-reported order
    pub columns: Vec<ColumnSummary>,
    pub num_rows: Option<usize>,
}

impl TableSummary {
    /// Look up a column by exact name
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Infer nullability from a `DESCRIBE` null marker.
///
/// True when the marker is absent or equals `"null"` in any case.
pub fn infer_nullable(marker: Option<&str>) -> bool {
    match marker {
        None => true,
        Some(marker) => marker.eq_ignore_ascii_case("null"),
    }
}

/// Infer `(is_primary_key, is_foreign_key)` from a `DESCRIBE` key marker.
///
/// Plain case-insensitive substring checks for `"pri"` and `"for"`.
pub fn infer_key_role(marker: Option<&str>) -> (bool, bool) {
    let marker = marker.map(str::to_lowercase).unwrap_or_default();
    (marker.contains("pri"), marker.contains("for"))
}

/// Summarize the columns of `table`.
///
/// Issues the reader's describe and sample statements and combines them.
/// The row count is filled in when the engine can provide it.
///
/// Returns `None` (after logging an error) when the table cannot be described.
pub fn query_schema(
    reader: &dyn Reader,
    table: &str,
    sample_size: usize,
    diagnostics: &dyn Diagnostics,
) -> Option<TableSummary> {
    let mut summary = match extract_schema(reader, table, sample_size) {
        Ok(summary) => summary,
        Err(e) => {
            diagnostics.error(&format!("Failed to query schema for table '{}': {}", table, e));
            return None;
        }
    };

    match count_rows(reader, table) {
        Ok(rows) => summary.num_rows = Some(rows),
        Err(e) => diagnostics.debug(&format!("Row count unavailable for '{}': {}", table, e)),
    }

    Some(summary)
}

fn extract_schema(reader: &dyn Reader, table: &str, sample_size: usize) -> Result<TableSummary> {
    let described = reader.execute_sql(&reader.describe_sql(table))?;
    let sample = reader.execute_sql(&reader.sample_sql(table, sample_size))?;

    let names = required_cells(&described, "column_name")?;
    let types = required_cells(&described, "column_type")?;
    let nulls = optional_cells(&described, "null")?;
    let keys = optional_cells(&described, "key")?;
    let defaults = optional_cells(&described, "default")?;
    let extras = optional_cells(&described, "extra")?;

    let mut columns = Vec::with_capacity(names.len());
    for (idx, name) in names.into_iter().enumerate() {
        let name = name.ok_or_else(|| {
            ChartError::ReaderError(format!("DESCRIBE row {} has no column_name", idx))
        })?;

        let type_name = types[idx].as_deref().unwrap_or_default();
        let (is_primary_key, is_foreign_key) = infer_key_role(keys[idx].as_deref());

        let sample_values = if sample.column(&name).is_ok() {
            column_values(&sample, &name)?
        } else {
            Vec::new()
        };

        columns.push(ColumnSummary {
            data_type: classify_data_type(type_name),
            nullable: infer_nullable(nulls[idx].as_deref()),
            sample_values,
            is_primary_key,
            is_foreign_key,
            default_value: defaults[idx].clone(),
            comment: extras[idx].clone(),
            name,
        });
    }

    Ok(TableSummary {
        name: table.to_string(),
        columns,
        num_rows: None,
    })
}

fn count_rows(reader: &dyn Reader, table: &str) -> Result<usize> {
    let df = reader.execute_sql(&reader.count_sql(table))?;
    let column = df
        .get_columns()
        .first()
        .ok_or_else(|| ChartError::ReaderError("Row count query returned no columns".into()))?;
    let value = column
        .as_materialized_series()
        .get(0)
        .map_err(|e| ChartError::ReaderError(format!("Row count query returned no rows: {}", e)))?;

    any_value_to_json(&value)
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| ChartError::ReaderError(format!("Row count is not a number: {}", value)))
}

/// String cells of a column that must be present in the result
fn required_cells(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    if df.column(name).is_err() {
        return Err(ChartError::ReaderError(format!(
            "Malformed DESCRIBE result: missing field '{}'",
            name
        )));
    }
    optional_cells(df, name)
}

/// String cells of a column; a missing column reads as all-null
fn optional_cells(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = match df.column(name) {
        Ok(column) => column,
        Err(_) => return Ok(vec![None; df.height()]),
    };

    if column.dtype() == &EngineType::Null {
        return Ok(vec![None; df.height()]);
    }

    let as_strings = column.cast(&EngineType::String).map_err(|e| {
        ChartError::ReaderError(format!("Field '{}' is not readable as text: {}", name, e))
    })?;
    let cells = as_strings
        .as_materialized_series()
        .str()
        .map_err(|e| ChartError::ReaderError(format!("Field '{}': {}", name, e)))?
        .into_iter()
        .map(|cell| cell.map(str::to_string))
        .collect();

    Ok(cells)
}
