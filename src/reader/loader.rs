//! Table loading: user data sources → named engine tables.
//!
//! A table is always loaded as a whole and replaces any previous table of the
//! same name. Schema extraction must only run after the load has finished.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use polars::prelude::*;

use crate::reader::{data, Reader};
use crate::value::any_value_to_json;
use crate::{ChartError, DataFrame, Result};

/// Where a table's data comes from
#[derive(Debug, Clone)]
pub enum LoadSource {
    /// Bundled sample dataset, by name
    Builtin(String),
    /// Local file, dispatched by extension
    File(PathBuf),
    /// Remote file, dispatched by the URL path's extension
    Url(String),
    /// Pasted JSON text (an array of records)
    Json(String),
    /// An in-memory record batch
    Frame(DataFrame),
}

/// File formats understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
    Json,
}

impl FileFormat {
    /// Determine the format from a path or URL suffix (case-insensitive).
    pub fn from_path(path: &str) -> Result<Self> {
        // Ignore query strings and fragments on URLs
        let path = path.split(['?', '#']).next().unwrap_or(path);

        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("parquet") => Ok(FileFormat::Parquet),
            Some("json") => Ok(FileFormat::Json),
            Some(other) => Err(ChartError::LoadError(format!(
                "Unsupported file extension '.{}' for '{}'",
                other, path
            ))),
            None => Err(ChartError::LoadError(format!(
                "Cannot determine file format of '{}': no file extension",
                path
            ))),
        }
    }
}

impl LoadSource {
    /// Stable identity of this source, used as part of the schema cache key.
    pub fn identity(&self) -> String {
        match self {
            LoadSource::Builtin(name) => format!("builtin:{}", name),
            LoadSource::File(path) => format!("file:{}", path.display()),
            LoadSource::Url(url) => format!("url:{}", url),
            LoadSource::Json(text) => {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                format!("json:{:016x}", hasher.finish())
            }
            LoadSource::Frame(df) => {
                let mut hasher = DefaultHasher::new();
                for column in df.get_columns() {
                    column.name().as_str().hash(&mut hasher);
                    column.dtype().to_string().hash(&mut hasher);
                    // Same-shape frames with different cells must not share a key
                    let series = column.as_materialized_series();
                    for idx in 0..series.len() {
                        match series.get(idx) {
                            Ok(value) => any_value_to_json(&value).to_string().hash(&mut hasher),
                            Err(_) => idx.hash(&mut hasher),
                        }
                    }
                }
                format!(
                    "frame:{}x{}:{:016x}",
                    df.height(),
                    df.width(),
                    hasher.finish()
                )
            }
        }
    }

    /// Materialize the source as a DataFrame
    pub fn to_frame(&self) -> Result<DataFrame> {
        match self {
            LoadSource::Builtin(name) => data::load_builtin_dataframe(name),
            LoadSource::File(path) => {
                let format = FileFormat::from_path(&path.to_string_lossy())?;
                let bytes = std::fs::read(path).map_err(|e| {
                    ChartError::LoadError(format!("Failed to read '{}': {}", path.display(), e))
                })?;
                read_frame(&bytes, format)
            }
            LoadSource::Url(url) => {
                let format = FileFormat::from_path(url)?;
                let bytes = fetch_url(url)?;
                read_frame(&bytes, format)
            }
            LoadSource::Json(text) => read_frame(text.as_bytes(), FileFormat::Json),
            LoadSource::Frame(df) => Ok(df.clone()),
        }
    }
}

impl FromStr for LoadSource {
    type Err = ChartError;

    /// Parse `builtin:<name>`, `json:<text>`, `http(s)://...` or a file path.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ChartError::LoadError("Empty data source".to_string()));
        }

        if let Some(name) = s.strip_prefix("builtin:") {
            Ok(LoadSource::Builtin(name.to_string()))
        } else if let Some(text) = s.strip_prefix("json:") {
            Ok(LoadSource::Json(text.to_string()))
        } else if s.starts_with("http://") || s.starts_with("https://") {
            Ok(LoadSource::Url(s.to_string()))
        } else {
            Ok(LoadSource::File(PathBuf::from(s)))
        }
    }
}

/// Parse raw bytes in the given format
pub fn read_frame(bytes: &[u8], format: FileFormat) -> Result<DataFrame> {
    let cursor = Cursor::new(bytes.to_vec());
    let result = match format {
        FileFormat::Csv => CsvReadOptions::default()
            .with_has_header(true)
            .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
            .into_reader_with_file_handle(cursor)
            .finish(),
        FileFormat::Parquet => ParquetReader::new(cursor).finish(),
        FileFormat::Json => JsonReader::new(cursor).finish(),
    };

    result.map_err(|e| ChartError::LoadError(format!("Failed to parse {:?} data: {}", format, e)))
}

#[cfg(feature = "remote")]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ChartError::LoadError(format!("Failed to fetch '{}': {}", url, e)))?;
    let bytes = response
        .bytes()
        .map_err(|e| ChartError::LoadError(format!("Failed to read body of '{}': {}", url, e)))?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "remote"))]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    Err(ChartError::LoadError(format!(
        "Cannot fetch '{}': remote loading is not enabled in this build",
        url
    )))
}

/// Load `source` into `reader` as `table_name`, replacing any existing table.
///
/// The name is used verbatim (case-sensitive); schema extraction must use
/// the same name.
pub fn load_table(reader: &dyn Reader, source: &LoadSource, table_name: &str) -> Result<()> {
    let df = source.to_frame()?;
    let (rows, cols) = df.shape();
    reader.register(table_name, df, true)?;
    tracing::info!(
        table = table_name,
        source = %source.identity(),
        rows,
        cols,
        "Loaded table"
    );
    Ok(())
}
