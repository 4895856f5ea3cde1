//! Presentation and extraction settings.
//!
//! Every field has a default, so a settings file only needs the values it
//! changes. The CLI layers its flags on top of whatever the file provides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{ChartError, Result};

/// Default number of preview rows drawn per schema query
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rows sampled into `ColumnSummary::sample_values`
    pub sample_size: usize,
    /// Fixed plot width in pixels
    pub chart_width: u32,
    /// Fixed preview table width in pixels
    pub table_width: u32,
    /// Fixed preview table height in pixels
    pub table_height: u32,
    /// Vertical gap between the plot and the preview table
    pub gap: u32,
    /// Fill colour for column marks
    pub accent_color: String,
    /// Maximum rows shown by the preview table
    pub preview_rows: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            chart_width: 640,
            table_width: 640,
            table_height: 300,
            gap: 12,
            accent_color: "#4269d0".to_string(),
            preview_rows: 100,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ChartError::ConfigError(format!("Invalid settings: {}", e)))
    }

    /// Read settings from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ChartError::ConfigError(format!(
                "Failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&text)
    }
}
