/*!
# chartform - no-code chart building

Schema introspection and chart specification building for tabular data.

A table is loaded into a SQL engine, its columns are summarised, and a small
user-editable chart form is mapped onto a visual element that writers render
as Vega-Lite.

## Example

```rust,ignore
use chartform::chart::{build_chart_spec, ChartForm, ChartType};
use chartform::diagnostics::TracingDiagnostics;
use chartform::reader::{load_table, LoadSource, PolarsReader};
use chartform::schema::query_schema;
use chartform::settings::Settings;

let reader = PolarsReader::new();
load_table(&reader, &"builtin:penguins".parse()?, "penguins")?;

let summary = query_schema(&reader, "penguins", 5, &TracingDiagnostics).unwrap();
let form = ChartForm::new(ChartType::GroupedColumn)
    .with_x("species")
    .with_y("bill_len");
let element = build_chart_spec(&form, "penguins", &summary, &Settings::default(), &TracingDiagnostics);
```

## Architecture

- **Load** → user data sources become named engine tables ([`reader`])
- **Extract** → `DESCRIBE` plus a row sample become a [`schema::TableSummary`]
- **Build** → form + summary become a [`chart::VisualElement`]
- **Output** → rendered via pluggable writers (Vega-Lite, HTML)

## Core Components

- [`reader`] - Data engine abstraction and table loading
- [`schema`] - Schema extraction and type classification
- [`chart`] - Chart spec builder
- [`writer`] - Output format abstraction layer
*/

pub mod chart;
pub mod diagnostics;
pub mod naming;
pub mod reader;
pub mod schema;
pub mod settings;
pub mod value;
pub mod writer;

// Re-export key types for convenience
pub use chart::{build_chart_spec, ChartForm, ChartType, VisualElement};
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use schema::{query_schema, ColumnSummary, TableSummary};
pub use settings::Settings;

// DataFrame abstraction (wraps Polars)
pub use polars::prelude::DataFrame;

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    #[error("Data source error: {0}")]
    ReaderError(String),

    #[error("Load error: {0}")]
    LoadError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Output generation error: {0}")]
    WriterError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
