//! Output writer abstraction layer for chartform
//!
//! The writer module turns a [`VisualElement`] plus the table's data into a
//! concrete output format.
//!
//! # Architecture
//!
//! All writers implement the `Writer` trait, which provides element + data →
//! output conversion and a compatibility check against the data.
//!
//! # Example
//!
//! ```rust,ignore
//! use chartform::writer::{Writer, VegaLiteWriter};
//!
//! let element = build_chart_spec(&form, "penguins", &summary, &settings, &diagnostics);
//! let json = VegaLiteWriter::new().write(&element, &df)?;
//! println!("{}", json);
//! ```

use crate::chart::VisualElement;
use crate::{ChartError, DataFrame, Result};

#[cfg(feature = "vegalite")]
pub mod html;
#[cfg(feature = "vegalite")]
pub mod vegalite;

#[cfg(feature = "vegalite")]
pub use html::HtmlWriter;
#[cfg(feature = "vegalite")]
pub use vegalite::VegaLiteWriter;

/// Trait for visualization output writers
///
/// # Associated Types
///
/// * `Output` - The type returned by `write()`. Text formats use `String`.
pub trait Writer {
    /// The output type produced by this writer.
    type Output;

    /// Generate output for `element` over the rows of `data`
    ///
    /// # Errors
    ///
    /// Returns `ChartError::ValidationError` if the element references columns
    /// missing from `data`, and `ChartError::WriterError` if serialisation fails.
    fn write(&self, element: &VisualElement, data: &DataFrame) -> Result<Self::Output>;

    /// Check that `element` can be rendered from `data` without producing output.
    fn validate(&self, element: &VisualElement, data: &DataFrame) -> Result<()> {
        validate_columns(element, data)
    }
}

/// Every column read by the element's mark must exist in `data`
pub fn validate_columns(element: &VisualElement, data: &DataFrame) -> Result<()> {
    let Some(mark) = element.mark() else {
        return Ok(());
    };

    let available = data.get_column_names();
    for column in mark.referenced_columns() {
        if !available.iter().any(|name| name.as_str() == column) {
            return Err(ChartError::ValidationError(format!(
                "Column '{}' referenced by the {} mark is not present in table '{}'",
                column,
                mark.kind(),
                element.table.table
            )));
        }
    }
    Ok(())
}
