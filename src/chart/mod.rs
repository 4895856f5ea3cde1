//! Chart spec builder.
//!
//! Maps a small user-editable [`ChartForm`] and the current [`TableSummary`]
//! to a [`VisualElement`]. The builder is total: incomplete or stale forms
//! degrade to a table preview, and chart kinds without a renderer yet produce
//! a plot with no mark. Problems are reported through the diagnostic sink.

pub mod types;

pub use types::{Mark, PlotPart, PlotSpec, TablePreview, VisualElement, YValue};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::naming::{is_count_field, COUNT_LABEL};
use crate::schema::{simplified_data_type, SimplifiedType, TableSummary};
use crate::settings::Settings;
use crate::ChartError;

/// Chart kinds offered by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartType {
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "grouped-column")]
    GroupedColumn,
    #[serde(rename = "stacked-column")]
    StackedColumn,
    #[serde(rename = "100-stacked-column")]
    PercentStackedColumn,
    #[serde(rename = "bar")]
    Bar,
}

impl ChartType {
    pub const ALL: [ChartType; 5] = [
        ChartType::Line,
        ChartType::GroupedColumn,
        ChartType::StackedColumn,
        ChartType::PercentStackedColumn,
        ChartType::Bar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::GroupedColumn => "grouped-column",
            ChartType::StackedColumn => "stacked-column",
            ChartType::PercentStackedColumn => "100-stacked-column",
            ChartType::Bar => "bar",
        }
    }

    /// Whether the builder emits a mark for this kind
    pub fn is_implemented(&self) -> bool {
        match self {
            ChartType::Line | ChartType::GroupedColumn => true,
            ChartType::StackedColumn | ChartType::PercentStackedColumn | ChartType::Bar => false,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ChartError;

    fn from_str(s: &str) -> crate::Result<Self> {
        ChartType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = ChartType::ALL.iter().map(|t| t.as_str()).collect();
                ChartError::ValidationError(format!(
                    "Unknown chart type '{}'. Expected one of: {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// User-editable chart configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartForm {
    pub chart_type: ChartType,
    #[serde(default)]
    pub x: Option<String>,
    /// A column name or the count sentinel
    #[serde(default)]
    pub y: Option<String>,
    /// Reserved for series colouring; not read by the builder
    #[serde(default)]
    pub color_by: Option<String>,
}

impl ChartForm {
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            x: None,
            y: None,
            color_by: None,
        }
    }

    pub fn with_x(mut self, x: impl Into<String>) -> Self {
        self.x = Some(x.into());
        self
    }

    pub fn with_y(mut self, y: impl Into<String>) -> Self {
        self.y = Some(y.into());
        self
    }
}

/// Build the visual element for `form` over `table_name`.
///
/// Never fails. An unset x or y, or a reference to a column that is not in
/// `summary`, yields a preview-only element. Chart kinds that are not
/// implemented log one warning and yield a plot without a mark.
pub fn build_chart_spec(
    form: &ChartForm,
    table_name: &str,
    summary: &TableSummary,
    settings: &Settings,
    diagnostics: &dyn Diagnostics,
) -> VisualElement {
    let preview = TablePreview {
        table: table_name.to_string(),
        width: settings.table_width,
        height: settings.table_height,
        max_rows: settings.preview_rows,
    };

    let (Some(x_name), Some(y_name)) = (form.x.as_deref(), form.y.as_deref()) else {
        return VisualElement::preview(preview, settings.gap);
    };

    // The form may outlive a reload, so its columns can be gone
    let Some(x_column) = summary.column(x_name) else {
        diagnostics.error(&format!(
            "Column '{}' not found in table '{}'",
            x_name, table_name
        ));
        return VisualElement::preview(preview, settings.gap);
    };

    let (y, y_type) = if is_count_field(y_name) {
        (YValue::Count, SimplifiedType::Quantitative)
    } else if let Some(y_column) = summary.column(y_name) {
        (
            YValue::Field(y_name.to_string()),
            simplified_data_type(y_column.data_type),
        )
    } else {
        diagnostics.error(&format!(
            "Column '{}' not found in table '{}'",
            y_name, table_name
        ));
        return VisualElement::preview(preview, settings.gap);
    };

    let x_type = simplified_data_type(x_column.data_type);
    let y_label = match &y {
        YValue::Count => COUNT_LABEL.to_string(),
        YValue::Field(name) => name.clone(),
    };

    let mut plot = PlotSpec::new();
    plot.push(PlotPart::GridX);
    plot.push(PlotPart::GridY);
    plot.push(PlotPart::Width(settings.chart_width));
    plot.push(PlotPart::YLabel(y_label));

    let axes = Axes {
        x: x_name.to_string(),
        y,
        x_type,
        y_type,
    };
    if let Some(mark) = select_mark(form.chart_type, axes, settings, diagnostics) {
        plot.push(PlotPart::Mark(mark));
    }

    VisualElement {
        plot: Some(plot),
        table: preview,
        gap: settings.gap,
    }
}

/// Resolved channels shared by every mark kind
struct Axes {
    x: String,
    y: YValue,
    x_type: SimplifiedType,
    y_type: SimplifiedType,
}

fn select_mark(
    chart_type: ChartType,
    axes: Axes,
    settings: &Settings,
    diagnostics: &dyn Diagnostics,
) -> Option<Mark> {
    let Axes {
        x,
        y,
        x_type,
        y_type,
    } = axes;
    match chart_type {
        ChartType::GroupedColumn if x_type.is_continuous() => Some(Mark::Rect {
            x,
            y,
            x_type,
            y_type,
            fill: settings.accent_color.clone(),
        }),
        ChartType::GroupedColumn => Some(Mark::Bar {
            x,
            y,
            x_type,
            y_type,
            fill: settings.accent_color.clone(),
        }),
        ChartType::Line => Some(Mark::Line {
            x,
            y,
            x_type,
            y_type,
            sort: true,
        }),
        ChartType::StackedColumn | ChartType::PercentStackedColumn | ChartType::Bar => {
            diagnostics.warn(&format!(
                "Chart type '{}' is not implemented yet",
                chart_type
            ));
            None
        }
    }
}
