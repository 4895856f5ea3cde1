//! Vega-Lite JSON writer implementation
//!
//! Converts a [`VisualElement`] and its DataFrame into a Vega-Lite v6
//! specification.
//!
//! # Mapping Strategy
//!
//! - element → top-level `vconcat` of the plot view above the table view
//! - `Mark` → Vega-Lite mark type and `x`/`y` encoding channels
//! - `GridX`/`GridY`/`YLabel`/`Width` parts → axis and view properties
//! - table preview → `window` + `fold` transforms feeding a `text` mark
//! - Polars DataFrame → top-level inline data shared by both views
//!
//! # Example
//!
//! ```rust,ignore
//! use chartform::writer::{Writer, VegaLiteWriter};
//!
//! let writer = VegaLiteWriter::new();
//! let vega_json = writer.write(&element, &dataframe)?;
//! // Can be rendered in browser with vega-embed
//! ```

use serde_json::{json, Value};

use crate::chart::{Mark, PlotSpec, TablePreview, VisualElement, YValue};
use crate::naming::{PREVIEW_KEY_FIELD, PREVIEW_ROW_FIELD, PREVIEW_VALUE_FIELD};
use crate::schema::SimplifiedType;
use crate::value::dataframe_to_values;
use crate::writer::Writer;
use crate::{ChartError, DataFrame, Result};

/// Vega-Lite schema URL
pub const VEGALITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v6.json";

/// Time unit used to bucket temporal columns drawn as rects
const TEMPORAL_RECT_TIME_UNIT: &str = "yearmonthdate";

/// Vega-Lite JSON writer
///
/// Generates Vega-Lite v6 specifications from visual elements and data.
pub struct VegaLiteWriter {
    /// Vega-Lite schema version
    schema: String,
    pretty: bool,
}

impl VegaLiteWriter {
    /// Create a new Vega-Lite writer with default settings
    pub fn new() -> Self {
        Self {
            schema: VEGALITE_SCHEMA.to_string(),
            pretty: true,
        }
    }

    /// Emit compact JSON instead of pretty-printed JSON
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Build the Vega-Lite document as a JSON value
    pub fn to_value(&self, element: &VisualElement, data: &DataFrame) -> Result<Value> {
        self.validate(element, data)?;

        let columns: Vec<String> = data
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut views = Vec::new();
        if let Some(plot) = &element.plot {
            views.push(self.plot_view(plot));
        }
        views.push(self.table_view(&element.table, &columns));

        Ok(json!({
            "$schema": self.schema,
            "description": format!("Chart of table '{}'", element.table.table),
            "data": { "values": dataframe_to_values(data, None)? },
            "spacing": element.gap,
            "vconcat": views,
        }))
    }

    fn plot_view(&self, plot: &PlotSpec) -> Value {
        let mut view = json!({});
        if let Some(width) = plot.width() {
            view["width"] = json!(width);
        }

        let Some(mark) = plot.mark() else {
            // Axes frame with nothing drawn in it
            view["layer"] = json!([]);
            return view;
        };

        view["mark"] = mark_json(mark);
        view["encoding"] = json!({
            "x": x_encoding(mark, plot.grid_x()),
            "y": y_encoding(mark, plot.grid_y(), plot.y_label()),
        });
        view
    }

    fn table_view(&self, table: &TablePreview, columns: &[String]) -> Value {
        // Fold keys come back unescaped, so the sort order uses the raw names
        let folded: Vec<String> = columns.iter().map(|c| field_ref(c)).collect();
        json!({
            "width": table.width,
            "height": table.height,
            "transform": [
                { "window": [{ "op": "row_number", "as": PREVIEW_ROW_FIELD }] },
                { "filter": format!("datum['{}'] <= {}", PREVIEW_ROW_FIELD, table.max_rows) },
                { "fold": folded, "as": [PREVIEW_KEY_FIELD, PREVIEW_VALUE_FIELD] },
            ],
            "mark": { "type": "text", "align": "left", "limit": 120 },
            "encoding": {
                "x": {
                    "field": PREVIEW_KEY_FIELD,
                    "type": "nominal",
                    "sort": columns,
                    "axis": { "orient": "top", "title": null, "labelAngle": 0, "domain": false, "ticks": false },
                },
                "y": {
                    "field": PREVIEW_ROW_FIELD,
                    "type": "ordinal",
                    "axis": null,
                },
                "text": { "field": PREVIEW_VALUE_FIELD },
            },
        })
    }
}

impl Default for VegaLiteWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape a column name for use as a Vega-Lite field reference
///
/// Dots and brackets otherwise address nested fields.
fn field_ref(name: &str) -> String {
    name.replace('\\', "\\\\")
        .replace('.', "\\.")
        .replace('[', "\\[")
        .replace(']', "\\]")
}

fn mark_json(mark: &Mark) -> Value {
    match mark {
        Mark::Rect { fill, .. } | Mark::Bar { fill, .. } => {
            json!({ "type": mark.kind(), "fill": fill })
        }
        Mark::Line { .. } => json!({ "type": "line", "point": true }),
    }
}

fn x_encoding(mark: &Mark, grid: bool) -> Value {
    let x_type = mark.x_type();
    let mut encoding = json!({
        "field": field_ref(mark.x()),
        "type": x_type.vega_type(),
        "axis": { "grid": grid },
    });

    match mark {
        Mark::Rect { .. } => match x_type {
            SimplifiedType::Quantitative => encoding["bin"] = json!(true),
            SimplifiedType::Temporal => encoding["timeUnit"] = json!(TEMPORAL_RECT_TIME_UNIT),
            SimplifiedType::Ordinal | SimplifiedType::Nominal | SimplifiedType::Unknown => {}
        },
        Mark::Line { sort: true, .. } => encoding["sort"] = json!("ascending"),
        Mark::Line { sort: false, .. } | Mark::Bar { .. } => {}
    }
    encoding
}

fn y_encoding(mark: &Mark, grid: bool, label: Option<&str>) -> Value {
    let mut encoding = match mark.y() {
        YValue::Count => json!({ "aggregate": "count", "type": "quantitative" }),
        YValue::Field(name) => json!({
            "field": field_ref(name),
            "type": mark.y_type().vega_type(),
        }),
    };

    // Rects cover a whole bucket, so literal values are summed into it
    if matches!(mark, Mark::Rect { .. })
        && mark.y().field().is_some()
        && mark.y_type() == SimplifiedType::Quantitative
    {
        encoding["aggregate"] = json!("sum");
    }

    encoding["axis"] = json!({ "grid": grid });
    if let Some(label) = label {
        encoding["axis"]["title"] = json!(label);
    }
    encoding
}

impl Writer for VegaLiteWriter {
    type Output = String;

    fn write(&self, element: &VisualElement, data: &DataFrame) -> Result<String> {
        let vl_spec = self.to_value(element, data)?;
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&vl_spec)
        } else {
            serde_json::to_string(&vl_spec)
        };
        rendered.map_err(|e| {
            ChartError::WriterError(format!("Failed to serialize Vega-Lite JSON: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{build_chart_spec, ChartForm, ChartType};
    use crate::diagnostics::RecordingDiagnostics;
    use crate::naming::COUNT_FIELD;
    use crate::schema::{ColumnSummary, DataType, TableSummary};
    use crate::settings::Settings;
    use polars::prelude::*;

    fn sales() -> DataFrame {
        df! {
            "region" => &["north", "south", "north"],
            "units" => &[3i64, 5, 7],
            "price" => &[1.5, 2.5, 3.5],
        }
        .unwrap()
    }

    fn summary() -> TableSummary {
        let column = |name: &str, data_type| ColumnSummary {
            name: name.to_string(),
            data_type,
            nullable: true,
            sample_values: vec![],
            is_primary_key: false,
            is_foreign_key: false,
            default_value: None,
            comment: None,
        };
        TableSummary {
            name: "sales".to_string(),
            columns: vec![
                column("region", DataType::Varchar),
                column("units", DataType::BigInt),
                column("price", DataType::Double),
            ],
            num_rows: Some(3),
        }
    }

    fn render(form: &ChartForm) -> Value {
        let sink = RecordingDiagnostics::new();
        let element = build_chart_spec(form, "sales", &summary(), &Settings::default(), &sink);
        let json_str = VegaLiteWriter::new().write(&element, &sales()).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    #[test]
    fn test_top_level_shape() {
        let form = ChartForm::new(ChartType::GroupedColumn)
            .with_x("region")
            .with_y("units");
        let vl_spec = render(&form);

        assert_eq!(vl_spec["$schema"], VEGALITE_SCHEMA);
        assert_eq!(vl_spec["spacing"], Settings::default().gap);
        assert_eq!(vl_spec["data"]["values"].as_array().unwrap().len(), 3);
        assert_eq!(vl_spec["data"]["values"][1]["region"], "south");
        assert_eq!(vl_spec["vconcat"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_bar_over_nominal_x() {
        let form = ChartForm::new(ChartType::GroupedColumn)
            .with_x("region")
            .with_y("units");
        let plot = &render(&form)["vconcat"][0];

        assert_eq!(plot["width"], 640);
        assert_eq!(plot["mark"]["type"], "bar");
        assert_eq!(plot["mark"]["fill"], "#4269d0");
        assert_eq!(plot["encoding"]["x"]["field"], "region");
        assert_eq!(plot["encoding"]["x"]["type"], "nominal");
        assert_eq!(plot["encoding"]["x"]["axis"]["grid"], true);
        assert_eq!(plot["encoding"]["y"]["field"], "units");
        assert!(plot["encoding"]["y"].get("aggregate").is_none());
        assert_eq!(plot["encoding"]["y"]["axis"]["title"], "units");
    }

    #[test]
    fn test_rect_over_quantitative_x_is_binned() {
        let form = ChartForm::new(ChartType::GroupedColumn)
            .with_x("price")
            .with_y("units");
        let plot = &render(&form)["vconcat"][0];

        assert_eq!(plot["mark"]["type"], "rect");
        assert_eq!(plot["encoding"]["x"]["type"], "quantitative");
        assert_eq!(plot["encoding"]["x"]["bin"], true);
        assert_eq!(plot["encoding"]["y"]["aggregate"], "sum");
    }

    #[test]
    fn test_count_encoding() {
        let form = ChartForm::new(ChartType::GroupedColumn)
            .with_x("region")
            .with_y(COUNT_FIELD);
        let y = &render(&form)["vconcat"][0]["encoding"]["y"];

        assert_eq!(y["aggregate"], "count");
        assert!(y.get("field").is_none());
        assert_eq!(y["axis"]["title"], "Count of Records");
    }

    #[test]
    fn test_line_mark() {
        let form = ChartForm::new(ChartType::Line).with_x("units").with_y("price");
        let plot = &render(&form)["vconcat"][0];

        assert_eq!(plot["mark"], json!({ "type": "line", "point": true }));
        assert_eq!(plot["encoding"]["x"]["sort"], "ascending");
        assert!(plot["mark"].get("fill").is_none());
    }

    #[test]
    fn test_plot_without_mark() {
        let form = ChartForm::new(ChartType::StackedColumn)
            .with_x("region")
            .with_y("units");
        let plot = &render(&form)["vconcat"][0];

        assert_eq!(plot["layer"], json!([]));
        assert!(plot.get("mark").is_none());
    }

    #[test]
    fn test_preview_only_has_single_table_view() {
        let vl_spec = render(&ChartForm::new(ChartType::Line));
        let views = vl_spec["vconcat"].as_array().unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0]["mark"]["type"], "text");
    }

    #[test]
    fn test_table_view_transforms() {
        let vl_spec = render(&ChartForm::new(ChartType::Line));
        let table = &vl_spec["vconcat"][0];

        assert_eq!(table["width"], 640);
        assert_eq!(table["height"], 300);
        assert_eq!(table["transform"][0]["window"][0]["op"], "row_number");
        assert_eq!(table["transform"][0]["window"][0]["as"], PREVIEW_ROW_FIELD);
        assert_eq!(
            table["transform"][1]["filter"],
            format!("datum['{}'] <= 100", PREVIEW_ROW_FIELD)
        );
        assert_eq!(
            table["transform"][2]["fold"],
            json!(["region", "units", "price"])
        );
        assert_eq!(table["encoding"]["text"]["field"], PREVIEW_VALUE_FIELD);
        assert_eq!(table["encoding"]["x"]["sort"], json!(["region", "units", "price"]));
    }

    #[test]
    fn test_table_view_folds_escaped_names() {
        let element = VisualElement::preview(
            TablePreview {
                table: "t".into(),
                width: 100,
                height: 100,
                max_rows: 10,
            },
            8,
        );
        let data = df! { "a.b" => &[1i64], "c" => &[2i64] }.unwrap();
        let json_str = VegaLiteWriter::new().write(&element, &data).unwrap();
        let vl_spec: Value = serde_json::from_str(&json_str).unwrap();

        let table = &vl_spec["vconcat"][0];
        assert_eq!(table["transform"][2]["fold"], json!(["a\\.b", "c"]));
        assert_eq!(table["encoding"]["x"]["sort"], json!(["a.b", "c"]));
    }

    #[test]
    fn test_y_type_follows_y_column() {
        let form = ChartForm::new(ChartType::GroupedColumn)
            .with_x("units")
            .with_y("region");
        let y = &render(&form)["vconcat"][0]["encoding"]["y"];
        assert_eq!(y["type"], "nominal");
        assert_eq!(y["field"], "region");
        assert!(y.get("aggregate").is_none());
    }

    #[test]
    fn test_missing_data_column_is_rejected() {
        let form = ChartForm::new(ChartType::Line).with_x("units").with_y("price");
        let sink = RecordingDiagnostics::new();
        let element = build_chart_spec(&form, "sales", &summary(), &Settings::default(), &sink);

        let data = df! { "units" => &[1i64] }.unwrap();
        let err = VegaLiteWriter::new().write(&element, &data).unwrap_err();
        assert!(matches!(err, ChartError::ValidationError(_)));
    }

    #[test]
    fn test_field_ref_escapes_nested_access() {
        assert_eq!(field_ref("a.b"), "a\\.b");
        assert_eq!(field_ref("x[0]"), "x\\[0\\]");
        assert_eq!(field_ref("plain"), "plain");
    }

    #[test]
    fn test_compact_output() {
        let sink = RecordingDiagnostics::new();
        let element = build_chart_spec(
            &ChartForm::new(ChartType::Line),
            "sales",
            &summary(),
            &Settings::default(),
            &sink,
        );
        let out = VegaLiteWriter::new().compact().write(&element, &sales()).unwrap();
        assert!(!out.contains('\n'));
    }
}
