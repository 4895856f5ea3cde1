//! Visual element model produced by the chart builder.
//!
//! These types describe *what* to draw, not how. A [`PlotSpec`] is an ordered
//! list of parts applied left to right (later parts override earlier ones),
//! and a [`VisualElement`] stacks an optional plot above a table preview.
//! Writers turn a `VisualElement` into a concrete output format.

use serde::{Deserialize, Serialize};

use crate::schema::SimplifiedType;

/// The y channel of a mark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YValue {
    /// A real column of the table
    Field(String),
    /// Aggregate row count
    Count,
}

impl YValue {
    pub fn field(&self) -> Option<&str> {
        match self {
            YValue::Field(name) => Some(name),
            YValue::Count => None,
        }
    }
}

/// A single geometric chart element bound to data fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Mark {
    /// Binned or time-bucketed column over a continuous x axis
    Rect {
        x: String,
        y: YValue,
        x_type: SimplifiedType,
        y_type: SimplifiedType,
        fill: String,
    },
    /// Column over a discrete x axis
    Bar {
        x: String,
        y: YValue,
        x_type: SimplifiedType,
        y_type: SimplifiedType,
        fill: String,
    },
    /// Line drawn in x order
    Line {
        x: String,
        y: YValue,
        x_type: SimplifiedType,
        y_type: SimplifiedType,
        sort: bool,
    },
}

impl Mark {
    pub fn x(&self) -> &str {
        match self {
            Mark::Rect { x, .. } | Mark::Bar { x, .. } | Mark::Line { x, .. } => x,
        }
    }

    pub fn y(&self) -> &YValue {
        match self {
            Mark::Rect { y, .. } | Mark::Bar { y, .. } | Mark::Line { y, .. } => y,
        }
    }

    pub fn x_type(&self) -> SimplifiedType {
        match self {
            Mark::Rect { x_type, .. } | Mark::Bar { x_type, .. } | Mark::Line { x_type, .. } => {
                *x_type
            }
        }
    }

    /// Classification of the y channel; counts are quantitative
    pub fn y_type(&self) -> SimplifiedType {
        match self {
            Mark::Rect { y_type, .. } | Mark::Bar { y_type, .. } | Mark::Line { y_type, .. } => {
                *y_type
            }
        }
    }

    pub fn fill(&self) -> Option<&str> {
        match self {
            Mark::Rect { fill, .. } | Mark::Bar { fill, .. } => Some(fill),
            Mark::Line { .. } => None,
        }
    }

    /// Columns this mark reads from the data
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut columns = vec![self.x()];
        if let Some(y) = self.y().field() {
            columns.push(y);
        }
        columns
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Mark::Rect { .. } => "rect",
            Mark::Bar { .. } => "bar",
            Mark::Line { .. } => "line",
        }
    }
}

/// One application step of a plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotPart {
    GridX,
    GridY,
    /// Fixed plot width in pixels
    Width(u32),
    YLabel(String),
    Mark(Mark),
}

/// Ordered plot parts. Baseline parts always precede the mark.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotSpec {
    pub parts: Vec<PlotPart>,
}

impl PlotSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, part: PlotPart) {
        self.parts.push(part);
    }

    /// Last mark in the plot, if any
    pub fn mark(&self) -> Option<&Mark> {
        self.parts.iter().rev().find_map(|part| match part {
            PlotPart::Mark(mark) => Some(mark),
            _ => None,
        })
    }

    /// Last applied width
    pub fn width(&self) -> Option<u32> {
        self.parts.iter().rev().find_map(|part| match part {
            PlotPart::Width(w) => Some(*w),
            _ => None,
        })
    }

    /// Last applied y-axis label
    pub fn y_label(&self) -> Option<&str> {
        self.parts.iter().rev().find_map(|part| match part {
            PlotPart::YLabel(label) => Some(label.as_str()),
            _ => None,
        })
    }

    pub fn grid_x(&self) -> bool {
        self.parts.contains(&PlotPart::GridX)
    }

    pub fn grid_y(&self) -> bool {
        self.parts.contains(&PlotPart::GridY)
    }
}

/// Preview of the raw table shown under the plot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePreview {
    pub table: String,
    pub width: u32,
    pub height: u32,
    pub max_rows: usize,
}

/// Final composition handed to a writer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualElement {
    /// `None` when there is nothing to plot yet
    pub plot: Option<PlotSpec>,
    pub table: TablePreview,
    /// Vertical gap between the plot and the table
    pub gap: u32,
}

impl VisualElement {
    /// Element showing only the table preview
    pub fn preview(table: TablePreview, gap: u32) -> Self {
        Self {
            plot: None,
            table,
            gap,
        }
    }

    pub fn preview_only(&self) -> bool {
        self.plot.is_none()
    }

    pub fn has_mark(&self) -> bool {
        self.mark().is_some()
    }

    pub fn mark(&self) -> Option<&Mark> {
        self.plot.as_ref().and_then(|plot| plot.mark())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(x: &str) -> Mark {
        Mark::Bar {
            x: x.to_string(),
            y: YValue::Count,
            x_type: SimplifiedType::Nominal,
            y_type: SimplifiedType::Quantitative,
            fill: "#000".to_string(),
        }
    }

    #[test]
    fn test_later_parts_override_earlier_ones() {
        let plot = PlotSpec {
            parts: vec![
                PlotPart::Width(100),
                PlotPart::YLabel("first".into()),
                PlotPart::Mark(bar("a")),
                PlotPart::Width(200),
                PlotPart::YLabel("second".into()),
                PlotPart::Mark(bar("b")),
            ],
        };
        assert_eq!(plot.width(), Some(200));
        assert_eq!(plot.y_label(), Some("second"));
        assert_eq!(plot.mark().map(|m| m.x()), Some("b"));
    }

    #[test]
    fn test_referenced_columns() {
        assert_eq!(bar("species").referenced_columns(), vec!["species"]);

        let line = Mark::Line {
            x: "date".into(),
            y: YValue::Field("ozone".into()),
            x_type: SimplifiedType::Temporal,
            y_type: SimplifiedType::Quantitative,
            sort: true,
        };
        assert_eq!(line.referenced_columns(), vec!["date", "ozone"]);
        assert_eq!(line.fill(), None);
        assert_eq!(line.kind(), "line");
    }

    #[test]
    fn test_preview_element() {
        let table = TablePreview {
            table: "t".into(),
            width: 10,
            height: 20,
            max_rows: 5,
        };
        let element = VisualElement::preview(table, 4);
        assert!(element.preview_only());
        assert!(!element.has_mark());
        assert!(element.mark().is_none());
    }
}
