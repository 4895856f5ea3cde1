//! Standalone HTML page writer.
//!
//! Wraps the Vega-Lite document in a page that loads vega-embed from a CDN,
//! so the output can be opened directly in a browser.

use crate::chart::VisualElement;
use crate::writer::{VegaLiteWriter, Writer};
use crate::{ChartError, DataFrame, Result};

const VEGA_URL: &str = "https://cdn.jsdelivr.net/npm/vega@6";
const VEGA_LITE_URL: &str = "https://cdn.jsdelivr.net/npm/vega-lite@6.4.1";
const VEGA_EMBED_URL: &str = "https://cdn.jsdelivr.net/npm/vega-embed@7";

/// HTML page writer
pub struct HtmlWriter {
    vegalite: VegaLiteWriter,
    /// Show the vega-embed action menu
    actions: bool,
}

impl HtmlWriter {
    pub fn new() -> Self {
        Self {
            vegalite: VegaLiteWriter::new(),
            actions: true,
        }
    }

    pub fn with_actions(mut self, actions: bool) -> Self {
        self.actions = actions;
        self
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for HtmlWriter {
    type Output = String;

    fn write(&self, element: &VisualElement, data: &DataFrame) -> Result<String> {
        let spec = self.vegalite.to_value(element, data)?;
        let spec_json = serde_json::to_string(&spec).map_err(|e| {
            ChartError::WriterError(format!("Failed to serialize Vega-Lite JSON: {}", e))
        })?;

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <script src="{vega}"></script>
  <script src="{vega_lite}"></script>
  <script src="{vega_embed}"></script>
</head>
<body>
  <div id="vis"></div>
  <script type="text/javascript">
    const spec = {spec};
    vegaEmbed('#vis', spec, {{ "actions": {actions} }}).catch(console.error);
  </script>
</body>
</html>
"#,
            title = escape_html(&element.table.table),
            vega = VEGA_URL,
            vega_lite = VEGA_LITE_URL,
            vega_embed = VEGA_EMBED_URL,
            spec = escape_script(&spec_json),
            actions = self.actions,
        ))
    }
}

/// Escape HTML special characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Keep data values from closing the surrounding script element
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}
