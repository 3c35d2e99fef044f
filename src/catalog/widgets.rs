//! Inline HTML widgets rendered by the host in a sandboxed iframe
//!
//! Each widget is a pair: an HTML resource with the UI bundle inlined, and a
//! tool whose `_meta` points the host at that resource.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{DemoError, Result};
use crate::mcp::{
    FieldKind, ResourceContent, ResourceMeta, ResourceRegistry, Shape, ToolCallResult,
    ToolRegistry, ToolSpec,
};
use crate::types::WidgetAssetPaths;

/// MIME type the host expects for widget documents
pub const WIDGET_MIME_TYPE: &str = "text/html+skybridge";

const WIDGET_DOMAIN: &str = "https://chatgpt.com";
const CONNECT_DOMAINS: &[&str] = &["https://chatgpt.com"];
const RESOURCE_DOMAINS: &[&str] = &["https://*.oaistatic.com"];

/// Prebuilt UI bundle, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct WidgetAssets {
    script: String,
    style: String,
}

impl WidgetAssets {
    pub fn inline(script: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            style: style.into(),
        }
    }

    /// Read the bundle from disk. A configured script must be readable; the
    /// stylesheet is optional and falls back to empty.
    pub fn load(paths: &WidgetAssetPaths) -> Result<Self> {
        let script = match &paths.script {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                DemoError::Config(format!(
                    "cannot read widget script {}: {e}",
                    path.display()
                ))
            })?,
            None => {
                tracing::warn!("No widget script configured; widgets will render empty");
                String::new()
            }
        };

        let style = paths
            .style
            .as_deref()
            .map(read_optional)
            .unwrap_or_default();

        Ok(Self { script, style })
    }

    /// Full HTML document with the bundle inlined
    pub fn render_document(&self, title: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{title}</title>
    <script type="module">{script}</script>
    <style>{style}</style>
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>"#,
            script = self.script,
            style = self.style,
        )
    }
}

fn read_optional(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), "widget stylesheet unavailable: {}", e);
        String::new()
    })
}

/// Sandboxing and styling hints consumed by the host
pub fn widget_meta() -> Value {
    json!({
        "openai/widgetPrefersBorder": true,
        "openai/widgetDomain": WIDGET_DOMAIN,
        "openai/widgetCSP": {
            "connect_domains": CONNECT_DOMAINS,
            "resource_domains": RESOURCE_DOMAINS,
        },
    })
}

/// One widget: its display tool and its document resource
#[derive(Debug, Clone, Copy)]
pub struct Widget {
    pub tool: &'static str,
    pub title: &'static str,
    pub uri: &'static str,
    pub document_title: &'static str,
    pub input_field: &'static str,
    pub invoking: &'static str,
    pub invoked: &'static str,
    pub acknowledgement: &'static str,
}

pub const KANBAN_BOARD: Widget = Widget {
    tool: "kanban-board",
    title: "Show Kanban Board",
    uri: "ui://widget/kanban-board.html",
    document_title: "Kanban board",
    input_field: "tasks",
    invoking: "Displaying the board",
    invoked: "Displayed the board",
    acknowledgement: "Displayed the kanban board!",
};

pub const SNIPPET_LIST: Widget = Widget {
    tool: "snippet-list",
    title: "Show Snippet List",
    uri: "ui://widget/snippet-list.html",
    document_title: "Snippets",
    input_field: "query",
    invoking: "Displaying your snippets",
    invoked: "Displayed your snippets",
    acknowledgement: "Displayed the snippet list!",
};

pub const WIDGETS: &[Widget] = &[KANBAN_BOARD, SNIPPET_LIST];

impl Widget {
    fn tool_meta(&self) -> Value {
        json!({
            "openai/outputTemplate": self.uri,
            "openai/toolInvocation/invoking": self.invoking,
            "openai/toolInvocation/invoked": self.invoked,
        })
    }
}

// The widget's input field is declared for the host but never read
#[derive(Debug, Deserialize)]
struct Ignored {}

pub fn register(
    tools: &mut ToolRegistry,
    resources: &mut ResourceRegistry,
    assets: Arc<WidgetAssets>,
) -> Result<()> {
    for widget in WIDGETS.iter().copied() {
        let assets = assets.clone();
        resources.register_static(
            widget.uri,
            ResourceMeta::new(widget.tool).mime_type(WIDGET_MIME_TYPE),
            move |uri| {
                Ok(vec![ResourceContent::text(
                    uri,
                    assets.render_document(widget.document_title),
                )
                .with_mime_type(WIDGET_MIME_TYPE)
                .with_meta(widget_meta())])
            },
        )?;

        tools.register_typed(
            ToolSpec::new(widget.tool)
                .title(widget.title)
                .input(Shape::empty().field(widget.input_field, FieldKind::String))
                .meta(widget.tool_meta()),
            move |_: Ignored| async move {
                ToolCallResult::text(widget.acknowledgement)
                    .with_structured(Value::Object(Map::new()))
            },
        )?;
    }
    Ok(())
}
