//! The demo catalog: every tool and resource this server exposes
//!
//! [`build_server`] is called once by the entry point; the resulting
//! [`McpServer`] is immutable and shared by every request.

pub mod arithmetic;
pub mod resources;
pub mod snippets;
pub mod widgets;

use std::sync::Arc;

use crate::error::Result;
use crate::mcp::{McpServer, ResourceRegistry, ToolRegistry};
use crate::storage::SnippetStore;
use crate::types::DEFAULT_OWNER_ID;

pub use widgets::{WidgetAssets, KANBAN_BOARD, SNIPPET_LIST, WIDGET_MIME_TYPE};

/// Register the full catalog. Fails on duplicate names, which is a startup bug.
pub fn build_server(store: SnippetStore, assets: WidgetAssets) -> Result<McpServer> {
    let mut tools = ToolRegistry::new();
    let mut resources = ResourceRegistry::new();

    arithmetic::register(&mut tools)?;
    resources::register(&mut resources)?;
    snippets::register(&mut tools, store, DEFAULT_OWNER_ID)?;
    widgets::register(&mut tools, &mut resources, Arc::new(assets))?;

    tracing::info!(
        tools = tools.len(),
        resources = resources.list().len(),
        templates = resources.list_templates().len(),
        "catalog registered"
    );
    Ok(McpServer::new(tools, resources))
}
