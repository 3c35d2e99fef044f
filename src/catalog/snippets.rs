//! Snippet CRUD tools backed by [`SnippetStore`]
//!
//! Store failures never surface as protocol errors here: each handler folds
//! them into an error envelope so the caller's conversation keeps going.

use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::mcp::{FieldKind, Shape, ToolCallResult, ToolRegistry, ToolSpec};
use crate::storage::SnippetStore;
use crate::types::SnippetDraft;

#[derive(Debug, Deserialize)]
struct UpdateInput {
    id: String,
    #[serde(flatten)]
    draft: SnippetDraft,
}

#[derive(Debug, Deserialize)]
struct DeleteInput {
    id: String,
}

fn draft_fields(shape: Shape) -> Shape {
    shape
        .field("title", FieldKind::String)
        .field("language", FieldKind::String)
        .field("code", FieldKind::String)
}

fn not_found(id: &str) -> ToolCallResult {
    ToolCallResult::text(format!("Snippet {id} not found or not owned by you."))
}

/// Register the four snippet tools, all scoped to `owner_id`
pub fn register(tools: &mut ToolRegistry, store: SnippetStore, owner_id: &str) -> Result<()> {
    let (s, owner) = (store.clone(), owner_id.to_string());
    tools.register_typed(
        ToolSpec::new("create_snippet")
            .title("Create snippet")
            .description("Save a new code snippet")
            .input(draft_fields(Shape::empty())),
        move |draft: SnippetDraft| {
            let (store, owner) = (s.clone(), owner.clone());
            async move {
                match store.create(&owner, draft).await {
                    Ok(snippet) => ToolCallResult::text(format!(
                        "Snippet '{}' created with id {}.",
                        snippet.title, snippet.id
                    )),
                    Err(e) => {
                        tracing::warn!("create_snippet failed: {}", e);
                        ToolCallResult::error(format!("Failed to create snippet: {e}"), e.kind())
                    }
                }
            }
        },
    )?;

    let (s, owner) = (store.clone(), owner_id.to_string());
    tools.register(
        ToolSpec::new("get_snippets")
            .title("Get snippets")
            .description("List all saved code snippets")
            .output(
                Shape::empty().field("snippets", FieldKind::Array(Box::new(FieldKind::Object))),
            ),
        move |_| {
            let (store, owner) = (s.clone(), owner.clone());
            async move {
                match store.list(&owner).await {
                    Ok(snippets) => ToolCallResult::structured(&json!({ "snippets": snippets })),
                    Err(e) => {
                        tracing::warn!("get_snippets failed: {}", e);
                        ToolCallResult::error(format!("Failed to load snippets: {e}"), e.kind())
                    }
                }
            }
        },
    )?;

    let (s, owner) = (store.clone(), owner_id.to_string());
    tools.register_typed(
        ToolSpec::new("update_snippet")
            .title("Update snippet")
            .description("Replace the title, language and code of a saved snippet")
            .input(draft_fields(Shape::empty().field("id", FieldKind::String))),
        move |UpdateInput { id, draft }: UpdateInput| {
            let (store, owner) = (s.clone(), owner.clone());
            async move {
                match store.update(&owner, &id, draft).await {
                    Ok(Some(snippet)) => {
                        ToolCallResult::text(format!("Snippet {} updated.", snippet.id))
                    }
                    Ok(None) => not_found(&id),
                    Err(e) => {
                        tracing::warn!(id = %id, "update_snippet failed: {}", e);
                        ToolCallResult::error(format!("Failed to update snippet: {e}"), e.kind())
                    }
                }
            }
        },
    )?;

    let (s, owner) = (store, owner_id.to_string());
    tools.register_typed(
        ToolSpec::new("delete_snippet")
            .title("Delete snippet")
            .description("Delete a saved snippet")
            .input(Shape::empty().field("id", FieldKind::String)),
        move |DeleteInput { id }: DeleteInput| {
            let (store, owner) = (s.clone(), owner.clone());
            async move {
                match store.delete(&owner, &id).await {
                    Ok(true) => ToolCallResult::text(format!("Snippet {id} deleted.")),
                    Ok(false) => not_found(&id),
                    Err(e) => {
                        tracing::warn!(id = %id, "delete_snippet failed: {}", e);
                        ToolCallResult::error(format!("Failed to delete snippet: {e}"), e.kind())
                    }
                }
            }
        },
    )?;

    Ok(())
}
