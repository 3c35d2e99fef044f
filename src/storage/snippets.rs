//! JSON-file snippet store
//!
//! Every operation loads the whole document from disk, mutates it and writes it
//! back in full. All operations on one store (and its clones) are serialized
//! through a single async mutex, so concurrent writers cannot clobber each other.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{DemoError, Result};
use crate::types::{Snippet, SnippetDocument, SnippetDraft};

/// Handle to the snippet document on disk
#[derive(Clone)]
pub struct SnippetStore {
    path: Arc<PathBuf>,
    gate: Arc<Mutex<()>>,
}

impl SnippetStore {
    /// Open a store backed by `path`. The file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All snippets owned by `owner_id`, in insertion order
    pub async fn list(&self, owner_id: &str) -> Result<Vec<Snippet>> {
        let _guard = self.gate.lock().await;
        let doc = self.read_document().await?;
        Ok(doc
            .snippets
            .into_iter()
            .filter(|s| s.owner_id == owner_id)
            .collect())
    }

    /// Append a new snippet with a fresh id
    pub async fn create(&self, owner_id: &str, draft: SnippetDraft) -> Result<Snippet> {
        let _guard = self.gate.lock().await;
        let mut doc = self.read_document().await?;

        let snippet = Snippet {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title: draft.title,
            language: draft.language,
            code: draft.code,
        };
        doc.snippets.push(snippet.clone());
        self.write_document(&doc).await?;

        tracing::debug!(id = %snippet.id, owner = owner_id, "snippet created");
        Ok(snippet)
    }

    /// Replace the mutable fields of a snippet in place.
    ///
    /// Returns `None` (and leaves the file untouched) when no snippet matches
    /// both `id` and `owner_id`.
    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        draft: SnippetDraft,
    ) -> Result<Option<Snippet>> {
        let _guard = self.gate.lock().await;
        let mut doc = self.read_document().await?;

        let Some(snippet) = doc
            .snippets
            .iter_mut()
            .find(|s| s.id == id && s.owner_id == owner_id)
        else {
            return Ok(None);
        };
        snippet.apply(draft);
        let updated = snippet.clone();

        self.write_document(&doc).await?;
        tracing::debug!(id, owner = owner_id, "snippet updated");
        Ok(Some(updated))
    }

    /// Remove a snippet. Returns whether anything was deleted; the file is only
    /// rewritten when it was.
    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<bool> {
        let _guard = self.gate.lock().await;
        let mut doc = self.read_document().await?;

        let before = doc.snippets.len();
        doc.snippets.retain(|s| !(s.id == id && s.owner_id == owner_id));
        if doc.snippets.len() == before {
            return Ok(false);
        }

        self.write_document(&doc).await?;
        tracing::debug!(id, owner = owner_id, "snippet deleted");
        Ok(true)
    }

    /// Load the document; a missing or empty file reads as an empty store
    async fn read_document(&self) -> Result<SnippetDocument> {
        let content = match tokio::fs::read_to_string(self.path.as_path()).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SnippetDocument::default()),
            Err(e) => {
                tracing::error!(path = %self.path.display(), "Error reading snippets file: {}", e);
                return Err(DemoError::Storage(format!(
                    "Could not read snippets data: {e}"
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(SnippetDocument::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            tracing::error!(path = %self.path.display(), "Error parsing snippets file: {}", e);
            DemoError::Storage(format!("Could not parse snippets data: {e}"))
        })
    }

    /// Persist the full document via a temporary sibling file and a rename
    async fn write_document(&self, doc: &SnippetDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(doc)?;

        let mut tmp: OsString = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let result = async {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&tmp, json.as_bytes()).await?;
            tokio::fs::rename(&tmp, self.path.as_path()).await
        }
        .await;

        result.map_err(|e| {
            tracing::error!(path = %self.path.display(), "Error writing snippets file: {}", e);
            DemoError::Storage(format!("Could not save snippets data: {e}"))
        })
    }
}

impl std::fmt::Debug for SnippetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnippetStore")
            .field("path", &self.path)
            .finish()
    }
}
