//! Core types for the demo server

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Unique identifier for a snippet
pub type SnippetId = String;

/// The single principal every snippet belongs to (no real auth)
pub const DEFAULT_OWNER_ID: &str = "user123";

/// Default listening port when `PORT` is unset
pub const DEFAULT_PORT: u16 = 3000;

/// A stored code snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Unique identifier, generated on create
    pub id: SnippetId,
    /// Owning principal
    #[serde(rename = "userId")]
    pub owner_id: String,
    pub title: String,
    pub language: String,
    pub code: String,
}

/// Mutable fields of a snippet, as supplied on create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetDraft {
    pub title: String,
    pub language: String,
    pub code: String,
}

impl Snippet {
    /// Replace the mutable fields, keeping id and owner
    pub fn apply(&mut self, draft: SnippetDraft) {
        self.title = draft.title;
        self.language = draft.language;
        self.code = draft.code;
    }
}

/// On-disk layout of the snippet store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetDocument {
    #[serde(default)]
    pub snippets: Vec<Snippet>,
}

/// How `/mcp` responses are framed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// A single `application/json` document
    #[default]
    Json,
    /// A `text/event-stream` with one `message` event per response
    Sse,
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseMode::Json),
            "sse" | "stream" => Ok(ResponseMode::Sse),
            other => Err(format!("unknown response mode: {other}")),
        }
    }
}

/// Paths to the prebuilt widget bundle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetAssetPaths {
    /// ES module script; required when set
    pub script: Option<PathBuf>,
    /// Stylesheet; falls back to empty when unreadable
    pub style: Option<PathBuf>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    pub bind_addr: SocketAddr,
    /// Path of the JSON snippet store
    pub data_file: PathBuf,
    /// Response framing for `/mcp`
    #[serde(default)]
    pub response_mode: ResponseMode,
    /// Widget bundle locations
    #[serde(default)]
    pub widget_assets: WidgetAssetPaths,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            data_file: PathBuf::from("snippets.json"),
            response_mode: ResponseMode::Json,
            widget_assets: WidgetAssetPaths::default(),
        }
    }
}
