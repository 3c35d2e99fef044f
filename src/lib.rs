//! Demo MCP server
//!
//! Arithmetic and greeting tools, JSON-file backed code snippets, and inline
//! HTML widgets, served over streamable HTTP.

pub mod catalog;
pub mod error;
pub mod mcp;
pub mod storage;
pub mod transport;
pub mod types;

pub use error::{DemoError, Result};
pub use storage::SnippetStore;
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
