//! Storage for the demo server
//!
//! A single JSON document on disk holds every snippet; there is no database.

mod snippets;

pub use snippets::SnippetStore;
