//! Error types for the demo server

use thiserror::Error;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, DemoError>;

/// Main error type for the demo server
#[derive(Error, Debug)]
pub enum DemoError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Tool not found: {0}")]
    UnknownTool(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Duplicate registration: {0}")]
    DuplicateRegistration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DemoError {
    /// Get error code for MCP protocol
    pub fn code(&self) -> i64 {
        match self {
            DemoError::UnknownTool(_) => -32602,
            DemoError::InvalidInput(_) => -32602,
            DemoError::ResourceNotFound(_) => -32002,
            DemoError::Serialization(_) => -32700,
            _ => -32603,
        }
    }

    /// Short machine-readable kind, attached to error envelopes
    pub fn kind(&self) -> &'static str {
        match self {
            DemoError::Storage(_) | DemoError::Io(_) => "storage",
            DemoError::UnknownTool(_) => "unknown_tool",
            DemoError::InvalidInput(_) => "invalid_input",
            DemoError::ResourceNotFound(_) => "resource_not_found",
            DemoError::DuplicateRegistration(_) => "duplicate_registration",
            DemoError::Serialization(_) => "serialization",
            DemoError::Config(_) => "config",
            DemoError::Internal(_) => "internal",
        }
    }

    /// Dispatch-level errors never reach a handler
    pub fn is_dispatch_error(&self) -> bool {
        matches!(self, DemoError::UnknownTool(_) | DemoError::InvalidInput(_))
    }
}
