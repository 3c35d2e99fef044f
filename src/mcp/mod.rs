//! MCP (Model Context Protocol) server implementation
//!
//! JSON-RPC method routing plus the tool and resource registries.

pub mod protocol;
pub mod registry;
pub mod resources;
pub mod schema;
pub mod server;

pub use protocol::{
    methods, InitializeResult, McpRequest, McpResponse, ResourceContent, ToolCallResult,
    ToolDefinition,
};
pub use registry::{ToolRegistry, ToolSpec};
pub use resources::{ResourceMeta, ResourceRegistry, UriParams, UriTemplate};
pub use schema::{FieldKind, Shape};
pub use server::McpServer;
