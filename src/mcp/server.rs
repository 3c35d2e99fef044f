//! JSON-RPC method routing over the tool and resource registries

use serde_json::{json, Value};

use super::protocol::{codes, methods, InitializeResult, McpRequest, McpResponse};
use super::registry::ToolRegistry;
use super::resources::ResourceRegistry;

/// Protocol front door shared by every session
pub struct McpServer {
    tools: ToolRegistry,
    resources: ResourceRegistry,
}

impl McpServer {
    pub fn new(tools: ToolRegistry, resources: ResourceRegistry) -> Self {
        Self { tools, resources }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    /// Handle one message. Notifications yield `None`.
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        // Notifications are never answered, not even with an error
        if request.is_notification() {
            match request.method.as_str() {
                _ if request.jsonrpc != "2.0" => {
                    tracing::debug!(jsonrpc = %request.jsonrpc, "ignoring malformed notification");
                }
                methods::INITIALIZED | methods::CANCELLED => {
                    tracing::debug!(method = %request.method, "notification received");
                }
                other => tracing::debug!(method = other, "ignoring unknown notification"),
            }
            return None;
        }

        if request.jsonrpc != "2.0" {
            return Some(McpResponse::error(
                request.id,
                codes::INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            ));
        }

        let id = request.id;
        let params = request.params;
        let response = match request.method.as_str() {
            methods::INITIALIZE => {
                let requested = params.get("protocolVersion").and_then(|v| v.as_str());
                let result = InitializeResult::negotiated(requested);
                McpResponse::success(id, json!(result))
            }
            methods::PING => McpResponse::success(id, json!({})),
            methods::LIST_TOOLS => {
                McpResponse::success(id, json!({"tools": self.tools.definitions()}))
            }
            methods::CALL_TOOL => {
                let Some(name) = params.get("name").and_then(|v| v.as_str()) else {
                    return Some(McpResponse::error(
                        id,
                        codes::INVALID_PARAMS,
                        "Missing tool name".to_string(),
                    ));
                };
                let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

                match self.tools.invoke(name, arguments).await {
                    Ok(result) => McpResponse::success(id, json!(result)),
                    Err(e) if e.is_dispatch_error() => {
                        tracing::debug!(tool = name, "tool call rejected: {}", e);
                        McpResponse::from_error(id, e)
                    }
                    Err(e) => {
                        tracing::warn!(tool = name, "tool call failed: {}", e);
                        McpResponse::from_error(id, e)
                    }
                }
            }
            methods::LIST_RESOURCES => {
                McpResponse::success(id, json!({"resources": self.resources.list()}))
            }
            methods::LIST_RESOURCE_TEMPLATES => McpResponse::success(
                id,
                json!({"resourceTemplates": self.resources.list_templates()}),
            ),
            methods::READ_RESOURCE => {
                let Some(uri) = params.get("uri").and_then(|v| v.as_str()) else {
                    return Some(McpResponse::error(
                        id,
                        codes::INVALID_PARAMS,
                        "Missing resource uri".to_string(),
                    ));
                };
                match self.resources.resolve(uri) {
                    Ok(contents) => McpResponse::success(id, json!({"contents": contents})),
                    Err(e) => McpResponse::from_error(id, e),
                }
            }
            _ => McpResponse::error(
                id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        Some(response)
    }
}
