//! Tool registry and dispatcher
//!
//! Built once at startup and read-only afterwards. `invoke` is the whole
//! dispatch contract: look the tool up, validate the arguments against the
//! declared input shape, run the handler, and check the structured payload
//! against the declared output shape.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::protocol::{ToolCallResult, ToolDefinition};
use super::schema::Shape;
use crate::error::{DemoError, Result};

/// Future returned by a tool handler
pub type ToolFuture = BoxFuture<'static, ToolCallResult>;

/// Erased handler. Returns `Err` only when the arguments cannot be decoded,
/// in which case the handler body never runs.
type ToolHandler = Arc<dyn Fn(Value) -> Result<ToolFuture> + Send + Sync>;

/// Declaration of a tool: name, shapes and host metadata
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub input: Shape,
    pub output: Option<Shape>,
    pub meta: Option<Value>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: None,
            input: Shape::empty(),
            output: None,
            meta: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn input(mut self, shape: Shape) -> Self {
        self.input = shape;
        self
    }

    pub fn output(mut self, shape: Shape) -> Self {
        self.output = Some(shape);
        self
    }

    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            input_schema: self.input.to_json_schema(),
            output_schema: self.output.as_ref().map(Shape::to_json_schema),
            meta: self.meta.clone(),
        }
    }
}

struct RegisteredTool {
    spec: ToolSpec,
    handler: ToolHandler,
}

/// Name → (shape, handler) map
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler that receives the validated arguments as raw JSON
    pub fn register<F, Fut>(&mut self, spec: ToolSpec, handler: F) -> Result<()>
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolCallResult> + Send + 'static,
    {
        self.insert(
            spec,
            Arc::new(move |args: Value| -> Result<ToolFuture> { Ok(handler(args).boxed()) }),
        )
    }

    /// Register a handler whose arguments are decoded into `I` after shape
    /// validation
    pub fn register_typed<I, F, Fut>(&mut self, spec: ToolSpec, handler: F) -> Result<()>
    where
        I: DeserializeOwned + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolCallResult> + Send + 'static,
    {
        self.insert(
            spec,
            Arc::new(move |args: Value| -> Result<ToolFuture> {
                let input: I = serde_json::from_value(args)
                    .map_err(|e| DemoError::InvalidInput(e.to_string()))?;
                Ok(handler(input).boxed())
            }),
        )
    }

    fn insert(&mut self, spec: ToolSpec, handler: ToolHandler) -> Result<()> {
        if self.index.contains_key(&spec.name) {
            return Err(DemoError::DuplicateRegistration(format!(
                "tool '{}'",
                spec.name
            )));
        }
        self.index.insert(spec.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool { spec, handler });
        Ok(())
    }

    /// Dispatch a call. Unknown names and invalid arguments are errors and
    /// never reach a handler.
    pub async fn invoke(&self, name: &str, args: Value) -> Result<ToolCallResult> {
        let tool = self
            .index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| DemoError::UnknownTool(name.to_string()))?;

        let args = match args {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        tool.spec.input.validate(&args).map_err(|e| {
            tracing::debug!(tool = name, "rejected arguments: {}", e);
            e
        })?;

        tracing::debug!(tool = name, "invoking tool");
        let result = (tool.handler)(args)?.await;

        if let Some(output) = &tool.spec.output {
            if !result.is_error() {
                let structured = result.structured_content.as_ref().ok_or_else(|| {
                    DemoError::Internal(format!("tool '{name}' returned no structured content"))
                })?;
                output.validate(structured).map_err(|e| {
                    DemoError::Internal(format!("tool '{name}' output does not match shape: {e}"))
                })?;
            }
        }

        Ok(result)
    }

    /// Tool definitions in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.spec.definition()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
