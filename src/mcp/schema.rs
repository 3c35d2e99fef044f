//! Declarative input/output shapes for tools
//!
//! A [`Shape`] is a flat list of named fields with an expected JSON type. It is
//! checked once per call before a handler runs, and rendered as JSON Schema for
//! `tools/list`.

use serde_json::{json, Map, Value};

use crate::error::{DemoError, Result};

/// Expected JSON type of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Object,
    Array(Box<FieldKind>),
}

impl FieldKind {
    fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldKind::String, Value::String(_)) => true,
            (FieldKind::Number, Value::Number(_)) => true,
            (FieldKind::Boolean, Value::Bool(_)) => true,
            (FieldKind::Object, Value::Object(_)) => true,
            (FieldKind::Array(item), Value::Array(items)) => items.iter().all(|v| item.matches(v)),
            _ => false,
        }
    }

    fn json_schema(&self) -> Value {
        match self {
            FieldKind::String => json!({"type": "string"}),
            FieldKind::Number => json!({"type": "number"}),
            FieldKind::Boolean => json!({"type": "boolean"}),
            FieldKind::Object => json!({"type": "object"}),
            FieldKind::Array(item) => json!({"type": "array", "items": item.json_schema()}),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Object => "object",
            FieldKind::Array(_) => "array",
        }
    }
}

/// A single named field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub description: Option<String>,
}

/// Field map describing a tool's input or structured output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    fields: Vec<Field>,
}

impl Shape {
    /// Shape with no fields; accepts any object
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a required field
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name: name.into(),
            kind,
            required: true,
            description: None,
        });
        self
    }

    /// Add an optional field
    pub fn optional(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name: name.into(),
            kind,
            required: false,
            description: None,
        });
        self
    }

    /// Describe the most recently added field
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.description = Some(description.into());
        }
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Check `value` against the shape.
    ///
    /// `null` is treated as an empty object. Fields not declared in the shape
    /// are ignored.
    pub fn validate(&self, value: &Value) -> Result<()> {
        let empty = Map::new();
        let object = match value {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                return Err(DemoError::InvalidInput(format!(
                    "expected an object, got {}",
                    json_type_name(other)
                )))
            }
        };

        for field in &self.fields {
            match object.get(&field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(DemoError::InvalidInput(format!(
                        "missing required field '{}'",
                        field.name
                    )));
                }
                None | Some(Value::Null) => {}
                Some(v) if !field.kind.matches(v) => {
                    return Err(DemoError::InvalidInput(format!(
                        "field '{}' must be a {}, got {}",
                        field.name,
                        field.kind.name(),
                        json_type_name(v)
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Render as a JSON Schema object
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            let mut schema = field.kind.json_schema();
            if let (Some(desc), Some(obj)) = (&field.description, schema.as_object_mut()) {
                obj.insert("description".to_string(), json!(desc));
            }
            properties.insert(field.name.clone(), schema);
            if field.required {
                required.push(json!(field.name));
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = Value::Array(required);
        }
        schema
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
