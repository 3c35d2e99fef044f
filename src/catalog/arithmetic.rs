//! Arithmetic and greeting tools

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::mcp::{FieldKind, Shape, ToolCallResult, ToolRegistry, ToolSpec};

#[derive(Debug, Deserialize)]
struct Operands {
    a: f64,
    b: f64,
}

#[derive(Debug, Deserialize)]
struct HelloInput {
    name: String,
}

fn operands() -> Shape {
    Shape::empty()
        .field("a", FieldKind::Number)
        .field("b", FieldKind::Number)
}

/// Integral results are emitted as JSON integers so `3 * 4` reads as `12`
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

/// Non-finite results have no JSON representation and come back as an error envelope
fn arithmetic_result(value: f64) -> ToolCallResult {
    if value.is_finite() {
        ToolCallResult::structured(&json!({"result": number(value)}))
    } else {
        ToolCallResult::error("Result is not a finite number", "overflow")
    }
}

pub fn register(tools: &mut ToolRegistry) -> Result<()> {
    tools.register_typed(
        ToolSpec::new("multiply")
            .title("Multiplication tool")
            .description("Multiply two numbers")
            .input(operands())
            .output(Shape::empty().field("result", FieldKind::Number)),
        |Operands { a, b }: Operands| async move {
            arithmetic_result(a * b)
        },
    )?;

    tools.register_typed(
        ToolSpec::new("add")
            .title("Addition Tool")
            .description("Add two numbers")
            .input(operands())
            .output(Shape::empty().field("result", FieldKind::Number)),
        |Operands { a, b }: Operands| async move {
            arithmetic_result(a + b)
        },
    )?;

    tools.register_typed(
        ToolSpec::new("hello")
            .title("Hello tool")
            .description("Just saying hello")
            .input(Shape::empty().field("name", FieldKind::String))
            .output(Shape::empty().field("result", FieldKind::String)),
        |HelloInput { name }: HelloInput| async move {
            ToolCallResult::structured(&json!({"result": format!("Hello {name}")}))
        },
    )?;

    Ok(())
}
