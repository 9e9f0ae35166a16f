//! Shape helpers for the nested-array expression form
//!
//! ```text
//! expression := [] | group | condition
//! group      := ["all" | "any", (group | condition)+]
//! condition  := [operator, ["get", field]] | [operator, ["get", field], value]
//! ```

use super::operators::Operator;
use super::types::LogicalOp;
use serde_json::Value;

/// Head of a field reference: `["get", field]`
pub const FIELD_GETTER: &str = "get";

/// Coarse classification of an expression array, based on its head only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionHead {
    /// `[]`
    Empty,
    /// `["all" | "any", ...]`
    Group(LogicalOp),
    /// `[<known operator>, ...]`
    Condition(Operator),
    /// Anything else, including non-array values
    Unknown,
}

pub fn classify_head(expr: &Value) -> ExpressionHead {
    let Some(items) = expr.as_array() else {
        return ExpressionHead::Unknown;
    };
    let Some(head) = items.first() else {
        return ExpressionHead::Empty;
    };

    match head.as_str() {
        Some(token) => {
            if let Some(op) = LogicalOp::parse(token) {
                ExpressionHead::Group(op)
            } else if let Some(op) = Operator::parse(token) {
                ExpressionHead::Condition(op)
            } else {
                ExpressionHead::Unknown
            }
        }
        None => ExpressionHead::Unknown,
    }
}

/// Extract the field name from `["get", field]`
pub fn field_reference(value: &Value) -> Option<&str> {
    match value.as_array().map(Vec::as_slice) {
        Some([getter, name]) if getter.as_str() == Some(FIELD_GETTER) => name.as_str(),
        _ => None,
    }
}

pub fn make_field_reference(field: &str) -> Value {
    Value::Array(vec![
        Value::String(FIELD_GETTER.to_string()),
        Value::String(field.to_string()),
    ])
}

/// Build `[op, ["get", field]]` or `[op, ["get", field], value]`
///
/// The value is only emitted for binary operators; it is ignored otherwise.
pub fn condition_expression(operator: Operator, field: &str, value: Option<&Value>) -> Value {
    let mut items = vec![
        Value::String(operator.as_str().to_string()),
        make_field_reference(field),
    ];
    if !operator.is_unary() {
        items.push(value.cloned().unwrap_or(Value::Null));
    }
    Value::Array(items)
}

/// Build `[op, child...]`
pub fn group_expression(operator: LogicalOp, children: Vec<Value>) -> Value {
    let mut items = Vec::with_capacity(children.len() + 1);
    items.push(Value::String(operator.as_str().to_string()));
    items.extend(children);
    Value::Array(items)
}

/// The "no filter" sentinel
pub fn empty_expression() -> Value {
    Value::Array(Vec::new())
}

/// JSON type name used in diagnostics
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
