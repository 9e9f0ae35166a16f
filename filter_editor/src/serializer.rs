//! Tree to expression conversion
//!
//! Incomplete conditions and groups left empty by them are elided, so a
//! half-edited tree always serializes to something the validator can judge.

use crate::error::EditorResult;
use crate::types::{ChildNode, Condition, Group};
use filter_expr::grammar::{condition_expression, group_expression};
use serde_json::Value;

/// Serialize a group; `None` means no filter
pub fn group_to_expression(group: &Group) -> Option<Value> {
    let children: Vec<Value> = group
        .children()
        .filter_map(|child| match child {
            ChildNode::Condition(condition) => condition_to_expression(condition),
            ChildNode::Group(group) => group_to_expression(group),
        })
        .collect();

    if children.is_empty() {
        None
    } else {
        Some(group_expression(group.operator, children))
    }
}

/// `None` for a condition that is not complete enough to emit
pub fn condition_to_expression(condition: &Condition) -> Option<Value> {
    if condition.field.is_empty() {
        return None;
    }
    if condition.operator.is_unary() {
        return Some(condition_expression(condition.operator, &condition.field, None));
    }
    match &condition.value {
        None | Some(Value::Null) => None,
        Some(value) => Some(condition_expression(
            condition.operator,
            &condition.field,
            Some(value),
        )),
    }
}

/// Render an expression as JSON text
pub fn expression_to_string(expr: &Value, pretty: bool) -> EditorResult<String> {
    let text = if pretty {
        serde_json::to_string_pretty(expr)?
    } else {
        serde_json::to_string(expr)?
    };
    Ok(text)
}

/// Serialize a group to compact JSON text; `None` means no filter
pub fn group_to_json_string(group: &Group) -> EditorResult<Option<String>> {
    group_to_expression(group)
        .map(|expr| expression_to_string(&expr, false))
        .transpose()
}
