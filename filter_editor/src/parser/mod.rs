//! Expression to tree conversion
//!
//! The parser is lenient: it accepts anything and returns a group. Strict
//! checking is the validator's job; anything the parser cannot place is
//! dropped with a warning.

use crate::error::EditorResult;
use crate::types::{Condition, FilterItem, Group, IdGenerator};
use filter_expr::grammar::{classify_head, field_reference, ExpressionHead};
use filter_expr::{log_debug, log_warning, LogicalOp, Operator};
use serde_json::Value;

/// Build a tree from an expression, drawing ids from `ids`
///
/// Ids are assigned pre-order: a group takes its id before its children.
/// A bare top-level condition is wrapped in an implicit `all` group.
pub fn parse_filter_expression(expr: &Value, ids: &mut IdGenerator) -> Group {
    match classify_head(expr) {
        ExpressionHead::Group(operator) => parse_group(operator, expr, ids),
        ExpressionHead::Condition(operator) => {
            let mut root = Group::new(ids.next_id(), LogicalOp::All);
            match parse_condition(operator, expr, ids) {
                Some(condition) => root.insert_child(FilterItem::Condition(condition), None),
                None => log_warning!("Dropping malformed top-level condition",
                    "operator" => operator),
            }
            root
        }
        ExpressionHead::Empty => Group::new(ids.next_id(), LogicalOp::All),
        ExpressionHead::Unknown => {
            log_warning!("Unrecognised filter expression, starting from an empty group",
                "expression" => filter_expr::validation::describe_value(expr));
            Group::new(ids.next_id(), LogicalOp::All)
        }
    }
}

/// Decode JSON text and build a tree from it
pub fn parse_filter_str(text: &str, ids: &mut IdGenerator) -> EditorResult<Group> {
    if text.trim().is_empty() {
        return Ok(Group::new(ids.next_id(), LogicalOp::All));
    }
    let expr: Value = serde_json::from_str(text)?;
    Ok(parse_filter_expression(&expr, ids))
}

fn parse_group(operator: LogicalOp, expr: &Value, ids: &mut IdGenerator) -> Group {
    let mut group = Group::new(ids.next_id(), operator);
    let arguments = expr.as_array().map(|items| &items[1..]).unwrap_or(&[]);

    for (index, argument) in arguments.iter().enumerate() {
        match classify_head(argument) {
            ExpressionHead::Group(child_operator) => {
                let child = parse_group(child_operator, argument, ids);
                group.insert_child(FilterItem::Group(child), None);
            }
            ExpressionHead::Condition(child_operator) => {
                match parse_condition(child_operator, argument, ids) {
                    Some(condition) => group.insert_child(FilterItem::Condition(condition), None),
                    None => log_warning!("Skipping condition without a field reference",
                        "group" => group.id(),
                        "index" => index + 1),
                }
            }
            ExpressionHead::Empty | ExpressionHead::Unknown => {
                log_warning!("Skipping unrecognised group element",
                    "group" => group.id(),
                    "index" => index + 1,
                    "element" => filter_expr::validation::describe_value(argument));
            }
        }
    }

    log_debug!("Parsed group",
        "id" => group.id(),
        "operator" => operator,
        "children" => group.len());
    group
}

/// `None` when the second element is not a `["get", name]` reference
fn parse_condition(operator: Operator, expr: &Value, ids: &mut IdGenerator) -> Option<Condition> {
    let items = expr.as_array()?;
    let field = field_reference(items.get(1)?)?;
    let value = if operator.is_unary() {
        None
    } else {
        items.get(2).cloned()
    };
    Some(Condition::new(ids.next_id(), field, operator, value))
}
