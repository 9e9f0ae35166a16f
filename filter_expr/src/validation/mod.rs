//! Expression validation against a field list
//!
//! Validation is all-or-nothing: the first invalid sub-expression fails the
//! whole call.

pub mod error;
pub mod values;

pub use error::{describe_value, ValidationError, ValidationResult};

use crate::config::compile_time::validation::{MAX_EXPRESSION_LENGTH, MAX_NESTING_DEPTH};
use crate::grammar::{
    classify_head, field_reference, find_field, ExpressionHead, FieldDef, LogicalOp, Operator,
};
use crate::logging::codes;
use crate::{log_debug, log_error};
use serde_json::Value;

/// Validate an expression value
pub fn validate(expr: &Value, fields: &[FieldDef]) -> ValidationResult<()> {
    let result = validate_expression(expr, fields, 0);

    if let Err(error) = &result {
        log_error!(error.error_code(), "Filter expression rejected",
            "error_type" => error.error_type(),
            "reason" => error);
    }

    result
}

/// Decode and validate expression text, returning the decoded value
pub fn validate_str(text: &str, fields: &[FieldDef]) -> ValidationResult<Value> {
    if text.len() > MAX_EXPRESSION_LENGTH {
        let error = ValidationError::ExpressionTooLong {
            length: text.len(),
            limit: MAX_EXPRESSION_LENGTH,
        };
        log_error!(error.error_code(), "Filter expression rejected",
            "error_type" => error.error_type(),
            "reason" => &error);
        return Err(error);
    }

    let expr: Value = serde_json::from_str(text).map_err(|e| {
        let error = ValidationError::malformed_json(&e);
        log_error!(error.error_code(), "Filter expression rejected",
            "error_type" => error.error_type(),
            "reason" => &error);
        error
    })?;

    validate(&expr, fields)?;
    Ok(expr)
}

/// `depth` is the number of enclosing groups
fn validate_expression(expr: &Value, fields: &[FieldDef], depth: usize) -> ValidationResult<()> {
    let items = expr
        .as_array()
        .ok_or_else(|| ValidationError::not_an_array(expr))?;

    match classify_head(expr) {
        ExpressionHead::Empty => Ok(()),
        ExpressionHead::Group(operator) => validate_group(operator, &items[1..], fields, depth + 1),
        ExpressionHead::Condition(operator) => validate_condition(operator, &items[1..], fields),
        ExpressionHead::Unknown => Err(ValidationError::unknown_operator(items.first())),
    }
}

fn validate_group(
    operator: LogicalOp,
    children: &[Value],
    fields: &[FieldDef],
    depth: usize,
) -> ValidationResult<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ValidationError::NestingTooDeep {
            depth,
            limit: MAX_NESTING_DEPTH,
        });
    }

    if children.is_empty() {
        return Err(ValidationError::EmptyGroup { operator });
    }

    log_debug!("Validating logical group",
        "operator" => operator,
        "children" => children.len(),
        "depth" => depth);

    for (index, child) in children.iter().enumerate() {
        if !child.is_array() {
            return Err(ValidationError::group_child_not_array(operator, index + 1, child));
        }
        validate_expression(child, fields, depth)?;
    }

    Ok(())
}

fn validate_condition(
    operator: Operator,
    arguments: &[Value],
    fields: &[FieldDef],
) -> ValidationResult<()> {
    let arity = operator.arity();
    if arguments.len() != arity.argument_count() {
        return Err(ValidationError::wrong_arity(operator, arguments.len()));
    }

    let reference = &arguments[0];
    let field_name = field_reference(reference)
        .ok_or_else(|| ValidationError::invalid_field_reference(operator, reference))?;

    let field = find_field(fields, field_name)
        .ok_or_else(|| ValidationError::unknown_field(field_name))?;

    if !operator.supports(field.datatype) {
        return Err(ValidationError::unsupported_operator(
            operator,
            field_name,
            field.datatype,
        ));
    }

    if let Some(value) = arguments.get(1) {
        values::check_value(field_name, field.datatype, operator, value)?;
    }

    Ok(())
}

/// Validate and log success; convenience for callers that only need a verdict
pub fn is_valid(expr: &Value, fields: &[FieldDef]) -> bool {
    match validate(expr, fields) {
        Ok(()) => {
            crate::log_success!(codes::success::EXPRESSION_VALIDATED, "Filter expression accepted");
            true
        }
        Err(_) => false,
    }
}
