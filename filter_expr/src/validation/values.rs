//! Value-against-datatype checks
//!
//! Numeric types take JSON numbers, BIGINT and STRING take strings, and the
//! temporal types take strings in a fixed textual format.

use super::error::{ValidationError, ValidationResult};
use crate::grammar::{DataType, Operator, ValueKind};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

// ASCII digits only; `\d` would also match other Unicode digits
const DATE_REGEX: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$";
const TIME_REGEX: &str = r"^[0-9]{2}:[0-9]{2}:[0-9]{2}$";
const DATETIME_REGEX: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}$";

static DATE_PATTERN: OnceLock<Regex> = OnceLock::new();
static TIME_PATTERN: OnceLock<Regex> = OnceLock::new();
static DATETIME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("literal pattern"))
}

/// Pattern and human-readable format for a temporal type
fn temporal_format(data_type: DataType) -> Option<(&'static Regex, &'static str)> {
    match data_type {
        DataType::Date => Some((compiled(&DATE_PATTERN, DATE_REGEX), "YYYY-MM-DD")),
        DataType::Time => Some((compiled(&TIME_PATTERN, TIME_REGEX), "HH:MM:SS")),
        DataType::DateTime => Some((
            compiled(&DATETIME_PATTERN, DATETIME_REGEX),
            "YYYY-MM-DDTHH:MM:SS",
        )),
        _ => None,
    }
}

/// Check the value operand of a condition against the operator and field type
pub fn check_value(
    field: &str,
    data_type: DataType,
    operator: Operator,
    value: &Value,
) -> ValidationResult<()> {
    match operator.value_kind() {
        ValueKind::None => Ok(()),
        ValueKind::Scalar => check_scalar(field, data_type, operator, value),
        ValueKind::List => {
            let items = value.as_array().ok_or_else(|| {
                ValidationError::invalid_value_type(field, data_type, operator, "array", value)
            })?;
            items
                .iter()
                .try_for_each(|item| check_scalar(field, data_type, operator, item))
        }
    }
}

fn check_scalar(
    field: &str,
    data_type: DataType,
    operator: Operator,
    value: &Value,
) -> ValidationResult<()> {
    let expected = match data_type {
        DataType::Integer | DataType::Real => "number",
        DataType::String | DataType::BigInt => "string",
        DataType::Date | DataType::Time | DataType::DateTime => "string",
    };

    let type_matches = match expected {
        "number" => value.is_number(),
        _ => value.is_string(),
    };
    if !type_matches {
        return Err(ValidationError::invalid_value_type(
            field, data_type, operator, expected, value,
        ));
    }

    if let (Some((pattern, format)), Some(text)) = (temporal_format(data_type), value.as_str()) {
        if !pattern.is_match(text) {
            return Err(ValidationError::invalid_pattern(
                field, data_type, format, value,
            ));
        }
    }

    Ok(())
}
