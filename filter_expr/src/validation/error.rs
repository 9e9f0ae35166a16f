//! Error types for expression validation

use crate::config::compile_time::validation::MAX_ERROR_VALUE_LENGTH;
use crate::grammar::{json_type_name, DataType, LogicalOp, Operator};
use crate::logging::codes;
use serde_json::Value;
use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Shape and semantic validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Expression text is not JSON (E100)
    #[error("Filter expression is not valid JSON: {message}")]
    MalformedJson { message: String },

    /// Expression text over the configured size (E101)
    #[error("Filter expression is {length} bytes, maximum allowed is {limit}")]
    ExpressionTooLong { length: usize, limit: usize },

    /// Expression is not an array (E102)
    #[error("Filter expression must be an array, found {found}")]
    NotAnArray { found: String },

    /// `["all"]` / `["any"]` (E103)
    #[error("Logical group '{operator}' must contain at least one expression")]
    EmptyGroup { operator: LogicalOp },

    /// Group child that is not an array (E104)
    #[error("Element {index} of logical group '{operator}' must be an array, found {found}")]
    GroupChildNotArray {
        operator: LogicalOp,
        index: usize,
        found: String,
    },

    /// Head of a condition is not a known operator (E105)
    #[error("Unknown operator '{operator}'")]
    UnknownOperator { operator: String },

    /// Operand count does not match the operator (E106)
    #[error("Operator '{operator}' expects {expected} argument(s), found {found}")]
    WrongArity {
        operator: Operator,
        expected: usize,
        found: usize,
    },

    /// Second element is not `["get", name]` (E107)
    #[error("Operator '{operator}' expects a field reference [\"get\", <name>], found {found}")]
    InvalidFieldReference { operator: Operator, found: String },

    /// Groups nested past the configured depth (E108)
    #[error("Filter expression nesting depth {depth} exceeds maximum of {limit}")]
    NestingTooDeep { depth: usize, limit: usize },

    /// Field is not in the field list (E120)
    #[error("Unknown field '{field}'")]
    UnknownField { field: String },

    /// Operator not declared for the field's data type (E121)
    #[error("Operator '{operator}' is not supported for field '{field}' of type {data_type} (supported: {supported})")]
    UnsupportedOperator {
        operator: Operator,
        field: String,
        data_type: DataType,
        supported: String,
    },

    /// Value of the wrong JSON type (E122)
    #[error("Invalid value {value} for field '{field}' of type {data_type} with operator '{operator}': expected {expected}")]
    InvalidValueType {
        field: String,
        data_type: DataType,
        operator: Operator,
        expected: &'static str,
        value: String,
    },

    /// String value not matching the type's pattern (E123)
    #[error("Invalid value {value} for field '{field}' of type {data_type}: expected format {format}")]
    InvalidPattern {
        field: String,
        data_type: DataType,
        format: &'static str,
        value: String,
    },
}

impl ValidationError {
    /// Get the appropriate error code for this error type
    pub fn error_code(&self) -> codes::Code {
        match self {
            Self::MalformedJson { .. } => codes::validation::MALFORMED_JSON,
            Self::ExpressionTooLong { .. } => codes::validation::EXPRESSION_TOO_LONG,
            Self::NotAnArray { .. } => codes::validation::NOT_AN_ARRAY,
            Self::EmptyGroup { .. } => codes::validation::EMPTY_GROUP,
            Self::GroupChildNotArray { .. } => codes::validation::GROUP_CHILD_NOT_ARRAY,
            Self::UnknownOperator { .. } => codes::validation::UNKNOWN_OPERATOR,
            Self::WrongArity { .. } => codes::validation::WRONG_ARITY,
            Self::InvalidFieldReference { .. } => codes::validation::INVALID_FIELD_REFERENCE,
            Self::NestingTooDeep { .. } => codes::validation::NESTING_TOO_DEEP,
            Self::UnknownField { .. } => codes::validation::UNKNOWN_FIELD,
            Self::UnsupportedOperator { .. } => codes::validation::UNSUPPORTED_OPERATOR,
            Self::InvalidValueType { .. } => codes::validation::INVALID_VALUE_TYPE,
            Self::InvalidPattern { .. } => codes::validation::INVALID_VALUE_PATTERN,
        }
    }

    /// Get error type string for logging context
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "MalformedJson",
            Self::ExpressionTooLong { .. } => "ExpressionTooLong",
            Self::NotAnArray { .. } => "NotAnArray",
            Self::EmptyGroup { .. } => "EmptyGroup",
            Self::GroupChildNotArray { .. } => "GroupChildNotArray",
            Self::UnknownOperator { .. } => "UnknownOperator",
            Self::WrongArity { .. } => "WrongArity",
            Self::InvalidFieldReference { .. } => "InvalidFieldReference",
            Self::NestingTooDeep { .. } => "NestingTooDeep",
            Self::UnknownField { .. } => "UnknownField",
            Self::UnsupportedOperator { .. } => "UnsupportedOperator",
            Self::InvalidValueType { .. } => "InvalidValueType",
            Self::InvalidPattern { .. } => "InvalidPattern",
        }
    }

    /// Shape errors concern the array grammar itself; the rest are semantic
    pub fn is_shape_error(&self) -> bool {
        codes::get_category(self.error_code().as_str()) == "Shape"
    }

    // Constructor methods with bounded value rendering

    pub fn malformed_json(error: &serde_json::Error) -> Self {
        Self::MalformedJson {
            message: error.to_string(),
        }
    }

    pub fn not_an_array(found: &Value) -> Self {
        Self::NotAnArray {
            found: json_type_name(found).to_string(),
        }
    }

    pub fn group_child_not_array(operator: LogicalOp, index: usize, found: &Value) -> Self {
        Self::GroupChildNotArray {
            operator,
            index,
            found: json_type_name(found).to_string(),
        }
    }

    pub fn unknown_operator(head: Option<&Value>) -> Self {
        let operator = match head {
            Some(Value::String(token)) => truncate_string(token),
            Some(other) => describe_value(other),
            None => String::new(),
        };
        Self::UnknownOperator { operator }
    }

    pub fn wrong_arity(operator: Operator, found: usize) -> Self {
        Self::WrongArity {
            operator,
            expected: operator.arity().argument_count(),
            found,
        }
    }

    pub fn invalid_field_reference(operator: Operator, found: &Value) -> Self {
        Self::InvalidFieldReference {
            operator,
            found: describe_value(found),
        }
    }

    pub fn unknown_field(field: &str) -> Self {
        Self::UnknownField {
            field: truncate_string(field),
        }
    }

    pub fn unsupported_operator(operator: Operator, field: &str, data_type: DataType) -> Self {
        Self::UnsupportedOperator {
            operator,
            field: truncate_string(field),
            data_type,
            supported: crate::grammar::get_supported_operations_string(data_type),
        }
    }

    pub fn invalid_value_type(
        field: &str,
        data_type: DataType,
        operator: Operator,
        expected: &'static str,
        value: &Value,
    ) -> Self {
        Self::InvalidValueType {
            field: truncate_string(field),
            data_type,
            operator,
            expected,
            value: describe_value(value),
        }
    }

    pub fn invalid_pattern(
        field: &str,
        data_type: DataType,
        format: &'static str,
        value: &Value,
    ) -> Self {
        Self::InvalidPattern {
            field: truncate_string(field),
            data_type,
            format,
            value: describe_value(value),
        }
    }
}

/// Compact JSON rendering of a value, truncated for messages
pub fn describe_value(value: &Value) -> String {
    truncate_string(&value.to_string())
}

fn truncate_string(text: &str) -> String {
    if text.chars().count() <= MAX_ERROR_VALUE_LENGTH {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(MAX_ERROR_VALUE_LENGTH).collect();
    truncated.push_str("...");
    truncated
}
