//! Condition operators and their descriptor table
//!
//! Arity, value shape and datatype support are looked up from
//! [`OPERATOR_TABLE`]; callers never re-derive them.

use super::types::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Condition operators of the filter grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "!in")]
    NotIn,
    #[serde(rename = "is_null")]
    IsNull,
    #[serde(rename = "!is_null")]
    IsNotNull,
    #[serde(rename = "has")]
    Has,
    #[serde(rename = "!has")]
    NotHas,
}

/// Number of operands after the operator token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// `[op, ["get", field]]`
    Unary,
    /// `[op, ["get", field], value]`
    Binary,
}

impl Arity {
    pub fn argument_count(&self) -> usize {
        match self {
            Self::Unary => 1,
            Self::Binary => 2,
        }
    }

    /// Array length of a condition expression, operator included
    pub fn element_count(&self) -> usize {
        self.argument_count() + 1
    }
}

/// Shape of the value operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    None,
    Scalar,
    List,
}

/// Static description of one operator
#[derive(Debug)]
pub struct OperatorSpec {
    pub operator: Operator,
    pub token: &'static str,
    pub arity: Arity,
    pub value_kind: ValueKind,
    pub supported: &'static [DataType],
}

const ALL_TYPES: &[DataType] = &[
    DataType::String,
    DataType::Integer,
    DataType::BigInt,
    DataType::Real,
    DataType::Date,
    DataType::Time,
    DataType::DateTime,
];

const ORDERED_TYPES: &[DataType] = &[
    DataType::Integer,
    DataType::BigInt,
    DataType::Real,
    DataType::Date,
    DataType::Time,
    DataType::DateTime,
];

const fn spec(
    operator: Operator,
    token: &'static str,
    arity: Arity,
    value_kind: ValueKind,
    supported: &'static [DataType],
) -> OperatorSpec {
    OperatorSpec {
        operator,
        token,
        arity,
        value_kind,
        supported,
    }
}

/// Indexed by `Operator as usize`
pub static OPERATOR_TABLE: [OperatorSpec; 12] = [
    spec(Operator::Equal, "==", Arity::Binary, ValueKind::Scalar, ALL_TYPES),
    spec(Operator::NotEqual, "!=", Arity::Binary, ValueKind::Scalar, ALL_TYPES),
    spec(Operator::GreaterThan, ">", Arity::Binary, ValueKind::Scalar, ORDERED_TYPES),
    spec(Operator::LessThan, "<", Arity::Binary, ValueKind::Scalar, ORDERED_TYPES),
    spec(Operator::GreaterThanOrEqual, ">=", Arity::Binary, ValueKind::Scalar, ORDERED_TYPES),
    spec(Operator::LessThanOrEqual, "<=", Arity::Binary, ValueKind::Scalar, ORDERED_TYPES),
    spec(Operator::In, "in", Arity::Binary, ValueKind::List, ALL_TYPES),
    spec(Operator::NotIn, "!in", Arity::Binary, ValueKind::List, ALL_TYPES),
    spec(Operator::IsNull, "is_null", Arity::Unary, ValueKind::None, ALL_TYPES),
    spec(Operator::IsNotNull, "!is_null", Arity::Unary, ValueKind::None, ALL_TYPES),
    spec(Operator::Has, "has", Arity::Unary, ValueKind::None, ALL_TYPES),
    spec(Operator::NotHas, "!has", Arity::Unary, ValueKind::None, ALL_TYPES),
];

impl Operator {
    pub fn spec(self) -> &'static OperatorSpec {
        &OPERATOR_TABLE[self as usize]
    }

    /// Parse operator from its token (exact match, case-sensitive)
    pub fn parse(token: &str) -> Option<Self> {
        OPERATOR_TABLE
            .iter()
            .find(|spec| spec.token == token)
            .map(|spec| spec.operator)
    }

    pub fn as_str(&self) -> &'static str {
        self.spec().token
    }

    pub fn arity(&self) -> Arity {
        self.spec().arity
    }

    pub fn value_kind(&self) -> ValueKind {
        self.spec().value_kind
    }

    /// True for operators that take no value (null checks and `has`)
    pub fn is_unary(&self) -> bool {
        self.arity() == Arity::Unary
    }

    pub fn supports(&self, data_type: DataType) -> bool {
        self.spec().supported.contains(&data_type)
    }

    /// Every operator, in table order
    pub fn all() -> impl Iterator<Item = Operator> {
        OPERATOR_TABLE.iter().map(|spec| spec.operator)
    }

    /// Operators usable on a field of the given type, in table order
    pub fn supported_for(data_type: DataType) -> Vec<Operator> {
        Self::all().filter(|op| op.supports(data_type)).collect()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comma separated operator tokens supported for a data type
pub fn get_supported_operations_string(data_type: DataType) -> String {
    Operator::supported_for(data_type)
        .iter()
        .map(|op| op.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
