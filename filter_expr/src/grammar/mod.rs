pub mod expression;
pub mod operators;
pub mod types;

pub use expression::{
    classify_head, condition_expression, empty_expression, field_reference, group_expression,
    json_type_name, make_field_reference, ExpressionHead, FIELD_GETTER,
};
pub use operators::{
    get_supported_operations_string, Arity, Operator, OperatorSpec, ValueKind, OPERATOR_TABLE,
};
pub use types::{find_field, DataType, FieldDef, LogicalOp};
