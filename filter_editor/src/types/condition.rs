use super::node::NodeId;
use filter_expr::Operator;
use serde::Serialize;
use serde_json::Value;

/// Leaf node of the filter tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub(crate) id: NodeId,
    pub field: String,
    pub operator: Operator,
    /// `None` when the operator takes no value or none was entered yet
    pub value: Option<Value>,
}

impl Condition {
    pub fn new(id: NodeId, field: impl Into<String>, operator: Operator, value: Option<Value>) -> Self {
        Self {
            id,
            field: field.into(),
            operator,
            value,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Merge a partial update in place
    pub fn apply(&mut self, patch: ConditionPatch) {
        if let Some(field) = patch.field {
            self.field = field;
        }
        if let Some(operator) = patch.operator {
            self.operator = operator;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
    }
}

/// Partial update for a condition; unset members are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionPatch {
    pub field: Option<String>,
    pub operator: Option<Operator>,
    /// `Some(None)` clears the value
    pub value: Option<Option<Value>>,
}

impl ConditionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(Some(value.into()));
        self
    }

    pub fn clear_value(mut self) -> Self {
        self.value = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.field.is_none() && self.operator.is_none() && self.value.is_none()
    }
}
