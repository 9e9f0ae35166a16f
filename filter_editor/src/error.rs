use crate::types::{ItemType, NodeId};
use filter_expr::logging::{codes, Code};
use filter_expr::ValidationError;

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

/// Editor-level errors
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Filter JSON could not be processed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Filter is invalid: {message}")]
    InvalidState { message: String },
}

impl EditorError {
    pub fn invalid_state(message: Option<&str>) -> Self {
        Self::InvalidState {
            message: message.unwrap_or("unknown validation error").to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Validation(error) => error.error_code(),
            Self::Json(_) => codes::editor::SERIALIZATION_FAILED,
            Self::InvalidState { .. } => codes::editor::INVALID_STATE,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Validation(error) => error.error_type(),
            Self::Json(_) => "Json",
            Self::InvalidState { .. } => "InvalidState",
        }
    }
}

/// Broken tree invariants, reported by `Group::check_integrity`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("Node id {id} appears more than once")]
    DuplicateId { id: NodeId },

    #[error("Group {group_id} holds {buckets} children but orders {order}")]
    LengthMismatch {
        group_id: NodeId,
        buckets: usize,
        order: usize,
    },

    #[error("Group {group_id} orders {id} twice")]
    DuplicateOrderEntry { group_id: NodeId, id: NodeId },

    #[error("Group {group_id} orders {kind} {id} which it does not hold")]
    OrphanOrderEntry {
        group_id: NodeId,
        kind: ItemType,
        id: NodeId,
    },
}
