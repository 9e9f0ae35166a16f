//! # Filter editor
//!
//! Editing model for nested filter expressions: a tree of conditions and
//! `all`/`any` groups that converts to and from the textual form defined in
//! `filter_expr`, plus the store driving a constructor view, a raw JSON view
//! and drag-and-drop reordering.

pub mod dnd;
pub mod error;
pub mod parser;
pub mod serializer;
pub mod store;
pub mod types;

// Re-export key types for library consumers
pub use dnd::{resolve_drop, Collision, DragEndEvent, DragItem, DropDecision, DropTarget, Rect};
pub use error::{EditorError, EditorResult, IntegrityError};
pub use parser::{parse_filter_expression, parse_filter_str};
pub use serializer::{group_to_expression, group_to_json_string};
pub use store::{ActiveTab, FilterEditorStore, MoveSource, MoveTarget};
pub use types::{
    ChildRef, Condition, ConditionPatch, DropPosition, FilterItem, FilterState, Group,
    IdGenerator, ItemType, NodeId,
};
