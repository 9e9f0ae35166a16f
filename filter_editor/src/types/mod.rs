//! Filter tree model

pub mod condition;
pub mod group;
pub mod node;
pub mod state;

pub use condition::{Condition, ConditionPatch};
pub use group::{ChildNode, FilterItem, Group};
pub use node::{ChildRef, DropPosition, IdGenerator, ItemType, NodeId};
pub use state::FilterState;
