use super::group::Group;
use super::node::NodeId;
use serde::Serialize;

/// The edited filter: a single root group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterState {
    pub root_group: Group,
}

impl FilterState {
    pub fn new(root_group: Group) -> Self {
        Self { root_group }
    }

    pub fn root_id(&self) -> NodeId {
        self.root_group.id()
    }
}
