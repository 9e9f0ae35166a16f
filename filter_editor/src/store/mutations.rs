//! Structural edits of the filter tree

use super::FilterEditorStore;
use crate::types::{Condition, ConditionPatch, DropPosition, FilterItem, Group, ItemType, NodeId};
use filter_expr::config::compile_time::editor::MAX_TREE_NODES;
use filter_expr::logging::codes;
use filter_expr::{log_debug, log_error, log_success, log_warning, LogicalOp, Operator};

/// Where a moved item currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSource {
    pub id: NodeId,
    pub group_id: NodeId,
}

/// Where a moved item should go
///
/// `id` is the sibling to insert next to; `None` places the item at the
/// start (`Before`) or end (`After`) of `group_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTarget {
    pub id: Option<NodeId>,
    pub group_id: NodeId,
}

impl FilterEditorStore {
    /// Append a condition on the first field with `==` and the type's default value
    pub fn add_condition(&mut self, group_id: NodeId) -> Option<NodeId> {
        if !self.has_room() {
            return None;
        }

        let (field, value) = match self.fields.first() {
            Some(field) => (field.key.clone(), Some(field.datatype.default_value())),
            None => (String::new(), None),
        };

        let Some(group) = self.state.root_group.find_group_mut(group_id) else {
            log_warning!("Cannot add condition to missing group", "group" => group_id);
            return None;
        };
        let id = self.ids.next_id();
        group.insert_child(
            FilterItem::Condition(Condition::new(id, field, Operator::Equal, value)),
            None,
        );

        self.scroll_target = Some(id);
        self.after_mutation("add_condition", id);
        Some(id)
    }

    /// Append an empty sub-group; refused past the preferred nesting depth
    pub fn add_group(&mut self, parent_id: NodeId, operator: LogicalOp) -> Option<NodeId> {
        if !self.has_room() {
            return None;
        }

        let Some(parent_depth) = self.state.root_group.depth_of(parent_id) else {
            log_warning!("Cannot add group to missing parent", "parent" => parent_id);
            return None;
        };
        if parent_depth >= self.preferences.max_nesting_depth {
            log_warning!("Group nesting limit reached",
                "parent" => parent_id,
                "limit" => self.preferences.max_nesting_depth);
            return None;
        }

        let id = self.ids.next_id();
        let parent = self.state.root_group.find_group_mut(parent_id)?;
        parent.insert_child(FilterItem::Group(Group::new(id, operator)), None);

        self.after_mutation("add_group", id);
        Some(id)
    }

    pub fn update_condition(&mut self, id: NodeId, patch: ConditionPatch) -> bool {
        let Some(condition) = self.state.root_group.find_condition_mut(id) else {
            log_warning!("Cannot update missing condition", "id" => id);
            return false;
        };
        condition.apply(patch);
        self.after_mutation("update_condition", id);
        true
    }

    pub fn update_group_operator(&mut self, id: NodeId, operator: LogicalOp) -> bool {
        let Some(group) = self.state.root_group.find_group_mut(id) else {
            log_warning!("Cannot update missing group", "id" => id);
            return false;
        };
        group.operator = operator;
        self.after_mutation("update_group_operator", id);
        true
    }

    pub fn delete_condition(&mut self, id: NodeId) -> bool {
        if self
            .state
            .root_group
            .detach_descendant(ItemType::Condition, id)
            .is_none()
        {
            log_warning!("Cannot delete missing condition", "id" => id);
            return false;
        }
        self.after_mutation("delete_condition", id);
        true
    }

    /// Remove a group and everything below it; the root cannot be deleted
    pub fn delete_group(&mut self, id: NodeId) -> bool {
        if id == self.root_id() {
            log_error!(codes::editor::INVALID_STATE, "Refusing to delete the root group",
                "id" => id);
            return false;
        }
        if self
            .state
            .root_group
            .detach_descendant(ItemType::Group, id)
            .is_none()
        {
            log_warning!("Cannot delete missing group", "id" => id);
            return false;
        }
        self.after_mutation("delete_group", id);
        true
    }

    /// Move a condition before `anchor`, or to the end of the group
    pub fn move_condition_to_group(
        &mut self,
        id: NodeId,
        target_group_id: NodeId,
        anchor: Option<NodeId>,
    ) -> bool {
        self.relocate(ItemType::Condition, id, target_group_id, anchor, anchor_position(anchor))
    }

    /// Move a group before `anchor`, or to the end of the target group
    pub fn move_group_to_group(
        &mut self,
        id: NodeId,
        target_group_id: NodeId,
        anchor: Option<NodeId>,
    ) -> bool {
        self.relocate(ItemType::Group, id, target_group_id, anchor, anchor_position(anchor))
    }

    /// Remove-then-insert primitive behind drag and drop
    pub fn move_filter_item(
        &mut self,
        source: MoveSource,
        target: MoveTarget,
        item_type: ItemType,
        position: DropPosition,
    ) -> bool {
        if target.id == Some(source.id) {
            return false;
        }

        let origin = self
            .state
            .root_group
            .find_parent(item_type, source.id)
            .map(Group::id);
        if origin.is_some_and(|origin| origin != source.group_id) {
            log_debug!("Drag source group is stale, using the tree",
                "id" => source.id,
                "reported" => source.group_id);
        }

        self.relocate(item_type, source.id, target.group_id, target.id, position)
    }

    /// Reset to a fresh empty root
    pub fn clear(&mut self) {
        let root = self.fresh_root();
        let id = root.id();
        self.replace_root(root);
        self.json_value.clear();
        self.after_mutation("clear", id);
    }

    fn has_room(&self) -> bool {
        let nodes = self.state.root_group.node_count();
        if nodes >= MAX_TREE_NODES {
            log_warning!("Filter tree is full", "nodes" => nodes, "limit" => MAX_TREE_NODES);
            return false;
        }
        true
    }

    /// Checks every precondition before detaching so a refused move leaves
    /// the tree untouched
    fn relocate(
        &mut self,
        kind: ItemType,
        id: NodeId,
        target_group_id: NodeId,
        anchor: Option<NodeId>,
        position: DropPosition,
    ) -> bool {
        if anchor == Some(id) {
            return false;
        }
        if !self.can_relocate(kind, id, target_group_id) {
            return false;
        }

        let Some((origin, item)) = self.state.root_group.detach_descendant(kind, id) else {
            return false;
        };
        let Some(target) = self.state.root_group.find_group_mut(target_group_id) else {
            log_error!(codes::system::INTERNAL_ERROR, "Move target vanished after detach",
                "id" => id,
                "target" => target_group_id);
            if let Some(parent) = self.state.root_group.find_group_mut(origin) {
                parent.insert_child(item, None);
            }
            return false;
        };

        let index = match (anchor.and_then(|a| target.position_of(a)), position) {
            (Some(index), DropPosition::Before) => Some(index),
            (Some(index), DropPosition::After) => Some(index + 1),
            (None, DropPosition::Before) if anchor.is_none() => Some(0),
            (None, _) => None,
        };
        if let (Some(anchor), None) = (anchor, index) {
            log_debug!("Anchor is not in the target group, appending",
                "anchor" => anchor,
                "group" => target_group_id);
        }
        target.insert_child(item, index);

        log_success!(codes::success::ITEM_MOVED, "Filter item moved",
            "kind" => kind,
            "id" => id,
            "from" => origin,
            "to" => target_group_id,
            "position" => position);
        self.after_mutation("move", id);
        true
    }

    fn can_relocate(&self, kind: ItemType, id: NodeId, target_group_id: NodeId) -> bool {
        let root = &self.state.root_group;

        let Some(target) = root.find_group(target_group_id) else {
            log_warning!("Move target group does not exist", "group" => target_group_id);
            return false;
        };

        match kind {
            ItemType::Condition => {
                if root.find_condition(id).is_none() {
                    log_warning!("Cannot move missing condition", "id" => id);
                    return false;
                }
            }
            ItemType::Group => {
                if id == root.id() {
                    log_warning!("The root group cannot be moved", "id" => id);
                    return false;
                }
                let Some(moved) = root.find_group(id) else {
                    log_warning!("Cannot move missing group", "id" => id);
                    return false;
                };
                if moved.find_group(target.id()).is_some() {
                    log_warning!("A group cannot be moved into itself",
                        "id" => id,
                        "target" => target_group_id);
                    return false;
                }
                let target_depth = root.depth_of(target_group_id).unwrap_or(1);
                if target_depth + moved.height() > self.preferences.max_nesting_depth {
                    log_warning!("Move would exceed the group nesting limit",
                        "id" => id,
                        "target" => target_group_id,
                        "limit" => self.preferences.max_nesting_depth);
                    return false;
                }
            }
        }
        true
    }
}

/// `Before` an explicit anchor, otherwise append
fn anchor_position(anchor: Option<NodeId>) -> DropPosition {
    match anchor {
        Some(_) => DropPosition::Before,
        None => DropPosition::After,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChildRef;
    use filter_expr::{DataType, FieldDef};
    use serde_json::json;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::new("population", DataType::Integer),
            FieldDef::new("name", DataType::String),
        ]
    }

    fn order(store: &FilterEditorStore, group_id: NodeId) -> Vec<NodeId> {
        store
            .find_group(group_id)
            .unwrap()
            .children_order()
            .iter()
            .map(|child| child.id)
            .collect()
    }

    #[test]
    fn test_add_condition_uses_first_field_defaults() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), None);
        let root = store.root_id();
        let id = store.add_condition(root).unwrap();

        let condition = store.find_condition(id).unwrap();
        assert_eq!(condition.field, "population");
        assert_eq!(condition.operator, Operator::Equal);
        assert_eq!(condition.value, Some(json!(0)));
        assert_eq!(store.take_scroll_target(), Some(id));
        assert_eq!(store.take_scroll_target(), None);
        assert!(store.is_valid());
        assert_eq!(store.add_condition(999), None);
    }

    #[test]
    fn test_add_condition_without_fields() {
        let mut store = FilterEditorStore::new(Vec::new(), None);
        let id = store.add_condition(store.root_id()).unwrap();
        assert_eq!(store.find_condition(id).unwrap().field, "");
        assert!(store.is_valid());
        assert_eq!(store.to_json_string().unwrap(), None);
    }

    #[test]
    fn test_add_group_respects_nesting_preference() {
        let preferences = filter_expr::config::EditorPreferences {
            max_nesting_depth: 2,
            ..Default::default()
        };
        let mut store = FilterEditorStore::with_preferences(fields(), None, preferences);
        let child = store.add_group(store.root_id(), LogicalOp::Any).unwrap();
        assert_eq!(store.find_group(child).unwrap().operator, LogicalOp::Any);
        assert_eq!(store.add_group(child, LogicalOp::All), None);
        assert_eq!(store.add_group(12345, LogicalOp::All), None);
    }

    #[test]
    fn test_full_tree_refuses_new_nodes() {
        let mut store = FilterEditorStore::new(fields(), None);
        let root = store.root_id();
        while store.root_group().node_count() < MAX_TREE_NODES - 1 {
            let id = store.ids.next_id();
            store.state.root_group.insert_child(
                FilterItem::Condition(Condition::new(id, "population", Operator::IsNull, None)),
                None,
            );
        }

        assert!(store.add_condition(root).is_some());
        assert_eq!(store.root_group().node_count(), MAX_TREE_NODES);
        assert_eq!(store.add_condition(root), None);
        assert_eq!(store.add_group(root, LogicalOp::Any), None);
        assert_eq!(store.root_group().node_count(), MAX_TREE_NODES);
    }

    #[test]
    fn test_group_move_respects_nesting_preference() {
        init_logging();
        let preferences = filter_expr::config::EditorPreferences {
            max_nesting_depth: 3,
            ..Default::default()
        };
        let mut store = FilterEditorStore::with_preferences(fields(), None, preferences);
        let root = store.root_id();
        let left = store.add_group(root, LogicalOp::All).unwrap();
        let right = store.add_group(root, LogicalOp::Any).unwrap();
        let leaf = store.add_group(right, LogicalOp::All).unwrap();
        let before = store.state().clone();

        // right has height 2, so it would reach level 4 inside left
        assert!(!store.move_group_to_group(right, left, None));
        assert_eq!(store.state(), &before);

        assert!(store.move_group_to_group(leaf, left, None));
        assert_eq!(store.root_group().depth_of(leaf), Some(3));
        assert!(store.root_group().check_integrity().is_ok());
    }

    #[test]
    fn test_update_and_delete() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), None);
        let root = store.root_id();
        let group = store.add_group(root, LogicalOp::All).unwrap();
        let id = store.add_condition(group).unwrap();

        assert!(store.update_condition(id, ConditionPatch::new().operator(Operator::GreaterThan).value(10)));
        assert!(store.update_group_operator(group, LogicalOp::Any));
        assert_eq!(
            store.to_filter_expression().unwrap(),
            Some(json!(["all", ["any", [">", ["get", "population"], 10]]]))
        );

        assert!(!store.update_condition(999, ConditionPatch::new()));
        assert!(!store.update_group_operator(999, LogicalOp::Any));
        assert!(store.delete_condition(id));
        assert!(!store.delete_condition(id));
        assert!(store.delete_group(group));
        assert!(store.root_group().is_empty());
    }

    #[test]
    fn test_root_cannot_be_deleted() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), None);
        let root = store.root_id();
        store.add_condition(root);
        let before = store.state().clone();
        assert!(!store.delete_group(root));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_move_condition_between_groups() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), None);
        let root = store.root_id();
        let a = store.add_condition(root).unwrap();
        let b = store.add_condition(root).unwrap();
        let group = store.add_group(root, LogicalOp::Any).unwrap();
        let c = store.add_condition(group).unwrap();

        assert!(store.move_condition_to_group(a, group, Some(c)));
        assert_eq!(order(&store, group), vec![a, c]);
        assert_eq!(order(&store, root), vec![b, group]);

        assert!(store.move_condition_to_group(c, root, None));
        assert_eq!(order(&store, root), vec![b, group, c]);
        assert!(store.root_group().check_integrity().is_ok());

        assert!(!store.move_condition_to_group(999, root, None));
        assert!(!store.move_condition_to_group(b, 999, None));
    }

    #[test]
    fn test_group_cannot_move_into_itself_or_descendants() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), None);
        let root = store.root_id();
        let outer = store.add_group(root, LogicalOp::All).unwrap();
        let inner = store.add_group(outer, LogicalOp::Any).unwrap();
        let before = store.state().clone();

        assert!(!store.move_group_to_group(outer, outer, None));
        assert!(!store.move_group_to_group(outer, inner, None));
        assert!(!store.move_group_to_group(root, outer, None));
        assert_eq!(store.state(), &before);

        assert!(store.move_group_to_group(inner, root, Some(outer)));
        assert_eq!(
            store.root_group().children_order(),
            &[ChildRef::group(inner), ChildRef::group(outer)]
        );
    }

    #[test]
    fn test_move_filter_item_positions() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), None);
        let root = store.root_id();
        let a = store.add_condition(root).unwrap();
        let b = store.add_condition(root).unwrap();
        let c = store.add_condition(root).unwrap();

        let source = MoveSource { id: a, group_id: root };
        assert!(store.move_filter_item(
            source,
            MoveTarget { id: Some(c), group_id: root },
            ItemType::Condition,
            DropPosition::After,
        ));
        assert_eq!(order(&store, root), vec![b, c, a]);

        assert!(store.move_filter_item(
            source,
            MoveTarget { id: None, group_id: root },
            ItemType::Condition,
            DropPosition::Before,
        ));
        assert_eq!(order(&store, root), vec![a, b, c]);

        let before = store.state().clone();
        assert!(!store.move_filter_item(
            source,
            MoveTarget { id: Some(a), group_id: root },
            ItemType::Condition,
            DropPosition::After,
        ));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_clear_keeps_the_root_id() {
        let mut store = FilterEditorStore::new(fields(), None);
        let root = store.root_id();
        store.add_condition(root);
        store.clear();
        assert_eq!(store.root_id(), root);
        assert!(store.add_condition(root).is_some());
        store.clear();
        assert!(store.root_group().is_empty());
        assert_eq!(store.to_json_string().unwrap(), None);
    }
}
