use super::condition::Condition;
use super::node::{ChildRef, ItemType, NodeId};
use crate::error::IntegrityError;
use filter_expr::LogicalOp;
use serde::Serialize;
use std::collections::HashSet;

/// Interior node of the filter tree
///
/// Conditions and sub-groups live in per-kind buckets; `children_order`
/// records the sibling order across both. The two are kept in lockstep by
/// `insert_child` and `detach_child`, the only code paths that touch them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub(crate) id: NodeId,
    pub operator: LogicalOp,
    conditions: Vec<Condition>,
    groups: Vec<Group>,
    children_order: Vec<ChildRef>,
}

/// An owned node in transit between groups
#[derive(Debug, Clone, PartialEq)]
pub enum FilterItem {
    Condition(Condition),
    Group(Group),
}

impl FilterItem {
    pub fn id(&self) -> NodeId {
        match self {
            Self::Condition(condition) => condition.id,
            Self::Group(group) => group.id,
        }
    }

    pub fn kind(&self) -> ItemType {
        match self {
            Self::Condition(_) => ItemType::Condition,
            Self::Group(_) => ItemType::Group,
        }
    }
}

/// A borrowed child, resolved through `children_order`
#[derive(Debug, Clone, Copy)]
pub enum ChildNode<'a> {
    Condition(&'a Condition),
    Group(&'a Group),
}

impl<'a> ChildNode<'a> {
    pub fn id(&self) -> NodeId {
        match self {
            Self::Condition(condition) => condition.id,
            Self::Group(group) => group.id,
        }
    }
}

impl Group {
    pub fn new(id: NodeId, operator: LogicalOp) -> Self {
        Self {
            id,
            operator,
            conditions: Vec::new(),
            groups: Vec::new(),
            children_order: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn children_order(&self) -> &[ChildRef] {
        &self.children_order
    }

    pub fn is_empty(&self) -> bool {
        self.children_order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children_order.len()
    }

    /// Direct children in sibling order
    pub fn children(&self) -> impl Iterator<Item = ChildNode<'_>> + '_ {
        self.children_order.iter().filter_map(move |child| match child.kind {
            ItemType::Condition => self
                .conditions
                .iter()
                .find(|c| c.id == child.id)
                .map(ChildNode::Condition),
            ItemType::Group => self
                .groups
                .iter()
                .find(|g| g.id == child.id)
                .map(ChildNode::Group),
        })
    }

    /// Sibling index of a direct child
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        self.children_order.iter().position(|child| child.id == id)
    }

    /// Insert a direct child at `index` (clamped), or append when `None`
    pub fn insert_child(&mut self, item: FilterItem, index: Option<usize>) {
        let index = index
            .unwrap_or(self.children_order.len())
            .min(self.children_order.len());
        let child = match item {
            FilterItem::Condition(condition) => {
                let child = ChildRef::condition(condition.id);
                self.conditions.push(condition);
                child
            }
            FilterItem::Group(group) => {
                let child = ChildRef::group(group.id);
                self.groups.push(group);
                child
            }
        };
        self.children_order.insert(index, child);
    }

    /// Remove a direct child from both the bucket and the ordering
    pub fn detach_child(&mut self, kind: ItemType, id: NodeId) -> Option<FilterItem> {
        let item = match kind {
            ItemType::Condition => {
                let index = self.conditions.iter().position(|c| c.id == id)?;
                FilterItem::Condition(self.conditions.remove(index))
            }
            ItemType::Group => {
                let index = self.groups.iter().position(|g| g.id == id)?;
                FilterItem::Group(self.groups.remove(index))
            }
        };
        self.children_order
            .retain(|child| !(child.kind == kind && child.id == id));
        Some(item)
    }

    /// Detach a node from wherever it sits below this group
    ///
    /// Returns the id of the group it was removed from.
    pub(crate) fn detach_descendant(
        &mut self,
        kind: ItemType,
        id: NodeId,
    ) -> Option<(NodeId, FilterItem)> {
        if let Some(item) = self.detach_child(kind, id) {
            return Some((self.id, item));
        }
        self.groups
            .iter_mut()
            .find_map(|group| group.detach_descendant(kind, id))
    }

    // === Lookup ===

    /// This group or any group below it
    pub fn find_group(&self, id: NodeId) -> Option<&Group> {
        if self.id == id {
            return Some(self);
        }
        self.groups.iter().find_map(|group| group.find_group(id))
    }

    pub fn find_group_mut(&mut self, id: NodeId) -> Option<&mut Group> {
        if self.id == id {
            return Some(self);
        }
        self.groups.iter_mut().find_map(|group| group.find_group_mut(id))
    }

    pub fn find_condition(&self, id: NodeId) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.id == id)
            .or_else(|| self.groups.iter().find_map(|group| group.find_condition(id)))
    }

    pub fn find_condition_mut(&mut self, id: NodeId) -> Option<&mut Condition> {
        if let Some(index) = self.conditions.iter().position(|c| c.id == id) {
            return self.conditions.get_mut(index);
        }
        self.groups
            .iter_mut()
            .find_map(|group| group.find_condition_mut(id))
    }

    /// Group directly holding the given node
    pub fn find_parent(&self, kind: ItemType, id: NodeId) -> Option<&Group> {
        if self
            .children_order
            .iter()
            .any(|child| child.kind == kind && child.id == id)
        {
            return Some(self);
        }
        self.groups
            .iter()
            .find_map(|group| group.find_parent(kind, id))
    }

    /// Whether a node of this kind exists in the subtree
    pub fn contains(&self, kind: ItemType, id: NodeId) -> bool {
        match kind {
            ItemType::Condition => self.find_condition(id).is_some(),
            ItemType::Group => self.find_group(id).is_some(),
        }
    }

    /// Level of a group below this one, counting this group as 1
    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        if self.id == id {
            return Some(1);
        }
        self.groups
            .iter()
            .find_map(|group| group.depth_of(id))
            .map(|depth| depth + 1)
    }

    /// Number of group levels in this subtree, this group included
    pub fn height(&self) -> usize {
        1 + self.groups.iter().map(Group::height).max().unwrap_or(0)
    }

    /// Groups and conditions in this subtree, this group included
    pub fn node_count(&self) -> usize {
        1 + self.conditions.len() + self.groups.iter().map(Group::node_count).sum::<usize>()
    }

    /// Verify bucket/ordering lockstep and id uniqueness across the subtree
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        let mut seen = HashSet::new();
        self.check_integrity_inner(&mut seen)
    }

    fn check_integrity_inner(&self, seen: &mut HashSet<NodeId>) -> Result<(), IntegrityError> {
        if !seen.insert(self.id) {
            return Err(IntegrityError::DuplicateId { id: self.id });
        }

        let bucket_len = self.conditions.len() + self.groups.len();
        if bucket_len != self.children_order.len() {
            return Err(IntegrityError::LengthMismatch {
                group_id: self.id,
                buckets: bucket_len,
                order: self.children_order.len(),
            });
        }

        let mut ordered = HashSet::new();
        for child in &self.children_order {
            if !ordered.insert((child.kind, child.id)) {
                return Err(IntegrityError::DuplicateOrderEntry {
                    group_id: self.id,
                    id: child.id,
                });
            }
            let present = match child.kind {
                ItemType::Condition => self.conditions.iter().any(|c| c.id == child.id),
                ItemType::Group => self.groups.iter().any(|g| g.id == child.id),
            };
            if !present {
                return Err(IntegrityError::OrphanOrderEntry {
                    group_id: self.id,
                    kind: child.kind,
                    id: child.id,
                });
            }
        }

        for condition in &self.conditions {
            if !seen.insert(condition.id) {
                return Err(IntegrityError::DuplicateId { id: condition.id });
            }
        }
        for group in &self.groups {
            group.check_integrity_inner(seen)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use filter_expr::Operator;

    fn condition(id: NodeId) -> FilterItem {
        FilterItem::Condition(Condition::new(id, "name", Operator::IsNull, None))
    }

    fn order_ids(group: &Group) -> Vec<NodeId> {
        group.children_order().iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_insert_keeps_buckets_and_order_in_lockstep() {
        let mut root = Group::new(1, LogicalOp::All);
        root.insert_child(condition(2), None);
        root.insert_child(FilterItem::Group(Group::new(3, LogicalOp::Any)), Some(0));
        root.insert_child(condition(4), Some(1));
        root.insert_child(condition(5), Some(99));

        assert_eq!(order_ids(&root), vec![3, 4, 2, 5]);
        assert_eq!(root.conditions().len(), 3);
        assert_eq!(root.groups().len(), 1);
        assert!(root.check_integrity().is_ok());

        let resolved: Vec<NodeId> = root.children().map(|child| child.id()).collect();
        assert_eq!(resolved, vec![3, 4, 2, 5]);
    }

    #[test]
    fn test_detach_removes_from_both_places() {
        let mut root = Group::new(1, LogicalOp::All);
        root.insert_child(condition(2), None);
        root.insert_child(condition(3), None);

        assert_matches!(root.detach_child(ItemType::Condition, 2), Some(FilterItem::Condition(c)) if c.id() == 2);
        assert_eq!(order_ids(&root), vec![3]);
        assert_eq!(root.detach_child(ItemType::Group, 3), None);
        assert_eq!(root.detach_child(ItemType::Condition, 42), None);
        assert!(root.check_integrity().is_ok());
    }

    #[test]
    fn test_nested_lookup_and_depth() {
        let mut inner = Group::new(3, LogicalOp::Any);
        inner.insert_child(condition(4), None);
        let mut root = Group::new(1, LogicalOp::All);
        root.insert_child(condition(2), None);
        root.insert_child(FilterItem::Group(inner), None);

        assert!(root.find_condition(4).is_some());
        assert!(root.find_group(3).is_some());
        assert!(root.find_group(4).is_none());
        assert_eq!(root.find_parent(ItemType::Condition, 4).map(Group::id), Some(3));
        assert_eq!(root.depth_of(1), Some(1));
        assert_eq!(root.depth_of(3), Some(2));
        assert_eq!(root.height(), 2);
        assert_eq!(root.node_count(), 4);

        let (parent, item) = root.detach_descendant(ItemType::Condition, 4).unwrap();
        assert_eq!(parent, 3);
        assert_eq!(item.id(), 4);
        assert!(root.find_group(3).unwrap().is_empty());
    }

    #[test]
    fn test_integrity_detects_duplicate_ids() {
        let mut root = Group::new(1, LogicalOp::All);
        root.insert_child(condition(2), None);
        let mut inner = Group::new(3, LogicalOp::Any);
        inner.insert_child(condition(2), None);
        root.insert_child(FilterItem::Group(inner), None);

        assert_matches!(root.check_integrity(), Err(IntegrityError::DuplicateId { id: 2 }));
    }
}
