//! Drag-and-drop reconciliation
//!
//! Turns a drag-end event (ids plus screen geometry) into a single
//! "insert into group G next to sibling S" decision and applies it through
//! `FilterEditorStore::move_filter_item`.

use crate::store::{FilterEditorStore, MoveSource, MoveTarget};
use crate::types::{DropPosition, Group, ItemType, NodeId};
use filter_expr::log_debug;
use serde::{Deserialize, Serialize};

/// Screen-space rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn mid_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// The dragged item and the group it was dragged from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragItem {
    pub id: NodeId,
    pub item_type: ItemType,
    pub group_id: NodeId,
}

/// The node under the pointer; `group_id` is the group holding it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropTarget {
    pub id: NodeId,
    pub item_type: ItemType,
    pub group_id: NodeId,
    pub rect: Rect,
}

/// A node whose rectangle intersected the dragged one at drop time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    pub id: NodeId,
    pub item_type: ItemType,
    pub group_id: NodeId,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragEndEvent {
    pub active: DragItem,
    /// Translated rectangle of the dragged item, if the view reported one
    pub active_rect: Option<Rect>,
    pub over: Option<DropTarget>,
    #[serde(default)]
    pub collisions: Vec<Collision>,
}

/// Where the dragged item goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropDecision {
    pub target_group_id: NodeId,
    /// `None` means the start (`Before`) or end (`After`) of the group
    pub anchor_item_id: Option<NodeId>,
    pub position: DropPosition,
}

/// Decide where a drop lands; `None` when nothing should move
pub fn resolve_drop(event: &DragEndEvent, root: &Group) -> Option<DropDecision> {
    let over = event.over.as_ref()?;
    if over.id == event.active.id {
        return None;
    }

    // Without a dragged rectangle the target's own midpoint is used, which
    // resolves to `After`
    let dragged_mid = event
        .active_rect
        .map(|rect| rect.mid_y())
        .unwrap_or_else(|| over.rect.mid_y());

    match over.item_type {
        ItemType::Condition => Some(DropDecision {
            target_group_id: over.group_id,
            anchor_item_id: Some(over.id),
            position: midpoint_position(dragged_mid, &over.rect),
        }),
        ItemType::Group => {
            let group = root.find_group(over.id)?;
            let mut candidates: Vec<(usize, &Collision)> = event
                .collisions
                .iter()
                .filter(|c| c.group_id == over.id && c.id != event.active.id && c.id != over.id)
                .filter_map(|c| group.position_of(c.id).map(|index| (index, c)))
                .collect();
            candidates.sort_by_key(|(index, _)| *index);

            let decision = match candidates.as_slice() {
                [] => DropDecision {
                    target_group_id: over.id,
                    anchor_item_id: None,
                    position: midpoint_position(dragged_mid, &over.rect),
                },
                [(_, only)] => DropDecision {
                    target_group_id: over.id,
                    anchor_item_id: Some(only.id),
                    position: midpoint_position(dragged_mid, &only.rect),
                },
                [(_, first), (_, _)] => DropDecision {
                    target_group_id: over.id,
                    anchor_item_id: Some(first.id),
                    position: DropPosition::After,
                },
                _ => DropDecision {
                    target_group_id: over.id,
                    anchor_item_id: None,
                    position: DropPosition::After,
                },
            };

            log_debug!("Resolved group drop",
                "group" => over.id,
                "candidates" => candidates.len(),
                "position" => decision.position);
            Some(decision)
        }
    }
}

fn midpoint_position(dragged_mid: f64, target: &Rect) -> DropPosition {
    if dragged_mid < target.mid_y() {
        DropPosition::Before
    } else {
        DropPosition::After
    }
}

impl FilterEditorStore {
    /// Apply a drag-end event; returns whether the tree changed
    pub fn handle_drag_end(&mut self, event: &DragEndEvent) -> bool {
        let Some(decision) = resolve_drop(event, self.root_group()) else {
            return false;
        };

        self.move_filter_item(
            MoveSource {
                id: event.active.id,
                group_id: event.active.group_id,
            },
            MoveTarget {
                id: decision.anchor_item_id,
                group_id: decision.target_group_id,
            },
            event.active.item_type,
            decision.position,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Condition, FilterItem};
    use filter_expr::{LogicalOp, Operator};

    // root(1): c2, g3(c4, c5, c6), c7
    fn tree() -> Group {
        let condition = |id| FilterItem::Condition(Condition::new(id, "name", Operator::Has, None));
        let mut inner = Group::new(3, LogicalOp::Any);
        for id in [4, 5, 6] {
            inner.insert_child(condition(id), None);
        }
        let mut root = Group::new(1, LogicalOp::All);
        root.insert_child(condition(2), None);
        root.insert_child(FilterItem::Group(inner), None);
        root.insert_child(condition(7), None);
        root
    }

    fn row(index: f64) -> Rect {
        Rect::new(index * 40.0, 0.0, 300.0, 40.0)
    }

    fn drag(id: NodeId, group_id: NodeId, rect: Option<Rect>) -> DragEndEvent {
        DragEndEvent {
            active: DragItem {
                id,
                item_type: ItemType::Condition,
                group_id,
            },
            active_rect: rect,
            over: None,
            collisions: Vec::new(),
        }
    }

    fn over(id: NodeId, item_type: ItemType, group_id: NodeId, rect: Rect) -> Option<DropTarget> {
        Some(DropTarget {
            id,
            item_type,
            group_id,
            rect,
        })
    }

    fn collision(id: NodeId, group_id: NodeId, rect: Rect) -> Collision {
        Collision {
            id,
            item_type: ItemType::Condition,
            group_id,
            rect,
        }
    }

    #[test]
    fn test_no_target_or_self_target_is_ignored() {
        let root = tree();
        let mut event = drag(2, 1, Some(row(0.0)));
        assert_eq!(resolve_drop(&event, &root), None);

        event.over = over(2, ItemType::Condition, 1, row(0.0));
        assert_eq!(resolve_drop(&event, &root), None);
    }

    #[test]
    fn test_condition_target_uses_midpoints() {
        let root = tree();
        let mut event = drag(2, 1, Some(row(4.6)));
        event.over = over(5, ItemType::Condition, 3, row(5.0));
        assert_eq!(
            resolve_drop(&event, &root),
            Some(DropDecision {
                target_group_id: 3,
                anchor_item_id: Some(5),
                position: DropPosition::Before,
            })
        );

        event.active_rect = Some(row(5.4));
        assert_eq!(
            resolve_drop(&event, &root).map(|d| d.position),
            Some(DropPosition::After)
        );

        event.active_rect = None;
        assert_eq!(
            resolve_drop(&event, &root).map(|d| d.position),
            Some(DropPosition::After)
        );
    }

    #[test]
    fn test_group_target_without_candidates_uses_pointer_side() {
        let root = tree();
        let group_rect = Rect::new(40.0, 0.0, 300.0, 160.0);
        let mut event = drag(7, 1, Some(row(1.0)));
        event.over = over(3, ItemType::Group, 1, group_rect);
        assert_eq!(
            resolve_drop(&event, &root),
            Some(DropDecision {
                target_group_id: 3,
                anchor_item_id: None,
                position: DropPosition::Before,
            })
        );

        event.active_rect = Some(row(4.0));
        assert_eq!(
            resolve_drop(&event, &root).map(|d| (d.anchor_item_id, d.position)),
            Some((None, DropPosition::After))
        );
    }

    #[test]
    fn test_group_target_candidate_counts() {
        let root = tree();
        let group_rect = Rect::new(40.0, 0.0, 300.0, 160.0);
        let mut event = drag(7, 1, Some(row(2.3)));
        event.over = over(3, ItemType::Group, 1, group_rect);

        // the dragged item, the group itself and foreign nodes are not candidates
        event.collisions = vec![
            collision(7, 1, row(6.0)),
            collision(2, 1, row(0.0)),
            Collision {
                id: 3,
                item_type: ItemType::Group,
                group_id: 1,
                rect: group_rect,
            },
            collision(5, 3, row(2.0)),
        ];
        assert_eq!(
            resolve_drop(&event, &root).map(|d| (d.anchor_item_id, d.position)),
            Some((Some(5), DropPosition::After))
        );

        event.collisions.push(collision(4, 3, row(1.0)));
        assert_eq!(
            resolve_drop(&event, &root).map(|d| (d.anchor_item_id, d.position)),
            Some((Some(4), DropPosition::After))
        );

        event.collisions.push(collision(6, 3, row(3.0)));
        assert_eq!(
            resolve_drop(&event, &root).map(|d| (d.anchor_item_id, d.position)),
            Some((None, DropPosition::After))
        );
    }

    #[test]
    fn test_unknown_group_target_is_ignored() {
        let root = tree();
        let mut event = drag(2, 1, Some(row(0.0)));
        event.over = over(99, ItemType::Group, 1, row(3.0));
        assert_eq!(resolve_drop(&event, &root), None);
    }
}
