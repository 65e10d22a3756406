// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position updater: move one node and cascade the change downward.
//!
//! Moving a node changes one generator of its parent's tiling, so every sibling
//! may be reshaped. Each reshaped sibling carries its children into the new
//! border with [`morph`], re-tiles them, and so on one layer at a time until no
//! reshaped node has children. Only the moved node's parent subtree is touched.
//!
//! The update is all-or-nothing: the cascade is computed into a staging list and
//! written into the [`LayeredMap`] only after every step succeeded.

use alloc::vec::Vec;

use knowmap_geometry::{Polygon, morph, partition};
use kurbo::Point;

use crate::error::MapError;
use crate::index::TreeIndex;
use crate::options::LayoutOptions;
use crate::types::{LayeredMap, MapNode, NodeId};

bitflags::bitflags! {
    /// What a move changed on one node.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ChangeFlags: u8 {
        /// The node's center moved.
        const CENTER = 0b0000_0001;
        /// The node's border was reshaped.
        const BORDER = 0b0000_0010;
    }
}

/// One node touched by a move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeChange {
    /// The node.
    pub id: NodeId,
    /// Its layer.
    pub depth: usize,
    /// What changed.
    pub flags: ChangeFlags,
}

/// Summary of an applied move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveReport {
    /// Every node whose center or border changed, shallowest first.
    pub changes: Vec<NodeChange>,
    /// Number of layers that received changes.
    pub layers: usize,
    /// Whether [`LayoutOptions::max_cascade_depth`] stopped the cascade early.
    pub truncated: bool,
}

impl MoveReport {
    /// Nodes whose center moved.
    pub fn moved(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.with_flag(ChangeFlags::CENTER)
    }

    /// Nodes whose border was reshaped.
    pub fn reshaped(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.with_flag(ChangeFlags::BORDER)
    }

    /// Flags recorded for `id`, empty if it was not touched.
    pub fn flags_of(&self, id: &str) -> ChangeFlags {
        self.changes
            .iter()
            .find(|c| c.id.as_str() == id)
            .map_or(ChangeFlags::empty(), |c| c.flags)
    }

    fn with_flag(&self, flag: ChangeFlags) -> impl Iterator<Item = &NodeId> + '_ {
        self.changes
            .iter()
            .filter(move |c| c.flags.contains(flag))
            .map(|c| &c.id)
    }
}

/// Outcome of [`update_position`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PositionUpdate {
    /// The move was applied.
    Applied(MoveReport),
    /// The new center was outside the parent's border; nothing changed.
    Cancelled,
}

impl PositionUpdate {
    /// Whether the move was rejected by the containment guard.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The report of an applied move.
    pub fn report(&self) -> Option<&MoveReport> {
        match self {
            Self::Applied(report) => Some(report),
            Self::Cancelled => None,
        }
    }
}

/// A node whose border changed and whose children must follow.
struct Reshaped {
    id: NodeId,
    old: Polygon,
    new: Polygon,
}

struct Staged {
    depth: usize,
    node: MapNode,
    flags: ChangeFlags,
}

/// Move `id` to `new_center` and cascade the reshaping through its parent's
/// subtree.
///
/// Returns [`PositionUpdate::Cancelled`] without touching `layers` when
/// `new_center` is outside the parent's current border. Fails with
/// [`MapError::RootIsFixed`] for the root, [`MapError::UnknownNode`] for ids
/// missing from `index` or `layers`, and [`MapError::Geometry`] when a re-tile or
/// morph fails; in every failure case `layers` is left as it was.
pub fn update_position(
    layers: &mut LayeredMap,
    index: &TreeIndex,
    id: &str,
    new_center: Point,
    options: &LayoutOptions,
) -> Result<PositionUpdate, MapError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("update_position", node = id).entered();

    let record = index.record(id)?;
    let Some(parent_id) = record.parent.as_ref() else {
        return Err(MapError::RootIsFixed(NodeId::from(id)));
    };
    let depth = record.depth;
    let parent_border = lookup(layers, depth - 1, parent_id)?.border.clone();
    let eps = options.tolerance.absolute(parent_border.bounding_box());
    if !parent_border.contains_within(new_center, eps) {
        #[cfg(feature = "tracing")]
        tracing::trace!(x = new_center.x, y = new_center.y, "move cancelled");
        return Ok(PositionUpdate::Cancelled);
    }

    let centers = index
        .children_of(parent_id.as_str())
        .iter()
        .map(|s| {
            let center = if s.as_str() == id {
                new_center
            } else {
                lookup(layers, depth, s)?.center
            };
            Ok((s.clone(), center))
        })
        .collect::<Result<Vec<_>, MapError>>()?;

    let mut cascade = Cascade {
        layers: &*layers,
        index,
        options,
        staged: Vec::new(),
    };
    let mut frontier = cascade.retile(parent_id, &parent_border, depth, centers)?;

    let mut truncated = false;
    let mut level = 0;
    while !frontier.is_empty() {
        if options.max_cascade_depth.is_some_and(|max| level >= max) {
            truncated = true;
            break;
        }
        let child_depth = depth + 1 + level;
        let mut next = Vec::new();
        for reshaped in frontier {
            let old_centers = index
                .children_of(reshaped.id.as_str())
                .iter()
                .map(|c| Ok((c.clone(), lookup(layers, child_depth, c)?.center)))
                .collect::<Result<Vec<_>, MapError>>()?;
            let moved = morph(
                &reshaped.old,
                &reshaped.new,
                &old_centers,
                options.morph_strategy,
            )
            .map_err(|e| MapError::geometry(&reshaped.id, e))?;
            next.extend(cascade.retile(&reshaped.id, &reshaped.new, child_depth, moved)?);
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(depth = child_depth, reshaped = next.len(), "cascade level");
        frontier = next;
        level += 1;
    }
    let staged = cascade.staged;

    let mut report = MoveReport {
        changes: Vec::with_capacity(staged.len()),
        layers: 0,
        truncated,
    };
    let mut deepest = None;
    for entry in staged {
        deepest = deepest.max(Some(entry.depth));
        report.changes.push(NodeChange {
            id: entry.node.id.clone(),
            depth: entry.depth,
            flags: entry.flags,
        });
        if let Some(layer) = layers.layer_mut(entry.depth) {
            layer.insert(entry.node);
        }
    }
    report.layers = deepest.map_or(0, |d| d + 1 - depth);

    #[cfg(feature = "tracing")]
    tracing::trace!(
        changed = report.changes.len(),
        layers = report.layers,
        truncated,
        "move committed"
    );
    Ok(PositionUpdate::Applied(report))
}

fn lookup<'a>(layers: &'a LayeredMap, depth: usize, id: &NodeId) -> Result<&'a MapNode, MapError> {
    layers
        .get(depth, id.as_str())
        .ok_or_else(|| MapError::UnknownNode(id.clone()))
}

/// Read-only view of the current layout plus the changes staged so far.
struct Cascade<'a> {
    layers: &'a LayeredMap,
    index: &'a TreeIndex,
    options: &'a LayoutOptions,
    staged: Vec<Staged>,
}

impl Cascade<'_> {
    /// Re-tile `border` with `centers`, stage every node that changed and
    /// return the reshaped ones that have children.
    fn retile(
        &mut self,
        parent_id: &NodeId,
        border: &Polygon,
        depth: usize,
        centers: Vec<(NodeId, Point)>,
    ) -> Result<Vec<Reshaped>, MapError> {
        let cells = partition(border, &centers, &self.options.tolerance)
            .map_err(|e| MapError::geometry(parent_id, e))?;
        let eps = self.options.tolerance.absolute(border.bounding_box());
        let mut reshaped = Vec::new();
        for ((id, center), (_, cell)) in centers.into_iter().zip(cells) {
            let old = lookup(self.layers, depth, &id)?;
            let mut flags = ChangeFlags::empty();
            if (center - old.center).length() > eps {
                flags |= ChangeFlags::CENTER;
            }
            if !cell.approx_eq(&old.border, eps) {
                flags |= ChangeFlags::BORDER;
            }
            if flags.is_empty() {
                continue;
            }
            if flags.contains(ChangeFlags::BORDER) && !self.index.children_of(id.as_str()).is_empty()
            {
                reshaped.push(Reshaped {
                    id: id.clone(),
                    old: old.border.clone(),
                    new: cell.clone(),
                });
            }
            self.staged.push(Staged {
                depth,
                node: MapNode {
                    id,
                    title: old.title.clone(),
                    center,
                    border: cell,
                },
                flags,
            });
        }
        Ok(reshaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_layers;
    use crate::types::{ROOT_ID, TreeNode};
    use knowmap_geometry::ErrorKind;

    fn tree() -> TreeNode {
        TreeNode::new(ROOT_ID, "Root", Point::new(500.0, 500.0))
            .with_child(
                TreeNode::new("a", "A", Point::new(250.0, 500.0))
                    .with_child(TreeNode::new("a1", "A1", Point::new(150.0, 300.0)))
                    .with_child(
                        TreeNode::new("a2", "A2", Point::new(350.0, 700.0))
                            .with_child(TreeNode::new("a2x", "A2x", Point::new(300.0, 650.0)))
                            .with_child(TreeNode::new("a2y", "A2y", Point::new(400.0, 750.0))),
                    ),
            )
            .with_child(
                TreeNode::new("b", "B", Point::new(750.0, 500.0))
                    .with_child(TreeNode::new("b1", "B1", Point::new(650.0, 250.0)))
                    .with_child(TreeNode::new("b2", "B2", Point::new(850.0, 750.0))),
            )
    }

    fn setup() -> (LayeredMap, TreeIndex, LayoutOptions) {
        let options = LayoutOptions::default();
        let index = TreeIndex::from_tree(&tree()).unwrap();
        let layers = build_layers(&tree(), &options).unwrap();
        (layers, index, options)
    }

    #[test]
    fn moving_a_leaf_touches_only_its_siblings() {
        let (mut layers, index, options) = setup();
        let before = layers.clone();
        let update =
            update_position(&mut layers, &index, "b1", Point::new(660.0, 260.0), &options).unwrap();
        let report = update.report().unwrap();
        assert_eq!(report.flags_of("b1"), ChangeFlags::CENTER | ChangeFlags::BORDER);
        assert_eq!(report.flags_of("b2"), ChangeFlags::BORDER);
        assert_eq!(report.layers, 1);
        assert_eq!(layers.get(2, "b1").unwrap().center, Point::new(660.0, 260.0));
        for id in ["a1", "a2"] {
            assert_eq!(layers.get(2, id), before.get(2, id));
        }
        for id in ["a2x", "a2y"] {
            assert_eq!(layers.get(3, id), before.get(3, id));
        }
        assert_eq!(layers.layer(1), before.layer(1));
    }

    #[test]
    fn moving_an_inner_node_cascades_into_its_subtree() {
        let (mut layers, index, options) = setup();
        let before = layers.clone();
        let update =
            update_position(&mut layers, &index, "a", Point::new(300.0, 500.0), &options).unwrap();
        let report = update.report().unwrap();
        // `a` and `b` share the root's canvas, so both are reshaped.
        assert!(report.flags_of("a").contains(ChangeFlags::BORDER));
        assert!(report.flags_of("b").contains(ChangeFlags::BORDER));
        // Children of both follow their parents.
        assert!(report.flags_of("a1").contains(ChangeFlags::CENTER));
        assert!(report.flags_of("b1").contains(ChangeFlags::CENTER));
        assert!(!report.truncated);
        assert_eq!(layers.layer(0), before.layer(0));

        // The cascade leaves every parent exactly tiled by its children.
        for (parent, depth, children) in [
            ("a", 1, ["a1", "a2"]),
            ("b", 1, ["b1", "b2"]),
            ("a2", 2, ["a2x", "a2y"]),
        ] {
            let outer = layers.get(depth, parent).unwrap();
            let sum: f64 = children
                .iter()
                .map(|c| layers.get(depth + 1, c).unwrap().border.area())
                .sum();
            assert!((outer.border.area() - sum).abs() < 1e-3, "{parent}");
            for c in children {
                let child = layers.get(depth + 1, c).unwrap();
                assert!(outer.border.contains(child.center), "{c}");
                assert!(child.border.contains(child.center), "{c}");
            }
        }
    }

    #[test]
    fn moving_outside_the_parent_is_cancelled() {
        let (mut layers, index, options) = setup();
        let before = layers.clone();
        // `b` owns x >= 500.
        let update =
            update_position(&mut layers, &index, "b1", Point::new(100.0, 100.0), &options).unwrap();
        assert!(update.is_cancelled());
        assert_eq!(layers, before);
    }

    #[test]
    fn the_root_is_fixed() {
        let (mut layers, index, options) = setup();
        let err =
            update_position(&mut layers, &index, ROOT_ID, Point::new(1.0, 1.0), &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RootIsFixed);
    }

    #[test]
    fn unknown_nodes_are_errors() {
        let (mut layers, index, options) = setup();
        let err =
            update_position(&mut layers, &index, "nope", Point::new(1.0, 1.0), &options).unwrap_err();
        assert_eq!(err, MapError::UnknownNode(NodeId::from("nope")));
    }

    #[test]
    fn failed_moves_leave_layers_untouched() {
        let (mut layers, index, options) = setup();
        let before = layers.clone();
        // Onto a sibling's center.
        let err =
            update_position(&mut layers, &index, "b1", Point::new(850.0, 750.0), &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CoincidentCenters);
        assert_eq!(layers, before);
    }

    #[test]
    fn cascade_budget_truncates() {
        let (mut layers, index, _) = setup();
        let options = LayoutOptions::default().with_max_cascade_depth(0);
        let before = layers.clone();
        let update =
            update_position(&mut layers, &index, "a", Point::new(300.0, 500.0), &options).unwrap();
        let report = update.report().unwrap();
        assert!(report.truncated);
        assert_eq!(report.layers, 1);
        assert_eq!(layers.layer(2), before.layer(2));
    }

    #[test]
    fn moving_to_the_same_spot_changes_nothing() {
        let (mut layers, index, options) = setup();
        let before = layers.clone();
        let update =
            update_position(&mut layers, &index, "a1", Point::new(150.0, 300.0), &options).unwrap();
        assert!(update.report().unwrap().changes.is_empty());
        assert_eq!(layers, before);
    }
}
