// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`KnowledgeMap`]: a tree plus its layout, kept in sync under edits.

use alloc::string::String;
use alloc::vec::Vec;

use knowmap_geometry::{Frame, UnitFrame};
use kurbo::Point;

use crate::builder::build_layers_indexed;
use crate::error::MapError;
use crate::index::TreeIndex;
use crate::options::LayoutOptions;
use crate::types::{Layer, LayeredMap, NodeId, TreeNode};
use crate::update::{ChangeFlags, PositionUpdate, update_position};
use crate::viewport::{Viewport, filter_nodes_and_layers, find_current_node};

/// A single edit to a loaded map.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapEvent {
    /// A node's center moved.
    Moved {
        /// The node.
        id: NodeId,
        /// Its new center.
        position: Point,
    },
    /// A subtree was attached under `parent`, after its existing children.
    Added {
        /// The new parent.
        parent: NodeId,
        /// The subtree to attach.
        node: TreeNode,
    },
    /// A node and its whole subtree were removed.
    Removed {
        /// The subtree root.
        id: NodeId,
    },
    /// A node and its subtree moved under a different parent.
    Reparented {
        /// The subtree root.
        id: NodeId,
        /// The new parent.
        parent: NodeId,
        /// Center of `id` inside the new parent.
        position: Point,
    },
    /// A node's title changed.
    Renamed {
        /// The node.
        id: NodeId,
        /// The new title.
        title: String,
    },
}

/// What [`KnowledgeMap::apply`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// A move ran through the position updater.
    Moved(PositionUpdate),
    /// The tree's shape changed and the layout was rebuilt.
    Rebuilt,
    /// Only a title changed.
    Renamed,
}

/// A knowledge tree together with its layered layout.
///
/// Moves go through the incremental [`update_position`] cascade; edits that
/// change the tree's shape rebuild the index and layout from a snapshot. Every
/// operation is all-or-nothing: on error the map is unchanged.
///
/// ```
/// use knowmap_layers::{KnowledgeMap, LayoutOptions, MapEvent, TreeNode, Viewport};
/// use kurbo::{Point, Size};
///
/// let tree = TreeNode::new("root", "Map", Point::new(500.0, 500.0))
///     .with_child(TreeNode::new("a", "A", Point::new(250.0, 500.0)))
///     .with_child(TreeNode::new("b", "B", Point::new(750.0, 500.0)));
/// let mut map = KnowledgeMap::load(tree, LayoutOptions::default()).unwrap();
///
/// map.apply(MapEvent::Moved { id: "a".into(), position: Point::new(300.0, 500.0) })
///     .unwrap();
/// assert_eq!(map.layers().get(1, "a").unwrap().center, Point::new(300.0, 500.0));
///
/// let viewport = Viewport::new(Size::new(1000.0, 1000.0));
/// // `b` now covers less than half of the viewport, so the root stays current.
/// let current = map.current_node(&viewport, Point::new(990.0, 10.0)).unwrap();
/// assert_eq!(current.as_str(), "root");
/// ```
#[derive(Clone, Debug)]
pub struct KnowledgeMap {
    options: LayoutOptions,
    index: TreeIndex,
    layers: LayeredMap,
}

impl KnowledgeMap {
    /// Index and lay out `tree`.
    pub fn load(tree: TreeNode, options: LayoutOptions) -> Result<Self, MapError> {
        let index = TreeIndex::from_tree(&tree)?;
        let layers = build_layers_indexed(&index, &options)?;
        Ok(Self {
            options,
            index,
            layers,
        })
    }

    /// The current layout.
    pub fn layers(&self) -> &LayeredMap {
        &self.layers
    }

    /// The node-record arena.
    pub fn index(&self) -> &TreeIndex {
        &self.index
    }

    /// The layout options in use.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// The tree as it stands after all applied events.
    pub fn snapshot(&self) -> TreeNode {
        self.index.to_tree()
    }

    /// Apply one edit.
    pub fn apply(&mut self, event: MapEvent) -> Result<EventOutcome, MapError> {
        match event {
            MapEvent::Moved { id, position } => {
                self.move_node(id.as_str(), position).map(EventOutcome::Moved)
            }
            MapEvent::Renamed { id, title } => {
                self.rename(id.as_str(), title)?;
                Ok(EventOutcome::Renamed)
            }
            MapEvent::Added { parent, node } => {
                let mut tree = self.snapshot();
                let slot = tree
                    .find_mut(parent.as_str())
                    .ok_or(MapError::UnknownNode(parent))?;
                slot.children.push(node);
                self.rebuild(&tree)
            }
            MapEvent::Removed { id } => {
                self.guard_not_root(&id)?;
                let mut tree = self.snapshot();
                tree.take_descendant(id.as_str())
                    .ok_or(MapError::UnknownNode(id))?;
                self.rebuild(&tree)
            }
            MapEvent::Reparented {
                id,
                parent,
                position,
            } => {
                self.guard_not_root(&id)?;
                self.index.record(parent.as_str())?;
                if self.index.is_ancestor_or_self(id.as_str(), parent.as_str()) {
                    return Err(MapError::malformed(
                        &id,
                        "cannot move a node under its own subtree",
                    ));
                }
                let mut tree = self.snapshot();
                let mut subtree = tree
                    .take_descendant(id.as_str())
                    .ok_or(MapError::UnknownNode(id))?;
                subtree.position = position;
                let slot = tree
                    .find_mut(parent.as_str())
                    .ok_or(MapError::UnknownNode(parent))?;
                slot.children.push(subtree);
                self.rebuild(&tree)
            }
        }
    }

    /// Move `id` to `position`, cascading through its parent's subtree, and
    /// record the new centers in the index.
    pub fn move_node(&mut self, id: &str, position: Point) -> Result<PositionUpdate, MapError> {
        let update = update_position(&mut self.layers, &self.index, id, position, &self.options)?;
        if let Some(report) = update.report() {
            for change in &report.changes {
                if change.flags.contains(ChangeFlags::CENTER)
                    && let Some(node) = self.layers.get(change.depth, change.id.as_str())
                {
                    self.index.set_position(change.id.as_str(), node.center);
                }
            }
        }
        Ok(update)
    }

    /// The node the viewport is focused on; see [`find_current_node`].
    pub fn current_node(&self, viewport: &Viewport, focus: Point) -> Result<NodeId, MapError> {
        find_current_node(&self.layers, &self.index, viewport, focus, &self.options)
    }

    /// The layers to draw around `current`; see [`filter_nodes_and_layers`].
    pub fn visible_layers(&self, current: &str) -> Result<Vec<Layer>, MapError> {
        filter_nodes_and_layers(&self.layers, &self.index, current)
    }

    /// A free spot for a new child of `parent`.
    ///
    /// A childless parent offers its centroid. Otherwise the new child is
    /// placed halfway between the largest existing child's center and the far
    /// end of that child's longest diagonal, which is inside the largest child's
    /// cell and so away from every sibling's center.
    pub fn suggest_child_position(&self, parent: &str) -> Result<Point, MapError> {
        let record = self.index.record(parent)?;
        let node = self
            .layers
            .get(record.depth, parent)
            .ok_or_else(|| MapError::UnknownNode(NodeId::from(parent)))?;
        let largest = record
            .children
            .iter()
            .filter_map(|c| self.layers.get(record.depth + 1, c.as_str()))
            .max_by(|a, b| a.border.area().total_cmp(&b.border.area()));
        let Some(largest) = largest else {
            return Ok(node.border.centroid());
        };
        let diagonal = largest.border.max_diagonal();
        let far = if largest.center.distance(diagonal.p0) >= largest.center.distance(diagonal.p1) {
            diagonal.p0
        } else {
            diagonal.p1
        };
        Ok(largest.center.midpoint(far))
    }

    /// Center of `id` in its parent's unit-square frame; see
    /// [`LayeredMap::relative_position`].
    pub fn relative_position(&self, id: &str) -> Result<Point, MapError> {
        self.layers.relative_position(id, &self.index)
    }

    fn rename(&mut self, id: &str, title: String) -> Result<(), MapError> {
        let depth = self.index.record(id)?.depth;
        if let Some(node) = self
            .layers
            .layer_mut(depth)
            .and_then(|layer| layer.get_mut(id))
        {
            node.title.clone_from(&title);
        }
        self.index.set_title(id, title);
        Ok(())
    }

    fn rebuild(&mut self, tree: &TreeNode) -> Result<EventOutcome, MapError> {
        let index = TreeIndex::from_tree(tree)?;
        let layers = build_layers_indexed(&index, &self.options)?;
        self.index = index;
        self.layers = layers;
        Ok(EventOutcome::Rebuilt)
    }

    fn guard_not_root(&self, id: &NodeId) -> Result<(), MapError> {
        if id == self.index.root() {
            Err(MapError::RootIsFixed(id.clone()))
        } else {
            Ok(())
        }
    }
}

impl LayeredMap {
    /// Center of `id` expressed in its parent's unit-square frame.
    ///
    /// The root is expressed in its own frame, so it is always `(0.5, 0.5)`.
    pub fn relative_position(&self, id: &str, index: &TreeIndex) -> Result<Point, MapError> {
        let record = index.record(id)?;
        let node = self
            .get(record.depth, id)
            .ok_or_else(|| MapError::UnknownNode(NodeId::from(id)))?;
        let frame_node = match &record.parent {
            Some(parent) => self
                .get(record.depth - 1, parent.as_str())
                .ok_or_else(|| MapError::UnknownNode(parent.clone()))?,
            None => node,
        };
        let frame =
            UnitFrame::new(&frame_node.border).map_err(|e| MapError::geometry(&frame_node.id, e))?;
        Ok(frame.normalize(node.center))
    }
}
