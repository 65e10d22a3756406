// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: node identifiers, the input tree, and the layered output.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;

use hashbrown::HashMap;
use knowmap_geometry::Polygon;
use kurbo::Point;

/// Identifier reserved for the root of a map.
pub const ROOT_ID: &str = "root";

/// Identifier for a node of a knowledge map.
///
/// Identifiers are opaque strings chosen by the caller and unique within one
/// tree. Cloning is cheap: the text is shared.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The reserved [`ROOT_ID`] identifier.
    pub fn root() -> Self {
        Self::new(ROOT_ID)
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NodeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NodeId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <String as serde::Deserialize<'de>>::deserialize(deserializer).map(Self::from)
    }
}

/// One node of the input tree.
///
/// `position` is the desired center of the node, in the coordinate space of the
/// whole map. The root's position also fixes the canvas: see
/// [`root_border`](crate::root_border).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode {
    /// Unique identifier.
    pub id: NodeId,
    /// Display title.
    pub title: String,
    /// Desired center.
    pub position: Point,
    /// Ordered children.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// A childless node.
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            position,
            children: Vec::new(),
        }
    }

    /// Append `child` and return `self`, for building trees inline.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Find the node `id` anywhere in this subtree.
    pub fn find(&self, id: &str) -> Option<&Self> {
        if self.id.as_str() == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Self> {
        if self.id.as_str() == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Detach the strict descendant `id` from this subtree.
    pub fn take_descendant(&mut self, id: &str) -> Option<Self> {
        if let Some(i) = self.children.iter().position(|c| c.id.as_str() == id) {
            return Some(self.children.remove(i));
        }
        self.children.iter_mut().find_map(|c| c.take_descendant(id))
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}

/// A laid-out node: its title, center and border polygon.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapNode {
    /// Identifier of the tree node.
    pub id: NodeId,
    /// Display title; may be blanked by [`filter_nodes_and_layers`](crate::filter_nodes_and_layers).
    pub title: String,
    /// Generator point of the node's cell.
    pub center: Point,
    /// Region of the map owned by the node.
    pub border: Polygon,
}

/// All laid-out nodes at one depth, keyed by identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layer {
    depth: usize,
    nodes: HashMap<NodeId, MapNode>,
}

impl Layer {
    /// An empty layer for tree depth `depth`.
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            nodes: HashMap::new(),
        }
    }

    /// Tree depth of the nodes in this layer (the root is at depth `0`).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Look up a node.
    pub fn get(&self, id: &str) -> Option<&MapNode> {
        self.nodes.get(id)
    }

    /// Whether the layer holds `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Insert or replace a node, returning the previous value.
    pub fn insert(&mut self, node: MapNode) -> Option<MapNode> {
        self.nodes.insert(node.id.clone(), node)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the layer has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &MapNode> + '_ {
        self.nodes.values()
    }

    /// Identifiers in ascending order.
    pub fn sorted_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut MapNode> {
        self.nodes.get_mut(id)
    }
}

/// Layers of a laid-out tree, indexed by depth.
///
/// Layer `0` holds the root only; layer `d` holds every node at depth `d`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayeredMap {
    pub(crate) layers: Vec<Layer>,
}

impl LayeredMap {
    /// Number of layers, i.e. the tree height plus one.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// The layer at `depth`.
    pub fn layer(&self, depth: usize) -> Option<&Layer> {
        self.layers.get(depth)
    }

    /// All layers, shallowest first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Look up `id` at a known depth.
    pub fn get(&self, depth: usize, id: &str) -> Option<&MapNode> {
        self.layers.get(depth)?.get(id)
    }

    /// Look up `id` at any depth, returning the depth alongside the node.
    pub fn find(&self, id: &str) -> Option<(usize, &MapNode)> {
        self.layers
            .iter()
            .enumerate()
            .find_map(|(d, layer)| layer.get(id).map(|n| (d, n)))
    }

    /// Total number of laid-out nodes.
    pub fn node_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    pub(crate) fn layer_mut(&mut self, depth: usize) -> Option<&mut Layer> {
        self.layers.get_mut(depth)
    }
}
