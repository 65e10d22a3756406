// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat node-record arena built from a [`TreeNode`] snapshot.
//!
//! Parent links are identifier lookups, never owning references, so the tree
//! shape can be walked in both directions without reference cycles. The index is
//! rebuilt from a snapshot whenever the tree's shape changes.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Point;

use crate::error::MapError;
use crate::types::{NodeId, ROOT_ID, TreeNode};

/// Everything known about one node apart from its geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
    /// Parent identifier; `None` for the root.
    pub parent: Option<NodeId>,
    /// Children in tree order.
    pub children: Vec<NodeId>,
    /// Distance from the root (the root is `0`).
    pub depth: usize,
    /// Display title.
    pub title: String,
    /// Last known center.
    pub position: Point,
}

impl NodeRecord {
    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Identifier-keyed arena of [`NodeRecord`]s.
#[derive(Clone, PartialEq)]
pub struct TreeIndex {
    root: NodeId,
    records: HashMap<NodeId, NodeRecord>,
    height: usize,
}

impl core::fmt::Debug for TreeIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TreeIndex")
            .field("root", &self.root)
            .field("nodes", &self.records.len())
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl TreeIndex {
    /// Index `tree`, breadth first.
    ///
    /// Fails with [`MapError::MalformedTree`] when the root is not named
    /// [`ROOT_ID`], or when an identifier is empty or appears more than once.
    pub fn from_tree(tree: &TreeNode) -> Result<Self, MapError> {
        if tree.id.as_str() != ROOT_ID {
            return Err(MapError::malformed(
                &tree.id,
                "the root must use the reserved identifier",
            ));
        }
        let mut records: HashMap<NodeId, NodeRecord> = HashMap::with_capacity(tree.count());
        let mut frontier: Vec<(&TreeNode, Option<&NodeId>)> = vec![(tree, None)];
        let mut depth = 0;
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for (node, parent) in frontier {
                if node.id.as_str().is_empty() {
                    return Err(MapError::malformed(&node.id, "empty identifier"));
                }
                if records.contains_key(node.id.as_str()) {
                    return Err(MapError::malformed(&node.id, "duplicate identifier"));
                }
                records.insert(
                    node.id.clone(),
                    NodeRecord {
                        parent: parent.cloned(),
                        children: node.children.iter().map(|c| c.id.clone()).collect(),
                        depth,
                        title: node.title.clone(),
                        position: node.position,
                    },
                );
                next.extend(node.children.iter().map(|c| (c, Some(&node.id))));
            }
            frontier = next;
            depth += 1;
        }
        Ok(Self {
            root: tree.id.clone(),
            records,
            height: depth.saturating_sub(1),
        })
    }

    /// Identifier of the root.
    pub fn root(&self) -> &NodeId {
        &self.root
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index is empty. An index built from a tree never is.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Depth of the deepest node.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Record for `id`.
    pub fn get(&self, id: &str) -> Option<&NodeRecord> {
        self.records.get(id)
    }

    /// Record for `id`, or [`MapError::UnknownNode`].
    pub fn record(&self, id: &str) -> Result<&NodeRecord, MapError> {
        self.records
            .get(id)
            .ok_or_else(|| MapError::UnknownNode(NodeId::from(id)))
    }

    /// Whether `id` is indexed.
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Parent of `id`; `None` for the root or unknown ids.
    pub fn parent_of(&self, id: &str) -> Option<&NodeId> {
        self.records.get(id)?.parent.as_ref()
    }

    /// Children of `id`; empty for leaves and unknown ids.
    pub fn children_of(&self, id: &str) -> &[NodeId] {
        self.records
            .get(id)
            .map_or(&[][..], |r| r.children.as_slice())
    }

    /// Whether `ancestor` is `id` or lies on the path from `id` to the root.
    pub fn is_ancestor_or_self(&self, ancestor: &str, id: &str) -> bool {
        let mut cursor = self.records.get_key_value(id).map(|(k, _)| k);
        while let Some(current) = cursor {
            if current.as_str() == ancestor {
                return true;
            }
            cursor = self.parent_of(current.as_str());
        }
        false
    }

    /// Iterate identifiers in unspecified order.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.records.keys()
    }

    /// Rebuild a [`TreeNode`] snapshot from the records.
    pub fn to_tree(&self) -> TreeNode {
        self.subtree(&self.root)
    }

    fn subtree(&self, id: &NodeId) -> TreeNode {
        match self.records.get(id) {
            Some(rec) => TreeNode {
                id: id.clone(),
                title: rec.title.clone(),
                position: rec.position,
                children: rec.children.iter().map(|c| self.subtree(c)).collect(),
            },
            None => TreeNode::new(id.clone(), String::new(), Point::ZERO),
        }
    }

    pub(crate) fn set_position(&mut self, id: &str, position: Point) {
        if let Some(rec) = self.records.get_mut(id) {
            rec.position = position;
        }
    }

    pub(crate) fn set_title(&mut self, id: &str, title: String) {
        if let Some(rec) = self.records.get_mut(id) {
            rec.title = title;
        }
    }
}
