// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while laying out, updating or querying a map.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use knowmap_geometry::{ErrorKind, GeometryError};

use crate::types::NodeId;

/// Failure of a map-level operation.
///
/// Nothing is retried internally. Callers usually recover by keeping their last
/// good [`LayeredMap`](crate::LayeredMap) or by reloading the whole tree.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MapError {
    /// Tiling or morphing the children of `node` failed.
    #[error("laying out the children of `{node}` failed: {source}")]
    Geometry {
        /// The parent whose border was being tiled.
        node: NodeId,
        /// The geometric failure.
        #[source]
        source: GeometryError,
    },
    /// The input tree is structurally invalid at `node`.
    #[error("malformed tree at `{node}`: {reason}")]
    MalformedTree {
        /// The node where the problem was found.
        node: NodeId,
        /// What is wrong.
        reason: Cow<'static, str>,
    },
    /// No node has this identifier.
    #[error("unknown node `{0}`")]
    UnknownNode(NodeId),
    /// The root cannot be moved, removed or reparented.
    #[error("the root node `{0}` is fixed")]
    RootIsFixed(NodeId),
    /// The focus point is outside every candidate region at `depth`.
    #[error("focus point is outside every region at depth {depth}")]
    FocusOutside {
        /// Depth of the layer that was being searched.
        depth: usize,
    },
}

impl MapError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Geometry { source, .. } => source.kind(),
            Self::MalformedTree { .. } => ErrorKind::MalformedTree,
            Self::UnknownNode(_) => ErrorKind::UnknownNode,
            Self::RootIsFixed(_) => ErrorKind::RootIsFixed,
            Self::FocusOutside { .. } => ErrorKind::NoIntersection,
        }
    }

    /// Key/value pairs describing where the error happened, for logs.
    pub fn context(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Geometry { node, source } => {
                let mut out = vec![("node", node.to_string())];
                out.extend(source.context());
                out
            }
            Self::MalformedTree { node, reason } => {
                vec![("node", node.to_string()), ("reason", reason.to_string())]
            }
            Self::UnknownNode(id) | Self::RootIsFixed(id) => vec![("node", id.to_string())],
            Self::FocusOutside { depth } => vec![("depth", depth.to_string())],
        }
    }

    pub(crate) fn geometry(node: &NodeId, source: GeometryError) -> Self {
        Self::Geometry {
            node: node.clone(),
            source,
        }
    }

    pub(crate) fn malformed(node: &NodeId, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::MalformedTree {
            node: node.clone(),
            reason: reason.into(),
        }
    }
}
