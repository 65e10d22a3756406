// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport selector: pick the node in focus and the layers worth drawing.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, Point, Size, Vec2};

use crate::error::MapError;
use crate::index::TreeIndex;
use crate::options::LayoutOptions;
use crate::types::{Layer, LayeredMap, MapNode, NodeId};

/// Screen-space view onto the map.
///
/// A map point `p` is drawn at `p * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Size of the visible area in screen units.
    pub size: Size,
    /// Uniform zoom factor; must be positive.
    pub zoom: f64,
    /// Screen-space translation applied after zooming.
    pub pan: Vec2,
}

impl Viewport {
    /// An unzoomed, unpanned viewport of `size`.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }

    /// Set the zoom factor.
    #[must_use]
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the pan offset.
    #[must_use]
    pub fn with_pan(mut self, pan: Vec2) -> Self {
        self.pan = pan;
        self
    }

    /// Map-to-screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Area of the visible region.
    pub fn area(&self) -> f64 {
        self.size.area()
    }
}

/// Find the node the viewport is focused on.
///
/// Starting at the root, descend into the child whose on-screen border contains
/// `focus` (a screen-space point) for as long as that child's on-screen area is
/// above `options.zoom_threshold` of the viewport area. The first node at or
/// below the threshold stops the descent and its parent is returned; the root is
/// returned when the root itself is at or below the threshold. A leaf above the
/// threshold is returned itself.
///
/// Fails with [`MapError::FocusOutside`] when no candidate at some depth contains
/// the focus.
pub fn find_current_node(
    layers: &LayeredMap,
    index: &TreeIndex,
    viewport: &Viewport,
    focus: Point,
    options: &LayoutOptions,
) -> Result<NodeId, MapError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("find_current_node", x = focus.x, y = focus.y).entered();

    debug_assert!(viewport.zoom > 0.0, "zoom must be positive");
    let to_screen = viewport.transform();
    let threshold = options.zoom_threshold * viewport.area();

    let mut candidates: &[NodeId] = core::slice::from_ref(index.root());
    let mut depth = 0;
    loop {
        let layer = layers
            .layer(depth)
            .ok_or(MapError::FocusOutside { depth })?;
        let hit = candidates
            .iter()
            .filter_map(|id| layer.get(id.as_str()))
            .find(|node| node.border.transform(to_screen).contains(focus));
        let Some(node) = hit else {
            return Err(MapError::FocusOutside { depth });
        };
        let area = node.border.area() * viewport.zoom * viewport.zoom;
        #[cfg(feature = "tracing")]
        tracing::trace!(depth, node = node.id.as_str(), area, threshold, "focus hit");
        if area <= threshold {
            return Ok(index.parent_of(node.id.as_str()).unwrap_or(&node.id).clone());
        }
        let children = index.children_of(node.id.as_str());
        if children.is_empty() {
            return Ok(node.id.clone());
        }
        candidates = children;
        depth += 1;
    }
}

/// Collect the layers to draw around `current`.
///
/// Returns up to four layers, each keeping its tree depth:
///
/// 1. `current` and its siblings (only `current` when it is the root),
/// 2. the children of those nodes,
/// 3. the grandchildren of `current`,
/// 4. the children of those grandchildren.
///
/// Titles are blanked everywhere except on `current` itself, on its children and
/// on its grandchildren. Empty layers are left out, so shallow trees yield fewer
/// than four. Only nodes present in `layers` are returned.
pub fn filter_nodes_and_layers(
    layers: &LayeredMap,
    index: &TreeIndex,
    current: &str,
) -> Result<Vec<Layer>, MapError> {
    let record = index.record(current)?;
    let depth = record.depth;
    let current_id = NodeId::from(current);

    let peers: Vec<NodeId> = match &record.parent {
        Some(parent) => index.children_of(parent.as_str()).to_vec(),
        None => alloc::vec![current_id.clone()],
    };
    let below_peers = children_of_all(index, &peers);
    let grandchildren = children_of_all(index, record.children.as_slice());
    let great_grandchildren = children_of_all(index, &grandchildren);

    let rows = [
        pick(layers, depth, &peers, |n| n.id == current_id),
        pick(layers, depth + 1, &below_peers, |n| {
            index.parent_of(n.id.as_str()) == Some(&current_id)
        }),
        pick(layers, depth + 2, &grandchildren, |_| true),
        pick(layers, depth + 3, &great_grandchildren, |_| false),
    ];
    Ok(rows.into_iter().filter(|layer| !layer.is_empty()).collect())
}

fn children_of_all(index: &TreeIndex, ids: &[NodeId]) -> Vec<NodeId> {
    ids.iter()
        .flat_map(|id| index.children_of(id.as_str()))
        .cloned()
        .collect()
}

fn pick(
    layers: &LayeredMap,
    depth: usize,
    ids: &[NodeId],
    titled: impl Fn(&MapNode) -> bool,
) -> Layer {
    let mut out = Layer::new(depth);
    let Some(source) = layers.layer(depth) else {
        return out;
    };
    for node in ids.iter().filter_map(|id| source.get(id.as_str())) {
        let mut node = node.clone();
        if !titled(&node) {
            node.title = String::new();
        }
        out.insert(node);
    }
    out
}
