// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer builder: lay out a whole tree, one depth at a time.

use alloc::vec;
use alloc::vec::Vec;

use knowmap_geometry::{GeometryError, Polygon, partition};
use kurbo::{Point, Rect};

use crate::error::MapError;
use crate::index::TreeIndex;
use crate::options::LayoutOptions;
use crate::types::{Layer, LayeredMap, MapNode, NodeId, TreeNode};

/// The canvas rectangle owned by a root placed at `position`.
///
/// The root sits at the center of the canvas, so the canvas spans
/// `[0, 2·x] × [0, 2·y]`.
pub fn root_border(position: Point) -> Polygon {
    Polygon::from_rect(Rect::new(0.0, 0.0, 2.0 * position.x, 2.0 * position.y))
}

/// Lay out `tree` into one [`Layer`] per depth.
///
/// Layer `0` holds the root with the canvas from [`root_border`]. Each further
/// layer tiles every parent's border with one cell per child, using the
/// children's positions as generators.
///
/// ```
/// use knowmap_layers::{LayoutOptions, TreeNode, build_layers};
/// use kurbo::Point;
///
/// let tree = TreeNode::new("root", "Map", Point::new(500.0, 500.0))
///     .with_child(TreeNode::new("a", "A", Point::new(250.0, 500.0)))
///     .with_child(TreeNode::new("b", "B", Point::new(750.0, 500.0)));
/// let layers = build_layers(&tree, &LayoutOptions::default()).unwrap();
/// assert_eq!(layers.depth(), 2);
/// let half = layers.get(1, "a").unwrap().border.area();
/// assert!((half - 500_000.0).abs() < 1e-6);
/// ```
pub fn build_layers(tree: &TreeNode, options: &LayoutOptions) -> Result<LayeredMap, MapError> {
    let index = TreeIndex::from_tree(tree)?;
    build_layers_indexed(&index, options)
}

/// [`build_layers`] over an already built [`TreeIndex`].
pub fn build_layers_indexed(
    index: &TreeIndex,
    options: &LayoutOptions,
) -> Result<LayeredMap, MapError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("build_layers", nodes = index.len()).entered();

    let root_id = index.root();
    let root = index.record(root_id.as_str())?;
    let canvas = root_border(root.position);
    let bounds = canvas.bounding_box();
    if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
        return Err(MapError::geometry(
            root_id,
            GeometryError::DegenerateBorder { border: canvas },
        ));
    }

    let mut first = Layer::new(0);
    first.insert(MapNode {
        id: root_id.clone(),
        title: root.title.clone(),
        center: root.position,
        border: canvas,
    });
    let mut layers = vec![first];
    let mut frontier: Vec<NodeId> = vec![root_id.clone()];

    loop {
        let depth = layers.len();
        let mut layer = Layer::new(depth);
        let mut next = Vec::new();
        for parent_id in &frontier {
            let children = index.children_of(parent_id.as_str());
            if children.is_empty() {
                continue;
            }
            let Some(parent) = layers[depth - 1].get(parent_id.as_str()) else {
                return Err(MapError::UnknownNode(parent_id.clone()));
            };
            let centers = children
                .iter()
                .map(|c| Ok((c.clone(), index.record(c.as_str())?.position)))
                .collect::<Result<Vec<_>, MapError>>()?;
            let cells = partition(&parent.border, &centers, &options.tolerance)
                .map_err(|e| MapError::geometry(parent_id, e))?;
            for ((id, center), (_, border)) in centers.into_iter().zip(cells) {
                let title = index.record(id.as_str())?.title.clone();
                layer.insert(MapNode {
                    id: id.clone(),
                    title,
                    center,
                    border,
                });
                next.push(id);
            }
        }
        if layer.is_empty() {
            break;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(depth, nodes = layer.len(), "layer built");
        layers.push(layer);
        frontier = next;
    }

    Ok(LayeredMap { layers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ROOT_ID;
    use knowmap_geometry::ErrorKind;

    fn two_children() -> TreeNode {
        TreeNode::new(ROOT_ID, "Root", Point::new(500.0, 500.0))
            .with_child(TreeNode::new("left", "Left", Point::new(250.0, 500.0)))
            .with_child(TreeNode::new("right", "Right", Point::new(750.0, 500.0)))
    }

    #[test]
    fn two_children_split_the_canvas_vertically() {
        let layers = build_layers(&two_children(), &LayoutOptions::default()).unwrap();
        assert_eq!(layers.depth(), 2);
        let left = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(500.0, 0.0),
            Point::new(500.0, 1000.0),
            Point::new(0.0, 1000.0),
        ])
        .unwrap();
        let right = Polygon::new(vec![
            Point::new(500.0, 0.0),
            Point::new(1000.0, 0.0),
            Point::new(1000.0, 1000.0),
            Point::new(500.0, 1000.0),
        ])
        .unwrap();
        assert!(layers.get(1, "left").unwrap().border.approx_eq(&left, 1e-6));
        assert!(layers.get(1, "right").unwrap().border.approx_eq(&right, 1e-6));
        assert_eq!(layers.get(1, "left").unwrap().center, Point::new(250.0, 500.0));
    }

    #[test]
    fn root_layer_owns_the_canvas() {
        let layers = build_layers(&two_children(), &LayoutOptions::default()).unwrap();
        let root = layers.get(0, ROOT_ID).unwrap();
        assert_eq!(root.border.bounding_box(), Rect::new(0.0, 0.0, 1000.0, 1000.0));
        assert_eq!(root.title, "Root");
    }

    #[test]
    fn a_lone_root_is_one_layer() {
        let tree = TreeNode::new(ROOT_ID, "Root", Point::new(50.0, 20.0));
        let layers = build_layers(&tree, &LayoutOptions::default()).unwrap();
        assert_eq!(layers.depth(), 1);
    }

    #[test]
    fn uneven_depths_fill_every_layer() {
        let tree = TreeNode::new(ROOT_ID, "Root", Point::new(500.0, 500.0))
            .with_child(
                TreeNode::new("a", "A", Point::new(250.0, 500.0))
                    .with_child(TreeNode::new("a1", "A1", Point::new(100.0, 200.0)))
                    .with_child(
                        TreeNode::new("a2", "A2", Point::new(300.0, 800.0))
                            .with_child(TreeNode::new("a2x", "A2x", Point::new(300.0, 700.0))),
                    ),
            )
            .with_child(TreeNode::new("b", "B", Point::new(750.0, 500.0)));
        let layers = build_layers(&tree, &LayoutOptions::default()).unwrap();
        assert_eq!(layers.depth(), 4);
        assert_eq!(layers.layer(2).unwrap().len(), 2);
        // A single child inherits its parent's whole border.
        let a2 = &layers.get(2, "a2").unwrap().border;
        assert!(layers.get(3, "a2x").unwrap().border.approx_eq(a2, 1e-6));
        // Children tile their parent.
        let a = layers.get(1, "a").unwrap().border.area();
        let sum = layers.get(2, "a1").unwrap().border.area() + a2.area();
        assert!((a - sum).abs() < 1e-3);
    }

    #[test]
    fn child_outside_its_parent_is_reported_against_the_parent() {
        let tree = TreeNode::new(ROOT_ID, "Root", Point::new(500.0, 500.0)).with_child(
            TreeNode::new("a", "A", Point::new(250.0, 500.0))
                .with_child(TreeNode::new("stray", "Stray", Point::new(2000.0, 2000.0))),
        );
        let err = build_layers(&tree, &LayoutOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoIntersection);
        assert!(matches!(err, MapError::Geometry { ref node, .. } if node.as_str() == "a"));
    }

    #[test]
    fn root_at_the_origin_is_degenerate() {
        let tree = TreeNode::new(ROOT_ID, "Root", Point::new(0.0, 300.0));
        let err = build_layers(&tree, &LayoutOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateBorder);
    }

    #[test]
    fn coincident_siblings_are_reported() {
        let tree = TreeNode::new(ROOT_ID, "Root", Point::new(500.0, 500.0))
            .with_child(TreeNode::new("a", "A", Point::new(250.0, 500.0)))
            .with_child(TreeNode::new("b", "B", Point::new(250.0, 500.0)));
        let err = build_layers(&tree, &LayoutOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CoincidentCenters);
    }
}
