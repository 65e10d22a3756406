// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two children.
//!
//! Lay out a root with two children and print the resulting borders, then
//! export one of them as an SVG path.
//!
//! Run:
//! - `cargo run -p knowmap_demos --example two_children`

use knowmap_layers::{LayoutOptions, ROOT_ID, TreeNode, build_layers};
use kurbo::Point;

fn main() {
    let tree = TreeNode::new(ROOT_ID, "Ideas", Point::new(500.0, 500.0))
        .with_child(TreeNode::new("left", "Rust", Point::new(250.0, 500.0)))
        .with_child(TreeNode::new("right", "Geometry", Point::new(750.0, 500.0)));

    let layers = build_layers(&tree, &LayoutOptions::default()).unwrap();
    for layer in layers.layers() {
        for id in layer.sorted_ids() {
            let node = layer.get(id.as_str()).unwrap();
            println!(
                "depth {} {:>6} center {:?} border {:?}",
                layer.depth(),
                node.id,
                node.center,
                node.border.points()
            );
        }
    }

    // The bisector of the two centers is the line x = 500.
    let left = &layers.get(1, "left").unwrap().border;
    assert!((left.bounding_box().x1 - 500.0).abs() < 1e-9);
    println!("svg: {}", left.to_bez_path().to_svg());
}
