// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Move and zoom.
//!
//! Load a small map, drag a node, add a child at a suggested spot, then zoom in
//! and list the layers a renderer would draw.
//!
//! Run:
//! - `cargo run -p knowmap_demos --example move_and_zoom`

use knowmap_layers::{
    KnowledgeMap, LayoutOptions, MapEvent, PositionUpdate, ROOT_ID, TreeNode, Viewport,
};
use kurbo::{Point, Size, Vec2};

fn main() {
    let tree = TreeNode::new(ROOT_ID, "Projects", Point::new(800.0, 600.0))
        .with_child(
            TreeNode::new("web", "Web", Point::new(400.0, 400.0))
                .with_child(TreeNode::new("api", "API", Point::new(300.0, 300.0)))
                .with_child(TreeNode::new("ui", "UI", Point::new(500.0, 700.0))),
        )
        .with_child(
            TreeNode::new("infra", "Infra", Point::new(1200.0, 800.0))
                .with_child(TreeNode::new("ci", "CI", Point::new(1100.0, 700.0))),
        );
    let mut map = KnowledgeMap::load(tree, LayoutOptions::default()).unwrap();

    // Drag `web` to the right; its children follow and `infra` shrinks.
    let outcome = map
        .apply(MapEvent::Moved {
            id: "web".into(),
            position: Point::new(600.0, 450.0),
        })
        .unwrap();
    if let knowmap_layers::EventOutcome::Moved(PositionUpdate::Applied(report)) = outcome {
        for change in &report.changes {
            println!("{:>6} at depth {}: {:?}", change.id, change.depth, change.flags);
        }
    }

    // Dropping a node outside its parent is ignored.
    let cancelled = map.move_node("ci", Point::new(10.0, 10.0)).unwrap();
    assert!(cancelled.is_cancelled());

    let at = map.suggest_child_position("infra").unwrap();
    map.apply(MapEvent::Added {
        parent: "infra".into(),
        node: TreeNode::new("deploy", "Deploy", at),
    })
    .unwrap();
    println!("deploy placed at {:?}", at);

    // Zoom into the top-left of the map.
    let viewport = Viewport::new(Size::new(800.0, 600.0))
        .with_zoom(2.0)
        .with_pan(Vec2::new(-200.0, -200.0));
    let current = map.current_node(&viewport, Point::new(400.0, 300.0)).unwrap();
    println!("current node: {}", current);
    for layer in map.visible_layers(current.as_str()).unwrap() {
        let titles: Vec<_> = layer
            .sorted_ids()
            .into_iter()
            .map(|id| {
                let node = layer.get(id.as_str()).unwrap();
                if node.title.is_empty() {
                    format!("({})", id)
                } else {
                    node.title.clone()
                }
            })
            .collect();
        println!("depth {}: {}", layer.depth(), titles.join(", "));
    }
}
