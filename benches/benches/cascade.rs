// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use knowmap_layers::{
    LayoutOptions, ROOT_ID, TreeIndex, TreeNode, Viewport, build_layers, find_current_node,
    update_position,
};
use kurbo::{Point, Rect, Size, Vec2};

/// A complete tree: each node splits its rectangle into a `fanout × fanout` grid.
fn grid_tree(fanout: usize, depth: usize) -> TreeNode {
    fn grow(id: String, rect: Rect, fanout: usize, depth: usize) -> TreeNode {
        let mut node = TreeNode::new(id.as_str(), id.as_str(), rect.center());
        if depth == 0 {
            return node;
        }
        let (w, h) = (rect.width() / fanout as f64, rect.height() / fanout as f64);
        for y in 0..fanout {
            for x in 0..fanout {
                let x0 = rect.x0 + x as f64 * w;
                let y0 = rect.y0 + y as f64 * h;
                let cell = Rect::new(x0, y0, x0 + w, y0 + h);
                node.children
                    .push(grow(format!("{}.{}{}", id, x, y), cell, fanout, depth - 1));
            }
        }
        node
    }
    grow(ROOT_ID.to_string(), Rect::new(0.0, 0.0, 4000.0, 4000.0), fanout, depth)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_layers");
    let options = LayoutOptions::default();
    for &depth in &[2usize, 3, 4] {
        let tree = grid_tree(2, depth);
        group.throughput(Throughput::Elements(tree.count() as u64));
        group.bench_function(format!("grid2x2_depth{}", depth), |b| {
            b.iter(|| black_box(build_layers(&tree, &options).unwrap()));
        });
    }
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_position");
    let options = LayoutOptions::default();
    let tree = grid_tree(2, 5);
    let index = TreeIndex::from_tree(&tree).unwrap();
    let layers = build_layers(&tree, &options).unwrap();

    // Nudging a leaf re-tiles only its siblings.
    let leaf = "root.00.00.00.00.00";
    let at = layers.find(leaf).unwrap().1.center + Vec2::new(5.0, 5.0);
    group.bench_function("leaf_nudge", |b| {
        b.iter_batched(
            || layers.clone(),
            |mut layers| black_box(update_position(&mut layers, &index, leaf, at, &options)),
            BatchSize::SmallInput,
        )
    });

    // Moving a top-level node cascades through the whole map.
    let top = "root.00";
    let at = layers.find(top).unwrap().1.center + Vec2::new(150.0, 150.0);
    group.bench_function("top_level_cascade", |b| {
        b.iter_batched(
            || layers.clone(),
            |mut layers| black_box(update_position(&mut layers, &index, top, at, &options)),
            BatchSize::SmallInput,
        )
    });

    let capped = LayoutOptions::default().with_max_cascade_depth(1);
    group.bench_function("top_level_cascade_capped", |b| {
        b.iter_batched(
            || layers.clone(),
            |mut layers| black_box(update_position(&mut layers, &index, top, at, &capped)),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_viewport(c: &mut Criterion) {
    let options = LayoutOptions::default();
    let tree = grid_tree(2, 5);
    let index = TreeIndex::from_tree(&tree).unwrap();
    let layers = build_layers(&tree, &options).unwrap();
    let viewport = Viewport::new(Size::new(1000.0, 1000.0)).with_zoom(8.0);
    c.bench_function("find_current_node_zoomed", |b| {
        b.iter(|| {
            black_box(find_current_node(
                &layers,
                &index,
                &viewport,
                Point::new(500.0, 500.0),
                &options,
            ))
        })
    });
}

criterion_group!(benches, bench_build, bench_update, bench_viewport);
criterion_main!(benches);
