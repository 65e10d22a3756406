// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use knowmap_geometry::{MorphStrategy, Polygon, Tolerance, morph, partition, voronoi_cells};
use kurbo::{Point, Rect};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_centers(count: usize, size: f64) -> Vec<(usize, Point)> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|i| (i, Point::new(rng.next_f64() * size, rng.next_f64() * size)))
        .collect()
}

/// A convex octagon inscribed in `size × size`.
fn octagon(size: f64) -> Polygon {
    let a = size * 0.3;
    let b = size - a;
    Polygon::new(vec![
        Point::new(a, 0.0),
        Point::new(b, 0.0),
        Point::new(size, a),
        Point::new(size, b),
        Point::new(b, size),
        Point::new(a, size),
        Point::new(0.0, b),
        Point::new(0.0, a),
    ])
    .unwrap()
}

fn bench_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition");
    let canvas = Polygon::from_rect(Rect::new(0.0, 0.0, 1000.0, 1000.0));
    let tolerance = Tolerance::default();
    for &n in &[4usize, 16, 64, 256] {
        let centers = gen_centers(n, 1000.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("rect_n{}", n), |b| {
            b.iter(|| black_box(partition(&canvas, &centers, &tolerance).unwrap()));
        });
    }
    let border = octagon(1000.0);
    let centers: Vec<_> = gen_centers(256, 1000.0)
        .into_iter()
        .filter(|(_, p)| border.contains(*p))
        .collect();
    group.bench_function("octagon_inside_only", |b| {
        b.iter(|| black_box(partition(&border, &centers, &tolerance).unwrap()));
    });
    group.finish();
}

fn bench_voronoi(c: &mut Criterion) {
    let mut group = c.benchmark_group("voronoi_cells");
    let bounds = Rect::new(0.0, 0.0, 1000.0, 1000.0);
    let tolerance = Tolerance::default();
    for &n in &[16usize, 256] {
        let centers: Vec<Point> = gen_centers(n, 1000.0).into_iter().map(|(_, p)| p).collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("n{}", n), |b| {
            b.iter(|| black_box(voronoi_cells(bounds, &centers, &tolerance).unwrap()));
        });
    }
    group.finish();
}

fn bench_morph(c: &mut Criterion) {
    let mut group = c.benchmark_group("morph");
    let old = Polygon::from_rect(Rect::new(0.0, 0.0, 1000.0, 1000.0));
    let new = octagon(900.0);
    let points = gen_centers(64, 1000.0);
    for strategy in [MorphStrategy::Radial, MorphStrategy::BoundingBox] {
        group.bench_function(format!("{:?}_n64", strategy), |b| {
            b.iter(|| black_box(morph(&old, &new, &points, strategy).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_partition, bench_voronoi, bench_morph);
criterion_main!(benches);
