// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Half-plane clipping (Sutherland–Hodgman) with disconnection detection.
//!
//! Sutherland–Hodgman keeps the output as a single ring even when a non-convex
//! subject falls apart into several pieces; the pieces are then joined by
//! zero-width bridges along the clip line. To notice that, every clip step also
//! counts connected components: each inside run of the subject boundary starts and
//! ends on the clip line, and after sorting the crossings along the line the
//! spans between crossing `2k` and `2k + 1` lie inside the subject and glue the
//! runs at their ends together.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::polygon::{Polygon, simplify_ring};

/// The closed half-plane `{ p : (p - origin) · normal <= 0 }`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfPlane {
    /// A point on the boundary line.
    pub origin: Point,
    /// Outward normal; points on this side are clipped away.
    pub normal: Vec2,
}

impl HalfPlane {
    /// Half-plane through `origin` that discards the side `normal` points to.
    pub const fn new(origin: Point, normal: Vec2) -> Self {
        Self { origin, normal }
    }

    /// Points at least as close to `keep` as to `other`.
    pub fn bisector(keep: Point, other: Point) -> Self {
        Self {
            origin: keep.midpoint(other),
            normal: other - keep,
        }
    }

    /// The side of the line through `a` and `b` that contains `interior`.
    pub fn from_edge(a: Point, b: Point, interior: Point) -> Self {
        let d = b - a;
        let mut normal = Vec2::new(d.y, -d.x);
        if (interior - a).dot(normal) > 0.0 {
            normal = -normal;
        }
        Self { origin: a, normal }
    }

    /// Signed distance of `p` from the boundary line; negative inside.
    pub fn signed_distance(&self, p: Point) -> f64 {
        (p - self.origin).dot(self.normal) / self.normal.length()
    }

    fn along(&self, p: Point) -> f64 {
        (p - self.origin).dot(Vec2::new(-self.normal.y, self.normal.x))
    }
}

/// Result of clipping one ring against one half-plane.
#[derive(Clone, Debug, PartialEq)]
pub struct Clipped {
    /// Surviving ring; empty when nothing is left.
    pub ring: Vec<Point>,
    /// Number of connected components the ring describes.
    pub pieces: usize,
}

/// Clip `ring` against `plane`.
///
/// Vertices within `tolerance` of the line are snapped onto it and count as
/// inside. Crossings always lie on the subject's own edges, so no output vertex
/// leaves the subject. Runs that only graze the line (every vertex snapped onto
/// it) add no area and are not counted as pieces.
pub fn clip_ring(ring: &[Point], plane: &HalfPlane, tolerance: f64) -> Clipped {
    let n = ring.len();
    let dist: Vec<f64> = ring
        .iter()
        .map(|p| {
            let d = plane.signed_distance(*p);
            if d.abs() <= tolerance { 0.0 } else { d }
        })
        .collect();
    let inside = |i: usize| dist[i] <= 0.0;

    // Start the walk on an outside vertex so every inside run opens with an entry
    // crossing and closes with an exit crossing.
    let Some(start) = (0..n).find(|&i| !inside(i)) else {
        return Clipped {
            ring: ring.to_vec(),
            pieces: usize::from(n > 0),
        };
    };

    let mut out = Vec::with_capacity(n + 2);
    // (position along the clip line, run id)
    let mut crossings: Vec<(f64, usize)> = Vec::new();
    // Whether each run reaches strictly inside the line.
    let mut solid: Vec<bool> = Vec::new();
    for k in 0..n {
        let i = (start + k) % n;
        let j = (i + 1) % n;
        let (cur, next) = (ring[i], ring[j]);
        match (inside(i), inside(j)) {
            (true, true) => {
                out.push(next);
                if let Some(last) = solid.last_mut() {
                    *last |= dist[j] < 0.0;
                }
            }
            (true, false) => {
                let x = intersect(cur, next, dist[i], dist[j]);
                crossings.push((plane.along(x), solid.len() - 1));
                out.push(x);
            }
            (false, true) => {
                let x = intersect(cur, next, dist[i], dist[j]);
                crossings.push((plane.along(x), solid.len()));
                solid.push(dist[j] < 0.0);
                out.push(x);
                out.push(next);
            }
            (false, false) => {}
        }
    }
    if !solid.contains(&true) {
        return Clipped {
            ring: Vec::new(),
            pieces: 0,
        };
    }

    // A grazing run's two crossings coincide; dropping both keeps the pairing.
    crossings.retain(|(_, run)| solid[*run]);
    crossings.sort_by(|a, b| a.0.total_cmp(&b.0));
    let runs = solid.len();
    let mut parent: Vec<usize> = (0..runs).collect();
    for pair in crossings.chunks_exact(2) {
        union(&mut parent, pair[0].1, pair[1].1);
    }
    let pieces = (0..runs)
        .filter(|&r| solid[r] && find(&mut parent, r) == r)
        .count();
    Clipped { ring: out, pieces }
}

/// Outcome of intersecting a subject polygon with a convex clip polygon.
#[derive(Clone, Debug, PartialEq)]
pub enum ClipOutcome {
    /// Nothing of the subject is inside the clip polygon.
    Empty,
    /// A single connected polygon.
    Single(Polygon),
    /// The intersection fell apart into this many pieces.
    Disjoint(usize),
}

/// Intersect `subject` (any simple polygon) with `convex`.
///
/// `tolerance` is an absolute distance; pieces with area below
/// `tolerance * diagonal` count as empty.
pub fn intersect_convex(subject: &Polygon, convex: &Polygon, tolerance: f64) -> ClipOutcome {
    let interior = convex.centroid();
    let mut ring = subject.points().to_vec();
    for (a, b) in convex.edges() {
        if (b - a).length() <= tolerance {
            continue;
        }
        let plane = HalfPlane::from_edge(a, b, interior);
        let clipped = clip_ring(&ring, &plane, tolerance);
        if clipped.pieces > 1 {
            return ClipOutcome::Disjoint(clipped.pieces);
        }
        ring = clipped.ring;
        if ring.is_empty() {
            return ClipOutcome::Empty;
        }
    }
    finish(ring, tolerance)
}

/// Intersect `subject` with a set of half-planes.
pub fn intersect_half_planes(
    subject: &Polygon,
    planes: impl IntoIterator<Item = HalfPlane>,
    tolerance: f64,
) -> ClipOutcome {
    let mut ring = subject.points().to_vec();
    for plane in planes {
        let clipped = clip_ring(&ring, &plane, tolerance);
        if clipped.pieces > 1 {
            return ClipOutcome::Disjoint(clipped.pieces);
        }
        ring = clipped.ring;
        if ring.is_empty() {
            return ClipOutcome::Empty;
        }
    }
    finish(ring, tolerance)
}

fn finish(mut ring: Vec<Point>, tolerance: f64) -> ClipOutcome {
    simplify_ring(&mut ring, tolerance);
    if ring.len() < 3 {
        return ClipOutcome::Empty;
    }
    let poly = Polygon::from_ring(ring);
    let bounds = poly.bounding_box();
    let extent = bounds.width().max(bounds.height());
    if poly.area() <= tolerance * extent {
        return ClipOutcome::Empty;
    }
    ClipOutcome::Single(poly)
}

/// Where the line crosses `a..b`, given `da <= 0 < db` or `db <= 0 < da`.
fn intersect(a: Point, b: Point, da: f64, db: f64) -> Point {
    let t = (da / (da - db)).clamp(0.0, 1.0);
    a.lerp(b, t)
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let (ra, rb) = (find(parent, a), find(parent, b));
    if ra != rb {
        parent[rb] = ra;
    }
}
