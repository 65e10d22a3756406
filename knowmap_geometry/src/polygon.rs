// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygon kernel: a closed ring of points and the primitive operations on it.
//!
//! Vector arithmetic itself is Kurbo's: `Point + Vec2`, `Point - Point`,
//! [`Vec2::length`], [`Affine`] transforms. This module adds the operations that
//! Kurbo does not carry for plain vertex rings: shoelace area, boundary-inclusive
//! containment, longest diagonal and ring comparison.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, BezPath, Line, Point, Rect, Vec2};

use crate::error::GeometryError;
use crate::tolerance::{Tolerance, diagonal};

/// A simple closed polygon.
///
/// The ring holds at least three vertices and does not repeat the first vertex at
/// the end. Winding is whatever the producer used; [`Polygon::signed_area`]
/// reports it.
///
/// Behavior is unspecified for self-intersecting or zero-area rings; producers in
/// this crate never emit them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Create a polygon from its vertices.
    ///
    /// Fails with [`GeometryError::InvalidPolygon`] when fewer than three vertices
    /// are supplied or a coordinate is not finite.
    pub fn new(points: Vec<Point>) -> Result<Self, GeometryError> {
        if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
            return Err(GeometryError::InvalidPolygon { len: points.len() });
        }
        Ok(Self { points })
    }

    /// The four corners of `rect`, starting at its minimum corner.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            points: alloc::vec![
                Point::new(rect.x0, rect.y0),
                Point::new(rect.x1, rect.y0),
                Point::new(rect.x1, rect.y1),
                Point::new(rect.x0, rect.y1),
            ],
        }
    }

    pub(crate) fn from_ring(points: Vec<Point>) -> Self {
        debug_assert!(points.len() >= 3, "rings handed out must have 3+ vertices");
        Self { points }
    }

    /// The vertices in ring order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed polygon; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate the edges `(start, end)`, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Axis-aligned bounding box. Its `(x0, y0)` and `(x1, y1)` are the minimum and
    /// maximum corners.
    pub fn bounding_box(&self) -> Rect {
        let first = self.points[0];
        self.points[1..]
            .iter()
            .fold(Rect::from_points(first, first), |r, p| r.union_pt(*p))
    }

    /// Signed area by the shoelace formula.
    ///
    /// Positive for rings that turn from +x towards +y (clockwise on a y-down
    /// canvas), negative for the opposite winding.
    pub fn signed_area(&self) -> f64 {
        let twice: f64 = self
            .edges()
            .map(|(a, b)| a.to_vec2().cross(b.to_vec2()))
            .sum();
        0.5 * twice
    }

    /// Unsigned geometric area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area centroid. Falls back to the vertex average for zero-area rings.
    pub fn centroid(&self) -> Point {
        // Shift to the first vertex to keep the products small.
        let origin = self.points[0].to_vec2();
        let mut twice_area = 0.0;
        let mut acc = Vec2::ZERO;
        for (a, b) in self.edges() {
            let (a, b) = (a.to_vec2() - origin, b.to_vec2() - origin);
            let cross = a.cross(b);
            twice_area += cross;
            acc += (a + b) * cross;
        }
        let diag = diagonal(self.bounding_box());
        if twice_area.abs() <= f64::EPSILON * diag * diag {
            let sum = self
                .points
                .iter()
                .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
            return (sum / self.points.len() as f64).to_point();
        }
        (origin + acc / (3.0 * twice_area)).to_point()
    }

    /// Whether `pt` lies inside the polygon or on its boundary.
    ///
    /// Boundary proximity uses the default [`Tolerance`] relative to this polygon's
    /// bounding box.
    pub fn contains(&self, pt: Point) -> bool {
        self.contains_within(pt, Tolerance::default().absolute(self.bounding_box()))
    }

    /// Like [`Polygon::contains`] with an explicit absolute boundary tolerance.
    pub fn contains_within(&self, pt: Point, tolerance: f64) -> bool {
        if self
            .edges()
            .any(|(a, b)| segment_distance(pt, a, b) <= tolerance)
        {
            return true;
        }
        // Even-odd ray cast towards +x.
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > pt.y) != (b.y > pt.y) {
                let x = a.x + (pt.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if pt.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Whether every turn has the same orientation (collinear vertices allowed).
    pub fn is_convex(&self) -> bool {
        let n = self.points.len();
        let diag = diagonal(self.bounding_box());
        let tol = f64::EPSILON * diag * diag;
        let mut sign = 0.0_f64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let c = self.points[(i + 2) % n];
            let turn = (b - a).cross(c - b);
            if turn.abs() <= tol {
                continue;
            }
            if sign == 0.0 {
                sign = turn.signum();
            } else if turn.signum() != sign {
                return false;
            }
        }
        true
    }

    /// The longest segment between two vertices (adjacent pairs included).
    ///
    /// `line.p1 - line.p0` is the diagonal vector used to seed new-node placement.
    pub fn max_diagonal(&self) -> Line {
        let mut best = Line::new(self.points[0], self.points[1]);
        let mut best_len = 0.0;
        for (i, a) in self.points.iter().enumerate() {
            for b in &self.points[i + 1..] {
                let len = (*b - *a).length_squared();
                if len > best_len {
                    best_len = len;
                    best = Line::new(*a, *b);
                }
            }
        }
        best
    }

    /// Scale every vertex about the origin.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            points: self.points.iter().map(|p| scale_point(*p, factor)).collect(),
        }
    }

    /// Translate every vertex.
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            points: self.points.iter().map(|p| *p + offset).collect(),
        }
    }

    /// Apply an affine transform to every vertex.
    pub fn transform(&self, affine: Affine) -> Self {
        Self {
            points: self.points.iter().map(|p| affine * *p).collect(),
        }
    }

    /// Closed Kurbo path through the vertices, for renderers.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.points[0]);
        for p in &self.points[1..] {
            path.line_to(*p);
        }
        path.close_path();
        path
    }

    /// Rotate the ring so it starts at the vertex with the smallest `y`, breaking
    /// ties by the smallest `x`. Winding is preserved.
    pub fn canonicalize(&mut self) {
        let start = self
            .points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.y.partial_cmp(&b.y)
                    .unwrap_or(core::cmp::Ordering::Equal)
                    .then(a.x.partial_cmp(&b.x).unwrap_or(core::cmp::Ordering::Equal))
            })
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.points.rotate_left(start);
    }

    /// Whether both rings visit the same vertices in the same cyclic order, each
    /// coordinate within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        let n = self.points.len();
        if n != other.points.len() {
            return false;
        }
        (0..n).any(|shift| {
            (0..n).all(|i| {
                let a = self.points[i];
                let b = other.points[(i + shift) % n];
                (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
            })
        })
    }
}

/// Scale a point about the origin.
pub fn scale_point(pt: Point, factor: f64) -> Point {
    (pt.to_vec2() * factor).to_point()
}

/// Euclidean distance from `pt` to the segment `a..b`.
pub(crate) fn segment_distance(pt: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return (pt - a).length();
    }
    let t = ((pt - a).dot(ab) / len2).clamp(0.0, 1.0);
    (pt - (a + ab * t)).length()
}

/// Drop consecutive duplicates and collinear middle vertices from a ring.
pub(crate) fn simplify_ring(ring: &mut Vec<Point>, tolerance: f64) {
    ring.dedup_by(|b, a| (*b - *a).length() <= tolerance);
    while ring.len() > 1 && (ring[0] - ring[ring.len() - 1]).length() <= tolerance {
        ring.pop();
    }
    let mut i = 0;
    while ring.len() >= 3 && i < ring.len() {
        let n = ring.len();
        let prev = ring[(i + n - 1) % n];
        let next = ring[(i + 1) % n];
        if segment_distance(ring[i], prev, next) <= tolerance {
            ring.remove(i);
            // The previous vertex may have become collinear with its new neighbour.
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn square(size: f64) -> Polygon {
        Polygon::from_rect(Rect::new(0.0, 0.0, size, size))
    }

    #[test]
    fn rejects_short_rings() {
        let err = Polygon::new(vec![Point::ZERO, Point::new(1.0, 0.0)]).unwrap_err();
        assert_eq!(err, GeometryError::InvalidPolygon { len: 2 });
        let with_nan = vec![Point::ZERO, Point::new(f64::NAN, 0.0), Point::new(0.0, 1.0)];
        assert!(Polygon::new(with_nan).is_err());
    }

    #[test]
    fn area_sign_follows_winding() {
        let cw = square(10.0);
        assert_eq!(cw.signed_area(), 100.0);
        let mut pts = cw.points().to_vec();
        pts.reverse();
        let ccw = Polygon::new(pts).unwrap();
        assert_eq!(ccw.signed_area(), -100.0);
        assert_eq!(ccw.area(), 100.0);
    }

    #[test]
    fn bounding_box_of_triangle() {
        let tri = Polygon::new(vec![
            Point::new(2.0, 5.0),
            Point::new(-1.0, 3.0),
            Point::new(4.0, -2.0),
        ])
        .unwrap();
        assert_eq!(tri.bounding_box(), Rect::new(-1.0, -2.0, 4.0, 5.0));
    }

    #[test]
    fn contains_interior_boundary_and_outside() {
        let sq = square(10.0);
        assert!(sq.contains(Point::new(5.0, 5.0)));
        assert!(sq.contains(Point::new(0.0, 5.0)), "edges count as inside");
        assert!(sq.contains(Point::new(10.0, 10.0)), "corners count as inside");
        assert!(!sq.contains(Point::new(10.5, 5.0)));
        assert!(!sq.contains(Point::new(-0.1, -0.1)));
    }

    #[test]
    fn contains_handles_concave_rings() {
        // An L shape with the notch at the top right.
        let l = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 5.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
        .unwrap();
        assert!(l.contains(Point::new(2.0, 2.0)));
        assert!(l.contains(Point::new(8.0, 8.0)));
        assert!(!l.contains(Point::new(8.0, 2.0)));
        assert!(!l.is_convex());
        assert!(square(1.0).is_convex());
    }

    #[test]
    fn centroid_of_rect_is_its_center() {
        let r = Polygon::from_rect(Rect::new(100.0, 200.0, 300.0, 600.0));
        let c = r.centroid();
        assert!((c.x - 200.0).abs() < 1e-9);
        assert!((c.y - 400.0).abs() < 1e-9);
    }

    #[test]
    fn max_diagonal_of_rect_is_a_diagonal() {
        let r = Polygon::from_rect(Rect::new(0.0, 0.0, 30.0, 40.0));
        let d = r.max_diagonal();
        assert_eq!((d.p1 - d.p0).length(), 50.0);
    }

    #[test]
    fn scale_translate_transform_agree() {
        let sq = square(2.0);
        assert_eq!(sq.scale(3.0), square(6.0));
        let moved = sq.translate(Vec2::new(1.0, 1.0));
        assert_eq!(moved.bounding_box(), Rect::new(1.0, 1.0, 3.0, 3.0));
        assert_eq!(sq.transform(Affine::scale(3.0)), sq.scale(3.0));
        assert_eq!(scale_point(Point::new(1.0, -2.0), 2.0), Point::new(2.0, -4.0));
    }

    #[test]
    fn canonicalize_and_approx_eq() {
        let mut ring = Polygon::new(vec![
            Point::new(500.0, 0.0),
            Point::new(500.0, 1000.0),
            Point::new(0.0, 1000.0),
            Point::new(0.0, 0.0),
        ])
        .unwrap();
        let expected = Polygon::from_rect(Rect::new(0.0, 0.0, 500.0, 1000.0));
        assert!(ring.approx_eq(&expected, 1e-9));
        ring.canonicalize();
        assert_eq!(ring, expected);
        assert!(!ring.approx_eq(&square(500.0), 1e-9));
    }

    #[test]
    fn simplify_removes_duplicates_and_collinear_vertices() {
        let mut ring = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
        ];
        simplify_ring(&mut ring, 1e-9);
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn bez_path_is_closed() {
        let path = square(1.0).to_bez_path();
        assert_eq!(path.elements().len(), 5);
    }
}
