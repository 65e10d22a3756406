// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position morpher: carry points across a change of border shape.
//!
//! Each point is normalized into a canonical frame of the old border and then
//! denormalized through the same kind of frame built on the new border. Two frames
//! are available:
//!
//! - [`RadialFrame`] expresses a point as a direction from the border centroid and
//!   the fraction of the way to the boundary along that direction. The canonical
//!   frame is the unit disk. For convex borders an interior point stays interior.
//! - [`UnitFrame`] is the affine map that sends the border's bounding box to
//!   `[0, 1] × [0, 1]`.
//!
//! With equal old and new borders either composition is the identity (up to
//! rounding).

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};

use crate::error::GeometryError;
use crate::polygon::Polygon;

/// How [`morph`] maps points between borders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MorphStrategy {
    /// Polar placement about the centroid; see [`RadialFrame`].
    #[default]
    Radial,
    /// Bounding-box proportional placement; see [`UnitFrame`].
    BoundingBox,
}

/// A normalize/denormalize pair tied to one border.
pub trait Frame {
    /// Express `pt` in the canonical frame.
    fn normalize(&self, pt: Point) -> Point;
    /// Map a canonical point back onto this border.
    fn denormalize(&self, pt: Point) -> Point;
}

/// Affine frame sending a border's bounding box to the unit square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitFrame {
    bounds: Rect,
}

impl UnitFrame {
    /// Frame of `border`'s bounding box.
    pub fn new(border: &Polygon) -> Result<Self, GeometryError> {
        let bounds = border.bounding_box();
        check_extent(bounds, border)?;
        Ok(Self { bounds })
    }
}

impl Frame for UnitFrame {
    fn normalize(&self, pt: Point) -> Point {
        Point::new(
            (pt.x - self.bounds.x0) / self.bounds.width(),
            (pt.y - self.bounds.y0) / self.bounds.height(),
        )
    }

    fn denormalize(&self, pt: Point) -> Point {
        Point::new(
            self.bounds.x0 + pt.x * self.bounds.width(),
            self.bounds.y0 + pt.y * self.bounds.height(),
        )
    }
}

/// Polar frame about a border's centroid; the canonical frame is the unit disk.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialFrame {
    center: Point,
    border: Polygon,
}

impl RadialFrame {
    /// Frame of `border` about its area centroid.
    pub fn new(border: &Polygon) -> Result<Self, GeometryError> {
        check_extent(border.bounding_box(), border)?;
        Ok(Self {
            center: border.centroid(),
            border: border.clone(),
        })
    }

    /// Distance from the centroid to the boundary along `dir`.
    fn reach(&self, dir: Vec2) -> f64 {
        let unit = dir.normalize();
        let mut best = f64::INFINITY;
        for (a, b) in self.border.edges() {
            let e = b - a;
            let denom = unit.cross(e);
            if denom.abs() <= f64::EPSILON * e.length() {
                continue;
            }
            let w = a - self.center;
            let s = w.cross(e) / denom;
            let u = w.cross(unit) / denom;
            if s > 0.0 && (-1e-12..=1.0 + 1e-12).contains(&u) && s < best {
                best = s;
            }
        }
        best
    }
}

impl Frame for RadialFrame {
    fn normalize(&self, pt: Point) -> Point {
        let d = pt - self.center;
        if d.length() == 0.0 {
            return Point::ZERO;
        }
        let reach = self.reach(d);
        if !reach.is_finite() {
            return Point::ZERO;
        }
        (d / reach).to_point()
    }

    fn denormalize(&self, pt: Point) -> Point {
        let n = pt.to_vec2();
        if n.length() == 0.0 {
            return self.center;
        }
        let reach = self.reach(n);
        if !reach.is_finite() {
            return self.center;
        }
        self.center + n * reach
    }
}

/// Re-express `points` (placed relative to `old`) relative to `new`.
///
/// Returns `(key, point)` pairs in input order. Fails with
/// [`GeometryError::DegenerateBorder`] if either border has a zero-width or
/// zero-height bounding box.
pub fn morph<K: Clone>(
    old: &Polygon,
    new: &Polygon,
    points: &[(K, Point)],
    strategy: MorphStrategy,
) -> Result<Vec<(K, Point)>, GeometryError> {
    match strategy {
        MorphStrategy::Radial => {
            let from = RadialFrame::new(old)?;
            let to = RadialFrame::new(new)?;
            Ok(remap(&from, &to, points))
        }
        MorphStrategy::BoundingBox => {
            let from = UnitFrame::new(old)?;
            let to = UnitFrame::new(new)?;
            Ok(remap(&from, &to, points))
        }
    }
}

fn remap<K: Clone>(from: &impl Frame, to: &impl Frame, points: &[(K, Point)]) -> Vec<(K, Point)> {
    points
        .iter()
        .map(|(k, p)| (k.clone(), to.denormalize(from.normalize(*p))))
        .collect()
}

fn check_extent(bounds: Rect, border: &Polygon) -> Result<(), GeometryError> {
    if bounds.width() > 0.0 && bounds.height() > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::DegenerateBorder {
            border: border.clone(),
        })
    }
}
