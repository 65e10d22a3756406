// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numeric tolerances shared by the kernel, the clipper and the partitioner.

use kurbo::{Rect, Vec2};

/// Tolerances used when comparing floating-point geometry.
///
/// Both values are relative to the diagonal of the bounding box of the region
/// being processed, so the same settings work for a `1000×1000` canvas and for a
/// tiny nested cell.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerance {
    /// Distances below `relative_epsilon * diagonal` are treated as zero.
    pub relative_epsilon: f64,
    /// The partitioner expands the outer bounding box by `bounds_margin * diagonal`
    /// on every side before building proximity cells.
    pub bounds_margin: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            relative_epsilon: 1e-6,
            bounds_margin: 1e-3,
        }
    }
}

impl Tolerance {
    /// Absolute distance tolerance for a region with the given bounds.
    pub fn absolute(&self, bounds: Rect) -> f64 {
        self.relative_epsilon * diagonal(bounds)
    }

    /// `bounds` grown by the configured margin on every side.
    pub fn expand(&self, bounds: Rect) -> Rect {
        let m = self.bounds_margin * diagonal(bounds);
        bounds.inflate(m, m)
    }
}

pub(crate) fn diagonal(bounds: Rect) -> f64 {
    Vec2::new(bounds.width(), bounds.height()).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_scales_with_diagonal() {
        let tol = Tolerance::default();
        let small = tol.absolute(Rect::new(0.0, 0.0, 3.0, 4.0));
        let large = tol.absolute(Rect::new(0.0, 0.0, 300.0, 400.0));
        assert!((small - 5e-6).abs() < 1e-12);
        assert!((large - 5e-4).abs() < 1e-12);
    }

    #[test]
    fn expand_grows_every_side() {
        let tol = Tolerance {
            relative_epsilon: 1e-6,
            bounds_margin: 0.1,
        };
        let r = tol.expand(Rect::new(0.0, 0.0, 30.0, 40.0));
        assert_eq!(r, Rect::new(-5.0, -5.0, 35.0, 45.0));
    }
}
