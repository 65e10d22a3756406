// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout configuration.

use knowmap_geometry::{MorphStrategy, Tolerance};

/// Knobs shared by building, updating and viewport selection.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    /// Floating-point tolerances for geometry.
    pub tolerance: Tolerance,
    /// Fraction of the viewport area below which a region is too small to zoom
    /// into. Defaults to `0.5`.
    pub zoom_threshold: f64,
    /// Maximum number of layers a move may cascade through below the moved
    /// node's siblings. `None` is unbounded.
    ///
    /// Truncating a cascade leaves deeper descendants with their previous
    /// borders, so they no longer tile their parents exactly.
    pub max_cascade_depth: Option<usize>,
    /// How descendants of a reshaped node are carried into its new border.
    pub morph_strategy: MorphStrategy,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            zoom_threshold: 0.5,
            max_cascade_depth: None,
            morph_strategy: MorphStrategy::Radial,
        }
    }
}

impl LayoutOptions {
    /// Set [`max_cascade_depth`](Self::max_cascade_depth).
    #[must_use]
    pub fn with_max_cascade_depth(mut self, depth: usize) -> Self {
        self.max_cascade_depth = Some(depth);
        self
    }

    /// Set [`zoom_threshold`](Self::zoom_threshold).
    #[must_use]
    pub fn with_zoom_threshold(mut self, threshold: f64) -> Self {
        self.zoom_threshold = threshold;
        self
    }
}
