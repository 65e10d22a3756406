// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=knowmap_geometry --heading-base-level=0

//! Knowmap Geometry: the polygon machinery behind nested knowledge maps.
//!
//! A knowledge map draws every node of a tree as a polygon nested inside its
//! parent's polygon. This crate provides the three geometric building blocks:
//!
//! - [`Polygon`]: a closed vertex ring with shoelace area, boundary-inclusive
//!   containment, centroid, longest diagonal and Kurbo interop.
//! - [`partition`]: tile an outer border with one convex proximity (Voronoi) cell
//!   per generator point, each clipped to the border.
//! - [`morph`]: move a set of points so they keep their relative placement when
//!   the border they live in changes shape.
//!
//! Points, vectors, rectangles and transforms are [`kurbo`] types. Proximity
//! neighbours come from a [`spade`] Delaunay triangulation; clipping is a
//! Sutherland–Hodgman pass per half-plane that also detects disconnected output
//! (see [`clip`]).
//!
//! ## Tolerances
//!
//! Floating-point comparisons are relative to the size of the region being
//! processed. [`Tolerance`] carries the relative epsilon (default `1e-6` of the
//! bounding box diagonal) and the margin by which the partitioner expands the
//! outer bounding box.
//!
//! ## Errors
//!
//! Every fallible operation returns [`GeometryError`]. The variants describe which
//! geometric invariant failed and carry the offending polygons.
//!
//! # Example
//!
//! ```rust
//! use knowmap_geometry::{Polygon, Tolerance, partition};
//! use kurbo::{Point, Rect};
//!
//! let canvas = Polygon::from_rect(Rect::new(0.0, 0.0, 1000.0, 1000.0));
//! let centers = [("left", Point::new(250.0, 500.0)), ("right", Point::new(750.0, 500.0))];
//! let cells = partition(&canvas, &centers, &Tolerance::default()).unwrap();
//!
//! // The bisector of the two centers splits the canvas at x = 500.
//! let left = Polygon::from_rect(Rect::new(0.0, 0.0, 500.0, 1000.0));
//! assert!(cells[0].1.approx_eq(&left, 1e-6));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod clip;
pub mod error;
pub mod morph;
pub mod partition;
pub mod polygon;
pub mod tolerance;

pub use error::{ErrorKind, GeometryError};
pub use morph::{Frame, MorphStrategy, RadialFrame, UnitFrame, morph};
pub use partition::{partition, voronoi_cells};
pub use polygon::{Polygon, scale_point};
pub use tolerance::Tolerance;
