// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell partitioner: tile a border with one proximity cell per generator.
//!
//! The proximity (Voronoi) cell of a generator is the intersection of the
//! half-planes bounded by the perpendicular bisectors towards its Delaunay
//! neighbours. Neighbours come from a [`spade`] triangulation; cells are first
//! bounded by the slightly expanded bounding box of the outer border and then
//! intersected with the border itself.

use alloc::vec::Vec;

use kurbo::{Point, Rect};
use spade::{DelaunayTriangulation, Point2, Triangulation};

use crate::clip::{ClipOutcome, HalfPlane, intersect_convex, intersect_half_planes};
use crate::error::GeometryError;
use crate::polygon::Polygon;
use crate::tolerance::Tolerance;

/// Bounded proximity cells of `centers` inside `bounds`, in input order.
///
/// Cells are convex and tile `bounds`. Centers must be pairwise distinct.
pub fn voronoi_cells(
    bounds: Rect,
    centers: &[Point],
    tolerance: &Tolerance,
) -> Result<Vec<Polygon>, GeometryError> {
    let frame = Polygon::from_rect(bounds);
    let eps = tolerance.absolute(bounds);
    let neighbours = delaunay_neighbours(centers, &frame)?;
    let mut cells = Vec::with_capacity(centers.len());
    for (i, near) in neighbours.iter().enumerate() {
        let planes = near
            .iter()
            .map(|&j| HalfPlane::bisector(centers[i], centers[j]));
        match intersect_half_planes(&frame, planes, eps) {
            ClipOutcome::Single(cell) => cells.push(cell),
            // Cells of centers outside `bounds` can vanish entirely.
            ClipOutcome::Empty | ClipOutcome::Disjoint(_) => {
                return Err(GeometryError::NoIntersection {
                    index: i,
                    cell: frame.clone(),
                    border: frame,
                });
            }
        }
    }
    Ok(cells)
}

/// Tile `outer` with one cell per center.
///
/// Returns `(key, cell)` pairs in the order of `centers`. The cells cover `outer`
/// without gaps or overlaps (up to the configured tolerance) and each cell
/// contains its own center.
///
/// Centers on the boundary of `outer` are accepted. Fails with
/// [`GeometryError::NoIntersection`] when a center lies outside `outer`,
/// [`GeometryError::CoincidentCenters`] when two centers coincide,
/// [`GeometryError::DegenerateBorder`] when `outer` has no extent, and
/// [`GeometryError::MultipleIntersections`] when a cell clips into disjoint
/// pieces (only possible for non-convex borders).
///
/// The result depends only on the inputs: calling this twice yields identical
/// polygons.
pub fn partition<K: Clone>(
    outer: &Polygon,
    centers: &[(K, Point)],
    tolerance: &Tolerance,
) -> Result<Vec<(K, Polygon)>, GeometryError> {
    if centers.is_empty() {
        return Ok(Vec::new());
    }
    let bounds = outer.bounding_box();
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Err(GeometryError::DegenerateBorder {
            border: outer.clone(),
        });
    }
    let eps = tolerance.absolute(bounds);
    let points: Vec<Point> = centers.iter().map(|(_, p)| *p).collect();
    for (index, p) in points.iter().enumerate() {
        if !outer.contains_within(*p, eps) {
            return Err(GeometryError::NoIntersection {
                index,
                cell: Polygon::from_rect(Rect::from_points(*p, *p).inflate(eps, eps)),
                border: outer.clone(),
            });
        }
    }

    let cells = voronoi_cells(tolerance.expand(bounds), &points, tolerance)?;
    let mut out = Vec::with_capacity(centers.len());
    for (index, ((key, _), cell)) in centers.iter().zip(cells).enumerate() {
        match intersect_convex(outer, &cell, eps) {
            ClipOutcome::Single(mut clipped) => {
                clipped.canonicalize();
                out.push((key.clone(), clipped));
            }
            ClipOutcome::Empty => {
                return Err(GeometryError::NoIntersection {
                    index,
                    cell,
                    border: outer.clone(),
                });
            }
            ClipOutcome::Disjoint(pieces) => {
                return Err(GeometryError::MultipleIntersections {
                    index,
                    pieces,
                    border: outer.clone(),
                });
            }
        }
    }
    Ok(out)
}

/// For every center, the indices of its Delaunay neighbours.
fn delaunay_neighbours(
    centers: &[Point],
    frame: &Polygon,
) -> Result<Vec<Vec<usize>>, GeometryError> {
    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    // Vertex handle index -> input index. Handles are dense because nothing is
    // ever removed from this triangulation.
    let mut slot_of: Vec<usize> = Vec::with_capacity(centers.len());
    for (i, c) in centers.iter().enumerate() {
        let handle = triangulation
            .insert(Point2::new(c.x, c.y))
            .map_err(|_| GeometryError::NoIntersection {
                index: i,
                cell: frame.clone(),
                border: frame.clone(),
            })?;
        if handle.index() < slot_of.len() {
            return Err(GeometryError::CoincidentCenters {
                first: slot_of[handle.index()],
                second: i,
            });
        }
        slot_of.push(i);
    }

    let mut neighbours = alloc::vec![Vec::new(); centers.len()];
    for vertex in triangulation.vertices() {
        let i = slot_of[vertex.fix().index()];
        for edge in vertex.out_edges() {
            neighbours[i].push(slot_of[edge.to().fix().index()]);
        }
        // Sorted so clipping order, and thus the output ring, is reproducible.
        neighbours[i].sort_unstable();
    }
    Ok(neighbours)
}
