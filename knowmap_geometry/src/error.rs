// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised by geometric operations.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use crate::polygon::Polygon;

/// Classification of a layout failure, shared by every error in the workspace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// A generator or focus point lies outside the region it should fall in.
    NoIntersection,
    /// A clip produced disconnected pieces.
    MultipleIntersections,
    /// The input tree is structurally invalid.
    MalformedTree,
    /// A border has a zero-width or zero-height bounding box.
    DegenerateBorder,
    /// Two generators share a position.
    CoincidentCenters,
    /// A vertex ring is too short or not finite.
    InvalidPolygon,
    /// An identifier names no node.
    UnknownNode,
    /// An operation tried to move or detach the root.
    RootIsFixed,
}

/// A geometric invariant that an operation could not uphold.
///
/// None of these are retried; they describe caller data that cannot be tiled or
/// morphed as asked.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// Generator `index` lies outside the region it should tile, or its cell
    /// clipped against that region is empty.
    #[error("generator {index} has no cell inside the outer border")]
    NoIntersection {
        /// Position of the generator in the input sequence.
        index: usize,
        /// The bounded proximity cell of the generator.
        cell: Polygon,
        /// The outer border that was being tiled.
        border: Polygon,
    },
    /// Clipping the cell of generator `index` split it into disjoint pieces.
    ///
    /// Only reachable for non-convex outer borders.
    #[error("cell of generator {index} clips into {pieces} disjoint regions")]
    MultipleIntersections {
        /// Position of the generator in the input sequence.
        index: usize,
        /// Number of disjoint pieces detected.
        pieces: usize,
        /// The outer border that was being tiled.
        border: Polygon,
    },
    /// A border's bounding box has zero width or height.
    #[error("border has a degenerate bounding box")]
    DegenerateBorder {
        /// The offending border.
        border: Polygon,
    },
    /// Two generators share the same position.
    #[error("generators {first} and {second} coincide")]
    CoincidentCenters {
        /// Earlier generator position in the input sequence.
        first: usize,
        /// Later generator position in the input sequence.
        second: usize,
    },
    /// A ring had fewer than three vertices or a non-finite coordinate.
    #[error("a polygon needs at least 3 finite vertices, got {len}")]
    InvalidPolygon {
        /// Number of vertices supplied.
        len: usize,
    },
}

impl GeometryError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoIntersection { .. } => ErrorKind::NoIntersection,
            Self::MultipleIntersections { .. } => ErrorKind::MultipleIntersections,
            Self::DegenerateBorder { .. } => ErrorKind::DegenerateBorder,
            Self::CoincidentCenters { .. } => ErrorKind::CoincidentCenters,
            Self::InvalidPolygon { .. } => ErrorKind::InvalidPolygon,
        }
    }

    /// Key/value pairs for logs. Polygons are rendered as vertex lists.
    pub fn context(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::NoIntersection {
                index,
                cell,
                border,
            } => vec![
                ("index", index.to_string()),
                ("cell", format!("{:?}", cell.points())),
                ("border", format!("{:?}", border.points())),
            ],
            Self::MultipleIntersections {
                index,
                pieces,
                border,
            } => vec![
                ("index", index.to_string()),
                ("pieces", pieces.to_string()),
                ("border", format!("{:?}", border.points())),
            ],
            Self::DegenerateBorder { border } => {
                vec![("border", format!("{:?}", border.points()))]
            }
            Self::CoincidentCenters { first, second } => vec![
                ("first", first.to_string()),
                ("second", second.to_string()),
            ],
            Self::InvalidPolygon { len } => vec![("vertices", len.to_string())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    #[test]
    fn context_names_the_offending_generator() {
        let err = GeometryError::NoIntersection {
            index: 4,
            cell: Polygon::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
            border: Polygon::from_rect(Rect::new(2.0, 2.0, 3.0, 3.0)),
        };
        assert_eq!(err.kind(), ErrorKind::NoIntersection);
        let ctx = err.context();
        assert_eq!(ctx[0], ("index", String::from("4")));
        assert_eq!(ctx.len(), 3);
    }
}
