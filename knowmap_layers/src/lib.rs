// Copyright 2025 the Knowmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=knowmap_layers --heading-base-level=0

//! Knowmap Layers: nested-region layout for knowledge maps.
//!
//! A knowledge map is a tree drawn as nested regions. The root owns a canvas;
//! every node's region is tiled among its children with proximity (Voronoi)
//! cells whose generators are the children's centers. This crate turns a
//! [`TreeNode`] into a [`LayeredMap`] (one [`Layer`] per depth) and keeps it
//! consistent under edits.
//!
//! - [`build_layers`]: lay out a whole tree, breadth first.
//! - [`update_position`]: move one node and cascade the reshaping through its
//!   parent's subtree, one layer at a time. A move costs work proportional to the
//!   affected subtree, not the whole map. Moves are all-or-nothing.
//! - [`find_current_node`] and [`filter_nodes_and_layers`]: level-of-detail
//!   selection for a zoomed and panned [`Viewport`].
//! - [`KnowledgeMap`]: owns a [`TreeIndex`] and a [`LayeredMap`] and applies
//!   [`MapEvent`]s (move, add, remove, reparent, rename).
//!
//! Geometry comes from [`knowmap_geometry`]; points and transforms are [`kurbo`]
//! types.
//!
//! ## Configuration
//!
//! [`LayoutOptions`] carries the geometric [`Tolerance`](knowmap_geometry::Tolerance),
//! the zoom threshold (default: half the viewport area), an optional budget for
//! cascade depth and the morph strategy used to carry children into a reshaped
//! parent.
//!
//! ## Diagnostics
//!
//! Errors are [`MapError`]s with a coarse [`ErrorKind`] and key/value
//! [`context`](MapError::context) for logs. With the `tracing` feature, building,
//! moving and viewport selection emit `tracing` spans and events; without it the
//! crate logs nothing.
//!
//! # Example
//!
//! ```rust
//! use knowmap_layers::{
//!     LayoutOptions, TreeIndex, TreeNode, Viewport, build_layers, filter_nodes_and_layers,
//!     find_current_node, update_position,
//! };
//! use kurbo::{Point, Size};
//!
//! let tree = TreeNode::new("root", "Map", Point::new(500.0, 500.0))
//!     .with_child(TreeNode::new("left", "Left", Point::new(250.0, 500.0)))
//!     .with_child(TreeNode::new("right", "Right", Point::new(750.0, 500.0)));
//! let options = LayoutOptions::default();
//! let index = TreeIndex::from_tree(&tree).unwrap();
//! let mut layers = build_layers(&tree, &options).unwrap();
//!
//! // The two children split the canvas at x = 500.
//! let left = &layers.get(1, "left").unwrap().border;
//! assert!((left.bounding_box().x1 - 500.0).abs() < 1e-9);
//!
//! // Moving `left` shifts the shared edge to the new bisector.
//! update_position(&mut layers, &index, "left", Point::new(350.0, 500.0), &options).unwrap();
//! let left = &layers.get(1, "left").unwrap().border;
//! assert!((left.bounding_box().x1 - 550.0).abs() < 1e-9);
//!
//! let viewport = Viewport::new(Size::new(1000.0, 1000.0));
//! let focus = Point::new(990.0, 10.0);
//! let current = find_current_node(&layers, &index, &viewport, focus, &options).unwrap();
//! assert_eq!(current.as_str(), "root");
//! let rows = filter_nodes_and_layers(&layers, &index, current.as_str()).unwrap();
//! assert_eq!(rows.len(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod builder;
pub mod error;
pub mod index;
pub mod map;
pub mod options;
pub mod types;
pub mod update;
pub mod viewport;

pub use builder::{build_layers, build_layers_indexed, root_border};
pub use error::MapError;
pub use index::{NodeRecord, TreeIndex};
pub use knowmap_geometry::ErrorKind;
pub use map::{EventOutcome, KnowledgeMap, MapEvent};
pub use options::LayoutOptions;
pub use types::{Layer, LayeredMap, MapNode, NodeId, ROOT_ID, TreeNode};
pub use update::{ChangeFlags, MoveReport, NodeChange, PositionUpdate, update_position};
pub use viewport::{Viewport, filter_nodes_and_layers, find_current_node};
