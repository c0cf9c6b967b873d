// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editable bezier figures with cached geometry.
//!
//! The bezfig library is the geometry core of a vector drawing editor. A
//! [`NodePath`] is an ordered list of [`PathNode`]s, each a main point with
//! up to two active control points, and answers the queries an editor needs:
//! bounds, sampling along the curve, segment hit-testing, splitting and
//! joining segments, and chopping a connecting line at the outline. A
//! [`BezierFigure`] wraps a path with a [`StrokeStyle`] and end
//! decorations; a [`CompositeFigure`] groups figures and aggregates their
//! bounds. Every figure caches its bounds and drawing area and recomputes
//! them lazily after an edit.
//!
//! Curves are built from the usual vocabulary types: [`Point`], [`Vec2`],
//! [`Rect`], [`Affine`], [`Line`], [`QuadBez`], [`CubicBez`] and
//! [`BezPath`].
//!
//! # Examples
//!
//! Building and editing a path:
//! ```
//! use bezfig::{BezierFigure, Figure, NodePath, PathNode, Point, Rect};
//!
//! let mut fig = BezierFigure::new(NodePath::from_points([
//!     (0.0, 0.0),
//!     (10.0, 0.0),
//!     (10.0, 10.0),
//! ]));
//! assert_eq!(fig.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
//!
//! fig.add_node(1, PathNode::new((5.0, 5.0))).unwrap();
//! assert_eq!(fig.node_count(), 4);
//! assert_eq!(fig.point_on_path(0.0, 1.0), Some(Point::new(0.0, 0.0)));
//! ```
//!
//! Grouping figures and hit-testing the topmost one:
//! ```
//! use bezfig::{BezierFigure, CompositeFigure, DrawingConfig, Figure, NodePath, Point};
//!
//! let square = |x: f64| {
//!     BezierFigure::new(
//!         NodePath::from_points([(x, 0.0), (x + 10.0, 0.0), (x + 10.0, 10.0), (x, 10.0)])
//!             .with_closed(true),
//!     )
//! };
//! let mut group = CompositeFigure::new();
//! let _back = group.add(square(0.0));
//! let front = group.add(square(5.0));
//! let hit = group.find_child(Point::new(7.0, 5.0), &DrawingConfig::default());
//! assert_eq!(hit.map(Figure::id), Some(front));
//! ```
//!
//! # Threading
//!
//! Figures refresh their caches through shared references, so they are not
//! `Sync`. A figure tree belongs to one thread at a time; to share one, put
//! the whole tree behind a lock.
//!
//! # Features
//!
//! The `serde` feature, enabled by default, derives serialization for the
//! vocabulary types and stores nodes and paths in the compact record form
//! described in the `persist` module.

#![forbid(unsafe_code)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(
    clippy::many_single_char_names,
    reason = "curve math names its control points p0..p3"
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod affine;
mod bezier_figure;
mod bezpath;
mod cache;
pub mod common;
mod composite;
mod config;
mod cubicbez;
mod decoration;
mod drawing;
mod error;
mod figure;
mod line;
mod node;
mod param_curve;
mod path;
#[cfg(feature = "serde")]
pub mod persist;
mod point;
mod quadbez;
mod rect;
mod stroke;
mod vec2;

pub use crate::affine::*;
pub use crate::bezier_figure::*;
pub use crate::bezpath::*;
pub use crate::cache::*;
pub use crate::common::{DEFAULT_FLATNESS, DEFAULT_HIT_TOLERANCE, MIN_BOUNDS_EXTENT};
pub use crate::composite::*;
pub use crate::config::*;
pub use crate::cubicbez::*;
pub use crate::decoration::*;
pub use crate::drawing::*;
pub use crate::error::*;
pub use crate::figure::*;
pub use crate::line::*;
pub use crate::node::*;
pub use crate::param_curve::*;
pub use crate::path::*;
pub use crate::point::*;
pub use crate::quadbez::*;
pub use crate::rect::*;
pub use crate::stroke::*;
pub use crate::vec2::*;
