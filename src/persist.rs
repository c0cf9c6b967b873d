// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The persisted form of nodes and paths.
//!
//! A node is stored as its main point plus whatever differs from the
//! defaults: the mask when non-zero, `colinear` when false, and each control
//! point when it does not coincide with the main point. A path is its list
//! of nodes plus `closed` when true.
//!
//! ```
//! use bezfig::{NodePath, PathNode};
//!
//! let path = NodePath::from_nodes([PathNode::new((1.0, 2.0))]);
//! let json = serde_json::to_string(&path).unwrap();
//! assert_eq!(json, r#"{"nodes":[{"x":1.0,"y":2.0}]}"#);
//! assert_eq!(serde_json::from_str::<NodePath>(&json).unwrap(), path);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Mask, NodePath, PathNode, Point};

/// The stored shape of a [`PathNode`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Active control points; see [`Mask`].
    #[serde(default, skip_serializing_if = "is_zero")]
    pub mask: u8,
    /// Whether moving one control point mirrors the other.
    #[serde(default = "default_colinear", skip_serializing_if = "is_true")]
    pub colinear: bool,
    /// Main point.
    pub x: f64,
    /// Main point.
    pub y: f64,
    /// Incoming control point, when it differs from the main point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c1x: Option<f64>,
    /// Incoming control point, when it differs from the main point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c1y: Option<f64>,
    /// Outgoing control point, when it differs from the main point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c2x: Option<f64>,
    /// Outgoing control point, when it differs from the main point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c2y: Option<f64>,
}

/// The stored shape of a [`NodePath`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    /// Nodes in path order.
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    /// Whether the path is closed.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub closed: bool,
}

#[allow(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes skip predicates by reference"
)]
fn is_zero(v: &u8) -> bool {
    *v == 0
}

#[allow(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes skip predicates by reference"
)]
fn is_true(v: &bool) -> bool {
    *v
}

fn default_colinear() -> bool {
    true
}

/// Coordinates are compared by bit pattern so `-0.0` survives a round trip.
fn stored_control(main: Point, c: Point) -> (Option<f64>, Option<f64>) {
    if c.x.to_bits() == main.x.to_bits() && c.y.to_bits() == main.y.to_bits() {
        (None, None)
    } else {
        (Some(c.x), Some(c.y))
    }
}

impl From<&PathNode> for NodeRecord {
    fn from(node: &PathNode) -> Self {
        let main = node.point();
        let (c1x, c1y) = stored_control(main, node.c1());
        let (c2x, c2y) = stored_control(main, node.c2());
        NodeRecord {
            mask: node.mask().bits(),
            colinear: node.keep_colinear(),
            x: main.x,
            y: main.y,
            c1x,
            c1y,
            c2x,
            c2y,
        }
    }
}

/// Missing control coordinates default to the main point. Control points the
/// mask does not select are dropped.
impl From<NodeRecord> for PathNode {
    fn from(record: NodeRecord) -> Self {
        let main = Point::new(record.x, record.y);
        let c1 = Point::new(record.c1x.unwrap_or(main.x), record.c1y.unwrap_or(main.y));
        let c2 = Point::new(record.c2x.unwrap_or(main.x), record.c2y.unwrap_or(main.y));
        PathNode::from_mask(Mask::from_bits_truncate(record.mask), main, c1, c2)
            .with_keep_colinear(record.colinear)
    }
}

impl From<&NodePath> for PathRecord {
    fn from(path: &NodePath) -> Self {
        PathRecord {
            nodes: path.nodes().iter().map(NodeRecord::from).collect(),
            closed: path.is_closed(),
        }
    }
}

impl From<PathRecord> for NodePath {
    fn from(record: PathRecord) -> Self {
        NodePath::from_nodes(record.nodes.into_iter().map(PathNode::from)).with_closed(record.closed)
    }
}

impl Serialize for PathNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeRecord::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PathNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        NodeRecord::deserialize(deserializer).map(PathNode::from)
    }
}

impl Serialize for NodePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PathRecord::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NodePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PathRecord::deserialize(deserializer).map(NodePath::from)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::{ControlPoint, Controls};

    type Tuple = (u64, u64, u64, u64, u64, u64, u8, bool);

    fn tuple(node: &PathNode) -> Tuple {
        let (p, c1, c2) = (node.point(), node.c1(), node.c2());
        (
            p.x.to_bits(),
            p.y.to_bits(),
            c1.x.to_bits(),
            c1.y.to_bits(),
            c2.x.to_bits(),
            c2.y.to_bits(),
            node.mask().bits(),
            node.keep_colinear(),
        )
    }

    #[test]
    fn defaults_are_omitted() {
        let json = serde_json::to_value(PathNode::new((3.0, 4.0))).unwrap();
        assert_eq!(json, serde_json::json!({ "x": 3.0, "y": 4.0 }));

        let node = PathNode::with_controls((3.0, 4.0), Controls::C2((5.0, 4.0).into()))
            .with_keep_colinear(false);
        let json = serde_json::to_value(node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "mask": 2, "colinear": false, "x": 3.0, "y": 4.0, "c2x": 5.0, "c2y": 4.0 })
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let node: PathNode = serde_json::from_str(r#"{"x": 1.5, "y": -2.0, "mask": 1}"#).unwrap();
        assert_eq!(node.mask(), Mask::C1);
        assert_eq!(node.c1(), Point::new(1.5, -2.0));
        assert!(node.keep_colinear());

        let path: NodePath = serde_json::from_str(r#"{"nodes": []}"#).unwrap();
        assert!(path.is_empty());
        assert!(!path.is_closed());
    }

    #[test]
    fn unselected_controls_are_dropped() {
        let node: PathNode =
            serde_json::from_str(r#"{"x": 0.0, "y": 0.0, "c1x": 4.0, "c1y": 4.0}"#).unwrap();
        assert_eq!(node.mask(), Mask::NONE);
        assert_eq!(node.control_point(ControlPoint::C1), Point::ZERO);
    }

    #[test]
    fn signed_zero_controls_survive() {
        let node = PathNode::with_controls((0.0, 0.0), Controls::C1((-0.0, 0.0).into()));
        let json = serde_json::to_value(node).unwrap();
        assert_eq!(json["c1x"], serde_json::json!(-0.0));
        let back: PathNode = serde_json::from_value(json).unwrap();
        assert_eq!(tuple(&back), tuple(&node));
        assert!(back.c1().x.is_sign_negative());
    }

    #[test]
    fn main_point_is_required() {
        assert!(serde_json::from_str::<PathNode>(r#"{"x": 1.0}"#).is_err());
    }

    #[test]
    fn random_paths_round_trip_exactly() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let mut point = || Point::new(rng.random_range(-1e3..1e3), rng.random_range(-1e3..1e3));
            let nodes: Vec<PathNode> = (0..8)
                .map(|i| {
                    let p = point();
                    let c1 = if i % 3 == 0 { p } else { point() };
                    let c2 = point();
                    PathNode::from_mask(Mask::from_bits_truncate(i as u8), p, c1, c2)
                        .with_keep_colinear(i % 2 == 0)
                })
                .collect();
            let path = NodePath::from_nodes(nodes).with_closed(rng.random_bool(0.5));
            let json = serde_json::to_string(&path).unwrap();
            let back: NodePath = serde_json::from_str(&json).unwrap();
            assert_eq!(back.is_closed(), path.is_closed());
            let before: Vec<Tuple> = path.nodes().iter().map(tuple).collect();
            let after: Vec<Tuple> = back.nodes().iter().map(tuple).collect();
            assert_eq!(before, after);
        }
    }
}
