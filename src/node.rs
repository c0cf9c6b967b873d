// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path nodes: a main point with up to two Bézier control points.

use core::f64::consts::PI;
use core::fmt;
use core::ops::{BitAnd, BitOr};

use crate::{Affine, FigureError, Point, Vec2};

/// Which control points of a node are active.
///
/// `C1` is the incoming control point, shaping the segment that ends at the
/// node. `C2` is the outgoing control point, shaping the segment that starts
/// at it.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Mask(u8);

impl Mask {
    /// No active control point.
    pub const NONE: Mask = Mask(0);
    /// The incoming control point is active.
    pub const C1: Mask = Mask(1);
    /// The outgoing control point is active.
    pub const C2: Mask = Mask(2);
    /// Both control points are active.
    pub const C1C2: Mask = Mask(3);

    /// Build a mask from its integer form, ignoring unknown bits.
    #[inline]
    pub const fn from_bits_truncate(bits: u8) -> Mask {
        Mask(bits & 3)
    }

    /// The integer form used by the persisted format.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether every bit of `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: Mask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no bit is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Mask {
    type Output = Mask;

    #[inline]
    fn bitor(self, rhs: Mask) -> Mask {
        Mask(self.0 | rhs.0)
    }
}

impl BitAnd for Mask {
    type Output = Mask;

    #[inline]
    fn bitand(self, rhs: Mask) -> Mask {
        Mask(self.0 & rhs.0)
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0 => "NONE",
            1 => "C1",
            2 => "C2",
            _ => "C1C2",
        };
        write!(f, "Mask::{name}")
    }
}

/// Selects one of the three coordinates of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlPoint {
    /// The main point, selector `0`.
    Main,
    /// The incoming control point, selector `1`.
    C1,
    /// The outgoing control point, selector `2`.
    C2,
}

impl ControlPoint {
    /// The control point on the other side of the main point.
    ///
    /// `Main` is its own opposite.
    #[inline]
    pub fn opposite(self) -> ControlPoint {
        match self {
            ControlPoint::Main => ControlPoint::Main,
            ControlPoint::C1 => ControlPoint::C2,
            ControlPoint::C2 => ControlPoint::C1,
        }
    }

    #[inline]
    fn mask(self) -> Mask {
        match self {
            ControlPoint::Main => Mask::NONE,
            ControlPoint::C1 => Mask::C1,
            ControlPoint::C2 => Mask::C2,
        }
    }
}

impl TryFrom<usize> for ControlPoint {
    type Error = FigureError;

    fn try_from(selector: usize) -> Result<Self, FigureError> {
        match selector {
            0 => Ok(ControlPoint::Main),
            1 => Ok(ControlPoint::C1),
            2 => Ok(ControlPoint::C2),
            index => Err(FigureError::IndexOutOfRange { index, len: 3 }),
        }
    }
}

/// The active control points of a node.
///
/// Only active control points carry coordinates; an inactive control point
/// is, by construction, located at the main point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Controls {
    /// No active control point: segments meet the node as straight lines.
    Corner,
    /// Only the incoming control point is active.
    C1(Point),
    /// Only the outgoing control point is active.
    C2(Point),
    /// Both control points are active: incoming, then outgoing.
    C1C2(Point, Point),
}

impl Controls {
    /// The mask describing which control points are active.
    #[inline]
    pub fn mask(&self) -> Mask {
        match self {
            Controls::Corner => Mask::NONE,
            Controls::C1(_) => Mask::C1,
            Controls::C2(_) => Mask::C2,
            Controls::C1C2(..) => Mask::C1C2,
        }
    }

    #[inline]
    fn c1(&self) -> Option<Point> {
        match *self {
            Controls::C1(c1) | Controls::C1C2(c1, _) => Some(c1),
            Controls::Corner | Controls::C2(_) => None,
        }
    }

    #[inline]
    fn c2(&self) -> Option<Point> {
        match *self {
            Controls::C2(c2) | Controls::C1C2(_, c2) => Some(c2),
            Controls::Corner | Controls::C1(_) => None,
        }
    }

    #[inline]
    fn from_parts(c1: Option<Point>, c2: Option<Point>) -> Controls {
        match (c1, c2) {
            (None, None) => Controls::Corner,
            (Some(c1), None) => Controls::C1(c1),
            (None, Some(c2)) => Controls::C2(c2),
            (Some(c1), Some(c2)) => Controls::C1C2(c1, c2),
        }
    }

    fn map(self, mut f: impl FnMut(Point) -> Point) -> Controls {
        Controls::from_parts(self.c1().map(&mut f), self.c2().map(&mut f))
    }
}

/// One node of a path.
///
/// ```
/// use bezfig::{ControlPoint, Mask, PathNode, Point};
///
/// let mut node = PathNode::new((10.0, 10.0));
/// assert_eq!(node.mask(), Mask::NONE);
/// assert_eq!(node.control_point(ControlPoint::C2), Point::new(10.0, 10.0));
///
/// node.set_control_point(ControlPoint::C2, Point::new(15.0, 10.0));
/// assert_eq!(node.mask(), Mask::C2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathNode {
    point: Point,
    controls: Controls,
    keep_colinear: bool,
}

impl PathNode {
    /// A corner node at `p`.
    ///
    /// New nodes keep their control points colinear.
    #[inline]
    pub fn new(p: impl Into<Point>) -> PathNode {
        PathNode {
            point: p.into(),
            controls: Controls::Corner,
            keep_colinear: true,
        }
    }

    /// A node with explicit controls.
    #[inline]
    pub fn with_controls(p: impl Into<Point>, controls: Controls) -> PathNode {
        PathNode {
            point: p.into(),
            controls,
            keep_colinear: true,
        }
    }

    /// A node with both control points active.
    #[inline]
    pub fn curve(c1: impl Into<Point>, p: impl Into<Point>, c2: impl Into<Point>) -> PathNode {
        PathNode::with_controls(p, Controls::C1C2(c1.into(), c2.into()))
    }

    /// Build a node from the flat `mask`/three-point form.
    ///
    /// Coordinates of control points not selected by `mask` are dropped.
    pub fn from_mask(mask: Mask, p: Point, c1: Point, c2: Point) -> PathNode {
        let controls = Controls::from_parts(
            mask.contains(Mask::C1).then_some(c1),
            mask.contains(Mask::C2).then_some(c2),
        );
        PathNode::with_controls(p, controls)
    }

    /// Builder method for the colinear flag.
    #[inline]
    #[must_use]
    pub fn with_keep_colinear(mut self, keep_colinear: bool) -> PathNode {
        self.keep_colinear = keep_colinear;
        self
    }

    /// The main point.
    #[inline]
    pub fn point(&self) -> Point {
        self.point
    }

    /// The active controls.
    #[inline]
    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// Which control points are active.
    #[inline]
    pub fn mask(&self) -> Mask {
        self.controls.mask()
    }

    /// Whether moving one control point mirrors the other through the
    /// main point.
    #[inline]
    pub fn keep_colinear(&self) -> bool {
        self.keep_colinear
    }

    /// Set the colinear flag.
    #[inline]
    pub fn set_keep_colinear(&mut self, keep_colinear: bool) {
        self.keep_colinear = keep_colinear;
    }

    /// The incoming control point, or the main point if it is inactive.
    #[inline]
    pub fn c1(&self) -> Point {
        self.controls.c1().unwrap_or(self.point)
    }

    /// The outgoing control point, or the main point if it is inactive.
    #[inline]
    pub fn c2(&self) -> Point {
        self.controls.c2().unwrap_or(self.point)
    }

    /// Read one of the three coordinates.
    #[inline]
    pub fn control_point(&self, which: ControlPoint) -> Point {
        match which {
            ControlPoint::Main => self.point,
            ControlPoint::C1 => self.c1(),
            ControlPoint::C2 => self.c2(),
        }
    }

    /// Write one of the three coordinates.
    ///
    /// Setting the main point moves the whole node rigidly, keeping the
    /// control point offsets. Setting a control point activates it; if the
    /// node keeps its control points colinear and the opposite control point
    /// is active, the opposite one is moved to the mirror position: the same
    /// distance from the main point, in the opposite direction.
    pub fn set_control_point(&mut self, which: ControlPoint, p: Point) {
        match which {
            ControlPoint::Main => self.translate(p - self.point),
            ControlPoint::C1 | ControlPoint::C2 => {
                let opposite = match which {
                    ControlPoint::C1 => self.controls.c2(),
                    _ => self.controls.c1(),
                };
                let opposite = match opposite {
                    Some(_) if self.keep_colinear => {
                        let d = p - self.point;
                        Some(self.point.polar_offset(PI + d.atan2(), d.hypot()))
                    }
                    other => other,
                };
                self.controls = match which {
                    ControlPoint::C1 => Controls::from_parts(Some(p), opposite),
                    _ => Controls::from_parts(opposite, Some(p)),
                };
            }
        }
    }

    /// Change which control points are active.
    ///
    /// Newly activated control points start at the main point; deactivated
    /// ones collapse onto it. Active control points that stay active keep
    /// their position.
    pub fn set_mask(&mut self, mask: Mask) {
        let keep = |active: bool, current: Option<Point>, point: Point| {
            active.then(|| current.unwrap_or(point))
        };
        self.controls = Controls::from_parts(
            keep(mask.contains(ControlPoint::C1.mask()), self.controls.c1(), self.point),
            keep(mask.contains(ControlPoint::C2.mask()), self.controls.c2(), self.point),
        );
    }

    /// Move the node and its control points by `delta`.
    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.point += delta;
        self.controls = self.controls.map(|c| c + delta);
    }

    /// Apply an affine transform to all three coordinates.
    #[inline]
    pub fn apply_affine(&mut self, affine: Affine) {
        self.point = affine * self.point;
        self.controls = self.controls.map(|c| affine * c);
    }
}
