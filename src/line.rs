// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lines.

use core::ops::{Mul, Range};

use arrayvec::ArrayVec;

use crate::{
    Affine, ParamCurve, ParamCurveExtrema, ParamCurveFlatten, Point, Vec2, MAX_EXTREMA,
};

/// A single line.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

impl Line {
    /// Create a new line.
    #[inline]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// The length of the line.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.p1 - self.p0).hypot()
    }

    /// Find the point on the line nearest `p`.
    ///
    /// Returns the parameter of that point and the square of the distance.
    pub fn nearest(&self, p: Point) -> (f64, f64) {
        let d = self.p1 - self.p0;
        let dotp = d.dot(p - self.p0);
        let d_squared = d.dot(d);
        if dotp <= 0.0 {
            (0.0, (p - self.p0).hypot2())
        } else if dotp >= d_squared {
            (1.0, (p - self.p1).hypot2())
        } else {
            let t = dotp / d_squared;
            let dist = (p - self.eval(t)).hypot2();
            (t, dist)
        }
    }

    /// Distance from `p` to the closest point of the line.
    #[inline]
    pub fn distance_to(&self, p: Point) -> f64 {
        self.nearest(p).1.sqrt()
    }

    /// The point where two line segments cross, if they do.
    ///
    /// Parallel and collinear segments report no crossing.
    pub fn crossing(&self, other: &Line) -> Option<Point> {
        let d0 = self.p1 - self.p0;
        let d1 = other.p1 - other.p0;
        let denom = d0.cross(d1);
        if denom == 0.0 {
            return None;
        }
        let w = other.p0 - self.p0;
        let t = w.cross(d1) / denom;
        let u = w.cross(d0) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(self.eval(t))
        } else {
            None
        }
    }

    /// Move `to` by `radius` along the direction from `from` to `to`.
    ///
    /// Negative radii move back toward `from`; this is how a line end is
    /// pulled back to make room for a decoration.
    pub fn cap(from: Point, to: Point, radius: f64) -> Point {
        let d = to - from;
        if d.hypot2() == 0.0 {
            return to;
        }
        to.polar_offset(d.atan2(), radius)
    }
}

impl ParamCurve for Line {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        self.p0.lerp(self.p1, t)
    }

    #[inline]
    fn subsegment(&self, range: Range<f64>) -> Line {
        Line {
            p0: self.eval(range.start),
            p1: self.eval(range.end),
        }
    }

    #[inline]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline]
    fn end(&self) -> Point {
        self.p1
    }
}

impl ParamCurveExtrema for Line {
    #[inline]
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        ArrayVec::new()
    }
}

impl ParamCurveFlatten for Line {
    #[inline]
    fn flatness(&self) -> f64 {
        0.0
    }
}

impl Mul<Line> for Affine {
    type Output = Line;

    #[inline]
    fn mul(self, other: Line) -> Line {
        Line {
            p0: self * other.p0,
            p1: self * other.p1,
        }
    }
}

impl From<(Point, Point)> for Line {
    #[inline]
    fn from((from, to): (Point, Point)) -> Self {
        Line::new(from, to)
    }
}

impl From<Line> for (Point, Vec2) {
    #[inline]
    fn from(line: Line) -> Self {
        (line.p0, line.p1 - line.p0)
    }
}
