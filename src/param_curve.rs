// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traits for curves parametrized by a scalar.

use core::ops::Range;

use arrayvec::ArrayVec;

use crate::{Point, Rect};

/// The maximum number of extrema that can be reported in the
/// `ParamCurveExtrema` trait.
///
/// This is 4 to support cubic Béziers. If other curves are used, they should
/// be subdivided to limit the number of extrema.
pub const MAX_EXTREMA: usize = 4;

/// A curve parametrized by a scalar.
pub trait ParamCurve: Sized {
    /// Evaluate the curve at parameter `t`.
    ///
    /// Generally `t` is in the range [0..1].
    fn eval(&self, t: f64) -> Point;

    /// Get a subsegment of the curve for the given parameter range.
    fn subsegment(&self, range: Range<f64>) -> Self;

    /// Subdivide into (roughly) halves.
    #[inline]
    fn subdivide(&self) -> (Self, Self) {
        (self.subsegment(0.0..0.5), self.subsegment(0.5..1.0))
    }

    /// The start point.
    fn start(&self) -> Point {
        self.eval(0.0)
    }

    /// The end point.
    fn end(&self) -> Point {
        self.eval(1.0)
    }
}

/// A parametrized curve that reports its extrema.
pub trait ParamCurveExtrema: ParamCurve {
    /// Compute the extrema of the curve.
    ///
    /// Only extrema within the interior of the curve count.
    /// At most four extrema can be reported, which is sufficient for
    /// cubic Béziers.
    ///
    /// The extrema should be reported in increasing parameter order.
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA>;

    /// The smallest rectangle that encloses the curve in the range (0..1).
    fn bounding_box(&self) -> Rect {
        let mut bbox = Rect::from_point(self.start()).union_pt(self.end());
        for t in self.extrema() {
            bbox = bbox.union_pt(self.eval(t));
        }
        bbox
    }
}

/// A parametrized curve that can be approximated by line segments.
pub trait ParamCurveFlatten: ParamCurve {
    /// An upper bound on the distance between the curve and its chord.
    fn flatness(&self) -> f64;

    /// Approximate the curve by a polyline within `tolerance`.
    ///
    /// The start point is not emitted; `callback` receives each subsequent
    /// vertex, ending with `self.end()`.
    fn flatten(&self, tolerance: f64, callback: &mut impl FnMut(Point)) {
        fn rec<C: ParamCurveFlatten>(
            c: &C,
            tolerance: f64,
            depth: usize,
            callback: &mut impl FnMut(Point),
        ) {
            if depth >= crate::common::MAX_SUBDIVISION_DEPTH || c.flatness() <= tolerance {
                callback(c.end());
            } else {
                let (c0, c1) = c.subdivide();
                rec(&c0, tolerance, depth + 1, callback);
                rec(&c1, tolerance, depth + 1, callback);
            }
        }
        rec(self, tolerance, 0, callback);
    }
}
