// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use core::ops::{Mul, Range};

use arrayvec::ArrayVec;

use crate::common::solve_quadratic;
use crate::{
    Affine, Line, ParamCurve, ParamCurveExtrema, ParamCurveFlatten, Point, MAX_EXTREMA,
};

/// A single cubic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBez {
    /// The start point.
    pub p0: Point,
    /// The first control point.
    pub p1: Point,
    /// The second control point.
    pub p2: Point,
    /// The end point.
    pub p3: Point,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, p3: P) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }
}

impl ParamCurve for CubicBez {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let v = self.p0.to_vec2() * (mt * mt * mt)
            + (self.p1.to_vec2() * (mt * mt * 3.0)
                + (self.p2.to_vec2() * (mt * 3.0) + self.p3.to_vec2() * t) * t)
                * t;
        v.to_point()
    }

    fn subsegment(&self, range: Range<f64>) -> CubicBez {
        let (t0, t1) = (range.start, range.end);
        let p0 = self.eval(t0);
        let p3 = self.eval(t1);
        let scale = (t1 - t0) * (1.0 / 3.0);
        let p1 = p0 + scale * self.deriv_at(t0);
        let p2 = p3 - scale * self.deriv_at(t1);
        CubicBez { p0, p1, p2, p3 }
    }

    /// Subdivide into halves, using de Casteljau.
    #[inline]
    fn subdivide(&self) -> (CubicBez, CubicBez) {
        let pm = self.eval(0.5);
        let p0 = self.p0.to_vec2();
        let p1 = self.p1.to_vec2();
        let p2 = self.p2.to_vec2();
        let p3 = self.p3.to_vec2();
        (
            CubicBez::new(
                self.p0,
                ((p0 + p1) * 0.5).to_point(),
                ((p0 + p1 * 2.0 + p2) * 0.25).to_point(),
                pm,
            ),
            CubicBez::new(
                pm,
                ((p1 + p2 * 2.0 + p3) * 0.25).to_point(),
                ((p2 + p3) * 0.5).to_point(),
                self.p3,
            ),
        )
    }

    #[inline]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline]
    fn end(&self) -> Point {
        self.p3
    }
}

impl CubicBez {
    /// The derivative at parameter `t`.
    #[inline]
    fn deriv_at(&self, t: f64) -> crate::Vec2 {
        let mt = 1.0 - t;
        let d0 = self.p1 - self.p0;
        let d1 = self.p2 - self.p1;
        let d2 = self.p3 - self.p2;
        3.0 * (d0 * (mt * mt) + d1 * (2.0 * mt * t) + d2 * (t * t))
    }
}

impl ParamCurveExtrema for CubicBez {
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        fn one_coord(result: &mut ArrayVec<f64, MAX_EXTREMA>, d0: f64, d1: f64, d2: f64) {
            let a = d0 - 2.0 * d1 + d2;
            let b = 2.0 * (d1 - d0);
            let c = d0;
            let roots = solve_quadratic(c, b, a);
            for &t in &roots {
                if t > 0.0 && t < 1.0 {
                    result.push(t);
                }
            }
        }
        let mut result = ArrayVec::new();
        let d0 = self.p1 - self.p0;
        let d1 = self.p2 - self.p1;
        let d2 = self.p3 - self.p2;
        one_coord(&mut result, d0.x, d1.x, d2.x);
        one_coord(&mut result, d0.y, d1.y, d2.y);
        result.sort_by(|a, b| a.total_cmp(b));
        result
    }
}

impl ParamCurveFlatten for CubicBez {
    /// Three quarters of the larger control point distance from the chord.
    #[inline]
    fn flatness(&self) -> f64 {
        let chord = Line::new(self.p0, self.p3);
        0.75 * chord.distance_to(self.p1).max(chord.distance_to(self.p2))
    }
}

impl Mul<CubicBez> for Affine {
    type Output = CubicBez;

    #[inline]
    fn mul(self, c: CubicBez) -> CubicBez {
        CubicBez {
            p0: self * c.p0,
            p1: self * c.p1,
            p2: self * c.p2,
            p3: self * c.p3,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{CubicBez, ParamCurve, ParamCurveExtrema, ParamCurveFlatten, Point};

    fn assert_near(p0: Point, p1: Point, epsilon: f64) {
        assert!((p1 - p0).hypot() < epsilon, "{p0:?} != {p1:?}");
    }

    #[test]
    fn cubicbez_subsegment() {
        let c = CubicBez::new((3.1, 4.1), (5.9, 2.6), (5.3, 5.8), (9.7, 9.3));
        let t0 = 0.1;
        let t1 = 0.8;
        let cs = c.subsegment(t0..t1);
        let epsilon = 1e-12;
        let n = 10;
        for i in 0..=n {
            let t = f64::from(i) / f64::from(n);
            let ts = t0 + t * (t1 - t0);
            assert_near(c.eval(ts), cs.eval(t), epsilon);
        }
    }

    #[test]
    fn cubicbez_subdivide_matches_eval() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        let (a, b) = c.subdivide();
        assert_near(a.eval(0.5), c.eval(0.25), 1e-12);
        assert_near(b.eval(0.5), c.eval(0.75), 1e-12);
    }

    #[test]
    fn cubicbez_extrema() {
        let q = CubicBez::new((0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        let extrema = q.extrema();
        assert_eq!(extrema.len(), 1);
        assert!((extrema[0] - 0.5).abs() < 1e-6);

        let q = CubicBez::new((0.4, 0.5), (0.0, 1.0), (1.0, 0.0), (0.5, 0.4));
        let extrema = q.extrema();
        assert_eq!(extrema.len(), 4);
    }

    #[test]
    fn cubicbez_tight_bounds() {
        // The control polygon reaches y = 1, the curve only y = 0.75.
        let c = CubicBez::new((0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        let bbox = c.bounding_box();
        assert!((bbox.height - 0.75).abs() < 1e-12);
        assert!((bbox.width - 1.0).abs() < 1e-12);
    }

    #[test]
    fn straight_cubic_is_flat() {
        let c = CubicBez::new((0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0));
        assert_eq!(c.flatness(), 0.0);
        let mut n = 0;
        c.flatten(0.1, &mut |_| n += 1);
        assert_eq!(n, 1);
    }
}
