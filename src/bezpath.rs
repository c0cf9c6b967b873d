// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bézier paths (up to cubic).
//!
//! A [`BezPath`] is the drawable form of a node path: the element list a
//! renderer consumes. It is built from nodes by [`NodePath::to_bez_path`]
//! and answers the queries that need the real curve geometry: tight bounds,
//! flattening, fill containment and outline hit-testing.
//!
//! [`NodePath::to_bez_path`]: crate::NodePath::to_bez_path

use core::ops::{Mul, Range};

use arrayvec::ArrayVec;

use crate::{
    Affine, CubicBez, Line, ParamCurve, ParamCurveExtrema, ParamCurveFlatten, Point, QuadBez,
    Rect, MAX_EXTREMA,
};

/// A path that can Bézier segments up to cubic, possibly with multiple subpaths.
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BezPath(Vec<PathEl>);

/// The element of a Bézier path.
///
/// A valid path has `MoveTo` at the beginning of each subpath.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEl {
    /// Move directly to the point without drawing anything, starting a new
    /// subpath.
    MoveTo(Point),
    /// Draw a line from the current location to the point.
    LineTo(Point),
    /// Draw a quadratic bezier using the current location and the two points.
    QuadTo(Point, Point),
    /// Draw a cubic bezier using the current location and the three points.
    CurveTo(Point, Point, Point),
    /// Close off the path.
    ClosePath,
}

/// A segment of a Bézier path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSeg {
    /// A line segment.
    Line(Line),
    /// A quadratic bezier segment.
    Quad(QuadBez),
    /// A cubic bezier segment.
    Cubic(CubicBez),
}

impl BezPath {
    /// Create a new path.
    #[inline]
    pub fn new() -> BezPath {
        BezPath::default()
    }

    /// Create a path from a vector of path elements.
    #[inline]
    pub fn from_vec(v: Vec<PathEl>) -> BezPath {
        BezPath(v)
    }

    /// Push a generic path element onto the path.
    #[inline]
    pub fn push(&mut self, el: PathEl) {
        self.0.push(el);
    }

    /// Push a "move to" element onto the path.
    pub fn move_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::MoveTo(p.into()));
    }

    /// Push a "line to" element onto the path.
    pub fn line_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::LineTo(p.into()));
    }

    /// Push a "quad to" element onto the path.
    pub fn quad_to<P: Into<Point>>(&mut self, p1: P, p2: P) {
        self.push(PathEl::QuadTo(p1.into(), p2.into()));
    }

    /// Push a "curve to" element onto the path.
    pub fn curve_to<P: Into<Point>>(&mut self, p1: P, p2: P, p3: P) {
        self.push(PathEl::CurveTo(p1.into(), p2.into(), p3.into()));
    }

    /// Push a "close path" element onto the path.
    pub fn close_path(&mut self) {
        self.push(PathEl::ClosePath);
    }

    /// Get the path elements.
    #[inline]
    pub fn elements(&self) -> &[PathEl] {
        &self.0
    }

    /// Returns `true` if the path contains no segments.
    pub fn is_empty(&self) -> bool {
        !self
            .0
            .iter()
            .any(|el| matches!(el, PathEl::LineTo(..) | PathEl::QuadTo(..) | PathEl::CurveTo(..)))
    }

    /// Iterate over the path segments.
    ///
    /// A `ClosePath` whose subpath already ends at its start point produces
    /// no segment.
    pub fn segments(&self) -> impl Iterator<Item = PathSeg> + '_ {
        BezPathSegs {
            c: self.0.iter(),
            start: Point::ZERO,
            last: Point::ZERO,
        }
    }

    /// Apply an affine transform to the path.
    pub fn apply_affine(&mut self, affine: Affine) {
        for el in self.0.iter_mut() {
            *el = affine * (*el);
        }
    }

    /// The smallest rectangle that encloses the curves of the path.
    ///
    /// This is the tight box through the curve extrema, not the hull of the
    /// control points. A path made of a lone `MoveTo` reports that point;
    /// an element-less path reports [`Rect::EMPTY`].
    pub fn bounding_box(&self) -> Rect {
        let mut bbox = Rect::EMPTY;
        for el in &self.0 {
            if let PathEl::MoveTo(p) = el {
                bbox = bbox.union_pt(*p);
            }
        }
        self.segments()
            .fold(bbox, |acc, seg| acc.union(seg.bounding_box()))
    }

    /// Approximate the path with straight lines.
    ///
    /// The callback receives `MoveTo`, `LineTo` and `ClosePath` elements only.
    /// Each curve is subdivided until it lies within `tolerance` of its
    /// chords.
    pub fn flatten(&self, tolerance: f64, mut callback: impl FnMut(PathEl)) {
        let mut last = Point::ZERO;
        for el in &self.0 {
            match *el {
                PathEl::MoveTo(p) => {
                    last = p;
                    callback(PathEl::MoveTo(p));
                }
                PathEl::LineTo(p) => {
                    last = p;
                    callback(PathEl::LineTo(p));
                }
                PathEl::QuadTo(p1, p2) => {
                    QuadBez::new(last, p1, p2)
                        .flatten(tolerance, &mut |p| callback(PathEl::LineTo(p)));
                    last = p2;
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    CubicBez::new(last, p1, p2, p3)
                        .flatten(tolerance, &mut |p| callback(PathEl::LineTo(p)));
                    last = p3;
                }
                PathEl::ClosePath => callback(PathEl::ClosePath),
            }
        }
    }

    /// Flatten into one polyline per subpath.
    ///
    /// Closed subpaths repeat their first vertex at the end, so every
    /// consecutive pair of vertices is an edge of the outline.
    pub fn to_polylines(&self, tolerance: f64) -> Vec<Vec<Point>> {
        let mut polylines: Vec<Vec<Point>> = Vec::new();
        self.flatten(tolerance, |el| match el {
            PathEl::MoveTo(p) => polylines.push(vec![p]),
            PathEl::LineTo(p) => match polylines.last_mut() {
                Some(line) => line.push(p),
                None => polylines.push(vec![p]),
            },
            PathEl::ClosePath => {
                if let Some(line) = polylines.last_mut() {
                    if let (Some(&first), Some(&last)) = (line.first(), line.last()) {
                        if first != last {
                            line.push(first);
                        }
                    }
                }
            }
            PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
        });
        polylines
    }

    /// Total length of the flattened path.
    pub fn perimeter(&self, tolerance: f64) -> f64 {
        self.to_polylines(tolerance)
            .iter()
            .flat_map(|line| line.windows(2))
            .map(|w| w[0].distance(w[1]))
            .sum()
    }

    /// Nonzero winding number of `p` against the flattened outline.
    ///
    /// Every subpath is treated as closed, as a fill would.
    pub fn winding(&self, p: Point, tolerance: f64) -> i32 {
        let mut winding = 0;
        for mut line in self.to_polylines(tolerance) {
            if let (Some(&first), Some(&last)) = (line.first(), line.last()) {
                if first != last {
                    line.push(first);
                }
            }
            for w in line.windows(2) {
                winding += edge_winding(w[0], w[1], p);
            }
        }
        winding
    }

    /// Whether the filled interior of the path contains `p`.
    #[inline]
    pub fn contains(&self, p: Point, tolerance: f64) -> bool {
        self.winding(p, tolerance) != 0
    }

    /// Whether `p` lies within `radius` of the path's outline.
    ///
    /// The outline is flattened with `tolerance` first, so curves are hit
    /// to within `radius + tolerance`.
    pub fn outline_contains(&self, p: Point, radius: f64, tolerance: f64) -> bool {
        let r2 = radius * radius;
        self.to_polylines(tolerance).iter().any(|line| match line.as_slice() {
            [single] => single.distance_squared(p) <= r2,
            _ => line
                .windows(2)
                .any(|w| Line::new(w[0], w[1]).nearest(p).1 <= r2),
        })
    }
}

/// Winding contribution of one polygon edge, casting a ray toward +x.
fn edge_winding(a: Point, b: Point, p: Point) -> i32 {
    if a.y <= p.y {
        if b.y > p.y && (b - a).cross(p - a) > 0.0 {
            return 1;
        }
    } else if b.y <= p.y && (b - a).cross(p - a) < 0.0 {
        return -1;
    }
    0
}

impl<'a> IntoIterator for &'a BezPath {
    type Item = PathEl;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, PathEl>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements().iter().copied()
    }
}

impl FromIterator<PathEl> for BezPath {
    fn from_iter<T: IntoIterator<Item = PathEl>>(iter: T) -> Self {
        BezPath(iter.into_iter().collect())
    }
}

impl Mul<PathEl> for Affine {
    type Output = PathEl;

    fn mul(self, other: PathEl) -> PathEl {
        match other {
            PathEl::MoveTo(p) => PathEl::MoveTo(self * p),
            PathEl::LineTo(p) => PathEl::LineTo(self * p),
            PathEl::QuadTo(p1, p2) => PathEl::QuadTo(self * p1, self * p2),
            PathEl::CurveTo(p1, p2, p3) => PathEl::CurveTo(self * p1, self * p2, self * p3),
            PathEl::ClosePath => PathEl::ClosePath,
        }
    }
}

impl Mul<&BezPath> for Affine {
    type Output = BezPath;

    fn mul(self, other: &BezPath) -> BezPath {
        other.0.iter().map(|&el| self * el).collect()
    }
}

struct BezPathSegs<'a> {
    c: core::slice::Iter<'a, PathEl>,
    start: Point,
    last: Point,
}

impl Iterator for BezPathSegs<'_> {
    type Item = PathSeg;

    fn next(&mut self) -> Option<PathSeg> {
        for el in &mut self.c {
            let (ret, last) = match *el {
                PathEl::MoveTo(p) => {
                    self.start = p;
                    self.last = p;
                    continue;
                }
                PathEl::LineTo(p) => (PathSeg::Line(Line::new(self.last, p)), p),
                PathEl::QuadTo(p1, p2) => (PathSeg::Quad(QuadBez::new(self.last, p1, p2)), p2),
                PathEl::CurveTo(p1, p2, p3) => {
                    (PathSeg::Cubic(CubicBez::new(self.last, p1, p2, p3)), p3)
                }
                PathEl::ClosePath => {
                    if self.last != self.start {
                        (PathSeg::Line(Line::new(self.last, self.start)), self.start)
                    } else {
                        continue;
                    }
                }
            };

            self.last = last;
            return Some(ret);
        }
        None
    }
}

impl ParamCurve for PathSeg {
    fn eval(&self, t: f64) -> Point {
        match *self {
            PathSeg::Line(line) => line.eval(t),
            PathSeg::Quad(quad) => quad.eval(t),
            PathSeg::Cubic(cubic) => cubic.eval(t),
        }
    }

    fn subsegment(&self, range: Range<f64>) -> PathSeg {
        match *self {
            PathSeg::Line(line) => PathSeg::Line(line.subsegment(range)),
            PathSeg::Quad(quad) => PathSeg::Quad(quad.subsegment(range)),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(cubic.subsegment(range)),
        }
    }
}

impl ParamCurveExtrema for PathSeg {
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        match *self {
            PathSeg::Line(line) => line.extrema(),
            PathSeg::Quad(quad) => quad.extrema(),
            PathSeg::Cubic(cubic) => cubic.extrema(),
        }
    }
}

impl ParamCurveFlatten for PathSeg {
    fn flatness(&self) -> f64 {
        match *self {
            PathSeg::Line(line) => line.flatness(),
            PathSeg::Quad(quad) => quad.flatness(),
            PathSeg::Cubic(cubic) => cubic.flatness(),
        }
    }
}

impl PathSeg {
    /// Convert this segment to a cubic bezier.
    pub fn to_cubic(&self) -> CubicBez {
        match *self {
            PathSeg::Line(Line { p0, p1 }) => CubicBez::new(p0, p0, p1, p1),
            PathSeg::Cubic(c) => c,
            PathSeg::Quad(q) => q.raise(),
        }
    }
}
