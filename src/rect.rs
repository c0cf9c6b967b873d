// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangles in origin/size form, with an empty sentinel.

use core::fmt;

use crate::{Affine, Point, Vec2};

/// An axis-aligned rectangle stored as origin and size.
///
/// Figures report their bounds and drawing areas as `Rect`s. A rectangle with
/// negative width or height is *empty*; [`Rect::EMPTY`] is the canonical empty
/// value and acts as the identity for [`Rect::union`], so that unioning the
/// bounds of an empty composite into a parent is a no-op.
///
/// ```
/// use bezfig::Rect;
///
/// let r = Rect::new(0.0, 0.0, 5.0, 5.0);
/// assert_eq!(Rect::EMPTY.union(r), r);
/// assert_eq!(r.union(Rect::new(10.0, 10.0, 5.0, 5.0)), Rect::new(0.0, 0.0, 15.0, 15.0));
/// ```
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// The minimum x coordinate (left edge).
    pub x: f64,
    /// The minimum y coordinate (top edge in y-down spaces).
    pub y: f64,
    /// The width. Negative for an empty rectangle.
    pub width: f64,
    /// The height. Negative for an empty rectangle.
    pub height: f64,
}

impl Rect {
    /// The canonical empty rectangle, `(0, 0, -1, -1)`.
    pub const EMPTY: Rect = Rect::new(0.0, 0.0, -1.0, -1.0);

    /// A new rectangle from origin and size.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// The smallest rectangle containing both points.
    ///
    /// The result has non-negative width and height.
    #[inline]
    pub fn from_points(p0: impl Into<Point>, p1: impl Into<Point>) -> Rect {
        let p0 = p0.into();
        let p1 = p1.into();
        let x = p0.x.min(p1.x);
        let y = p0.y.min(p1.y);
        Rect::new(x, y, p0.x.max(p1.x) - x, p0.y.max(p1.y) - y)
    }

    /// A zero-size rectangle located at `p`.
    ///
    /// Unlike [`Rect::EMPTY`], this is not empty: it contains `p`.
    #[inline]
    pub fn from_point(p: Point) -> Rect {
        Rect::new(p.x, p.y, 0.0, 0.0)
    }

    /// The bounding box of a sequence of points, or [`Rect::EMPTY`].
    pub fn from_point_iter(points: impl IntoIterator<Item = Point>) -> Rect {
        points
            .into_iter()
            .fold(Rect::EMPTY, |acc, p| acc.union_pt(p))
    }

    /// Whether this is an empty rectangle.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width < 0.0 || self.height < 0.0
    }

    /// The maximum x coordinate.
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// The maximum y coordinate.
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// The top-left corner.
    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The center point of the rectangle.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + 0.5 * self.width, self.y + 0.5 * self.height)
    }

    /// The four corners, clockwise from the origin in y-down space.
    #[inline]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.max_x(), self.y),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.x, self.max_y()),
        ]
    }

    /// The smallest rectangle enclosing two rectangles.
    ///
    /// An empty operand contributes nothing.
    #[inline]
    pub fn union(&self, other: Rect) -> Rect {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return other;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.max_x().max(other.max_x()) - x,
            self.max_y().max(other.max_y()) - y,
        )
    }

    /// Compute the union with one point.
    ///
    /// Unioning a point into [`Rect::EMPTY`] yields a zero-size rectangle at
    /// that point, so a succession of `union_pt` calls yields the bounding box.
    #[inline]
    pub fn union_pt(&self, pt: Point) -> Rect {
        self.union(Rect::from_point(pt))
    }

    /// Grow the rectangle by `dx` on the left and right and `dy` on top and
    /// bottom. Empty rectangles stay empty.
    #[inline]
    pub fn grow(&self, dx: f64, dy: f64) -> Rect {
        if self.is_empty() {
            return *self;
        }
        Rect::new(
            self.x - dx,
            self.y - dy,
            self.width + 2.0 * dx,
            self.height + 2.0 * dy,
        )
    }

    /// Enlarge the rectangle about its origin so that it is at least
    /// `min_width` by `min_height`. Empty rectangles stay empty.
    #[inline]
    pub fn with_min_size(&self, min_width: f64, min_height: f64) -> Rect {
        if self.is_empty() {
            return *self;
        }
        Rect::new(
            self.x,
            self.y,
            self.width.max(min_width),
            self.height.max(min_height),
        )
    }

    /// Whether the point lies in the rectangle, edges included.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        !self.is_empty()
            && p.x >= self.x
            && p.x <= self.max_x()
            && p.y >= self.y
            && p.y <= self.max_y()
    }

    /// Whether the two rectangles overlap, edges included.
    #[inline]
    pub fn overlaps(&self, other: Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x <= other.max_x()
            && other.x <= self.max_x()
            && self.y <= other.max_y()
            && other.y <= self.max_y()
    }

    /// Whether every coordinate is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// The bounding box of this rectangle after applying `affine`.
    ///
    /// Empty rectangles stay empty.
    pub fn transform_bbox(&self, affine: Affine) -> Rect {
        if self.is_empty() {
            return *self;
        }
        Rect::from_point_iter(self.corners().into_iter().map(|p| affine * p))
    }
}

impl Default for Rect {
    #[inline]
    fn default() -> Rect {
        Rect::EMPTY
    }
}

impl core::ops::Add<Vec2> for Rect {
    type Output = Rect;

    #[inline]
    fn add(self, v: Vec2) -> Rect {
        if self.is_empty() {
            return self;
        }
        Rect::new(self.x + v.x, self.y + v.y, self.width, self.height)
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(
                f,
                "Rect {{ origin: ({:?}, {:?}), size: ({:?}, {:?}) }}",
                self.x, self.y, self.width, self.height
            )
        } else {
            write!(
                f,
                "Rect ({:?}, {:?}, {:?}, {:?})",
                self.x, self.y, self.width, self.height
            )
        }
    }
}
