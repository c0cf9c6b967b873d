// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arrowheads on the ends of open paths.

use smallvec::SmallVec;

use crate::{Affine, BezPath, Join, Point, Rect, StrokeStyle};

/// An arrowhead decoration.
///
/// The tip sits on the end point of the line. Two barbs run back from it at
/// `±angle` (radians) to the line direction, `outer_radius` long; when
/// `inner_radius` is non-zero the back of the head is notched at that
/// distance behind the tip.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrowTip {
    /// Half the opening angle of the head.
    pub angle: f64,
    /// Length of the barbs.
    pub outer_radius: f64,
    /// Depth of the notch, or 0 for a triangular head.
    pub inner_radius: f64,
    /// Whether the head is filled.
    pub filled: bool,
    /// Whether the head is outlined with the line's stroke.
    pub stroked: bool,
    /// Whether the head grows with the stroke width.
    pub scaled_by_stroke: bool,
}

impl Default for ArrowTip {
    fn default() -> Self {
        ArrowTip::new(0.35, 12.0, 11.3)
    }
}

impl ArrowTip {
    /// A filled, unstroked arrowhead scaled by the stroke width.
    pub const fn new(angle: f64, outer_radius: f64, inner_radius: f64) -> ArrowTip {
        ArrowTip {
            angle,
            outer_radius,
            inner_radius,
            filled: true,
            stroked: false,
            scaled_by_stroke: true,
        }
    }

    fn scale(&self, style: &StrokeStyle) -> f64 {
        if self.scaled_by_stroke {
            style.width
        } else {
            1.0
        }
    }

    /// The transform from the head's local frame to the line end `p1`.
    ///
    /// In the local frame the tip is at the origin and the line runs toward
    /// `+y`; `p2` is the neighbouring point the line comes from.
    fn placement(&self, style: &StrokeStyle, p1: Point, p2: Point) -> Affine {
        let rotation = (p1.x - p2.x).atan2(p2.y - p1.y);
        Affine::translate(p1.to_vec2()) * Affine::rotate(rotation) * Affine::scale(self.scale(style))
    }

    /// The outline of the head placed on the end `p1` of the line `p2 → p1`.
    pub fn polygon(&self, style: &StrokeStyle, p1: Point, p2: Point) -> SmallVec<[Point; 4]> {
        let (sin, cos) = self.angle.sin_cos();
        let outer = self.outer_radius;
        let mut local: SmallVec<[Point; 4]> = SmallVec::new();
        local.push(Point::new(-outer * sin, outer * cos));
        local.push(Point::ZERO);
        local.push(Point::new(outer * sin, outer * cos));
        if self.inner_radius != 0.0 {
            local.push(Point::new(0.0, self.inner_radius));
        }
        let placement = self.placement(style, p1, p2);
        local.into_iter().map(|p| placement * p).collect()
    }

    /// The polygon as a closed path.
    pub fn outline(&self, style: &StrokeStyle, p1: Point, p2: Point) -> BezPath {
        let mut path = BezPath::new();
        for (i, p) in self.polygon(style, p1, p2).into_iter().enumerate() {
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        path.close_path();
        path
    }

    /// The area the head paints.
    ///
    /// The polygon's bounds, grown by the stroke width (times the miter
    /// limit for miter joins) when the head is stroked, and by one unit
    /// otherwise.
    pub fn drawing_area(&self, style: &StrokeStyle, p1: Point, p2: Point) -> Rect {
        let grow = if self.stroked {
            match style.join {
                Join::Miter => style.width * style.miter_limit,
                _ => style.width,
            }
        } else {
            1.0
        };
        Rect::from_point_iter(self.polygon(style, p1, p2)).grow(grow, grow)
    }

    /// How far the line end must be pulled back so it does not show through
    /// the tip.
    pub fn decoration_radius(&self, style: &StrokeStyle) -> f64 {
        let radius = if self.inner_radius == 0.0 {
            self.outer_radius * self.angle.cos()
        } else {
            self.inner_radius
        };
        radius * self.scale(style)
    }

    /// Whether the painted head covers `point`.
    pub fn contains(&self, style: &StrokeStyle, p1: Point, p2: Point, point: Point) -> bool {
        let outline = self.outline(style, p1, p2);
        (self.filled && outline.contains(point, crate::DEFAULT_FLATNESS))
            || (self.stroked
                && outline.outline_contains(point, style.width * 0.5, crate::DEFAULT_FLATNESS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(p0: Point, p1: Point) {
        assert!((p1 - p0).hypot() < 1e-9, "{p0:?} != {p1:?}");
    }

    #[test]
    fn polygon_points_back_along_the_line() {
        let tip = ArrowTip::new(core::f64::consts::FRAC_PI_4, 2.0_f64.sqrt(), 0.0);
        let style = StrokeStyle::new(1.0);
        // Line arriving from the left at the origin.
        let poly = tip.polygon(&style, Point::ZERO, Point::new(-10.0, 0.0));
        assert_eq!(poly.len(), 3);
        assert_near(poly[1], Point::ZERO);
        assert!(poly[0].x < 0.0 && poly[2].x < 0.0);
        assert_near(Point::new(poly[0].x, poly[0].y.abs()), Point::new(-1.0, 1.0));
        assert_near(Point::new(poly[2].x, poly[2].y.abs()), Point::new(-1.0, 1.0));
    }

    #[test]
    fn notch_adds_a_vertex() {
        let style = StrokeStyle::new(1.0);
        let poly = ArrowTip::default().polygon(&style, Point::ZERO, Point::new(0.0, 10.0));
        assert_eq!(poly.len(), 4);
        assert_near(poly[3], Point::new(0.0, 11.3));
    }

    #[test]
    fn scaled_by_stroke_width() {
        let tip = ArrowTip::new(0.5, 10.0, 8.0);
        let thin = StrokeStyle::new(1.0);
        let thick = StrokeStyle::new(3.0);
        assert_eq!(tip.decoration_radius(&thin), 8.0);
        assert_eq!(tip.decoration_radius(&thick), 24.0);
        let fixed = ArrowTip {
            scaled_by_stroke: false,
            ..tip
        };
        assert_eq!(fixed.decoration_radius(&thick), 8.0);
        let plain = ArrowTip::new(0.0, 10.0, 0.0);
        assert_eq!(plain.decoration_radius(&thin), 10.0);
    }

    #[test]
    fn drawing_area_covers_polygon() {
        let style = StrokeStyle::new(2.0);
        let tip = ArrowTip::new(0.5, 10.0, 0.0);
        let p1 = Point::new(20.0, 20.0);
        let p2 = Point::new(0.0, 20.0);
        let area = tip.drawing_area(&style, p1, p2);
        for p in tip.polygon(&style, p1, p2) {
            assert!(area.contains(p));
        }
        let stroked = ArrowTip {
            stroked: true,
            ..tip
        };
        let bigger = stroked.drawing_area(&style, p1, p2);
        assert!(bigger.width > area.width + 9.0);
    }

    #[test]
    fn hit_inside_filled_head() {
        let style = StrokeStyle::new(1.0);
        let tip = ArrowTip::new(0.5, 10.0, 0.0);
        let p1 = Point::new(10.0, 0.0);
        let p2 = Point::ZERO;
        assert!(tip.contains(&style, p1, p2, Point::new(7.0, 0.0)));
        assert!(!tip.contains(&style, p1, p2, Point::new(7.0, 6.0)));
        let hollow = ArrowTip {
            filled: false,
            ..tip
        };
        assert!(!hollow.contains(&style, p1, p2, Point::new(7.0, 0.0)));
    }
}
