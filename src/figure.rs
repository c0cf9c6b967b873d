// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The figure abstraction shared by path figures and composites.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::common::degenerate_scale;
use crate::{
    Affine, BezierFigure, BoundsCache, CacheState, CompositeFigure, DrawingConfig, Point, Rect,
};

static NEXT_FIGURE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a figure, unique within the process.
///
/// Composites remove children by identity. Cloning a figure gives the clone
/// a fresh id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FigureId(u64);

impl FigureId {
    /// Allocate a new id.
    pub fn next() -> FigureId {
        FigureId(NEXT_FIGURE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw value.
    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// Shared behavior of everything that can be placed in a drawing.
///
/// Bounds and drawing area are served from the figure's [`BoundsCache`];
/// every mutating method leaves the cache dirty and the next read
/// recomputes.
pub trait Figure {
    /// The figure's identity.
    fn id(&self) -> FigureId;

    /// The logical bounds, ignoring stroke and decorations.
    ///
    /// [`Rect::EMPTY`] when there is no geometry.
    fn bounds(&self) -> Rect;

    /// The bounds grown to cover everything the figure paints.
    fn drawing_area(&self) -> Rect;

    /// Whether `p` hits the figure, with tolerances taken from `config`.
    fn hit_test(&self, p: Point, config: &DrawingConfig) -> bool;

    /// Apply `affine` to the figure's geometry.
    fn transform(&mut self, affine: Affine);

    /// Clear the cached bounds and drawing area.
    fn invalidate(&mut self);

    /// The bounds cache, for inspection.
    fn cache(&self) -> &BoundsCache;

    /// Whether the figure is painted and hit-tested.
    fn is_visible(&self) -> bool;

    /// Show or hide the figure.
    fn set_visible(&mut self, visible: bool);

    /// The local transform a parent composite maps this figure's
    /// rectangles through.
    fn transform_attribute(&self) -> Option<Affine>;

    /// Set or clear the local transform.
    fn set_transform_attribute(&mut self, affine: Option<Affine>);

    /// Whether `p` hits the figure, using the default tolerances.
    fn contains(&self, p: Point) -> bool {
        self.hit_test(p, &DrawingConfig::default())
    }

    /// Hit-test `p` given in the parent's coordinates.
    ///
    /// `p` is mapped back through the transform attribute; a transform
    /// that cannot be inverted hits nothing.
    fn mapped_hit_test(&self, p: Point, config: &DrawingConfig) -> bool {
        match self.transform_attribute() {
            Some(affine) => {
                let det = affine.determinant();
                det.is_finite()
                    && det.abs() > f64::EPSILON
                    && self.hit_test(affine.inverse() * p, config)
            }
            None => self.hit_test(p, config),
        }
    }

    /// The bounds in the parent's coordinates, through the transform
    /// attribute.
    fn mapped_bounds(&self) -> Rect {
        let bounds = self.bounds();
        match self.transform_attribute() {
            Some(affine) => bounds.transform_bbox(affine),
            None => bounds,
        }
    }

    /// The drawing area, mapped through the transform attribute if one is
    /// set.
    fn mapped_drawing_area(&self) -> Rect {
        let area = self.drawing_area();
        match self.transform_attribute() {
            Some(affine) => area.transform_bbox(affine),
            None => area,
        }
    }

    /// Whether the cached rectangles are populated.
    fn cache_state(&self) -> CacheState {
        self.cache().state()
    }

    /// Scale and translate the figure so that its bounds become the
    /// rectangle spanned by `anchor` and `lead`.
    ///
    /// A scale factor that would be zero, tiny, or not finite is replaced
    /// by 1, leaving that axis unscaled. A figure without geometry is left
    /// alone.
    fn set_bounds(&mut self, anchor: Point, lead: Point) {
        let old = self.bounds();
        if old.is_empty() {
            return;
        }
        let new = Rect::from_points(anchor, lead);
        let mut sx = new.width / old.width;
        let mut sy = new.height / old.height;
        if let Some(s) = degenerate_scale(sx) {
            log::warn!("degenerate horizontal scale {sx} replaced by {s}");
            sx = s;
        }
        if let Some(s) = degenerate_scale(sy) {
            log::warn!("degenerate vertical scale {sy} replaced by {s}");
            sy = s;
        }
        let affine = Affine::translate(new.origin().to_vec2())
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate(-old.origin().to_vec2());
        self.transform(affine);
    }
}

/// Any figure that can sit in a composite.
#[derive(Clone, Debug)]
pub enum AnyFigure {
    /// A single path.
    Bezier(BezierFigure),
    /// A group of figures.
    Composite(CompositeFigure),
}

impl AnyFigure {
    /// The path figure, if this is one.
    pub fn as_bezier(&self) -> Option<&BezierFigure> {
        match self {
            AnyFigure::Bezier(f) => Some(f),
            AnyFigure::Composite(_) => None,
        }
    }

    /// The path figure, if this is one.
    pub fn as_bezier_mut(&mut self) -> Option<&mut BezierFigure> {
        match self {
            AnyFigure::Bezier(f) => Some(f),
            AnyFigure::Composite(_) => None,
        }
    }

    /// The composite, if this is one.
    pub fn as_composite(&self) -> Option<&CompositeFigure> {
        match self {
            AnyFigure::Composite(f) => Some(f),
            AnyFigure::Bezier(_) => None,
        }
    }

    /// The composite, if this is one.
    pub fn as_composite_mut(&mut self) -> Option<&mut CompositeFigure> {
        match self {
            AnyFigure::Composite(f) => Some(f),
            AnyFigure::Bezier(_) => None,
        }
    }

    fn as_dyn(&self) -> &dyn Figure {
        match self {
            AnyFigure::Bezier(f) => f,
            AnyFigure::Composite(f) => f,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn Figure {
        match self {
            AnyFigure::Bezier(f) => f,
            AnyFigure::Composite(f) => f,
        }
    }
}

impl Figure for AnyFigure {
    fn id(&self) -> FigureId {
        self.as_dyn().id()
    }

    fn bounds(&self) -> Rect {
        self.as_dyn().bounds()
    }

    fn drawing_area(&self) -> Rect {
        self.as_dyn().drawing_area()
    }

    fn hit_test(&self, p: Point, config: &DrawingConfig) -> bool {
        self.as_dyn().hit_test(p, config)
    }

    fn transform(&mut self, affine: Affine) {
        self.as_dyn_mut().transform(affine);
    }

    fn invalidate(&mut self) {
        self.as_dyn_mut().invalidate();
    }

    fn cache(&self) -> &BoundsCache {
        self.as_dyn().cache()
    }

    fn is_visible(&self) -> bool {
        self.as_dyn().is_visible()
    }

    fn set_visible(&mut self, visible: bool) {
        self.as_dyn_mut().set_visible(visible);
    }

    fn transform_attribute(&self) -> Option<Affine> {
        self.as_dyn().transform_attribute()
    }

    fn set_transform_attribute(&mut self, affine: Option<Affine>) {
        self.as_dyn_mut().set_transform_attribute(affine);
    }

    fn set_bounds(&mut self, anchor: Point, lead: Point) {
        self.as_dyn_mut().set_bounds(anchor, lead);
    }
}

impl From<BezierFigure> for AnyFigure {
    fn from(f: BezierFigure) -> Self {
        AnyFigure::Bezier(f)
    }
}

impl From<CompositeFigure> for AnyFigure {
    fn from(f: CompositeFigure) -> Self {
        AnyFigure::Composite(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodePath;

    fn square(x: f64, y: f64, size: f64) -> BezierFigure {
        BezierFigure::new(
            NodePath::from_points([(x, y), (x + size, y), (x + size, y + size), (x, y + size)])
                .with_closed(true),
        )
    }

    #[test]
    fn ids_are_unique() {
        let a = FigureId::next();
        let b = FigureId::next();
        assert_ne!(a, b);
        let fig = square(0.0, 0.0, 1.0);
        assert_ne!(fig.clone().id(), fig.id());
    }

    #[test]
    fn mapped_bounds_use_transform_attribute() {
        let mut fig: AnyFigure = square(0.0, 0.0, 10.0).into();
        assert_eq!(fig.mapped_bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
        fig.set_transform_attribute(Some(Affine::translate((5.0, 5.0))));
        assert_eq!(fig.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(fig.mapped_bounds(), Rect::new(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn set_bounds_scales_and_moves() {
        let mut fig = square(0.0, 0.0, 10.0);
        fig.set_bounds(Point::new(30.0, 40.0), Point::new(10.0, 20.0));
        assert_eq!(fig.bounds(), Rect::new(10.0, 20.0, 20.0, 20.0));
    }

    #[test]
    fn set_bounds_to_zero_width_keeps_geometry_finite() {
        let mut fig = square(0.0, 0.0, 10.0);
        fig.set_bounds(Point::new(5.0, 0.0), Point::new(5.0, 20.0));
        let bounds = fig.bounds();
        assert!(bounds.is_finite());
        assert_eq!(bounds, Rect::new(5.0, 0.0, 10.0, 20.0));
    }

    #[test]
    fn accessors() {
        let mut fig: AnyFigure = CompositeFigure::new().into();
        assert!(fig.as_bezier().is_none());
        assert!(fig.as_composite_mut().is_some());
        let fig: AnyFigure = square(0.0, 0.0, 1.0).into();
        assert!(fig.as_bezier().is_some());
        assert!(fig.as_composite().is_none());
    }
}
