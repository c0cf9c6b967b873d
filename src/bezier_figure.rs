// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Figures backed by a single node path.

use std::cell::OnceCell;

use crate::{
    Affine, ArrowTip, BoundsCache, ControlPoint, DrawingConfig, Figure, FigureError, FigureId,
    Line, Mask, NodePath, PathNode, Point, Rect, StrokeStyle, MIN_BOUNDS_EXTENT,
};

/// A stroked bezier path, optionally closed and decorated.
///
/// All path edits go through the figure so that its cached rectangles are
/// cleared along with the path's own caches.
///
/// ```
/// use bezfig::{BezierFigure, Figure, NodePath, Point, Rect};
///
/// let mut fig = BezierFigure::new(NodePath::from_points([(0.0, 0.0), (10.0, 0.0)]));
/// assert_eq!(fig.split_segment(Point::new(5.0, 0.0), 1.0), Some(1));
/// // A horizontal line still gets a paintable height.
/// assert_eq!(fig.bounds(), Rect::new(0.0, 0.0, 10.0, 1.0));
/// ```
#[derive(Debug)]
pub struct BezierFigure {
    id: FigureId,
    path: NodePath,
    style: StrokeStyle,
    visible: bool,
    transform_attribute: Option<Affine>,
    cache: BoundsCache,
    capped: OnceCell<NodePath>,
}

impl Clone for BezierFigure {
    fn clone(&self) -> Self {
        BezierFigure {
            id: FigureId::next(),
            path: self.path.clone(),
            style: self.style,
            visible: self.visible,
            transform_attribute: self.transform_attribute,
            cache: BoundsCache::new(),
            capped: OnceCell::new(),
        }
    }
}

impl Default for BezierFigure {
    fn default() -> Self {
        BezierFigure::new(NodePath::new())
    }
}

impl BezierFigure {
    /// A visible figure with the default stroke.
    pub fn new(path: NodePath) -> BezierFigure {
        BezierFigure {
            id: FigureId::next(),
            path,
            style: StrokeStyle::default(),
            visible: true,
            transform_attribute: None,
            cache: BoundsCache::new(),
            capped: OnceCell::new(),
        }
    }

    /// Builder method for the stroke style.
    #[must_use]
    pub fn with_style(mut self, style: StrokeStyle) -> BezierFigure {
        self.set_style(style);
        self
    }

    /// The path.
    #[inline]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// Mutable access to the path.
    ///
    /// The figure's caches are cleared up front, since any edit made
    /// through the returned reference may change the geometry.
    pub fn path_mut(&mut self) -> &mut NodePath {
        self.invalidate();
        &mut self.path
    }

    /// The stroke style.
    #[inline]
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Replace the stroke style.
    pub fn set_style(&mut self, style: StrokeStyle) {
        if self.style != style {
            self.style = style;
            self.invalidate();
        }
    }

    /// The number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.path.len()
    }

    /// See [`NodePath::node`].
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index` is not a node index.
    pub fn node(&self, index: usize) -> Result<PathNode, FigureError> {
        self.path.node(index)
    }

    /// See [`NodePath::add_node`].
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index > node_count()`.
    pub fn add_node(&mut self, index: usize, node: PathNode) -> Result<(), FigureError> {
        self.path.add_node(index, node)?;
        self.invalidate();
        Ok(())
    }

    /// See [`NodePath::remove_node`].
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index` is not a node index.
    pub fn remove_node(&mut self, index: usize) -> Result<PathNode, FigureError> {
        let node = self.path.remove_node(index)?;
        self.invalidate();
        Ok(node)
    }

    /// See [`NodePath::set_node`].
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index` is not a node index.
    pub fn set_node(&mut self, index: usize, node: PathNode) -> Result<PathNode, FigureError> {
        let old = self.path.set_node(index, node)?;
        self.invalidate();
        Ok(old)
    }

    /// See [`NodePath::point`].
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index` is not a node index.
    pub fn point(&self, index: usize, which: ControlPoint) -> Result<Point, FigureError> {
        self.path.point(index, which)
    }

    /// See [`NodePath::set_point`].
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index` is not a node index.
    pub fn set_point(
        &mut self,
        index: usize,
        which: ControlPoint,
        p: Point,
    ) -> Result<(), FigureError> {
        self.path.set_point(index, which, p)?;
        self.invalidate();
        Ok(())
    }

    /// See [`NodePath::cycle_node_type`].
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index` is not a node index.
    pub fn cycle_node_type(&mut self, index: usize) -> Result<Mask, FigureError> {
        let mask = self.path.cycle_node_type(index)?;
        self.invalidate();
        Ok(mask)
    }

    /// See [`NodePath::point_on_path`].
    #[inline]
    pub fn point_on_path(&self, relative: f64, flatness: f64) -> Option<Point> {
        self.path.point_on_path(relative, flatness)
    }

    /// See [`NodePath::find_node`].
    #[inline]
    pub fn find_node(&self, p: Point) -> Option<usize> {
        self.path.find_node(p)
    }

    /// See [`NodePath::find_segment`].
    #[inline]
    pub fn find_segment(&self, p: Point, tolerance: f64) -> Option<usize> {
        self.path.find_segment(p, tolerance)
    }

    /// See [`NodePath::split_segment`].
    pub fn split_segment(&mut self, p: Point, tolerance: f64) -> Option<usize> {
        let index = self.path.split_segment(p, tolerance)?;
        self.invalidate();
        Some(index)
    }

    /// See [`NodePath::join_segments`].
    pub fn join_segments(&mut self, p: Point, tolerance: f64) -> bool {
        let joined = self.path.join_segments(p, tolerance);
        if joined {
            self.invalidate();
        }
        joined
    }

    /// See [`NodePath::center`].
    #[inline]
    pub fn center(&self) -> Option<Point> {
        self.path.center()
    }

    /// The main point of the first node.
    #[inline]
    pub fn start_point(&self) -> Option<Point> {
        self.path.start_point()
    }

    /// The main point of the last node.
    #[inline]
    pub fn end_point(&self) -> Option<Point> {
        self.path.end_point()
    }

    /// Whether the path is closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.path.is_closed()
    }

    /// Open or close the path.
    pub fn set_closed(&mut self, closed: bool) {
        if self.path.is_closed() != closed {
            self.path.set_closed(closed);
            self.invalidate();
        }
    }

    /// Where a connecting line aimed at `p` should end on this figure.
    ///
    /// See [`NodePath::chop`]. For a closed path with a visible stroke the
    /// result is pushed outward by the stroke's [growth], so that the line
    /// stops on the painted edge rather than the centerline.
    ///
    /// [growth]: StrokeStyle::growth
    pub fn chop(&self, p: Point) -> Point {
        let hit = self.path.chop(p);
        let growth = self.style.growth();
        if !self.path.is_closed() || growth <= 0.0 {
            return hit;
        }
        let Some(center) = self.path.center() else {
            return hit;
        };
        let dir = hit - center;
        let len = dir.hypot();
        if len == 0.0 {
            hit
        } else {
            hit + dir * (growth / len)
        }
    }

    /// The path with its open ends pulled back under the decorations.
    ///
    /// Each decorated end moves toward its tangent point by the decoration
    /// radius, but never past it. Closed paths, and paths with fewer than
    /// two nodes, are returned as they are.
    pub fn capped_path(&self) -> &NodePath {
        self.capped.get_or_init(|| self.build_capped_path())
    }

    fn build_capped_path(&self) -> NodePath {
        let mut capped = self.path.clone();
        if self.path.is_closed() || self.path.len() < 2 {
            return capped;
        }
        let last = self.path.len() - 1;
        let ends = [
            (0, self.style.start_decoration, self.start_tangent()),
            (last, self.style.end_decoration, self.end_tangent()),
        ];
        for (index, tip, tangent) in ends {
            let (Some(tip), Some((p1, p2))) = (tip, tangent) else {
                continue;
            };
            let radius = tip.decoration_radius(&self.style).min(p1.distance(p2));
            let node = self.path.nodes()[index];
            let moved = PathNode::from_mask(
                node.mask(),
                Line::cap(p2, p1, -radius),
                node.c1(),
                node.c2(),
            )
            .with_keep_colinear(node.keep_colinear());
            if let Err(err) = capped.set_node(index, moved) {
                log::error!("capping path end {index}: {err}");
            }
        }
        capped
    }

    /// The first main point and the point the path leaves it toward.
    fn start_tangent(&self) -> Option<(Point, Point)> {
        let [first, second, ..] = self.path.nodes() else {
            return None;
        };
        let toward = if first.mask().contains(Mask::C2) {
            first.c2()
        } else if second.mask().contains(Mask::C1) {
            second.c1()
        } else {
            second.point()
        };
        Some((first.point(), toward))
    }

    /// The last main point and the point the path arrives from.
    fn end_tangent(&self) -> Option<(Point, Point)> {
        let [.., before, last] = self.path.nodes() else {
            return None;
        };
        let from = if last.mask().contains(Mask::C1) {
            last.c1()
        } else if before.mask().contains(Mask::C2) {
            before.c2()
        } else {
            before.point()
        };
        Some((last.point(), from))
    }

    fn decorations(&self) -> impl Iterator<Item = (ArrowTip, Point, Point)> + '_ {
        let open = !self.path.is_closed();
        let start = self
            .style
            .start_decoration
            .zip(self.start_tangent())
            .filter(|_| open);
        let end = self
            .style
            .end_decoration
            .zip(self.end_tangent())
            .filter(|_| open);
        start
            .into_iter()
            .chain(end)
            .map(|(tip, (p1, p2))| (tip, p1, p2))
    }

    fn compute_bounds(&self) -> Rect {
        self.path
            .bounds()
            .with_min_size(MIN_BOUNDS_EXTENT, MIN_BOUNDS_EXTENT)
    }

    fn compute_drawing_area(&self) -> Rect {
        let bounds = self.bounds();
        if bounds.is_empty() {
            return bounds;
        }
        let growth = self.style.growth();
        self.decorations()
            .fold(bounds.grow(growth, growth), |area, (tip, p1, p2)| {
                area.union(tip.drawing_area(&self.style, p1, p2))
            })
    }
}

impl Figure for BezierFigure {
    fn id(&self) -> FigureId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.cache.bounds(|| self.compute_bounds())
    }

    fn drawing_area(&self) -> Rect {
        self.cache.drawing_area(|| self.compute_drawing_area())
    }

    /// Closed paths are hit inside their fill or near their outline; open
    /// paths near their capped centerline or inside a decoration.
    fn hit_test(&self, p: Point, config: &DrawingConfig) -> bool {
        if !self.drawing_area().contains(p) {
            return false;
        }
        let tolerance = self.style.hit_tolerance(config.min_hit_tolerance);
        if self.path.is_closed() {
            let outline = self.path.to_bez_path();
            return outline.contains(p, config.flatness)
                || outline.outline_contains(p, tolerance, config.flatness);
        }
        self.capped_path()
            .to_bez_path()
            .outline_contains(p, tolerance, config.flatness)
            || self
                .decorations()
                .any(|(tip, p1, p2)| tip.contains(&self.style, p1, p2, p))
    }

    fn transform(&mut self, affine: Affine) {
        self.path.apply_affine(affine);
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.capped.take();
        self.cache.invalidate();
    }

    fn cache(&self) -> &BoundsCache {
        &self.cache
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.invalidate();
        }
    }

    fn transform_attribute(&self) -> Option<Affine> {
        self.transform_attribute
    }

    fn set_transform_attribute(&mut self, affine: Option<Affine>) {
        self.transform_attribute = affine;
        self.invalidate();
    }
}
