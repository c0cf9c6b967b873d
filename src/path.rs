// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editable node paths.

use std::cell::OnceCell;

use crate::{
    Affine, BezPath, BoundsCache, ControlPoint, FigureError, Line, Mask, PathNode, Point, Rect,
    Vec2,
};

/// An ordered sequence of [`PathNode`]s, open or closed.
///
/// This is the editable form of a figure's geometry. The curve it describes
/// runs from node to node: a straight line where neither the outgoing control
/// point of the first node nor the incoming control point of the second is
/// active, a quadratic Bézier where one is, and a cubic where both are. A
/// closed path adds the segment from the last node back to the first.
///
/// The drawable [`BezPath`] and the tight bounds are derived lazily and
/// cached; every mutation clears them.
///
/// ```
/// use bezfig::{NodePath, PathNode, Point, Rect};
///
/// let mut path = NodePath::from_nodes([
///     PathNode::new((0.0, 0.0)),
///     PathNode::new((10.0, 0.0)),
///     PathNode::new((10.0, 10.0)),
/// ]);
/// assert_eq!(path.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
///
/// path.add_node(1, PathNode::new((5.0, 5.0))).unwrap();
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.find_node(Point::new(5.0, 5.0)), Some(1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct NodePath {
    nodes: Vec<PathNode>,
    closed: bool,
    outline: OnceCell<BezPath>,
    cache: BoundsCache,
}

impl NodePath {
    /// An empty open path.
    #[inline]
    pub fn new() -> NodePath {
        NodePath::default()
    }

    /// An open path through the given nodes.
    pub fn from_nodes(nodes: impl IntoIterator<Item = PathNode>) -> NodePath {
        NodePath {
            nodes: nodes.into_iter().collect(),
            ..NodePath::default()
        }
    }

    /// An open polyline through the given points.
    pub fn from_points(points: impl IntoIterator<Item = impl Into<Point>>) -> NodePath {
        NodePath::from_nodes(points.into_iter().map(PathNode::new))
    }

    /// Builder method for the closed flag.
    #[must_use]
    pub fn with_closed(mut self, closed: bool) -> NodePath {
        self.set_closed(closed);
        self
    }

    /// The number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the path has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The nodes, in order.
    #[inline]
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    /// The node at `index`.
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index >= len()`.
    #[inline]
    pub fn node(&self, index: usize) -> Result<PathNode, FigureError> {
        FigureError::check_index(index, self.nodes.len())?;
        Ok(self.nodes[index])
    }

    /// Whether the segment from the last node back to the first is drawn.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Open or close the path.
    pub fn set_closed(&mut self, closed: bool) {
        if self.closed != closed {
            self.closed = closed;
            self.invalidate();
        }
    }

    /// Insert `node` before position `index`.
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index > len()`.
    pub fn add_node(&mut self, index: usize, node: PathNode) -> Result<(), FigureError> {
        FigureError::check_insert(index, self.nodes.len())?;
        self.nodes.insert(index, node);
        self.invalidate();
        Ok(())
    }

    /// Append `node` after the last node.
    pub fn push_node(&mut self, node: PathNode) {
        self.nodes.push(node);
        self.invalidate();
    }

    /// Remove and return the node at `index`.
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index >= len()`.
    pub fn remove_node(&mut self, index: usize) -> Result<PathNode, FigureError> {
        FigureError::check_index(index, self.nodes.len())?;
        let node = self.nodes.remove(index);
        self.invalidate();
        Ok(node)
    }

    /// Replace the node at `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index >= len()`.
    pub fn set_node(&mut self, index: usize, node: PathNode) -> Result<PathNode, FigureError> {
        FigureError::check_index(index, self.nodes.len())?;
        let old = core::mem::replace(&mut self.nodes[index], node);
        self.invalidate();
        Ok(old)
    }

    /// Read one coordinate of the node at `index`.
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index >= len()`.
    pub fn point(&self, index: usize, which: ControlPoint) -> Result<Point, FigureError> {
        Ok(self.node(index)?.control_point(which))
    }

    /// Write one coordinate of the node at `index`.
    ///
    /// See [`PathNode::set_control_point`] for how the other coordinates
    /// follow.
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index >= len()`.
    pub fn set_point(
        &mut self,
        index: usize,
        which: ControlPoint,
        p: Point,
    ) -> Result<(), FigureError> {
        FigureError::check_index(index, self.nodes.len())?;
        self.nodes[index].set_control_point(which, p);
        self.invalidate();
        Ok(())
    }

    /// Change the active control points of the node at `index`.
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index >= len()`.
    pub fn set_mask(&mut self, index: usize, mask: Mask) -> Result<(), FigureError> {
        FigureError::check_index(index, self.nodes.len())?;
        self.nodes[index].set_mask(mask);
        self.invalidate();
        Ok(())
    }

    /// Step the node at `index` to its next node type and return the new
    /// mask.
    ///
    /// Interior nodes, and every node of a closed path, cycle through
    /// `NONE → C1 → C1C2 → C2 → NONE`. The first node of an open path has
    /// no incoming segment and toggles between `NONE` and `C2`; the last
    /// node of an open path toggles between `NONE` and `C1`.
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index >= len()`.
    pub fn cycle_node_type(&mut self, index: usize) -> Result<Mask, FigureError> {
        let current = self.node(index)?.mask();
        let next = if !self.closed && index == 0 {
            if current.contains(Mask::C2) {
                Mask::NONE
            } else {
                Mask::C2
            }
        } else if !self.closed && index + 1 == self.nodes.len() {
            if current.contains(Mask::C1) {
                Mask::NONE
            } else {
                Mask::C1
            }
        } else {
            match current {
                Mask::NONE => Mask::C1,
                Mask::C1 => Mask::C1C2,
                Mask::C1C2 => Mask::C2,
                _ => Mask::NONE,
            }
        };
        self.set_mask(index, next)?;
        Ok(next)
    }

    /// The main point of the first node.
    #[inline]
    pub fn start_point(&self) -> Option<Point> {
        self.nodes.first().map(PathNode::point)
    }

    /// The main point of the last node.
    #[inline]
    pub fn end_point(&self) -> Option<Point> {
        self.nodes.last().map(PathNode::point)
    }

    /// The arithmetic mean of the node main points.
    pub fn center(&self) -> Option<Point> {
        if self.nodes.is_empty() {
            return None;
        }
        let sum = self
            .nodes
            .iter()
            .fold(Vec2::ZERO, |acc, node| acc + node.point().to_vec2());
        #[allow(clippy::cast_precision_loss, reason = "node counts are far below 2^52")]
        let n = self.nodes.len() as f64;
        Some((sum / n).to_point())
    }

    /// The index of the first node whose main point is exactly `p`.
    pub fn find_node(&self, p: Point) -> Option<usize> {
        self.nodes.iter().position(|node| node.point() == p)
    }

    /// The index of the first segment whose chord passes within `tolerance`
    /// of `p`.
    ///
    /// Segment `i` runs from node `i` to node `i + 1`; on a closed path,
    /// segment `len() - 1` runs from the last node back to the first. The
    /// test uses the straight chord between main points and ignores
    /// curvature.
    pub fn find_segment(&self, p: Point, tolerance: f64) -> Option<usize> {
        let hit = |a: &PathNode, b: &PathNode| {
            Line::new(a.point(), b.point()).distance_to(p) <= tolerance
        };
        if let Some(i) = self.nodes.windows(2).position(|w| hit(&w[0], &w[1])) {
            return Some(i);
        }
        match (self.closed, self.nodes.first(), self.nodes.last()) {
            (true, Some(first), Some(last)) if self.nodes.len() > 1 && hit(last, first) => {
                Some(self.nodes.len() - 1)
            }
            _ => None,
        }
    }

    /// Insert a corner node at `p` into the segment hit by `p`.
    ///
    /// Returns the index of the new node, or `None` (leaving the path
    /// unchanged) if no segment is within `tolerance`.
    pub fn split_segment(&mut self, p: Point, tolerance: f64) -> Option<usize> {
        let index = self.find_segment(p, tolerance)? + 1;
        self.nodes.insert(index, PathNode::new(p));
        self.invalidate();
        log::debug!("split segment at {p:?}, new node {index}");
        Some(index)
    }

    /// Remove the start node of the segment hit by `p`, merging it with
    /// the preceding segment.
    ///
    /// Only segments with index 2 or above are joined; hits on segments 0
    /// and 1 are refused. Returns whether a node was removed.
    pub fn join_segments(&mut self, p: Point, tolerance: f64) -> bool {
        match self.find_segment(p, tolerance) {
            Some(index) if index > 1 => {
                self.nodes.remove(index);
                self.invalidate();
                log::debug!("joined segments at node {index}");
                true
            }
            _ => false,
        }
    }

    /// The drawable form of the path.
    ///
    /// Built on first use after a mutation and cached.
    pub fn to_bez_path(&self) -> &BezPath {
        self.outline.get_or_init(|| self.build_bez_path(self.closed))
    }

    fn build_bez_path(&self, closed: bool) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.nodes.first() else {
            return path;
        };
        path.move_to(first.point());
        for w in self.nodes.windows(2) {
            push_segment(&mut path, &w[0], &w[1]);
        }
        if closed {
            if let [_, .., last] = self.nodes.as_slice() {
                push_segment(&mut path, last, first);
            }
            path.close_path();
        }
        path
    }

    /// The tight bounding box of the curve, or [`Rect::EMPTY`] for an empty
    /// path.
    pub fn bounds(&self) -> Rect {
        self.cache.bounds(|| self.to_bez_path().bounding_box())
    }

    /// The sampled point at fraction `relative` of the length from the
    /// first node to the last.
    ///
    /// The closing segment of a closed path is not part of the measured
    /// length. `flatness` bounds the error of the polyline the curve is
    /// sampled from. Returns `None` for paths with fewer than two nodes.
    pub fn point_on_path(&self, relative: f64, flatness: f64) -> Option<Point> {
        if self.nodes.len() < 2 {
            return None;
        }
        let first = self.nodes[0].point();
        let last = self.nodes[self.nodes.len() - 1].point();
        if relative.is_nan() || relative <= 0.0 {
            return Some(first);
        }
        if relative >= 1.0 {
            return Some(last);
        }
        let chain = self.build_bez_path(false);
        let polyline = chain.to_polylines(flatness).into_iter().next()?;
        let total: f64 = polyline.windows(2).map(|w| w[0].distance(w[1])).sum();
        if total == 0.0 {
            return Some(first);
        }
        let mut remaining = total * relative;
        for w in polyline.windows(2) {
            let len = w[0].distance(w[1]);
            if len > 0.0 && remaining <= len {
                return Some(w[0].lerp(w[1], remaining / len));
            }
            remaining -= len;
        }
        Some(last)
    }

    /// The point where the outline meets the ray from the center through `p`.
    ///
    /// For a closed path the outline is the boundary of the filled shape; for
    /// an open path it is the curve itself. Of all crossings, the one nearest
    /// `p` wins. If the ray misses the outline, the outline point nearest `p`
    /// is returned instead. An empty path returns `p`.
    pub fn chop(&self, p: Point) -> Point {
        let Some(center) = self.center() else {
            return p;
        };
        let polylines = self.to_bez_path().to_polylines(crate::DEFAULT_FLATNESS);
        let edges = || {
            polylines
                .iter()
                .flat_map(|line| line.windows(2))
                .map(|w| Line::new(w[0], w[1]))
        };
        let dir = p - center;
        if dir.hypot2() > 0.0 {
            let bounds = self.bounds();
            let reach = dir.hypot() + bounds.width.abs() + bounds.height.abs() + 1.0;
            let ray = Line::new(center, center + dir * (reach / dir.hypot()));
            let best = edges()
                .filter_map(|edge| edge.crossing(&ray))
                .min_by(|a, b| a.distance_squared(p).total_cmp(&b.distance_squared(p)));
            if let Some(hit) = best {
                return hit;
            }
        }
        edges()
            .map(|edge| {
                let (t, d2) = edge.nearest(p);
                (crate::ParamCurve::eval(&edge, t), d2)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(center, |(hit, _)| hit)
    }

    /// Move every node by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        for node in &mut self.nodes {
            node.translate(delta);
        }
        self.invalidate();
    }

    /// Apply `affine` to every coordinate of every node.
    pub fn apply_affine(&mut self, affine: Affine) {
        for node in &mut self.nodes {
            node.apply_affine(affine);
        }
        self.invalidate();
    }

    /// How many times the bounds were recomputed rather than served from the
    /// cache.
    #[inline]
    pub fn recomputations(&self) -> u64 {
        self.cache.recomputations()
    }

    fn invalidate(&mut self) {
        self.outline.take();
        self.cache.invalidate();
    }
}

fn push_segment(path: &mut BezPath, from: &PathNode, to: &PathNode) {
    let c2 = from.mask().contains(Mask::C2);
    let c1 = to.mask().contains(Mask::C1);
    match (c2, c1) {
        (false, false) => path.line_to(to.point()),
        (false, true) => path.quad_to(to.c1(), to.point()),
        (true, false) => path.quad_to(from.c2(), to.point()),
        (true, true) => path.curve_to(from.c2(), to.c1(), to.point()),
    }
}

impl PartialEq for NodePath {
    fn eq(&self, other: &NodePath) -> bool {
        self.closed == other.closed && self.nodes == other.nodes
    }
}

impl FromIterator<PathNode> for NodePath {
    fn from_iter<T: IntoIterator<Item = PathNode>>(iter: T) -> Self {
        NodePath::from_nodes(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathEl;

    fn polyline() -> NodePath {
        NodePath::from_points([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])
    }

    fn assert_near(p0: Point, p1: Point) {
        assert!((p1 - p0).hypot() < 1e-9, "{p0:?} != {p1:?}");
    }

    #[test]
    fn polyline_bounds_and_insert() {
        let mut path = polyline();
        assert_eq!(path.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
        path.add_node(1, PathNode::new((5.0, 5.0))).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(path.recomputations(), 2);
    }

    #[test]
    fn index_errors_leave_path_untouched() {
        let mut path = polyline();
        let before = path.clone();
        assert_eq!(
            path.add_node(4, PathNode::new((1.0, 1.0))),
            Err(FigureError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert!(path.remove_node(3).is_err());
        assert!(path.set_node(3, PathNode::new((0.0, 0.0))).is_err());
        assert!(path.point(3, ControlPoint::Main).is_err());
        assert!(path.set_point(3, ControlPoint::C1, Point::ZERO).is_err());
        assert!(path.cycle_node_type(3).is_err());
        assert_eq!(path, before);
        assert!(NodePath::new().remove_node(0).is_err());
    }

    #[test]
    fn add_at_end_is_allowed() {
        let mut path = polyline();
        path.add_node(3, PathNode::new((0.0, 10.0))).unwrap();
        assert_eq!(path.end_point(), Some(Point::new(0.0, 10.0)));
    }

    #[test]
    fn segment_kinds_follow_masks() {
        let path = NodePath::from_nodes([
            PathNode::new((0.0, 0.0)),
            PathNode::with_controls((10.0, 0.0), crate::Controls::C1((5.0, 5.0).into())),
            PathNode::curve((12.0, 5.0), (20.0, 0.0), (25.0, -5.0)),
            PathNode::new((30.0, 0.0)),
        ]);
        let els = path.to_bez_path().elements();
        assert!(matches!(els[0], PathEl::MoveTo(_)));
        assert!(matches!(els[1], PathEl::QuadTo(..)));
        assert!(matches!(els[2], PathEl::QuadTo(..)));
        assert!(matches!(els[3], PathEl::QuadTo(..)));
        assert_eq!(els.len(), 4);
    }

    #[test]
    fn closed_path_adds_closing_segment() {
        let path = polyline().with_closed(true);
        let els = path.to_bez_path().elements();
        assert_eq!(els.len(), 5);
        assert!(matches!(els[3], PathEl::LineTo(p) if p == Point::ZERO));
        assert!(matches!(els[4], PathEl::ClosePath));
    }

    #[test]
    fn cached_outline_is_reused_and_cleared() {
        let mut path = polyline();
        let first = path.to_bez_path() as *const BezPath;
        let second = path.to_bez_path() as *const BezPath;
        assert_eq!(first, second);
        path.set_point(2, ControlPoint::Main, Point::new(10.0, 20.0))
            .unwrap();
        assert_eq!(path.bounds(), Rect::new(0.0, 0.0, 10.0, 20.0));
    }

    #[test]
    fn point_on_path_samples_by_length() {
        let path = polyline();
        assert_near(path.point_on_path(0.25, 0.1).unwrap(), Point::new(5.0, 0.0));
        assert_near(path.point_on_path(0.75, 0.1).unwrap(), Point::new(10.0, 5.0));
        assert_eq!(path.point_on_path(0.0, 0.1), Some(Point::new(0.0, 0.0)));
        assert_eq!(path.point_on_path(1.5, 0.1), Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn point_on_path_needs_two_nodes() {
        assert_eq!(NodePath::new().point_on_path(0.5, 1.0), None);
        let single = NodePath::from_points([(3.0, 3.0)]);
        assert_eq!(single.point_on_path(0.5, 1.0), None);
        let coincident = NodePath::from_points([(3.0, 3.0), (3.0, 3.0)]);
        assert_eq!(coincident.point_on_path(0.5, 1.0), Some(Point::new(3.0, 3.0)));
    }

    #[test]
    fn find_node_is_exact() {
        let path = polyline();
        assert_eq!(path.find_node(Point::new(10.0, 0.0)), Some(1));
        assert_eq!(path.find_node(Point::new(10.0, 0.1)), None);
    }

    #[test]
    fn find_segment_with_tolerance() {
        let path = polyline();
        assert_eq!(path.find_segment(Point::new(5.0, 1.0), 2.0), Some(0));
        assert_eq!(path.find_segment(Point::new(11.0, 5.0), 2.0), Some(1));
        assert_eq!(path.find_segment(Point::new(5.0, 5.0), 2.0), None);
        let closed = polyline().with_closed(true);
        assert_eq!(closed.find_segment(Point::new(5.0, 5.0), 2.0), Some(2));
    }

    #[test]
    fn split_at_midpoint_keeps_bounds() {
        let mut path = NodePath::from_points([(0.0, 0.0), (10.0, 0.0)]);
        let before = path.bounds();
        assert_eq!(path.split_segment(Point::new(5.0, 0.0), 1.0), Some(1));
        assert_eq!(path.len(), 3);
        assert_eq!(path.nodes()[1].point(), Point::new(5.0, 0.0));
        assert_eq!(path.nodes()[1].mask(), Mask::NONE);
        assert_eq!(path.bounds(), before);
        assert_eq!(path.split_segment(Point::new(5.0, 8.0), 1.0), None);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn join_refuses_first_two_segments() {
        let mut path = NodePath::from_points([
            (0.0, 0.0),
            (10.0, 0.0),
            (20.0, 0.0),
            (30.0, 0.0),
            (40.0, 0.0),
        ]);
        assert!(!path.join_segments(Point::new(5.0, 0.0), 1.0));
        assert!(!path.join_segments(Point::new(15.0, 0.0), 1.0));
        assert!(path.join_segments(Point::new(25.0, 0.0), 1.0));
        assert_eq!(path.len(), 4);
        assert_eq!(path.find_node(Point::new(20.0, 0.0)), None);
        assert!(!path.join_segments(Point::new(25.0, 9.0), 1.0));
    }

    #[test]
    fn center_is_mean_of_main_points() {
        let path = NodePath::from_nodes([
            PathNode::curve((-100.0, 0.0), (0.0, 0.0), (100.0, 0.0)),
            PathNode::new((4.0, 0.0)),
            PathNode::new((2.0, 6.0)),
        ]);
        assert_eq!(path.center(), Some(Point::new(2.0, 2.0)));
        assert_eq!(NodePath::new().center(), None);
    }

    #[test]
    fn chop_square() {
        let path = NodePath::from_points([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
            .with_closed(true);
        assert_near(path.chop(Point::new(20.0, 5.0)), Point::new(10.0, 5.0));
        assert_near(path.chop(Point::new(5.0, -30.0)), Point::new(5.0, 0.0));
        // From inside the shape the crossing ahead of the point still wins.
        assert_near(path.chop(Point::new(8.0, 5.0)), Point::new(10.0, 5.0));
    }

    #[test]
    fn chop_open_line_falls_back_to_nearest() {
        let path = NodePath::from_points([(0.0, 0.0), (10.0, 0.0)]);
        assert_near(path.chop(Point::new(5.0, 3.0)), Point::new(5.0, 0.0));
        // Pointing along the line, the ray never crosses it.
        assert_near(path.chop(Point::new(20.0, 0.0)), Point::new(10.0, 0.0));
        assert_eq!(NodePath::new().chop(Point::new(1.0, 1.0)), Point::new(1.0, 1.0));
    }

    #[test]
    fn mask_cycles() {
        let mut path = polyline();
        assert_eq!(path.cycle_node_type(1), Ok(Mask::C1));
        assert_eq!(path.cycle_node_type(1), Ok(Mask::C1C2));
        assert_eq!(path.cycle_node_type(1), Ok(Mask::C2));
        assert_eq!(path.cycle_node_type(1), Ok(Mask::NONE));

        assert_eq!(path.cycle_node_type(0), Ok(Mask::C2));
        assert_eq!(path.cycle_node_type(0), Ok(Mask::NONE));
        assert_eq!(path.cycle_node_type(2), Ok(Mask::C1));
        assert_eq!(path.cycle_node_type(2), Ok(Mask::NONE));

        path.set_closed(true);
        assert_eq!(path.cycle_node_type(0), Ok(Mask::C1));
    }

    #[test]
    fn transforms_move_control_points() {
        let mut path = NodePath::from_nodes([PathNode::curve((-1.0, 0.0), (0.0, 0.0), (1.0, 0.0))]);
        path.apply_affine(Affine::scale(2.0));
        assert_eq!(path.nodes()[0].c1(), Point::new(-2.0, 0.0));
        path.translate(Vec2::new(1.0, 1.0));
        assert_eq!(path.nodes()[0].c2(), Point::new(3.0, 1.0));
    }
}
