// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Figures made of other figures.

use crate::{
    Affine, AnyFigure, BoundsCache, DrawingConfig, Figure, FigureError, FigureId, Point, Rect,
};

/// An ordered group of child figures.
///
/// Children are stored back to front: index 0 is painted first and lies
/// beneath everything else. Hit-testing runs front to back, so the topmost
/// figure wins.
///
/// The composite owns its children. Any access that may mutate a child
/// ([`CompositeFigure::child_mut`] and friends) marks the composite dirty
/// before handing the child out; the aggregate rectangles are recomputed
/// once, on the next read, however many children were touched.
///
/// ```
/// use bezfig::{BezierFigure, CompositeFigure, Figure, NodePath, Rect};
///
/// let mut group = CompositeFigure::new();
/// assert_eq!(group.bounds(), Rect::EMPTY);
/// group.add(BezierFigure::new(NodePath::from_points([(0.0, 0.0), (5.0, 5.0)])));
/// group.add(BezierFigure::new(NodePath::from_points([(10.0, 10.0), (15.0, 15.0)])));
/// assert_eq!(group.bounds(), Rect::new(0.0, 0.0, 15.0, 15.0));
/// ```
#[derive(Debug)]
pub struct CompositeFigure {
    id: FigureId,
    children: Vec<AnyFigure>,
    visible: bool,
    transform_attribute: Option<Affine>,
    cache: BoundsCache,
}

impl Clone for CompositeFigure {
    fn clone(&self) -> Self {
        CompositeFigure {
            id: FigureId::next(),
            children: self.children.clone(),
            visible: self.visible,
            transform_attribute: self.transform_attribute,
            cache: BoundsCache::new(),
        }
    }
}

impl Default for CompositeFigure {
    fn default() -> Self {
        CompositeFigure::new()
    }
}

impl CompositeFigure {
    /// An empty, visible composite.
    pub fn new() -> CompositeFigure {
        CompositeFigure {
            id: FigureId::next(),
            children: Vec::new(),
            visible: true,
            transform_attribute: None,
            cache: BoundsCache::new(),
        }
    }

    /// A composite holding `children`, back to front.
    pub fn with_children<F: Into<AnyFigure>>(children: impl IntoIterator<Item = F>) -> Self {
        let mut composite = CompositeFigure::new();
        composite.children = children.into_iter().map(Into::into).collect();
        composite
    }

    /// The number of children.
    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether there are no children.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Append `child` in front of every other child.
    pub fn add(&mut self, child: impl Into<AnyFigure>) -> FigureId {
        let child = child.into();
        let id = child.id();
        self.children.push(child);
        self.invalidate();
        id
    }

    /// Insert `child` at position `index` in the back-to-front order.
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index > len()`.
    pub fn insert(&mut self, index: usize, child: impl Into<AnyFigure>) -> Result<FigureId, FigureError> {
        FigureError::check_insert(index, self.children.len())?;
        let child = child.into();
        let id = child.id();
        self.children.insert(index, child);
        self.invalidate();
        Ok(id)
    }

    /// Remove the direct child with the given id.
    ///
    /// Returns the child, or `None` if no direct child has that id.
    pub fn remove(&mut self, id: FigureId) -> Option<AnyFigure> {
        let index = self.index_of(id)?;
        let child = self.children.remove(index);
        self.invalidate();
        Some(child)
    }

    /// Remove the child at `index`.
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> Result<AnyFigure, FigureError> {
        FigureError::check_index(index, self.children.len())?;
        let child = self.children.remove(index);
        self.invalidate();
        Ok(child)
    }

    /// Move the child at `from` to position `to`.
    ///
    /// # Errors
    ///
    /// [`FigureError::IndexOutOfRange`] if either index is not a child
    /// index.
    pub fn move_child(&mut self, from: usize, to: usize) -> Result<(), FigureError> {
        FigureError::check_index(from, self.children.len())?;
        FigureError::check_index(to, self.children.len())?;
        if from != to {
            let child = self.children.remove(from);
            self.children.insert(to, child);
            self.invalidate();
        }
        Ok(())
    }

    /// Remove every child.
    pub fn clear(&mut self) {
        if !self.children.is_empty() {
            self.children.clear();
            self.invalidate();
        }
    }

    /// The position of the direct child with the given id.
    pub fn index_of(&self, id: FigureId) -> Option<usize> {
        self.children.iter().position(|c| c.id() == id)
    }

    /// The child at `index`.
    #[inline]
    pub fn child(&self, index: usize) -> Option<&AnyFigure> {
        self.children.get(index)
    }

    /// Mutable access to the child at `index`.
    ///
    /// Marks this composite dirty.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut AnyFigure> {
        if index >= self.children.len() {
            return None;
        }
        self.invalidate();
        self.children.get_mut(index)
    }

    /// Mutable access to the direct child with the given id.
    ///
    /// Marks this composite dirty.
    pub fn child_by_id_mut(&mut self, id: FigureId) -> Option<&mut AnyFigure> {
        let index = self.index_of(id)?;
        self.child_mut(index)
    }

    /// The children, back to front.
    #[inline]
    pub fn children(&self) -> &[AnyFigure] {
        &self.children
    }

    /// Mutable iteration over the children, back to front.
    ///
    /// Marks this composite dirty.
    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut AnyFigure> + '_ {
        self.invalidate();
        self.children.iter_mut()
    }

    /// The children, front to back.
    pub fn children_front_to_back(
        &self,
    ) -> impl DoubleEndedIterator<Item = &AnyFigure> + ExactSizeIterator + '_ {
        self.children.iter().rev()
    }

    /// The topmost visible direct child hit by `p`.
    pub fn find_child(&self, p: Point, config: &DrawingConfig) -> Option<&AnyFigure> {
        self.children_front_to_back()
            .find(|c| c.is_visible() && c.mapped_hit_test(p, config))
    }

    /// Search the whole tree, front to back, for a figure with the given id.
    pub fn find_by_id(&self, id: FigureId) -> Option<&AnyFigure> {
        self.children.iter().find_map(|c| {
            if c.id() == id {
                Some(c)
            } else {
                c.as_composite().and_then(|g| g.find_by_id(id))
            }
        })
    }

    fn compute_bounds(&self) -> Rect {
        self.visible_children()
            .fold(Rect::EMPTY, |acc, c| acc.union(c.mapped_bounds()))
    }

    fn compute_drawing_area(&self) -> Rect {
        self.visible_children()
            .fold(Rect::EMPTY, |acc, c| acc.union(c.mapped_drawing_area()))
    }

    fn visible_children(&self) -> impl Iterator<Item = &AnyFigure> + '_ {
        self.children.iter().filter(|c| c.is_visible())
    }
}

impl Figure for CompositeFigure {
    fn id(&self) -> FigureId {
        self.id
    }

    /// The union of the visible children's mapped bounds.
    fn bounds(&self) -> Rect {
        self.cache.bounds(|| self.compute_bounds())
    }

    fn drawing_area(&self) -> Rect {
        self.cache.drawing_area(|| self.compute_drawing_area())
    }

    /// The drawing area is checked first; only points inside it are tested
    /// against the children, front to back.
    fn hit_test(&self, p: Point, config: &DrawingConfig) -> bool {
        self.drawing_area().contains(p) && self.find_child(p, config).is_some()
    }

    /// Applies `affine` to every child in order.
    fn transform(&mut self, affine: Affine) {
        for child in &mut self.children {
            child.transform(affine);
        }
        self.invalidate();
    }

    fn invalidate(&mut self) {
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

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::{BezierFigure, CacheState, ControlPoint, NodePath, PathNode, StrokeStyle};

    fn rect_figure(x: f64, y: f64, w: f64, h: f64) -> BezierFigure {
        BezierFigure::new(
            NodePath::from_points([(x, y), (x + w, y), (x + w, y + h), (x, y + h)])
                .with_closed(true),
        )
    }

    fn ab() -> (CompositeFigure, FigureId, FigureId) {
        let mut group = CompositeFigure::new();
        let a = group.add(rect_figure(0.0, 0.0, 5.0, 5.0));
        let b = group.add(rect_figure(10.0, 10.0, 5.0, 5.0));
        (group, a, b)
    }

    #[test]
    fn union_of_children() {
        let (mut group, _, b) = ab();
        assert_eq!(group.bounds(), Rect::new(0.0, 0.0, 15.0, 15.0));
        group.child_by_id_mut(b).unwrap().set_visible(false);
        assert_eq!(group.cache_state(), CacheState::Dirty);
        assert_eq!(group.bounds(), Rect::new(0.0, 0.0, 5.0, 5.0));
    }

    #[test]
    fn empty_and_invisible() {
        let mut group = CompositeFigure::new();
        assert_eq!(group.bounds(), Rect::EMPTY);
        assert_eq!(group.drawing_area(), Rect::EMPTY);
        group.add(rect_figure(0.0, 0.0, 5.0, 5.0));
        group.child_mut(0).unwrap().set_visible(false);
        assert_eq!(group.bounds(), Rect::EMPTY);
        assert!(!group.contains(Point::new(1.0, 1.0)));
        let r = Rect::new(3.0, 4.0, 5.0, 6.0);
        assert_eq!(group.bounds().union(r), r);
    }

    #[test]
    fn remove_and_readd_restores_bounds() {
        let (mut group, a, _) = ab();
        let before = group.bounds();
        let child = group.remove(a).unwrap();
        assert_eq!(group.bounds(), Rect::new(10.0, 10.0, 5.0, 5.0));
        assert!(group.remove(a).is_none());
        group.insert(0, child).unwrap();
        assert_eq!(group.bounds(), before);
    }

    #[test]
    fn index_errors() {
        let (mut group, _, _) = ab();
        group.bounds();
        assert_eq!(
            group.insert(3, rect_figure(0.0, 0.0, 1.0, 1.0)),
            Err(FigureError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(group.remove_at(2).is_err());
        assert!(group.move_child(0, 2).is_err());
        assert!(group.child_mut(2).is_none());
        assert_eq!(group.len(), 2);
        assert_eq!(group.cache_state(), CacheState::Clean);
    }

    #[test]
    fn topmost_child_wins() {
        let mut group = CompositeFigure::new();
        let back = group.add(rect_figure(0.0, 0.0, 10.0, 10.0));
        let front = group.add(rect_figure(5.0, 5.0, 10.0, 10.0));
        let config = DrawingConfig::default();
        assert_eq!(group.find_child(Point::new(7.0, 7.0), &config).map(Figure::id), Some(front));
        assert_eq!(group.find_child(Point::new(2.0, 2.0), &config).map(Figure::id), Some(back));
        group.move_child(1, 0).unwrap();
        assert_eq!(group.find_child(Point::new(7.0, 7.0), &config).map(Figure::id), Some(back));
        let order: Vec<_> = group.children_front_to_back().map(Figure::id).collect();
        assert_eq!(order, vec![back, front]);
        assert_eq!(group.find_child(Point::new(40.0, 40.0), &config).map(Figure::id), None);
    }

    #[test]
    fn contains_needs_a_child_hit() {
        let (group, _, _) = ab();
        assert!(group.contains(Point::new(2.0, 2.0)));
        // Inside the aggregate drawing area but between the children.
        assert!(!group.contains(Point::new(10.0, 2.0)));
    }

    #[test]
    fn transform_moves_children() {
        let (mut group, a, _) = ab();
        group.transform(Affine::translate((1.0, 2.0)));
        assert_eq!(group.bounds(), Rect::new(1.0, 2.0, 15.0, 15.0));
        assert_eq!(
            group.find_by_id(a).unwrap().bounds(),
            Rect::new(1.0, 2.0, 5.0, 5.0)
        );
    }

    #[test]
    fn child_transform_attribute_maps_bounds() {
        let (mut group, _, b) = ab();
        group
            .child_by_id_mut(b)
            .unwrap()
            .set_transform_attribute(Some(Affine::scale(2.0)));
        assert_eq!(group.bounds(), Rect::new(0.0, 0.0, 30.0, 30.0));
    }

    #[test]
    fn hit_test_follows_transform_attribute() {
        let mut group = CompositeFigure::new();
        let id = group.add(rect_figure(0.0, 0.0, 10.0, 10.0));
        group
            .child_by_id_mut(id)
            .unwrap()
            .set_transform_attribute(Some(Affine::translate((100.0, 0.0))));
        let config = DrawingConfig::default();
        assert_eq!(group.bounds(), Rect::new(100.0, 0.0, 10.0, 10.0));

        let mapped = Point::new(105.0, 5.0);
        assert_eq!(group.find_child(mapped, &config).map(Figure::id), Some(id));
        assert!(group.contains(mapped));

        let unmapped = Point::new(5.0, 5.0);
        assert!(group.find_child(unmapped, &config).is_none());
        assert!(!group.contains(unmapped));
    }

    #[test]
    fn singular_transform_attribute_hits_nothing() {
        let mut group = CompositeFigure::new();
        let id = group.add(rect_figure(0.0, 0.0, 10.0, 10.0));
        group
            .child_by_id_mut(id)
            .unwrap()
            .set_transform_attribute(Some(Affine::scale_non_uniform(0.0, 1.0)));
        assert!(group
            .find_child(Point::new(0.0, 5.0), &DrawingConfig::default())
            .is_none());
    }

    #[test]
    fn nested_edit_dirties_every_ancestor() {
        let (inner, a, _) = ab();
        let mut outer = CompositeFigure::with_children([inner]);
        assert_eq!(outer.bounds(), Rect::new(0.0, 0.0, 15.0, 15.0));
        let inner = outer.child_mut(0).unwrap().as_composite_mut().unwrap();
        let fig = inner.child_by_id_mut(a).unwrap().as_bezier_mut().unwrap();
        fig.set_point(0, ControlPoint::Main, Point::new(-5.0, -5.0))
            .unwrap();
        assert_eq!(outer.bounds(), Rect::new(-5.0, -5.0, 20.0, 20.0));
    }

    #[test]
    fn batch_edit_recomputes_once() {
        let (mut group, _, _) = ab();
        group.bounds();
        let before = group.cache().recomputations();
        for child in group.children_mut() {
            child.transform(Affine::translate((1.0, 0.0)));
        }
        assert_eq!(group.cache().recomputations(), before);
        group.bounds();
        group.bounds();
        assert_eq!(group.cache().recomputations(), before + 1);
    }

    #[test]
    fn drawing_area_unions_stroke_growth() {
        let mut group = CompositeFigure::new();
        group.add(rect_figure(0.0, 0.0, 10.0, 10.0).with_style(StrokeStyle::new(2.0)));
        assert_eq!(group.drawing_area(), Rect::new(-3.0, -3.0, 16.0, 16.0));
    }

    /// Random edits, checking every read against a freshly built copy.
    #[test]
    fn cache_matches_recomputation() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut group = CompositeFigure::new();
        for _ in 0..200 {
            match rng.random_range(0..6) {
                0 => {
                    let x = rng.random_range(-50.0..50.0);
                    let y = rng.random_range(-50.0..50.0);
                    group.add(rect_figure(x, y, 5.0, 5.0));
                }
                1 if !group.is_empty() => {
                    let i = rng.random_range(0..group.len());
                    group.remove_at(i).unwrap();
                }
                2 if !group.is_empty() => {
                    let i = rng.random_range(0..group.len());
                    let visible = rng.random_bool(0.5);
                    group.child_mut(i).unwrap().set_visible(visible);
                }
                3 if !group.is_empty() => {
                    let i = rng.random_range(0..group.len());
                    let p = Point::new(rng.random_range(-80.0..80.0), rng.random_range(-80.0..80.0));
                    if let Some(fig) = group.child_mut(i).unwrap().as_bezier_mut() {
                        fig.add_node(0, PathNode::new(p)).unwrap();
                    }
                }
                4 => {
                    let dx = rng.random_range(-5.0..5.0);
                    group.transform(Affine::translate((dx, 0.0)));
                }
                _ => {}
            }
            let fresh = group.clone();
            assert_eq!(group.bounds(), fresh.bounds());
            assert_eq!(group.drawing_area(), fresh.drawing_area());
        }
    }
}
