// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The root of a figure tree and its repaint notifications.

use core::fmt;

use crate::{AnyFigure, CompositeFigure, DrawingConfig, Figure, FigureId, Point, Rect};

/// Receives the rectangles that need repainting after an edit.
///
/// Notifications are synchronous and carry one rectangle per edit; any
/// coalescing or scheduling of repaints is up to the receiver.
pub trait DamageListener {
    /// `area` may have changed appearance and should be repainted.
    fn area_invalidated(&mut self, area: Rect);
}

impl<F: FnMut(Rect)> DamageListener for F {
    fn area_invalidated(&mut self, area: Rect) {
        self(area);
    }
}

/// Rectangles damaged since the host last asked.
///
/// Rectangles may overlap and are not deduplicated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Damage {
    /// The damaged rectangles, in the order the edits happened.
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }

    /// Whether nothing was damaged.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }
}

/// A figure tree with a host on the other end.
///
/// All edits go through [`Drawing::edit`], which compares the root's drawing
/// area before and after and reports the union of the two to every listener.
/// Edits that leave the root untouched report nothing.
///
/// ```
/// use bezfig::{BezierFigure, Drawing, NodePath, Rect};
///
/// let mut drawing = Drawing::new();
/// drawing.edit(|root| {
///     root.add(BezierFigure::new(NodePath::from_points([(0.0, 0.0), (10.0, 10.0)])));
/// });
/// let damage = drawing.take_damage();
/// assert_eq!(damage.dirty_rects.len(), 1);
/// assert!(damage.dirty_rects[0].contains((10.0, 10.0).into()));
/// ```
pub struct Drawing {
    root: CompositeFigure,
    config: DrawingConfig,
    listeners: Vec<Box<dyn DamageListener>>,
    pending: Damage,
}

impl fmt::Debug for Drawing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drawing")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .field("pending", &self.pending)
            .finish()
    }
}

impl Default for Drawing {
    fn default() -> Self {
        Drawing::new()
    }
}

impl Drawing {
    /// An empty drawing with the default configuration.
    pub fn new() -> Drawing {
        Drawing::with_config(DrawingConfig::default())
    }

    /// An empty drawing.
    pub fn with_config(config: DrawingConfig) -> Drawing {
        Drawing {
            root: CompositeFigure::new(),
            config,
            listeners: Vec::new(),
            pending: Damage::default(),
        }
    }

    /// The configuration.
    #[inline]
    pub fn config(&self) -> &DrawingConfig {
        &self.config
    }

    /// The root of the figure tree.
    #[inline]
    pub fn root(&self) -> &CompositeFigure {
        &self.root
    }

    /// Register a listener called after every edit that changes the
    /// drawing area.
    pub fn add_listener(&mut self, listener: impl DamageListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Run `f` against the root and report what it damaged.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut CompositeFigure) -> R) -> R {
        let before = self.root.drawing_area();
        let revision = self.root.cache().revision();
        let result = f(&mut self.root);
        if self.root.cache().revision() != revision {
            let after = self.root.drawing_area();
            let margin = self.config.repaint_margin;
            let area = before.union(after).grow(margin, margin);
            if !area.is_empty() {
                log::debug!("damaged {area:?}");
                self.pending.dirty_rects.push(area);
                for listener in &mut self.listeners {
                    listener.area_invalidated(area);
                }
            }
        }
        result
    }

    /// The damage accumulated since the last call.
    pub fn take_damage(&mut self) -> Damage {
        core::mem::take(&mut self.pending)
    }

    /// The root's logical bounds.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.root.bounds()
    }

    /// The root's drawing area.
    #[inline]
    pub fn drawing_area(&self) -> Rect {
        self.root.drawing_area()
    }

    /// The topmost visible top-level figure hit by `p`.
    pub fn find_figure(&self, p: Point) -> Option<&AnyFigure> {
        if !self.root.drawing_area().contains(p) {
            return None;
        }
        self.root.find_child(p, &self.config)
    }

    /// Any figure in the tree with the given id.
    pub fn figure(&self, id: FigureId) -> Option<&AnyFigure> {
        self.root.find_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{BezierFigure, NodePath};

    fn square(x: f64, y: f64) -> BezierFigure {
        BezierFigure::new(
            NodePath::from_points([(x, y), (x + 10.0, y), (x + 10.0, y + 10.0), (x, y + 10.0)])
                .with_closed(true),
        )
    }

    #[test]
    fn listener_sees_old_and_new_area() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut drawing = Drawing::with_config(DrawingConfig::default().with_repaint_margin(0.0));
        let sink = Rc::clone(&seen);
        drawing.add_listener(move |r: Rect| sink.borrow_mut().push(r));

        let id = drawing.edit(|root| root.add(square(0.0, 0.0)));
        drawing.edit(|root| {
            root.child_by_id_mut(id)
                .unwrap()
                .transform(crate::Affine::translate((100.0, 0.0)));
        });
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], Rect::new(-1.5, -1.5, 13.0, 13.0));
        assert_eq!(seen[1], Rect::new(-1.5, -1.5, 113.0, 13.0));
    }

    #[test]
    fn read_only_edits_are_silent() {
        let mut drawing = Drawing::new();
        drawing.edit(|root| root.add(square(0.0, 0.0)));
        drawing.take_damage();
        let n = drawing.edit(|root| root.len());
        assert_eq!(n, 1);
        assert!(drawing.take_damage().is_empty());
    }

    #[test]
    fn margin_and_accumulation() {
        let mut drawing = Drawing::with_config(DrawingConfig::default().with_repaint_margin(2.0));
        drawing.edit(|root| root.add(square(0.0, 0.0)));
        drawing.edit(|root| root.add(square(20.0, 0.0)));
        let damage = drawing.take_damage();
        assert_eq!(damage.dirty_rects.len(), 2);
        assert_eq!(damage.dirty_rects[0], Rect::new(-3.5, -3.5, 17.0, 17.0));
        assert_eq!(damage.union_rect(), Some(Rect::new(-3.5, -3.5, 37.0, 17.0)));
        assert_eq!(Damage::default().union_rect(), None);
    }

    #[test]
    fn find_topmost_figure() {
        let mut drawing = Drawing::new();
        let (a, b) = drawing.edit(|root| (root.add(square(0.0, 0.0)), root.add(square(5.0, 5.0))));
        assert_eq!(drawing.find_figure(Point::new(7.0, 7.0)).map(Figure::id), Some(b));
        assert_eq!(drawing.find_figure(Point::new(1.0, 1.0)).map(Figure::id), Some(a));
        assert!(drawing.find_figure(Point::new(100.0, 100.0)).is_none());
        assert_eq!(drawing.figure(a).map(Figure::id), Some(a));
        assert_eq!(drawing.bounds(), Rect::new(0.0, 0.0, 15.0, 15.0));
    }
}
