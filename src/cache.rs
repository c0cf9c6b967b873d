// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily recomputed bounds and drawing-area rectangles.

use core::cell::Cell;

use crate::Rect;

/// Whether a figure's cached rectangles are populated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheState {
    /// At least one rectangle has been computed since the last invalidation.
    Clean,
    /// Nothing is cached; the next read recomputes.
    Dirty,
}

/// Per-figure cache of the logical bounds and the drawing area.
///
/// Reads go through [`BoundsCache::bounds`] and
/// [`BoundsCache::drawing_area`], which compute and store the value on a miss
/// and return the stored value on a hit. [`BoundsCache::invalidate`] clears
/// both slots; nothing is recomputed until the next read.
///
/// The slots are [`Cell`]s, so a figure can refresh its cache from `&self`.
/// This makes every figure `!Sync`: a figure tree is confined to one thread
/// at a time, and sharing one across threads requires wrapping the whole
/// tree in a lock.
///
/// ```
/// use bezfig::{BoundsCache, CacheState, Rect};
///
/// let mut cache = BoundsCache::new();
/// assert_eq!(cache.state(), CacheState::Dirty);
/// let r = cache.bounds(|| Rect::new(0.0, 0.0, 1.0, 1.0));
/// assert_eq!(cache.bounds(|| unreachable!()), r);
/// assert_eq!(cache.recomputations(), 1);
/// cache.invalidate();
/// assert_eq!(cache.state(), CacheState::Dirty);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BoundsCache {
    bounds: Cell<Option<Rect>>,
    drawing_area: Cell<Option<Rect>>,
    recomputations: Cell<u64>,
    revision: u64,
}

impl BoundsCache {
    /// An empty (dirty) cache.
    #[inline]
    pub fn new() -> BoundsCache {
        BoundsCache::default()
    }

    /// The cached logical bounds, computing them with `compute` on a miss.
    #[inline]
    pub fn bounds(&self, compute: impl FnOnce() -> Rect) -> Rect {
        Self::get_or_compute(&self.bounds, &self.recomputations, "bounds", compute)
    }

    /// The cached drawing area, computing it with `compute` on a miss.
    #[inline]
    pub fn drawing_area(&self, compute: impl FnOnce() -> Rect) -> Rect {
        Self::get_or_compute(
            &self.drawing_area,
            &self.recomputations,
            "drawing area",
            compute,
        )
    }

    fn get_or_compute(
        slot: &Cell<Option<Rect>>,
        recomputations: &Cell<u64>,
        what: &str,
        compute: impl FnOnce() -> Rect,
    ) -> Rect {
        if let Some(r) = slot.get() {
            return r;
        }
        let mut r = compute();
        if !r.is_finite() {
            log::warn!("non-finite {what} {r:?} replaced by the empty rectangle");
            r = Rect::EMPTY;
        }
        recomputations.set(recomputations.get() + 1);
        log::trace!("recomputed {what}: {r:?}");
        slot.set(Some(r));
        r
    }

    /// Clear both rectangles.
    ///
    /// Invalidating an already dirty cache has no further effect on what
    /// later reads return.
    #[inline]
    pub fn invalidate(&mut self) {
        self.bounds.set(None);
        self.drawing_area.set(None);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Whether anything is cached.
    #[inline]
    pub fn state(&self) -> CacheState {
        let bounds = self.bounds.get();
        let area = self.drawing_area.get();
        if bounds.is_some() || area.is_some() {
            CacheState::Clean
        } else {
            CacheState::Dirty
        }
    }

    /// How many times a rectangle was computed rather than served from the
    /// cache.
    #[inline]
    pub fn recomputations(&self) -> u64 {
        self.recomputations.get()
    }

    /// A counter bumped by every invalidation.
    ///
    /// Comparing revisions before and after a batch of edits tells whether
    /// the batch touched this figure.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundsCache, CacheState};
    use crate::Rect;

    #[test]
    fn lazy_until_read() {
        let mut cache = BoundsCache::new();
        cache.invalidate();
        assert_eq!(cache.recomputations(), 0);
        let a = cache.drawing_area(|| Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(cache.state(), CacheState::Clean);
        let b = cache.drawing_area(|| Rect::new(9.0, 9.0, 9.0, 9.0));
        assert_eq!(a, b);
        assert_eq!(cache.recomputations(), 1);
    }

    #[test]
    fn slots_are_independent() {
        let cache = BoundsCache::new();
        cache.bounds(|| Rect::new(0.0, 0.0, 1.0, 1.0));
        let area = cache.drawing_area(|| Rect::new(-1.0, -1.0, 3.0, 3.0));
        assert_eq!(area, Rect::new(-1.0, -1.0, 3.0, 3.0));
        assert_eq!(cache.recomputations(), 2);
    }

    #[test]
    fn double_invalidate() {
        let mut cache = BoundsCache::new();
        cache.bounds(|| Rect::new(0.0, 0.0, 1.0, 1.0));
        cache.invalidate();
        cache.invalidate();
        assert_eq!(cache.state(), CacheState::Dirty);
        assert_eq!(cache.revision(), 2);
        assert_eq!(cache.bounds(|| Rect::new(0.0, 0.0, 2.0, 2.0)), Rect::new(0.0, 0.0, 2.0, 2.0));
    }

    #[test]
    fn nan_never_cached() {
        let cache = BoundsCache::new();
        let r = cache.bounds(|| Rect::new(f64::NAN, 0.0, 1.0, 1.0));
        assert_eq!(r, Rect::EMPTY);
    }
}
