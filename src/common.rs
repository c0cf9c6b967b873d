// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations and tuning constants.

use arrayvec::ArrayVec;

/// Default curve flattening tolerance, in user-space units.
///
/// This is the maximum distance between a curve and the polyline used to
/// approximate it for sampling, hit-testing and chopping.
pub const DEFAULT_FLATNESS: f64 = 1.0;

/// Default minimum hit tolerance used when testing strokes.
pub const DEFAULT_HIT_TOLERANCE: f64 = 2.0;

/// Smallest extent a path-backed figure reports in either dimension.
///
/// Zero-width or zero-height shapes (a horizontal line, a single node) stay
/// paintable and selectable.
pub const MIN_BOUNDS_EXTENT: f64 = 1.0;

/// Scale factors below this are treated as degenerate by `set_bounds`.
pub(crate) const MIN_SCALE: f64 = 1e-4;

/// Recursion limit for adaptive curve subdivision.
pub(crate) const MAX_SUBDIVISION_DEPTH: usize = 16;

/// Find real roots of quadratic equation.
///
/// Return values of x for which c0 + c1 x + c2 x² = 0.
///
/// If the equation is nearly linear, the root of the linear part is returned
/// and the other root is dropped. In the degenerate case where all
/// coefficients are zero, a single `0.0` is returned.
pub fn solve_quadratic(c0: f64, c1: f64, c2: f64) -> ArrayVec<f64, 2> {
    let mut result = ArrayVec::new();
    let sc0 = c0 * c2.recip();
    let sc1 = c1 * c2.recip();
    if !sc0.is_finite() || !sc1.is_finite() {
        // c2 is zero or very small, treat as linear eqn
        let root = -c0 / c1;
        if root.is_finite() {
            result.push(root);
        } else if c0 == 0.0 && c1 == 0.0 {
            result.push(0.0);
        }
        return result;
    }
    let arg = sc1 * sc1 - 4. * sc0;
    let root1 = if !arg.is_finite() {
        -sc1
    } else {
        if arg < 0.0 {
            return result;
        } else if arg == 0.0 {
            result.push(-0.5 * sc1);
            return result;
        }
        // Avoids cancellation when sc1 dominates.
        -0.5 * (sc1 + arg.sqrt().copysign(sc1))
    };
    let root2 = sc0 / root1;
    if root2.is_finite() {
        if root2 > root1 {
            result.push(root1);
            result.push(root2);
        } else {
            result.push(root2);
            result.push(root1);
        }
    } else {
        result.push(root1);
    }
    result
}

/// Replace a scale factor that would poison a transform with 1.
///
/// Returns `None` if the factor was usable as-is.
pub(crate) fn degenerate_scale(s: f64) -> Option<f64> {
    if !s.is_finite() || s.abs() < MIN_SCALE {
        Some(1.0)
    } else {
        None
    }
}
