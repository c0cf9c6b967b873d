// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tolerances shared by a drawing's queries.

use crate::{DEFAULT_FLATNESS, DEFAULT_HIT_TOLERANCE};

/// Tolerances used when hit-testing figures and reporting damage.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DrawingConfig {
    /// Maximum distance between a curve and the polyline standing in for
    /// it.
    pub flatness: f64,
    /// Smallest distance within which a point counts as touching a stroke,
    /// however thin the stroke is.
    pub min_hit_tolerance: f64,
    /// Added on every side of a damaged rectangle to cover anti-aliasing.
    pub repaint_margin: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        DrawingConfig {
            flatness: DEFAULT_FLATNESS,
            min_hit_tolerance: DEFAULT_HIT_TOLERANCE,
            repaint_margin: 1.0,
        }
    }
}

impl DrawingConfig {
    /// Builder method for the curve flatness.
    #[must_use]
    pub fn with_flatness(mut self, flatness: f64) -> Self {
        self.flatness = flatness;
        self
    }

    /// Builder method for the minimum hit tolerance.
    #[must_use]
    pub fn with_min_hit_tolerance(mut self, tolerance: f64) -> Self {
        self.min_hit_tolerance = tolerance;
        self
    }

    /// Builder method for the repaint margin.
    #[must_use]
    pub fn with_repaint_margin(mut self, margin: f64) -> Self {
        self.repaint_margin = margin;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::DrawingConfig;

    #[test]
    fn builder() {
        let config = DrawingConfig::default()
            .with_flatness(0.25)
            .with_min_hit_tolerance(4.0)
            .with_repaint_margin(2.0);
        assert_eq!(config.flatness, 0.25);
        assert_eq!(config.min_hit_tolerance, 4.0);
        assert_eq!(config.repaint_margin, 2.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_fields_take_defaults() {
        let config: DrawingConfig = serde_json::from_str(r#"{"repaint_margin": 3.0}"#).unwrap();
        assert_eq!(config, DrawingConfig::default().with_repaint_margin(3.0));
    }
}
