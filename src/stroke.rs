// Copyright 2024 the Bezfig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke styles and how far they reach beyond a figure's outline.

use core::f64::consts::SQRT_2;

use crate::ArrowTip;

/// Defines the connection between two segments of a stroke.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Join {
    /// A straight line connecting the segments.
    Bevel,
    /// The segments are extended to their natural intersection point.
    #[default]
    Miter,
    /// An arc between the segments.
    Round,
}

/// Defines the shape to be drawn at the ends of a stroke.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cap {
    /// Flat cap.
    #[default]
    Butt,
    /// Square cap with dimensions equal to half the stroke width.
    Square,
    /// Rounded cap with radius equal to half the stroke width.
    Round,
}

/// Describes the visual style of a figure's stroke.
///
/// Only the parts that affect geometry are modelled: how wide the stroke is,
/// how far its joins and caps can reach, and which decorations sit on the
/// ends of an open path.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StrokeStyle {
    /// Width of the stroke.
    pub width: f64,
    /// Style for connecting segments of the stroke.
    pub join: Join,
    /// Limit for miter joins.
    pub miter_limit: f64,
    /// Style for capping the ends of an open path.
    pub cap: Cap,
    /// Decoration drawn at the first node of an open path.
    pub start_decoration: Option<ArrowTip>,
    /// Decoration drawn at the last node of an open path.
    pub end_decoration: Option<ArrowTip>,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            join: Join::Miter,
            miter_limit: 3.0,
            cap: Cap::Butt,
            start_decoration: None,
            end_decoration: None,
        }
    }
}

impl StrokeStyle {
    /// Creates a new stroke with the specified width.
    pub fn new(width: f64) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    /// Builder method for setting the join style.
    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    /// Builder method for setting the limit for miter joins.
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = limit;
        self
    }

    /// Builder method for setting the cap style.
    pub fn with_cap(mut self, cap: Cap) -> Self {
        self.cap = cap;
        self
    }

    /// Builder method for setting the start decoration.
    pub fn with_start_decoration(mut self, tip: impl Into<Option<ArrowTip>>) -> Self {
        self.start_decoration = tip.into();
        self
    }

    /// Builder method for setting the end decoration.
    pub fn with_end_decoration(mut self, tip: impl Into<Option<ArrowTip>>) -> Self {
        self.end_decoration = tip.into();
        self
    }

    /// How far the painted stroke can extend beyond the centerline.
    ///
    /// Half the width, multiplied by the miter limit for miter joins, since
    /// a sharp miter can reach that far out. Square caps on other joins
    /// reach half the width along both axes, so their corner lies
    /// `sqrt(2)` further.
    pub fn growth(&self) -> f64 {
        let half = self.width.max(0.0) * 0.5;
        match (self.join, self.cap) {
            (Join::Miter, _) => half * self.miter_limit.max(1.0),
            (_, Cap::Square) => half * SQRT_2,
            _ => half,
        }
    }

    /// The distance within which a point counts as touching the stroke.
    #[inline]
    pub fn hit_tolerance(&self, min: f64) -> f64 {
        min.max(self.width * 0.5)
    }

    /// Whether either end carries a decoration.
    #[inline]
    pub fn has_decorations(&self) -> bool {
        self.start_decoration.is_some() || self.end_decoration.is_some()
    }
}
