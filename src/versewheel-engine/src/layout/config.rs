// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

/// Wheel layout configuration.
///
/// Radii are in logical drawing units measured from the wheel's center.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Fraction of the full circle handed out to verses, in `(0, 1]`.
    /// `None` reserves exactly one verse-width as a gap, i.e. `N/(N+1)`.
    pub angle_fraction: Option<f64>,

    /// Radius at which connection lines attach to their verses.
    pub anchor_radius: f64,

    // Book ring
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Distance between the outer ring edge and book labels.
    pub label_padding: f64,

    /// Pointer positions farther than this from the center don't hit any
    /// verse.
    pub max_hit_distance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            angle_fraction: None,
            anchor_radius: 280.0,
            inner_radius: 285.0,
            outer_radius: 300.0,
            label_padding: 8.0,
            max_hit_distance: 300.0,
        }
    }
}

impl LayoutConfig {
    /// Config for a wheel with the given outer radius, keeping the default
    /// proportions between ring, anchors and hit area.
    pub fn with_radius(outer_radius: f64) -> Self {
        let defaults = Self::default();
        let scale = outer_radius / defaults.outer_radius;
        Self {
            angle_fraction: None,
            anchor_radius: defaults.anchor_radius * scale,
            inner_radius: defaults.inner_radius * scale,
            outer_radius,
            label_padding: defaults.label_padding,
            max_hit_distance: outer_radius,
        }
    }
}
