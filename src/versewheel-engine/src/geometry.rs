// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Angle and coordinate helpers shared by layout, hit testing and the
//! diagram renderer.
//!
//! Angles are radians measured clockwise from the top of the circle.
//! Cartesian coordinates are center-relative with y growing downward,
//! the way screen and SVG coordinates do.

use std::f64::consts::{FRAC_PI_2, TAU};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Fold an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// Half-open containment for an angular span, aware of spans that cross
/// the `0`/`2π` boundary (`start > end`). A span with `start == end`
/// covers the whole circle; that only happens for a lone verse (or book)
/// laid out over the full turn.
pub fn span_contains(start: f64, end: f64, angle: f64) -> bool {
    if start < end {
        start <= angle && angle < end
    } else if start > end {
        angle >= start || angle < end
    } else {
        true
    }
}

/// Angular width of a span, treating `start > end` as wrapping and
/// `start == end` as the full circle.
pub fn span_sweep(start: f64, end: f64) -> f64 {
    if start < end {
        end - start
    } else {
        TAU - start + end
    }
}

/// Point at `radius` from the center in the direction of `angle`.
pub fn point_at(radius: f64, angle: f64) -> Point {
    Point {
        x: radius * (angle - FRAC_PI_2).cos(),
        y: radius * (angle - FRAC_PI_2).sin(),
    }
}

/// Convert a center-relative offset into `(angle, distance)` with the
/// angle already normalized, ready for hit testing.
pub fn polar_from_offset(dx: f64, dy: f64) -> (f64, f64) {
    let angle = normalize_angle(dy.atan2(dx) + FRAC_PI_2);
    let distance = (dx * dx + dy * dy).sqrt();
    (angle, distance)
}

pub fn is_zero(n: f64) -> bool {
    n.abs() < 0.0000001
}

/// Format a number the way JavaScript's Number.toString() would, keeping
/// generated SVG free of trailing `.0`s.
pub fn js_format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }

    if n == n.trunc() && n.abs() < 1e21 {
        return format!("{}", n as i64);
    }

    format!("{}", n)
}

/// Format a coordinate rounded to three decimals.
pub fn fmt_coord(n: f64) -> String {
    let rounded = (n * 1000.0).round() / 1000.0;
    js_format_number(if is_zero(rounded) { 0.0 } else { rounded })
}

/// Escape text content for XML (inside elements)
pub fn escape_xml_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute values for XML (inside double-quoted attributes)
pub fn escape_xml_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}
