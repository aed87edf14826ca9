// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Angular layout of the verse wheel.
//!
//! The catalogue is flattened into one sequence (book, then chapter, then
//! verse) and verse `i` of `N` receives the interval
//! `[scale(i), scale(i + 1))` where `scale` maps `[0, N]` linearly onto
//! `[0, 2π·fraction]`. Book spans are the union of their verses' spans.
//! Both are pure functions of the catalogue and the config.

pub mod config;

use std::collections::HashMap;
use std::f64::consts::TAU;

use log::debug;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use versewheel_core::{Catalogue, Result, VerseId, layout_err};

use crate::geometry::{normalize_angle, point_at, span_contains};

use self::config::LayoutConfig;

/// Where a single verse sits on the wheel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct VersePosition {
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub verse_id: VerseId,
    pub book_id: String,
    pub chapter: u32,
    pub verse: u32,
    pub start_angle: f64,
    pub end_angle: f64,
    pub mid_angle: f64,
    pub anchor_x: f64,
    pub anchor_y: f64,
}

impl VersePosition {
    pub fn contains_angle(&self, angle: f64) -> bool {
        span_contains(self.start_angle, self.end_angle, angle)
    }

    /// True for the span that crosses the `0`/`2π` boundary.
    pub fn wraps(&self) -> bool {
        self.start_angle > self.end_angle
    }
}

/// The arc covered by one book.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct BookSpan {
    pub book_id: String,
    pub display_name: String,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl BookSpan {
    pub fn contains_angle(&self, angle: f64) -> bool {
        span_contains(self.start_angle, self.end_angle, angle)
    }
}

/// Result of one layout pass. Never mutated; a changed catalogue or
/// radius means computing a new one.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub verses: Vec<VersePosition>,
    pub books: Vec<BookSpan>,
    /// The fraction of the circle actually used, after resolving the
    /// `N/(N+1)` default.
    pub angle_fraction: f64,
    pub anchor_radius: f64,
    by_verse: HashMap<VerseId, usize>,
}

impl Layout {
    pub fn position(&self, verse: &VerseId) -> Option<&VersePosition> {
        self.by_verse.get(verse).map(|&i| &self.verses[i])
    }

    pub fn contains(&self, verse: &VerseId) -> bool {
        self.by_verse.contains_key(verse)
    }

    pub fn book_span(&self, book_id: &str) -> Option<&BookSpan> {
        self.books.iter().find(|b| b.book_id == book_id)
    }

    /// Angular width given to every verse.
    pub fn verse_width(&self) -> f64 {
        TAU * self.angle_fraction / self.verses.len() as f64
    }
}

/// Resolve the configured fraction of the circle, defaulting to `N/(N+1)`.
fn resolve_angle_fraction(config: &LayoutConfig, total: usize) -> Result<f64> {
    match config.angle_fraction {
        None => Ok(total as f64 / (total as f64 + 1.0)),
        Some(f) if f.is_finite() && f > 0.0 && f <= 1.0 => Ok(f),
        Some(f) => layout_err!(BadAngleFraction, format!("{f} is outside (0, 1]")),
    }
}

/// Lay every verse of the catalogue out around the circle.
///
/// Fails with `InvalidCatalogue` when the catalogue holds no verses and
/// with `BadAngleFraction` when the configured fraction is outside
/// `(0, 1]`.
pub fn compute_layout(catalogue: &Catalogue, config: &LayoutConfig) -> Result<Layout> {
    let total = catalogue.total_verses();
    if total == 0 {
        return layout_err!(InvalidCatalogue, "catalogue contains no verses".to_owned());
    }

    let angle_fraction = resolve_angle_fraction(config, total)?;
    let sweep = TAU * angle_fraction;
    let scale = |k: usize| (k as f64 / total as f64) * sweep;

    let mut verses: Vec<VersePosition> = Vec::with_capacity(total);
    let mut books: Vec<BookSpan> = Vec::with_capacity(catalogue.books().len());
    let mut by_verse: HashMap<VerseId, usize> = HashMap::with_capacity(total);

    for book in catalogue.books() {
        let mut span: Option<BookSpan> = None;

        for verse_id in book.verse_ids() {
            let i = verses.len();
            let raw_start = scale(i);
            let raw_end = scale(i + 1);
            let mid_angle = normalize_angle((raw_start + raw_end) / 2.0);
            let start_angle = normalize_angle(raw_start);
            let end_angle = normalize_angle(raw_end);
            let anchor = point_at(config.anchor_radius, mid_angle);

            match span.as_mut() {
                Some(span) => span.end_angle = end_angle,
                None => {
                    span = Some(BookSpan {
                        book_id: book.id.clone(),
                        display_name: book.display_name.clone(),
                        start_angle,
                        end_angle,
                    })
                }
            }

            by_verse.insert(verse_id.clone(), i);
            verses.push(VersePosition {
                book_id: book.id.clone(),
                chapter: verse_id.chapter,
                verse: verse_id.verse,
                verse_id,
                start_angle,
                end_angle,
                mid_angle,
                anchor_x: anchor.x,
                anchor_y: anchor.y,
            });
        }

        match span {
            Some(span) => books.push(span),
            None => debug!("book {} has no verses; it gets no span", book.id),
        }
    }

    debug!(
        "laid out {} verses in {} books over {:.6} of the circle",
        verses.len(),
        books.len(),
        angle_fraction
    );

    Ok(Layout {
        verses,
        books,
        angle_fraction,
        anchor_radius: config.anchor_radius,
        by_verse,
    })
}
