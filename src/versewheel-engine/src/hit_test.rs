// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Mapping a pointer position onto the verse under it.
//!
//! Callers pass polar coordinates relative to the wheel's center with the
//! angle already normalized into `[0, 2π)` (see
//! [`crate::geometry::polar_from_offset`]). Nothing here normalizes.

use std::collections::{BTreeMap, HashMap};

use ordered_float::OrderedFloat;

use versewheel_core::VerseId;

use crate::geometry::span_contains;
use crate::layout::VersePosition;

/// Find the verse whose span contains `angle`.
///
/// Returns `None` when the pointer is farther than `max_distance` from
/// the center or when `angle` falls in the gap left by an angle fraction
/// below one.
pub fn find_verse_at(
    angle: f64,
    distance_from_center: f64,
    positions: &[VersePosition],
    max_distance: f64,
) -> Option<&VersePosition> {
    if distance_from_center > max_distance {
        return None;
    }
    positions.iter().find(|p| p.contains_angle(angle))
}

#[derive(Clone, Debug, PartialEq)]
struct Span {
    verse_id: VerseId,
    book_id: String,
    start: f64,
    end: f64,
}

/// Ordered-boundary index over a layout's verse spans.
///
/// Gives the same answer as [`find_verse_at`] for every angle when built
/// from the positions of a single layout pass (spans ascending and
/// contiguous, with at most the last one wrapping), in logarithmic time.
#[derive(Clone, Debug, Default)]
pub struct AngularIndex {
    spans: Vec<Span>,
    by_start: BTreeMap<OrderedFloat<f64>, usize>,
    by_verse: HashMap<VerseId, usize>,
}

impl AngularIndex {
    pub fn new(positions: &[VersePosition]) -> Self {
        let spans: Vec<Span> = positions
            .iter()
            .map(|p| Span {
                verse_id: p.verse_id.clone(),
                book_id: p.book_id.clone(),
                start: p.start_angle,
                end: p.end_angle,
            })
            .collect();

        // a layout pass never yields two spans with one start; for
        // hand-built positions the first wins, as in the linear scan
        let mut by_start = BTreeMap::new();
        for (i, s) in spans.iter().enumerate() {
            by_start.entry(OrderedFloat(s.start)).or_insert(i);
        }
        let by_verse = spans
            .iter()
            .enumerate()
            .map(|(i, s)| (s.verse_id.clone(), i))
            .collect();

        AngularIndex {
            spans,
            by_start,
            by_verse,
        }
    }

    pub fn contains(&self, verse: &VerseId) -> bool {
        self.by_verse.contains_key(verse)
    }

    /// Book of an indexed verse; `None` for verses outside the layout.
    pub fn book_of(&self, verse: &VerseId) -> Option<&str> {
        self.by_verse
            .get(verse)
            .map(|&i| self.spans[i].book_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Index (into the positions the index was built from) of the verse
    /// whose span contains `angle`.
    pub fn lookup(&self, angle: f64) -> Option<usize> {
        let candidate = self
            .by_start
            .range(..=OrderedFloat(angle))
            .next_back()
            .map(|(_, &i)| i);

        if let Some(i) = candidate {
            let span = &self.spans[i];
            if span_contains(span.start, span.end, angle) {
                return Some(i);
            }
        }

        // angles below every start can only belong to a span that wraps
        let last = self.spans.len().checked_sub(1)?;
        let span = &self.spans[last];
        if Some(last) != candidate && span_contains(span.start, span.end, angle) {
            Some(last)
        } else {
            None
        }
    }

    /// Same contract as [`find_verse_at`], answering with the verse id.
    pub fn find(&self, angle: f64, distance_from_center: f64, max_distance: f64) -> Option<&VerseId> {
        if distance_from_center > max_distance {
            return None;
        }
        self.lookup(angle).map(|i| &self.spans[i].verse_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    use crate::layout::compute_layout;
    use crate::layout::config::LayoutConfig;
    use versewheel_core::{BookMeta, Catalogue};

    fn layout(fraction: Option<f64>) -> Vec<VersePosition> {
        let catalogue = Catalogue::new(vec![BookMeta::new("Gen", "Genesis", vec![2, 1])]).unwrap();
        let config = LayoutConfig {
            angle_fraction: fraction,
            ..LayoutConfig::default()
        };
        compute_layout(&catalogue, &config).unwrap().verses
    }

    fn id_at(angle: f64, positions: &[VersePosition]) -> Option<String> {
        find_verse_at(angle, 0.0, positions, f64::INFINITY).map(|p| p.verse_id.to_string())
    }

    #[test]
    fn test_find_verse_at_basic() {
        let positions = layout(Some(1.0));
        assert_eq!(id_at(0.0, &positions).as_deref(), Some("Gen 1:1"));
        assert_eq!(id_at(PI / 3.0, &positions).as_deref(), Some("Gen 1:1"));
        assert_eq!(id_at(PI, &positions).as_deref(), Some("Gen 1:2"));
        assert_eq!(id_at(5.0 * PI / 3.0, &positions).as_deref(), Some("Gen 2:1"));
        assert_eq!(id_at(TAU - 1e-12, &positions).as_deref(), Some("Gen 2:1"));
    }

    #[test]
    fn test_boundaries_belong_to_the_later_span() {
        let positions = layout(Some(1.0));
        let boundary = positions[1].start_angle;
        assert_eq!(id_at(boundary, &positions).as_deref(), Some("Gen 1:2"));
        let boundary = positions[2].start_angle;
        assert_eq!(id_at(boundary, &positions).as_deref(), Some("Gen 2:1"));
    }

    #[test]
    fn test_distance_cutoff() {
        let positions = layout(Some(1.0));
        assert!(find_verse_at(1.0, 301.0, &positions, 300.0).is_none());
        assert!(find_verse_at(1.0, 300.0, &positions, 300.0).is_some());
    }

    #[test]
    fn test_gap_misses() {
        // default fraction leaves [3π/2, 2π) empty for three verses
        let positions = layout(None);
        assert_eq!(id_at(3.0 * PI / 2.0 - 1e-9, &positions).as_deref(), Some("Gen 2:1"));
        assert!(id_at(3.0 * PI / 2.0, &positions).is_none());
        assert!(id_at(7.0 * PI / 4.0, &positions).is_none());
    }

    #[test]
    fn test_wrapping_span_with_partial_fraction_positions() {
        // spans that do not come from compute_layout, with the last one
        // crossing zero
        let positions: Vec<VersePosition> = [(0.5, 3.0), (3.0, 6.0), (6.0, 0.5)]
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| VersePosition {
                verse_id: VerseId::new("X", 1, i as u32 + 1),
                book_id: "X".to_owned(),
                chapter: 1,
                verse: i as u32 + 1,
                start_angle: start,
                end_angle: end,
                mid_angle: 0.0,
                anchor_x: 0.0,
                anchor_y: 0.0,
            })
            .collect();
        let index = AngularIndex::new(&positions);
        for angle in [0.0, 0.2, 0.49, 0.5, 2.9, 3.0, 5.9, 6.0, 6.28] {
            let linear = id_at(angle, &positions);
            let indexed = index
                .find(angle, 0.0, f64::INFINITY)
                .map(|v| v.to_string());
            assert_eq!(linear, indexed, "angle {angle}");
        }
        assert_eq!(index.find(0.2, 0.0, 1.0).map(|v| v.verse), Some(3));
    }

    #[test]
    fn test_index_agrees_with_linear_scan() {
        for fraction in [Some(1.0), None, Some(0.25)] {
            let positions = layout(fraction);
            let index = AngularIndex::new(&positions);
            assert_eq!(index.len(), positions.len());
            for step in 0..720 {
                let angle = TAU * step as f64 / 720.0;
                let linear = find_verse_at(angle, 0.0, &positions, 1.0).map(|p| &p.verse_id);
                assert_eq!(linear, index.find(angle, 0.0, 1.0), "angle {angle}");
            }
            for p in &positions {
                assert_eq!(index.find(p.start_angle, 0.0, 1.0), Some(&p.verse_id));
            }
        }
    }

    #[test]
    fn test_equal_starts_keep_the_first_span() {
        let positions: Vec<VersePosition> = [(0.0, 1.0), (0.0, 2.0), (2.0, 0.0)]
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| VersePosition {
                verse_id: VerseId::new("X", 1, i as u32 + 1),
                book_id: "X".to_owned(),
                chapter: 1,
                verse: i as u32 + 1,
                start_angle: start,
                end_angle: end,
                mid_angle: 0.0,
                anchor_x: 0.0,
                anchor_y: 0.0,
            })
            .collect();
        let index = AngularIndex::new(&positions);
        for angle in [0.0, 0.5] {
            assert_eq!(id_at(angle, &positions).as_deref(), Some("X 1:1"));
            assert_eq!(index.find(angle, 0.0, 1.0).map(|v| v.verse), Some(1));
        }
    }

    #[test]
    fn test_index_membership() {
        let positions = layout(None);
        let index = AngularIndex::new(&positions);
        assert!(index.contains(&VerseId::new("Gen", 2, 1)));
        assert!(!index.contains(&VerseId::new("Gen", 9, 9)));
        assert_eq!(index.book_of(&VerseId::new("Gen", 1, 2)), Some("Gen"));
        assert_eq!(index.book_of(&VerseId::new("Exo", 1, 1)), None);
    }

    #[test]
    fn test_index_distance_cutoff_and_empty() {
        let positions = layout(Some(1.0));
        let index = AngularIndex::new(&positions);
        assert!(index.find(1.0, 2.0, 1.0).is_none());

        let empty = AngularIndex::new(&[]);
        assert!(empty.is_empty());
        assert!(empty.lookup(1.0).is_none());
    }
}
