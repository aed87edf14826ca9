// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Property-based tests for layout, connections and hit testing.
//!
//! These tests verify that:
//! 1. Verse spans partition the used part of the circle
//! 2. Layout is bit-for-bit deterministic
//! 3. The angular index agrees with the linear scan
//! 4. Connection sets are deduplicated and only join laid-out verses
//! 5. Exported layouts validate against their JSON schema

use std::collections::HashSet;
use std::f64::consts::TAU;

use proptest::prelude::*;

use versewheel_core::{BookMeta, Catalogue, VerseId};

use crate::connections::{CrossRefIndex, build_connections};
use crate::geometry::span_contains;
use crate::hit_test::{AngularIndex, find_verse_at};
use crate::layout::compute_layout;
use crate::layout::config::LayoutConfig;

fn catalogue_strategy() -> impl Strategy<Value = Catalogue> {
    prop::collection::vec(prop::collection::vec(0u32..6, 1..6), 1..5)
        .prop_filter("catalogue needs at least one verse", |books| {
            books.iter().flatten().any(|&n| n > 0)
        })
        .prop_map(|books| {
            let books = books
                .into_iter()
                .enumerate()
                .map(|(i, chapters)| BookMeta::new(format!("B{i}"), format!("Book {i}"), chapters))
                .collect();
            Catalogue::new(books).unwrap()
        })
}

fn fraction_strategy() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![Just(None), Just(Some(1.0)), (0.05f64..=1.0).prop_map(Some),]
}

fn config(fraction: Option<f64>) -> LayoutConfig {
    LayoutConfig {
        angle_fraction: fraction,
        ..LayoutConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn spans_partition_the_used_arc(
        catalogue in catalogue_strategy(),
        fraction in fraction_strategy(),
        angles in prop::collection::vec(0.0f64..TAU, 1..32),
    ) {
        let layout = compute_layout(&catalogue, &config(fraction)).unwrap();
        prop_assert_eq!(layout.verses.len(), catalogue.total_verses());

        let first = &layout.verses[0];
        let last = layout.verses.last().unwrap();
        prop_assert_eq!(first.start_angle, 0.0);

        for angle in angles {
            let hits = layout.verses.iter().filter(|p| p.contains_angle(angle)).count();
            let expected = if span_contains(first.start_angle, last.end_angle, angle) { 1 } else { 0 };
            prop_assert_eq!(hits, expected, "angle {}", angle);
        }

        for p in &layout.verses {
            prop_assert!((0.0..TAU).contains(&p.start_angle));
            prop_assert!((0.0..TAU).contains(&p.end_angle));
            prop_assert!(p.contains_angle(p.mid_angle));
        }
        for pair in layout.verses.windows(2) {
            prop_assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
    }

    #[test]
    fn layout_is_deterministic(
        catalogue in catalogue_strategy(),
        fraction in fraction_strategy(),
    ) {
        let a = compute_layout(&catalogue, &config(fraction)).unwrap();
        let b = compute_layout(&catalogue, &config(fraction)).unwrap();
        for (x, y) in a.verses.iter().zip(b.verses.iter()) {
            prop_assert_eq!(x.start_angle.to_bits(), y.start_angle.to_bits());
            prop_assert_eq!(x.end_angle.to_bits(), y.end_angle.to_bits());
            prop_assert_eq!(x.anchor_x.to_bits(), y.anchor_x.to_bits());
            prop_assert_eq!(x.anchor_y.to_bits(), y.anchor_y.to_bits());
        }
    }

    #[test]
    fn index_matches_linear_scan(
        catalogue in catalogue_strategy(),
        fraction in fraction_strategy(),
        probes in prop::collection::vec((0.0f64..TAU, 0.0f64..400.0), 1..32),
    ) {
        let layout = compute_layout(&catalogue, &config(fraction)).unwrap();
        let index = AngularIndex::new(&layout.verses);

        for (angle, distance) in probes {
            let linear = find_verse_at(angle, distance, &layout.verses, 300.0).map(|p| &p.verse_id);
            prop_assert_eq!(linear, index.find(angle, distance, 300.0), "angle {}", angle);
        }
        for p in &layout.verses {
            let linear = find_verse_at(p.start_angle, 0.0, &layout.verses, 300.0).map(|p| &p.verse_id);
            prop_assert_eq!(linear, index.find(p.start_angle, 0.0, 300.0));
        }
    }

    #[test]
    fn connections_are_unique_and_internal(
        catalogue in catalogue_strategy(),
        edges in prop::collection::vec((0usize..40, 0usize..40), 0..40),
    ) {
        let layout = compute_layout(&catalogue, &config(None)).unwrap();
        let ids: Vec<VerseId> = catalogue.verse_ids().collect();
        // indices past the end name verses that aren't in the layout
        let id_at = |i: usize| ids.get(i).cloned().unwrap_or_else(|| VerseId::new("ZZZ", 1, i as u32 + 1));

        let mut refs = CrossRefIndex::new();
        for (from, to) in &edges {
            let from = id_at(*from);
            let mut list = refs.refs(&from).to_vec();
            list.push(id_at(*to));
            refs.insert(from, list);
        }

        let pairs = build_connections(&layout.verses, &|id| refs.lookup(id));
        let mut seen = HashSet::new();
        for pair in &pairs {
            prop_assert!(pair.a != pair.b);
            prop_assert!(layout.contains(&pair.a));
            prop_assert!(layout.contains(&pair.b));
            let key = if pair.a <= pair.b {
                (pair.a.clone(), pair.b.clone())
            } else {
                (pair.b.clone(), pair.a.clone())
            };
            prop_assert!(seen.insert(key));
        }

        // every internal, non-self reference is represented
        for (from, to) in &edges {
            let (a, b) = (id_at(*from), id_at(*to));
            if a != b && layout.contains(&a) && layout.contains(&b) {
                prop_assert!(pairs.iter().any(|p| p.involves(&a) && p.other(&a) == Some(&b)));
            }
        }
    }
}

#[cfg(feature = "schema")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn layout_json_validates_against_schema(
        catalogue in catalogue_strategy(),
        fraction in fraction_strategy(),
    ) {
        use crate::json::{LayoutDocument, layout_document_schema};

        let layout = compute_layout(&catalogue, &config(fraction)).unwrap();
        let json_value = serde_json::to_value(LayoutDocument::from(&layout)).unwrap();
        let schema_value = serde_json::to_value(layout_document_schema()).unwrap();
        let validator = jsonschema::validator_for(&schema_value)
            .expect("schema should be valid");
        prop_assert!(
            validator.is_valid(&json_value),
            "layout JSON failed schema validation"
        );
    }
}
