// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use versewheel_engine::{
    BookMeta, Catalogue, ConnectionPair, Highlight, Interaction, InteractionEvent, LayoutConfig,
    VerseId, compute_layout,
};

fn v(s: &str) -> VerseId {
    s.parse().unwrap()
}

/// Gen 1:1, Gen 1:2 and Gen 2:1 over the full circle, or over three
/// quarters of it (the default fraction) when `gap` is set.
fn setup(gap: bool) -> (Interaction, Rc<RefCell<Vec<InteractionEvent>>>) {
    let catalogue = Catalogue::new(vec![BookMeta::new("Gen", "Genesis", vec![2, 1])]).unwrap();
    let config = LayoutConfig {
        angle_fraction: if gap { None } else { Some(1.0) },
        ..LayoutConfig::default()
    };
    let layout = compute_layout(&catalogue, &config).unwrap();
    let mut interaction = Interaction::new(&layout, config.max_hit_distance);

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    interaction.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    (interaction, events)
}

#[test]
fn hover_notifies_once_per_change() {
    let (mut interaction, events) = setup(false);

    for i in 0..10 {
        interaction.on_pointer_move(5.0 * PI / 3.0 + i as f64 * 0.01, 150.0);
    }
    interaction.on_pointer_move(PI / 3.0, 150.0);
    interaction.on_pointer_move(PI / 3.0, 151.0);

    assert_eq!(
        *events.borrow(),
        vec![
            InteractionEvent::HoverChanged(Some(v("Gen 2:1"))),
            InteractionEvent::HoverChanged(Some(v("Gen 1:1"))),
        ]
    );
}

#[test]
fn pointer_leave_clears_hover_once() {
    let (mut interaction, events) = setup(false);
    assert!(!interaction.on_pointer_leave());

    interaction.on_pointer_move(PI, 10.0);
    assert!(interaction.on_pointer_leave());
    assert!(!interaction.on_pointer_leave());
    assert_eq!(interaction.hovered(), None);

    assert_eq!(
        *events.borrow(),
        vec![
            InteractionEvent::HoverChanged(Some(v("Gen 1:2"))),
            InteractionEvent::HoverChanged(None),
        ]
    );
}

#[test]
fn moving_into_the_gap_or_outside_clears_hover() {
    let (mut interaction, events) = setup(true);
    interaction.on_pointer_move(PI / 4.0, 10.0);
    assert_eq!(interaction.hovered(), Some(&v("Gen 1:1")));

    // the default fraction leaves [3π/2, 2π) empty
    interaction.on_pointer_move(7.0 * PI / 4.0, 10.0);
    assert_eq!(interaction.hovered(), None);

    interaction.on_pointer_move(PI / 4.0, 10.0);
    interaction.on_pointer_move(PI / 4.0, 1000.0);
    assert_eq!(interaction.hovered(), None);
    assert_eq!(events.borrow().len(), 4);
}

#[test]
fn clicks_select_and_empty_space_keeps_selection() {
    let (mut interaction, events) = setup(true);

    assert!(interaction.on_click(3.0 * PI / 4.0, 20.0));
    assert_eq!(interaction.selected(), Some(&v("Gen 1:2")));

    // gap and out-of-range clicks leave everything alone
    assert!(!interaction.on_click(7.0 * PI / 4.0, 20.0));
    assert!(!interaction.on_click(PI / 4.0, 301.0));
    assert_eq!(interaction.selected(), Some(&v("Gen 1:2")));

    // clicking the selected verse again keeps it selected
    assert!(interaction.on_click(3.0 * PI / 4.0 + 0.1, 20.0));
    assert_eq!(interaction.selected(), Some(&v("Gen 1:2")));

    assert_eq!(
        *events.borrow(),
        vec![
            InteractionEvent::SelectionChanged(Some(v("Gen 1:2"))),
            InteractionEvent::Clicked(v("Gen 1:2")),
            InteractionEvent::Clicked(v("Gen 1:2")),
        ]
    );
}

#[test]
fn external_selection_and_highlighting() {
    let (mut interaction, events) = setup(false);
    interaction.select(Some(v("Gen 2:1")));
    interaction.on_pointer_move(PI / 3.0, 0.0);

    let to_selected = ConnectionPair {
        a: v("Gen 1:1"),
        b: v("Gen 2:1"),
    };
    let to_hovered = ConnectionPair {
        a: v("Gen 1:2"),
        b: v("Gen 1:1"),
    };
    let unrelated = ConnectionPair {
        a: v("Gen 1:2"),
        b: v("Exo 1:1"),
    };
    assert_eq!(interaction.classify_connection(&to_selected), Highlight::Selected);
    assert_eq!(interaction.classify_connection(&to_hovered), Highlight::Highlighted);
    assert_eq!(interaction.classify_connection(&unrelated), Highlight::Plain);
    assert_eq!(interaction.classify_book("Gen"), Highlight::Selected);
    assert_eq!(interaction.classify_book("Exo"), Highlight::Plain);

    interaction.select(None);
    assert_eq!(interaction.selected(), None);
    assert_eq!(interaction.classify_connection(&to_selected), Highlight::Highlighted);

    assert_eq!(
        *events.borrow(),
        vec![
            InteractionEvent::SelectionChanged(Some(v("Gen 2:1"))),
            InteractionEvent::HoverChanged(Some(v("Gen 1:1"))),
            InteractionEvent::SelectionChanged(None),
        ]
    );
}
