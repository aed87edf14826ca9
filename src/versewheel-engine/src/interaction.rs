// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Hover and selection state for the wheel.
//!
//! One [`Interaction`] owns the [`InteractionState`]; everything else reads
//! it through [`Interaction::state`]. Listeners hear about each actual
//! change exactly once, no matter how many raw pointer events produced it.

use log::trace;

use versewheel_core::VerseId;

use crate::connections::ConnectionPair;
use crate::hit_test::AngularIndex;
use crate::layout::Layout;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub hovered: Option<VerseId>,
    pub selected: Option<VerseId>,
}

/// How a connection, book or verse should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Highlight {
    Plain,
    Highlighted,
    Selected,
}

impl Highlight {
    pub fn as_str(&self) -> &'static str {
        match self {
            Highlight::Plain => "plain",
            Highlight::Highlighted => "highlighted",
            Highlight::Selected => "selected",
        }
    }
}

impl InteractionState {
    fn is_selected(&self, verse: &VerseId) -> bool {
        self.selected.as_ref() == Some(verse)
    }

    fn is_hovered(&self, verse: &VerseId) -> bool {
        self.hovered.as_ref() == Some(verse)
    }

    /// Selection wins over hover.
    pub fn classify_connection(&self, pair: &ConnectionPair) -> Highlight {
        if self.is_selected(&pair.a) || self.is_selected(&pair.b) {
            Highlight::Selected
        } else if self.is_hovered(&pair.a) || self.is_hovered(&pair.b) {
            Highlight::Highlighted
        } else {
            Highlight::Plain
        }
    }

    /// A book is selected or highlighted only when its span holds the
    /// verse; verses missing from `layout` leave every book plain.
    pub fn classify_book(&self, layout: &Layout, book_id: &str) -> Highlight {
        self.classify_book_by(book_id, |v| layout.position(v).map(|p| p.book_id.as_str()))
    }

    fn classify_book_by<'a>(
        &self,
        book_id: &str,
        book_of: impl Fn(&VerseId) -> Option<&'a str>,
    ) -> Highlight {
        let in_book = |verse: &Option<VerseId>| {
            verse
                .as_ref()
                .and_then(|v| book_of(v))
                .is_some_and(|b| b == book_id)
        };
        if in_book(&self.selected) {
            Highlight::Selected
        } else if in_book(&self.hovered) {
            Highlight::Highlighted
        } else {
            Highlight::Plain
        }
    }

    pub fn classify_verse(&self, verse: &VerseId) -> Highlight {
        if self.is_selected(verse) {
            Highlight::Selected
        } else if self.is_hovered(verse) {
            Highlight::Highlighted
        } else {
            Highlight::Plain
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractionEvent {
    HoverChanged(Option<VerseId>),
    SelectionChanged(Option<VerseId>),
    Clicked(VerseId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&InteractionEvent)>;

pub struct Interaction {
    state: InteractionState,
    index: AngularIndex,
    max_distance: f64,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Interaction {
    pub fn new(layout: &Layout, max_distance: f64) -> Self {
        Interaction {
            state: InteractionState::default(),
            index: AngularIndex::new(&layout.verses),
            max_distance,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn hovered(&self) -> Option<&VerseId> {
        self.state.hovered.as_ref()
    }

    pub fn selected(&self) -> Option<&VerseId> {
        self.state.selected.as_ref()
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Hit test against a freshly computed layout. Hover and selection are
    /// kept as they are.
    pub fn set_layout(&mut self, layout: &Layout, max_distance: f64) {
        self.index = AngularIndex::new(&layout.verses);
        self.max_distance = max_distance;
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&InteractionEvent) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` wasn't registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: InteractionEvent) {
        trace!("interaction event {:?}", event);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn hit(&self, angle: f64, distance: f64) -> Option<VerseId> {
        self.index.find(angle, distance, self.max_distance).cloned()
    }

    /// Returns true when the hovered verse changed.
    pub fn on_pointer_move(&mut self, angle: f64, distance: f64) -> bool {
        let hit = self.hit(angle, distance);
        if hit == self.state.hovered {
            return false;
        }
        self.state.hovered = hit.clone();
        self.emit(InteractionEvent::HoverChanged(hit));
        true
    }

    /// Returns true when a hover was cleared.
    pub fn on_pointer_leave(&mut self) -> bool {
        if self.state.hovered.is_none() {
            return false;
        }
        self.state.hovered = None;
        self.emit(InteractionEvent::HoverChanged(None));
        true
    }

    /// Clicking a verse selects it, even when it is already selected.
    /// Clicking empty space changes nothing. Returns true on a hit.
    pub fn on_click(&mut self, angle: f64, distance: f64) -> bool {
        match self.hit(angle, distance) {
            Some(verse) => {
                self.select(Some(verse.clone()));
                self.emit(InteractionEvent::Clicked(verse));
                true
            }
            None => false,
        }
    }

    /// Replace the selection; `None` clears it. Used by clicks and by
    /// anything else that picks a verse directly.
    pub fn select(&mut self, verse: Option<VerseId>) {
        if verse == self.state.selected {
            return;
        }
        self.state.selected = verse.clone();
        self.emit(InteractionEvent::SelectionChanged(verse));
    }

    pub fn classify_connection(&self, pair: &ConnectionPair) -> Highlight {
        self.state.classify_connection(pair)
    }

    pub fn classify_book(&self, book_id: &str) -> Highlight {
        self.state
            .classify_book_by(book_id, |v| self.index.book_of(v))
    }

    pub fn classify_verse(&self, verse: &VerseId) -> Highlight {
        self.state.classify_verse(verse)
    }
}
