// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! What the text panel shows for a selected verse.

use serde::Serialize;

use versewheel_core::{Catalogue, VerseId};

use crate::connections::CrossRefIndex;
use crate::json::VerseTexts;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConnectionEntry {
    pub verse_id: VerseId,
    pub reference: String,
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerseDetails {
    pub verse_id: VerseId,
    /// e.g. "Genesis 1:1"
    pub reference: String,
    pub text: Option<String>,
    pub connections: Vec<ConnectionEntry>,
}

/// Collect the reference, text and cross references of `verse`.
///
/// Returns `None` for verses the catalogue doesn't contain. References
/// pointing outside the catalogue or back at the verse itself are left
/// out, and repeated references are listed once, in the order first given.
pub fn describe_verse(
    catalogue: &Catalogue,
    verse: &VerseId,
    texts: &VerseTexts,
    refs: &CrossRefIndex,
) -> Option<VerseDetails> {
    if !catalogue.contains(verse) {
        return None;
    }

    let mut connections: Vec<ConnectionEntry> = Vec::new();
    for target in refs.refs(verse) {
        if target == verse || !catalogue.contains(target) {
            continue;
        }
        if connections.iter().any(|c| c.verse_id == *target) {
            continue;
        }
        connections.push(ConnectionEntry {
            verse_id: target.clone(),
            reference: catalogue.display_reference(target),
            text: texts.get(target).map(str::to_owned),
        });
    }

    Some(VerseDetails {
        verse_id: verse.clone(),
        reference: catalogue.display_reference(verse),
        text: texts.get(verse).map(str::to_owned),
        connections,
    })
}
