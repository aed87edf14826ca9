// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::{HashMap, HashSet};

use log::debug;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use versewheel_core::VerseId;

use crate::layout::VersePosition;

/// An undirected connection between two distinct laid-out verses.
///
/// `a` is the verse whose reference list first produced the pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ConnectionPair {
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub a: VerseId,
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub b: VerseId,
}

impl ConnectionPair {
    pub fn involves(&self, verse: &VerseId) -> bool {
        self.a == *verse || self.b == *verse
    }

    /// The endpoint opposite `verse`, if `verse` is one of the endpoints.
    pub fn other(&self, verse: &VerseId) -> Option<&VerseId> {
        if self.a == *verse {
            Some(&self.b)
        } else if self.b == *verse {
            Some(&self.a)
        } else {
            None
        }
    }

    /// Order-independent key: `(A, B)` and `(B, A)` produce the same key.
    fn canonical_key(&self) -> (String, String) {
        let a = self.a.to_string();
        let b = self.b.to_string();
        if a <= b { (a, b) } else { (b, a) }
    }
}

/// Cross-reference lookup keyed by verse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CrossRefIndex {
    refs: HashMap<VerseId, Vec<VerseId>>,
}

impl CrossRefIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: VerseId, to: Vec<VerseId>) {
        self.refs.insert(from, to);
    }

    /// Raw references recorded for `verse`; empty when there are none.
    pub fn refs(&self, verse: &VerseId) -> &[VerseId] {
        self.refs.get(verse).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VerseId, &Vec<VerseId>)> {
        self.refs.iter()
    }

    /// Adapter matching the lookup signature `build_connections` takes.
    pub fn lookup(&self, verse: &VerseId) -> Vec<VerseId> {
        self.refs(verse).to_vec()
    }
}

impl FromIterator<(VerseId, Vec<VerseId>)> for CrossRefIndex {
    fn from_iter<I: IntoIterator<Item = (VerseId, Vec<VerseId>)>>(iter: I) -> Self {
        CrossRefIndex {
            refs: iter.into_iter().collect(),
        }
    }
}

/// Build the deduplicated set of connections between laid-out verses.
///
/// References to verses missing from `positions` and self-references are
/// dropped. Output order is the order pairs are first discovered while
/// walking `positions`.
pub fn build_connections(
    positions: &[VersePosition],
    lookup_refs: &dyn Fn(&VerseId) -> Vec<VerseId>,
) -> Vec<ConnectionPair> {
    let known: HashSet<&VerseId> = positions.iter().map(|p| &p.verse_id).collect();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut pairs = Vec::new();
    let mut dropped = 0usize;

    for position in positions {
        let source = &position.verse_id;
        for target in lookup_refs(source) {
            if target == *source {
                continue;
            }
            if !known.contains(&target) {
                dropped += 1;
                continue;
            }
            let pair = ConnectionPair {
                a: source.clone(),
                b: target,
            };
            if seen.insert(pair.canonical_key()) {
                pairs.push(pair);
            }
        }
    }

    debug!(
        "built {} connections ({} references to unknown verses dropped)",
        pairs.len(),
        dropped
    );

    pairs
}

/// Per-verse view over a connection list, for listing a verse's
/// connections without rescanning every pair.
#[derive(Clone, Debug, Default)]
pub struct ConnectionIndex {
    by_verse: HashMap<VerseId, SmallVec<[usize; 4]>>,
}

impl ConnectionIndex {
    pub fn new(pairs: &[ConnectionPair]) -> Self {
        let mut by_verse: HashMap<VerseId, SmallVec<[usize; 4]>> = HashMap::new();
        for (i, pair) in pairs.iter().enumerate() {
            by_verse.entry(pair.a.clone()).or_default().push(i);
            by_verse.entry(pair.b.clone()).or_default().push(i);
        }
        ConnectionIndex { by_verse }
    }

    /// Indices into the pair list of every connection touching `verse`,
    /// in pair-list order.
    pub fn pairs_for(&self, verse: &VerseId) -> &[usize] {
        self.by_verse.get(verse).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn degree(&self, verse: &VerseId) -> usize {
        self.pairs_for(verse).len()
    }
}
