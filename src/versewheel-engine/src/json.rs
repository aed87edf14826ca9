// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The JSON datasets the wheel is built from, and the layout export.
//!
//! * `bibleMeta.json`: ordered array of [`BookRecord`]s
//! * `crossRefs.json`: object mapping a verse id to the ids it references
//! * `webBibleText.json`: object mapping a verse id to its text

use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use log::debug;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};

use versewheel_core::{BookMeta, Catalogue, Result, VerseId, import_err};

use crate::connections::CrossRefIndex;
use crate::layout::{BookSpan, Layout, VersePosition};

/// One entry of `bibleMeta.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct BookRecord {
    pub book_name: String,
    pub book_abbr: String,
    pub chapters: Vec<u32>,
}

impl From<BookRecord> for BookMeta {
    fn from(record: BookRecord) -> Self {
        BookMeta::new(record.book_abbr, record.book_name, record.chapters)
    }
}

impl From<&BookMeta> for BookRecord {
    fn from(book: &BookMeta) -> Self {
        BookRecord {
            book_name: book.display_name.clone(),
            book_abbr: book.id.clone(),
            chapters: book.chapter_verse_counts.clone(),
        }
    }
}

fn decode<T, R>(reader: R, what: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    match serde_json::from_reader(reader) {
        Ok(value) => Ok(value),
        Err(err) => import_err!(JsonDecode, format!("{what}: {err}")),
    }
}

fn encode<T: Serialize>(value: &T, what: &str) -> Result<String> {
    match serde_json::to_string_pretty(value) {
        Ok(s) => Ok(s),
        Err(err) => import_err!(JsonDecode, format!("{what}: {err}")),
    }
}

pub fn load_catalogue<R: Read>(reader: R) -> Result<Catalogue> {
    let records: Vec<BookRecord> = decode(reader, "book metadata")?;
    Catalogue::new(records.into_iter().map(BookMeta::from).collect())
}

pub fn catalogue_to_json(catalogue: &Catalogue) -> Result<String> {
    let records: Vec<BookRecord> = catalogue.books().iter().map(BookRecord::from).collect();
    encode(&records, "book metadata")
}

/// Read a cross-reference map. Keys or values that aren't verse ids are
/// skipped rather than failing the whole file.
pub fn load_cross_refs<R: Read>(reader: R) -> Result<CrossRefIndex> {
    let raw: HashMap<String, Vec<String>> = decode(reader, "cross references")?;

    let mut index = CrossRefIndex::new();
    let mut skipped = 0usize;
    for (from, to) in raw {
        let from = match from.parse::<VerseId>() {
            Ok(id) => id,
            Err(err) => {
                debug!("skipping cross reference source: {err}");
                skipped += 1 + to.len();
                continue;
            }
        };
        let mut targets = Vec::with_capacity(to.len());
        for target in to {
            match target.parse::<VerseId>() {
                Ok(id) => targets.push(id),
                Err(err) => {
                    debug!("skipping cross reference from {from}: {err}");
                    skipped += 1;
                }
            }
        }
        index.insert(from, targets);
    }

    if skipped > 0 {
        debug!("{skipped} unparseable cross reference entries skipped");
    }

    Ok(index)
}

/// Serialize with keys in sorted order, so output is stable across runs.
pub fn cross_refs_to_json(index: &CrossRefIndex) -> Result<String> {
    let sorted: BTreeMap<String, Vec<String>> = index
        .iter()
        .map(|(from, to)| (from.to_string(), to.iter().map(VerseId::to_string).collect()))
        .collect();
    encode(&sorted, "cross references")
}

/// Verse text keyed by verse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerseTexts {
    texts: HashMap<VerseId, String>,
}

impl VerseTexts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, verse: VerseId, text: String) {
        self.texts.insert(verse, text);
    }

    pub fn get(&self, verse: &VerseId) -> Option<&str> {
        self.texts.get(verse).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

impl FromIterator<(VerseId, String)> for VerseTexts {
    fn from_iter<I: IntoIterator<Item = (VerseId, String)>>(iter: I) -> Self {
        VerseTexts {
            texts: iter.into_iter().collect(),
        }
    }
}

pub fn load_verse_texts<R: Read>(reader: R) -> Result<VerseTexts> {
    let raw: HashMap<String, String> = decode(reader, "verse text")?;
    let texts = raw
        .into_iter()
        .filter_map(|(id, text)| match id.parse::<VerseId>() {
            Ok(id) => Some((id, text)),
            Err(err) => {
                debug!("skipping verse text: {err}");
                None
            }
        })
        .collect();
    Ok(texts)
}

// map entries written in the given order
struct OrderedTexts<'a>(Vec<(String, &'a str)>);

impl Serialize for OrderedTexts<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(id, text)| (id, text)))
    }
}

/// Serialize verse text in catalogue order. Text for verses outside the
/// catalogue is not written.
pub fn verse_texts_to_json(texts: &VerseTexts, catalogue: &Catalogue) -> Result<String> {
    let ordered = catalogue
        .verse_ids()
        .filter_map(|id| texts.get(&id).map(|text| (id.to_string(), text)))
        .collect();
    encode(&OrderedTexts(ordered), "verse text")
}

/// Serializable snapshot of a [`Layout`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct LayoutDocument {
    pub angle_fraction: f64,
    pub anchor_radius: f64,
    pub books: Vec<BookSpan>,
    pub verses: Vec<VersePosition>,
}

impl From<&Layout> for LayoutDocument {
    fn from(layout: &Layout) -> Self {
        LayoutDocument {
            angle_fraction: layout.angle_fraction,
            anchor_radius: layout.anchor_radius,
            books: layout.books.clone(),
            verses: layout.verses.clone(),
        }
    }
}

pub fn layout_to_json(layout: &Layout) -> Result<String> {
    encode(&LayoutDocument::from(layout), "layout")
}

/// JSON schema describing [`LayoutDocument`].
#[cfg(feature = "schema")]
pub fn layout_document_schema() -> schemars::Schema {
    schemars::schema_for!(LayoutDocument)
}
