// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};
use crate::{catalogue_err, common};

/// Canonical identifier of a single verse.
///
/// The display form is `"<book> <chapter>:<verse>"`, e.g. `"GEN 1:1"`.
/// That string form is also what serde reads and writes, matching the
/// keys of the reference datasets.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerseId {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseId {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        VerseId {
            book: book.into(),
            chapter,
            verse,
        }
    }
}

impl fmt::Display for VerseId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

impl FromStr for VerseId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        lazy_static! {
            static ref VERSE_ID_RE: Regex = Regex::new(r"^\s*(\S+)\s+(\d+):(\d+)\s*$").unwrap();
        }

        let caps = match VERSE_ID_RE.captures(s) {
            Some(caps) => caps,
            None => return catalogue_err!(BadVerseId, format!("'{s}'")),
        };

        let chapter = caps[2].parse::<u32>().ok().filter(|&c| c > 0);
        let verse = caps[3].parse::<u32>().ok().filter(|&v| v > 0);
        match (chapter, verse) {
            (Some(chapter), Some(verse)) => Ok(VerseId::new(&caps[1], chapter, verse)),
            _ => catalogue_err!(BadVerseId, format!("'{s}': chapter and verse start at 1")),
        }
    }
}

impl TryFrom<String> for VerseId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<VerseId> for String {
    fn from(id: VerseId) -> Self {
        id.to_string()
    }
}

/// One book of the catalogue with its per-chapter verse counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMeta {
    pub id: String,
    pub display_name: String,
    /// One entry per chapter, in chapter order. A zero entry is a chapter
    /// with no verses; it keeps its chapter number but contributes nothing.
    pub chapter_verse_counts: Vec<u32>,
}

impl BookMeta {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        chapter_verse_counts: Vec<u32>,
    ) -> Self {
        BookMeta {
            id: id.into(),
            display_name: display_name.into(),
            chapter_verse_counts,
        }
    }

    pub fn verse_count(&self) -> usize {
        self.chapter_verse_counts.iter().map(|&n| n as usize).sum()
    }

    pub fn chapter_count(&self) -> usize {
        self.chapter_verse_counts.len()
    }

    /// Verses of this book in canonical order.
    pub fn verse_ids(&self) -> impl Iterator<Item = VerseId> + '_ {
        self.chapter_verse_counts
            .iter()
            .enumerate()
            .flat_map(move |(i, &count)| {
                let chapter = (i + 1) as u32;
                (1..=count).map(move |verse| VerseId::new(self.id.as_str(), chapter, verse))
            })
    }

    pub fn contains(&self, verse: &VerseId) -> bool {
        if verse.book != self.id || verse.chapter == 0 || verse.verse == 0 {
            return false;
        }
        self.chapter_verse_counts
            .get(verse.chapter as usize - 1)
            .is_some_and(|&count| verse.verse <= count)
    }
}

/// The ordered list of books. Its order defines the canonical verse
/// order and never changes after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalogue {
    books: Vec<BookMeta>,
    by_id: HashMap<String, usize>,
}

impl Catalogue {
    pub fn new(books: Vec<BookMeta>) -> common::Result<Self> {
        let mut by_id = HashMap::with_capacity(books.len());
        for (i, book) in books.iter().enumerate() {
            if by_id.insert(book.id.clone(), i).is_some() {
                return catalogue_err!(DuplicateBook, book.id.clone());
            }
        }
        Ok(Catalogue { books, by_id })
    }

    pub fn books(&self) -> &[BookMeta] {
        &self.books
    }

    pub fn book(&self, id: &str) -> Option<&BookMeta> {
        self.by_id.get(id).map(|&i| &self.books[i])
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn total_verses(&self) -> usize {
        self.books.iter().map(BookMeta::verse_count).sum()
    }

    pub fn contains(&self, verse: &VerseId) -> bool {
        self.book(&verse.book).is_some_and(|b| b.contains(verse))
    }

    /// Every verse in canonical order: book-major, then chapter, then verse.
    pub fn verse_ids(&self) -> impl Iterator<Item = VerseId> + '_ {
        self.books.iter().flat_map(|b| b.verse_ids())
    }

    /// Human readable reference such as "Genesis 1:1". Falls back to the
    /// book id for books the catalogue doesn't know.
    pub fn display_reference(&self, verse: &VerseId) -> String {
        let name = self
            .book(&verse.book)
            .map(|b| b.display_name.as_str())
            .unwrap_or(verse.book.as_str());
        format!("{} {}:{}", name, verse.chapter, verse.verse)
    }
}
