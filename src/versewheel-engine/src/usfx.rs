// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Importer for USFX scripture files, producing the book catalogue and
//! the verse text the wheel is built from.
//!
//! Only the 66 books of the Protestant canon are kept, in the order they
//! appear in the file. Book display names come from a separate
//! `BookNames.xml` (`<book code="GEN" short="Genesis" .../>`); books it
//! doesn't name are shown by their code.
//!
//! Chapter `<c id="N"/>` and verse `<v id="N"/>` markers are milestones:
//! a verse runs until `<ve/>`, the next verse or chapter marker, or the end
//! of its book. Footnotes, cross references, headings and other notes are
//! not part of verse text.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str;

use log::{debug, info, warn};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use versewheel_core::{BookMeta, Catalogue, Error, ErrorCode, ErrorKind, Result, VerseId, import_err};

use crate::json::VerseTexts;

pub const PROTESTANT_CANON: [&str; 66] = [
    "GEN", "EXO", "LEV", "NUM", "DEU", "JOS", "JDG", "RUT", "1SA", "2SA", "1KI", "2KI", "1CH",
    "2CH", "EZR", "NEH", "EST", "JOB", "PSA", "PRO", "ECC", "SNG", "ISA", "JER", "LAM", "EZK",
    "DAN", "HOS", "JOL", "AMO", "OBA", "JON", "MIC", "NAM", "HAB", "ZEP", "HAG", "ZEC", "MAL",
    "MAT", "MRK", "LUK", "JHN", "ACT", "ROM", "1CO", "2CO", "GAL", "EPH", "PHP", "COL", "1TH",
    "2TH", "1TI", "2TI", "TIT", "PHM", "HEB", "JAS", "1PE", "2PE", "1JN", "2JN", "3JN", "JUD",
    "REV",
];

// elements whose content never belongs to a verse
const SKIPPED: &[&[u8]] = &[
    b"f", b"fe", b"x", b"s", b"d", b"h", b"toc", b"id", b"ide", b"rem", b"fig",
];

// paragraph-level elements; their boundaries separate words
const BLOCKS: &[&[u8]] = &[b"p", b"q", b"li", b"b", b"pi", b"m"];

/// Book code to display name.
pub type BookNames = HashMap<String, String>;

fn xml_error(err: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::Import, ErrorCode::XmlDecode, Some(err.to_string()))
}

fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(xml_error)?;
        if attr.key.local_name().as_ref() == name {
            let raw = str::from_utf8(&attr.value).map_err(xml_error)?;
            let value = quick_xml::escape::unescape(raw).map_err(xml_error)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Resolve `&name;` or a character reference to the text it stands for.
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    let text = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => return None,
    };
    Some(text.to_owned())
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn read_book_names<R: BufRead>(reader: R) -> Result<BookNames> {
    let mut reader = Reader::from_reader(reader);
    let mut names = BookNames::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Err(err) => return Err(xml_error(err)),
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"book" => {
                if let (Some(code), Some(short)) = (attribute(&e, b"code")?, attribute(&e, b"short")?) {
                    names.insert(code, short);
                }
            }
            Ok(_) => {}
        }
        buf.clear();
    }

    if names.is_empty() {
        return import_err!(XmlDecode, "no <book code=.. short=..> entries found".to_owned());
    }
    debug!("read {} book names", names.len());
    Ok(names)
}

pub fn read_book_names_file<P: AsRef<Path>>(path: P) -> Result<BookNames> {
    let file = File::open(path.as_ref())?;
    read_book_names(BufReader::new(file))
}

struct BookState {
    id: String,
    chapters: Vec<u32>,
    // 0 before the first chapter marker
    chapter: u32,
    last_verse: u32,
    stopped: bool,
}

struct UsfxParser<'a> {
    names: &'a BookNames,
    books: Vec<BookMeta>,
    texts: VerseTexts,
    book: Option<BookState>,
    verse: Option<(u32, String)>,
    skip_depth: usize,
}

impl<'a> UsfxParser<'a> {
    fn new(names: &'a BookNames) -> Self {
        UsfxParser {
            names,
            books: Vec::new(),
            texts: VerseTexts::new(),
            book: None,
            verse: None,
            skip_depth: 0,
        }
    }

    fn in_book(&self) -> bool {
        self.book.as_ref().is_some_and(|b| !b.stopped)
    }

    fn open(&mut self, e: &BytesStart, empty: bool) -> Result<()> {
        let name = e.local_name();
        let name = name.as_ref();
        if name == b"book" {
            if !empty {
                self.start_book(attribute(e, b"id")?);
            }
            return Ok(());
        }
        if !self.in_book() {
            return Ok(());
        }

        match name {
            b"c" => {
                self.finish_verse();
                self.start_chapter(attribute(e, b"id")?.as_deref());
            }
            b"v" => {
                self.finish_verse();
                self.start_verse(attribute(e, b"id")?.as_deref());
            }
            b"ve" => self.finish_verse(),
            _ if SKIPPED.contains(&name) => {
                if !empty {
                    self.skip_depth += 1;
                }
            }
            _ if BLOCKS.contains(&name) => self.push_text(" "),
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        if name == b"book" {
            self.finish_book();
            return;
        }
        if !self.in_book() {
            return;
        }
        if SKIPPED.contains(&name) {
            self.skip_depth = self.skip_depth.saturating_sub(1);
        } else if BLOCKS.contains(&name) {
            self.push_text(" ");
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.skip_depth > 0 {
            return;
        }
        if let Some((_, buf)) = self.verse.as_mut() {
            buf.push_str(text);
        }
    }

    fn start_book(&mut self, id: Option<String>) {
        self.finish_book();
        match id {
            Some(id) if PROTESTANT_CANON.contains(&id.as_str()) => {
                self.book = Some(BookState {
                    id,
                    chapters: Vec::new(),
                    chapter: 0,
                    last_verse: 0,
                    stopped: false,
                });
            }
            Some(id) => debug!("skipping book {id}, not in the Protestant canon"),
            None => debug!("skipping <book> without an id"),
        }
    }

    fn start_chapter(&mut self, id: Option<&str>) {
        let Some(book) = self.book.as_mut() else {
            return;
        };
        if book.chapter > 0 {
            book.chapters.push(book.last_verse);
        }

        let number = id
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|&n| n as usize > book.chapters.len());
        match number {
            Some(n) => {
                // skipped chapter numbers keep their place with no verses
                book.chapters.resize(n as usize - 1, 0);
                book.chapter = n;
                book.last_verse = 0;
            }
            None => {
                warn!(
                    "invalid chapter id {:?} in {}, ignoring the rest of the book",
                    id, book.id
                );
                book.chapter = 0;
                book.stopped = true;
            }
        }
    }

    fn start_verse(&mut self, id: Option<&str>) {
        let Some(book) = self.book.as_mut() else {
            return;
        };
        if book.chapter == 0 {
            return;
        }
        match id.and_then(|s| s.trim().parse::<u32>().ok()).filter(|&n| n > 0) {
            Some(n) => {
                book.last_verse = book.last_verse.max(n);
                self.verse = Some((n, String::new()));
            }
            None => debug!("invalid verse id {:?} in {} {}", id, book.id, book.chapter),
        }
    }

    fn finish_verse(&mut self) {
        let Some((verse, buf)) = self.verse.take() else {
            return;
        };
        let Some(book) = self.book.as_ref() else {
            return;
        };
        let text = normalize_whitespace(&buf);
        if !text.is_empty() {
            self.texts
                .insert(VerseId::new(book.id.clone(), book.chapter, verse), text);
        }
    }

    fn finish_book(&mut self) {
        self.finish_verse();
        self.skip_depth = 0;
        let Some(mut book) = self.book.take() else {
            return;
        };
        if book.chapter > 0 {
            book.chapters.push(book.last_verse);
        }
        if book.chapters.is_empty() {
            warn!("skipping book {}: no chapters found", book.id);
            return;
        }
        let name = self
            .names
            .get(&book.id)
            .cloned()
            .unwrap_or_else(|| book.id.clone());
        self.books.push(BookMeta::new(book.id, name, book.chapters));
    }
}

/// Read a USFX file into a catalogue of canonical books and their verse
/// text. Chapter verse counts come from the highest verse number seen, so
/// verses without text still count.
pub fn import_usfx<R: BufRead>(reader: R, names: &BookNames) -> Result<(Catalogue, VerseTexts)> {
    let mut reader = Reader::from_reader(reader);
    let mut parser = UsfxParser::new(names);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Err(err) => return Err(xml_error(err)),
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => parser.open(&e, false)?,
            Ok(Event::Empty(e)) => parser.open(&e, true)?,
            Ok(Event::End(e)) => parser.close(e.local_name().as_ref()),
            Ok(Event::Text(t)) => {
                let raw = str::from_utf8(&t).map_err(xml_error)?;
                let text = quick_xml::escape::unescape(raw).map_err(xml_error)?;
                parser.push_text(&text);
            }
            Ok(Event::CData(t)) => {
                let text = str::from_utf8(&t).map_err(xml_error)?;
                parser.push_text(text);
            }
            Ok(Event::GeneralRef(r)) => {
                let name = str::from_utf8(&r).map_err(xml_error)?;
                match resolve_reference(name) {
                    Some(text) => parser.push_text(&text),
                    None => debug!("ignoring unknown entity &{name};"),
                }
            }
            Ok(_) => {}
        }
        buf.clear();
    }
    parser.finish_book();

    let UsfxParser { books, texts, .. } = parser;
    if books.is_empty() {
        return import_err!(InvalidCatalogue, "no Protestant canon books found".to_owned());
    }
    if books.len() != PROTESTANT_CANON.len() {
        warn!(
            "expected {} canonical books, found {}",
            PROTESTANT_CANON.len(),
            books.len()
        );
    }

    let catalogue = Catalogue::new(books)?;
    info!(
        "imported {} books: {} verses, {} with text",
        catalogue.books().len(),
        catalogue.total_verses(),
        texts.len()
    );
    Ok((catalogue, texts))
}

pub fn import_usfx_file<P: AsRef<Path>>(path: P, names: &BookNames) -> Result<(Catalogue, VerseTexts)> {
    let file = File::open(path.as_ref())?;
    import_usfx(BufReader::new(file), names)
}
