// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Importer for the tab-separated cross-reference list
//! (`From Verse`, `To Verse`, `Votes`), with references written like
//! `Gen.1.1`, `1Sam.3.4` or `Gen.1.1-Gen.1.3`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

use versewheel_core::{Catalogue, Result, VerseId, import_err};

use crate::connections::CrossRefIndex;

lazy_static! {
    // book, chapter, verse; a trailing range is accepted and ignored
    static ref REFERENCE_RE: Regex = Regex::new(
        r"^\s*(\d*\s*[a-zA-Z]+)\.?\s*(\d+)\.(\d+)(?:-\s*(?:\d+|[a-zA-Z]+\.?\s*\d+\.\d+))?\s*$"
    )
    .unwrap();

    static ref ABBREVIATIONS: HashMap<&'static str, &'static str> = [
        ("Gen", "GEN"), ("Exod", "EXO"), ("Ex", "EXO"), ("Lev", "LEV"), ("Num", "NUM"),
        ("Deut", "DEU"), ("Josh", "JOS"), ("Judg", "JDG"), ("Jdgs", "JDG"), ("Ruth", "RUT"),
        ("1 Sam", "1SA"), ("2 Sam", "2SA"), ("1Sam", "1SA"), ("2Sam", "2SA"),
        ("1 Kgs", "1KI"), ("1Kgs", "1KI"), ("2 Kgs", "2KI"), ("2Kgs", "2KI"),
        ("1 Chr", "1CH"), ("1Chr", "1CH"), ("2 Chr", "2CH"), ("2Chr", "2CH"),
        ("Ezra", "EZR"), ("Neh", "NEH"), ("Esth", "EST"), ("Job", "JOB"),
        ("Ps", "PSA"), ("Psa", "PSA"), ("Prov", "PRO"), ("Eccl", "ECC"), ("Song", "SNG"),
        ("Isa", "ISA"), ("Jer", "JER"), ("Lam", "LAM"), ("Ezek", "EZK"), ("Dan", "DAN"),
        ("Hos", "HOS"), ("Joel", "JOL"), ("Amos", "AMO"), ("Obad", "OBA"), ("Jonah", "JON"),
        ("Mic", "MIC"), ("Nah", "NAM"), ("Hab", "HAB"), ("Zeph", "ZEP"), ("Hag", "HAG"),
        ("Zech", "ZEC"), ("Mal", "MAL"),
        ("Matt", "MAT"), ("Mark", "MRK"), ("Mk", "MRK"), ("Luke", "LUK"), ("Lk", "LUK"),
        ("John", "JHN"), ("Jn", "JHN"), ("Acts", "ACT"), ("Rom", "ROM"),
        ("1 Cor", "1CO"), ("1Cor", "1CO"), ("2 Cor", "2CO"), ("2Cor", "2CO"),
        ("Gal", "GAL"), ("Eph", "EPH"), ("Phil", "PHP"), ("Col", "COL"),
        ("1 Thess", "1TH"), ("1Thess", "1TH"), ("2 Thess", "2TH"), ("2Thess", "2TH"),
        ("1 Tim", "1TI"), ("1Tim", "1TI"), ("2 Tim", "2TI"), ("2Tim", "2TI"),
        ("Titus", "TIT"), ("Phlm", "PHM"), ("Heb", "HEB"), ("Jas", "JAS"),
        ("1 Pet", "1PE"), ("1Pet", "1PE"), ("2 Pet", "2PE"), ("2Pet", "2PE"),
        ("1 John", "1JN"), ("1John", "1JN"), ("2 John", "2JN"), ("2John", "2JN"),
        ("3 John", "3JN"), ("3John", "3JN"), ("Jude", "JUD"), ("Rev", "REV"),
    ]
    .into_iter()
    .collect();
}

/// Counters reported after an import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Records read, comments excluded.
    pub records: usize,
    /// Records with too few columns or a reference that couldn't be read.
    pub skipped: usize,
    /// Pairs naming a verse the catalogue doesn't have.
    pub unmatched: usize,
    /// Distinct undirected pairs kept.
    pub unique_pairs: usize,
}

/// Resolve the book part of a reference to a catalogue book id: first
/// through the abbreviation table, then as a book id (exact, then upper
/// cased).
fn resolve_book(book: &str, catalogue: &Catalogue) -> Option<String> {
    if let Some(&id) = ABBREVIATIONS.get(book) {
        if catalogue.book(id).is_some() {
            return Some(id.to_owned());
        }
    }
    if catalogue.book(book).is_some() {
        return Some(book.to_owned());
    }
    let upper = book.to_uppercase();
    if catalogue.book(&upper).is_some() {
        return Some(upper);
    }
    None
}

/// Turn a reference like `Gen.1.1` into a [`VerseId`]. Only the first
/// verse of a range is kept. The verse itself may still be missing from
/// the catalogue; only the book is checked here.
pub fn standardize_reference(raw: &str, catalogue: &Catalogue) -> Option<VerseId> {
    let caps = REFERENCE_RE.captures(raw)?;
    let book = resolve_book(caps[1].trim(), catalogue)?;
    let chapter = caps[2].parse::<u32>().ok()?;
    let verse = caps[3].parse::<u32>().ok()?;
    Some(VerseId::new(book, chapter, verse))
}

/// Read a cross-reference list, keeping pairs whose ends are distinct
/// catalogue verses. Each kept pair is recorded in both directions, and
/// every list in the result is sorted without duplicates.
pub fn import_cross_references<R: Read>(
    reader: R,
    catalogue: &Catalogue,
) -> Result<(CrossRefIndex, ImportStats)> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut stats = ImportStats::default();
    let mut refs: BTreeMap<VerseId, BTreeSet<VerseId>> = BTreeMap::new();

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => return import_err!(CrossRefRead, err.to_string()),
        };
        stats.records += 1;

        let (Some(raw_a), Some(raw_b)) = (record.get(0), record.get(1)) else {
            stats.skipped += 1;
            continue;
        };

        let a = standardize_reference(raw_a, catalogue);
        let b = standardize_reference(raw_b, catalogue);
        let (a, b) = match (a, b) {
            (Some(a), Some(b)) if a != b => (a, b),
            _ => {
                debug!("skipping cross reference {raw_a:?} -> {raw_b:?}");
                stats.skipped += 1;
                continue;
            }
        };

        if !catalogue.contains(&a) || !catalogue.contains(&b) {
            stats.unmatched += 1;
            continue;
        }

        if refs.entry(a.clone()).or_default().insert(b.clone()) {
            stats.unique_pairs += 1;
        }
        refs.entry(b).or_default().insert(a);
    }

    info!(
        "read {} cross reference records: {} pairs kept, {} skipped, {} unmatched",
        stats.records, stats.unique_pairs, stats.skipped, stats.unmatched
    );

    let index = refs
        .into_iter()
        .map(|(from, to)| (from, to.into_iter().collect()))
        .collect();

    Ok((index, stats))
}

pub fn import_cross_references_file<P: AsRef<Path>>(
    path: P,
    catalogue: &Catalogue,
) -> Result<(CrossRefIndex, ImportStats)> {
    let file = File::open(path.as_ref())?;
    import_cross_references(file, catalogue)
}
