// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError, // will never be produced
    Generic,
    InvalidCatalogue,
    BadAngleFraction,
    DuplicateBook,
    BadVerseId,
    JsonDecode,
    CrossRefRead,
    XmlDecode,
    Io,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            Generic => "generic",
            InvalidCatalogue => "invalid_catalogue",
            BadAngleFraction => "bad_angle_fraction",
            DuplicateBook => "duplicate_book",
            BadVerseId => "bad_verse_id",
            JsonDecode => "json_decode",
            CrossRefRead => "cross_ref_read",
            XmlDecode => "xml_decode",
            Io => "io",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Catalogue,
    Layout,
    Import,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Catalogue => "CatalogueError",
            ErrorKind::Layout => "LayoutError",
            ErrorKind::Import => "ImportError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorKind::Import, ErrorCode::Io, Some(err.to_string()))
    }
}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! catalogue_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Catalogue, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Catalogue, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! layout_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Layout, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Layout, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! import_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Import, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Import, ErrorCode::$code, None))
    }};
}

#[test]
fn test_error_display() {
    let err = Error::new(
        ErrorKind::Layout,
        ErrorCode::InvalidCatalogue,
        Some("catalogue has no verses".to_owned()),
    );
    assert_eq!(
        "LayoutError{invalid_catalogue: catalogue has no verses}",
        format!("{err}")
    );

    let err = Error::new(ErrorKind::Catalogue, ErrorCode::BadVerseId, None);
    assert_eq!("CatalogueError{bad_verse_id}", format!("{err}"));
}

#[test]
fn test_error_macros() {
    let r: Result<()> = layout_err!(BadAngleFraction, "1.5".to_owned());
    let err = r.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Layout);
    assert_eq!(err.code, ErrorCode::BadAngleFraction);
    assert_eq!(err.get_details().as_deref(), Some("1.5"));

    let r: Result<()> = import_err!(JsonDecode);
    let err = r.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Import);
    assert!(err.details.is_none());
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: Error = io.into();
    assert_eq!(err.code, ErrorCode::Io);
    assert_eq!(err.kind, ErrorKind::Import);
}
