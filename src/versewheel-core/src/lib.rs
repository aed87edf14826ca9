// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod common;
pub mod datamodel;

pub use common::{Error, ErrorCode, ErrorKind, Result};
pub use datamodel::{BookMeta, Catalogue, VerseId};
