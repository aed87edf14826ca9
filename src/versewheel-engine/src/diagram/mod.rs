// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Static SVG rendering of a wheel and its current highlight state.

mod render;

pub use render::render_svg;
