// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::f64::consts::{PI, TAU};

use float_cmp::approx_eq;

use crate::connections::ConnectionPair;
use crate::geometry::{escape_xml_attr, escape_xml_text, fmt_coord, point_at, span_sweep};
use crate::interaction::{Highlight, InteractionState};
use crate::layout::Layout;
use crate::layout::config::LayoutConfig;

const RENDER_STYLES: &str = r#"
.versewheel-canvas text {
  fill: #333333;
  font-size: 11px;
  font-family: "Roboto", "Open Sans", "Arial", sans-serif;
  dominant-baseline: middle;
}

/* Books */
.versewheel-book {
  fill: #c9d3e0;
  stroke: #ffffff;
  stroke-width: 0.5px;
}

.versewheel-book.versewheel-highlighted {
  fill: #9fb3cc;
}

.versewheel-book.versewheel-selected {
  fill: #4444dd;
}

/* Verses */
.versewheel-verse.versewheel-highlighted {
  fill: #ff9900;
}

.versewheel-verse.versewheel-selected {
  fill: #dd2222;
}

/* Connections */
.versewheel-connection {
  fill: none;
  stroke: #999999;
  stroke-opacity: 0.15;
  stroke-width: 0.5px;
}

.versewheel-connection.versewheel-highlighted {
  stroke: #ff9900;
  stroke-opacity: 0.9;
  stroke-width: 1px;
}

.versewheel-connection.versewheel-selected {
  stroke: #dd2222;
  stroke-opacity: 1;
  stroke-width: 1.5px;
}
"#;

/// Room left around the ring for book labels.
const LABEL_MARGIN: f64 = 80.0;

fn class_suffix(highlight: Highlight) -> String {
    format!("versewheel-{}", highlight.as_str())
}

/// SVG path of an annular sector from `start` clockwise to `end`.
fn sector_path(start: f64, end: f64, inner: f64, outer: f64) -> String {
    let sweep = span_sweep(start, end);

    if approx_eq!(f64, sweep, TAU, epsilon = 1e-12) {
        // a single arc can't describe a full ring; go around in two halves
        let half = start + PI;
        let o0 = point_at(outer, start);
        let o1 = point_at(outer, half);
        let i0 = point_at(inner, start);
        let i1 = point_at(inner, half);
        return format!(
            "M{},{}A{r},{r} 0 1,1 {},{}A{r},{r} 0 1,1 {},{}ZM{},{}A{ir},{ir} 0 1,0 {},{}A{ir},{ir} 0 1,0 {},{}Z",
            fmt_coord(o0.x),
            fmt_coord(o0.y),
            fmt_coord(o1.x),
            fmt_coord(o1.y),
            fmt_coord(o0.x),
            fmt_coord(o0.y),
            fmt_coord(i0.x),
            fmt_coord(i0.y),
            fmt_coord(i1.x),
            fmt_coord(i1.y),
            fmt_coord(i0.x),
            fmt_coord(i0.y),
            r = fmt_coord(outer),
            ir = fmt_coord(inner),
        );
    }

    let large_arc = if sweep > PI { 1 } else { 0 };
    let end = start + sweep;
    let o0 = point_at(outer, start);
    let o1 = point_at(outer, end);
    let i0 = point_at(inner, start);
    let i1 = point_at(inner, end);

    format!(
        "M{},{}A{r},{r} 0 {large},1 {},{}L{},{}A{ir},{ir} 0 {large},0 {},{}Z",
        fmt_coord(o0.x),
        fmt_coord(o0.y),
        fmt_coord(o1.x),
        fmt_coord(o1.y),
        fmt_coord(i1.x),
        fmt_coord(i1.y),
        fmt_coord(i0.x),
        fmt_coord(i0.y),
        r = fmt_coord(outer),
        ir = fmt_coord(inner),
        large = large_arc,
    )
}

fn render_books(layout: &Layout, state: &InteractionState, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    for book in &layout.books {
        let class = class_suffix(state.classify_book(layout, &book.book_id));
        svg.push_str(&format!(
            "<path class=\"versewheel-book {}\" data-book=\"{}\" d=\"{}\"><title>{}</title></path>",
            class,
            escape_xml_attr(&book.book_id),
            sector_path(
                book.start_angle,
                book.end_angle,
                config.inner_radius,
                config.outer_radius
            ),
            escape_xml_text(&book.display_name),
        ));
    }
    svg
}

fn render_book_labels(layout: &Layout, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    for book in &layout.books {
        let mid = book.start_angle + span_sweep(book.start_angle, book.end_angle) / 2.0;
        let p = point_at(config.outer_radius + config.label_padding, mid);
        let anchor = if p.x < 0.0 { "end" } else { "start" };
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"{}\">{}</text>",
            fmt_coord(p.x),
            fmt_coord(p.y),
            anchor,
            escape_xml_text(&book.display_name),
        ));
    }
    svg
}

/// Arcs marking the hovered and selected verses on the ring.
fn render_verse_marks(layout: &Layout, state: &InteractionState, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    // a verse both hovered and selected gets one mark
    let hovered = state.hovered.as_ref().filter(|&v| Some(v) != state.selected.as_ref());
    for verse in [hovered, state.selected.as_ref()].into_iter().flatten() {
        let Some(position) = layout.position(verse) else {
            continue;
        };
        let class = class_suffix(state.classify_verse(verse));
        svg.push_str(&format!(
            "<path class=\"versewheel-verse {}\" data-verse=\"{}\" d=\"{}\"></path>",
            class,
            escape_xml_attr(&verse.to_string()),
            sector_path(
                position.start_angle,
                position.end_angle,
                config.anchor_radius,
                config.inner_radius
            ),
        ));
    }
    svg
}

fn render_connection(layout: &Layout, pair: &ConnectionPair, highlight: Highlight) -> Option<String> {
    let a = layout.position(&pair.a)?;
    let b = layout.position(&pair.b)?;
    Some(format!(
        "<path class=\"versewheel-connection {}\" d=\"M{},{}Q0,0 {},{}\"></path>",
        class_suffix(highlight),
        fmt_coord(a.anchor_x),
        fmt_coord(a.anchor_y),
        fmt_coord(b.anchor_x),
        fmt_coord(b.anchor_y),
    ))
}

/// Render the wheel as a standalone SVG document.
///
/// Connections are drawn as quadratic curves bent through the center.
/// Highlighted connections are drawn after plain ones and selected ones
/// last, so they stay on top.
pub fn render_svg(
    layout: &Layout,
    connections: &[ConnectionPair],
    state: &InteractionState,
    config: &LayoutConfig,
) -> String {
    // z-layers: plain, highlighted, selected
    let mut z_layers: Vec<Vec<String>> = vec![Vec::new(); 3];
    for pair in connections {
        let highlight = state.classify_connection(pair);
        let z = match highlight {
            Highlight::Plain => 0,
            Highlight::Highlighted => 1,
            Highlight::Selected => 2,
        };
        if let Some(fragment) = render_connection(layout, pair, highlight) {
            z_layers[z].push(fragment);
        }
    }

    let extent = config.outer_radius + config.label_padding + LABEL_MARGIN;
    let size = 2.0 * extent;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{} {} {} {}\" width=\"{}\" height=\"{}\" class=\"versewheel-canvas\">",
        fmt_coord(-extent),
        fmt_coord(-extent),
        fmt_coord(size),
        fmt_coord(size),
        fmt_coord(size),
        fmt_coord(size),
    ));
    svg.push_str("<style>\n");
    svg.push_str(RENDER_STYLES);
    svg.push_str("\n</style>\n");
    svg.push_str("<g class=\"versewheel-connections\">");
    for layer in &z_layers {
        for fragment in layer {
            svg.push_str(fragment);
        }
    }
    svg.push_str("</g>");
    svg.push_str("<g class=\"versewheel-ring\">");
    svg.push_str(&render_books(layout, state, config));
    svg.push_str(&render_verse_marks(layout, state, config));
    svg.push_str("</g>");
    svg.push_str("<g class=\"versewheel-labels\">");
    svg.push_str(&render_book_labels(layout, config));
    svg.push_str("</g>");
    svg.push_str("</svg>");

    svg
}
