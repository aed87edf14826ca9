// Copyright 2026 The Versewheel Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod connections;
#[cfg(feature = "file_io")]
pub mod crossref;
pub mod diagram;
pub mod geometry;
pub mod hit_test;
pub mod interaction;
pub mod json;
pub mod layout;
pub mod panel;
#[cfg(feature = "file_io")]
pub mod usfx;

#[cfg(test)]
mod layout_proptest;

pub use versewheel_core::{BookMeta, Catalogue, Error, ErrorCode, ErrorKind, Result, VerseId};

pub use self::connections::{ConnectionIndex, ConnectionPair, CrossRefIndex, build_connections};
pub use self::hit_test::{AngularIndex, find_verse_at};
pub use self::interaction::{Highlight, Interaction, InteractionEvent, InteractionState};
pub use self::layout::config::LayoutConfig;
pub use self::layout::{BookSpan, Layout, VersePosition, compute_layout};

use self::geometry::polar_from_offset;

/// A laid-out wheel with its connections and interaction state.
///
/// The layout is recomputed whenever the config changes; the connection
/// set only depends on which verses exist, so it is built once.
pub struct Diagram {
    catalogue: Catalogue,
    config: LayoutConfig,
    layout: Layout,
    connections: Vec<ConnectionPair>,
    connection_index: ConnectionIndex,
    interaction: Interaction,
}

impl Diagram {
    pub fn new(catalogue: Catalogue, refs: &CrossRefIndex, config: LayoutConfig) -> Result<Self> {
        let layout = compute_layout(&catalogue, &config)?;
        let connections = build_connections(&layout.verses, &|id| refs.lookup(id));
        let connection_index = ConnectionIndex::new(&connections);
        let interaction = Interaction::new(&layout, config.max_hit_distance);

        Ok(Diagram {
            catalogue,
            config,
            layout,
            connections,
            connection_index,
            interaction,
        })
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn connections(&self) -> &[ConnectionPair] {
        &self.connections
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut Interaction {
        &mut self.interaction
    }

    /// Swap in a new config (typically a new radius) and recompute the
    /// layout. On error the previous layout and config stay in place.
    pub fn set_config(&mut self, config: LayoutConfig) -> Result<()> {
        let layout = compute_layout(&self.catalogue, &config)?;
        self.interaction.set_layout(&layout, config.max_hit_distance);
        self.layout = layout;
        self.config = config;
        Ok(())
    }

    /// Connections touching `verse`, in connection-set order.
    pub fn connections_for<'a>(
        &'a self,
        verse: &VerseId,
    ) -> impl Iterator<Item = &'a ConnectionPair> + use<'a> {
        self.connection_index
            .pairs_for(verse)
            .iter()
            .map(move |&i| &self.connections[i])
    }

    /// Hit test a pointer given as a center-relative offset.
    pub fn locate_offset(&self, dx: f64, dy: f64) -> Option<&VersePosition> {
        let (angle, distance) = polar_from_offset(dx, dy);
        find_verse_at(angle, distance, &self.layout.verses, self.config.max_hit_distance)
    }

    pub fn pointer_move(&mut self, dx: f64, dy: f64) -> bool {
        let (angle, distance) = polar_from_offset(dx, dy);
        self.interaction.on_pointer_move(angle, distance)
    }

    pub fn click(&mut self, dx: f64, dy: f64) -> bool {
        let (angle, distance) = polar_from_offset(dx, dy);
        self.interaction.on_click(angle, distance)
    }

    pub fn render_svg(&self) -> String {
        diagram::render_svg(
            &self.layout,
            &self.connections,
            self.interaction.state(),
            &self.config,
        )
    }
}
