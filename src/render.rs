// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Render pipeline
//!
//! A render produces two drawings from a font, text and size:
//!
//! -   the *outline*: the glyph outlines of the text
//! -   the *keychain*: the glyph outlines plus a silhouette formed by
//!     offsetting the glyphs outwards, joining a disc (the ring) and cutting
//!     the mounting hole from it
//!
//! Both are exported as SVG using fixed presentation values; the colour and
//! stroke parameters of [`RenderParameters`] do not currently affect the
//! output.

use crate::fonts::{FontError, ParsedFont};
use crate::geometry::{self, Region};
use crate::markup::{Drawing, MarkupOptions, Presentation};
use crate::outline::TextOutline;
use crate::RenderParameters;
use geo::{BooleanOps, MultiPolygon};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Render errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("font load error")]
    Font(#[from] FontError),
    #[error("degenerate geometry in {0}")]
    Degenerate(&'static str),
}

/// Keychain shape and export configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeychainConfig {
    /// Distance by which the glyphs are offset to form the silhouette
    pub outline_offset: f64,
    /// Radius of the ring joined to the silhouette
    pub ring_radius: f64,
    /// Radius of the mounting hole
    pub hole_radius: f64,
    /// Centre of the ring and hole (model space, y up)
    pub hole_centre: (f64, f64),
    /// Curve flattening tolerance
    pub tolerance: f64,
    /// Number of sides used to approximate discs
    pub disc_segments: u32,
    /// Margin around exported drawings
    pub margin: f64,
    /// Decimal places of exported coordinates
    pub precision: usize,
    /// Presentation of exported drawings
    pub presentation: Presentation,
}

impl Default for KeychainConfig {
    fn default() -> Self {
        KeychainConfig {
            outline_offset: 25.0,
            ring_radius: 25.0,
            hole_radius: 6.0,
            hole_centre: (-40.0, 50.0),
            tolerance: 0.1,
            disc_segments: 64,
            margin: 1.0,
            precision: 3,
            presentation: Presentation::default(),
        }
    }
}

impl KeychainConfig {
    fn centre(&self) -> Point {
        Point::new(self.hole_centre.0, self.hole_centre.1)
    }

    fn markup_options(&self) -> MarkupOptions {
        MarkupOptions {
            margin: self.margin,
            precision: self.precision,
        }
    }
}

/// The two exported drawings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOutput {
    /// Glyph outlines
    pub outline: String,
    /// Keychain composite
    pub keychain: String,
}

/// Builds and exports the drawings
#[derive(Clone, Debug, Default)]
pub struct RenderPipeline {
    config: KeychainConfig,
}

impl RenderPipeline {
    /// Construct
    pub fn new(config: KeychainConfig) -> Self {
        RenderPipeline { config }
    }

    /// Configuration
    #[inline]
    pub fn config(&self) -> &KeychainConfig {
        &self.config
    }

    /// Render both drawings
    ///
    /// Any failure aborts the whole render: no partial output is produced.
    pub fn render(
        &self,
        font: &ParsedFont,
        params: &RenderParameters,
    ) -> Result<RenderOutput, RenderError> {
        log::debug!(
            "RenderPipeline::render: {:?} at size {} ({:?})",
            params.text,
            params.size,
            font.family_name()
        );
        let text = TextOutline::build(font, &params.text, params.size)?;
        let finite = text.advance().is_finite()
            && text.bounding_box().map(|r| r.is_finite()).unwrap_or(true);
        if !finite {
            return Err(RenderError::Degenerate("glyph outlines"));
        }
        let opts = self.config.markup_options();
        let presentation = &self.config.presentation;

        let mut drawing = Drawing::new();
        drawing.add("text", text.to_path());
        let outline = drawing.to_svg(presentation, &opts);

        let silhouette = self.silhouette(&text)?;
        drawing.add("outline", geometry::to_path(&silhouette));
        let keychain = drawing.to_svg(presentation, &opts);

        Ok(RenderOutput { outline, keychain })
    }

    /// Filled region of the glyphs
    pub fn glyph_region(&self, text: &TextOutline) -> Region {
        let tolerance = self.config.tolerance;
        geometry::union_all(text.glyphs().iter().map(|glyph| {
            geometry::fill_region(geometry::flatten_contours(&glyph.path, tolerance))
        }))
    }

    fn ring(&self) -> Region {
        let config = &self.config;
        MultiPolygon::new(vec![geometry::disc(
            config.centre(),
            config.ring_radius,
            config.disc_segments,
        )])
    }

    /// The keychain silhouette: offset glyphs joined with the ring, minus the hole
    pub fn silhouette(&self, text: &TextOutline) -> Result<Region, RenderError> {
        let config = &self.config;
        let glyphs = self.glyph_region(text);
        let outer = geometry::offset(&glyphs, config.outline_offset);
        if !geometry::is_finite(&outer) {
            return Err(RenderError::Degenerate("glyph offset"));
        }

        let ring = self.ring();
        let hole = MultiPolygon::new(vec![geometry::disc(
            config.centre(),
            config.hole_radius,
            config.disc_segments,
        )]);

        let joined = geometry::union_all([outer, ring]);
        let silhouette = joined.difference(&hole);
        if !geometry::is_finite(&silhouette) {
            return Err(RenderError::Degenerate("keychain silhouette"));
        }
        Ok(silhouette)
    }
}
