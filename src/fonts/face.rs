// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font face types

use crate::conv::DPU;
use std::sync::Arc;
use thiserror::Error;
use ttf_parser::{name_id, Face, GlyphId};

/// Font loading errors
#[derive(Error, Debug)]
pub enum FontError {
    #[error("font load error")]
    TtfParser(#[from] ttf_parser::FaceParsingError),
}

/// A parsed font
///
/// This owns the font data, which was validated on construction. Cloning is
/// cheap (the data is shared).
///
/// A [`Face`] borrows its data, thus is not stored here but re-created on
/// access; this is cheap since `ttf_parser` parses tables lazily.
#[derive(Clone)]
pub struct ParsedFont {
    data: Arc<[u8]>,
    index: u32,
    units_per_em: u16,
    family: Option<String>,
}

impl std::fmt::Debug for ParsedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ParsedFont")
            .field("len", &self.data.len())
            .field("index", &self.index)
            .field("units_per_em", &self.units_per_em)
            .field("family", &self.family)
            .finish()
    }
}

impl ParsedFont {
    /// Parse the first face of a font file
    pub fn parse(data: impl Into<Arc<[u8]>>) -> Result<Self, FontError> {
        Self::parse_index(data, 0)
    }

    /// Parse face `index` of a font file or collection
    pub fn parse_index(data: impl Into<Arc<[u8]>>, index: u32) -> Result<Self, FontError> {
        let data = data.into();
        let face = Face::parse(&data, index)?;
        let units_per_em = face.units_per_em();
        let family = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == name_id::FAMILY && name.is_unicode())
            .find_map(|name| name.to_string());
        drop(face);

        Ok(ParsedFont {
            data,
            index,
            units_per_em,
            family,
        })
    }

    /// Access the [`Face`]
    pub fn face(&self) -> Result<Face<'_>, FontError> {
        Ok(Face::parse(&self.data, self.index)?)
    }

    /// Raw font data
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Font units per Em
    #[inline]
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Family name, as given by the `name` table
    #[inline]
    pub fn family_name(&self) -> Option<&str> {
        self.family.as_deref()
    }

    /// Scale for text of the given `size` (drawing units per Em)
    #[inline]
    pub fn dpu(&self, size: f64) -> DPU {
        DPU::new(size, self.units_per_em)
    }
}

/// A face scaled to drawing units
#[derive(Copy, Clone)]
pub struct ScaledFace<'a>(&'a Face<'a>, DPU);

impl<'a> ScaledFace<'a> {
    /// Construct
    #[inline]
    pub fn new(face: &'a Face<'a>, dpu: DPU) -> Self {
        ScaledFace(face, dpu)
    }

    /// Unscaled face
    #[inline]
    pub fn face(&self) -> &'a Face<'a> {
        self.0
    }

    /// Scale
    #[inline]
    pub fn dpu(&self) -> DPU {
        self.1
    }

    /// Glyph identifier for a char, if the face covers it
    #[inline]
    pub fn glyph_index(&self, c: char) -> Option<GlyphId> {
        self.0.glyph_index(c)
    }

    /// Horizontal advancement after this glyph, without shaping or kerning
    #[inline]
    pub fn h_advance(&self, id: GlyphId) -> f64 {
        let x = self.0.glyph_hor_advance(id).unwrap_or(0);
        self.1.u16_to_units(x)
    }

    /// Pair kerning adjustment from the `kern` table
    ///
    /// Only horizontal, non-variable subtables are considered. Resolves to 0
    /// if the face has no kerning for this pair.
    pub fn kern(&self, left: GlyphId, right: GlyphId) -> f64 {
        let Some(kern) = self.0.tables().kern else {
            return 0.0;
        };
        for subtable in kern.subtables {
            if !subtable.horizontal || subtable.variable {
                continue;
            }
            if let Some(x) = subtable.glyphs_kerning(left, right) {
                return self.1.i16_to_units(x);
            }
        }
        0.0
    }

    /// Ascender
    #[inline]
    pub fn ascent(&self) -> f64 {
        self.1.i16_to_units(self.0.ascender())
    }

    /// Descender
    #[inline]
    pub fn descent(&self) -> f64 {
        self.1.i16_to_units(self.0.descender())
    }
}
