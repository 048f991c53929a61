// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Text shaping
//!
//! To quote the HarfBuzz manual:
//!
//! > Text shaping is the process of translating a string of character codes
//! > (such as Unicode codepoints) into a properly arranged sequence of glyphs
//! > that can be rendered onto a screen or into final output form for
//! > inclusion in a document.
//!
//! This module provides the [`shape`] function, which produces a single
//! left-to-right line of positioned [`Glyph`]s. Without the `shaping`
//! feature, glyphs are placed by advance width and `kern`-table pair kerning
//! only.
//!
//! This module *does not* perform line-breaking, wrapping or text reversal.

use crate::conv::{to_u32, DPU};
use crate::fonts::ScaledFace;
use kurbo::Point;
use ttf_parser::{Face, GlyphId};

/// A positioned glyph
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    /// Index of char in source text
    pub index: u32,
    /// Glyph identifier in font
    pub id: GlyphId,
    /// Position of glyph origin, in drawing units (y up)
    pub position: Point,
}

/// A shaped line of text
#[derive(Clone, Debug, Default)]
pub struct GlyphRun {
    /// Sequence of all glyphs, with index in text
    pub glyphs: Vec<Glyph>,
    /// End position, excluding whitespace
    pub end_no_space: f64,
    /// Position of next glyph
    pub caret: f64,
}

/// Shape `text` as a single line with baseline at `y = 0`
pub(crate) fn shape(face: &Face, dpu: DPU, text: &str) -> GlyphRun {
    if !dpu.0.is_finite() || text.is_empty() {
        return GlyphRun::default();
    }

    cfg_if::cfg_if! {
        if #[cfg(feature = "rustybuzz")] {
            shape_rustybuzz(face, dpu, text)
        } else {
            shape_simple(face, dpu, text)
        }
    }
}

#[cfg(feature = "rustybuzz")]
fn shape_rustybuzz(face: &Face, dpu: DPU, text: &str) -> GlyphRun {
    use crate::conv::to_usize;

    let rb_face = rustybuzz::Face::from_face(face.clone());
    let mut buffer = rustybuzz::UnicodeBuffer::new();
    buffer.push_str(text);
    buffer.guess_segment_properties();
    let output = rustybuzz::shape(&rb_face, &[], buffer);

    let mut caret = 0.0;
    let mut end_no_space = caret;
    let mut glyphs = Vec::with_capacity(output.len());

    for (info, pos) in output
        .glyph_infos()
        .iter()
        .zip(output.glyph_positions().iter())
    {
        let position = Point::new(
            caret + dpu.i32_to_units(pos.x_offset),
            dpu.i32_to_units(pos.y_offset),
        );
        let id = GlyphId(u16::try_from(info.glyph_id).unwrap_or(0));
        glyphs.push(Glyph {
            index: info.cluster,
            id,
            position,
        });

        caret += dpu.i32_to_units(pos.x_advance);
        let is_space = text
            .get(to_usize(info.cluster)..)
            .and_then(|s| s.chars().next())
            .is_some_and(char::is_whitespace);
        if !is_space {
            end_no_space = caret;
        }
    }

    GlyphRun {
        glyphs,
        end_no_space,
        caret,
    }
}

#[cfg_attr(feature = "rustybuzz", allow(unused))]
fn shape_simple(face: &Face, dpu: DPU, text: &str) -> GlyphRun {
    let scaled = ScaledFace::new(face, dpu);

    let mut caret = 0.0;
    let mut end_no_space = caret;
    let mut prev_glyph_id = None;

    // Allocate with an over-estimate and shrink later:
    let mut glyphs = Vec::with_capacity(text.len());

    for (index, c) in text.char_indices() {
        if c.is_control() {
            continue;
        }

        // GlyphId 0 is the 'missing glyph' representation
        let id = scaled.glyph_index(c).unwrap_or(GlyphId(0));

        if let Some(prev) = prev_glyph_id {
            caret += scaled.kern(prev, id);
        }
        prev_glyph_id = Some(id);

        glyphs.push(Glyph {
            index: to_u32(index),
            id,
            position: Point::new(caret, 0.0),
        });

        caret += scaled.h_advance(id);
        if !c.is_whitespace() {
            end_no_space = caret;
        }
    }

    glyphs.shrink_to_fit();

    GlyphRun {
        glyphs,
        end_no_space,
        caret,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fonts::ParsedFont;

    const MONO: &[u8] = include_bytes!("../tests/data/DejaVuSansMono.ttf");

    #[test]
    fn monospace_line() {
        let font = ParsedFont::parse(MONO.to_vec()).unwrap();
        let face = font.face().unwrap();
        let dpu = font.dpu(100.0);
        let run = shape_simple(&face, dpu, "HI i");
        assert_eq!(run.glyphs.len(), 4);
        assert_eq!(run.glyphs[0].position, Point::ZERO);
        assert_eq!(run.glyphs[3].index, 3);

        let advance = run.glyphs[1].position.x;
        assert!(advance > 0.0);
        assert!((run.caret - 4.0 * advance).abs() < 1e-9);
        assert!((run.end_no_space - run.caret).abs() < 1e-9);
    }

    #[test]
    fn trailing_space() {
        let font = ParsedFont::parse(MONO.to_vec()).unwrap();
        let face = font.face().unwrap();
        let run = shape(&face, font.dpu(50.0), "A ");
        assert!(run.end_no_space < run.caret);
    }

    #[test]
    fn empty() {
        let font = ParsedFont::parse(MONO.to_vec()).unwrap();
        let face = font.face().unwrap();
        assert!(shape(&face, font.dpu(50.0), "").glyphs.is_empty());
        assert!(shape_simple(&face, font.dpu(50.0), "\n\t").glyphs.is_empty());
    }
}
