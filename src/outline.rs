// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Glyph outlines
//!
//! Text is shaped into a single line (see [`crate::shaper`]) and each glyph's
//! outline is converted to a [`BezPath`] in drawing units. Coordinates are
//! in model space: y points up and the baseline lies at `y = 0`.

use crate::conv::DPU;
use crate::fonts::{FontError, ParsedFont};
use crate::shaper::{self, Glyph};
use kurbo::{BezPath, Point, Rect, Shape, Vec2};
use ttf_parser::OutlineBuilder;

/// Writes font-unit outline commands into a [`BezPath`]
struct PathSink<'a> {
    path: &'a mut BezPath,
    dpu: DPU,
    origin: Vec2,
}

impl PathSink<'_> {
    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(self.dpu.f32_to_units(x), self.dpu.f32_to_units(y)) + self.origin
    }
}

impl OutlineBuilder for PathSink<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let p1 = self.point(x1, y1);
        let p = self.point(x, y);
        self.path.quad_to(p1, p);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let p1 = self.point(x1, y1);
        let p2 = self.point(x2, y2);
        let p = self.point(x, y);
        self.path.curve_to(p1, p2, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

/// Outline of a single glyph
#[derive(Clone, Debug)]
pub struct GlyphOutline {
    /// The shaped glyph
    pub glyph: Glyph,
    /// Outline, positioned
    pub path: BezPath,
}

/// Outlines of a line of text
#[derive(Clone, Debug, Default)]
pub struct TextOutline {
    glyphs: Vec<GlyphOutline>,
    advance: f64,
}

impl TextOutline {
    /// Shape and outline `text` at `size` drawing units per Em
    ///
    /// Glyphs without an outline (e.g. spaces) are omitted but still advance
    /// the caret.
    pub fn build(font: &ParsedFont, text: &str, size: f64) -> Result<Self, FontError> {
        let face = font.face()?;
        let dpu = font.dpu(size);
        let run = shaper::shape(&face, dpu, text);

        let mut glyphs = Vec::with_capacity(run.glyphs.len());
        for glyph in run.glyphs {
            let mut path = BezPath::new();
            let mut sink = PathSink {
                path: &mut path,
                dpu,
                origin: glyph.position.to_vec2(),
            };
            if face.outline_glyph(glyph.id, &mut sink).is_some() && !path.elements().is_empty() {
                glyphs.push(GlyphOutline { glyph, path });
            }
        }

        log::trace!(
            "TextOutline::build: {} glyphs with outline for {:?}",
            glyphs.len(),
            text
        );

        Ok(TextOutline {
            glyphs,
            advance: run.caret,
        })
    }

    /// Glyph outlines, in text order
    #[inline]
    pub fn glyphs(&self) -> &[GlyphOutline] {
        &self.glyphs
    }

    /// True if no glyph has an outline
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Horizontal advance of the whole line
    #[inline]
    pub fn advance(&self) -> f64 {
        self.advance
    }

    /// All glyph outlines as a single path
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for glyph in &self.glyphs {
            path.extend(glyph.path.iter());
        }
        path
    }

    /// Bounding box of all outlines
    pub fn bounding_box(&self) -> Option<Rect> {
        self.glyphs
            .iter()
            .map(|g| g.path.bounding_box())
            .reduce(|a, b| a.union(b))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MONO: &[u8] = include_bytes!("../tests/data/DejaVuSansMono.ttf");

    #[test]
    fn outline_hi() {
        let font = ParsedFont::parse(MONO.to_vec()).unwrap();
        let text = TextOutline::build(&font, "H I", 100.0).unwrap();
        // the space has no outline
        assert_eq!(text.glyphs().len(), 2);
        assert_eq!(text.glyphs()[1].glyph.index, 2);

        let bbox = text.bounding_box().unwrap();
        // capitals sit on the baseline and rise to below one Em
        assert!(bbox.y0.abs() < 1.0);
        assert!(bbox.y1 > 50.0 && bbox.y1 < 100.0);
        assert!(bbox.x1 <= text.advance());
    }

    #[test]
    fn scales_with_size() {
        let font = ParsedFont::parse(MONO.to_vec()).unwrap();
        let small = TextOutline::build(&font, "O", 50.0).unwrap();
        let large = TextOutline::build(&font, "O", 100.0).unwrap();
        let a = small.bounding_box().unwrap();
        let b = large.bounding_box().unwrap();
        assert!((b.height() - 2.0 * a.height()).abs() < 1e-6);
        assert!((large.advance() - 2.0 * small.advance()).abs() < 1e-9);
    }

    #[test]
    fn whitespace_only() {
        let font = ParsedFont::parse(MONO.to_vec()).unwrap();
        let text = TextOutline::build(&font, "  ", 100.0).unwrap();
        assert!(text.is_empty());
        assert!(text.bounding_box().is_none());
        assert!(text.advance() > 0.0);
        assert!(text.to_path().elements().is_empty());
    }
}
