// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Vector markup (SVG) export
//!
//! Model coordinates have y pointing **up**; SVG has y pointing **down**.
//! All y coordinates are negated on output. Path data is written as raw `d`
//! strings with a fixed precision.

use kurbo::{BezPath, PathEl, Point, Rect, Shape};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use svg::node::element::{Group, Path};
use svg::Document;

/// Presentation attributes applied to every layer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: String,
}

impl Default for Presentation {
    fn default() -> Self {
        Presentation {
            fill: "none".to_string(),
            stroke: "#000".to_string(),
            stroke_width: "0.25mm".to_string(),
        }
    }
}

/// Options controlling export
#[derive(Clone, Debug, PartialEq)]
pub struct MarkupOptions {
    /// Extra margin around the bounding box, in drawing units
    pub margin: f64,
    /// Number of decimal places for coordinates
    pub precision: usize,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        MarkupOptions {
            margin: 1.0,
            precision: 3,
        }
    }
}

/// A named path
#[derive(Clone, Debug)]
pub struct Layer {
    pub id: &'static str,
    pub path: BezPath,
}

/// A drawing: a list of layers in model space
#[derive(Clone, Debug, Default)]
pub struct Drawing {
    layers: Vec<Layer>,
}

impl Drawing {
    /// Construct an empty drawing
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer; empty paths are skipped
    pub fn add(&mut self, id: &'static str, path: BezPath) -> &mut Self {
        if !path.elements().is_empty() {
            self.layers.push(Layer { id, path });
        }
        self
    }

    /// Layers, in drawing order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Bounding box of all layers (model space)
    pub fn bounding_box(&self) -> Option<Rect> {
        self.layers
            .iter()
            .map(|layer| layer.path.bounding_box())
            .reduce(|a, b| a.union(b))
    }

    /// Serialize to an SVG string
    pub fn to_svg(&self, presentation: &Presentation, opts: &MarkupOptions) -> String {
        let bb = self.bounding_box().unwrap_or(Rect::ZERO);
        let bb = if self.layers.is_empty() {
            bb
        } else {
            bb.inflate(opts.margin, opts.margin)
        };

        let mut group = Group::new()
            .set("fill", presentation.fill.as_str())
            .set("stroke", presentation.stroke.as_str())
            .set("stroke-width", presentation.stroke_width.as_str())
            .set("fill-rule", "evenodd");
        for layer in &self.layers {
            group = group.add(
                Path::new()
                    .set("id", layer.id)
                    .set("d", path_to_d(&layer.path, opts.precision)),
            );
        }

        // flipped: model y1 becomes the top edge
        let p = opts.precision;
        let view_box = format!(
            "{} {} {} {}",
            fmt_scalar(bb.x0, p),
            fmt_scalar(-bb.y1, p),
            fmt_scalar(bb.width(), p),
            fmt_scalar(bb.height(), p)
        );
        Document::new()
            .set("width", fmt_scalar(bb.width(), p))
            .set("height", fmt_scalar(bb.height(), p))
            .set("viewBox", view_box)
            .add(group)
            .to_string()
    }
}

/// Format a scalar with at most `precision` decimals and no trailing zeros
pub fn fmt_scalar(x: f64, precision: usize) -> String {
    let mut s = format!("{x:.precision$}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}

fn push_point(d: &mut String, p: Point, precision: usize) {
    // y flipped
    let _ = write!(
        d,
        "{} {}",
        fmt_scalar(p.x, precision),
        fmt_scalar(-p.y, precision)
    );
}

/// Convert a path to SVG path data, flipping y
pub fn path_to_d(path: &BezPath, precision: usize) -> String {
    let mut d = String::new();
    for el in path.iter() {
        if !d.is_empty() {
            d.push(' ');
        }
        match el {
            PathEl::MoveTo(p) => {
                d.push_str("M ");
                push_point(&mut d, p, precision);
            }
            PathEl::LineTo(p) => {
                d.push_str("L ");
                push_point(&mut d, p, precision);
            }
            PathEl::QuadTo(p1, p) => {
                d.push_str("Q ");
                push_point(&mut d, p1, precision);
                d.push(' ');
                push_point(&mut d, p, precision);
            }
            PathEl::CurveTo(p1, p2, p) => {
                d.push_str("C ");
                push_point(&mut d, p1, precision);
                d.push(' ');
                push_point(&mut d, p2, precision);
                d.push(' ');
                push_point(&mut d, p, precision);
            }
            PathEl::ClosePath => d.push('Z'),
        }
    }
    d
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scalar() {
        assert_eq!(fmt_scalar(1.0, 3), "1");
        assert_eq!(fmt_scalar(1.25, 3), "1.25");
        assert_eq!(fmt_scalar(-0.0001, 3), "0");
        assert_eq!(fmt_scalar(2.0004, 3), "2");
        assert_eq!(fmt_scalar(-12.4, 0), "-12");
    }

    #[test]
    fn flipped_path() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 5.0));
        path.quad_to((1.0, 2.0), (3.0, 4.0));
        path.close_path();
        assert_eq!(path_to_d(&path, 3), "M 0 0 L 10 -5 Q 1 -2 3 -4 Z");
    }

    #[test]
    fn document() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 20.0));
        path.close_path();

        let mut drawing = Drawing::new();
        drawing.add("text", path).add("nothing", BezPath::new());
        assert_eq!(drawing.layers().len(), 1);

        let svg = drawing.to_svg(&Presentation::default(), &MarkupOptions::default());
        assert!(svg.contains("<svg"));
        assert!(svg.contains(r#"viewBox="-1 -21 12 22""#));
        assert!(svg.contains(r##"stroke="#000""##));
        assert!(svg.contains(r#"fill="none""#));
        assert!(svg.contains(r#"id="text""#));
        assert!(svg.contains(r#"d="M 0 0 L 10 0 L 10 -20 Z""#));
    }

    #[test]
    fn empty_document() {
        let svg = Drawing::new().to_svg(&Presentation::default(), &MarkupOptions::default());
        assert!(svg.contains(r#"viewBox="0 0 0 0""#));
        assert!(!svg.contains("<path"));
    }
}
