// Render pipeline, end to end with a real font

use keychain_text::fonts::ParsedFont;
use keychain_text::render::{KeychainConfig, RenderPipeline};
use keychain_text::RenderParameters;
use svg::node::element::tag;
use svg::parser::Event;

const MONO: &[u8] = include_bytes!("data/DejaVuSansMono.ttf");

fn params(text: &str, size: f64) -> RenderParameters {
    RenderParameters {
        text: text.to_string(),
        size,
        ..Default::default()
    }
}

/// The viewBox and the ids of all paths
fn inspect(doc: &str) -> (Vec<f64>, Vec<String>) {
    let mut view_box = vec![];
    let mut ids = vec![];
    for event in svg::read(doc).unwrap() {
        if let Event::Tag(name, _, attributes) = event {
            if name == tag::SVG {
                if let Some(value) = attributes.get("viewBox") {
                    view_box = value
                        .split_whitespace()
                        .map(|s| s.parse().unwrap())
                        .collect();
                }
            } else if name == tag::Path {
                ids.push(attributes.get("id").unwrap().to_string());
            }
        }
    }
    (view_box, ids)
}

#[test]
fn outline_view_box() {
    let font = ParsedFont::parse(MONO.to_vec()).unwrap();
    let out = RenderPipeline::default()
        .render(&font, &params("HI", 50.0))
        .unwrap();

    let (view_box, ids) = inspect(&out.outline);
    assert_eq!(ids, ["text"]);
    assert_eq!(view_box.len(), 4);
    let (x, y, w, h) = (view_box[0], view_box[1], view_box[2], view_box[3]);
    // glyphs start near the origin; capitals rise above the baseline (y up,
    // flipped in the document)
    assert!(x > -2.0 && x < 10.0);
    assert!(y < -30.0);
    assert!(w > 30.0 && w < 70.0);
    assert!(h > 30.0 && h < 52.0);
}

#[test]
fn keychain_layers() {
    let font = ParsedFont::parse(MONO.to_vec()).unwrap();
    let out = RenderPipeline::default()
        .render(&font, &params("Key", 100.0))
        .unwrap();

    let (view_box, ids) = inspect(&out.keychain);
    // the ring's outer edge is part of the silhouette; no separate circle
    assert_eq!(ids, ["text", "outline"]);
    // ring centre (-40, 50) radius 25, with margin 1
    assert!(view_box[0] <= -66.0 + 1e-6);
    assert!(view_box[1] <= -76.0 + 1e-6);
}

#[test]
fn hole_radius_configurable() {
    let font = ParsedFont::parse(MONO.to_vec()).unwrap();
    let narrow = RenderPipeline::default()
        .render(&font, &params("A", 60.0))
        .unwrap();
    let wide = RenderPipeline::new(KeychainConfig {
        hole_radius: 12.0,
        ..Default::default()
    })
    .render(&font, &params("A", 60.0))
    .unwrap();
    // outlines are unaffected; the keychain silhouette differs
    assert_eq!(narrow.outline, wide.outline);
    assert_ne!(narrow.keychain, wide.keychain);
}

#[test]
fn missing_glyphs_render() {
    let font = ParsedFont::parse(MONO.to_vec()).unwrap();
    // not covered by the font: drawn with the missing-glyph outline
    let out = RenderPipeline::default()
        .render(&font, &params("\u{4e2d}", 40.0))
        .unwrap();
    assert!(out.outline.contains("<path"));
}
