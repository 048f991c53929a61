// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Keychain text: glyph outlines and keychain shapes from web fonts
//!
//! Text in a chosen font is converted to glyph outlines and to a keychain
//! shape (the outlines surrounded by an offset silhouette, with a ring and
//! mounting hole), both exported as SVG.
//!
//! The pieces, leaf to root:
//!
//! -   [`debounce`]: collapse bursts of events into one trailing action
//! -   [`query`]: persist form fields in the page query string
//! -   [`fonts`]: the font catalog, font parsing and font source resolution
//! -   [`outline`], [`geometry`] and [`markup`]: outlines, constructive
//!     geometry and SVG export
//! -   [`render`]: the render pipeline
//! -   [`form`]: form state and its update function
//! -   [`app`]: the application context, driven by a [`app::Host`]
//!
//! The `web` feature adds a browser binding over these.

#![cfg_attr(doc_cfg, feature(doc_cfg))]

mod conv;
pub use conv::DPU;

mod data;
pub use data::*;

pub mod app;
pub mod config;
pub mod debounce;
pub mod fonts;
pub mod form;
pub mod geometry;
pub mod markup;
pub mod outline;
pub mod query;
pub mod render;

pub(crate) mod shaper;
pub use shaper::{Glyph, GlyphRun};

#[cfg(feature = "web")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "web")))]
pub mod web;
