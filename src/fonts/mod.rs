// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font catalog, loading and source resolution
//!
//! Fonts come from one of two places: the remote [`FontCatalog`], from which
//! a family and variant select a file to fetch, or a file uploaded by the
//! user. The [`FontSourceResolver`] decides which applies to each render and
//! yields a [`ParsedFont`] either way.
//!
//! ### Units
//!
//! Digital font files have an internally defined unit known as the *font
//! unit*; the `head` table states how many font units make up one *Em*.
//! Text size here is given in drawing units per Em (the units of the
//! exported markup), thus the scale [`crate::DPU`] is
//! `size / units_per_em` drawing units per font unit.

mod catalog;
mod face;
mod resolver;

pub use catalog::{
    strip_insecure_scheme, CatalogError, FontCatalog, FontCatalogEntry, ResolveError, CATALOG_URL,
};
pub use face::{FontError, ParsedFont, ScaledFace};
pub use resolver::*;
