// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font source resolver
//!
//! The glyph source of a render is either a font uploaded by the user (held
//! in memory, already parsed) or a remote font identified by family and
//! variant, which is fetched and parsed on demand. Remote fonts are not
//! cached: each render needing one fetches and parses it again.
//!
//! Each resolution is tagged with a generation number. Loads may complete in
//! any order; only a completion whose generation is the latest issued should
//! be applied (see [`FontSourceResolver::is_current`]).

use super::{FontCatalog, FontError, ParsedFont, ResolveError};
use futures::future::LocalBoxFuture;
use log::{debug, info};
use thiserror::Error;

/// Failure to fetch a font file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("fetch failed: {0}")]
pub struct FetchError(pub String);

/// Failure to load a remote font
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Font(#[from] FontError),
}

/// Fetches font files
///
/// Fetching is asynchronous; the returned future is polled on the (single
/// threaded) event loop.
pub trait FontFetcher {
    /// Fetch the whole file at `url`
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<Vec<u8>, FetchError>>;
}

/// The active glyph source
#[derive(Clone, Debug)]
pub enum ActiveFontSource {
    /// A catalog font, by family and variant index
    Remote { family: usize, variant: usize },
    /// A font uploaded by the user
    Uploaded(ParsedFont),
}

/// Result of [`FontSourceResolver::resolve`]
pub enum Resolution {
    /// The font is available now
    Ready(ParsedFont),
    /// The font must be fetched
    Pending(PendingFont),
}

/// A font being fetched
pub struct PendingFont {
    generation: u64,
    url: String,
    fetch: LocalBoxFuture<'static, Result<Vec<u8>, FetchError>>,
}

impl std::fmt::Debug for PendingFont {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("PendingFont")
            .field("generation", &self.generation)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl PendingFont {
    /// Generation of this request
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Normalised URL being fetched
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse
    pub async fn load(self) -> LoadedFont {
        let result = match self.fetch.await {
            Ok(data) => ParsedFont::parse(data).map_err(LoadError::from),
            Err(err) => Err(err.into()),
        };
        LoadedFont {
            generation: self.generation,
            url: self.url,
            result,
        }
    }
}

/// Outcome of [`PendingFont::load`]
#[derive(Debug)]
pub struct LoadedFont {
    pub generation: u64,
    pub url: String,
    pub result: Result<ParsedFont, LoadError>,
}

/// Tracks the uploaded font and resolves glyph sources
#[derive(Debug, Default)]
pub struct FontSourceResolver {
    uploaded: Option<ParsedFont>,
    generation: u64,
}

impl FontSourceResolver {
    /// Construct, with no upload
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and store an uploaded font file
    ///
    /// On failure, the previous source remains active.
    pub fn upload(&mut self, data: Vec<u8>) -> Result<&ParsedFont, FontError> {
        let font = ParsedFont::parse(data)?;
        info!(
            "FontSourceResolver: using uploaded font {:?}",
            font.family_name().unwrap_or("<unnamed>")
        );
        Ok(self.uploaded.insert(font))
    }

    /// Forget the uploaded font, reverting to the remote source
    pub fn clear_upload(&mut self) {
        if self.uploaded.take().is_some() {
            info!("FontSourceResolver: upload cleared");
        }
    }

    /// True if an uploaded font is held
    #[inline]
    pub fn has_upload(&self) -> bool {
        self.uploaded.is_some()
    }

    /// The active source, given the currently selected family and variant
    ///
    /// An uploaded font takes precedence over the selection.
    pub fn active(&self, family: usize, variant: usize) -> ActiveFontSource {
        match &self.uploaded {
            Some(font) => ActiveFontSource::Uploaded(font.clone()),
            None => ActiveFontSource::Remote { family, variant },
        }
    }

    /// The latest generation issued
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True if `generation` is the latest issued
    #[inline]
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Resolve a source
    ///
    /// Issues a new generation. Uploaded fonts resolve immediately; remote
    /// fonts yield a [`PendingFont`] which must be driven to completion.
    pub fn resolve<F: FontFetcher + ?Sized>(
        &mut self,
        catalog: &FontCatalog,
        source: ActiveFontSource,
        fetcher: &F,
    ) -> Result<Resolution, ResolveError> {
        self.generation += 1;
        match source {
            ActiveFontSource::Uploaded(font) => Ok(Resolution::Ready(font)),
            ActiveFontSource::Remote { family, variant } => {
                let url = catalog.file_url(family, variant)?;
                debug!("resolve: generation {} fetches {url}", self.generation);
                let fetch = fetcher.fetch(&url);
                Ok(Resolution::Pending(PendingFont {
                    generation: self.generation,
                    url,
                    fetch,
                }))
            }
        }
    }
}
