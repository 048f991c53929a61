// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Application context
//!
//! [`App`] ties together the catalog, the form, the font source resolver
//! and the render pipeline. It does no I/O itself: output goes to a
//! [`Host`], fonts are fetched by a [`FontFetcher`], and remote renders are
//! returned to the caller as [`RenderJob`]s to be driven on the event loop
//! and handed back through [`App::complete`].

use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::fonts::{
    CatalogError, FontCatalog, FontError, FontFetcher, FontSourceResolver, LoadError, LoadedFont,
    ParsedFont, PendingFont, Resolution, ResolveError,
};
use crate::form::{Action, FormEvent, FormState};
use crate::query::{self, QueryFields};
use crate::render::{RenderError, RenderPipeline};
use crate::RenderParameters;
use log::{debug, error, info, warn};
use std::time::Duration;
use thiserror::Error;

/// Application errors
///
/// Only [`Error::Catalog`] is fatal; the others abort a single render.
#[derive(Error, Debug)]
pub enum Error {
    #[error("font catalog unavailable")]
    Catalog(#[from] CatalogError),
    #[error("font selection invalid")]
    Resolve(#[from] ResolveError),
    #[error("failed to load font from {url}")]
    Load {
        url: String,
        #[source]
        source: LoadError,
    },
    #[error("uploaded font invalid")]
    Upload(#[from] FontError),
    #[error("failed to read uploaded file: {0}")]
    UploadRead(String),
    #[error("render failed")]
    Render(#[from] RenderError),
}

/// The user interface surface
pub trait Host {
    /// Display the list of families
    fn show_catalog(&mut self, catalog: &FontCatalog) {
        let _ = catalog;
    }

    /// Display the form's state
    ///
    /// Called at startup and whenever the variant list is replaced.
    fn show_form(&mut self, form: &FormState) {
        let _ = form;
    }

    /// Display the glyph-outline markup
    fn show_outline(&mut self, svg: &str);

    /// Display the keychain markup
    fn show_keychain(&mut self, svg: &str);

    /// Persist the form into the page query string
    fn replace_query(&mut self, fields: &QueryFields);

    /// A render was aborted
    ///
    /// The previous output remains displayed.
    fn render_failed(&mut self, error: &Error) {
        let _ = error;
    }
}

/// A render waiting on a remote font
#[derive(Debug)]
pub struct RenderJob {
    pending: PendingFont,
    params: RenderParameters,
}

impl RenderJob {
    /// Generation of the font request
    #[inline]
    pub fn generation(&self) -> u64 {
        self.pending.generation()
    }

    /// URL of the font being fetched
    #[inline]
    pub fn url(&self) -> &str {
        self.pending.url()
    }

    /// Parameters captured when the render was requested
    #[inline]
    pub fn params(&self) -> &RenderParameters {
        &self.params
    }

    /// Fetch and parse the font
    pub async fn run(self) -> FinishedJob {
        FinishedJob {
            loaded: self.pending.load().await,
            params: self.params,
        }
    }
}

/// A [`RenderJob`] whose font load has completed
#[derive(Debug)]
pub struct FinishedJob {
    pub loaded: LoadedFont,
    pub params: RenderParameters,
}

/// A file read started by [`App::begin_upload`]
///
/// Only the latest ticket is honoured: choosing another file, cancelling or
/// removing the upload invalidates reads still in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadTicket(u64);

/// The application
pub struct App<H: Host, F: FontFetcher> {
    catalog: FontCatalog,
    form: FormState,
    resolver: FontSourceResolver,
    pipeline: RenderPipeline,
    debouncer: Debouncer<()>,
    uploads: u64,
    host: H,
    fetcher: F,
}

impl<H: Host, F: FontFetcher> App<H, F> {
    /// Start the application
    ///
    /// Populates the form from `catalog`, applies any values decoded from
    /// `query` and requests the initial render. If that render needs a
    /// remote font, the job is returned.
    ///
    /// Fails if the catalog lists no family.
    pub fn start(
        config: &AppConfig,
        catalog: FontCatalog,
        query: &str,
        mut host: H,
        fetcher: F,
    ) -> Result<(Self, Option<RenderJob>), Error> {
        if catalog.is_empty() {
            return Err(CatalogError::Empty.into());
        }

        let mut form = FormState::new(&catalog, &config.defaults);
        host.show_catalog(&catalog);

        let fields = query::decode(query);
        if !fields.is_empty() {
            info!("App::start: applying {} fields from query", fields.len());
            form.apply_query(&catalog, &fields);
        }
        host.show_form(&form);

        let mut app = App {
            catalog,
            form,
            resolver: FontSourceResolver::new(),
            pipeline: RenderPipeline::new(config.keychain.clone()),
            debouncer: Debouncer::new(config.debounce_wait()),
            uploads: 0,
            host,
            fetcher,
        };
        let job = app.render_current();
        Ok((app, job))
    }

    /// Handle a form event at time `now`
    pub fn handle(&mut self, event: FormEvent, now: Duration) -> Option<RenderJob> {
        let replaces_variants = matches!(event, FormEvent::FamilySelected(_));
        let action = self.form.update(&self.catalog, event);
        if action.is_none() {
            return None;
        }
        if replaces_variants {
            self.host.show_form(&self.form);
        }

        self.sync_query();
        match action {
            Action::None => None,
            Action::Debounce => {
                self.debouncer.trigger(now, ());
                None
            }
            Action::Render => self.render_current(),
        }
    }

    /// When [`App::poll`] should next be called, if at all
    #[inline]
    pub fn debounce_deadline(&self) -> Option<Duration> {
        self.debouncer.deadline()
    }

    /// Fire the debounced render if due
    pub fn poll(&mut self, now: Duration) -> Option<RenderJob> {
        self.debouncer.poll(now)?;
        self.render_current()
    }

    /// A file was chosen (`Some`) or the choice was cancelled (`None`)
    ///
    /// A file which fails to parse is reported and the previous source
    /// remains active; cancelling reverts to the selected remote font.
    pub fn upload_font(&mut self, data: Option<Vec<u8>>) -> Option<RenderJob> {
        self.uploads += 1;
        match data {
            Some(data) => {
                let uploaded = self.resolver.upload(data).map(|_| ());
                if let Err(err) = uploaded {
                    self.fail(err.into());
                    return None;
                }
            }
            None => self.resolver.clear_upload(),
        }
        self.render_current()
    }

    /// A file was chosen and is being read
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.uploads += 1;
        UploadTicket(self.uploads)
    }

    /// The read started by [`App::begin_upload`] finished
    ///
    /// A superseded read is discarded. A failed read is reported and the
    /// previous source remains active.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        read: Result<Vec<u8>, String>,
    ) -> Option<RenderJob> {
        if ticket.0 != self.uploads {
            warn!("App::finish_upload: discarding superseded read {}", ticket.0);
            return None;
        }
        match read {
            Ok(data) => self.upload_font(Some(data)),
            Err(reason) => {
                self.fail(Error::UploadRead(reason));
                None
            }
        }
    }

    /// Discard the uploaded font, reverting to the selected remote font
    pub fn remove_upload(&mut self) -> Option<RenderJob> {
        self.uploads += 1;
        self.resolver.clear_upload();
        self.render_current()
    }

    /// Render the current form state
    ///
    /// With an uploaded font this completes immediately.
    pub fn render_current(&mut self) -> Option<RenderJob> {
        let params = self.form.render_parameters();
        let source = self.resolver.active(self.form.family(), self.form.variant());
        debug!(
            "App::render_current: {:?} size {} from {:?}/{:?}",
            params.text,
            params.size,
            self.form.family_name(),
            self.form.variant_name()
        );
        match self.resolver.resolve(&self.catalog, source, &self.fetcher) {
            Ok(Resolution::Ready(font)) => {
                self.present(&font, &params);
                None
            }
            Ok(Resolution::Pending(pending)) => Some(RenderJob { pending, params }),
            Err(err) => {
                self.fail(err.into());
                None
            }
        }
    }

    /// Apply the result of a [`RenderJob`]
    ///
    /// Results of superseded requests are discarded.
    pub fn complete(&mut self, job: FinishedJob) {
        let FinishedJob { loaded, params } = job;
        if !self.resolver.is_current(loaded.generation) {
            warn!(
                "App::complete: discarding stale result of generation {} (latest {})",
                loaded.generation,
                self.resolver.generation()
            );
            return;
        }
        match loaded.result {
            Ok(font) => self.present(&font, &params),
            Err(source) => self.fail(Error::Load {
                url: loaded.url,
                source,
            }),
        }
    }

    fn present(&mut self, font: &ParsedFont, params: &RenderParameters) {
        match self.pipeline.render(font, params) {
            Ok(output) => {
                self.host.show_outline(&output.outline);
                self.host.show_keychain(&output.keychain);
            }
            Err(err) => self.fail(err.into()),
        }
    }

    fn fail(&mut self, err: Error) {
        error!("{err}: {:?}", std::error::Error::source(&err));
        self.host.render_failed(&err);
    }

    /// Write the form into the query string
    pub fn sync_query(&mut self) {
        let fields = self.form.to_query();
        debug!("App::sync_query: {} fields", fields.len());
        self.host.replace_query(&fields);
    }

    #[inline]
    pub fn catalog(&self) -> &FontCatalog {
        &self.catalog
    }

    #[inline]
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// True if an uploaded font is active
    #[inline]
    pub fn has_upload(&self) -> bool {
        self.resolver.has_upload()
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fonts::{FetchError, FontCatalogEntry};
    use futures::future::LocalBoxFuture;
    use futures::FutureExt;

    struct NoFetch;

    impl FontFetcher for NoFetch {
        fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<Vec<u8>, FetchError>> {
            let err = FetchError(format!("offline: {url}"));
            async move { Err(err) }.boxed_local()
        }
    }

    #[derive(Default)]
    struct Sink {
        queries: usize,
        failures: usize,
    }

    impl Host for Sink {
        fn show_outline(&mut self, _: &str) {}
        fn show_keychain(&mut self, _: &str) {}
        fn replace_query(&mut self, _: &QueryFields) {
            self.queries += 1;
        }
        fn render_failed(&mut self, _: &Error) {
            self.failures += 1;
        }
    }

    #[test]
    fn empty_catalog_is_fatal() {
        let result = App::start(
            &AppConfig::default(),
            FontCatalog::default(),
            "",
            Sink::default(),
            NoFetch,
        );
        assert!(matches!(result, Err(Error::Catalog(CatalogError::Empty))));
    }

    #[test]
    fn debounced_colour_pick() {
        let catalog = FontCatalog::new(vec![FontCatalogEntry::new(
            "Roboto",
            [("regular", "http://x/a.ttf")],
        )]);
        let (mut app, job) =
            App::start(&AppConfig::default(), catalog, "", Sink::default(), NoFetch).unwrap();
        assert!(job.is_some());
        assert_eq!(app.host().queries, 0);

        let ms = Duration::from_millis;
        let pick = |fill: &str| FormEvent::ColorPicked {
            fill: fill.to_string(),
            stroke: "#000000".to_string(),
        };
        assert!(app.handle(pick("#100000"), ms(0)).is_none());
        assert!(app.handle(pick("#200000"), ms(50)).is_none());
        assert!(app.handle(pick("#300000"), ms(100)).is_none());
        assert_eq!(app.debounce_deadline(), Some(ms(300)));
        assert!(app.poll(ms(299)).is_none());

        let job = app.poll(ms(300)).unwrap();
        assert_eq!(job.params().fill, "#300000");
        assert!(app.poll(ms(400)).is_none());
        assert_eq!(app.host().queries, 3);
    }

    #[test]
    fn upload_read_superseded() {
        let catalog = FontCatalog::new(vec![FontCatalogEntry::new(
            "Roboto",
            [("regular", "http://x/a.ttf")],
        )]);
        let (mut app, _) =
            App::start(&AppConfig::default(), catalog, "", Sink::default(), NoFetch).unwrap();

        let first = app.begin_upload();
        let second = app.begin_upload();
        assert!(app.finish_upload(first, Err("aborted".into())).is_none());
        assert_eq!(app.host().failures, 0);

        assert!(app.remove_upload().is_some());
        assert!(app.finish_upload(second, Ok(vec![0; 16])).is_none());
        assert_eq!(app.host().failures, 0);
        assert!(!app.has_upload());
    }

    #[test]
    fn fetch_failure_reported() {
        let catalog = FontCatalog::new(vec![FontCatalogEntry::new(
            "Roboto",
            [("regular", "http://x/a.ttf")],
        )]);
        let (mut app, job) =
            App::start(&AppConfig::default(), catalog, "", Sink::default(), NoFetch).unwrap();
        let finished = futures::executor::block_on(job.unwrap().run());
        app.complete(finished);
        assert_eq!(app.host().failures, 1);
    }
}
