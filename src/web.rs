// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Browser binding
//!
//! Binds an [`App`] to a page holding the form elements by id, fetches
//! fonts with `window.fetch`, reads uploads with `Blob.arrayBuffer()` and
//! persists the form with `history.replaceState`.

use crate::app::{App, Host, RenderJob};
use crate::config::AppConfig;
use crate::fonts::{FetchError, FontCatalog, FontFetcher};
use crate::form::{FormEvent, FormState};
use crate::query::{self, QueryFields};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, HtmlTextAreaElement, Response, Window,
};

type WebApp = App<DomHost, WebFetcher>;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn report(context: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::error!("{context}: {err:?}");
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| js_error("no global window"))
}

/// Time since the epoch, on the page clock
fn now() -> Duration {
    Duration::from_secs_f64(js_sys::Date::now().max(0.0) / 1000.0)
}

fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| js_error(format!("missing element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| js_error(format!("element #{id} has unexpected type")))
}

/// The page elements
struct Elements {
    family: HtmlSelectElement,
    variant: HtmlSelectElement,
    filled: HtmlInputElement,
    text: HtmlInputElement,
    size: HtmlInputElement,
    fill: HtmlInputElement,
    stroke: HtmlInputElement,
    stroke_width: HtmlInputElement,
    upload: HtmlInputElement,
    upload_remove: HtmlElement,
    outline_preview: Element,
    outline_output: HtmlTextAreaElement,
    keychain_preview: Element,
    keychain_output: HtmlTextAreaElement,
}

impl Elements {
    fn find(document: &Document) -> Result<Self, JsValue> {
        Ok(Elements {
            family: element(document, "font-select")?,
            variant: element(document, "font-variant")?,
            filled: element(document, "input-filled")?,
            text: element(document, "input-text")?,
            size: element(document, "input-size")?,
            fill: element(document, "input-fill")?,
            stroke: element(document, "input-stroke")?,
            stroke_width: element(document, "input-stroke-width")?,
            upload: element(document, "font-upload")?,
            upload_remove: element(document, "font-upload-remove")?,
            outline_preview: element(document, "svg-render")?,
            outline_output: element(document, "output-svg")?,
            keychain_preview: element(document, "svg-render-outline")?,
            keychain_output: element(document, "outline-svg")?,
        })
    }
}

fn set_options<'a>(
    select: &HtmlSelectElement,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), JsValue> {
    select.set_length(0);
    for name in names {
        let option = HtmlOptionElement::new_with_text_and_value(name, name)?;
        select.append_child(&option)?;
    }
    Ok(())
}

fn index_to_js(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(-1)
}

/// Page output
struct DomHost {
    window: Window,
    elements: Rc<Elements>,
}

impl DomHost {
    fn write_query(&self, fields: &QueryFields) -> Result<(), JsValue> {
        let href = self.window.location().href()?;
        let url = Url::parse(&href).map_err(js_error)?;
        let url = query::replace_query(&url, fields);
        self.window
            .history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(url.as_str()))
    }

    fn write_form(&self, form: &FormState) -> Result<(), JsValue> {
        let e = &self.elements;
        e.family.set_selected_index(index_to_js(form.family()));
        set_options(&e.variant, form.variants().iter().map(|s| s.as_str()))?;
        e.variant.set_selected_index(index_to_js(form.variant()));
        e.filled.set_checked(form.filled());
        e.text.set_value(form.text());
        e.size.set_value(form.size());
        e.fill.set_value(form.fill());
        e.stroke.set_value(form.stroke());
        e.stroke_width.set_value(form.stroke_width());
        Ok(())
    }
}

impl Host for DomHost {
    fn show_catalog(&mut self, catalog: &FontCatalog) {
        let names = catalog.iter().map(|entry| entry.family.as_str());
        report("show_catalog", set_options(&self.elements.family, names));
    }

    fn show_form(&mut self, form: &FormState) {
        report("show_form", self.write_form(form));
    }

    fn show_outline(&mut self, svg: &str) {
        self.elements.outline_preview.set_inner_html(svg);
        self.elements.outline_output.set_value(svg);
    }

    fn show_keychain(&mut self, svg: &str) {
        self.elements.keychain_preview.set_inner_html(svg);
        self.elements.keychain_output.set_value(svg);
    }

    fn replace_query(&mut self, fields: &QueryFields) {
        report("replace_query", self.write_query(fields));
    }
}

async fn fetch_response(url: &str) -> Result<Response, JsValue> {
    let response: Response = JsFuture::from(window()?.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(js_error(format!("HTTP {} for {url}", response.status())));
    }
    Ok(response)
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, JsValue> {
    let response = fetch_response(url).await?;
    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let response = fetch_response(url).await?;
    JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| js_error("response is not text"))
}

/// Fetches fonts with `window.fetch`
struct WebFetcher;

impl FontFetcher for WebFetcher {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<Vec<u8>, FetchError>> {
        let url = url.to_string();
        async move {
            fetch_bytes(&url)
                .await
                .map_err(|err| FetchError(format!("{err:?}")))
        }
        .boxed_local()
    }
}

/// Drive a render job to completion on the event loop
fn drive(app: &Rc<RefCell<WebApp>>, job: Option<RenderJob>) {
    if let Some(job) = job {
        let app = app.clone();
        spawn_local(async move {
            let finished = job.run().await;
            app.borrow_mut().complete(finished);
        });
    }
}

fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Bind a form element so that `kind` events produce a [`FormEvent`]
fn bind_field(
    app: &Rc<RefCell<WebApp>>,
    target: &EventTarget,
    kind: &str,
    mut event: impl FnMut() -> Option<FormEvent> + 'static,
) -> Result<(), JsValue> {
    let app = app.clone();
    listen(target, kind, move |_| {
        if let Some(event) = event() {
            let job = app.borrow_mut().handle(event, now());
            drive(&app, job);
        }
    })
}

/// Schedules the debounced render with a single live timeout
struct DebounceTimer {
    window: Window,
    handle: Cell<Option<i32>>,
}

impl DebounceTimer {
    fn schedule(timer: &Rc<Self>, app: &Rc<RefCell<WebApp>>) -> Result<(), JsValue> {
        let Some(deadline) = app.borrow().debounce_deadline() else {
            return Ok(());
        };
        if let Some(handle) = timer.handle.take() {
            timer.window.clear_timeout_with_handle(handle);
        }

        let wait = deadline.saturating_sub(now()).as_millis();
        let wait = i32::try_from(wait).unwrap_or(i32::MAX);
        let fired = timer.clone();
        let app = app.clone();
        let callback = Closure::once_into_js(move || {
            fired.handle.set(None);
            let job = app.borrow_mut().poll(now().max(deadline));
            drive(&app, job);
        });
        let handle = timer
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                wait,
            )?;
        timer.handle.set(Some(handle));
        Ok(())
    }
}

fn bind(
    app: &Rc<RefCell<WebApp>>,
    window: &Window,
    document: &Document,
    e: &Rc<Elements>,
) -> Result<(), JsValue> {
    {
        let select = e.family.clone();
        bind_field(app, &e.family, "change", move || {
            let index = usize::try_from(select.selected_index()).ok()?;
            Some(FormEvent::FamilySelected(index))
        })?;
        let select = e.variant.clone();
        bind_field(app, &e.variant, "change", move || {
            let index = usize::try_from(select.selected_index()).ok()?;
            Some(FormEvent::VariantSelected(index))
        })?;
        let input = e.filled.clone();
        bind_field(app, &e.filled, "change", move || {
            Some(FormEvent::FilledToggled(input.checked()))
        })?;
    }

    let text_fields: [(&HtmlInputElement, fn(String) -> FormEvent); 5] = [
        (&e.text, FormEvent::Text),
        (&e.size, FormEvent::Size),
        (&e.fill, FormEvent::Fill),
        (&e.stroke, FormEvent::Stroke),
        (&e.stroke_width, FormEvent::StrokeWidth),
    ];
    for (input, make) in text_fields {
        let field = input.clone();
        bind_field(app, input, "input", move || Some(make(field.value())))?;
    }

    {
        let timer = Rc::new(DebounceTimer {
            window: window.clone(),
            handle: Cell::new(None),
        });
        let app = app.clone();
        let e = e.clone();
        listen(document, "coloris:pick", move |_| {
            let event = FormEvent::ColorPicked {
                fill: e.fill.value(),
                stroke: e.stroke.value(),
            };
            let job = app.borrow_mut().handle(event, now());
            drive(&app, job);
            report("coloris:pick", DebounceTimer::schedule(&timer, &app));
        })?;
    }

    {
        let app = app.clone();
        let upload = e.upload.clone();
        listen(&e.upload, "change", move |_| {
            let file = upload.files().and_then(|files| files.get(0));
            let app = app.clone();
            match file {
                None => {
                    let job = app.borrow_mut().upload_font(None);
                    drive(&app, job);
                }
                Some(file) => {
                    let ticket = app.borrow_mut().begin_upload();
                    spawn_local(async move {
                        let read = JsFuture::from(file.array_buffer())
                            .await
                            .map(|buffer| js_sys::Uint8Array::new(&buffer).to_vec())
                            .map_err(|err| format!("{}: {err:?}", file.name()));
                        let job = app.borrow_mut().finish_upload(ticket, read);
                        drive(&app, job);
                    });
                }
            }
        })?;
    }

    {
        let app = app.clone();
        let upload = e.upload.clone();
        listen(&e.upload_remove, "click", move |_| {
            upload.set_value("");
            let job = app.borrow_mut().remove_upload();
            drive(&app, job);
        })?;
    }

    Ok(())
}

/// Start the application on the current page
///
/// `config` is an [`AppConfig`] as JSON; pass an empty string for the
/// defaults. Fails if the page lacks an expected element or the font catalog
/// cannot be loaded.
#[wasm_bindgen]
pub async fn run(config: String) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::debug!("run: logger already initialised");
    }

    let config = AppConfig::from_json(&config).map_err(js_error)?;
    let window = window()?;
    let document = window
        .document()
        .ok_or_else(|| js_error("no document on window"))?;
    let elements = Rc::new(Elements::find(&document)?);

    let request = config.catalog_request().map_err(js_error)?;
    let catalog = match fetch_text(request.as_str()).await {
        Ok(text) => FontCatalog::from_json(&text).map_err(js_error)?,
        Err(err) => {
            log::error!("run: catalog fetch failed: {err:?}");
            return Err(err);
        }
    };

    let query = window.location().search()?;
    let host = DomHost {
        window: window.clone(),
        elements: elements.clone(),
    };
    let (app, job) =
        App::start(&config, catalog, &query, host, WebFetcher).map_err(|err| {
            log::error!("run: {err}");
            js_error(err)
        })?;

    let app = Rc::new(RefCell::new(app));
    bind(&app, &window, &document, &elements)?;
    drive(&app, job);
    Ok(())
}
