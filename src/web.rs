//! Browser host backed by `web-sys`, plus the module entry point.

use wasm_bindgen::prelude::*;
use web_sys::{window, AddEventListenerOptions, Document, Element, HtmlMediaElement};

use crate::binder::{bind_page, BindReport};
use crate::bootstrap::on_document_ready;
use crate::config::{PlayerConfig, CONFIG_ELEMENT_ID};
use crate::diagnostics::init_logging;
use crate::error::HostError;
use crate::host::{
    Handler, MediaEvent, Page, PlayableElement, ReadySource, ReadyState, ToggleControl,
};

/// Marks controls and elements whose listeners are attached.
const BOUND_ATTR: &str = "data-playpause-bound";

fn is_marked(element: &Element) -> bool {
    element.has_attribute(BOUND_ATTR)
}

fn mark(element: &Element) {
    if let Err(err) = element.set_attribute(BOUND_ATTR, "") {
        log::warn!("could not mark element as bound: {err:?}");
    }
}

/// Log a rejected play request (autoplay policy, missing source).
fn watch_play(promise: js_sys::Promise) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
            log::warn!("play request rejected: {err:?}");
        }
    });
}

fn listener_error(event: &str, err: JsValue) -> HostError {
    HostError::Listener {
        event: event.to_string(),
        reason: format!("{err:?}"),
    }
}

fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    mut handler: Handler,
) -> Result<(), HostError> {
    let callback = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(|err| listener_error(event, err))?;
    // Bound for the lifetime of the page.
    callback.forget();
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebControl(pub Element);

impl ToggleControl for WebControl {
    fn describe(&self) -> String {
        let tag = self.0.tag_name().to_ascii_lowercase();
        let id = self.0.id();
        if id.is_empty() {
            tag
        } else {
            format!("{tag}#{id}")
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn set_class(&self, class: &str, present: bool) {
        if let Err(err) = self.0.class_list().toggle_with_force(class, present) {
            log::warn!("{}: could not update class `{class}`: {err:?}", self.describe());
        }
    }

    fn on_activate(&self, handler: Handler) -> Result<(), HostError> {
        listen(&self.0, "click", handler)
    }

    fn is_bound(&self) -> bool {
        is_marked(&self.0)
    }

    fn mark_bound(&self) {
        mark(&self.0);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebMedia(pub HtmlMediaElement);

impl PlayableElement for WebMedia {
    fn is_paused(&self) -> bool {
        self.0.paused()
    }

    fn is_ended(&self) -> bool {
        self.0.ended()
    }

    fn play(&self) {
        match self.0.play() {
            Ok(promise) => watch_play(promise),
            Err(err) => log::warn!("play failed: {err:?}"),
        }
    }

    fn pause(&self) {
        if let Err(err) = self.0.pause() {
            log::warn!("pause failed: {err:?}");
        }
    }

    fn on_event(&self, event: MediaEvent, handler: Handler) -> Result<(), HostError> {
        listen(&self.0, event.as_str(), handler)
    }

    fn is_bound(&self) -> bool {
        is_marked(&self.0)
    }

    fn mark_bound(&self) {
        mark(&self.0);
    }
}

#[derive(Debug, Clone)]
pub struct WebPage {
    document: Document,
}

impl WebPage {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn current() -> Result<Self, HostError> {
        window()
            .and_then(|w| w.document())
            .map(Self::new)
            .ok_or(HostError::NoDocument)
    }

    /// Read the optional JSON config element, falling back to defaults.
    pub fn config(&self) -> PlayerConfig {
        let Some(raw) = self
            .document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return PlayerConfig::default();
        };
        PlayerConfig::from_json(&raw).unwrap_or_else(|err| {
            log::warn!("#{CONFIG_ELEMENT_ID} ignored: {err}");
            PlayerConfig::default()
        })
    }
}

impl Page for WebPage {
    type Control = WebControl;
    type Media = WebMedia;

    fn control_by_id(&self, id: &str) -> Option<WebControl> {
        self.document.get_element_by_id(id).map(WebControl)
    }

    fn playable_elements(&self, selector: &str) -> Result<Vec<WebMedia>, HostError> {
        let nodes = self
            .document
            .query_selector_all(selector)
            .map_err(|err| HostError::Selector {
                selector: selector.to_string(),
                reason: format!("{err:?}"),
            })?;
        Ok((0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlMediaElement>().ok())
            .map(WebMedia)
            .collect())
    }

    fn preceding_control(&self, media: &WebMedia, offset: usize) -> Option<WebControl> {
        let mut node: web_sys::Node = media.0.clone().into();
        for _ in 0..offset {
            node = node.previous_sibling()?;
        }
        node.dyn_into::<Element>().ok().map(WebControl)
    }

    fn following_media(&self, control: &WebControl) -> Option<WebMedia> {
        control
            .0
            .next_element_sibling()?
            .dyn_into::<HtmlMediaElement>()
            .ok()
            .map(WebMedia)
    }
}

impl ReadySource for WebPage {
    fn ready_state(&self) -> ReadyState {
        match self.document.ready_state().as_str() {
            "loading" => ReadyState::Loading,
            "interactive" => ReadyState::Interactive,
            _ => ReadyState::Complete,
        }
    }

    fn on_content_loaded_once(&self, callback: Box<dyn FnOnce()>) -> Result<(), HostError> {
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        let callback = Closure::once_into_js(move || callback());
        self.document
            .add_event_listener_with_callback_and_add_event_listener_options(
                "DOMContentLoaded",
                callback.unchecked_ref(),
                &options,
            )
            .map_err(|err| listener_error("DOMContentLoaded", err))
    }
}

/// Bind the given page right away. Controls and elements wired by an
/// earlier call are skipped.
pub fn bind_now(page: &WebPage) -> BindReport {
    let config = page.config();
    log::set_max_level(config.level_filter());
    bind_page(page, &config)
}

/// Wire players added to the page after load. Returns how many new
/// players were bound.
#[wasm_bindgen(js_name = bindPlayers)]
pub fn bind_players() -> Result<usize, JsValue> {
    let page = WebPage::current().map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(bind_now(&page).bound_pairs)
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    init_logging(log::LevelFilter::Info);

    let page = match WebPage::current() {
        Ok(page) => page,
        Err(err) => {
            log::error!("player not started: {err}");
            return;
        }
    };

    let bound = page.clone();
    if let Err(err) = on_document_ready(&page, move || {
        bind_now(&bound);
    }) {
        log::error!("player not started: {err}");
    }
}
