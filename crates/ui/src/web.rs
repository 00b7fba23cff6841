//! Browser binding over `web-sys`.
//!
//! Loaded as the page's wasm module. On start it reads an optional inline
//! TOML config (`<script type="application/toml" id="chatline-config">`),
//! installs the console logger, and wires the handlers to the document and
//! the composer. Page script reaches the transcript through the exported
//! `getHistory` / `addMessage` / `historyJson` / `requestJson` functions,
//! e.g. from an `hx-vals` expression.

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use chatline_core::{ChatlineConfig, DomError, Error, LoggingConfig, PageConfig};
use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, Document, Element, HtmlElement, HtmlTextAreaElement, KeyboardEvent, XmlHttpRequest};

use crate::completion::CompletionDetail;
use crate::dom::{Clickable, KeyEvent, PageElement, TextField, rendered_text};
use crate::page::{ChatPage, PageEvent};

const CONFIG_ELEMENT_ID: &str = "chatline-config";

thread_local! {
    static PAGE: RefCell<Option<Rc<ChatPage>>> = const { RefCell::new(None) };
    static LISTENERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
}

impl PageElement for Element {
    fn id(&self) -> String {
        Element::id(self)
    }

    fn last_element_child(&self) -> Option<Self> {
        Element::last_element_child(self)
    }

    fn query_selector(&self, selector: &str) -> Option<Self> {
        match Element::query_selector(self, selector) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(selector, error = ?err, "invalid selector");
                None
            }
        }
    }

    fn inner_text(&self) -> String {
        rendered_text(self.dyn_ref::<HtmlElement>().map(HtmlElement::inner_text), self.text_content())
    }
}

impl TextField for HtmlTextAreaElement {
    fn scroll_height(&self) -> u32 {
        Element::scroll_height(self).max(0) as u32
    }

    fn set_style_height(&self, value: &str) {
        if let Err(err) = self.style().set_property("height", value) {
            tracing::warn!(value, error = ?err, "failed to set composer height");
        }
    }
}

impl Clickable for HtmlElement {
    fn click(&self) {
        HtmlElement::click(self)
    }
}

impl KeyEvent for KeyboardEvent {
    fn key(&self) -> String {
        KeyboardEvent::key(self)
    }

    fn shift_key(&self) -> bool {
        KeyboardEvent::shift_key(self)
    }

    fn prevent_default(&self) {
        web_sys::Event::prevent_default(self)
    }
}

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn document() -> Result<Document, DomError> {
    web_sys::window().and_then(|window| window.document()).ok_or(DomError::NoDocument)
}

fn element_by_id<T: JsCast>(document: &Document, id: &str, expected: &'static str) -> Result<T, DomError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| DomError::missing(id))?
        .dyn_into::<T>()
        .map_err(|_| DomError::wrong_kind(id, expected))
}

/// Inline config if the page provides one, defaults otherwise
fn load_config(document: &Document) -> Result<ChatlineConfig, Error> {
    match document.get_element_by_id(CONFIG_ELEMENT_ID).and_then(|el| el.text_content()) {
        Some(toml) => ChatlineConfig::from_toml_str(&toml),
        None => Ok(ChatlineConfig::default()),
    }
}

fn init_console_logging(config: &LoggingConfig) {
    let level = log::Level::from_str(&config.level).unwrap_or(log::Level::Warn);
    wasm_logger::init(wasm_logger::Config::new(level));
}

fn listen(
    target: &web_sys::EventTarget, event: PageEvent, handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), DomError> {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target
        .add_event_listener_with_callback(event.name(), closure.as_ref().unchecked_ref())
        .map_err(|_| DomError::listener(event.name()))?;
    LISTENERS.with(|listeners| listeners.borrow_mut().push(closure));
    Ok(())
}

fn detail_field(detail: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(detail, &JsValue::from_str(name)).ok()
}

/// Read `{ xhr.status, successful, target }` from the request library's event detail
///
/// Parts that are absent or of the wrong type come back as `None`.
fn completion_detail(event: &web_sys::Event) -> CompletionDetail<Element> {
    let Some(detail) = event.dyn_ref::<CustomEvent>().map(CustomEvent::detail) else {
        return CompletionDetail::default();
    };
    CompletionDetail {
        status: detail_field(&detail, "xhr")
            .and_then(|xhr| xhr.dyn_into::<XmlHttpRequest>().ok())
            .and_then(|xhr| xhr.status().ok()),
        successful: detail_field(&detail, "successful").and_then(|value| value.as_bool()),
        target: detail_field(&detail, "target").and_then(|target| target.dyn_into::<Element>().ok()),
    }
}

fn bind(document: &Document, page: &Rc<ChatPage>, config: &PageConfig) -> Result<(), DomError> {
    let input: HtmlTextAreaElement = element_by_id(document, &config.input_id, "textarea")?;
    let submit: HtmlElement = element_by_id(document, &config.submit_id, "HTML element")?;

    let after_request_page = Rc::clone(page);
    listen(document, PageEvent::AfterRequest, move |event| {
        after_request_page.after_request_detail(&completion_detail(&event));
    })?;

    let input_page = Rc::clone(page);
    let resized = input.clone();
    listen(&input, PageEvent::Input, move |_event| {
        input_page.input(&resized);
    })?;

    let key_page = Rc::clone(page);
    listen(&input, PageEvent::KeyDown, move |event| {
        if let Some(key_event) = event.dyn_ref::<KeyboardEvent>() {
            key_page.key_down(key_event, &submit);
        }
    })?;

    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let document = document().map_err(|e| to_js(e.into()))?;
    let config = load_config(&document).map_err(to_js)?;
    init_console_logging(&config.logging);

    let page = Rc::new(ChatPage::new(config.page.clone()));
    bind(&document, &page, &config.page).map_err(|e| to_js(e.into()))?;
    PAGE.with(|slot| *slot.borrow_mut() = Some(page));

    tracing::info!(messages_id = %config.page.messages_id, "chatline attached");
    Ok(())
}

fn with_page<T>(f: impl FnOnce(&ChatPage) -> T) -> Result<T, JsValue> {
    PAGE.with(|slot| match slot.borrow().as_deref() {
        Some(page) => Ok(f(page)),
        None => Err(JsValue::from_str("chatline has not been started")),
    })
}

/// Transcript as a JSON string
#[wasm_bindgen(js_name = historyJson)]
pub fn history_json() -> Result<String, JsValue> {
    with_page(|page| page.store().history_json())?.map_err(to_js)
}

/// Transcript as an array of `{ role, content }` objects
#[wasm_bindgen(js_name = getHistory)]
pub fn get_history() -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(&history_json()?)
}

#[wasm_bindgen(js_name = addMessage)]
pub fn add_message(role: &str, content: &str) -> Result<(), JsValue> {
    with_page(|page| page.add_message(role, content))
}

/// JSON body for the next chat request, history included
#[wasm_bindgen(js_name = requestJson)]
pub fn request_json(message: &str, model: Option<String>, provider: Option<String>) -> Result<String, JsValue> {
    with_page(|page| page.request(message, model.as_deref(), provider.as_deref()).to_json())?.map_err(to_js)
}
