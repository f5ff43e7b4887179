//! Browser bindings
//!
//! [`WebDocument`] runs the picker against the live DOM and [`WebChannel`]
//! moves selections over `window.postMessage`.

use crate::{
    channel::{
        listener::MessageListener,
        message::CoordinateSelectionEvent,
        transport::Envelope,
    },
    core::config::PickerOptions,
    dom::{ChangeNotifier, Display, DomHost},
    sync::{
        bootstrap::UrlBootstrap,
        fields::{FieldBinding, FieldSynchronizer},
    },
    PickerError, Result,
};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{Event, HtmlElement, HtmlInputElement, MessageEvent, Window};

fn js_error(context: &str, value: JsValue) -> PickerError {
    PickerError::Widget(format!("{}: {:?}", context, value))
}

fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| PickerError::MissingElement("window".to_string()))
}

/// Dispatches a DOM `change` event on the notified element
struct ChangeDispatcher {
    document: web_sys::Document,
}

impl ChangeNotifier for ChangeDispatcher {
    fn notify_change(&mut self, element_id: &str) {
        let Some(element) = self.document.get_element_by_id(element_id) else {
            return;
        };
        match Event::new("change") {
            Ok(event) => {
                if let Err(e) = element.dispatch_event(&event) {
                    log::warn!("change dispatch on '{}' failed: {:?}", element_id, e);
                }
            }
            Err(e) => log::warn!("cannot create change event: {:?}", e),
        }
    }
}

/// [`DomHost`] over a browser document
pub struct WebDocument {
    document: web_sys::Document,
    notifier: ChangeDispatcher,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self {
            notifier: ChangeDispatcher {
                document: document.clone(),
            },
            document,
        }
    }

    /// The document of the current window
    pub fn current() -> Result<Self> {
        let document = window()?
            .document()
            .ok_or_else(|| PickerError::MissingElement("document".to_string()))?;
        Ok(Self::new(document))
    }

    fn input(&self, element_id: &str) -> Option<HtmlInputElement> {
        self.document
            .get_element_by_id(element_id)?
            .dyn_into::<HtmlInputElement>()
            .ok()
    }

    fn html(&self, element_id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(element_id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }
}

impl DomHost for WebDocument {
    fn value(&self, element_id: &str) -> Option<String> {
        self.input(element_id).map(|input| input.value())
    }

    fn set_value(&mut self, element_id: &str, value: &str) -> bool {
        match self.input(element_id) {
            Some(input) => {
                input.set_value(value);
                true
            }
            None => false,
        }
    }

    fn set_display(&mut self, element_id: &str, display: Display) -> bool {
        let Some(element) = self.html(element_id) else {
            return false;
        };
        if let Err(e) = element.style().set_property("display", display.as_css()) {
            log::warn!("cannot style '{}': {:?}", element_id, e);
            return false;
        }
        true
    }

    fn display(&self, element_id: &str) -> Option<Display> {
        let element = self.html(element_id)?;
        let css = element.style().get_property_value("display").ok()?;
        Some(if css == "none" {
            Display::None
        } else {
            Display::Block
        })
    }

    fn focus(&mut self, element_id: &str) -> bool {
        self.html(element_id)
            .map(|element| element.focus().is_ok())
            .unwrap_or(false)
    }

    fn notifier(&mut self) -> Option<&mut dyn ChangeNotifier> {
        Some(&mut self.notifier)
    }

    fn contains(&self, element_id: &str) -> bool {
        self.document.get_element_by_id(element_id).is_some()
    }
}

/// `postMessage` transport between a picker frame and its parent page
pub struct WebChannel {
    window: Window,
}

impl WebChannel {
    pub fn new() -> Result<Self> {
        Ok(Self { window: window()? })
    }

    /// Posts a selection to the parent window
    pub fn post_to_parent(&self, event: &CoordinateSelectionEvent) -> Result<()> {
        let parent = self
            .window
            .parent()
            .map_err(|e| js_error("parent window", e))?
            .ok_or_else(|| PickerError::MissingElement("parent window".to_string()))?;

        let json = serde_json::to_string(&event.to_value()?)?;
        let message = js_sys::JSON::parse(&json)
            .map_err(|e| PickerError::InvalidMessage(format!("{:?}", e)))?;
        parent
            .post_message(&message, "*")
            .map_err(|e| js_error("postMessage", e))
    }

    /// Routes every `message` event on this window to `listener`
    pub fn listen(&self, listener: Rc<MessageListener>) -> Result<()> {
        let callback = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let data = match js_sys::JSON::stringify(&event.data())
                .ok()
                .and_then(|json| json.as_string())
                .map(|json| serde_json::from_str::<serde_json::Value>(&json))
            {
                Some(Ok(data)) => data,
                Some(Err(e)) => {
                    log::error!("unreadable message payload: {}", e);
                    return;
                }
                None => {
                    log::trace!("ignoring message without JSON payload");
                    return;
                }
            };
            listener.handle(&Envelope {
                origin: event.origin(),
                data,
            });
        });

        self.window
            .add_event_listener_with_callback("message", callback.as_ref().unchecked_ref())
            .map_err(|e| js_error("message listener", e))?;
        // The listener stays registered for the page's lifetime
        callback.forget();
        Ok(())
    }
}

/// Wires the current page as a host: applies `location.search` and listens
/// for selections from picker frames.
pub fn attach_host_page(options: &PickerOptions) -> Result<Rc<MessageListener>> {
    options.validate()?;

    let host: Rc<RefCell<dyn DomHost>> = Rc::new(RefCell::new(WebDocument::current()?));
    let binding = FieldBinding::from(&options.fields);
    let synchronizer = FieldSynchronizer::new(options.zero_policy);

    let search = window()?
        .location()
        .search()
        .map_err(|e| js_error("location", e))?;
    UrlBootstrap::new(options.query_keys.clone(), binding.clone(), synchronizer)
        .run(&mut *host.borrow_mut(), &search);

    let listener = Rc::new(
        MessageListener::new(host, binding, synchronizer).with_focus_on_apply(options.focus_on_apply),
    );
    WebChannel::new()?.listen(listener.clone())?;
    Ok(listener)
}

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// JS entry point for the admin change form
#[wasm_bindgen(js_name = attachHostPage)]
pub fn attach_host_page_js(options_json: Option<String>) -> std::result::Result<(), JsValue> {
    let result = match options_json {
        Some(json) => PickerOptions::from_json_str(&json),
        None => Ok(PickerOptions::default()),
    }
    .and_then(|options| attach_host_page(&options).map(|_| ()));
    result.map_err(|e| JsValue::from_str(&e.to_string()))
}

/// JS entry point for the picker frame: posts a picked point to the parent
#[wasm_bindgen(js_name = postSelection)]
pub fn post_selection_js(lat: f64, lng: f64) -> std::result::Result<(), JsValue> {
    let event = CoordinateSelectionEvent::from_lat_lng(crate::core::geo::LatLng::new(lat, lng));
    WebChannel::new()
        .and_then(|channel| channel.post_to_parent(&event))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
