use folio_core::host::{Layout, ScrollBehavior, Scroller};
use folio_protocol::Rect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, EventTarget, ScrollIntoViewOptions, Window};

/// The live document, measured through the DOM.
#[derive(Debug, Clone)]
pub struct DomDocument {
    window: Window,
    document: Document,
}

impl DomDocument {
    pub fn new() -> Result<Self, JsError> {
        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("no document"))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Whether the host exposes `IntersectionObserver`.
    pub fn intersection_supported(&self) -> bool {
        js_sys::Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver"))
            .unwrap_or(false)
    }
}

impl Layout for DomDocument {
    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn element_rect(&self, id: &str) -> Option<Rect> {
        let element = self.document.get_element_by_id(id)?;
        let r = element.get_bounding_client_rect();
        Some(Rect::new(r.x(), r.y(), r.width(), r.height()))
    }
}

impl Scroller for DomDocument {
    fn scroll_into_view(&mut self, id: &str, behavior: ScrollBehavior) {
        let Some(element) = self.document.get_element_by_id(id) else {
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

/// A DOM event listener bound for the lifetime of this guard.
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut()>,
}

impl EventListener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, JsError>
    where
        F: FnMut() + 'static,
    {
        let callback = Closure::<dyn FnMut()>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|_| JsError::new(&format!("cannot listen for '{event}'")))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let removed = self.target.remove_event_listener_with_callback(
            self.event,
            self.callback.as_ref().unchecked_ref(),
        );
        if removed.is_err() {
            web_sys::console::warn_1(
                &format!("folio: failed to remove '{}' listener", self.event).into(),
            );
        }
    }
}
