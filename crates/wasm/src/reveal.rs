use std::cell::RefCell;
use std::rc::{Rc, Weak};

use folio_core::config::RevealConfig;
use folio_core::error::FolioError;
use folio_core::host::{ElementKey, IntersectionEntry, IntersectionHost, ObserverOptions};
use folio_core::{RevealController, RevealOutcome};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::DomDocument;
use crate::to_js_error;

type EntrySink = Rc<RefCell<Option<Box<dyn FnMut(&[IntersectionEntry])>>>>;

/// `IntersectionObserver` watching a single element.
struct DomObserver {
    element: Element,
    supported: bool,
    observer: Option<IntersectionObserver>,
    callback: Option<Closure<dyn FnMut(js_sys::Array)>>,
    sink: EntrySink,
}

impl DomObserver {
    fn new(element: Element, supported: bool) -> Self {
        Self {
            element,
            supported,
            observer: None,
            callback: None,
            sink: Rc::new(RefCell::new(None)),
        }
    }
}

impl IntersectionHost for DomObserver {
    fn observe(&mut self, target: ElementKey, options: &ObserverOptions) -> Result<(), FolioError> {
        if !self.supported {
            return Err(FolioError::IntersectionUnavailable);
        }

        let sink = Rc::clone(&self.sink);
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            let entries: Vec<IntersectionEntry> = entries
                .iter()
                .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|e| IntersectionEntry {
                    target,
                    is_intersecting: e.is_intersecting(),
                    ratio: e.intersection_ratio(),
                })
                .collect();
            if let Ok(mut slot) = sink.try_borrow_mut()
                && let Some(handler) = slot.as_mut()
            {
                handler(&entries);
            }
        });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin.to_css());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|_| FolioError::IntersectionUnavailable)?;
        observer.observe(&self.element);

        self.observer = Some(observer);
        self.callback = Some(callback);
        Ok(())
    }

    fn unobserve(&mut self, _target: ElementKey) {
        if let Some(observer) = &self.observer {
            observer.unobserve(&self.element);
        }
    }
}

impl Drop for DomObserver {
    fn drop(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
    }
}

struct RevealInner {
    controller: RevealController,
    observer: DomObserver,
}

/// Entrance animation for one element.
///
/// `onVisible` is called once, with the element's target style as JSON,
/// when it first scrolls into view (or immediately when the browser has no
/// `IntersectionObserver`).
#[wasm_bindgen]
pub struct Reveal {
    inner: Rc<RefCell<RevealInner>>,
    config: RevealConfig,
}

#[wasm_bindgen]
impl Reveal {
    #[wasm_bindgen(constructor)]
    pub fn new(
        element: Element,
        delay_ms: u32,
        on_visible: &js_sys::Function,
        config_json: Option<String>,
    ) -> Result<Reveal, JsError> {
        let config = match config_json {
            Some(json) => folio_core::EngineConfig::from_json(json.as_bytes())
                .map_err(to_js_error)?
                .reveal,
            None => RevealConfig::default(),
        };
        let supported = DomDocument::new()?.intersection_supported();

        let mut observer = DomObserver::new(element, supported);
        let controller = RevealController::mount(ElementKey(0), delay_ms, &config, &mut observer);
        if !supported {
            web_sys::console::warn_1(
                &"folio: IntersectionObserver unavailable, showing content immediately".into(),
            );
        }

        let visible_now = controller.is_visible();
        let target_style = controller.style(&config);
        let sink = Rc::clone(&observer.sink);
        let inner = Rc::new(RefCell::new(RevealInner {
            controller,
            observer,
        }));

        let weak: Weak<RefCell<RevealInner>> = Rc::downgrade(&inner);
        let handler_config = config.clone();
        let notify = on_visible.clone();
        *sink.borrow_mut() = Some(Box::new(move |entries: &[IntersectionEntry]| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let style = {
                let mut guard = inner.borrow_mut();
                let RevealInner {
                    controller,
                    observer,
                } = &mut *guard;
                let triggered = entries.iter().any(|entry| {
                    controller.on_intersection(entry, observer) == RevealOutcome::Triggered
                });
                triggered.then(|| controller.style(&handler_config))
            };
            if let Some(style) = style {
                call_with_style(&notify, &style);
            }
        }));

        if visible_now {
            call_with_style(on_visible, &target_style);
        }

        Ok(Reveal { inner, config })
    }

    #[wasm_bindgen(js_name = isVisible)]
    pub fn is_visible(&self) -> bool {
        self.inner.borrow().controller.is_visible()
    }

    /// Target style for the current state, as JSON.
    pub fn style(&self) -> Result<String, JsError> {
        let style = self.inner.borrow().controller.style(&self.config);
        serde_json::to_string(&style).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Inline CSS for the current state.
    #[wasm_bindgen(js_name = cssText)]
    pub fn css_text(&self) -> String {
        self.inner
            .borrow()
            .controller
            .style(&self.config)
            .to_css()
    }

    /// Stop observing. The element keeps its current visibility.
    pub fn unmount(&mut self) {
        let mut guard = self.inner.borrow_mut();
        let RevealInner {
            controller,
            observer,
        } = &mut *guard;
        controller.unmount(observer);
    }
}

fn call_with_style(callback: &js_sys::Function, style: &folio_protocol::RevealStyle) {
    let Ok(json) = serde_json::to_string(style) else {
        return;
    };
    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
        web_sys::console::error_2(&"folio: onVisible threw".into(), &e);
    }
}
