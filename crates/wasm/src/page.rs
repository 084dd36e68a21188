use folio_core::host::{Layout, NoIntersection};
use folio_core::listener::Listeners;
use folio_core::{EngineConfig, PageView};
use wasm_bindgen::prelude::*;

use crate::dom::{DomDocument, EventListener};
use crate::to_js_error;

/// Navigation chrome of the page: scrolled navbar, scroll spy, mobile menu
/// and smooth-scroll navigation.
///
/// `onChange` receives the page state as a JSON string after every change:
/// `{"scrolled":true,"activeSection":"about","menuOpen":false}`. It must
/// not call back into this object synchronously.
#[wasm_bindgen]
pub struct PortfolioPage {
    dom: DomDocument,
    page: Option<PageView>,
    scroll: Option<EventListener>,
}

#[wasm_bindgen]
impl PortfolioPage {
    #[wasm_bindgen(constructor)]
    pub fn new(
        on_change: js_sys::Function,
        config_json: Option<String>,
    ) -> Result<PortfolioPage, JsError> {
        let config = match config_json {
            Some(json) => EngineConfig::from_json(json.as_bytes()).map_err(to_js_error)?,
            None => EngineConfig::default(),
        };
        let dom = DomDocument::new()?;

        let events: Listeners<dyn Layout> = Listeners::new();
        let page = PageView::mount(config, &events, move |state| {
            let Ok(json) = serde_json::to_string(&state) else {
                return;
            };
            if let Err(e) = on_change.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                web_sys::console::error_2(&"folio: onChange threw".into(), &e);
            }
        });

        let window = dom.window().clone();
        let measured = dom.clone();
        let scroll = EventListener::new(&window, "scroll", move || {
            events.emit(&measured);
        })?;

        Ok(PortfolioPage {
            dom,
            page: Some(page),
            scroll: Some(scroll),
        })
    }

    /// Close the menu and smooth-scroll to the element with `id`. Returns
    /// whether a scroll was started.
    #[wasm_bindgen(js_name = navigateTo)]
    pub fn navigate_to(&mut self, id: &str) -> bool {
        let Some(page) = self.page.as_mut() else {
            return false;
        };
        page.navigate_to(id, &mut self.dom).scroll_issued
    }

    #[wasm_bindgen(js_name = toggleMenu)]
    pub fn toggle_menu(&mut self) {
        if let Some(page) = self.page.as_mut() {
            page.toggle_menu();
        }
    }

    #[wasm_bindgen(js_name = closeMenu)]
    pub fn close_menu(&mut self) {
        if let Some(page) = self.page.as_mut() {
            page.close_menu();
        }
    }

    /// Current page state as JSON.
    pub fn state(&self) -> Result<String, JsError> {
        let state = self.page.as_ref().map(PageView::state).unwrap_or_default();
        serde_json::to_string(&state).map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> String {
        self.page
            .as_ref()
            .map(|p| p.state().active_section)
            .unwrap_or_default()
            .to_string()
    }

    /// Navbar chrome for the current scrolled flag, as JSON.
    #[wasm_bindgen(js_name = navbarStyle)]
    pub fn navbar_style(&self) -> Result<String, JsError> {
        let Some(page) = self.page.as_ref() else {
            return Err(JsError::new("page is unmounted"));
        };
        serde_json::to_string(&page.navbar_style()).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Remove the scroll listener. Later calls are no-ops.
    pub fn unmount(&mut self) {
        self.scroll.take();
        if let Some(page) = self.page.take() {
            page.teardown(&mut NoIntersection);
        }
    }
}
