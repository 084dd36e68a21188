use std::cell::RefCell;
use std::rc::Rc;

use folio_protocol::{NavbarStyle, PageState, RevealStyle, SectionId, ThemeToken};
use tracing::debug;

use crate::config::EngineConfig;
use crate::host::{ElementKey, IntersectionEntry, IntersectionHost, Layout, Scroller};
use crate::listener::{Listeners, Subscription};
use crate::navigation::{NavigateOutcome, NavigationChange, NavigationController};
use crate::reveal::{RevealController, RevealSet};

type RenderFn = Rc<RefCell<dyn FnMut(PageState)>>;

/// One mounted page: navigation state, its reveal controllers, and the
/// scroll binding that feeds them.
///
/// The scroll handler is bound in [`PageView::mount`] and released when the
/// view is torn down or dropped. Intersection observations live on the host,
/// so only [`PageView::teardown`] releases them; dropping the view leaves
/// them registered. The render callback receives a fresh [`PageState`] after
/// every event that changed it.
pub struct PageView {
    config: EngineConfig,
    navigation: Rc<RefCell<NavigationController>>,
    reveals: RevealSet,
    render: RenderFn,
    scroll: Option<Subscription>,
}

impl PageView {
    pub fn mount<R>(config: EngineConfig, scroll_events: &Listeners<dyn Layout>, render: R) -> Self
    where
        R: FnMut(PageState) + 'static,
    {
        let navigation = Rc::new(RefCell::new(NavigationController::new(
            config.navigation.clone(),
        )));
        let render: RenderFn = Rc::new(RefCell::new(render));

        let scroll = {
            let navigation = Rc::clone(&navigation);
            let render = Rc::clone(&render);
            scroll_events.subscribe(move |layout| {
                let change = navigation.borrow_mut().handle_scroll(layout);
                if change.any() {
                    let state = navigation.borrow().state();
                    (*render.borrow_mut())(state);
                }
            })
        };
        debug!(listeners = scroll_events.len(), "page view mounted");

        Self {
            reveals: RevealSet::new(config.reveal.clone()),
            config,
            navigation,
            render,
            scroll: Some(scroll),
        }
    }

    /// Release the scroll binding and every intersection observation.
    pub fn teardown<H>(mut self, host: &mut H)
    where
        H: IntersectionHost + ?Sized,
    {
        self.reveals.unmount_all(host);
        if let Some(scroll) = self.scroll.take() {
            scroll.cancel();
        }
        debug!("page view torn down");
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> PageState {
        self.navigation.borrow().state()
    }

    pub fn navbar_style(&self) -> NavbarStyle {
        self.navigation.borrow().navbar_style()
    }

    pub fn link_token(&self, section: SectionId) -> ThemeToken {
        self.navigation.borrow().link_token(section)
    }

    pub fn navigate_to<H>(&mut self, target: &str, host: &mut H) -> NavigateOutcome
    where
        H: Layout + Scroller + ?Sized,
    {
        let outcome = self.navigation.borrow_mut().navigate_to(target, host);
        self.notify(outcome.change);
        outcome
    }

    pub fn navigate_to_section<H>(&mut self, section: SectionId, host: &mut H) -> NavigateOutcome
    where
        H: Layout + Scroller + ?Sized,
    {
        self.navigate_to(section.as_str(), host)
    }

    pub fn toggle_menu(&mut self) {
        let change = self.navigation.borrow_mut().toggle_menu();
        self.notify(change);
    }

    pub fn close_menu(&mut self) {
        let change = self.navigation.borrow_mut().close_menu();
        self.notify(change);
    }

    pub fn register_reveal<H>(&mut self, delay_ms: u32, host: &mut H) -> ElementKey
    where
        H: IntersectionHost + ?Sized,
    {
        self.reveals.register(delay_ms, host)
    }

    /// Feed a batch of intersection entries. Returns the keys revealed.
    pub fn handle_intersections<H>(
        &mut self,
        entries: &[IntersectionEntry],
        host: &mut H,
    ) -> Vec<ElementKey>
    where
        H: IntersectionHost + ?Sized,
    {
        self.reveals.dispatch(entries, host)
    }

    pub fn reveal(&self, key: ElementKey) -> Option<&RevealController> {
        self.reveals.get(key)
    }

    pub fn reveal_style(&self, key: ElementKey) -> Option<RevealStyle> {
        self.reveals.style(key)
    }

    pub fn reveals(&self) -> &RevealSet {
        &self.reveals
    }

    fn notify(&self, change: NavigationChange) {
        if change.any() {
            let state = self.state();
            (*self.render.borrow_mut())(state);
        }
    }
}

impl std::fmt::Debug for PageView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageView")
            .field("state", &self.state())
            .field("reveals", &self.reveals.len())
            .field("bound", &self.scroll.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use folio_protocol::Rect;

    use super::*;
    use crate::host::ScrollBehavior;
    use crate::intersection::SoftwareObserver;

    struct StaticLayout {
        offset: f64,
        about_top: f64,
    }

    impl Layout for StaticLayout {
        fn scroll_offset(&self) -> f64 {
            self.offset
        }

        fn element_rect(&self, id: &str) -> Option<Rect> {
            (id == "about").then(|| Rect::new(0.0, self.about_top, 800.0, 400.0))
        }
    }

    impl Scroller for StaticLayout {
        fn scroll_into_view(&mut self, _id: &str, _behavior: ScrollBehavior) {}
    }

    #[test]
    fn scroll_events_render_only_on_change() {
        let events: Listeners<dyn Layout> = Listeners::new();
        let renders = Rc::new(Cell::new(0));
        let r = Rc::clone(&renders);
        let page = PageView::mount(EngineConfig::default(), &events, move |_| r.set(r.get() + 1));

        let layout = StaticLayout {
            offset: 100.0,
            about_top: 120.0,
        };
        events.emit(&layout);
        assert_eq!(renders.get(), 1);
        assert_eq!(page.state().active_section, SectionId::About);
        assert!(page.state().scrolled);

        // Same layout again: nothing changed, nothing rendered.
        events.emit(&layout);
        assert_eq!(renders.get(), 1);
    }

    #[test]
    fn menu_toggle_renders() {
        let events: Listeners<dyn Layout> = Listeners::new();
        let last = Rc::new(Cell::new(PageState::default()));
        let l = Rc::clone(&last);
        let mut page = PageView::mount(EngineConfig::default(), &events, move |s| l.set(s));

        page.toggle_menu();
        assert!(last.get().menu_open);

        let mut layout = StaticLayout {
            offset: 0.0,
            about_top: 700.0,
        };
        page.navigate_to_section(SectionId::About, &mut layout);
        assert!(!last.get().menu_open);
    }

    #[test]
    fn dropping_the_view_unbinds_scroll() {
        let events: Listeners<dyn Layout> = Listeners::new();
        {
            let _page = PageView::mount(EngineConfig::default(), &events, |_| {});
            assert_eq!(events.len(), 1);
        }
        assert!(events.is_empty());
    }

    #[test]
    fn teardown_releases_observations() {
        let events: Listeners<dyn Layout> = Listeners::new();
        let mut observer = SoftwareObserver::new();
        let mut page = PageView::mount(EngineConfig::default(), &events, |_| {});
        let key = page.register_reveal(0, &mut observer);
        page.register_reveal(100, &mut observer);
        assert!(observer.is_observing(key));

        page.teardown(&mut observer);
        assert_eq!(observer.observed_count(), 0);
        assert!(events.is_empty());
    }
}
