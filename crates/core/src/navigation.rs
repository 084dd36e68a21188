use folio_protocol::{NavbarStyle, PageState, SectionId, ThemeToken};
use tracing::debug;

use crate::config::NavigationConfig;
use crate::host::{Layout, ScrollBehavior, Scroller};

/// Which facets of [`PageState`] an event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationChange {
    pub scrolled: bool,
    pub active_section: bool,
    pub menu_open: bool,
}

impl NavigationChange {
    pub fn any(&self) -> bool {
        self.scrolled || self.active_section || self.menu_open
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigateOutcome {
    /// Whether a scroll request was issued to the host.
    pub scroll_issued: bool,
    pub change: NavigationChange,
}

/// First section, in list order, whose top edge lies within `[band_top,
/// band_bottom]`. Sections missing from the document (`None` tops) are
/// skipped.
pub fn first_in_band<I>(tops: I, band_top: f64, band_bottom: f64) -> Option<SectionId>
where
    I: IntoIterator<Item = (SectionId, Option<f64>)>,
{
    tops.into_iter().find_map(|(id, top)| {
        let top = top?;
        (top >= band_top && top <= band_bottom).then_some(id)
    })
}

/// Page chrome state: scrolled navbar, scroll spy, mobile menu.
#[derive(Debug, Clone)]
pub struct NavigationController {
    config: NavigationConfig,
    state: PageState,
}

impl NavigationController {
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            config,
            state: PageState::default(),
        }
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn scrolled(&self) -> bool {
        self.state.scrolled
    }

    pub fn active_section(&self) -> SectionId {
        self.state.active_section
    }

    pub fn menu_open(&self) -> bool {
        self.state.menu_open
    }

    /// Recompute the scrolled flag and the active section from the current
    /// layout.
    pub fn handle_scroll<L>(&mut self, layout: &L) -> NavigationChange
    where
        L: Layout + ?Sized,
    {
        let mut change = NavigationChange {
            scrolled: self.update_scrolled(layout.scroll_offset()),
            ..NavigationChange::default()
        };

        if let Some(section) = self.section_in_band(layout)
            && section != self.state.active_section
        {
            debug!(from = %self.state.active_section, to = %section, "active section changed");
            self.state.active_section = section;
            change.active_section = true;
        }
        change
    }

    /// `scrolled = offset > threshold`. Returns whether the flag flipped.
    pub fn update_scrolled(&mut self, offset: f64) -> bool {
        let scrolled = offset > self.config.scrolled_threshold;
        let changed = scrolled != self.state.scrolled;
        self.state.scrolled = scrolled;
        changed
    }

    /// The section the scroll spy would select for `layout`, or `None` when
    /// no section top is inside the band.
    pub fn section_in_band<L>(&self, layout: &L) -> Option<SectionId>
    where
        L: Layout + ?Sized,
    {
        first_in_band(
            self.config
                .sections
                .iter()
                .map(|id| (*id, layout.element_rect(id.as_str()).map(|r| r.top()))),
            self.config.band_top,
            self.config.band_bottom,
        )
    }

    pub fn toggle_menu(&mut self) -> NavigationChange {
        self.state.menu_open = !self.state.menu_open;
        NavigationChange {
            menu_open: true,
            ..NavigationChange::default()
        }
    }

    pub fn close_menu(&mut self) -> NavigationChange {
        let was_open = self.state.menu_open;
        self.state.menu_open = false;
        NavigationChange {
            menu_open: was_open,
            ..NavigationChange::default()
        }
    }

    /// Close the menu, then smooth-scroll to the element with id `target`
    /// if the document has one. A missing target is not an error.
    pub fn navigate_to<H>(&mut self, target: &str, host: &mut H) -> NavigateOutcome
    where
        H: Layout + Scroller + ?Sized,
    {
        let change = self.close_menu();
        if !host.contains(target) {
            debug!(target_id = target, "navigation target not in document");
            return NavigateOutcome {
                scroll_issued: false,
                change,
            };
        }
        host.scroll_into_view(target, ScrollBehavior::Smooth);
        debug!(target_id = target, "scrolling to section");
        NavigateOutcome {
            scroll_issued: true,
            change,
        }
    }

    pub fn navigate_to_section<H>(&mut self, section: SectionId, host: &mut H) -> NavigateOutcome
    where
        H: Layout + Scroller + ?Sized,
    {
        self.navigate_to(section.as_str(), host)
    }

    pub fn navbar_style(&self) -> NavbarStyle {
        NavbarStyle::for_scrolled(self.state.scrolled)
    }

    /// Color of the navbar link for `section`.
    pub fn link_token(&self, section: SectionId) -> ThemeToken {
        if section == self.state.active_section {
            ThemeToken::NavLinkActive
        } else {
            ThemeToken::NavLink
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use folio_protocol::Rect;

    use super::*;

    #[derive(Default)]
    struct FakeDocument {
        offset: f64,
        tops: HashMap<&'static str, f64>,
        scroll_requests: Vec<(String, ScrollBehavior)>,
    }

    impl FakeDocument {
        fn with_tops(offset: f64, tops: &[(&'static str, f64)]) -> Self {
            Self {
                offset,
                tops: tops.iter().copied().collect(),
                scroll_requests: Vec::new(),
            }
        }
    }

    impl Layout for FakeDocument {
        fn scroll_offset(&self) -> f64 {
            self.offset
        }

        fn element_rect(&self, id: &str) -> Option<Rect> {
            self.tops.get(id).map(|top| Rect::new(0.0, *top, 800.0, 300.0))
        }
    }

    impl Scroller for FakeDocument {
        fn scroll_into_view(&mut self, id: &str, behavior: ScrollBehavior) {
            self.scroll_requests.push((id.to_string(), behavior));
        }
    }

    fn controller() -> NavigationController {
        NavigationController::new(NavigationConfig::default())
    }

    #[test]
    fn scrolled_threshold_boundary() {
        let mut nav = controller();
        nav.update_scrolled(49.0);
        assert!(!nav.scrolled());
        nav.update_scrolled(50.0);
        assert!(!nav.scrolled());
        assert!(nav.update_scrolled(51.0));
        assert!(nav.scrolled());
        assert!(!nav.update_scrolled(400.0));
    }

    #[test]
    fn first_section_in_band_wins() {
        let mut nav = controller();
        let doc = FakeDocument::with_tops(
            320.0,
            &[("home", -10.0), ("about", 290.0), ("experience", 600.0)],
        );
        let change = nav.handle_scroll(&doc);
        assert_eq!(nav.active_section(), SectionId::About);
        assert!(change.active_section);
        assert!(change.scrolled);
    }

    #[test]
    fn earlier_section_breaks_ties() {
        let mut nav = controller();
        let doc = FakeDocument::with_tops(900.0, &[("skills", 20.0), ("education", 280.0)]);
        nav.handle_scroll(&doc);
        assert_eq!(nav.active_section(), SectionId::Skills);
    }

    #[test]
    fn band_edges_are_inclusive() {
        let mut nav = controller();
        nav.handle_scroll(&FakeDocument::with_tops(0.0, &[("contact", 300.0)]));
        assert_eq!(nav.active_section(), SectionId::Contact);
        nav.handle_scroll(&FakeDocument::with_tops(0.0, &[("about", 0.0)]));
        assert_eq!(nav.active_section(), SectionId::About);
    }

    #[test]
    fn no_match_keeps_previous_section() {
        let mut nav = controller();
        nav.handle_scroll(&FakeDocument::with_tops(500.0, &[("experience", 100.0)]));
        assert_eq!(nav.active_section(), SectionId::Experience);

        let change = nav.handle_scroll(&FakeDocument::with_tops(
            1500.0,
            &[("experience", -800.0), ("skills", 450.0)],
        ));
        assert_eq!(nav.active_section(), SectionId::Experience);
        assert!(!change.active_section);
    }

    #[test]
    fn configured_band_is_respected() {
        let mut nav = NavigationController::new(NavigationConfig {
            band_top: 0.0,
            band_bottom: 100.0,
            ..NavigationConfig::default()
        });
        nav.handle_scroll(&FakeDocument::with_tops(0.0, &[("about", 150.0)]));
        assert_eq!(nav.active_section(), SectionId::Home);
    }

    #[test]
    fn navigate_closes_menu_and_scrolls_once() {
        let mut nav = controller();
        nav.toggle_menu();
        assert!(nav.menu_open());

        let mut doc = FakeDocument::with_tops(0.0, &[("contact", 2400.0)]);
        let outcome = nav.navigate_to("contact", &mut doc);
        assert!(outcome.scroll_issued);
        assert!(outcome.change.menu_open);
        assert!(!nav.menu_open());
        assert_eq!(
            doc.scroll_requests,
            vec![("contact".to_string(), ScrollBehavior::Smooth)]
        );
    }

    #[test]
    fn navigate_to_missing_target_is_a_no_op() {
        let mut nav = controller();
        nav.toggle_menu();
        let mut doc = FakeDocument::with_tops(0.0, &[("contact", 2400.0)]);
        let outcome = nav.navigate_to("nonexistent", &mut doc);
        assert!(!outcome.scroll_issued);
        assert!(!nav.menu_open());
        assert!(doc.scroll_requests.is_empty());
    }

    #[test]
    fn close_menu_reports_change_only_when_open() {
        let mut nav = controller();
        assert!(!nav.close_menu().any());
        nav.toggle_menu();
        assert!(nav.close_menu().menu_open);
    }

    #[test]
    fn navbar_follows_scrolled_flag() {
        let mut nav = controller();
        assert_eq!(nav.navbar_style().background, ThemeToken::NavbarTransparent);
        nav.update_scrolled(120.0);
        assert_eq!(nav.navbar_style().background, ThemeToken::NavbarSolid);
    }

    #[test]
    fn active_link_is_highlighted() {
        let mut nav = controller();
        nav.handle_scroll(&FakeDocument::with_tops(0.0, &[("skills", 10.0)]));
        assert_eq!(nav.link_token(SectionId::Skills), ThemeToken::NavLinkActive);
        assert_eq!(nav.link_token(SectionId::About), ThemeToken::NavLink);
    }
}
