use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crossterm::event::{KeyCode, MouseEventKind};
use folio_core::content::Portfolio;
use folio_core::host::{ElementKey, Layout};
use folio_core::intersection::SoftwareObserver;
use folio_core::listener::Listeners;
use folio_core::reveal::hidden_style;
use folio_core::{EngineConfig, PageView};
use folio_protocol::{NavbarStyle, PageState, RevealStyle, SectionId, ThemeToken};
use tracing::{debug, info};

use crate::document::{Document, ROW_PX};
use crate::host::TerminalHost;

const WHEEL_ROWS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// How a block should be drawn right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockLook {
    pub opacity: f64,
    /// Downward shift in rows.
    pub shift: i32,
}

/// The page engine wired to a terminal host.
pub struct App {
    portfolio: Portfolio,
    page: Option<PageView>,
    events: Listeners<dyn Layout>,
    host: TerminalHost,
    observer: SoftwareObserver,
    revealed_at: HashMap<ElementKey, f64>,
    menu_cursor: usize,
    dirty: Rc<Cell<bool>>,
    now_ms: f64,
}

impl App {
    pub fn new(portfolio: Portfolio, config: EngineConfig, width: u16, viewport_rows: u16) -> Self {
        let events: Listeners<dyn Layout> = Listeners::new();
        let dirty = Rc::new(Cell::new(true));
        let mut page = {
            let dirty = Rc::clone(&dirty);
            PageView::mount(config, &events, move |state| {
                debug!(?state, "page state changed");
                dirty.set(true);
            })
        };

        let mut observer = SoftwareObserver::new();
        let mut document = Document::build(&portfolio, width);
        document.attach_reveals(|delay_ms| page.register_reveal(delay_ms, &mut observer));
        info!(
            blocks = document.blocks().len(),
            rows = document.rows(),
            "document laid out"
        );

        let mut app = Self {
            portfolio,
            page: Some(page),
            events,
            host: TerminalHost::new(document, viewport_rows),
            observer,
            revealed_at: HashMap::new(),
            menu_cursor: 0,
            dirty,
            now_ms: 0.0,
        };
        app.poll_intersections();
        app
    }

    pub fn state(&self) -> PageState {
        self.page.as_ref().map(PageView::state).unwrap_or_default()
    }

    pub fn navbar_style(&self) -> NavbarStyle {
        self.page
            .as_ref()
            .map_or_else(|| NavbarStyle::for_scrolled(false), PageView::navbar_style)
    }

    pub fn link_token(&self, section: SectionId) -> ThemeToken {
        self.page
            .as_ref()
            .map_or(ThemeToken::NavLink, |p| p.link_token(section))
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn host(&self) -> &TerminalHost {
        &self.host
    }

    pub fn menu_cursor(&self) -> usize {
        self.menu_cursor
    }

    /// Whether the next frame differs from the last one drawn. Clears the
    /// flag.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    /// Whether anything is still moving and needs frames.
    pub fn is_animating(&self) -> bool {
        if self.host.is_animating() {
            return true;
        }
        let Some(page) = &self.page else {
            return false;
        };
        self.revealed_at.iter().any(|(key, at)| {
            page.reveal_style(*key).is_some_and(|style| {
                let end = f64::from(style.delay_ms) + f64::from(style.duration_ms);
                self.now_ms - at < end
            })
        })
    }

    /// Visual state of a reveal block at the current time.
    pub fn block_look(&self, key: Option<ElementKey>) -> BlockLook {
        let shown = BlockLook {
            opacity: 1.0,
            shift: 0,
        };
        let (Some(key), Some(page)) = (key, &self.page) else {
            return shown;
        };
        let Some(target) = page.reveal_style(key) else {
            return shown;
        };
        let style = match self.revealed_at.get(&key) {
            Some(at) => {
                let from = hidden_style(target.delay_ms, &page.config().reveal);
                target.interpolate(&from, self.now_ms - at)
            }
            None => target,
        };
        look_of(&style)
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Control {
        let menu_open = self.state().menu_open;
        match code {
            KeyCode::Char('q') => return Control::Quit,
            KeyCode::Esc if menu_open => self.with_page(PageView::close_menu),
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('m') => {
                self.menu_cursor = self
                    .state()
                    .active_section
                    .index()
                    .saturating_sub(1)
                    .min(SectionId::NAV_LINKS.len() - 1);
                self.with_page(PageView::toggle_menu);
            }
            KeyCode::Up | KeyCode::Char('k') if menu_open => {
                self.menu_cursor = self.menu_cursor.saturating_sub(1);
                self.dirty.set(true);
            }
            KeyCode::Down | KeyCode::Char('j') if menu_open => {
                self.menu_cursor = (self.menu_cursor + 1).min(SectionId::NAV_LINKS.len() - 1);
                self.dirty.set(true);
            }
            KeyCode::Enter if menu_open => {
                if let Some(section) = SectionId::NAV_LINKS.get(self.menu_cursor).copied() {
                    self.navigate(section);
                }
            }
            KeyCode::Char('c') => self.navigate(SectionId::Contact),
            KeyCode::Char(c @ '1'..='6') => {
                let index = usize::from(c as u8 - b'1');
                if let Some(section) = SectionId::ALL.get(index).copied() {
                    self.navigate(section);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.user_scroll(|h| h.scroll_rows(-1)),
            KeyCode::Down | KeyCode::Char('j') => self.user_scroll(|h| h.scroll_rows(1)),
            KeyCode::PageUp => self.user_scroll(|h| h.scroll_pages(-1)),
            KeyCode::PageDown | KeyCode::Char(' ') => self.user_scroll(|h| h.scroll_pages(1)),
            KeyCode::Home => self.user_scroll(|h| h.scroll_rows(i32::MIN / 2)),
            KeyCode::End => self.user_scroll(|h| h.scroll_rows(i32::MAX / 2)),
            _ => {}
        }
        Control::Continue
    }

    pub fn handle_mouse(&mut self, kind: MouseEventKind) {
        match kind {
            MouseEventKind::ScrollDown => self.user_scroll(|h| h.scroll_rows(WHEEL_ROWS)),
            MouseEventKind::ScrollUp => self.user_scroll(|h| h.scroll_rows(-WHEEL_ROWS)),
            _ => {}
        }
    }

    pub fn resize(&mut self, width: u16, viewport_rows: u16) {
        self.host.resize(&self.portfolio, width, viewport_rows);
        self.dirty.set(true);
        self.after_scroll();
    }

    /// Advance animations to `now_ms`.
    pub fn tick(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
        if self.host.tick(now_ms) {
            self.dirty.set(true);
            self.after_scroll();
        }
        if self.is_animating() {
            self.dirty.set(true);
        }
    }

    /// Release every engine binding.
    pub fn shutdown(&mut self) {
        if let Some(page) = self.page.take() {
            page.teardown(&mut self.observer);
        }
    }

    fn navigate(&mut self, section: SectionId) {
        let Some(page) = self.page.as_mut() else {
            return;
        };
        let outcome = page.navigate_to_section(section, &mut self.host);
        debug!(%section, scroll_issued = outcome.scroll_issued, "navigate");
        self.dirty.set(true);
    }

    fn user_scroll(&mut self, scroll: impl FnOnce(&mut TerminalHost) -> bool) {
        if scroll(&mut self.host) {
            self.dirty.set(true);
            self.after_scroll();
        }
    }

    fn with_page(&mut self, f: impl FnOnce(&mut PageView)) {
        if let Some(page) = self.page.as_mut() {
            f(page);
        }
    }

    fn after_scroll(&mut self) {
        self.events.emit(&self.host);
        self.poll_intersections();
    }

    fn poll_intersections(&mut self) {
        let Some(page) = self.page.as_mut() else {
            return;
        };
        let host = &self.host;
        let entries = self
            .observer
            .poll(host.viewport(), |key| host.block_rect(key));
        if entries.is_empty() {
            return;
        }
        for key in page.handle_intersections(&entries, &mut self.observer) {
            self.revealed_at.insert(key, self.now_ms);
            self.dirty.set(true);
        }
    }
}

fn look_of(style: &RevealStyle) -> BlockLook {
    BlockLook {
        opacity: style.opacity.clamp(0.0, 1.0),
        shift: (style.translate_y / ROW_PX).round() as i32,
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
