use folio_core::content::Portfolio;
use folio_core::host::{ElementKey, Layout, ScrollBehavior, Scroller};
use folio_core::scroll::SmoothScroller;
use folio_protocol::{Rect, SectionId, Viewport};
use tracing::trace;

use crate::document::{COL_PX, Document, ROW_PX};

/// The terminal as a scrolling page: document geometry plus an animated
/// scroll position, both in layout pixels.
#[derive(Debug)]
pub struct TerminalHost {
    document: Document,
    scroller: SmoothScroller,
    viewport_rows: u16,
    now_ms: f64,
}

impl TerminalHost {
    pub fn new(document: Document, viewport_rows: u16) -> Self {
        Self {
            document,
            scroller: SmoothScroller::new(0.0),
            viewport_rows,
            now_ms: 0.0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            f64::from(self.document.width()) * COL_PX,
            f64::from(self.viewport_rows) * ROW_PX,
        )
    }

    /// First visible document row.
    pub fn top_row(&self) -> usize {
        (self.scroller.offset() / ROW_PX).round().max(0.0) as usize
    }

    pub fn max_offset(&self) -> f64 {
        let hidden = self
            .document
            .rows()
            .saturating_sub(usize::from(self.viewport_rows));
        hidden as f64 * ROW_PX
    }

    pub fn is_animating(&self) -> bool {
        self.scroller.is_animating()
    }

    /// User scroll by whole rows. Cancels any animated scroll. Returns
    /// whether the offset changed.
    pub fn scroll_rows(&mut self, rows: i32) -> bool {
        let from = self.scroller.offset();
        let to = (from + f64::from(rows) * ROW_PX).clamp(0.0, self.max_offset());
        self.scroller.jump_to(to);
        (to - from).abs() > f64::EPSILON
    }

    pub fn scroll_pages(&mut self, pages: i32) -> bool {
        let page = i32::from(self.viewport_rows.saturating_sub(2)).max(1);
        self.scroll_rows(pages.saturating_mul(page))
    }

    /// Advance the clock and any running scroll animation. Returns whether
    /// the offset moved.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.now_ms = now_ms;
        self.scroller.tick(now_ms)
    }

    pub fn resize(&mut self, portfolio: &Portfolio, width: u16, viewport_rows: u16) {
        let anchor = self.top_row() as f64 / self.document.rows().max(1) as f64;
        self.document.relayout(portfolio, width);
        self.viewport_rows = viewport_rows;
        let offset = (anchor * self.document.rows() as f64).round() * ROW_PX;
        self.scroller.jump_to(offset.clamp(0.0, self.max_offset()));
    }

    /// Viewport-relative rectangle of a reveal block.
    pub fn block_rect(&self, key: ElementKey) -> Option<Rect> {
        self.document
            .block_rect(key)
            .map(|r| r.offset_y(-self.scroller.offset()))
    }
}

impl Layout for TerminalHost {
    fn scroll_offset(&self) -> f64 {
        self.scroller.offset()
    }

    fn element_rect(&self, id: &str) -> Option<Rect> {
        let section: SectionId = id.parse().ok()?;
        self.document
            .section_rect(section)
            .map(|r| r.offset_y(-self.scroller.offset()))
    }
}

impl Scroller for TerminalHost {
    fn scroll_into_view(&mut self, id: &str, behavior: ScrollBehavior) {
        let Ok(section) = id.parse::<SectionId>() else {
            return;
        };
        let Some(rect) = self.document.section_rect(section) else {
            return;
        };
        let to = rect.y.clamp(0.0, self.max_offset());
        trace!(%section, to, ?behavior, "terminal scroll");
        match behavior {
            ScrollBehavior::Smooth => self.scroller.scroll_to(to, self.now_ms),
            ScrollBehavior::Instant => self.scroller.jump_to(to),
        }
    }
}
