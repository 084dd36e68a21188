//! Primitives the host environment provides to the engine.

use folio_protocol::{Rect, RootMargin};
use serde::{Deserialize, Serialize};

use crate::error::FolioError;

/// Read-only view of the document geometry.
pub trait Layout {
    /// Current vertical scroll offset of the page, in pixels.
    fn scroll_offset(&self) -> f64;

    /// Viewport-relative bounding rectangle of the element with `id`, or
    /// `None` when no such element is in the document.
    fn element_rect(&self, id: &str) -> Option<Rect>;

    fn contains(&self, id: &str) -> bool {
        self.element_rect(id).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Programmatic scrolling.
pub trait Scroller {
    /// Bring the element with `id` to the top of the viewport. Fire and
    /// forget: a later call simply redirects the scroll.
    fn scroll_into_view(&mut self, id: &str, behavior: ScrollBehavior);
}

/// Opaque handle for an observed element, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementKey(pub u64);

/// Parameters of an intersection observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
}

/// One notification from the intersection primitive.
///
/// `is_intersecting` is the host's verdict and the only field the engine
/// acts on: true once the target crossed the observation threshold. The
/// browser sets it on any overlap when the threshold crossing fires;
/// [`crate::intersection::SoftwareObserver`] sets it when `ratio` reaches the
/// threshold. `ratio` is informational.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub target: ElementKey,
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// Viewport-intersection notification primitive.
///
/// Entries are delivered back to the engine by the host (see
/// [`crate::reveal::RevealSet::dispatch`]); this trait only manages which
/// targets are watched.
pub trait IntersectionHost {
    /// Start watching `target`. Returns
    /// [`FolioError::IntersectionUnavailable`] when the host has no such
    /// primitive.
    fn observe(&mut self, target: ElementKey, options: &ObserverOptions) -> Result<(), FolioError>;

    fn unobserve(&mut self, target: ElementKey);
}

/// Host without intersection support. Every reveal it sees fails open.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIntersection;

impl IntersectionHost for NoIntersection {
    fn observe(
        &mut self,
        _target: ElementKey,
        _options: &ObserverOptions,
    ) -> Result<(), FolioError> {
        Err(FolioError::IntersectionUnavailable)
    }

    fn unobserve(&mut self, _target: ElementKey) {}
}
