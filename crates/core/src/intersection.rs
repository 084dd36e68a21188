//! Intersection math for hosts without a native observer.
//!
//! The browser bridge hands entries from `IntersectionObserver` straight to
//! the engine. Other hosts (the terminal preview, tests) measure rectangles
//! themselves and use [`SoftwareObserver`] to turn those measurements into
//! the same stream of entries.

use std::collections::BTreeMap;

use folio_protocol::{Rect, Viewport};

use crate::error::FolioError;
use crate::host::{ElementKey, IntersectionEntry, IntersectionHost, ObserverOptions};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Visible fraction of the target's area inside the root.
    pub ratio: f64,
    pub is_intersecting: bool,
}

/// Intersect a viewport-relative `target` with the observation root.
///
/// The root is the viewport adjusted by `options.root_margin`; a negative
/// bottom margin means content peeking in at the bottom edge does not count.
/// Zero-area targets report a ratio of 1.0 when they sit inside the root.
pub fn evaluate(target: Rect, viewport: Viewport, options: &ObserverOptions) -> Intersection {
    let root = options.root_margin.apply(viewport.rect());
    let Some(overlap) = target.intersection(&root) else {
        return Intersection {
            ratio: 0.0,
            is_intersecting: false,
        };
    };

    let area = target.area();
    let ratio = if area > 0.0 {
        (overlap.area() / area).clamp(0.0, 1.0)
    } else {
        1.0
    };

    Intersection {
        ratio,
        is_intersecting: ratio >= options.threshold,
    }
}

#[derive(Debug, Clone)]
struct Observed {
    options: ObserverOptions,
    /// Last reported state; `None` until the initial entry is delivered.
    last: Option<bool>,
}

/// Polling implementation of [`IntersectionHost`].
///
/// Like the browser primitive it reports every newly observed target once,
/// then only when its intersecting state flips.
#[derive(Debug, Clone)]
pub struct SoftwareObserver {
    targets: BTreeMap<ElementKey, Observed>,
    available: bool,
}

impl SoftwareObserver {
    pub fn new() -> Self {
        Self {
            targets: BTreeMap::new(),
            available: true,
        }
    }

    /// An observer that refuses every `observe` call, for exercising the
    /// fail-open path.
    pub fn unavailable() -> Self {
        Self {
            targets: BTreeMap::new(),
            available: false,
        }
    }

    pub fn is_observing(&self, key: ElementKey) -> bool {
        self.targets.contains_key(&key)
    }

    pub fn observed_count(&self) -> usize {
        self.targets.len()
    }

    /// Measure every observed target and return the entries that changed.
    ///
    /// `rect_of` returns the viewport-relative rectangle of a target, or
    /// `None` when it is not laid out; such targets are skipped.
    pub fn poll(
        &mut self,
        viewport: Viewport,
        mut rect_of: impl FnMut(ElementKey) -> Option<Rect>,
    ) -> Vec<IntersectionEntry> {
        let mut entries = Vec::new();
        for (key, observed) in &mut self.targets {
            let Some(rect) = rect_of(*key) else {
                continue;
            };
            let hit = evaluate(rect, viewport, &observed.options);
            if observed.last != Some(hit.is_intersecting) {
                observed.last = Some(hit.is_intersecting);
                entries.push(IntersectionEntry {
                    target: *key,
                    is_intersecting: hit.is_intersecting,
                    ratio: hit.ratio,
                });
            }
        }
        entries
    }
}

impl Default for SoftwareObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl IntersectionHost for SoftwareObserver {
    fn observe(&mut self, target: ElementKey, options: &ObserverOptions) -> Result<(), FolioError> {
        if !self.available {
            return Err(FolioError::IntersectionUnavailable);
        }
        self.targets.insert(
            target,
            Observed {
                options: *options,
                last: None,
            },
        );
        Ok(())
    }

    fn unobserve(&mut self, target: ElementKey) {
        self.targets.remove(&target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_protocol::RootMargin;

    fn options() -> ObserverOptions {
        ObserverOptions {
            threshold: 0.1,
            root_margin: RootMargin::new(0.0, 0.0, -50.0, 0.0),
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn fully_visible_target() {
        let hit = evaluate(Rect::new(0.0, 100.0, 800.0, 200.0), viewport(), &options());
        assert!(hit.is_intersecting);
        assert!((hit.ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bottom_margin_hides_peeking_target() {
        // Visible part sits entirely inside the bottom 50px of the viewport.
        let hit = evaluate(Rect::new(0.0, 560.0, 800.0, 200.0), viewport(), &options());
        assert!(!hit.is_intersecting);
    }

    #[test]
    fn below_threshold_is_not_intersecting() {
        // 15px of a 200px target inside the shrunk root: 7.5%.
        let hit = evaluate(Rect::new(0.0, 535.0, 800.0, 200.0), viewport(), &options());
        assert!(hit.ratio > 0.0);
        assert!(!hit.is_intersecting);

        // 30px: 15%.
        let hit = evaluate(Rect::new(0.0, 520.0, 800.0, 200.0), viewport(), &options());
        assert!(hit.is_intersecting);
    }

    #[test]
    fn target_above_viewport() {
        let hit = evaluate(Rect::new(0.0, -400.0, 800.0, 200.0), viewport(), &options());
        assert_eq!(hit.ratio, 0.0);
        assert!(!hit.is_intersecting);
    }

    #[test]
    fn zero_area_target_inside_root() {
        let hit = evaluate(Rect::new(10.0, 10.0, 0.0, 0.0), viewport(), &options());
        assert!(hit.is_intersecting);
    }

    #[test]
    fn poll_reports_initial_state_then_only_flips() {
        let mut observer = SoftwareObserver::new();
        let key = ElementKey(1);
        observer.observe(key, &options()).unwrap();

        let mut top = 900.0;
        let entries = observer.poll(viewport(), |_| Some(Rect::new(0.0, top, 800.0, 100.0)));
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_intersecting);

        top = 850.0;
        let entries = observer.poll(viewport(), |_| Some(Rect::new(0.0, top, 800.0, 100.0)));
        assert!(entries.is_empty());

        top = 300.0;
        let entries = observer.poll(viewport(), |_| Some(Rect::new(0.0, top, 800.0, 100.0)));
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_intersecting);
    }

    #[test]
    fn unobserved_targets_stay_quiet() {
        let mut observer = SoftwareObserver::new();
        let key = ElementKey(7);
        observer.observe(key, &options()).unwrap();
        observer.unobserve(key);
        assert!(!observer.is_observing(key));
        let entries = observer.poll(viewport(), |_| Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(entries.is_empty());
    }

    #[test]
    fn unavailable_observer_refuses() {
        let mut observer = SoftwareObserver::unavailable();
        let err = observer.observe(ElementKey(1), &options()).unwrap_err();
        assert!(matches!(err, FolioError::IntersectionUnavailable));
        assert_eq!(observer.observed_count(), 0);
    }
}
