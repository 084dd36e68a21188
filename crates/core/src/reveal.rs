use std::collections::BTreeMap;

use folio_protocol::RevealStyle;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::RevealConfig;
use crate::host::{ElementKey, IntersectionEntry, IntersectionHost, ObserverOptions};

/// One-way latch of a reveal-animated element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealState {
    /// Waiting for the element to scroll into view.
    Pending,
    /// Shown. Never leaves this state.
    Triggered,
}

/// What a notification did to a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// This entry flipped the latch.
    Triggered,
    /// Not intersecting yet.
    StillPending,
    /// Already triggered or unmounted; nothing was done.
    Ignored,
}

/// Defers an element's entrance animation until it scrolls into view,
/// firing at most once.
#[derive(Debug, Clone)]
pub struct RevealController {
    key: ElementKey,
    delay_ms: u32,
    state: RevealState,
    observing: bool,
}

impl RevealController {
    /// Start observing `key`. If the host has no intersection primitive the
    /// element is revealed right away instead of staying hidden forever.
    pub fn mount<H>(key: ElementKey, delay_ms: u32, config: &RevealConfig, host: &mut H) -> Self
    where
        H: IntersectionHost + ?Sized,
    {
        let options = ObserverOptions {
            threshold: config.threshold,
            root_margin: config.root_margin,
        };
        match host.observe(key, &options) {
            Ok(()) => Self {
                key,
                delay_ms,
                state: RevealState::Pending,
                observing: true,
            },
            Err(err) => {
                warn!(?key, %err, "cannot observe element, revealing immediately");
                Self {
                    key,
                    delay_ms,
                    state: RevealState::Triggered,
                    observing: false,
                }
            }
        }
    }

    /// Handle one notification for this element.
    pub fn on_intersection<H>(&mut self, entry: &IntersectionEntry, host: &mut H) -> RevealOutcome
    where
        H: IntersectionHost + ?Sized,
    {
        if self.state == RevealState::Triggered || !self.observing {
            trace!(key = ?self.key, "ignoring intersection entry");
            return RevealOutcome::Ignored;
        }
        if !entry.is_intersecting {
            return RevealOutcome::StillPending;
        }

        self.state = RevealState::Triggered;
        host.unobserve(self.key);
        self.observing = false;
        debug!(key = ?self.key, ratio = entry.ratio, "revealed");
        RevealOutcome::Triggered
    }

    /// Stop observing if still observing. Safe to call more than once.
    pub fn unmount<H>(&mut self, host: &mut H)
    where
        H: IntersectionHost + ?Sized,
    {
        if self.observing {
            host.unobserve(self.key);
            self.observing = false;
        }
    }

    pub fn key(&self) -> ElementKey {
        self.key
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == RevealState::Triggered
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Target style for the current state. Depends only on the state, the
    /// delay and the config.
    pub fn style(&self, config: &RevealConfig) -> RevealStyle {
        match self.state {
            RevealState::Pending => hidden_style(self.delay_ms, config),
            RevealState::Triggered => shown_style(self.delay_ms, config),
        }
    }
}

pub fn hidden_style(delay_ms: u32, config: &RevealConfig) -> RevealStyle {
    RevealStyle {
        opacity: 0.0,
        translate_y: config.hidden_offset,
        duration_ms: config.duration_ms,
        delay_ms,
        easing: config.easing,
    }
}

pub fn shown_style(delay_ms: u32, config: &RevealConfig) -> RevealStyle {
    RevealStyle {
        opacity: 1.0,
        translate_y: 0.0,
        duration_ms: config.duration_ms,
        delay_ms,
        easing: config.easing,
    }
}

/// Delay for the `index`-th of a run of sibling elements.
pub fn stagger(index: usize, step_ms: u32) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_mul(step_ms)
}

/// All reveal controllers of one page view.
#[derive(Debug, Clone)]
pub struct RevealSet {
    config: RevealConfig,
    controllers: BTreeMap<ElementKey, RevealController>,
    next_key: u64,
}

impl RevealSet {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            controllers: BTreeMap::new(),
            next_key: 0,
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Mount a controller under a freshly assigned key.
    pub fn register<H>(&mut self, delay_ms: u32, host: &mut H) -> ElementKey
    where
        H: IntersectionHost + ?Sized,
    {
        let key = ElementKey(self.next_key);
        self.next_key += 1;
        let controller = RevealController::mount(key, delay_ms, &self.config, host);
        self.controllers.insert(key, controller);
        key
    }

    /// Route a batch of notifications. Returns the keys revealed by it.
    pub fn dispatch<H>(&mut self, entries: &[IntersectionEntry], host: &mut H) -> Vec<ElementKey>
    where
        H: IntersectionHost + ?Sized,
    {
        let mut revealed = Vec::new();
        for entry in entries {
            let Some(controller) = self.controllers.get_mut(&entry.target) else {
                trace!(element = ?entry.target, "entry for unknown element");
                continue;
            };
            if controller.on_intersection(entry, host) == RevealOutcome::Triggered {
                revealed.push(entry.target);
            }
        }
        revealed
    }

    /// Unmount and forget one element.
    pub fn remove<H>(&mut self, key: ElementKey, host: &mut H) -> Option<RevealController>
    where
        H: IntersectionHost + ?Sized,
    {
        let mut controller = self.controllers.remove(&key)?;
        controller.unmount(host);
        Some(controller)
    }

    pub fn unmount_all<H>(&mut self, host: &mut H)
    where
        H: IntersectionHost + ?Sized,
    {
        for controller in self.controllers.values_mut() {
            controller.unmount(host);
        }
        self.controllers.clear();
    }

    pub fn get(&self, key: ElementKey) -> Option<&RevealController> {
        self.controllers.get(&key)
    }

    pub fn style(&self, key: ElementKey) -> Option<RevealStyle> {
        self.get(key).map(|c| c.style(&self.config))
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.controllers.values().filter(|c| c.is_visible()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolioError;
    use crate::host::NoIntersection;
    use crate::intersection::SoftwareObserver;

    /// Records every observe/unobserve call.
    #[derive(Default)]
    struct SpyHost {
        observed: Vec<ElementKey>,
        unobserved: Vec<ElementKey>,
    }

    impl IntersectionHost for SpyHost {
        fn observe(
            &mut self,
            target: ElementKey,
            _options: &ObserverOptions,
        ) -> Result<(), FolioError> {
            self.observed.push(target);
            Ok(())
        }

        fn unobserve(&mut self, target: ElementKey) {
            self.unobserved.push(target);
        }
    }

    fn entry(key: ElementKey, is_intersecting: bool) -> IntersectionEntry {
        IntersectionEntry {
            target: key,
            is_intersecting,
            ratio: if is_intersecting { 0.5 } else { 0.0 },
        }
    }

    #[test]
    fn starts_hidden_and_observing() {
        let mut host = SpyHost::default();
        let config = RevealConfig::default();
        let reveal = RevealController::mount(ElementKey(3), 200, &config, &mut host);
        assert_eq!(reveal.state(), RevealState::Pending);
        assert!(reveal.is_observing());
        assert_eq!(host.observed, vec![ElementKey(3)]);

        let style = reveal.style(&config);
        assert_eq!(style.opacity, 0.0);
        assert_eq!(style.translate_y, 48.0);
        assert_eq!(style.delay_ms, 200);
    }

    #[test]
    fn first_intersection_latches_and_unobserves() {
        let mut host = SpyHost::default();
        let config = RevealConfig::default();
        let key = ElementKey(1);
        let mut reveal = RevealController::mount(key, 0, &config, &mut host);

        assert_eq!(
            reveal.on_intersection(&entry(key, false), &mut host),
            RevealOutcome::StillPending
        );
        assert_eq!(
            reveal.on_intersection(&entry(key, true), &mut host),
            RevealOutcome::Triggered
        );
        assert!(reveal.is_visible());
        assert_eq!(host.unobserved, vec![key]);

        // Leaving the viewport afterwards changes nothing.
        assert_eq!(
            reveal.on_intersection(&entry(key, false), &mut host),
            RevealOutcome::Ignored
        );
        assert_eq!(
            reveal.on_intersection(&entry(key, true), &mut host),
            RevealOutcome::Ignored
        );
        assert!(reveal.is_visible());
        assert_eq!(host.unobserved.len(), 1);

        let style = reveal.style(&config);
        assert_eq!(style.opacity, 1.0);
        assert_eq!(style.translate_y, 0.0);
    }

    #[test]
    fn host_verdict_decides_regardless_of_ratio() {
        let mut host = SpyHost::default();
        let config = RevealConfig::default();
        let key = ElementKey(4);
        let mut reveal = RevealController::mount(key, 0, &config, &mut host);

        let full_but_not_intersecting = IntersectionEntry {
            target: key,
            is_intersecting: false,
            ratio: 1.0,
        };
        assert_eq!(
            reveal.on_intersection(&full_but_not_intersecting, &mut host),
            RevealOutcome::StillPending
        );

        let sliver = IntersectionEntry {
            target: key,
            is_intersecting: true,
            ratio: 0.01,
        };
        assert_eq!(
            reveal.on_intersection(&sliver, &mut host),
            RevealOutcome::Triggered
        );
    }

    #[test]
    fn unmount_after_trigger_does_not_unobserve_twice() {
        let mut host = SpyHost::default();
        let key = ElementKey(1);
        let mut reveal = RevealController::mount(key, 0, &RevealConfig::default(), &mut host);
        reveal.on_intersection(&entry(key, true), &mut host);
        reveal.unmount(&mut host);
        reveal.unmount(&mut host);
        assert_eq!(host.unobserved, vec![key]);
    }

    #[test]
    fn unmount_before_trigger_stops_observation() {
        let mut host = SpyHost::default();
        let key = ElementKey(4);
        let mut reveal = RevealController::mount(key, 0, &RevealConfig::default(), &mut host);
        reveal.unmount(&mut host);
        assert_eq!(host.unobserved, vec![key]);
        assert!(!reveal.is_observing());

        // A late callback after teardown is dropped.
        assert_eq!(
            reveal.on_intersection(&entry(key, true), &mut host),
            RevealOutcome::Ignored
        );
        assert!(!reveal.is_visible());
    }

    #[test]
    fn fails_open_without_intersection_support() {
        let config = RevealConfig::default();
        let reveal = RevealController::mount(ElementKey(0), 0, &config, &mut NoIntersection);
        assert!(reveal.is_visible());
        assert!(!reveal.is_observing());
    }

    #[test]
    fn delay_does_not_affect_triggering() {
        let mut host = SpyHost::default();
        let config = RevealConfig::default();
        let mut slow = RevealController::mount(ElementKey(1), 5_000, &config, &mut host);
        let mut fast = RevealController::mount(ElementKey(2), 0, &config, &mut host);
        slow.on_intersection(&entry(ElementKey(1), true), &mut host);
        fast.on_intersection(&entry(ElementKey(2), true), &mut host);
        assert!(slow.is_visible() && fast.is_visible());
        assert_eq!(slow.style(&config).delay_ms, 5_000);
    }

    #[test]
    fn stagger_multiplies_index() {
        assert_eq!(stagger(0, 100), 0);
        assert_eq!(stagger(3, 100), 300);
        assert_eq!(stagger(usize::MAX, 100), u32::MAX);
    }

    #[test]
    fn set_dispatches_by_key() {
        let mut host = SoftwareObserver::new();
        let mut set = RevealSet::new(RevealConfig::default());
        let a = set.register(0, &mut host);
        let b = set.register(100, &mut host);
        assert_ne!(a, b);
        assert_eq!(host.observed_count(), 2);

        let revealed = set.dispatch(
            &[entry(a, true), entry(b, false), entry(ElementKey(99), true)],
            &mut host,
        );
        assert_eq!(revealed, vec![a]);
        assert_eq!(set.visible_count(), 1);
        assert!(!host.is_observing(a));
        assert!(host.is_observing(b));

        set.unmount_all(&mut host);
        assert!(set.is_empty());
        assert_eq!(host.observed_count(), 0);
    }

    #[test]
    fn remove_unmounts_single_element() {
        let mut host = SoftwareObserver::new();
        let mut set = RevealSet::new(RevealConfig::default());
        let a = set.register(0, &mut host);
        let removed = set.remove(a, &mut host).unwrap();
        assert!(!removed.is_observing());
        assert!(set.get(a).is_none());
        assert!(set.remove(a, &mut host).is_none());
    }
}
