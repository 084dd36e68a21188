use folio_protocol::Easing;

/// Smooth-scroll default duration for hosts that animate scrolling
/// themselves.
pub const SMOOTH_SCROLL_MS: f64 = 600.0;

/// An in-flight animated scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub from: f64,
    pub to: f64,
    pub started_at_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl ScrollAnimation {
    pub fn new(from: f64, to: f64, started_at_ms: f64) -> Self {
        Self {
            from,
            to,
            started_at_ms,
            duration_ms: SMOOTH_SCROLL_MS,
            easing: Easing::EaseInOut,
        }
    }

    /// Scroll offset at time `now_ms`.
    pub fn offset_at(&self, now_ms: f64) -> f64 {
        if self.is_finished(now_ms) {
            return self.to;
        }
        let t = ((now_ms - self.started_at_ms) / self.duration_ms).max(0.0);
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.duration_ms <= 0.0 || now_ms - self.started_at_ms >= self.duration_ms
    }

    /// Retarget mid-flight: the new animation starts from wherever this one
    /// currently is.
    pub fn redirect(&self, to: f64, now_ms: f64) -> ScrollAnimation {
        ScrollAnimation {
            from: self.offset_at(now_ms),
            to,
            started_at_ms: now_ms,
            ..*self
        }
    }
}

/// Drives an optional animation for a host's scroll position.
#[derive(Debug, Clone, Default)]
pub struct SmoothScroller {
    offset: f64,
    animation: Option<ScrollAnimation>,
}

impl SmoothScroller {
    pub fn new(offset: f64) -> Self {
        Self {
            offset,
            animation: None,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn target(&self) -> Option<f64> {
        self.animation.map(|a| a.to)
    }

    /// Start (or redirect) an animated scroll towards `to`.
    pub fn scroll_to(&mut self, to: f64, now_ms: f64) {
        self.animation = Some(match self.animation {
            Some(current) => current.redirect(to, now_ms),
            None => ScrollAnimation::new(self.offset, to, now_ms),
        });
    }

    /// Jump immediately, cancelling any animation. Used for user scrolling.
    pub fn jump_to(&mut self, to: f64) {
        self.animation = None;
        self.offset = to;
    }

    /// Advance to `now_ms`. Returns whether the offset moved.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        let next = animation.offset_at(now_ms);
        if animation.is_finished(now_ms) {
            self.animation = None;
        }
        let moved = (next - self.offset).abs() > f64::EPSILON;
        self.offset = next;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_reaches_target() {
        let anim = ScrollAnimation::new(0.0, 1000.0, 100.0);
        assert_eq!(anim.offset_at(100.0), 0.0);
        let mid = anim.offset_at(400.0);
        assert!(mid > 0.0 && mid < 1000.0);
        assert_eq!(anim.offset_at(700.0), 1000.0);
        assert!(anim.is_finished(700.0));
    }

    #[test]
    fn redirect_starts_from_current_position() {
        let anim = ScrollAnimation::new(0.0, 1000.0, 0.0);
        let here = anim.offset_at(300.0);
        let redirected = anim.redirect(200.0, 300.0);
        assert_eq!(redirected.from, here);
        assert_eq!(redirected.to, 200.0);
        assert_eq!(redirected.offset_at(300.0), here);
    }

    #[test]
    fn scroller_ticks_until_done() {
        let mut scroller = SmoothScroller::new(0.0);
        scroller.scroll_to(500.0, 0.0);
        assert!(scroller.is_animating());
        assert!(scroller.tick(200.0));
        assert!(scroller.offset() > 0.0);
        scroller.tick(1_000.0);
        assert_eq!(scroller.offset(), 500.0);
        assert!(!scroller.is_animating());
        assert!(!scroller.tick(1_100.0));
    }

    #[test]
    fn second_request_redirects_immediately() {
        let mut scroller = SmoothScroller::new(0.0);
        scroller.scroll_to(2_000.0, 0.0);
        scroller.tick(300.0);
        let here = scroller.offset();
        scroller.scroll_to(100.0, 300.0);
        assert_eq!(scroller.target(), Some(100.0));
        scroller.tick(300.0);
        assert_eq!(scroller.offset(), here);
        scroller.tick(900.0);
        assert_eq!(scroller.offset(), 100.0);
    }

    #[test]
    fn manual_scroll_cancels_animation() {
        let mut scroller = SmoothScroller::new(0.0);
        scroller.scroll_to(800.0, 0.0);
        scroller.jump_to(40.0);
        assert!(!scroller.is_animating());
        assert_eq!(scroller.offset(), 40.0);
    }
}
