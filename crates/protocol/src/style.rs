use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;

/// Timing curve of a CSS transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn css(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }

    /// Map linear progress `t` in `[0, 1]` to eased progress.
    ///
    /// Uses the same control points browsers use for the CSS keywords.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
        }
    }
}

/// Evaluate a CSS `cubic-bezier(x1, y1, x2, y2)` at horizontal position `x`.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    let bezier = |a: f64, b: f64, s: f64| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
    };

    // x(s) is monotonic for CSS curves, so bisection always converges.
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    let mut s = x;
    for _ in 0..32 {
        let estimate = bezier(x1, x2, s);
        if (estimate - x).abs() < 1e-7 {
            break;
        }
        if estimate < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier(y1, y2, s)
}

/// Visual state of a reveal-animated element.
///
/// Hosts that delegate animation to CSS apply [`RevealStyle::to_css`]; hosts
/// that animate themselves sample [`RevealStyle::interpolate`] every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealStyle {
    pub opacity: f64,
    /// Downward offset in pixels.
    pub translate_y: f64,
    pub duration_ms: u32,
    pub delay_ms: u32,
    pub easing: Easing,
}

impl RevealStyle {
    /// Eased fraction of the transition into this style that has completed
    /// `elapsed_ms` after the transition was started.
    pub fn progress_at(&self, elapsed_ms: f64) -> f64 {
        let running = elapsed_ms - f64::from(self.delay_ms);
        if running <= 0.0 {
            return 0.0;
        }
        if self.duration_ms == 0 {
            return 1.0;
        }
        self.easing.apply(running / f64::from(self.duration_ms))
    }

    /// The in-flight style `elapsed_ms` into a transition from `from` to
    /// `self`.
    pub fn interpolate(&self, from: &RevealStyle, elapsed_ms: f64) -> RevealStyle {
        let p = self.progress_at(elapsed_ms);
        RevealStyle {
            opacity: from.opacity + (self.opacity - from.opacity) * p,
            translate_y: from.translate_y + (self.translate_y - from.translate_y) * p,
            ..*self
        }
    }

    /// Inline style declaration.
    pub fn to_css(&self) -> String {
        format!(
            "opacity: {}; transform: translateY({}px); transition: all {}ms {} {}ms;",
            self.opacity,
            self.translate_y,
            self.duration_ms,
            self.easing.css(),
            self.delay_ms
        )
    }
}

/// Navbar chrome derived from the scrolled flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavbarStyle {
    pub background: ThemeToken,
    pub blur: bool,
    pub shadow: bool,
    /// Vertical padding in pixels.
    pub padding_y: f64,
    pub transition_ms: u32,
}

impl NavbarStyle {
    pub fn for_scrolled(scrolled: bool) -> Self {
        if scrolled {
            Self {
                background: ThemeToken::NavbarSolid,
                blur: true,
                shadow: true,
                padding_y: 16.0,
                transition_ms: 300,
            }
        } else {
            Self {
                background: ThemeToken::NavbarTransparent,
                blur: false,
                shadow: false,
                padding_y: 24.0,
                transition_ms: 300,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden() -> RevealStyle {
        RevealStyle {
            opacity: 0.0,
            translate_y: 48.0,
            duration_ms: 1000,
            delay_ms: 200,
            easing: Easing::EaseOut,
        }
    }

    fn shown() -> RevealStyle {
        RevealStyle {
            opacity: 1.0,
            translate_y: 0.0,
            ..hidden()
        }
    }

    #[test]
    fn easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseOut, Easing::EaseInOut] {
            assert!(easing.apply(0.0).abs() < 1e-6);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn ease_out_front_loads_progress() {
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!(Easing::EaseInOut.apply(0.25) < 0.25);
    }

    #[test]
    fn delay_holds_the_start_frame() {
        let frame = shown().interpolate(&hidden(), 150.0);
        assert_eq!(frame.opacity, 0.0);
        assert_eq!(frame.translate_y, 48.0);
    }

    #[test]
    fn transition_completes_after_delay_plus_duration() {
        let frame = shown().interpolate(&hidden(), 1200.0);
        assert!((frame.opacity - 1.0).abs() < 1e-6);
        assert!(frame.translate_y.abs() < 1e-6);

        let mid = shown().interpolate(&hidden(), 700.0);
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
    }

    #[test]
    fn css_carries_delay_and_curve() {
        let css = shown().to_css();
        assert!(css.contains("opacity: 1"));
        assert!(css.contains("1000ms ease-out 200ms"));
    }

    #[test]
    fn navbar_compacts_when_scrolled() {
        let top = NavbarStyle::for_scrolled(false);
        let scrolled = NavbarStyle::for_scrolled(true);
        assert_eq!(top.background, ThemeToken::NavbarTransparent);
        assert_eq!(scrolled.background, ThemeToken::NavbarSolid);
        assert!(scrolled.padding_y < top.padding_y);
        assert!(scrolled.shadow && scrolled.blur);
    }
}
