use std::collections::HashSet;

use folio_protocol::{Easing, RootMargin, SectionId};
use serde::{Deserialize, Serialize};

use crate::error::FolioError;

/// Tunables for the whole engine.
///
/// Every field has a default tuned for the stock page layout, so a JSON
/// config only needs to name what it overrides:
///
/// ```json
/// { "navigation": { "band_bottom": 240.0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub navigation: NavigationConfig,
    pub reveal: RevealConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Scroll offset (px) past which the navbar switches to scrolled mode.
    pub scrolled_threshold: f64,
    /// Upper edge of the active-section band, relative to the viewport top.
    pub band_top: f64,
    /// Lower edge of the active-section band.
    pub band_bottom: f64,
    /// Sections checked by the scroll spy, in priority order.
    pub sections: Vec<SectionId>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold: 50.0,
            band_top: 0.0,
            band_bottom: 300.0,
            sections: SectionId::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Fraction of the element's area that must be visible.
    pub threshold: f64,
    pub root_margin: RootMargin,
    /// How far below its resting place a hidden element sits (px).
    pub hidden_offset: f64,
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: RootMargin::new(0.0, 0.0, -50.0, 0.0),
            hidden_offset: 48.0,
            duration_ms: 1000,
            easing: Easing::EaseOut,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(data: &[u8]) -> Result<Self, FolioError> {
        let config: EngineConfig = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FolioError> {
        let nav = &self.navigation;
        if !nav.scrolled_threshold.is_finite() || nav.scrolled_threshold < 0.0 {
            return Err(FolioError::Config(format!(
                "scrolled_threshold must be a non-negative number, got {}",
                nav.scrolled_threshold
            )));
        }
        if !(nav.band_top.is_finite() && nav.band_bottom.is_finite())
            || nav.band_top > nav.band_bottom
        {
            return Err(FolioError::Config(format!(
                "active band [{}, {}] is empty",
                nav.band_top, nav.band_bottom
            )));
        }
        if nav.sections.is_empty() {
            return Err(FolioError::Config("section list is empty".into()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = nav.sections.iter().find(|s| !seen.insert(**s)) {
            return Err(FolioError::Config(format!("section {dup} listed twice")));
        }

        let reveal = &self.reveal;
        if !(0.0..=1.0).contains(&reveal.threshold) {
            return Err(FolioError::Config(format!(
                "reveal threshold must be within [0, 1], got {}",
                reveal.threshold
            )));
        }
        if reveal.duration_ms == 0 {
            return Err(FolioError::Config("reveal duration must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_layout() {
        let config = EngineConfig::default();
        assert_eq!(config.navigation.scrolled_threshold, 50.0);
        assert_eq!(config.navigation.band_bottom, 300.0);
        assert_eq!(config.navigation.sections.first(), Some(&SectionId::Home));
        assert_eq!(config.reveal.threshold, 0.1);
        assert_eq!(config.reveal.root_margin.bottom, -50.0);
        assert_eq!(config.reveal.duration_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config =
            EngineConfig::from_json(br#"{ "navigation": { "band_bottom": 240.0 } }"#).unwrap();
        assert_eq!(config.navigation.band_bottom, 240.0);
        assert_eq!(config.navigation.scrolled_threshold, 50.0);
        assert_eq!(config.reveal, RevealConfig::default());
    }

    #[test]
    fn rejects_inverted_band() {
        let err = EngineConfig::from_json(
            br#"{ "navigation": { "band_top": 400.0, "band_bottom": 300.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, FolioError::Config(_)));
    }

    #[test]
    fn rejects_duplicate_sections() {
        let err = EngineConfig::from_json(
            br#"{ "navigation": { "sections": ["home", "about", "home"] } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("home listed twice"));
    }

    #[test]
    fn rejects_unknown_section_names() {
        let err =
            EngineConfig::from_json(br#"{ "navigation": { "sections": ["blog"] } }"#).unwrap_err();
        assert!(matches!(err, FolioError::Json(_)));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut config = EngineConfig::default();
        config.reveal.threshold = 1.5;
        assert!(config.validate().is_err());
    }
}
