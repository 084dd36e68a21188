use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the fixed named regions of the page.
///
/// Section identifiers double as DOM element ids (`<section id="about">`)
/// and as anchors for active-link highlighting. The declaration order is the
/// top-to-bottom page order and is the order the scroll spy checks them in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    #[default]
    Home,
    About,
    Experience,
    Skills,
    Education,
    Contact,
}

impl SectionId {
    /// All sections in page order.
    pub const ALL: [SectionId; 6] = [
        SectionId::Home,
        SectionId::About,
        SectionId::Experience,
        SectionId::Skills,
        SectionId::Education,
        SectionId::Contact,
    ];

    /// Sections that get a link in the navbar. Home is reached via the logo.
    pub const NAV_LINKS: [SectionId; 5] = [
        SectionId::About,
        SectionId::Experience,
        SectionId::Skills,
        SectionId::Education,
        SectionId::Contact,
    ];

    /// The element id used in the document.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::Home => "home",
            SectionId::About => "about",
            SectionId::Experience => "experience",
            SectionId::Skills => "skills",
            SectionId::Education => "education",
            SectionId::Contact => "contact",
        }
    }

    /// Human-readable link label.
    pub fn label(self) -> &'static str {
        match self {
            SectionId::Home => "Home",
            SectionId::About => "About",
            SectionId::Experience => "Experience",
            SectionId::Skills => "Skills",
            SectionId::Education => "Education",
            SectionId::Contact => "Contact",
        }
    }

    /// Position in page order.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown section: {0}")]
pub struct ParseSectionError(pub String);

impl FromStr for SectionId {
    type Err = ParseSectionError;

    /// Accepts the element id, case-insensitively, so navbar labels
    /// (`"Experience"`) resolve the same way the lowercased ids do.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSectionError(s.to_string()))
    }
}
