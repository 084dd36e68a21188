use std::collections::HashSet;

use folio_protocol::ThemeToken;
use serde::{Deserialize, Serialize};

use crate::error::FolioError;

const SAMPLE: &str = include_str!("../../data/portfolio.json");

/// Everything shown on the page, in page order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub owner: Owner,
    pub hero: Hero,
    pub about: About,
    pub experiences: Vec<Experience>,
    pub skills: Vec<SkillGroup>,
    pub education: Vec<Degree>,
    #[serde(default)]
    pub leadership: Vec<LeadershipRole>,
    /// Closing blurb of the education section.
    #[serde(default)]
    pub research: Option<String>,
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    /// Letter shown in the navbar logo. Defaults to the first letter of the
    /// name.
    #[serde(default)]
    pub initial: Option<char>,
}

impl Owner {
    pub fn logo_initial(&self) -> char {
        self.initial
            .or_else(|| self.name.chars().find(|c| c.is_alphanumeric()))
            .unwrap_or('?')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    /// Availability badge, e.g. "Available for Opportunities".
    pub badge: Option<String>,
    pub headline: String,
    /// Second, highlighted headline line.
    pub headline_accent: Option<String>,
    pub tagline: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub cta_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
    pub eyebrow: String,
    pub statement: String,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub licenses: Vec<License>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub jurisdiction: String,
    pub status: String,
}

/// Category tag of an experience entry, rendered as its icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Activity,
    Heart,
    Thermometer,
    Stethoscope,
    Syringe,
}

impl Icon {
    /// Single-cell glyph for text renderers.
    pub fn glyph(self) -> char {
        match self {
            Icon::Activity => '∿',
            Icon::Heart => '♥',
            Icon::Thermometer => '⊺',
            Icon::Stethoscope => '⚕',
            Icon::Syringe => '✚',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: u32,
    pub role: String,
    pub institution: String,
    pub location: String,
    pub period: String,
    pub details: Vec<String>,
    pub icon: Icon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Clinical,
    Systems,
    Professional,
}

impl SkillCategory {
    pub fn token(self) -> ThemeToken {
        match self {
            SkillCategory::Clinical => ThemeToken::SkillClinical,
            SkillCategory::Systems => ThemeToken::SkillSystems,
            SkillCategory::Professional => ThemeToken::SkillProfessional,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: SkillCategory,
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Degree {
    pub degree: String,
    #[serde(default)]
    pub focus: Option<String>,
    pub institution: String,
    pub period: String,
    #[serde(default)]
    pub note: Option<String>,
    /// Still in progress; highlighted on the timeline.
    #[serde(default)]
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadershipRole {
    pub role: String,
    pub years: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub heading: String,
    pub pitch: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: String,
    #[serde(default)]
    pub relocation: Option<String>,
}

impl Contact {
    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email)
    }

    pub fn tel(&self) -> Option<String> {
        self.phone
            .as_ref()
            .map(|p| format!("tel:{}", p.replace(' ', "")))
    }
}

impl Portfolio {
    /// Parse and validate a JSON document.
    pub fn from_json(data: &[u8]) -> Result<Self, FolioError> {
        let portfolio: Portfolio = serde_json::from_slice(data)?;
        portfolio.validate()?;
        Ok(portfolio)
    }

    /// The demo document bundled with the crate.
    pub fn sample() -> Result<Self, FolioError> {
        Self::from_json(SAMPLE.as_bytes())
    }

    pub fn validate(&self) -> Result<(), FolioError> {
        if self.owner.name.trim().is_empty() {
            return Err(FolioError::Content("owner name is empty".into()));
        }

        let mut ids = HashSet::new();
        for exp in &self.experiences {
            if !ids.insert(exp.id) {
                return Err(FolioError::Content(format!(
                    "duplicate experience id {}",
                    exp.id
                )));
            }
        }

        if let Some(group) = self.skills.iter().find(|g| g.items.is_empty()) {
            return Err(FolioError::Content(format!(
                "skill group '{}' has no items",
                group.title
            )));
        }

        if self.contact.email.trim().is_empty() {
            return Err(FolioError::Content("contact email is empty".into()));
        }
        Ok(())
    }

    /// Footer line, e.g. `© 2026 Camille Laurent. All rights reserved.`
    pub fn copyright(&self, year: i32) -> String {
        format!("© {year} {}. All rights reserved.", self.owner.name)
    }
}
