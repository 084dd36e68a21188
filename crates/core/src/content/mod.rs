//! Static page content.
//!
//! Content is loaded once, validated, and then only read by renderers. The
//! engine itself never looks at it.

mod portfolio;

pub use portfolio::{
    About, Contact, Degree, Experience, Hero, Icon, LeadershipRole, License, Owner, Portfolio,
    SkillCategory, SkillGroup,
};
