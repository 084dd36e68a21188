use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the host's active palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Surface,
    SurfaceInverted,
    Border,

    TextPrimary,
    TextSecondary,
    TextMuted,
    TextInverted,

    Accent,
    AccentSoft,

    // Navbar
    NavbarTransparent,
    NavbarSolid,
    NavLink,
    NavLinkActive,
    MenuOverlay,
    MenuDivider,

    // Content
    BadgeBackground,
    TimelineDot,
    SkillClinical,
    SkillSystems,
    SkillProfessional,
    ButtonPrimary,
    ButtonSecondary,
}
