pub mod section;
pub mod state;
pub mod style;
pub mod theme;
pub mod types;

pub use section::{ParseSectionError, SectionId};
pub use state::PageState;
pub use style::{Easing, NavbarStyle, RevealStyle};
pub use theme::ThemeToken;
pub use types::{Rect, RootMargin, Viewport};
