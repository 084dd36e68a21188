use serde::{Deserialize, Serialize};

use crate::section::SectionId;

/// Page chrome state handed to the render surface after every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub scrolled: bool,
    pub active_section: SectionId,
    pub menu_open: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_for_javascript() {
        let state = PageState {
            scrolled: true,
            active_section: SectionId::About,
            menu_open: false,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(
            json,
            r#"{"scrolled":true,"activeSection":"about","menuOpen":false}"#
        );
    }
}
