//! Host-agnostic engine behind the folio portfolio page.
//!
//! ```text
//!   host events ──▶ Listeners ──▶ PageView ──▶ NavigationController ──▶ PageState ──▶ render
//!   (scroll,                       │
//!    intersection,                 └──────▶ RevealSet / RevealController ──▶ RevealStyle
//!    click)
//! ```
//!
//! Hosts (the browser bridge, the terminal preview, test fakes) implement
//! the traits in [`host`] and feed events in; the engine never touches
//! markup directly.

pub mod config;
pub mod content;
pub mod error;
pub mod host;
pub mod intersection;
pub mod listener;
pub mod navigation;
pub mod page;
pub mod reveal;
pub mod scroll;

pub use config::{EngineConfig, NavigationConfig, RevealConfig};
pub use error::FolioError;
pub use navigation::{NavigationChange, NavigationController};
pub use page::PageView;
pub use reveal::{RevealController, RevealOutcome, RevealSet, RevealState};
