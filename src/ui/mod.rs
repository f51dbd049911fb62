//! # User Interface Module
//!
//! Dear ImGui front-end for the shell window.
//!
//! - [`UiManager`] - ImGui context, fonts, INI path, winit/wgpu backends
//! - [`panel`] - main menu bar plus the "Some", demo and debug panels
//!
//! Text is rasterized at the display's pixel density and scaled back down with
//! ImGui's global font scale, so it stays sharp on high-density displays.

pub mod manager;
pub mod panel;

pub use manager::{UiManager, UiSettings};
pub use panel::{DebugInfo, MenuAction, PanelState};
