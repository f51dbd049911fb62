// src/lib.rs
//! imshell
//!
//! A thin application-window shell: a winit window, a wgpu renderer and a
//! Dear ImGui front-end with a main menu bar and a few diagnostic panels.

pub mod profiling;

pub mod app;
pub mod config;
pub mod dpi;
pub mod error;
pub mod gfx;
pub mod resources;
pub mod ui;
pub mod window;

// Re-export main types for convenience
pub use app::{App, ShellEvent};
pub use config::{AppConfig, WindowSettings};
pub use error::{RenderError, ShellError};
pub use window::Window;
