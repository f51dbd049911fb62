//! Graphics backend for the shell window

pub mod render_engine;

pub use render_engine::RenderEngine;
