//! Error types for the shell
//!
//! Construction of the window and renderer is the only place that can fail in a
//! way callers need to see. Per-frame failures are logged and the frame skipped.

use thiserror::Error;

/// Failures while bringing up the wgpu renderer for a window
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create a surface for the window: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request a device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
}

/// Top-level error for the shell
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("error creating renderer: {0}")]
    Render(#[from] RenderError),

    #[error("failed to create the native window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

pub type Result<T, E = ShellError> = std::result::Result<T, E>;
