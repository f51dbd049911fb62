//! WGPU renderer backing the shell window
//!
//! Owns the surface, device and queue. Each frame is a single pass that clears
//! to the background colour, followed by whatever the UI callback records.

use std::{iter, sync::Arc};

use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::window::Window;

use crate::error::RenderError;
use crate::profile_scope;

/// Background colour behind the UI, RGB (100, 100, 100)
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 100.0 / 255.0,
    g: 100.0 / 255.0,
    b: 100.0 / 255.0,
    a: 1.0,
};

/// Core rendering engine managing the window surface and GPU handles
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    adapter_info: wgpu::AdapterInfo,
}

impl RenderEngine {
    /// Creates a renderer for `window` with vsync presentation
    ///
    /// # Errors
    /// Fails if no surface, adapter or device can be created for the window.
    pub async fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        // ImGui's wgpu backend expects a linear target
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let adapter_info = adapter.get_info();
        log::info!(
            "Renderer ready: {} ({:?}), surface format {:?}",
            adapter_info.name,
            adapter_info.backend,
            format
        );

        Ok(Self {
            surface,
            device: device.into(),
            queue: queue.into(),
            config,
            format,
            adapter_info,
        })
    }

    /// Clears the frame, lets `ui_callback` record its pass, then presents
    ///
    /// Returns false when no frame could be acquired; `ui_callback` is not run
    /// in that case. A lost or outdated surface is reconfigured.
    pub fn render_frame<F>(&mut self, ui_callback: F) -> bool
    where
        F: FnOnce(&Device, &Queue, &mut CommandEncoder, &TextureView),
    {
        profile_scope!("RenderEngine::render_frame");

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return false;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring the next surface texture");
                return false;
            }
            Err(e) => {
                log::error!("Failed to acquire surface texture: {}", e);
                return false;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor {
                format: Some(self.format),
                ..Default::default()
            });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let _clear_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
        }

        ui_callback(
            &self.device,
            &self.queue,
            &mut encoder,
            &surface_texture_view,
        );

        self.queue.submit(iter::once(encoder.finish()));
        surface_texture.present();
        true
    }

    /// Reconfigures the surface; zero sizes (minimized windows) are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Human readable renderer name, e.g. `"NVIDIA GeForce RTX 3070 (Vulkan)"`
    pub fn renderer_name(&self) -> String {
        format!("{} ({:?})", self.adapter_info.name, self.adapter_info.backend)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }
}
