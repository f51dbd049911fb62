// src/ui/manager.rs
//! ImGui UI manager for the shell window
//!
//! Handles ImGui integration with wgpu and winit, providing context setup
//! (fonts, INI path, config flags), frame management, input handling and
//! rendering of the UI overlay.

use imgui::{ConfigFlags, Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::path::{Path, PathBuf};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

use crate::dpi::sanitize_scale;
use crate::profile_scope;

/// What the UI context is set up with
#[derive(Debug, Clone)]
pub struct UiSettings {
    /// Layout persistence file; `None` disables it
    pub ini_path: Option<PathBuf>,
    pub font_path: PathBuf,
    /// Font size in logical pixels
    pub font_size: f32,
}

/// Which font ended up in the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadedFont {
    File,
    BuiltIn,
}

/// Applies config flags, INI path and fonts to a fresh context
///
/// Fonts are rasterized at `font_size * display_scale` and drawn with a global
/// scale of `1 / display_scale`, which keeps text crisp on high-density
/// displays. A missing or unreadable font file falls back to ImGui's built-in
/// font at the same size.
pub fn configure_context(
    context: &mut Context,
    settings: &UiSettings,
    display_scale: f64,
) -> LoadedFont {
    let scale = sanitize_scale(display_scale) as f32;

    context.io_mut().config_flags |= ConfigFlags::NAV_ENABLE_KEYBOARD | ConfigFlags::DOCKING_ENABLE;

    // Absolute path keeps the layout independent of the working directory
    context.set_ini_filename(settings.ini_path.clone());

    let font_size = settings.font_size * scale;
    let loaded = match std::fs::read(&settings.font_path) {
        Ok(data) => {
            context.fonts().add_font(&[FontSource::TtfData {
                data: &data,
                size_pixels: font_size,
                config: Some(font_config(font_size)),
            }]);
            LoadedFont::File
        }
        Err(e) => {
            log::warn!(
                "Could not load font {}: {}. Using the built-in font",
                settings.font_path.display(),
                e
            );
            context.fonts().add_font(&[FontSource::DefaultFontData {
                config: Some(font_config(font_size)),
            }]);
            LoadedFont::BuiltIn
        }
    };

    context.io_mut().font_global_scale = 1.0 / scale;
    loaded
}

fn font_config(size_pixels: f32) -> FontConfig {
    FontConfig {
        oversample_h: 1,
        pixel_snap_h: true,
        size_pixels,
        ..Default::default()
    }
}

/// ImGui UI manager
///
/// Manages ImGui context, platform integration, and rendering pipeline.
/// Handles input capture, frame timing and cursor updates.
pub struct UiManager {
    pub context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Creates a new UI manager
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating renderer resources
    /// * `queue` - WGPU queue for renderer operations
    /// * `output_color_format` - Target texture format for rendering
    /// * `window` - Window for platform integration
    /// * `settings` - INI path and font
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
        settings: &UiSettings,
    ) -> Self {
        profile_scope!("UiManager::new");

        let mut context = Context::create();
        let loaded = configure_context(&mut context, settings, window.scale_factor());
        log::debug!(
            "ImGui context created ({:?} font, global scale {})",
            loaded,
            context.io().font_global_scale
        );

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Default);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    /// Forwards a window event to ImGui
    pub fn handle_input(&mut self, window: &Window, window_id: WindowId, event: &WindowEvent) {
        let event: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.platform
            .handle_event(self.context.io_mut(), window, &event);
    }

    /// Prepares a new ImGui frame and runs `run_ui` to build it
    ///
    /// Must be followed by [`UiManager::render`] before the next call.
    pub fn update_logic<F>(&mut self, window: &Window, run_ui: F)
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(e) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("Failed to prepare ImGui frame: {}", e);
        }

        let ui = self.context.new_frame();
        run_ui(ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }
    }

    /// Renders the UI built in the last `update_logic()` call onto `color_attachment`
    ///
    /// Uses `LoadOp::Load` so the cleared background is kept.
    pub fn render(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        color_attachment: &TextureView,
    ) {
        let draw_data = self.context.render();

        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("imgui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(e) = self
            .renderer
            .render(draw_data, queue, device, &mut render_pass)
        {
            log::error!("Failed to render ImGui: {}", e);
        }
    }

    /// Finishes a frame that will not be presented (e.g. while minimized)
    pub fn discard_frame(&mut self) {
        let _ = self.context.render();
    }

    pub fn font_global_scale(&self) -> f32 {
        self.context.io().font_global_scale
    }
}

/// `<config dir>/imgui.ini`
pub fn ini_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join("imgui.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn settings(font_path: &str) -> UiSettings {
        UiSettings {
            ini_path: None,
            font_path: PathBuf::from(font_path),
            font_size: 18.0,
        }
    }

    #[test]
    #[serial(imgui)]
    fn test_missing_font_falls_back_to_builtin() {
        let mut context = Context::create();
        let loaded = configure_context(&mut context, &settings("/nonexistent/Manrope.ttf"), 1.0);

        assert_eq!(loaded, LoadedFont::BuiltIn);
        assert_eq!(context.fonts().fonts().len(), 1);
    }

    #[test]
    #[serial(imgui)]
    fn test_font_global_scale_is_inverse_of_display_scale() {
        let mut context = Context::create();
        configure_context(&mut context, &settings("/nonexistent/Manrope.ttf"), 2.0);
        assert_eq!(context.io().font_global_scale, 0.5);
    }

    #[test]
    #[serial(imgui)]
    fn test_invalid_display_scale_is_treated_as_one() {
        let mut context = Context::create();
        configure_context(&mut context, &settings("/nonexistent/Manrope.ttf"), 0.0);
        assert_eq!(context.io().font_global_scale, 1.0);
    }

    #[test]
    #[serial(imgui)]
    fn test_config_flags_and_ini_path() {
        let mut context = Context::create();
        let mut ui_settings = settings("/nonexistent/Manrope.ttf");
        ui_settings.ini_path = Some(ini_path_in(Path::new("/home/user/.config/App")));

        configure_context(&mut context, &ui_settings, 1.0);

        let flags = context.io().config_flags;
        assert!(flags.contains(ConfigFlags::NAV_ENABLE_KEYBOARD));
        assert!(flags.contains(ConfigFlags::DOCKING_ENABLE));
        assert_eq!(
            context.ini_filename(),
            Some(PathBuf::from("/home/user/.config/App/imgui.ini"))
        );
    }
}
