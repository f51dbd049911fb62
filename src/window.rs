//! The shell window
//!
//! [`Window`] owns the native window, its renderer and the ImGui front-end, and
//! draws the menu bar and panels on every [`Window::update`].

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::{Window as NativeWindow, WindowAttributes, WindowId},
};

use crate::app::ShellEvent;
use crate::config::{AppConfig, WindowSettings};
use crate::dpi::dpi_aware_window_size;
use crate::error::Result;
use crate::gfx::RenderEngine;
use crate::profile_scope;
use crate::resources::{user_config_path, Resources};
use crate::ui::{
    manager::ini_path_in,
    panel::{draw_shell_ui, DebugInfo, MenuAction, PanelState},
    UiManager, UiSettings,
};

/// Directory name used for per-user settings
pub const APP_NAME: &str = "imshell";

/// What a window event means to the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    Close,
    Minimize,
    Show,
}

/// Maps a winit event onto the close/minimize/shown callbacks
///
/// winit has no dedicated minimize or restore events: a zero-sized resize or an
/// occlusion counts as minimized, a non-zero resize or un-occlusion as shown.
pub fn classify_window_event(event: &WindowEvent) -> Option<WindowAction> {
    match event {
        WindowEvent::CloseRequested => Some(WindowAction::Close),
        WindowEvent::Resized(PhysicalSize { width, height }) => {
            if *width == 0 || *height == 0 {
                Some(WindowAction::Minimize)
            } else {
                Some(WindowAction::Show)
            }
        }
        WindowEvent::Occluded(true) => Some(WindowAction::Minimize),
        WindowEvent::Occluded(false) => Some(WindowAction::Show),
        _ => None,
    }
}

/// Mutable UI state of the window: the minimized flag and panel visibility
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowState {
    pub minimized: bool,
    pub panels: PanelState,
}

impl WindowState {
    pub fn on_minimize(&mut self) {
        self.minimized = true;
    }

    pub fn on_shown(&mut self) {
        self.minimized = false;
    }
}

/// Native window, renderer and ImGui front-end
pub struct Window {
    // Fields drop in order: UI backends, then the renderer, then the window
    ui_manager: UiManager,
    render_engine: RenderEngine,
    window: Arc<NativeWindow>,
    settings: WindowSettings,
    user_config_path: PathBuf,
    proxy: EventLoopProxy<ShellEvent>,
    state: WindowState,
}

impl Window {
    /// Creates the native window, its renderer and the ImGui context
    ///
    /// The requested size is scaled by the primary display's scale factor.
    ///
    /// # Errors
    /// Fails when the native window or the renderer cannot be created. A
    /// renderer failure is also logged.
    pub fn new(
        event_loop: &ActiveEventLoop,
        proxy: EventLoopProxy<ShellEvent>,
        config: &AppConfig,
    ) -> Result<Self> {
        profile_scope!("Window::new");

        let display_scale = event_loop
            .primary_monitor()
            .map(|monitor| monitor.scale_factor())
            .unwrap_or(1.0);
        let settings = dpi_aware_window_size(&config.window, display_scale);

        let attributes = WindowAttributes::default()
            .with_title(settings.title.clone())
            .with_inner_size(PhysicalSize::new(settings.width, settings.height))
            .with_resizable(true);
        let window = Arc::new(event_loop.create_window(attributes)?);
        log::info!(
            "Created window '{}' ({}x{}, scale {})",
            settings.title,
            settings.width,
            settings.height,
            window.scale_factor()
        );

        let (width, height) = window.inner_size().into();
        let render_engine =
            match pollster::block_on(RenderEngine::new(window.clone(), width, height)) {
                Ok(render_engine) => render_engine,
                Err(e) => {
                    log::error!("Error creating renderer: {}", e);
                    return Err(e.into());
                }
            };

        let config_path =
            match user_config_path(APP_NAME, config.paths.config_dir.as_deref()) {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("No user config directory ({}), UI layout will not be saved", e);
                    None
                }
            };

        let resources = Resources::new(&config.paths.assets_dir);
        let ui_settings = UiSettings {
            ini_path: config_path.as_deref().map(ini_path_in),
            font_path: resources.font_path(&config.ui.font),
            font_size: config.ui.font_size,
        };

        let ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
            &ui_settings,
        );

        Ok(Self {
            ui_manager,
            render_engine,
            window,
            settings,
            user_config_path: config_path.unwrap_or_default(),
            proxy,
            state: WindowState::default(),
        })
    }

    /// Builds and presents one frame of UI
    pub fn update(&mut self) {
        profile_scope!("Window::update");

        let info = self.debug_info();
        let minimized = self.state.minimized;
        let panels = &mut self.state.panels;
        let mut action = MenuAction::None;

        self.ui_manager.update_logic(&self.window, |ui| {
            action = draw_shell_ui(ui, panels, &info, minimized);
        });

        // Zero-sized surfaces cannot be presented
        let presented = !minimized && {
            let ui_manager = &mut self.ui_manager;
            self.render_engine
                .render_frame(|device, queue, encoder, view| {
                    ui_manager.render(device, queue, encoder, view);
                })
        };
        if !presented {
            self.ui_manager.discard_frame();
        }

        if action == MenuAction::Exit {
            self.on_close();
        }
    }

    pub fn on_minimize(&mut self) {
        profile_scope!("Window::on_minimize");
        log::debug!("Window minimized");
        self.state.on_minimize();
    }

    pub fn on_shown(&mut self) {
        profile_scope!("Window::on_shown");
        if self.state.minimized {
            log::debug!("Window shown");
        }
        self.state.on_shown();
    }

    /// Pushes a quit event onto the event loop's queue
    pub fn on_close(&self) {
        profile_scope!("Window::on_close");
        if self.proxy.send_event(ShellEvent::Quit).is_err() {
            log::warn!("Event loop already closed, dropping quit request");
        }
    }

    /// Dispatches close, minimize and shown events; anything else is ignored
    pub fn on_event(&mut self, event: &WindowEvent) {
        profile_scope!("Window::on_event");
        match classify_window_event(event) {
            Some(WindowAction::Close) => self.on_close(),
            Some(WindowAction::Minimize) => self.on_minimize(),
            Some(WindowAction::Show) => self.on_shown(),
            None => {}
        }
    }

    /// Feeds an event to ImGui
    pub fn handle_input(&mut self, window_id: WindowId, event: &WindowEvent) {
        self.ui_manager.handle_input(&self.window, window_id, event);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.render_engine.resize(width, height);
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub fn native_window(&self) -> &Arc<NativeWindow> {
        &self.window
    }

    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    pub fn is_minimized(&self) -> bool {
        self.state.minimized
    }

    pub fn debug_info(&self) -> DebugInfo {
        DebugInfo {
            renderer_name: self.render_engine.renderer_name(),
            user_config_path: self.user_config_path.clone(),
            font_global_scale: self.ui_manager.font_global_scale(),
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        profile_scope!("Window::drop");
        log::debug!("Destroying window '{}'", self.settings.title);
    }
}
