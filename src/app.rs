//! Event loop driver for the shell window

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::WindowId,
};

use crate::config::AppConfig;
use crate::error::Result;
use crate::window::Window;

/// Events the shell pushes onto its own event queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    Quit,
}

pub struct App {
    event_loop: EventLoop<ShellEvent>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    proxy: EventLoopProxy<ShellEvent>,
    window: Option<Window>,
    error: Option<crate::error::ShellError>,
}

impl App {
    /// Creates the event loop; the window itself is created once the platform resumes
    pub fn new(config: AppConfig) -> Result<Self> {
        let event_loop = EventLoop::<ShellEvent>::with_user_event().build()?;
        let proxy = event_loop.create_proxy();

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                proxy,
                window: None,
                error: None,
            },
        })
    }

    /// Runs until the window is closed
    ///
    /// # Errors
    /// Returns the window creation error if the window could not be built.
    pub fn run(self) -> Result<()> {
        let Self {
            event_loop,
            mut app_state,
        } = self;

        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut app_state)?;

        match app_state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler<ShellEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match Window::new(event_loop, self.proxy.clone(), &self.config) {
            Ok(window) => {
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("Failed to create the shell window: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: ShellEvent) {
        match event {
            ShellEvent::Quit => {
                log::info!("Quit requested");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_mut() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        // ImGui sees every event so it can track sizes and focus
        window.handle_input(window_id, &event);
        window.on_event(&event);

        match event {
            WindowEvent::Resized(size) => {
                window.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                window.update();
            }
            _ => (),
        }

        let control_flow = if window.is_minimized() {
            ControlFlow::Wait
        } else {
            ControlFlow::Poll
        };
        event_loop.set_control_flow(control_flow);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            if !window.is_minimized() {
                window.request_redraw();
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Release GPU and ImGui resources while the event loop is still alive
        self.window = None;
    }
}
