// src/ui/panel.rs
//! Shell UI: main menu bar and the diagnostic panels
//!
//! The panels are plain functions over a [`PanelState`] so the window only has
//! to own the visibility flags and pass in the debug facts it knows about.

use std::path::PathBuf;

/// Visibility of the optional panels, toggled from the `View` menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelState {
    pub show_some_panel: bool,
    pub show_demo_panel: bool,
    pub show_debug_panel: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            show_some_panel: true,
            show_demo_panel: false,
            show_debug_panel: false,
        }
    }
}

/// What the user asked for through the menu bar this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuAction {
    #[default]
    None,
    Exit,
}

/// Facts shown in the debug panel
#[derive(Debug, Clone, PartialEq)]
pub struct DebugInfo {
    pub renderer_name: String,
    pub user_config_path: PathBuf,
    pub font_global_scale: f32,
}

/// Draws the whole shell UI for one frame
///
/// Nothing is drawn while minimized.
pub fn draw_shell_ui(
    ui: &imgui::Ui,
    panels: &mut PanelState,
    info: &DebugInfo,
    minimized: bool,
) -> MenuAction {
    if minimized {
        return MenuAction::None;
    }

    ui.dockspace_over_main_viewport();

    let action = draw_main_menu_bar(ui, panels);
    draw_panels(ui, panels, info);
    action
}

/// `File > Exit` and the `View` toggles
pub fn draw_main_menu_bar(ui: &imgui::Ui, panels: &mut PanelState) -> MenuAction {
    let mut action = MenuAction::None;

    ui.main_menu_bar(|| {
        ui.menu("File", || {
            if ui.menu_item_config("Exit").shortcut("Cmd+Q").build() {
                action = MenuAction::Exit;
            }
        });
        ui.menu("View", || {
            ui.menu_item_config("Some Panel")
                .build_with_ref(&mut panels.show_some_panel);
            ui.menu_item_config("ImGui Demo Panel")
                .build_with_ref(&mut panels.show_demo_panel);
            ui.menu_item_config("Debug Panel")
                .build_with_ref(&mut panels.show_debug_panel);
        });
    });

    action
}

/// Draws every visible panel; a panel's close button clears its flag
pub fn draw_panels(ui: &imgui::Ui, panels: &mut PanelState, info: &DebugInfo) {
    if panels.show_some_panel {
        ui.window("Some panel")
            .opened(&mut panels.show_some_panel)
            .build(|| {
                ui.text("Hello World");
            });
    }

    if panels.show_demo_panel {
        ui.show_demo_window(&mut panels.show_demo_panel);
    }

    if panels.show_debug_panel {
        ui.window("Debug panel")
            .opened(&mut panels.show_debug_panel)
            .build(|| {
                ui.text(format!("Current renderer: {}", info.renderer_name));
                ui.text(format!(
                    "User config path: {}",
                    info.user_config_path.display()
                ));
                ui.text(format!("Global font scaling {:.6}", info.font_global_scale));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgui::Context;
    use serial_test::serial;

    fn headless_context() -> Context {
        let mut context = Context::create();
        context.set_ini_filename(None);
        context.io_mut().display_size = [1280.0, 720.0];
        context.io_mut().config_flags |= imgui::ConfigFlags::DOCKING_ENABLE;
        context.fonts().build_rgba32_texture();
        context
    }

    fn debug_info() -> DebugInfo {
        DebugInfo {
            renderer_name: "Headless (Empty)".to_string(),
            user_config_path: PathBuf::from("/tmp/App"),
            font_global_scale: 1.0,
        }
    }

    /// Runs two frames (new windows are hidden on their first) and returns the
    /// last action and draw list count
    fn run_frames(
        context: &mut Context,
        panels: &mut PanelState,
        minimized: bool,
    ) -> (MenuAction, usize) {
        let info = debug_info();
        let mut action = MenuAction::None;
        let mut draw_lists = 0;
        for _ in 0..2 {
            let ui = context.new_frame();
            action = draw_shell_ui(ui, panels, &info, minimized);
            draw_lists = context.render().draw_lists_count();
        }
        (action, draw_lists)
    }

    /// Runs one frame and returns the menu action and draw list count
    fn frame(context: &mut Context, panels: &mut PanelState) -> (MenuAction, usize) {
        let info = debug_info();
        let ui = context.new_frame();
        let action = draw_shell_ui(ui, panels, &info, false);
        let draw_lists = context.render().draw_lists_count();
        (action, draw_lists)
    }

    /// Left-clicks at `pos`, one input event per frame, and returns every action
    /// seen along the way
    fn click(context: &mut Context, panels: &mut PanelState, pos: [f32; 2]) -> Vec<MenuAction> {
        let mut actions = Vec::new();
        context.io_mut().add_mouse_pos_event(pos);
        actions.push(frame(context, panels).0);
        actions.push(frame(context, panels).0);

        context
            .io_mut()
            .add_mouse_button_event(imgui::MouseButton::Left, true);
        actions.push(frame(context, panels).0);
        context
            .io_mut()
            .add_mouse_button_event(imgui::MouseButton::Left, false);
        actions.push(frame(context, panels).0);

        // Popups are measured on their first frame and shown on the next
        actions.push(frame(context, panels).0);
        actions.push(frame(context, panels).0);
        actions
    }

    // Default style, built-in 13px font: the menu bar is 19px tall, menu items
    // are 17px apart starting just below it
    const FILE_MENU: [f32; 2] = [20.0, 9.0];
    const VIEW_MENU: [f32; 2] = [66.0, 9.0];
    const EXIT_ITEM: [f32; 2] = [30.0, 31.0];
    const DEMO_PANEL_ITEM: [f32; 2] = [75.0, 48.0];
    const DEBUG_PANEL_ITEM: [f32; 2] = [75.0, 65.0];

    #[test]
    fn test_default_panels() {
        let panels = PanelState::default();
        assert!(panels.show_some_panel);
        assert!(!panels.show_demo_panel);
        assert!(!panels.show_debug_panel);
    }

    #[test]
    #[serial(imgui)]
    fn test_minimized_draws_nothing() {
        let mut context = headless_context();
        let mut panels = PanelState {
            show_some_panel: true,
            show_demo_panel: true,
            show_debug_panel: true,
        };

        let (action, draw_lists) = run_frames(&mut context, &mut panels, true);

        assert_eq!(action, MenuAction::None);
        assert_eq!(draw_lists, 0);
        // Flags are untouched while minimized
        assert!(panels.show_some_panel && panels.show_demo_panel && panels.show_debug_panel);
    }

    #[test]
    #[serial(imgui)]
    fn test_visible_panels_add_draw_lists() {
        let mut context = headless_context();
        let mut hidden = PanelState {
            show_some_panel: false,
            show_demo_panel: false,
            show_debug_panel: false,
        };
        let (_, menu_only) = run_frames(&mut context, &mut hidden, false);
        drop(context);

        let mut context = headless_context();
        let mut shown = PanelState {
            show_some_panel: true,
            show_demo_panel: false,
            show_debug_panel: true,
        };
        let (action, with_panels) = run_frames(&mut context, &mut shown, false);

        assert!(menu_only > 0);
        assert!(with_panels > menu_only);
        assert_eq!(action, MenuAction::None);
        assert!(shown.show_some_panel && shown.show_debug_panel);
    }

    #[test]
    #[serial(imgui)]
    fn test_file_exit_reports_exit() {
        let mut context = headless_context();
        let mut panels = PanelState::default();
        run_frames(&mut context, &mut panels, false);

        let opening = click(&mut context, &mut panels, FILE_MENU);
        assert!(opening.iter().all(|action| *action == MenuAction::None));

        let choosing = click(&mut context, &mut panels, EXIT_ITEM);
        assert_eq!(
            choosing
                .iter()
                .filter(|action| **action == MenuAction::Exit)
                .count(),
            1
        );
        assert_eq!(panels, PanelState::default());
    }

    #[test]
    #[serial(imgui)]
    fn test_view_menu_toggles_panels() {
        let mut context = headless_context();
        let mut panels = PanelState::default();
        let (_, before) = run_frames(&mut context, &mut panels, false);

        click(&mut context, &mut panels, VIEW_MENU);
        let actions = click(&mut context, &mut panels, DEMO_PANEL_ITEM);
        assert!(actions.iter().all(|action| *action == MenuAction::None));
        assert!(panels.show_demo_panel);
        assert!(!panels.show_debug_panel);

        // The demo window is drawn on the following frames
        let (_, with_demo) = run_frames(&mut context, &mut panels, false);
        assert!(with_demo > before);
        assert!(panels.show_demo_panel);

        click(&mut context, &mut panels, VIEW_MENU);
        click(&mut context, &mut panels, DEBUG_PANEL_ITEM);
        run_frames(&mut context, &mut panels, false);

        assert_eq!(
            panels,
            PanelState {
                show_some_panel: true,
                show_demo_panel: true,
                show_debug_panel: true,
            }
        );
    }
}
