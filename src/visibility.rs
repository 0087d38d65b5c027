use crate::shell::WindowCommand;
use eframe::egui;

/// The subset of [`egui::Context`] needed to drive the window. Tests provide
/// a recording implementation.
pub trait ViewportCtx {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand);
    fn request_repaint(&self);
    /// Size of the monitor the window is on, when the backend reports it.
    fn monitor_size(&self) -> Option<egui::Vec2> {
        None
    }
}

impl ViewportCtx for egui::Context {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand) {
        egui::Context::send_viewport_cmd(self, cmd);
    }

    fn request_repaint(&self) {
        egui::Context::request_repaint(self);
    }

    fn monitor_size(&self) -> Option<egui::Vec2> {
        self.input(|i| i.viewport().monitor_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowGeometry {
    pub size: egui::Vec2,
    /// Where to park the window when hiding off-screen. `None` hides by
    /// unmapping it instead.
    pub offscreen: Option<egui::Pos2>,
}

/// Top-left position that centers a window of `window` size on `monitor`.
pub fn centered_position(monitor: egui::Vec2, window: egui::Vec2) -> egui::Pos2 {
    let x = ((monitor.x - window.x) / 2.0).max(0.0);
    let y = ((monitor.y - window.y) / 2.0).max(0.0);
    egui::pos2(x, y)
}

/// Where to park a hidden window: the configured spot, pushed past the
/// bottom-right corner of the monitor when the monitor is larger.
pub fn parking_position(configured: egui::Pos2, monitor: Option<egui::Vec2>) -> egui::Pos2 {
    match monitor {
        Some(m) => egui::pos2(configured.x.max(m.x + 1.0), configured.y.max(m.y + 1.0)),
        None => configured,
    }
}

/// Translate shell window commands into viewport commands.
pub fn apply_window_commands(
    ctx: &impl ViewportCtx,
    commands: &[WindowCommand],
    geometry: WindowGeometry,
) {
    for cmd in commands {
        match cmd {
            WindowCommand::Show => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
                ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
            }
            WindowCommand::Center => match ctx.monitor_size() {
                Some(monitor) => ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(
                    centered_position(monitor, geometry.size),
                )),
                None => tracing::debug!("monitor size unknown; not centering"),
            },
            WindowCommand::Focus => ctx.send_viewport_cmd(egui::ViewportCommand::Focus),
            WindowCommand::Hide => match geometry.offscreen {
                Some(pos) => ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(
                    parking_position(pos, ctx.monitor_size()),
                )),
                None => ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false)),
            },
        }
    }
    if !commands.is_empty() {
        ctx.request_repaint();
    }
}
