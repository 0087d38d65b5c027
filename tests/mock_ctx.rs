use eframe::egui;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockCtx {
    pub commands: Arc<Mutex<Vec<egui::ViewportCommand>>>,
    pub monitor: Option<egui::Vec2>,
}

impl MockCtx {
    pub fn with_monitor(w: f32, h: f32) -> Self {
        Self {
            monitor: Some(egui::vec2(w, h)),
            ..Default::default()
        }
    }
}

// Implement the trait from the main crate so tests can reuse visibility logic.
impl lca_launcher::visibility::ViewportCtx for MockCtx {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand) {
        self.commands.lock().unwrap().push(cmd);
    }

    fn request_repaint(&self) {}

    fn monitor_size(&self) -> Option<egui::Vec2> {
        self.monitor
    }
}
