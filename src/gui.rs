use crate::backend::{BackendClient, BackendError, CommandRequest, CommandResponse};
use crate::hotkey::{HotkeyRegistration, HotkeyTrigger};
use crate::palette::{NavKey, PaletteConfig, PaletteEffect, PaletteEvent, PaletteState};
use crate::settings::Settings;
use crate::shell::{hide_channel, ShellController, ShellEvent, ShellMessage, WindowCommand};
use crate::visibility::{apply_window_commands, ViewportCtx, WindowGeometry};
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

const INPUT_ID: &str = "palette_input";

const NAV_KEYS: [(egui::Key, NavKey); 4] = [
    (egui::Key::ArrowDown, NavKey::ArrowDown),
    (egui::Key::ArrowUp, NavKey::ArrowUp),
    (egui::Key::Enter, NavKey::Enter),
    (egui::Key::Escape, NavKey::Escape),
];

pub struct PaletteApp {
    state: PaletteState,
    shell: ShellController,
    backend: Arc<dyn BackendClient>,
    geometry: WindowGeometry,
    keep_running_when_closed: bool,
    trigger: HotkeyTrigger,
    hotkeys: Option<HotkeyRegistration>,
    hide_tx: Sender<ShellMessage>,
    hide_rx: Receiver<ShellMessage>,
    replies_tx: Sender<PaletteEvent>,
    replies_rx: Receiver<PaletteEvent>,
    was_focused: Option<bool>,
    parked: bool,
    focus_input: bool,
    select_all: bool,
}

impl PaletteApp {
    pub fn new(
        ctx: &egui::Context,
        settings: &Settings,
        backend: Arc<dyn BackendClient>,
        hotkeys: Option<HotkeyRegistration>,
    ) -> Self {
        let trigger = HotkeyTrigger::new();
        if let Some(id) = hotkeys.as_ref().and_then(|h| h.id()) {
            trigger.start_listener(id, ctx.clone());
        }
        let (w, h) = settings.window_size;
        let geometry = WindowGeometry {
            size: egui::vec2(w as f32, h as f32),
            offscreen: settings.offscreen_hide.then(|| {
                egui::pos2(settings.offscreen_pos.0 as f32, settings.offscreen_pos.1 as f32)
            }),
        };
        let (hide_tx, hide_rx) = hide_channel();
        let (replies_tx, replies_rx) = channel();
        Self {
            state: PaletteState::new(PaletteConfig::from(settings)),
            shell: ShellController::new(),
            backend,
            geometry,
            keep_running_when_closed: settings.keep_running_when_closed,
            trigger,
            hotkeys,
            hide_tx,
            hide_rx,
            replies_tx,
            replies_rx,
            was_focused: None,
            parked: false,
            focus_input: false,
            select_all: false,
        }
    }

    pub fn state(&self) -> &PaletteState {
        &self.state
    }

    pub fn shell(&self) -> &ShellController {
        &self.shell
    }

    pub fn hotkey_trigger(&self) -> &HotkeyTrigger {
        &self.trigger
    }

    /// Sender side of the hide-window channel.
    pub fn hide_sender(&self) -> Sender<ShellMessage> {
        self.hide_tx.clone()
    }

    /// Feed an event to the palette and carry out the resulting effects.
    /// Typing, keys and clicks are ignored while the window is hidden.
    pub fn dispatch(&mut self, ctx: &egui::Context, event: PaletteEvent) {
        if event.is_user_input() && !self.shell.is_visible() {
            tracing::debug!(?event, "window hidden; ignoring input");
            return;
        }
        let effects = self.state.handle(event, Instant::now());
        for effect in effects {
            self.perform(ctx, effect);
        }
    }

    fn perform(&mut self, ctx: &egui::Context, effect: PaletteEffect) {
        match effect {
            PaletteEffect::Search { id, request } => {
                self.spawn_request(ctx, request, move |result| PaletteEvent::SearchFinished {
                    id,
                    result,
                });
            }
            PaletteEffect::Execute { request } => {
                self.spawn_request(ctx, request, PaletteEvent::ExecuteFinished);
            }
            PaletteEffect::HideWindow => {
                if self.hide_tx.send(ShellMessage::HideWindow).is_err() {
                    tracing::error!("hide channel closed");
                }
                ctx.request_repaint();
            }
            PaletteEffect::FocusInput { select_all } => {
                self.focus_input = true;
                self.select_all = select_all;
            }
        }
    }

    fn spawn_request<F>(&self, ctx: &egui::Context, request: CommandRequest, reply: F)
    where
        F: FnOnce(Result<CommandResponse, BackendError>) -> PaletteEvent + Send + 'static,
    {
        let backend = self.backend.clone();
        let tx = self.replies_tx.clone();
        let ctx = ctx.clone();
        thread::spawn(move || {
            let result = backend.post_command(&request);
            if tx.send(reply(result)).is_err() {
                tracing::debug!("palette gone before backend replied");
            }
            ctx.request_repaint();
        });
    }

    fn apply_shell_commands(&mut self, ctx: &egui::Context, commands: &[WindowCommand]) {
        apply_window_commands(ctx, commands, self.geometry);
        if commands.contains(&WindowCommand::Focus) {
            self.dispatch(ctx, PaletteEvent::Focused);
        }
        if commands.contains(&WindowCommand::Hide) {
            self.dispatch(ctx, PaletteEvent::Hidden);
        }
    }

    fn shell_event(&mut self, ctx: &egui::Context, event: ShellEvent) {
        let commands = self.shell.handle(event);
        self.apply_shell_commands(ctx, &commands);
    }

    fn drain_hide_requests(&mut self, ctx: &egui::Context) {
        while let Ok(msg) = self.hide_rx.try_recv() {
            let commands = self.shell.handle_message(msg);
            self.apply_shell_commands(ctx, &commands);
        }
    }

    /// The window starts at the configured parking spot, which may be on
    /// screen for large monitors. Re-park once the monitor size is known.
    fn park_at_startup(&mut self, ctx: &egui::Context) {
        if self.parked || self.geometry.offscreen.is_none() || self.shell.is_visible() {
            return;
        }
        if ViewportCtx::monitor_size(ctx).is_some() {
            apply_window_commands(ctx, &[WindowCommand::Hide], self.geometry);
            self.parked = true;
        }
    }

    /// Handle everything that arrived since the last frame: hotkey presses,
    /// focus changes, hide requests, backend replies and due timers.
    pub fn process_pending(&mut self, ctx: &egui::Context) {
        self.park_at_startup(ctx);
        if self.trigger.take() {
            self.shell_event(ctx, ShellEvent::HotkeyPressed);
        }

        let focused = ctx.input(|i| i.viewport().focused);
        if focused != self.was_focused {
            match focused {
                Some(true) => self.dispatch(ctx, PaletteEvent::Focused),
                Some(false) if self.was_focused == Some(true) => {
                    self.shell_event(ctx, ShellEvent::Blurred)
                }
                _ => {}
            }
            self.was_focused = focused;
        }

        self.drain_hide_requests(ctx);

        while let Ok(ev) = self.replies_rx.try_recv() {
            self.dispatch(ctx, ev);
        }

        self.dispatch(ctx, PaletteEvent::Tick);
        // Replies and timers may have queued another hide request.
        self.drain_hide_requests(ctx);

        if let Some(deadline) = self.state.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }

    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if !ctx.input(|i| i.viewport().close_requested()) {
            return;
        }
        if self.keep_running_when_closed {
            tracing::debug!("close requested; staying resident");
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.shell_event(ctx, ShellEvent::HideRequested);
        } else {
            tracing::info!("window closed; exiting");
        }
    }

    fn select_input_text(&self, ctx: &egui::Context, id: egui::Id) {
        if let Some(mut state) = egui::TextEdit::load_state(ctx, id) {
            let len = self.state.query.chars().count();
            state
                .cursor
                .set_char_range(Some(egui::text::CCursorRange::two(
                    egui::text::CCursor::new(0),
                    egui::text::CCursor::new(len),
                )));
            state.store(ctx, id);
        }
    }

    fn draw(&mut self, ctx: &egui::Context) {
        let pressed: Vec<NavKey> = ctx.input_mut(|i| {
            NAV_KEYS
                .iter()
                .filter(|(key, _)| i.consume_key(egui::Modifiers::NONE, *key))
                .map(|(_, nav)| *nav)
                .collect()
        });
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::F12)) {
            self.shell.inspector_open = !self.shell.inspector_open;
        }

        let frame = egui::Frame::none()
            .fill(ctx.style().visuals.window_fill)
            .stroke(ctx.style().visuals.window_stroke)
            .rounding(10.0)
            .inner_margin(12.0);

        let mut clicked = None;
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            let input_id = egui::Id::new(INPUT_ID);
            if self.select_all {
                self.select_input_text(ctx, input_id);
                self.select_all = false;
            }
            let mut text = self.state.query.clone();
            let input = ui.add(
                egui::TextEdit::singleline(&mut text)
                    .id(input_id)
                    .hint_text("what do you want to do?")
                    .font(egui::TextStyle::Heading)
                    .desired_width(f32::INFINITY),
            );
            if self.focus_input {
                input.request_focus();
                self.focus_input = false;
            }
            if input.changed() {
                self.dispatch(ctx, PaletteEvent::InputChanged(text));
            }

            ui.add_space(8.0);
            egui::ScrollArea::vertical()
                .max_height((ui.available_height() - 28.0).max(0.0))
                .show(ui, |ui| {
                    for (idx, result) in self.state.results.iter().enumerate() {
                        let selected = idx == self.state.selected;
                        let fill = if selected {
                            ui.visuals().selection.bg_fill
                        } else {
                            egui::Color32::TRANSPARENT
                        };
                        let row = egui::Frame::none()
                            .fill(fill)
                            .rounding(6.0)
                            .inner_margin(8.0)
                            .show(ui, |ui| {
                                ui.set_width(ui.available_width());
                                ui.label(egui::RichText::new(&result.title).strong());
                                ui.label(egui::RichText::new(&result.description).weak().small());
                            })
                            .response;
                        let row = ui.interact(
                            row.rect,
                            ui.id().with(("result", idx)),
                            egui::Sense::click(),
                        );
                        if row.clicked() {
                            clicked = Some(idx);
                        }
                    }
                });

            let status = self.state.status.as_deref();
            ui.add_visible(status.is_some(), egui::Label::new(status.unwrap_or_default()));
        });

        if self.shell.inspector_open {
            let mut open = true;
            egui::Window::new("Inspector")
                .open(&mut open)
                .vscroll(true)
                .show(ctx, |ui| ctx.inspection_ui(ui));
            self.shell.inspector_open = open;
        }

        for key in pressed {
            self.dispatch(ctx, PaletteEvent::Key(key));
        }
        if let Some(idx) = clicked {
            self.dispatch(ctx, PaletteEvent::Clicked(idx));
        }
    }
}

impl eframe::App for PaletteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_close_request(ctx);
        self.process_pending(ctx);
        self.draw(ctx);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(mut hotkeys) = self.hotkeys.take() {
            hotkeys.unregister_all();
        }
    }
}
