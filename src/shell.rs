use std::sync::mpsc::{channel, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowVisibility {
    #[default]
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    HotkeyPressed,
    /// The window lost keyboard focus.
    Blurred,
    /// A [`ShellMessage::HideWindow`] arrived from the palette.
    HideRequested,
}

/// Messages the palette sends to the shell. There is no reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMessage {
    HideWindow,
}

/// Window operations produced by a transition, applied in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    Show,
    Center,
    Focus,
    Hide,
}

pub fn hide_channel() -> (Sender<ShellMessage>, Receiver<ShellMessage>) {
    channel()
}

/// Owns the overlay's visibility.
#[derive(Debug, Default)]
pub struct ShellController {
    visibility: WindowVisibility,
    /// While the inspector is open, losing focus does not hide the window.
    pub inspector_open: bool,
}

impl ShellController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> WindowVisibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == WindowVisibility::Visible
    }

    pub fn handle(&mut self, event: ShellEvent) -> Vec<WindowCommand> {
        use WindowVisibility::*;
        let (next, commands) = match (self.visibility, event) {
            (Hidden, ShellEvent::HotkeyPressed) => (
                Visible,
                vec![WindowCommand::Show, WindowCommand::Center, WindowCommand::Focus],
            ),
            (Visible, ShellEvent::HotkeyPressed) | (Visible, ShellEvent::HideRequested) => {
                (Hidden, vec![WindowCommand::Hide])
            }
            (Visible, ShellEvent::Blurred) if !self.inspector_open => {
                (Hidden, vec![WindowCommand::Hide])
            }
            (state, _) => (state, Vec::new()),
        };
        if next != self.visibility {
            tracing::debug!(from = ?self.visibility, to = ?next, ?event, "visibility updated");
        }
        self.visibility = next;
        commands
    }

    pub fn handle_message(&mut self, msg: ShellMessage) -> Vec<WindowCommand> {
        match msg {
            ShellMessage::HideWindow => self.handle(ShellEvent::HideRequested),
        }
    }
}
