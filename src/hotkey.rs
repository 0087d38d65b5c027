use anyhow::Context as _;
use eframe::egui;
use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use std::sync::{Arc, Mutex};
use std::thread;

/// Combination registered when the settings do not name one.
pub const DEFAULT_HOTKEY: &str = "Primary+Shift+Space";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub key: Code,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Command on macOS, the Windows/Super key elsewhere.
    pub meta: bool,
}

impl Default for Hotkey {
    fn default() -> Self {
        parse_hotkey(DEFAULT_HOTKEY).unwrap_or(Self {
            key: Code::Space,
            ctrl: true,
            shift: true,
            alt: false,
            meta: false,
        })
    }
}

impl Hotkey {
    pub fn modifiers(&self) -> Modifiers {
        let mut mods = Modifiers::empty();
        if self.ctrl {
            mods |= Modifiers::CONTROL;
        }
        if self.shift {
            mods |= Modifiers::SHIFT;
        }
        if self.alt {
            mods |= Modifiers::ALT;
        }
        if self.meta {
            mods |= Modifiers::META;
        }
        mods
    }

    pub fn to_global(&self) -> HotKey {
        HotKey::new(Some(self.modifiers()), self.key)
    }
}

/// Parse a hotkey string like "Primary+Shift+Space" into a [`Hotkey`].
///
/// `Primary` (also `CommandOrControl`) is the platform's main shortcut
/// modifier: Command on macOS and Control everywhere else.
pub fn parse_hotkey(s: &str) -> Option<Hotkey> {
    let mut ctrl = false;
    let mut shift = false;
    let mut alt = false;
    let mut meta = false;
    let mut key: Option<Code> = None;

    for part in s.split('+') {
        let upper = part.trim().to_ascii_uppercase();
        match upper.as_str() {
            "PRIMARY" | "COMMANDORCONTROL" | "CMDORCTRL" => {
                if cfg!(target_os = "macos") {
                    meta = true;
                } else {
                    ctrl = true;
                }
            }
            "CTRL" | "CONTROL" => ctrl = true,
            "SHIFT" => shift = true,
            "ALT" | "OPTION" => alt = true,
            "CMD" | "COMMAND" | "META" | "SUPER" | "WIN" => meta = true,
            "" => {}
            _ => {
                if key.is_some() {
                    return None;
                }
                key = Some(parse_key(&upper)?);
            }
        }
    }

    key.map(|k| Hotkey {
        key: k,
        ctrl,
        shift,
        alt,
        meta,
    })
}

const LETTERS: [Code; 26] = [
    Code::KeyA,
    Code::KeyB,
    Code::KeyC,
    Code::KeyD,
    Code::KeyE,
    Code::KeyF,
    Code::KeyG,
    Code::KeyH,
    Code::KeyI,
    Code::KeyJ,
    Code::KeyK,
    Code::KeyL,
    Code::KeyM,
    Code::KeyN,
    Code::KeyO,
    Code::KeyP,
    Code::KeyQ,
    Code::KeyR,
    Code::KeyS,
    Code::KeyT,
    Code::KeyU,
    Code::KeyV,
    Code::KeyW,
    Code::KeyX,
    Code::KeyY,
    Code::KeyZ,
];

const DIGITS: [Code; 10] = [
    Code::Digit0,
    Code::Digit1,
    Code::Digit2,
    Code::Digit3,
    Code::Digit4,
    Code::Digit5,
    Code::Digit6,
    Code::Digit7,
    Code::Digit8,
    Code::Digit9,
];

const FUNCTION_KEYS: [Code; 12] = [
    Code::F1,
    Code::F2,
    Code::F3,
    Code::F4,
    Code::F5,
    Code::F6,
    Code::F7,
    Code::F8,
    Code::F9,
    Code::F10,
    Code::F11,
    Code::F12,
];

fn parse_key(upper: &str) -> Option<Code> {
    match upper {
        "SPACE" => Some(Code::Space),
        "TAB" => Some(Code::Tab),
        "ENTER" | "RETURN" => Some(Code::Enter),
        "ESC" | "ESCAPE" => Some(Code::Escape),
        "DELETE" => Some(Code::Delete),
        "BACKSPACE" => Some(Code::Backspace),
        "CAPSLOCK" => Some(Code::CapsLock),
        "HOME" => Some(Code::Home),
        "END" => Some(Code::End),
        "PAGEUP" => Some(Code::PageUp),
        "PAGEDOWN" => Some(Code::PageDown),
        "LEFT" | "LEFTARROW" => Some(Code::ArrowLeft),
        "RIGHT" | "RIGHTARROW" => Some(Code::ArrowRight),
        "UP" | "UPARROW" => Some(Code::ArrowUp),
        "DOWN" | "DOWNARROW" => Some(Code::ArrowDown),
        _ if upper.len() > 1 && upper.starts_with('F') => {
            let n = upper[1..].parse::<usize>().ok()?;
            FUNCTION_KEYS.get(n.checked_sub(1)?).copied()
        }
        _ if upper.len() == 1 => {
            let c = upper.chars().next()?;
            if c.is_ascii_digit() {
                DIGITS.get((c as u8 - b'0') as usize).copied()
            } else if c.is_ascii_alphabetic() {
                LETTERS.get((c as u8 - b'A') as usize).copied()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// OS-level registration of the palette hotkey.
///
/// Dropping the registration releases every key capture it holds.
pub struct HotkeyRegistration {
    manager: GlobalHotKeyManager,
    hotkeys: Vec<HotKey>,
}

impl HotkeyRegistration {
    /// Register `hotkey` process-wide. Must be called on the main thread.
    pub fn register(hotkey: &Hotkey) -> anyhow::Result<Self> {
        let manager = GlobalHotKeyManager::new().context("creating hotkey manager")?;
        let global = hotkey.to_global();
        manager
            .register(global)
            .with_context(|| format!("registering hotkey {:?}", hotkey))?;
        tracing::info!(id = global.id(), "registered global hotkey {:?}", hotkey);
        Ok(Self {
            manager,
            hotkeys: vec![global],
        })
    }

    /// Id of the registered palette hotkey, as reported in hotkey events.
    pub fn id(&self) -> Option<u32> {
        self.hotkeys.first().map(|h| h.id())
    }

    pub fn unregister_all(&mut self) {
        if self.hotkeys.is_empty() {
            return;
        }
        match self.manager.unregister_all(&self.hotkeys) {
            Ok(()) => tracing::info!("unregistered {} global hotkey(s)", self.hotkeys.len()),
            Err(e) => tracing::warn!("failed to unregister hotkeys: {e}"),
        }
        self.hotkeys.clear();
    }
}

impl Drop for HotkeyRegistration {
    fn drop(&mut self) {
        self.unregister_all();
    }
}

/// Register the palette hotkey, or run without one. A missing hotkey or a
/// failed registration is logged and never stops the launcher.
pub fn register_or_warn(hotkey: Option<Hotkey>) -> Option<HotkeyRegistration> {
    register_with(hotkey, HotkeyRegistration::register)
}

/// [`register_or_warn`] with the registration step supplied by the caller.
pub fn register_with<R>(
    hotkey: Option<Hotkey>,
    register: impl FnOnce(&Hotkey) -> anyhow::Result<R>,
) -> Option<R> {
    let Some(hotkey) = hotkey else {
        tracing::info!("no hotkey configured");
        return None;
    };
    match register(&hotkey) {
        Ok(reg) => Some(reg),
        Err(e) => {
            tracing::warn!("hotkey registration failed: {e:#}; running without a global hotkey");
            None
        }
    }
}

// Shared signal raised by the hotkey listener and consumed by the GUI thread
#[derive(Clone, Default)]
pub struct HotkeyTrigger {
    pub open: Arc<Mutex<bool>>,
}

impl HotkeyTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward presses of the hotkey with `id` into this trigger, waking the
    /// GUI so the press is handled even while the window is idle.
    pub fn start_listener(&self, id: u32, ctx: egui::Context) {
        let open = self.open.clone();
        tracing::debug!("starting hotkey listener for id {id}");
        thread::spawn(move || {
            let receiver = GlobalHotKeyEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if event.id != id || event.state != HotKeyState::Pressed {
                    continue;
                }
                tracing::debug!("hotkey match -> open=true");
                if let Ok(mut flag) = open.lock() {
                    *flag = true;
                }
                ctx.request_repaint();
            }
            tracing::warn!("hotkey event channel closed");
        });
    }

    /// Return `true` once per press.
    pub fn take(&self) -> bool {
        match self.open.lock() {
            Ok(mut open) => std::mem::take(&mut *open),
            Err(_) => false,
        }
    }
}
