use crate::hotkey::{parse_hotkey, Hotkey, DEFAULT_HOTKEY};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the settings file location.
pub const SETTINGS_ENV: &str = "LCA_SETTINGS";
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Base URL of the command backend.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Global hotkey toggling the palette, e.g. `Primary+Shift+Space`.
    #[serde(default = "default_hotkey")]
    pub hotkey: Option<String>,
    /// Quiet period after the last keystroke before a search is sent.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Delay between a successful execution and the window hiding itself.
    #[serde(default = "default_hide_delay_ms")]
    pub hide_delay_ms: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_window_size")]
    pub window_size: (i32, i32),
    /// Hide the window by moving it off-screen instead of unmapping it so
    /// the event loop keeps receiving hotkey wakeups.
    #[serde(default = "default_offscreen_hide")]
    pub offscreen_hide: bool,
    /// Position used to hide the window off-screen when not visible.
    #[serde(default = "default_offscreen_pos")]
    pub offscreen_pos: (i32, i32),
    /// Cancel window close requests and hide instead, leaving the process
    /// running in the background.
    #[serde(default = "default_keep_running")]
    pub keep_running_when_closed: bool,
    /// Drop search responses that arrive after a newer search was issued.
    #[serde(default)]
    pub discard_stale_responses: bool,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving a copy of the log output.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8765".into()
}

fn default_hotkey() -> Option<String> {
    Some(DEFAULT_HOTKEY.into())
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_hide_delay_ms() -> u64 {
    1500
}

fn default_request_timeout() -> u64 {
    30
}

fn default_window_size() -> (i32, i32) {
    (700, 500)
}

fn default_offscreen_hide() -> bool {
    true
}

fn default_offscreen_pos() -> (i32, i32) {
    (2000, 2000)
}

fn default_keep_running() -> bool {
    cfg!(target_os = "macos")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            hotkey: default_hotkey(),
            debounce_ms: default_debounce_ms(),
            hide_delay_ms: default_hide_delay_ms(),
            request_timeout_secs: default_request_timeout(),
            window_size: default_window_size(),
            offscreen_hide: default_offscreen_hide(),
            offscreen_pos: default_offscreen_pos(),
            keep_running_when_closed: default_keep_running(),
            discard_stale_responses: false,
            debug_logging: false,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Settings file path, honouring [`SETTINGS_ENV`].
    pub fn path() -> String {
        std::env::var(SETTINGS_ENV).unwrap_or_else(|_| SETTINGS_FILE.into())
    }

    /// Parse the configured hotkey. An invalid string falls back to the
    /// default combination; `None` disables the hotkey entirely.
    pub fn hotkey(&self) -> Option<Hotkey> {
        let seq = self.hotkey.as_deref()?;
        match parse_hotkey(seq) {
            Some(k) => Some(k),
            None => {
                tracing::warn!(
                    "provided hotkey string '{}' is invalid; using default {}",
                    seq,
                    DEFAULT_HOTKEY
                );
                parse_hotkey(DEFAULT_HOTKEY)
            }
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
