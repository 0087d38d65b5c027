//! Input, selection and status handling for the palette.
//!
//! [`PaletteState`] is driven purely by [`PaletteEvent`]s; anything that has
//! to touch the outside world (HTTP requests, hiding the window, moving
//! keyboard focus) is returned as a [`PaletteEffect`] for the GUI to carry
//! out. Time is passed in explicitly so the debounce and auto-hide timers
//! can be exercised without sleeping.

use crate::backend::{BackendError, CommandRequest, CommandResponse};
use crate::results::{results_from_response, QueryResult};
use crate::settings::Settings;
use std::time::{Duration, Instant};

pub const STATUS_SEARCHING: &str = "searching...";
pub const STATUS_SEARCH_FAILED: &str = "error: backend not running?";
pub const STATUS_EXECUTING: &str = "executing...";
pub const STATUS_EXECUTION_FAILED: &str = "✗ execution failed";
pub const STATUS_EXECUTION_ERROR: &str = "error during execution";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
}

#[derive(Debug)]
pub enum PaletteEvent {
    /// The text field now contains this text.
    InputChanged(String),
    Key(NavKey),
    /// A result row was clicked.
    Clicked(usize),
    /// The window regained focus.
    Focused,
    /// The window was hidden; a search still waiting on the debounce is
    /// dropped.
    Hidden,
    /// Time advanced; fires any due timers.
    Tick,
    SearchFinished {
        id: u64,
        result: Result<CommandResponse, BackendError>,
    },
    ExecuteFinished(Result<CommandResponse, BackendError>),
}

impl PaletteEvent {
    /// Events that come from the user typing, pressing keys or clicking.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            PaletteEvent::InputChanged(_) | PaletteEvent::Key(_) | PaletteEvent::Clicked(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteEffect {
    Search { id: u64, request: CommandRequest },
    Execute { request: CommandRequest },
    /// Ask the shell to hide the window.
    HideWindow,
    FocusInput { select_all: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteConfig {
    pub debounce: Duration,
    pub hide_delay: Duration,
    pub discard_stale_responses: bool,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            hide_delay: Duration::from_millis(1500),
            discard_stale_responses: false,
        }
    }
}

impl From<&Settings> for PaletteConfig {
    fn from(s: &Settings) -> Self {
        Self {
            debounce: s.debounce(),
            hide_delay: s.hide_delay(),
            discard_stale_responses: s.discard_stale_responses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingSearch {
    query: String,
    due: Instant,
}

#[derive(Debug, Default)]
pub struct PaletteState {
    pub query: String,
    pub results: Vec<QueryResult>,
    /// Index into `results`; always 0 when `results` is empty.
    pub selected: usize,
    pub status: Option<String>,
    config: PaletteConfig,
    pending_search: Option<PendingSearch>,
    hide_at: Option<Instant>,
    last_search_id: u64,
}

impl PaletteState {
    pub fn new(config: PaletteConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &PaletteConfig {
        &self.config
    }

    /// Earliest instant at which a [`PaletteEvent::Tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let search = self.pending_search.as_ref().map(|p| p.due);
        match (search, self.hide_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn has_pending_search(&self) -> bool {
        self.pending_search.is_some()
    }

    pub fn selected_result(&self) -> Option<&QueryResult> {
        self.results.get(self.selected)
    }

    /// Apply `event` at time `now`, returning the effects to perform.
    pub fn handle(&mut self, event: PaletteEvent, now: Instant) -> Vec<PaletteEffect> {
        match event {
            PaletteEvent::InputChanged(text) => self.on_input(text, now),
            PaletteEvent::Key(key) => self.on_key(key),
            PaletteEvent::Clicked(idx) => self.on_click(idx),
            PaletteEvent::Focused => vec![PaletteEffect::FocusInput { select_all: true }],
            PaletteEvent::Hidden => {
                self.pending_search = None;
                Vec::new()
            }
            PaletteEvent::Tick => self.on_tick(now),
            PaletteEvent::SearchFinished { id, result } => self.on_search_finished(id, result),
            PaletteEvent::ExecuteFinished(result) => self.on_execute_finished(result, now),
        }
    }

    fn on_input(&mut self, text: String, now: Instant) -> Vec<PaletteEffect> {
        self.query = text;
        self.pending_search = None;
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            self.clear_results();
        } else {
            self.pending_search = Some(PendingSearch {
                query: trimmed.to_string(),
                due: now + self.config.debounce,
            });
        }
        Vec::new()
    }

    fn on_key(&mut self, key: NavKey) -> Vec<PaletteEffect> {
        match key {
            NavKey::ArrowDown => {
                if !self.results.is_empty() {
                    let max = self.results.len() - 1;
                    self.selected = (self.selected + 1).min(max);
                }
                Vec::new()
            }
            NavKey::ArrowUp => {
                if !self.results.is_empty() {
                    self.selected = self.selected.saturating_sub(1);
                }
                Vec::new()
            }
            NavKey::Enter => self.execute_selected(),
            NavKey::Escape => {
                self.query.clear();
                self.pending_search = None;
                self.clear_results();
                vec![PaletteEffect::HideWindow]
            }
        }
    }

    fn on_click(&mut self, idx: usize) -> Vec<PaletteEffect> {
        if idx >= self.results.len() {
            return Vec::new();
        }
        self.selected = idx;
        self.execute_selected()
    }

    fn on_tick(&mut self, now: Instant) -> Vec<PaletteEffect> {
        let mut effects = Vec::new();
        if self.pending_search.as_ref().is_some_and(|p| p.due <= now) {
            if let Some(pending) = self.pending_search.take() {
                self.last_search_id += 1;
                self.status = Some(STATUS_SEARCHING.into());
                tracing::debug!(id = self.last_search_id, query = %pending.query, "search");
                effects.push(PaletteEffect::Search {
                    id: self.last_search_id,
                    request: CommandRequest::search(pending.query),
                });
            }
        }
        if self.hide_at.is_some_and(|t| t <= now) {
            self.hide_at = None;
            self.query.clear();
            self.clear_results();
            self.status = None;
            effects.push(PaletteEffect::HideWindow);
        }
        effects
    }

    fn on_search_finished(
        &mut self,
        id: u64,
        result: Result<CommandResponse, BackendError>,
    ) -> Vec<PaletteEffect> {
        if self.config.discard_stale_responses && id != self.last_search_id {
            tracing::debug!(id, latest = self.last_search_id, "dropping stale search response");
            return Vec::new();
        }
        let rows = result.and_then(|resp| {
            results_from_response(resp).ok_or(BackendError::Unclassifiable)
        });
        match rows {
            Ok(rows) => {
                self.results = rows;
                self.selected = 0;
                self.status = None;
            }
            Err(e) => {
                tracing::warn!("search failed: {e}");
                self.status = Some(STATUS_SEARCH_FAILED.into());
            }
        }
        Vec::new()
    }

    fn execute_selected(&mut self) -> Vec<PaletteEffect> {
        if self.results.is_empty() {
            return Vec::new();
        }
        if let Some(sel) = self.selected_result() {
            tracing::debug!(kind = ?sel.kind, title = %sel.title, "executing selection");
        }
        self.status = Some(STATUS_EXECUTING.into());
        // The live input text is re-sent; the backend resolves it again.
        vec![PaletteEffect::Execute {
            request: CommandRequest::execute(self.query.clone()),
        }]
    }

    fn on_execute_finished(
        &mut self,
        result: Result<CommandResponse, BackendError>,
        now: Instant,
    ) -> Vec<PaletteEffect> {
        match result {
            Ok(resp) if resp.executed() => {
                let output = resp.output().unwrap_or("success");
                tracing::info!("command executed: {output}");
                self.status = Some(format!("✓ done: {output}"));
                self.hide_at = Some(now + self.config.hide_delay);
            }
            Ok(_) => {
                tracing::info!("backend reported the command was not executed");
                self.status = Some(STATUS_EXECUTION_FAILED.into());
            }
            Err(e) => {
                tracing::warn!("execution failed: {e}");
                self.status = Some(STATUS_EXECUTION_ERROR.into());
            }
        }
        Vec::new()
    }

    fn clear_results(&mut self) {
        self.results.clear();
        self.selected = 0;
    }
}
