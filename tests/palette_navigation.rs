use lca_launcher::backend::CommandResponse;
use lca_launcher::palette::{NavKey, PaletteConfig, PaletteEffect, PaletteEvent, PaletteState};
use lca_launcher::results::{QueryResult, ResultKind};
use std::time::{Duration, Instant};

fn row(title: &str) -> QueryResult {
    QueryResult {
        title: title.into(),
        description: String::new(),
        kind: ResultKind::Matched,
        payload: CommandResponse::default(),
    }
}

fn state_with_rows(n: usize) -> PaletteState {
    let mut state = PaletteState::new(PaletteConfig::default());
    state.results = (0..n).map(|i| row(&format!("row {i}"))).collect();
    state
}

fn press(state: &mut PaletteState, key: NavKey) -> Vec<PaletteEffect> {
    state.handle(PaletteEvent::Key(key), Instant::now())
}

#[test]
fn arrows_clamp_instead_of_wrapping() {
    let mut state = state_with_rows(3);
    press(&mut state, NavKey::ArrowUp);
    assert_eq!(state.selected, 0);
    for expected in [1, 2, 2, 2] {
        assert!(press(&mut state, NavKey::ArrowDown).is_empty());
        assert_eq!(state.selected, expected);
    }
    for expected in [1, 0, 0] {
        press(&mut state, NavKey::ArrowUp);
        assert_eq!(state.selected, expected);
    }
}

#[test]
fn arrows_with_no_results_leave_selection_at_zero() {
    let mut state = state_with_rows(0);
    press(&mut state, NavKey::ArrowDown);
    press(&mut state, NavKey::ArrowUp);
    assert_eq!(state.selected, 0);
    assert!(state.selected_result().is_none());
}

#[test]
fn selection_stays_in_bounds_for_any_key_sequence() {
    let keys = [NavKey::ArrowDown, NavKey::ArrowUp];
    for len in 1..5 {
        let mut state = state_with_rows(len);
        for step in 0..40usize {
            press(&mut state, keys[(step * 7 + len) % 3 % 2]);
            assert!(state.selected < len);
        }
    }
}

#[test]
fn escape_clears_everything_and_requests_hide() {
    let t0 = Instant::now();
    let mut state = state_with_rows(2);
    state.handle(PaletteEvent::InputChanged("open notes".into()), t0);
    press(&mut state, NavKey::ArrowDown);

    let effects = state.handle(PaletteEvent::Key(NavKey::Escape), t0);
    assert_eq!(effects, vec![PaletteEffect::HideWindow]);
    assert!(state.query.is_empty());
    assert!(state.results.is_empty());
    assert_eq!(state.selected, 0);

    // The search typed before Escape never goes out.
    let later = state.handle(PaletteEvent::Tick, t0 + Duration::from_secs(2));
    assert!(later.is_empty());
}

#[test]
fn escape_on_empty_palette_still_requests_hide() {
    let mut state = state_with_rows(0);
    assert_eq!(press(&mut state, NavKey::Escape), vec![PaletteEffect::HideWindow]);
}

#[test]
fn focus_selects_input_text() {
    let mut state = state_with_rows(0);
    let effects = state.handle(PaletteEvent::Focused, Instant::now());
    assert_eq!(effects, vec![PaletteEffect::FocusInput { select_all: true }]);
}

#[test]
fn click_selects_and_executes() {
    let t0 = Instant::now();
    let mut state = state_with_rows(3);
    state.handle(PaletteEvent::InputChanged("say hi".into()), t0);

    let effects = state.handle(PaletteEvent::Clicked(2), t0);
    assert_eq!(state.selected, 2);
    assert!(matches!(
        effects.as_slice(),
        [PaletteEffect::Execute { request }] if request.auto_execute && request.query == "say hi"
    ));
}

#[test]
fn click_outside_results_is_ignored() {
    let mut state = state_with_rows(1);
    assert!(state.handle(PaletteEvent::Clicked(5), Instant::now()).is_empty());
    assert_eq!(state.selected, 0);
}
