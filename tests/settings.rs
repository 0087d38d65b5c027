use lca_launcher::settings::Settings;
use std::fs;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.backend_url, "http://127.0.0.1:8765");
    assert_eq!(settings.debounce_ms, 300);
    assert_eq!(settings.hide_delay_ms, 1500);
    assert_eq!(settings.window_size, (700, 500));
    assert!(!settings.discard_stale_responses);
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{ "backend_url": "http://localhost:9000", "debounce_ms": 150 }"#,
    )
    .unwrap();
    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings.backend_url, "http://localhost:9000");
    assert_eq!(settings.debounce().as_millis(), 150);
    assert_eq!(settings.hotkey.as_deref(), Some("Primary+Shift+Space"));
    assert_eq!(settings.hide_delay().as_millis(), 1500);
}

#[test]
fn save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let path = path.to_str().unwrap();
    let settings = Settings {
        discard_stale_responses: true,
        keep_running_when_closed: true,
        hotkey: Some("Alt+Space".into()),
        ..Settings::default()
    };
    settings.save(path).unwrap();
    assert_eq!(Settings::load(path).unwrap(), settings);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(Settings::load(path.to_str().unwrap()).is_err());
}

#[test]
fn invalid_hotkey_falls_back_to_default() {
    let settings = Settings {
        hotkey: Some("Ctrl+Nope".into()),
        ..Settings::default()
    };
    let hk = settings.hotkey().expect("falls back");
    assert_eq!(hk, lca_launcher::hotkey::Hotkey::default());

    let disabled = Settings {
        hotkey: None,
        ..Settings::default()
    };
    assert!(disabled.hotkey().is_none());
}
