use lca_launcher::backend::{BackendClient, HttpBackend};
use lca_launcher::gui::PaletteApp;
use lca_launcher::hotkey;
use lca_launcher::logging;
use lca_launcher::settings::Settings;

use eframe::egui;
use std::sync::Arc;

fn spawn_health_probe(backend: Arc<dyn BackendClient>, url: String) {
    std::thread::spawn(move || match backend.health() {
        Ok(()) => tracing::info!("backend reachable at {url}"),
        Err(e) => tracing::warn!("backend at {url} not reachable: {e}"),
    });
}

fn main() -> anyhow::Result<()> {
    let settings_path = Settings::path();
    let settings = Settings::load(&settings_path)?;
    logging::init(settings.debug_logging, settings.log_file.clone());
    tracing::debug!("settings loaded from {settings_path}");

    let backend: Arc<dyn BackendClient> = Arc::new(HttpBackend::new(
        &settings.backend_url,
        settings.request_timeout(),
    )?);
    spawn_health_probe(backend.clone(), settings.backend_url.clone());

    let hotkeys = hotkey::register_or_warn(settings.hotkey());

    let (w, h) = settings.window_size;
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([w as f32, h as f32])
        .with_decorations(false)
        .with_transparent(true)
        .with_always_on_top()
        .with_taskbar(false)
        .with_resizable(false);
    // The window starts hidden: parked off-screen, or unmapped.
    let viewport = if settings.offscreen_hide {
        let (x, y) = settings.offscreen_pos;
        viewport.with_position([x as f32, y as f32])
    } else {
        viewport.with_visible(false)
    };
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    tracing::info!(
        "lca ready - press {}",
        settings.hotkey.as_deref().unwrap_or("(no hotkey)")
    );
    eframe::run_native(
        "lca",
        native_options,
        Box::new(move |cc| {
            Box::new(PaletteApp::new(&cc.egui_ctx, &settings, backend, hotkeys))
        }),
    )
    .map_err(|e| anyhow::anyhow!("event loop failed: {e}"))?;
    Ok(())
}
