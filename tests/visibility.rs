use eframe::egui;
use lca_launcher::shell::WindowCommand;
use lca_launcher::visibility::{
    apply_window_commands, centered_position, parking_position, WindowGeometry,
};

#[path = "mock_ctx.rs"]
mod mock_ctx;
use mock_ctx::MockCtx;

fn geometry(offscreen: Option<egui::Pos2>) -> WindowGeometry {
    WindowGeometry {
        size: egui::vec2(700.0, 500.0),
        offscreen,
    }
}

#[test]
fn center_on_1080p() {
    let pos = centered_position(egui::vec2(1920.0, 1080.0), egui::vec2(700.0, 500.0));
    assert_eq!(pos, egui::pos2(610.0, 290.0));
}

#[test]
fn center_never_goes_negative() {
    let pos = centered_position(egui::vec2(640.0, 480.0), egui::vec2(700.0, 500.0));
    assert_eq!(pos, egui::pos2(0.0, 0.0));
}

#[test]
fn show_center_focus_sends_viewport_commands() {
    let ctx = MockCtx::with_monitor(1920.0, 1080.0);
    apply_window_commands(
        &ctx,
        &[WindowCommand::Show, WindowCommand::Center, WindowCommand::Focus],
        geometry(None),
    );
    let cmds = ctx.commands.lock().unwrap();
    assert_eq!(cmds.len(), 4);
    match cmds[0] {
        egui::ViewportCommand::Visible(v) => assert!(v),
        _ => panic!("unexpected command"),
    }
    match cmds[1] {
        egui::ViewportCommand::Minimized(m) => assert!(!m),
        _ => panic!("unexpected command"),
    }
    match cmds[2] {
        egui::ViewportCommand::OuterPosition(pos) => assert_eq!(pos, egui::pos2(610.0, 290.0)),
        _ => panic!("unexpected command"),
    }
    assert!(matches!(cmds[3], egui::ViewportCommand::Focus));
}

#[test]
fn center_without_monitor_info_is_skipped() {
    let ctx = MockCtx::default();
    apply_window_commands(&ctx, &[WindowCommand::Center], geometry(None));
    assert!(ctx.commands.lock().unwrap().is_empty());
}

#[test]
fn hide_moves_window_offscreen() {
    let ctx = MockCtx::default();
    apply_window_commands(
        &ctx,
        &[WindowCommand::Hide],
        geometry(Some(egui::pos2(2000.0, 2000.0))),
    );
    let cmds = ctx.commands.lock().unwrap();
    assert_eq!(cmds.len(), 1);
    match cmds[0] {
        egui::ViewportCommand::OuterPosition(pos) => {
            assert_eq!(pos.x, 2000.0);
            assert_eq!(pos.y, 2000.0);
        }
        _ => panic!("unexpected command"),
    }
}

#[test]
fn hide_without_offscreen_unmaps_window() {
    let ctx = MockCtx::default();
    apply_window_commands(&ctx, &[WindowCommand::Hide], geometry(None));
    let cmds = ctx.commands.lock().unwrap();
    assert!(matches!(cmds[..], [egui::ViewportCommand::Visible(false)]));
}

#[test]
fn parking_spot_clears_large_monitors() {
    let configured = egui::pos2(2000.0, 2000.0);
    assert_eq!(parking_position(configured, None), configured);
    assert_eq!(
        parking_position(configured, Some(egui::vec2(1920.0, 1080.0))),
        configured
    );
    assert_eq!(
        parking_position(configured, Some(egui::vec2(3840.0, 2160.0))),
        egui::pos2(3841.0, 2161.0)
    );
}

#[test]
fn hide_on_4k_monitor_parks_past_the_screen() {
    let ctx = MockCtx::with_monitor(3840.0, 2160.0);
    apply_window_commands(
        &ctx,
        &[WindowCommand::Hide],
        geometry(Some(egui::pos2(2000.0, 2000.0))),
    );
    let cmds = ctx.commands.lock().unwrap();
    match &cmds[..] {
        [egui::ViewportCommand::OuterPosition(pos)] => {
            assert!(pos.x >= 3840.0 && pos.y >= 2160.0);
        }
        _ => panic!("unexpected commands: {cmds:?}"),
    }
}
