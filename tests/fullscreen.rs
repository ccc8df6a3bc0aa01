//! Integration tests for fullscreen toggling

use panoview::platform::FullscreenNotice;
use panoview::plugins::fullscreen::FullscreenController;
use panoview::prelude::*;
use panoview::test_utils::{create_viewer_app, send_command};

fn controller(app: &App) -> &FullscreenController {
    app.world().resource::<FullscreenController>()
}

#[test]
fn test_state_changes_only_on_notification() {
    let (mut app, platform) = create_viewer_app(ViewerConfig::default());
    app.update();

    send_command(&mut app, ViewerCommand::ToggleFullscreen);
    app.update();

    assert_eq!(platform.fullscreen.requests(), vec![true]);
    assert!(controller(&app).is_pending());
    assert!(!controller(&app).is_active());

    assert!(platform.fullscreen.notify(FullscreenNotice::Changed { active: true }));
    app.update();

    assert!(controller(&app).is_active());
    assert!(!controller(&app).is_pending());

    send_command(&mut app, ViewerCommand::ToggleFullscreen);
    app.update();

    assert_eq!(platform.fullscreen.requests(), vec![true, false]);
}

#[test]
fn test_toggle_ignored_while_request_pending() {
    let (mut app, platform) = create_viewer_app(ViewerConfig::default());
    app.update();

    send_command(&mut app, ViewerCommand::ToggleFullscreen);
    app.update();
    send_command(&mut app, ViewerCommand::ToggleFullscreen);
    app.update();

    assert_eq!(platform.fullscreen.requests(), vec![true]);
}

#[test]
fn test_rejected_request_leaves_state_unchanged() {
    let (mut app, platform) = create_viewer_app(ViewerConfig::default());
    app.update();

    platform.fullscreen.refuse_requests(true);
    send_command(&mut app, ViewerCommand::ToggleFullscreen);
    app.update();

    assert_eq!(platform.fullscreen.requests(), vec![true]);
    assert!(!controller(&app).is_pending());
    assert!(!controller(&app).is_active());

    // An asynchronous rejection also ends the pending request.
    platform.fullscreen.refuse_requests(false);
    send_command(&mut app, ViewerCommand::ToggleFullscreen);
    app.update();
    assert!(controller(&app).is_pending());

    platform.fullscreen.notify(FullscreenNotice::Rejected);
    app.update();

    assert!(!controller(&app).is_pending());
    assert!(!controller(&app).is_active());
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn test_window_mode_change_is_reported_a_frame_later() {
    use bevy::window::{PrimaryWindow, WindowMode};
    use panoview::platform::WindowFullscreen;
    use panoview::plugins::fullscreen::FullscreenBackend;

    let (mut app, _platform) = create_viewer_app(ViewerConfig::default());
    app.insert_non_send_resource(FullscreenBackend(Box::new(WindowFullscreen::default())));
    app.update();
    app.update();

    send_command(&mut app, ViewerCommand::ToggleFullscreen);
    app.update();

    let mode = app
        .world_mut()
        .query_filtered::<&Window, With<PrimaryWindow>>()
        .single(app.world())
        .unwrap()
        .mode;
    assert!(matches!(mode, WindowMode::BorderlessFullscreen(_)));
    assert!(controller(&app).is_pending());
    assert!(!controller(&app).is_active());

    app.update();

    assert!(controller(&app).is_active());
    assert!(!controller(&app).is_pending());
}
