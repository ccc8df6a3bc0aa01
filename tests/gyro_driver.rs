//! Integration tests for the gyro-driven camera

use panoview::plugins::camera::PanoramaCamera;
use panoview::prelude::*;
use panoview::test_utils::{
    ScriptedPlatform, create_viewer_app, mark_panorama_loaded, send_command,
};

const EPSILON: f32 = 1e-4;

fn gyro_config() -> ViewerConfig {
    let mut config = ViewerConfig::default();
    config.controls.initial_mode = ControlMode::Gyro;
    config
}

/// Opens the viewer, grants permission, and marks the panorama loaded.
fn ready_gyro_app() -> (App, ScriptedPlatform) {
    let (mut app, platform) = create_viewer_app(gyro_config());
    app.update();

    platform.permission.resolve(PermissionState::Granted);
    app.update();
    mark_panorama_loaded(&mut app);

    (app, platform)
}

fn camera_rotation(app: &mut App) -> Quat {
    app.world_mut()
        .query_filtered::<&Transform, With<PanoramaCamera>>()
        .single(app.world())
        .unwrap()
        .rotation
}

fn set_camera_rotation(app: &mut App, rotation: Quat) {
    app.world_mut()
        .query_filtered::<&mut Transform, With<PanoramaCamera>>()
        .single_mut(app.world_mut())
        .unwrap()
        .rotation = rotation;
}

fn assert_rotation_eq(actual: Quat, expected: Quat) {
    assert!(
        actual.angle_between(expected) < EPSILON,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn test_calibration_scenario() {
    let (mut app, platform) = ready_gyro_app();

    // First complete reading becomes the neutral pose.
    assert!(platform.sensor.emit(OrientationSample::from_degrees(100.0, 20.0, 5.0)));
    app.update();

    let calibration = app.world().resource::<CalibrationStore>();
    assert!(calibration.is_calibrated());
    assert_eq!(calibration.offset().alpha, 100.0);
    assert_eq!(calibration.offset().beta, 20.0);
    assert_eq!(calibration.offset().gamma, 5.0);
    assert_rotation_eq(camera_rotation(&mut app), Quat::IDENTITY);

    // Holding the same pose stays at identity.
    platform.sensor.emit(OrientationSample::from_degrees(100.0, 20.0, 5.0));
    app.update();
    assert_rotation_eq(camera_rotation(&mut app), Quat::IDENTITY);

    // Recalibrate at a new pose.
    platform.sensor.emit(OrientationSample::from_degrees(150.0, 30.0, -10.0));
    send_command(&mut app, ViewerCommand::Recalibrate);
    app.update();

    let calibration = app.world().resource::<CalibrationStore>();
    assert_eq!(calibration.offset().alpha, 150.0);
    assert!(!calibration.recalibration_requested());
    assert_rotation_eq(camera_rotation(&mut app), Quat::IDENTITY);

    // Turning 10° in alpha is a pure 10° yaw.
    platform.sensor.emit(OrientationSample::from_degrees(160.0, 30.0, -10.0));
    app.update();
    assert_rotation_eq(
        camera_rotation(&mut app),
        Quat::from_rotation_y(10.0_f32.to_radians()),
    );
}

#[test]
fn test_auto_calibration_fires_once_per_session() {
    let (mut app, platform) = ready_gyro_app();

    platform.sensor.emit(OrientationSample::from_degrees(10.0, 0.0, 0.0));
    app.update();
    platform.sensor.emit(OrientationSample::from_degrees(40.0, 0.0, 0.0));
    app.update();

    let calibration = app.world().resource::<CalibrationStore>();
    assert_eq!(calibration.offset().alpha, 10.0);
    assert_rotation_eq(
        camera_rotation(&mut app),
        Quat::from_rotation_y(30.0_f32.to_radians()),
    );
}

#[test]
fn test_recalibration_waits_for_a_complete_reading() {
    let (mut app, platform) = ready_gyro_app();

    platform.sensor.emit(OrientationSample::from_degrees(10.0, 0.0, 0.0));
    app.update();

    platform.sensor.emit(OrientationSample::new(Some(50.0), None, Some(0.0)));
    send_command(&mut app, ViewerCommand::Recalibrate);
    app.update();

    let calibration = app.world().resource::<CalibrationStore>();
    assert!(calibration.recalibration_requested());
    assert_eq!(calibration.offset().alpha, 10.0);

    platform.sensor.emit(OrientationSample::from_degrees(60.0, 0.0, 0.0));
    app.update();

    let calibration = app.world().resource::<CalibrationStore>();
    assert!(!calibration.recalibration_requested());
    assert_eq!(calibration.offset().alpha, 60.0);
}

#[test]
fn test_partial_reading_is_never_applied() {
    let (mut app, platform) = ready_gyro_app();
    let untouched = Quat::from_rotation_x(0.3);
    set_camera_rotation(&mut app, untouched);

    platform.sensor.emit(OrientationSample::new(Some(10.0), None, Some(3.0)));
    app.update();

    assert!(!app.world().resource::<CalibrationStore>().is_calibrated());
    assert_rotation_eq(camera_rotation(&mut app), untouched);
}

#[test]
fn test_no_writes_before_panorama_loads() {
    let (mut app, platform) = create_viewer_app(gyro_config());
    app.update();
    platform.permission.resolve(PermissionState::Granted);
    app.update();

    let untouched = Quat::from_rotation_x(0.3);
    set_camera_rotation(&mut app, untouched);

    platform.sensor.emit(OrientationSample::from_degrees(100.0, 20.0, 5.0));
    app.update();

    assert!(!app.world().resource::<CalibrationStore>().is_calibrated());
    assert_rotation_eq(camera_rotation(&mut app), untouched);
}

#[test]
fn test_swipe_mode_never_writes_the_camera() {
    let mut config = gyro_config();
    config.controls.initial_mode = ControlMode::Swipe;
    let (mut app, platform) = create_viewer_app(config);
    app.update();
    platform.permission.resolve(PermissionState::Granted);
    app.update();
    mark_panorama_loaded(&mut app);

    let untouched = Quat::from_rotation_x(0.3);
    set_camera_rotation(&mut app, untouched);

    platform.sensor.emit(OrientationSample::from_degrees(100.0, 20.0, 5.0));
    app.update();
    platform.sensor.emit(OrientationSample::from_degrees(130.0, 20.0, 5.0));
    app.update();

    assert!(!app.world().resource::<CalibrationStore>().is_calibrated());
    assert_rotation_eq(camera_rotation(&mut app), untouched);
}

#[test]
fn test_denied_permission_never_drives_the_camera() {
    let (mut app, platform) = create_viewer_app(gyro_config());
    app.update();

    platform.permission.resolve(PermissionState::Denied);
    app.update();
    mark_panorama_loaded(&mut app);

    assert_eq!(
        *app.world().resource::<State<PermissionState>>().get(),
        PermissionState::Denied
    );
    assert!(!platform.sensor.is_attached());
    assert!(!platform.sensor.emit(OrientationSample::from_degrees(1.0, 2.0, 3.0)));

    let untouched = Quat::from_rotation_x(0.3);
    set_camera_rotation(&mut app, untouched);
    app.update();

    assert!(!app.world().resource::<CalibrationStore>().is_calibrated());
    assert_rotation_eq(camera_rotation(&mut app), untouched);
    // Denial leaves the mode to the user.
    assert_eq!(
        *app.world().resource::<State<ControlMode>>().get(),
        ControlMode::Gyro
    );
}

#[test]
fn test_recalibration_ignored_in_swipe_mode() {
    let mut config = gyro_config();
    config.controls.initial_mode = ControlMode::Swipe;
    let (mut app, platform) = create_viewer_app(config);
    app.update();
    platform.permission.resolve(PermissionState::Granted);
    app.update();
    mark_panorama_loaded(&mut app);

    send_command(&mut app, ViewerCommand::Recalibrate);
    for _ in 0..10 {
        app.update();
    }
    assert!(!app.world().resource::<CalibrationStore>().recalibration_requested());

    // Switching to gyro later auto-calibrates instead of recalibrating.
    send_command(&mut app, ViewerCommand::ToggleControlMode);
    app.update();
    app.update();
    platform.sensor.emit(OrientationSample::from_degrees(70.0, 0.0, 0.0));
    app.update();

    let calibration = app.world().resource::<CalibrationStore>();
    assert!(calibration.is_calibrated());
    assert!(!calibration.recalibration_requested());
    assert_eq!(calibration.offset().alpha, 70.0);
}

#[test]
fn test_leaving_gyro_drops_pending_recalibration() {
    let (mut app, platform) = ready_gyro_app();

    // No complete reading yet, so the request stays pending.
    platform.sensor.emit(OrientationSample::new(None, Some(1.0), Some(2.0)));
    send_command(&mut app, ViewerCommand::Recalibrate);
    app.update();
    assert!(app.world().resource::<CalibrationStore>().recalibration_requested());

    send_command(&mut app, ViewerCommand::ToggleControlMode);
    app.update();
    app.update();

    assert_eq!(
        *app.world().resource::<State<ControlMode>>().get(),
        ControlMode::Swipe
    );
    assert!(!app.world().resource::<CalibrationStore>().recalibration_requested());
}
