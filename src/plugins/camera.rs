//! Camera plugin - Self-contained plugin pattern
//!
//! Spawns the panorama camera at the sphere's center. The camera carries a
//! `PanOrbitCamera` for swipe control; in gyro mode that controller is switched
//! off and the gyro driver owns the rotation instead.

use crate::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;
use bevy_panorbit_camera::TouchControls;
use std::f32::consts::FRAC_PI_2;

/// Keeps swipe pitch just short of straight up and down.
pub const SWIPE_PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Marks the camera that looks at the panorama.
#[derive(Component, Debug, Default)]
pub struct PanoramaCamera;

/// Plugin that handles camera setup
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera);
    }
}

fn spawn_camera(mut commands: Commands, config: Res<ViewerConfig>) {
    commands.spawn((
        Name::new("Panorama Camera"),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera.fov_degrees.to_radians(),
            ..default()
        }),
        Transform::from_translation(Vec3::Z * config.camera.orbit_radius),
        PanOrbitCamera {
            enabled: config.controls.initial_mode == ControlMode::Swipe,
            focus: Vec3::ZERO,
            radius: Some(config.camera.orbit_radius),
            orbit_sensitivity: config.controls.swipe_sensitivity,
            orbit_smoothness: 0.0,
            pan_sensitivity: 0.0,
            pan_smoothness: 0.0,
            zoom_sensitivity: 0.0,
            pitch_upper_limit: Some(SWIPE_PITCH_LIMIT),
            pitch_lower_limit: Some(-SWIPE_PITCH_LIMIT),
            touch_enabled: config.controls.touch_enabled,
            touch_controls: TouchControls::OneFingerOrbit,
            ..default()
        },
        PanoramaCamera,
    ));
}
