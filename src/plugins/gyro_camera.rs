//! Gyro camera plugin
//!
//! Once per frame, turns the latest orientation reading into the camera's
//! rotation. Nothing is written unless the viewer is in gyro mode, permission
//! was granted, and the panorama has loaded; a frame whose latest reading is
//! missing a component is skipped as well.

use crate::orientation::orientation_to_rotation;
use crate::plugins::camera::PanoramaCamera;
use crate::plugins::panorama::panorama_ready;
use crate::plugins::sensor::OrientationSampler;
use crate::prelude::*;

pub struct GyroCameraPlugin;

impl Plugin for GyroCameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CalibrationStore>();

        app.add_systems(OnEnter(ViewerState::Open), reset_calibration);
        app.add_systems(OnExit(ControlMode::Gyro), drop_recalibration_request);
        app.add_systems(
            Update,
            request_recalibration.in_set(ViewerSet::Commands),
        );
        app.add_systems(
            Update,
            drive_camera_from_orientation
                .in_set(ViewerSet::Camera)
                .run_if(in_state(ControlMode::Gyro))
                .run_if(in_state(PermissionState::Granted))
                .run_if(panorama_ready),
        );
    }
}

fn reset_calibration(mut calibration: ResMut<CalibrationStore>) {
    calibration.reset();
}

fn drop_recalibration_request(mut calibration: ResMut<CalibrationStore>) {
    if calibration.take_recalibration_request() {
        debug!("Pending recalibration dropped on leaving gyro control");
    }
}

/// Raises the recalibration flag. Ignored outside gyro control.
fn request_recalibration(
    mut commands: EventReader<ViewerCommand>,
    mode: Res<State<ControlMode>>,
    mut calibration: ResMut<CalibrationStore>,
) {
    let requested = commands
        .read()
        .filter(|command| **command == ViewerCommand::Recalibrate)
        .count()
        > 0;
    if !requested {
        return;
    }

    if *mode.get() == ControlMode::Gyro {
        debug!("Recalibration requested");
        calibration.request_recalibration();
    } else {
        debug!("Recalibration ignored outside gyro control");
    }
}

/// Writes the calibrated device orientation into the panorama camera.
pub fn drive_camera_from_orientation(
    sampler: Res<OrientationSampler>,
    mut calibration: ResMut<CalibrationStore>,
    mut cameras: Query<&mut Transform, With<PanoramaCamera>>,
) {
    let latest = sampler.latest();
    let Some(sample) = latest.complete() else {
        return;
    };

    // The request stays raised until a frame has a reading to calibrate with.
    if calibration.take_recalibration_request() {
        calibration.recalibrate(&sample);
    }
    calibration.auto_calibrate_if_needed(&latest);

    let rotation = orientation_to_rotation(&sample, &calibration.offset());
    for mut transform in &mut cameras {
        transform.rotation = rotation;
    }
}
