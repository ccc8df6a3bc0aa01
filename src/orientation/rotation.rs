use super::sample::{CalibrationOffset, CompleteSample};
use bevy::math::EulerRot;
use bevy::prelude::*;

/// Maps a sensor reading to a camera rotation relative to the calibrated neutral
/// pose.
///
/// The relative angles are applied as an intrinsic Y-X-Z rotation: compass
/// heading (alpha) yaws about Y, front/back tilt (beta) pitches about X, and
/// left/right tilt (gamma) rolls about Z with its sign flipped. The result is a
/// direct pose, meant to replace the camera rotation rather than accumulate into
/// it.
pub fn orientation_to_rotation(sample: &CompleteSample, offset: &CalibrationOffset) -> Quat {
    let relative = sample.relative_to(offset);

    let yaw = relative.x.to_radians();
    let pitch = relative.y.to_radians();
    let roll = -relative.z.to_radians();

    Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll).normalize()
}
