//! Control mode plugin
//!
//! Switches camera ownership between the gyro driver and the swipe controller.
//! Exactly one of them may write the camera in any frame: entering `Gyro`
//! switches the swipe controller off, entering `Swipe` switches it back on,
//! seeded with the pose the gyro left behind.

use crate::plugins::camera::{PanoramaCamera, SWIPE_PITCH_LIMIT};
use crate::prelude::*;
use bevy::math::EulerRot;
use bevy_panorbit_camera::PanOrbitCamera;

pub struct ControlModePlugin;

impl Plugin for ControlModePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            handle_toggle_control_mode.in_set(ViewerSet::Commands),
        );
        app.add_systems(OnEnter(ControlMode::Gyro), release_swipe_control);
        app.add_systems(OnEnter(ControlMode::Swipe), resume_swipe_control);
    }
}

fn handle_toggle_control_mode(
    mut commands: EventReader<ViewerCommand>,
    mode: Res<State<ControlMode>>,
    mut next_mode: ResMut<NextState<ControlMode>>,
) {
    // Two toggles in one frame cancel out.
    let toggles = commands
        .read()
        .filter(|command| **command == ViewerCommand::ToggleControlMode)
        .count();

    if toggles % 2 == 1 {
        let target = mode.get().toggled();
        info!("Switching to {} control", target.label());
        next_mode.set(target);
    }
}

fn release_swipe_control(mut cameras: Query<&mut PanOrbitCamera, With<PanoramaCamera>>) {
    for mut orbit in &mut cameras {
        orbit.enabled = false;
    }
}

fn resume_swipe_control(
    mut cameras: Query<(&mut PanOrbitCamera, &Transform), With<PanoramaCamera>>,
) {
    for (mut orbit, transform) in &mut cameras {
        let (yaw, pitch) = swipe_angles_from_rotation(transform.rotation);
        orbit.yaw = Some(yaw);
        orbit.target_yaw = yaw;
        orbit.pitch = Some(pitch);
        orbit.target_pitch = pitch;
        orbit.force_update = true;
        orbit.enabled = true;
    }
}

/// Yaw and pitch under which the orbit controller reproduces `rotation`'s
/// viewing direction.
///
/// The orbit controller builds its rotation as `yaw about Y * -pitch about X`
/// and has no roll, so any roll in `rotation` is dropped.
pub fn swipe_angles_from_rotation(rotation: Quat) -> (f32, f32) {
    let (yaw, tilt, _roll) = rotation.to_euler(EulerRot::YXZ);
    (yaw, (-tilt).clamp(-SWIPE_PITCH_LIMIT, SWIPE_PITCH_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_swipe_angles_reproduce_orbit_rotation() {
        let yaw = 0.7;
        let pitch = -0.3;
        let rotation = Quat::from_rotation_y(yaw) * Quat::from_rotation_x(-pitch);

        let (recovered_yaw, recovered_pitch) = swipe_angles_from_rotation(rotation);

        assert!((recovered_yaw - yaw).abs() < EPSILON);
        assert!((recovered_pitch - pitch).abs() < EPSILON);
    }

    #[test]
    fn test_swipe_angles_drop_roll() {
        let with_roll = Quat::from_euler(EulerRot::YXZ, 0.5, 0.2, 0.9);
        let without_roll = Quat::from_euler(EulerRot::YXZ, 0.5, 0.2, 0.0);

        let a = swipe_angles_from_rotation(with_roll);
        let b = swipe_angles_from_rotation(without_roll);

        assert!((a.0 - b.0).abs() < EPSILON);
        assert!((a.1 - b.1).abs() < EPSILON);
    }
}
