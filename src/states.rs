use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether the panorama viewer is showing.
///
/// Everything scoped to a viewing session (permission, calibration, the sensor
/// and fullscreen listeners) is set up on entering `Open` and torn down on
/// leaving it.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewerState {
    #[default]
    Open,
    Closed,
}

/// Outcome of the orientation permission check for the current session.
///
/// Only exists while the viewer is open, so reopening the viewer starts over
/// from `Pending`. Within a session it moves out of `Pending` once and stays.
#[derive(SubStates, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[source(ViewerState = ViewerState::Open)]
pub enum PermissionState {
    #[default]
    Pending,
    Granted,
    Denied,
}

/// Which input drives the camera.
#[derive(
    States, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// The device orientation sensor.
    Gyro,
    /// Drag and swipe gestures.
    Swipe,
}

impl Default for ControlMode {
    fn default() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Gyro
        } else {
            Self::Swipe
        }
    }
}

impl ControlMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Gyro => Self::Swipe,
            Self::Swipe => Self::Gyro,
        }
    }

    /// Label for a mode toggle.
    pub fn label(self) -> &'static str {
        match self {
            Self::Gyro => "Gyro",
            Self::Swipe => "Swipe",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_mode_toggle_round_trips() {
        assert_eq!(ControlMode::Gyro.toggled(), ControlMode::Swipe);
        assert_eq!(ControlMode::Swipe.toggled(), ControlMode::Gyro);
        assert_eq!(ControlMode::Gyro.toggled().toggled(), ControlMode::Gyro);
    }

    #[test]
    fn test_control_mode_serializes_lowercase() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            mode: ControlMode,
        }

        let text = toml::to_string(&Wrapper {
            mode: ControlMode::Gyro,
        })
        .unwrap();
        assert_eq!(text.trim(), "mode = \"gyro\"");

        let parsed: Wrapper = toml::from_str("mode = \"swipe\"").unwrap();
        assert_eq!(parsed.mode, ControlMode::Swipe);
    }
}
