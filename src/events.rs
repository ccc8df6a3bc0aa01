//! Centralized event definitions
//!
//! The UI layer (keyboard bindings here, or any embedding page) talks to the
//! viewer only through [`ViewerCommand`]. Each command is edge-triggered: one
//! event produces exactly one effect, however many frames follow.

use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    /// Switch between gyro-driven and swipe-driven camera control.
    ToggleControlMode,
    /// Make the current device pose the new neutral pose.
    Recalibrate,
    ToggleFullscreen,
    OpenViewer,
    CloseViewer,
    #[cfg(not(target_arch = "wasm32"))]
    Quit,
}
