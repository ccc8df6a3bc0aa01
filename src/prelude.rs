//! Panoview prelude module
//!
//! This module re-exports the most commonly used types, traits, and functions
//! across the viewer to reduce import boilerplate.

// External crate re-exports
pub use bevy::prelude::*;

// Internal re-exports - Config
pub use crate::config::ViewerConfig;

// Internal re-exports - States
pub use crate::states::{ControlMode, PermissionState, ViewerState};

// Internal re-exports - Events
pub use crate::events::ViewerCommand;

// Internal re-exports - Orientation core
pub use crate::orientation::{CalibrationStore, OrientationSample};

// Internal re-exports - Scheduling
pub use crate::plugins::viewer::{ViewerPlugin, ViewerSet};
