//! Orientation core
//!
//! Pure types and functions that turn device-orientation readings into a camera
//! rotation. Nothing in here touches the platform or the ECS schedule; the
//! plugins under `crate::plugins` wire these pieces into the frame loop.

pub mod calibration;
pub mod rotation;
pub mod sample;

pub use calibration::CalibrationStore;
pub use rotation::orientation_to_rotation;
pub use sample::{CalibrationOffset, CompleteSample, OrientationSample};
