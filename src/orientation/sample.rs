use bevy::prelude::*;

/// A single reading from the platform orientation stream, in degrees.
///
/// Any component may be missing: browsers deliver `null` until the sensor has
/// produced a reading, and desktops never produce one at all.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationSample {
    /// Compass heading, `[0, 360)`.
    pub alpha: Option<f32>,
    /// Front/back tilt, `[-180, 180)`.
    pub beta: Option<f32>,
    /// Left/right tilt.
    pub gamma: Option<f32>,
}

impl OrientationSample {
    pub const EMPTY: Self = Self {
        alpha: None,
        beta: None,
        gamma: None,
    };

    pub fn new(alpha: Option<f32>, beta: Option<f32>, gamma: Option<f32>) -> Self {
        Self { alpha, beta, gamma }
    }

    /// Shorthand for a reading with all three components present.
    pub fn from_degrees(alpha: f32, beta: f32, gamma: f32) -> Self {
        Self::new(Some(alpha), Some(beta), Some(gamma))
    }

    /// Returns the reading only when every component is present.
    pub fn complete(&self) -> Option<CompleteSample> {
        Some(CompleteSample {
            alpha: self.alpha?,
            beta: self.beta?,
            gamma: self.gamma?,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.complete().is_some()
    }
}

/// An orientation reading whose three components are all known.
///
/// This is the only form the rotation mapping and the calibration store accept,
/// so a partial reading can never be half-applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompleteSample {
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
}

impl From<CompleteSample> for OrientationSample {
    fn from(sample: CompleteSample) -> Self {
        Self::from_degrees(sample.alpha, sample.beta, sample.gamma)
    }
}

/// The reading that is defined as the neutral pose.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibrationOffset {
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
}

impl CalibrationOffset {
    pub const ZERO: Self = Self {
        alpha: 0.0,
        beta: 0.0,
        gamma: 0.0,
    };
}

impl From<CompleteSample> for CalibrationOffset {
    fn from(sample: CompleteSample) -> Self {
        Self {
            alpha: sample.alpha,
            beta: sample.beta,
            gamma: sample.gamma,
        }
    }
}

impl CompleteSample {
    /// Angles relative to `offset`, in degrees, as `(alpha, beta, gamma)`.
    pub fn relative_to(&self, offset: &CalibrationOffset) -> Vec3 {
        Vec3::new(
            self.alpha - offset.alpha,
            self.beta - offset.beta,
            self.gamma - offset.gamma,
        )
    }
}
