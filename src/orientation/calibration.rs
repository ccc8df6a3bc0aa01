use super::sample::{CalibrationOffset, CompleteSample, OrientationSample};
use bevy::prelude::*;

/// Holds the neutral pose for the current viewing session.
///
/// The offset starts at zero. The first complete reading after permission is
/// granted becomes the offset automatically; after that only an explicit
/// recalibration moves it. A recalibration is requested from the UI and consumed
/// by the next frame that has a complete reading, so holding a key or repeating
/// a render does not recalibrate twice.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct CalibrationStore {
    offset: CalibrationOffset,
    calibrated: bool,
    recalibration_requested: bool,
}

impl CalibrationStore {
    pub fn offset(&self) -> CalibrationOffset {
        self.offset
    }

    /// Whether an automatic or manual calibration has happened this session.
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Adopts `sample` as the neutral pose if nothing has been calibrated yet.
    ///
    /// Returns `true` when the offset changed. Partial readings are ignored and
    /// leave the store waiting for a complete one.
    pub fn auto_calibrate_if_needed(&mut self, sample: &OrientationSample) -> bool {
        if self.calibrated {
            return false;
        }

        let Some(sample) = sample.complete() else {
            return false;
        };

        self.set_offset(sample);
        info!(
            alpha = sample.alpha,
            beta = sample.beta,
            gamma = sample.gamma,
            "Orientation auto-calibrated"
        );
        true
    }

    /// Adopts `sample` as the neutral pose regardless of earlier calibration.
    pub fn recalibrate(&mut self, sample: &CompleteSample) {
        self.set_offset(*sample);
        info!(
            alpha = sample.alpha,
            beta = sample.beta,
            gamma = sample.gamma,
            "Orientation recalibrated"
        );
    }

    /// Raises the one-shot recalibration flag.
    pub fn request_recalibration(&mut self) {
        self.recalibration_requested = true;
    }

    pub fn recalibration_requested(&self) -> bool {
        self.recalibration_requested
    }

    /// Clears the recalibration flag, returning whether it was raised.
    pub fn take_recalibration_request(&mut self) -> bool {
        std::mem::take(&mut self.recalibration_requested)
    }

    /// Forgets the session's calibration, as when the viewer is reopened.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn set_offset(&mut self, sample: CompleteSample) {
        self.offset = CalibrationOffset::from(sample);
        self.calibrated = true;
    }
}
