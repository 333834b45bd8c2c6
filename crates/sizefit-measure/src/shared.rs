use std::sync::{Arc, PoisonError, RwLock};

use sizefit_core::{InputError, KeypointSet, Measurement, MeasurementSet, ScaleFactor};

use crate::{BodyType, CalibrationFactors, MeasurementModel};

/// A [`MeasurementModel`] shared between threads.
///
/// Estimates run under the read lock; calibration takes the write lock, so
/// factor updates are serialized and never observed half-applied.
#[derive(Clone, Debug, Default)]
pub struct SharedMeasurementModel {
    inner: Arc<RwLock<MeasurementModel>>,
}

impl SharedMeasurementModel {
    pub fn new(model: MeasurementModel) -> Self {
        Self {
            inner: Arc::new(RwLock::new(model)),
        }
    }

    pub fn estimate(
        &self,
        keypoints: &KeypointSet,
        scale: ScaleFactor,
        body_type: Option<BodyType>,
    ) -> Result<MeasurementSet, InputError> {
        // Factor writes are single map inserts, so a poisoned lock still
        // guards a consistent model.
        let model = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        model.estimate(keypoints, scale, body_type)
    }

    pub fn calibrate(
        &self,
        keypoints: &KeypointSet,
        scale: ScaleFactor,
        body_type: Option<BodyType>,
        real: &MeasurementSet,
    ) -> Result<Vec<Measurement>, InputError> {
        let mut model = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        model.calibrate(keypoints, scale, body_type, real)
    }

    /// Snapshot of the current calibration factors.
    pub fn calibration(&self) -> CalibrationFactors {
        let model = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        model.calibration().clone()
    }
}
