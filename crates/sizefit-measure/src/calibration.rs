//! Per-measurement multiplicative corrections learned from a real sample.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sizefit_core::{Measurement, MeasurementSet};

/// Measurement -> multiplier. Absent entries mean `1.0`.
///
/// Owned by one estimator instance; each session gets its own copy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibrationFactors {
    factors: BTreeMap<Measurement, f64>,
}

impl CalibrationFactors {
    /// Identity multipliers for every measurement.
    pub fn identity() -> Self {
        Self::default()
    }

    #[inline]
    pub fn factor(&self, measurement: Measurement) -> f64 {
        self.factors.get(&measurement).copied().unwrap_or(1.0)
    }

    pub fn is_identity(&self) -> bool {
        self.factors.values().all(|&f| f == 1.0)
    }

    /// Derive factors `real / uncalibrated` for every key present in both sets.
    ///
    /// Keys whose uncalibrated estimate is 0 are skipped; factors for keys not
    /// in `real` are left untouched. Returns the keys that were updated.
    pub fn update_from(
        &mut self,
        real: &MeasurementSet,
        uncalibrated: &MeasurementSet,
    ) -> Vec<Measurement> {
        let mut updated = Vec::new();
        for (measurement, actual) in real.iter() {
            let Some(estimated) = uncalibrated.get(measurement) else {
                continue;
            };
            if estimated > 0.0 {
                self.factors.insert(measurement, actual / estimated);
                updated.push(measurement);
            }
        }
        updated
    }

    /// Scale each value of `set` by its factor, rounding to 0.1 cm.
    pub fn apply(&self, set: &MeasurementSet) -> MeasurementSet {
        set.map_values(|m, v| v * self.factor(m))
    }

    pub fn reset(&mut self) {
        self.factors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Measurement, f64)> + '_ {
        self.factors.iter().map(|(&m, &f)| (m, f))
    }
}
