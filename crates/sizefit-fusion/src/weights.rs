//! Per-angle, per-measurement reliability weights.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sizefit_core::Measurement;

use crate::{FusionError, ViewAngle};

/// How reliably each viewing angle observes each measurement, in `[0, 1]`.
///
/// Back views see shoulder and back width best; side views see lengths
/// (torso, inseam, arm) and rise best. Unlisted keys use `default_weight`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleWeights {
    pub front: BTreeMap<Measurement, f64>,
    pub back: BTreeMap<Measurement, f64>,
    pub side: BTreeMap<Measurement, f64>,
    pub default_weight: f64,
}

use Measurement::*;

const MEASUREMENT_ORDER: [Measurement; 15] = [
    Chest, Waist, Hips, Shoulder, Inseam, Arm, Neck, Bicep, Wrist, Thigh, Calf, Ankle,
    TorsoLength, BackWidth, Rise,
];

// Columns follow MEASUREMENT_ORDER.
const FRONT: [f64; 15] = [
    0.60, 0.55, 0.55, 0.70, 0.50, 0.50, 0.60, 0.45, 0.50, 0.45, 0.45, 0.50, 0.60, 0.20, 0.40,
];
const BACK: [f64; 15] = [
    0.30, 0.35, 0.35, 0.80, 0.40, 0.40, 0.30, 0.45, 0.40, 0.35, 0.40, 0.40, 0.50, 0.80, 0.40,
];
const SIDE: [f64; 15] = [
    0.70, 0.60, 0.60, 0.40, 0.70, 0.70, 0.50, 0.60, 0.50, 0.70, 0.65, 0.60, 0.80, 0.40, 0.80,
];

fn table(column: &[f64; 15]) -> BTreeMap<Measurement, f64> {
    MEASUREMENT_ORDER.into_iter().zip(column.iter().copied()).collect()
}

impl Default for AngleWeights {
    fn default() -> Self {
        Self {
            front: table(&FRONT),
            back: table(&BACK),
            side: table(&SIDE),
            default_weight: 0.5,
        }
    }
}

impl AngleWeights {
    /// Every key unweighted: fusion degenerates to the plain mean.
    pub fn uniform(weight: f64) -> Self {
        Self {
            front: BTreeMap::new(),
            back: BTreeMap::new(),
            side: BTreeMap::new(),
            default_weight: weight,
        }
    }

    fn angle_table(&self, angle: ViewAngle) -> &BTreeMap<Measurement, f64> {
        match angle {
            ViewAngle::Front => &self.front,
            ViewAngle::Back => &self.back,
            ViewAngle::Side => &self.side,
        }
    }

    #[inline]
    pub fn weight(&self, angle: ViewAngle, measurement: Measurement) -> f64 {
        self.angle_table(angle)
            .get(&measurement)
            .copied()
            .unwrap_or(self.default_weight)
    }

    /// Check that every weight (and the default) lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), FusionError> {
        let ok = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        for angle in ViewAngle::ALL {
            for (&measurement, &value) in self.angle_table(angle) {
                if !ok(value) {
                    return Err(FusionError::InvalidWeight {
                        angle,
                        measurement,
                        value,
                    });
                }
            }
        }
        if !ok(self.default_weight) {
            return Err(FusionError::InvalidDefaultWeight(self.default_weight));
        }
        Ok(())
    }
}
