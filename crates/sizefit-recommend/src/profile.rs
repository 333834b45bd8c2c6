use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sizefit_core::Measurement;

use crate::InvalidProfileWeight;

/// Per-measurement importance when scoring a size.
///
/// Measurements with weight 0 (or absent) are not scored, even when the chart
/// defines a range for them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Measurement, f64>", into = "BTreeMap<Measurement, f64>")]
pub struct WeightProfile {
    weights: BTreeMap<Measurement, f64>,
}

impl WeightProfile {
    pub fn new(
        weights: impl IntoIterator<Item = (Measurement, f64)>,
    ) -> Result<Self, InvalidProfileWeight> {
        let mut out = BTreeMap::new();
        for (measurement, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidProfileWeight { measurement, value });
            }
            out.insert(measurement, value);
        }
        Ok(Self { weights: out })
    }

    /// Upper-body garments: chest 3.5, shoulder 2.5, arm 1.5.
    pub fn shirt() -> Self {
        Self::from_table(&[
            (Measurement::Chest, 3.5),
            (Measurement::Shoulder, 2.5),
            (Measurement::Arm, 1.5),
            (Measurement::Waist, 0.0),
            (Measurement::Hips, 0.0),
            (Measurement::Inseam, 0.0),
        ])
    }

    /// Whole-outfit scoring across upper and lower body.
    pub fn full_body() -> Self {
        Self::from_table(&[
            (Measurement::Chest, 2.0),
            (Measurement::Waist, 1.8),
            (Measurement::Hips, 1.5),
            (Measurement::Inseam, 1.0),
            (Measurement::Shoulder, 1.2),
            (Measurement::Arm, 0.8),
        ])
    }

    fn from_table(table: &[(Measurement, f64)]) -> Self {
        Self {
            weights: table.iter().copied().collect(),
        }
    }

    #[inline]
    pub fn weight(&self, measurement: Measurement) -> f64 {
        self.weights.get(&measurement).copied().unwrap_or(0.0)
    }

    /// Measurements with a positive weight, in canonical order.
    pub fn scored(&self) -> impl Iterator<Item = (Measurement, f64)> + '_ {
        self.weights
            .iter()
            .filter(|(_, w)| **w > 0.0)
            .map(|(&m, &w)| (m, w))
    }
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self::shirt()
    }
}

impl TryFrom<BTreeMap<Measurement, f64>> for WeightProfile {
    type Error = InvalidProfileWeight;

    fn try_from(weights: BTreeMap<Measurement, f64>) -> Result<Self, Self::Error> {
        Self::new(weights)
    }
}

impl From<WeightProfile> for BTreeMap<Measurement, f64> {
    fn from(p: WeightProfile) -> Self {
        p.weights
    }
}
