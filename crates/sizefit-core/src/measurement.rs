//! Canonical body measurement vocabulary and measurement sets.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::InputError;

/// Canonical measurement names. All values are centimeters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    Chest,
    Waist,
    Hips,
    Inseam,
    Shoulder,
    Arm,
    Neck,
    Wrist,
    Thigh,
    Calf,
    Bicep,
    TorsoLength,
    BackWidth,
    Rise,
    Ankle,
}

impl Measurement {
    pub const ALL: [Measurement; 15] = [
        Measurement::Chest,
        Measurement::Waist,
        Measurement::Hips,
        Measurement::Inseam,
        Measurement::Shoulder,
        Measurement::Arm,
        Measurement::Neck,
        Measurement::Wrist,
        Measurement::Thigh,
        Measurement::Calf,
        Measurement::Bicep,
        Measurement::TorsoLength,
        Measurement::BackWidth,
        Measurement::Rise,
        Measurement::Ankle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Measurement::Chest => "chest",
            Measurement::Waist => "waist",
            Measurement::Hips => "hips",
            Measurement::Inseam => "inseam",
            Measurement::Shoulder => "shoulder",
            Measurement::Arm => "arm",
            Measurement::Neck => "neck",
            Measurement::Wrist => "wrist",
            Measurement::Thigh => "thigh",
            Measurement::Calf => "calf",
            Measurement::Bicep => "bicep",
            Measurement::TorsoLength => "torso_length",
            Measurement::BackWidth => "back_width",
            Measurement::Rise => "rise",
            Measurement::Ankle => "ankle",
        }
    }

    /// Index into [`Measurement::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Measurement {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measurement::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| InputError::UnknownMeasurement(s.to_string()))
    }
}

/// Round to one decimal place (0.1 cm), half away from zero.
#[inline]
pub fn round_cm(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Measurement name -> centimeters.
///
/// Estimator output always holds all 15 canonical entries; refined, fused, or
/// caller-supplied sets may hold any subset. Values are finite, `>= 0` and
/// rounded to 0.1 cm on construction. Sets are never edited in place: every
/// stage produces a new one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Measurement, f64>",
    into = "BTreeMap<Measurement, f64>"
)]
pub struct MeasurementSet {
    values: BTreeMap<Measurement, f64>,
}

impl MeasurementSet {
    /// Build a set from `(measurement, cm)` pairs, validating every value and
    /// rounding it with [`round_cm`].
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (Measurement, f64)>,
    ) -> Result<Self, InputError> {
        let mut values = BTreeMap::new();
        for (measurement, value) in pairs {
            if !value.is_finite() || value < 0.0 {
                return Err(InputError::InvalidMeasurement { measurement, value });
            }
            values.insert(measurement, round_cm(value));
        }
        Ok(Self { values })
    }

    /// Parse a set keyed by measurement names (e.g. `{"chest": 83.0}`).
    pub fn from_named<'a>(
        pairs: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<Self, InputError> {
        let parsed = pairs
            .into_iter()
            .map(|(name, value)| Ok((name.parse::<Measurement>()?, value)))
            .collect::<Result<Vec<_>, InputError>>()?;
        Self::from_pairs(parsed)
    }

    #[inline]
    pub fn get(&self, measurement: Measurement) -> Option<f64> {
        self.values.get(&measurement).copied()
    }

    #[inline]
    pub fn contains(&self, measurement: Measurement) -> bool {
        self.values.contains_key(&measurement)
    }

    /// Entries in canonical measurement order.
    pub fn iter(&self) -> impl Iterator<Item = (Measurement, f64)> + '_ {
        self.values.iter().map(|(&m, &v)| (m, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = Measurement> + '_ {
        self.values.keys().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when all 15 canonical measurements are present.
    pub fn is_complete(&self) -> bool {
        Measurement::ALL.iter().all(|m| self.values.contains_key(m))
    }

    /// New set with `overrides` replacing (or adding) entries of `self`.
    pub fn merged_with(&self, overrides: &MeasurementSet) -> MeasurementSet {
        let mut values = self.values.clone();
        values.extend(overrides.iter());
        MeasurementSet { values }
    }

    /// New set with `f` applied to every value; results are clamped at 0 and
    /// rounded to 0.1 cm.
    pub fn map_values(&self, mut f: impl FnMut(Measurement, f64) -> f64) -> MeasurementSet {
        let values = self
            .values
            .iter()
            .map(|(&m, &v)| {
                let out = f(m, v);
                let out = if out.is_finite() { out.max(0.0) } else { 0.0 };
                (m, round_cm(out))
            })
            .collect();
        MeasurementSet { values }
    }
}

impl TryFrom<BTreeMap<Measurement, f64>> for MeasurementSet {
    type Error = InputError;

    fn try_from(values: BTreeMap<Measurement, f64>) -> Result<Self, Self::Error> {
        Self::from_pairs(values)
    }
}

impl From<MeasurementSet> for BTreeMap<Measurement, f64> {
    fn from(set: MeasurementSet) -> Self {
        set.values
    }
}
