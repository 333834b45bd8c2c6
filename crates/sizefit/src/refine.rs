//! Boundary to an external measurement refiner.
//!
//! A refiner (for example a vision-language service) looks at a geometric
//! estimate and may propose partial overrides, a confidence adjustment and a
//! body build label. The core never trusts it blindly: every override is
//! checked against the geometric value before it is accepted.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use sizefit_core::{round_cm, KeypointSet, Measurement, MeasurementSet};
use sizefit_fusion::ViewAngle;

/// Overrides further than this from the geometric estimate are rejected.
pub const MAX_OVERRIDE_DEVIATION_CM: f64 = 30.0;
/// Refiner confidence deltas are clamped to `±MAX_CONFIDENCE_DELTA`.
pub const MAX_CONFIDENCE_DELTA: i32 = 20;

/// Body build as labelled by the refiner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyBuild {
    Athletic,
    Slim,
    Average,
    Curvy,
    PlusSize,
    #[default]
    #[serde(other)]
    Unknown,
}

/// What a refiner returns for one view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Refinement {
    /// Proposed values for any subset of the canonical measurements. Not yet
    /// validated.
    pub overrides: BTreeMap<Measurement, f64>,
    pub confidence_delta: i32,
    pub body_build: BodyBuild,
    pub reason: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("measurement refiner failed: {message}")]
pub struct RefinerError {
    pub message: String,
}

impl RefinerError {
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// External refinement collaborator.
pub trait MeasurementRefiner {
    fn refine(
        &self,
        angle: ViewAngle,
        keypoints: &KeypointSet,
        geometric: &MeasurementSet,
    ) -> Result<Refinement, RefinerError>;
}

/// Why an override was not applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Negative or non-finite.
    InvalidValue,
    /// More than [`MAX_OVERRIDE_DEVIATION_CM`] away from the geometric value.
    TooFarFromEstimate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RejectedOverride {
    pub measurement: Measurement,
    pub value: f64,
    pub reason: RejectReason,
}

/// Result of merging a [`Refinement`] into a geometric estimate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedRefinement {
    pub measurements: MeasurementSet,
    pub accepted: Vec<Measurement>,
    pub rejected: Vec<RejectedOverride>,
    /// Clamped to `[-20, 20]`.
    pub confidence_delta: i32,
    pub body_build: BodyBuild,
}

/// Merge `refinement` into `geometric`.
///
/// Only keys the refiner supplied change. Accepted values are rounded to
/// 0.1 cm; rejected ones keep the geometric value and are logged. Keys
/// missing from `geometric` are accepted when valid.
pub fn apply_refinement(geometric: &MeasurementSet, refinement: &Refinement) -> AppliedRefinement {
    let mut accepted_pairs = Vec::new();
    let mut rejected = Vec::new();

    for (&measurement, &value) in &refinement.overrides {
        let reason = if !value.is_finite() || value < 0.0 {
            Some(RejectReason::InvalidValue)
        } else {
            geometric
                .get(measurement)
                .filter(|g| (value - g).abs() > MAX_OVERRIDE_DEVIATION_CM)
                .map(|_| RejectReason::TooFarFromEstimate)
        };
        match reason {
            Some(reason) => {
                warn!("rejected refined {measurement} = {value} ({reason:?})");
                rejected.push(RejectedOverride {
                    measurement,
                    value,
                    reason,
                });
            }
            None => accepted_pairs.push((measurement, round_cm(value))),
        }
    }

    let accepted = accepted_pairs.iter().map(|&(m, _)| m).collect();
    // accepted values are finite and non-negative
    let overrides = MeasurementSet::from_pairs(accepted_pairs).unwrap_or_default();

    AppliedRefinement {
        measurements: geometric.merged_with(&overrides),
        accepted,
        rejected,
        confidence_delta: refinement
            .confidence_delta
            .clamp(-MAX_CONFIDENCE_DELTA, MAX_CONFIDENCE_DELTA),
        body_build: refinement.body_build,
    }
}
