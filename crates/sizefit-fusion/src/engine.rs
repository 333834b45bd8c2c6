//! Weighted multi-angle fusion, confidence boost and conflict detection.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sizefit_core::{round_cm, Measurement, MeasurementSet};

use crate::{AngleViews, AngleWeights, FusionError, ViewAngle};

/// Fusion configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionParams {
    pub weights: AngleWeights,
    /// Spread above which a measurement is flagged, in percent of the minimum.
    pub conflict_threshold_percent: f64,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            weights: AngleWeights::default(),
            conflict_threshold_percent: 20.0,
        }
    }
}

/// A measurement whose per-angle values disagree by more than the threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub measurement: Measurement,
    /// `(max - min) / min * 100`, rounded to 0.1.
    pub spread_percent: f64,
    pub min_cm: f64,
    pub max_cm: f64,
    pub angles: Vec<ViewAngle>,
}

/// Combines per-angle measurement sets into one.
#[derive(Clone, Debug, Default)]
pub struct FusionEngine {
    params: FusionParams,
}

impl FusionEngine {
    /// Engine with validated parameters.
    pub fn new(params: FusionParams) -> Result<Self, FusionError> {
        params.weights.validate()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &FusionParams {
        &self.params
    }

    /// Fuse the supplied views.
    ///
    /// A single view is returned unchanged. Otherwise every key present in at
    /// least one view is the weighted mean of the views that define it,
    /// rounded to 0.1 cm. If all contributing weights for a key are zero the
    /// plain mean is used.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, views), fields(num_angles = views.len()))
    )]
    pub fn fuse(&self, views: &AngleViews<MeasurementSet>) -> Result<MeasurementSet, FusionError> {
        if let Some((angle, set)) = views.only() {
            debug!("single {angle} view, fusion is the identity");
            return Ok(set.clone());
        }

        let mut samples: BTreeMap<Measurement, Vec<(f64, f64)>> = BTreeMap::new();
        for (angle, set) in views.iter() {
            for (m, v) in set.iter() {
                samples
                    .entry(m)
                    .or_default()
                    .push((v, self.params.weights.weight(angle, m)));
            }
        }

        let fused = samples
            .into_iter()
            .map(|(m, samples)| (m, round_cm(weighted_mean(&samples))))
            .collect::<Vec<_>>();
        debug!("fused {} measurements from {:?}", fused.len(), views.angles());
        Ok(MeasurementSet::from_pairs(fused)?)
    }

    /// [`FusionEngine::fuse`] over three optional slots.
    ///
    /// Empty sets count as not supplied; fails with `EmptyInput` when nothing
    /// remains.
    pub fn fuse_optional(
        &self,
        front: Option<&MeasurementSet>,
        back: Option<&MeasurementSet>,
        side: Option<&MeasurementSet>,
    ) -> Result<MeasurementSet, FusionError> {
        let views = optional_views(front, back, side)?;
        self.fuse(&views)
    }

    /// Conflicts at the configured threshold.
    pub fn detect_conflicts(&self, views: &AngleViews<MeasurementSet>) -> Vec<Conflict> {
        let conflicts = detect_conflicts(views, self.params.conflict_threshold_percent);
        for c in &conflicts {
            warn!(
                "{} differs by {:.1}% across {:?} ({:.1}..{:.1} cm)",
                c.measurement, c.spread_percent, c.angles, c.min_cm, c.max_cm
            );
        }
        conflicts
    }
}

fn optional_views<'a>(
    front: Option<&'a MeasurementSet>,
    back: Option<&'a MeasurementSet>,
    side: Option<&'a MeasurementSet>,
) -> Result<AngleViews<MeasurementSet>, FusionError> {
    let keep = |s: Option<&'a MeasurementSet>| s.filter(|s| !s.is_empty()).cloned();
    AngleViews::from_optional(keep(front), keep(back), keep(side))
}

fn weighted_mean(samples: &[(f64, f64)]) -> f64 {
    let total_weight: f64 = samples.iter().map(|&(_, w)| w).sum();
    if total_weight > 0.0 {
        samples.iter().map(|&(v, w)| v * w).sum::<f64>() / total_weight
    } else {
        samples.iter().map(|&(v, _)| v).sum::<f64>() / samples.len() as f64
    }
}

/// Extra confidence, in points, earned by observing several angles.
///
/// Base boost is 0/8/15 for 1/2/3 angles (0 otherwise). With quality scores
/// the base is scaled by 1.2 (mean >= 85), 1.0 (>= 70) or 0.8, floored and
/// clipped to 20. An empty score slice counts as not supplied.
pub fn confidence_boost(num_angles: usize, quality_scores: Option<&[f64]>) -> u8 {
    let base: u32 = match num_angles {
        2 => 8,
        3 => 15,
        _ => 0,
    };
    let Some(scores) = quality_scores.filter(|s| !s.is_empty()) else {
        return base as u8;
    };
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    // integer percent keeps 15 * 1.2 at exactly 18
    let percent = if mean >= 85.0 {
        120
    } else if mean >= 70.0 {
        100
    } else {
        80
    };
    (base * percent / 100).min(20) as u8
}

/// Measurements whose spread across the supplied views exceeds
/// `threshold_percent`.
///
/// Needs at least two views; keys seen by a single view or with a minimum of
/// 0 are never flagged. Results come in canonical measurement order, but
/// callers should treat them as a set.
pub fn detect_conflicts(
    views: &AngleViews<MeasurementSet>,
    threshold_percent: f64,
) -> Vec<Conflict> {
    if views.len() < 2 {
        return Vec::new();
    }

    let mut seen: BTreeMap<Measurement, Vec<(ViewAngle, f64)>> = BTreeMap::new();
    for (angle, set) in views.iter() {
        for (m, v) in set.iter() {
            seen.entry(m).or_default().push((angle, v));
        }
    }

    seen.into_iter()
        .filter(|(_, obs)| obs.len() >= 2)
        .filter_map(|(measurement, obs)| {
            let min = obs.iter().map(|&(_, v)| v).fold(f64::INFINITY, f64::min);
            let max = obs.iter().map(|&(_, v)| v).fold(f64::NEG_INFINITY, f64::max);
            if min <= 0.0 {
                return None;
            }
            let spread = (max - min) / min * 100.0;
            (spread > threshold_percent).then(|| Conflict {
                measurement,
                spread_percent: (spread * 10.0).round() / 10.0,
                min_cm: min,
                max_cm: max,
                angles: obs.iter().map(|&(a, _)| a).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Measurement::*;

    fn set(pairs: &[(Measurement, f64)]) -> MeasurementSet {
        MeasurementSet::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn single_view_is_identity() {
        let front = set(&[(Chest, 91.37), (Arm, 60.0)]);
        let engine = FusionEngine::default();
        let fused = engine.fuse_optional(Some(&front), None, None).unwrap();
        assert_eq!(fused, front);
    }

    #[test]
    fn identical_unrounded_views_fuse_to_the_same_set() {
        let m = set(&[(Chest, 91.37), (Arm, 60.04)]);
        let engine = FusionEngine::default();
        let single = engine.fuse_optional(Some(&m), None, None).unwrap();
        let double = engine.fuse_optional(Some(&m), Some(&m), None).unwrap();
        assert_eq!(double, m);
        assert_eq!(double, single);
        assert_eq!(double.get(Chest), Some(91.4));
    }

    #[test]
    fn no_views_is_an_error() {
        let engine = FusionEngine::default();
        assert_eq!(
            engine.fuse_optional(None, None, None).unwrap_err(),
            FusionError::EmptyInput
        );
        let empty = MeasurementSet::default();
        assert_eq!(
            engine.fuse_optional(Some(&empty), None, Some(&empty)).unwrap_err(),
            FusionError::EmptyInput
        );
    }

    #[test]
    fn weighted_mean_uses_angle_weights() {
        let front = set(&[(Shoulder, 40.0)]);
        let back = set(&[(Shoulder, 44.0)]);
        let fused = FusionEngine::default()
            .fuse_optional(Some(&front), Some(&back), None)
            .unwrap();
        // (40 * 0.7 + 44 * 0.8) / 1.5 = 42.13
        assert_eq!(fused.get(Shoulder), Some(42.1));
    }

    #[test]
    fn union_of_keys_and_absent_keys_stay_absent() {
        let front = set(&[(Chest, 90.0)]);
        let side = set(&[(Rise, 25.0)]);
        let fused = FusionEngine::default()
            .fuse_optional(Some(&front), None, Some(&side))
            .unwrap();
        assert_eq!(fused.get(Chest), Some(90.0));
        assert_eq!(fused.get(Rise), Some(25.0));
        assert_eq!(fused.len(), 2);
    }

    #[test]
    fn zero_weights_fall_back_to_plain_mean() {
        let engine = FusionEngine::new(FusionParams {
            weights: AngleWeights::uniform(0.0),
            ..FusionParams::default()
        })
        .unwrap();
        let fused = engine
            .fuse_optional(Some(&set(&[(Neck, 30.0)])), Some(&set(&[(Neck, 34.0)])), None)
            .unwrap();
        assert_eq!(fused.get(Neck), Some(32.0));
    }

    #[test]
    fn invalid_weights_are_rejected_at_construction() {
        let mut weights = AngleWeights::default();
        weights.side.insert(Calf, 2.0);
        let res = FusionEngine::new(FusionParams {
            weights,
            ..FusionParams::default()
        });
        assert!(matches!(res, Err(FusionError::InvalidWeight { .. })));
    }

    #[test]
    fn boost_table() {
        assert_eq!(confidence_boost(0, None), 0);
        assert_eq!(confidence_boost(1, None), 0);
        assert_eq!(confidence_boost(2, None), 8);
        assert_eq!(confidence_boost(3, None), 15);
        assert_eq!(confidence_boost(4, None), 0);
        assert_eq!(confidence_boost(3, Some(&[90.0, 92.0, 88.0])), 18);
        assert_eq!(confidence_boost(2, Some(&[90.0, 92.0])), 9);
        assert_eq!(confidence_boost(3, Some(&[75.0, 70.0, 80.0])), 15);
        assert_eq!(confidence_boost(2, Some(&[50.0, 60.0])), 6);
        assert_eq!(confidence_boost(3, Some(&[])), 15);
    }

    #[test]
    fn conflicts_report_spread_and_angles() {
        let front = set(&[(Chest, 100.0), (Arm, 60.0)]);
        let side = set(&[(Chest, 130.0), (Arm, 61.0)]);
        let views = AngleViews::from_optional(Some(front), None, Some(side)).unwrap();
        let conflicts = detect_conflicts(&views, 20.0);
        assert_eq!(conflicts.len(), 1);
        let c = &conflicts[0];
        assert_eq!(c.measurement, Chest);
        assert_eq!(c.spread_percent, 30.0);
        assert_eq!(c.angles, vec![ViewAngle::Front, ViewAngle::Side]);
    }

    #[test]
    fn threshold_applies_before_rounding_the_spread() {
        let front = set(&[(Hips, 1000.0)]);
        let back = set(&[(Hips, 1200.4)]);
        let views = AngleViews::from_optional(Some(front), Some(back), None).unwrap();
        let conflicts = detect_conflicts(&views, 20.0);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].spread_percent, 20.0);
    }

    #[test]
    fn zero_minimum_is_never_flagged() {
        let views = AngleViews::from_optional(
            Some(set(&[(Rise, 0.0)])),
            Some(set(&[(Rise, 25.0)])),
            None,
        )
        .unwrap();
        assert!(detect_conflicts(&views, 20.0).is_empty());
    }

    #[test]
    fn single_view_has_no_conflicts() {
        let views = AngleViews::single(ViewAngle::Front, set(&[(Chest, 100.0)]));
        assert!(FusionEngine::default().detect_conflicts(&views).is_empty());
    }
}
