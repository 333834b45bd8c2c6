//! Keypoints + scale -> canonical 15-entry measurement set.

use log::debug;
use sizefit_core::{
    distance, mean2, midpoint, polyline_length, round_cm, InputError, KeypointSet, Landmark,
    Measurement, MeasurementSet, ScaleFactor,
};

use crate::{AnthropometricParams, BodyType, CalibrationFactors};

/// Pixel lengths the measurement formulas are built from.
///
/// Limb lengths are averaged over the left and right side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentLengths {
    pub shoulder_width: f64,
    pub hip_width: f64,
    pub upper_arm: f64,
    pub forearm: f64,
    /// Shoulder -> elbow -> wrist polyline.
    pub arm: f64,
    pub lower_leg: f64,
    /// Hip -> knee -> ankle polyline.
    pub leg: f64,
    /// Shoulder midpoint to hip midpoint.
    pub torso: f64,
}

impl SegmentLengths {
    /// Measure all segments; fails if any of the 13 landmarks is missing.
    pub fn from_keypoints(keypoints: &KeypointSet) -> Result<Self, InputError> {
        keypoints.ensure_complete()?;
        let p = |l: Landmark| keypoints.position(l);

        let (ls, rs) = (p(Landmark::LeftShoulder)?, p(Landmark::RightShoulder)?);
        let (le, re) = (p(Landmark::LeftElbow)?, p(Landmark::RightElbow)?);
        let (lw, rw) = (p(Landmark::LeftWrist)?, p(Landmark::RightWrist)?);
        let (lh, rh) = (p(Landmark::LeftHip)?, p(Landmark::RightHip)?);
        let (lk, rk) = (p(Landmark::LeftKnee)?, p(Landmark::RightKnee)?);
        let (la, ra) = (p(Landmark::LeftAnkle)?, p(Landmark::RightAnkle)?);

        Ok(Self {
            shoulder_width: distance(ls, rs),
            hip_width: distance(lh, rh),
            upper_arm: mean2(distance(ls, le), distance(rs, re)),
            forearm: mean2(distance(le, lw), distance(re, rw)),
            arm: mean2(polyline_length(&[ls, le, lw]), polyline_length(&[rs, re, rw])),
            lower_leg: mean2(distance(lk, la), distance(rk, ra)),
            leg: mean2(polyline_length(&[lh, lk, la]), polyline_length(&[rh, rk, ra])),
            torso: distance(midpoint(ls, rs), midpoint(lh, rh)),
        })
    }
}

/// Geometric body-measurement estimator.
///
/// Holds the anthropometric ratios and this instance's calibration factors.
/// Calibration is instance state: give every session its own model (or wrap a
/// shared one in [`crate::SharedMeasurementModel`]).
#[derive(Clone, Debug, Default)]
pub struct MeasurementModel {
    params: AnthropometricParams,
    calibration: CalibrationFactors,
}

impl MeasurementModel {
    pub fn new(params: AnthropometricParams) -> Self {
        Self {
            params,
            calibration: CalibrationFactors::identity(),
        }
    }

    #[inline]
    pub fn params(&self) -> &AnthropometricParams {
        &self.params
    }

    #[inline]
    pub fn calibration(&self) -> &CalibrationFactors {
        &self.calibration
    }

    /// Drop all learned corrections.
    pub fn reset_calibration(&mut self) {
        self.calibration.reset();
    }

    /// Estimate all 15 measurements with this instance's calibration applied.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "debug",
            skip(self, keypoints),
            fields(scale = scale.px_per_cm())
        )
    )]
    pub fn estimate(
        &self,
        keypoints: &KeypointSet,
        scale: ScaleFactor,
        body_type: Option<BodyType>,
    ) -> Result<MeasurementSet, InputError> {
        let raw = self.estimate_uncalibrated(keypoints, scale, body_type)?;
        if self.calibration.is_identity() {
            return Ok(raw);
        }
        Ok(self.calibration.apply(&raw))
    }

    /// Estimate all 15 measurements ignoring calibration.
    pub fn estimate_uncalibrated(
        &self,
        keypoints: &KeypointSet,
        scale: ScaleFactor,
        body_type: Option<BodyType>,
    ) -> Result<MeasurementSet, InputError> {
        let segments = SegmentLengths::from_keypoints(keypoints)?;
        let set = self.measurements_from_segments(&segments, scale, body_type.unwrap_or_default());
        debug!(
            "estimated {} measurements (chest={:?}, shoulder={:?}) at {:.3} px/cm",
            set.len(),
            set.get(Measurement::Chest),
            set.get(Measurement::Shoulder),
            scale.px_per_cm()
        );
        Ok(set)
    }

    /// Learn per-measurement factors from one real measurement sample.
    ///
    /// The uncalibrated estimate for the same keypoints is compared with
    /// `real`; every overlapping key with a nonzero estimate gets
    /// `real / estimate`. Returns the keys that were updated.
    pub fn calibrate(
        &mut self,
        keypoints: &KeypointSet,
        scale: ScaleFactor,
        body_type: Option<BodyType>,
        real: &MeasurementSet,
    ) -> Result<Vec<Measurement>, InputError> {
        let uncalibrated = self.estimate_uncalibrated(keypoints, scale, body_type)?;
        let updated = self.calibration.update_from(real, &uncalibrated);
        for m in &updated {
            debug!("calibration factor {m} = {:.4}", self.calibration.factor(*m));
        }
        Ok(updated)
    }

    fn measurements_from_segments(
        &self,
        seg: &SegmentLengths,
        scale: ScaleFactor,
        body_type: BodyType,
    ) -> MeasurementSet {
        let p = &self.params;
        let cm = |px: f64| scale.to_cm(px);

        let shoulder = cm(seg.shoulder_width) * p.joint_to_edge;
        let hip_width = cm(seg.hip_width) * p.joint_to_edge;
        let upper_arm = cm(seg.upper_arm);
        let forearm = cm(seg.forearm);
        let lower_leg = cm(seg.lower_leg);

        let values = [
            (Measurement::Chest, shoulder * p.chest.for_body(body_type)),
            (Measurement::Waist, hip_width * p.waist_per_hip_width),
            (Measurement::Hips, hip_width * p.hips_per_hip_width),
            (Measurement::Inseam, cm(seg.leg) * p.inseam_correction),
            (Measurement::Shoulder, shoulder),
            (Measurement::Arm, cm(seg.arm) * p.arm_correction),
            (Measurement::Neck, shoulder * p.neck_per_shoulder),
            (Measurement::Wrist, forearm * p.wrist_per_forearm),
            (Measurement::Thigh, hip_width * p.thigh_per_hip_width),
            (Measurement::Calf, lower_leg * p.calf_per_lower_leg),
            (Measurement::Bicep, upper_arm * p.bicep_per_upper_arm),
            (Measurement::TorsoLength, cm(seg.torso)),
            (Measurement::BackWidth, shoulder * p.back_width_per_shoulder),
            // cm -> px -> cm round trip cancels; only the constant remains.
            (Measurement::Rise, p.rise_offset_cm * p.rise_curvature),
            (Measurement::Ankle, lower_leg * p.ankle_per_lower_leg),
        ];

        let pairs = values
            .into_iter()
            .map(|(m, v)| (m, round_cm(if v.is_finite() { v.max(0.0) } else { 0.0 })));
        MeasurementSet::from_pairs(pairs).unwrap_or_default()
    }
}
