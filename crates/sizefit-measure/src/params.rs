use serde::{Deserialize, Serialize};

use crate::BodyType;

/// Chest circumference as a multiple of corrected shoulder width, per build.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChestMultipliers {
    pub slim: f64,
    pub athletic: f64,
    pub average: f64,
    pub stocky: f64,
}

impl Default for ChestMultipliers {
    fn default() -> Self {
        Self {
            slim: 1.85,
            athletic: 1.95,
            average: 1.90,
            stocky: 2.15,
        }
    }
}

impl ChestMultipliers {
    /// Multiplier for `body`; unknown builds use the average multiplier.
    pub fn for_body(&self, body: BodyType) -> f64 {
        match body {
            BodyType::Slim => self.slim,
            BodyType::Athletic => self.athletic,
            BodyType::Stocky => self.stocky,
            BodyType::Average | BodyType::Unknown => self.average,
        }
    }
}

/// Anthropometric ratios turning joint distances into garment measurements.
///
/// Pose joints sit inside the body outline, so widths are first widened by
/// `joint_to_edge`; circumferences are then modelled as fixed multiples of
/// those widths or of limb segment lengths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropometricParams {
    /// Joint-to-joint -> edge-to-edge width correction (shoulders and hips).
    pub joint_to_edge: f64,
    pub chest: ChestMultipliers,
    /// Waist circumference per corrected hip width.
    pub waist_per_hip_width: f64,
    /// Hip circumference per corrected hip width.
    pub hips_per_hip_width: f64,
    /// Thigh circumference per corrected hip width.
    pub thigh_per_hip_width: f64,
    /// Leg polyline length -> inseam (crotch point sits below the hip joint).
    pub inseam_correction: f64,
    /// Arm polyline length -> sleeve length.
    pub arm_correction: f64,
    pub neck_per_shoulder: f64,
    pub back_width_per_shoulder: f64,
    /// Wrist circumference per forearm length.
    pub wrist_per_forearm: f64,
    /// Bicep circumference per upper-arm length.
    pub bicep_per_upper_arm: f64,
    /// Calf circumference per lower-leg length.
    pub calf_per_lower_leg: f64,
    /// Ankle circumference per lower-leg length.
    pub ankle_per_lower_leg: f64,
    /// Assumed vertical waist-to-hip offset.
    pub rise_offset_cm: f64,
    /// Allowance for the curve of the body along the rise.
    pub rise_curvature: f64,
}

impl Default for AnthropometricParams {
    fn default() -> Self {
        Self {
            joint_to_edge: 1.17,
            chest: ChestMultipliers::default(),
            waist_per_hip_width: 2.55,
            hips_per_hip_width: 2.95,
            thigh_per_hip_width: 1.5,
            inseam_correction: 0.95,
            arm_correction: 0.95,
            neck_per_shoulder: 0.90,
            back_width_per_shoulder: 0.85,
            wrist_per_forearm: 0.62,
            bicep_per_upper_arm: 1.00,
            calf_per_lower_leg: 0.90,
            ankle_per_lower_leg: 0.52,
            rise_offset_cm: 11.0,
            rise_curvature: 1.15,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("anthropometric parameter {name} must be a finite value >= 0 (got {value})")]
pub struct InvalidParam {
    pub name: &'static str,
    pub value: f64,
}

impl AnthropometricParams {
    /// Reject negative or non-finite ratios.
    pub fn validate(&self) -> Result<(), InvalidParam> {
        let fields = [
            ("joint_to_edge", self.joint_to_edge),
            ("chest.slim", self.chest.slim),
            ("chest.athletic", self.chest.athletic),
            ("chest.average", self.chest.average),
            ("chest.stocky", self.chest.stocky),
            ("waist_per_hip_width", self.waist_per_hip_width),
            ("hips_per_hip_width", self.hips_per_hip_width),
            ("thigh_per_hip_width", self.thigh_per_hip_width),
            ("inseam_correction", self.inseam_correction),
            ("arm_correction", self.arm_correction),
            ("neck_per_shoulder", self.neck_per_shoulder),
            ("back_width_per_shoulder", self.back_width_per_shoulder),
            ("wrist_per_forearm", self.wrist_per_forearm),
            ("bicep_per_upper_arm", self.bicep_per_upper_arm),
            ("calf_per_lower_leg", self.calf_per_lower_leg),
            ("ankle_per_lower_leg", self.ankle_per_lower_leg),
            ("rise_offset_cm", self.rise_offset_cm),
            ("rise_curvature", self.rise_curvature),
        ];
        match fields
            .into_iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            Some((name, value)) => Err(InvalidParam { name, value }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_build_uses_average_multiplier() {
        let m = ChestMultipliers::default();
        assert_eq!(m.for_body(BodyType::Unknown), 1.90);
        assert_eq!(m.for_body(BodyType::Average), 1.90);
        assert_eq!(m.for_body(BodyType::Stocky), 2.15);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let p: AnthropometricParams =
            serde_json::from_str(r#"{"joint_to_edge": 1.2, "chest": {"slim": 1.8}}"#).unwrap();
        assert_eq!(p.joint_to_edge, 1.2);
        assert_eq!(p.chest.slim, 1.8);
        assert_eq!(p.chest.stocky, 2.15);
        assert_eq!(p.rise_offset_cm, 11.0);
    }

    #[test]
    fn validate_names_the_bad_field() {
        let p = AnthropometricParams {
            ankle_per_lower_leg: -0.5,
            ..AnthropometricParams::default()
        };
        let err = p.validate().unwrap_err();
        assert_eq!(err.name, "ankle_per_lower_leg");
        assert!(AnthropometricParams::default().validate().is_ok());
    }
}
