use serde::{Deserialize, Serialize};

use crate::InputError;

/// Pixels-per-centimeter conversion for one image/subject.
///
/// Always finite and strictly positive; construct through [`ScaleFactor::new`].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub fn new(px_per_cm: f64) -> Result<Self, InputError> {
        if px_per_cm.is_finite() && px_per_cm > 0.0 {
            Ok(Self(px_per_cm))
        } else {
            Err(InputError::InvalidScale { value: px_per_cm })
        }
    }

    #[inline]
    pub fn px_per_cm(self) -> f64 {
        self.0
    }

    /// Convert a pixel length into centimeters.
    #[inline]
    pub fn to_cm(self, px: f64) -> f64 {
        px / self.0
    }

    /// Convert a centimeter length into pixels.
    #[inline]
    pub fn to_px(self, cm: f64) -> f64 {
        cm * self.0
    }
}

impl TryFrom<f64> for ScaleFactor {
    type Error = InputError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ScaleFactor> for f64 {
    fn from(scale: ScaleFactor) -> Self {
        scale.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_negative_and_non_finite() {
        for bad in [0.0, -6.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ScaleFactor::new(bad),
                Err(InputError::InvalidScale { .. })
            ));
        }
    }

    #[test]
    fn converts_between_px_and_cm() {
        let s = ScaleFactor::new(6.0).unwrap();
        assert_eq!(s.to_cm(120.0), 20.0);
        assert_eq!(s.to_px(20.0), 120.0);
    }

    #[test]
    fn deserialization_validates() {
        let s: ScaleFactor = serde_json::from_str("6.5").unwrap();
        assert_eq!(s.px_per_cm(), 6.5);
        assert!(serde_json::from_str::<ScaleFactor>("-1.0").is_err());
    }
}
