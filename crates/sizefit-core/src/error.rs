use crate::{Landmark, Measurement};

/// Invalid input handed to the measurement core.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("missing required landmarks: {}", format_landmarks(.missing))]
    MissingLandmarks { missing: Vec<Landmark> },
    #[error("scale factor must be a finite value > 0 px/cm (got {value})")]
    InvalidScale { value: f64 },
    #[error("visibility for {landmark} must be in [0, 1] (got {value})")]
    InvalidVisibility { landmark: Landmark, value: f32 },
    #[error("measurement {measurement} must be a finite value >= 0 cm (got {value})")]
    InvalidMeasurement { measurement: Measurement, value: f64 },
    #[error("unknown landmark name {0:?}")]
    UnknownLandmark(String),
    #[error("unknown measurement name {0:?}")]
    UnknownMeasurement(String),
}

fn format_landmarks(landmarks: &[Landmark]) -> String {
    landmarks
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
