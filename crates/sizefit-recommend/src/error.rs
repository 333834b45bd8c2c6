use sizefit_core::Measurement;

/// Malformed size chart. Raised before any scoring takes place.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SizeChartError {
    #[error("size chart has no sizes")]
    Empty,
    #[error("size label must not be empty")]
    EmptySizeLabel,
    #[error("size {0:?} is defined more than once")]
    DuplicateSize(String),
    #[error("size {size:?}: {measurement} has no [min, max] range")]
    MissingRange {
        size: String,
        measurement: Measurement,
    },
    #[error("size {size:?}: {measurement} range must have exactly 2 values (got {len})")]
    BadRangeArity {
        size: String,
        measurement: Measurement,
        len: usize,
    },
    #[error("size {size:?}: {measurement} range bounds must be finite")]
    NonFiniteRange {
        size: String,
        measurement: Measurement,
    },
    #[error("size {size:?}: {measurement} range is inverted (min {min} > max {max})")]
    InvertedRange {
        size: String,
        measurement: Measurement,
        min: f64,
        max: f64,
    },
    #[error("size {size:?}: unknown measurement name {name:?}")]
    UnknownMeasurement { size: String, name: String },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("profile weight for {measurement} must be a finite value >= 0 (got {value})")]
pub struct InvalidProfileWeight {
    pub measurement: Measurement,
    pub value: f64,
}

#[derive(thiserror::Error, Debug)]
pub enum SizeChartIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Chart(#[from] SizeChartError),
}
