use crate::ViewAngle;
use sizefit_core::{InputError, Measurement};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FusionError {
    #[error("no angle data supplied: at least one of front, back, side is required")]
    EmptyInput,
    #[error("weight for {measurement} at {angle} view must be in [0, 1] (got {value})")]
    InvalidWeight {
        angle: ViewAngle,
        measurement: Measurement,
        value: f64,
    },
    #[error("default fusion weight must be in [0, 1] (got {0})")]
    InvalidDefaultWeight(f64),
    #[error(transparent)]
    Input(#[from] InputError),
}
