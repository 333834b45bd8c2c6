//! Multi-angle measurement fusion.
//!
//! Each viewing angle (front, back, side) observes some measurements better
//! than others. [`FusionEngine`] combines per-angle
//! [`sizefit_core::MeasurementSet`]s with per-angle reliability weights
//! ([`AngleWeights`]), flags measurements that disagree across angles
//! ([`detect_conflicts`]) and computes the confidence bonus earned by
//! capturing more than one angle ([`confidence_boost`]).

mod angle;
mod engine;
mod error;
mod weights;

pub use angle::{AngleViews, UnknownViewAngle, ViewAngle};
pub use engine::{confidence_boost, detect_conflicts, Conflict, FusionEngine, FusionParams};
pub use error::FusionError;
pub use weights::AngleWeights;
