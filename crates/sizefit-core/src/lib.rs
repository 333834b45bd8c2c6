//! Core types and geometry for keypoint-based body measurement.
//!
//! This crate is small and purely geometric. It knows nothing about the pose
//! model that produced the keypoints nor about size charts; it only fixes the
//! landmark and measurement vocabularies shared by the rest of the workspace.

mod error;
mod geometry;
mod keypoints;
mod logger;
mod measurement;
mod scale;

pub use error::InputError;
pub use geometry::{distance, mean2, midpoint, polyline_length};
pub use keypoints::{Keypoint, KeypointSet, Landmark};
pub use measurement::{round_cm, Measurement, MeasurementSet};
pub use scale::ScaleFactor;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_str};
