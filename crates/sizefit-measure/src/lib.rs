//! Body measurement estimation from 2D pose keypoints.
//!
//! ## Quickstart
//!
//! ```
//! use sizefit_core::{Keypoint, KeypointSet, Landmark, Measurement, ScaleFactor};
//! use sizefit_measure::MeasurementModel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut keypoints = KeypointSet::new();
//! for (i, landmark) in Landmark::ALL.into_iter().enumerate() {
//!     let x = if i % 2 == 1 { 400.0 } else { 600.0 };
//!     keypoints.insert(landmark, Keypoint::new(x, 100.0 + 75.0 * i as f64, 0.9))?;
//! }
//!
//! let model = MeasurementModel::default();
//! let m = model.estimate(&keypoints, ScaleFactor::new(6.0)?, None)?;
//! assert_eq!(m.len(), 15);
//! println!("chest: {:?} cm", m.get(Measurement::Chest));
//! # Ok(())
//! # }
//! ```
//!
//! Pipeline per call:
//! 1. Check that all 13 landmarks are present.
//! 2. Measure pixel segment lengths (widths, limb polylines, torso).
//! 3. Convert to centimeters through the scale factor and apply the
//!    anthropometric ratios of [`AnthropometricParams`].
//! 4. Round to 0.1 cm and, if the instance was calibrated, apply its factors.

mod body_type;
mod calibration;
mod model;
mod params;
mod shared;

pub use body_type::{BodyType, UnknownBodyType};
pub use calibration::CalibrationFactors;
pub use model::{MeasurementModel, SegmentLengths};
pub use params::{AnthropometricParams, ChestMultipliers, InvalidParam};
pub use shared::SharedMeasurementModel;
