//! Body measurement and garment sizing from pose keypoints.
//!
//! This crate ties the `sizefit-*` workspace together:
//! - re-exports of the underlying crates;
//! - the boundary to an optional external measurement refiner ([`refine`]);
//! - [`SizingPipeline`], which runs measurement, refinement, multi-angle
//!   fusion and size recommendation for one session;
//! - JSON helpers for configs, requests and reports ([`io`]).
//!
//! ## Quickstart
//!
//! ```no_run
//! use sizefit::{SizingPipeline, SizingRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = SizingRequest::load_json("request.json")?;
//! let pipeline = SizingPipeline::default();
//! let report = pipeline.run(&request)?;
//! println!("{} ({}%)", report.size(), report.final_confidence);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `sizefit::core`: landmarks, keypoints, scale, measurement sets, logger.
//! - `sizefit::measure`: geometric measurement model and calibration.
//! - `sizefit::fusion`: per-angle weights, fusion, conflicts, confidence boost.
//! - `sizefit::recommend`: size charts, scoring, recommendations.

pub use sizefit_core as core;
pub use sizefit_fusion as fusion;
pub use sizefit_measure as measure;
pub use sizefit_recommend as recommend;

pub use sizefit_core::{Keypoint, KeypointSet, Landmark, Measurement, MeasurementSet, ScaleFactor};
pub use sizefit_fusion::ViewAngle;
pub use sizefit_measure::{BodyType, MeasurementModel};
pub use sizefit_recommend::{Gender, Recommendation, SizeChart};

mod error;
pub mod io;
mod pipeline;
pub mod refine;

pub use error::PipelineError;
pub use pipeline::{
    AngleObservation, AngleReport, PipelineConfig, RefinementStatus, SizingPipeline,
    SizingReport, SizingRequest,
};
pub use refine::{apply_refinement, BodyBuild, MeasurementRefiner, Refinement, RefinerError};
