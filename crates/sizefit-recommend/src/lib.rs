//! Garment size recommendation.
//!
//! A [`SizeRecommender`] scores a [`sizefit_core::MeasurementSet`] against
//! every size of a [`SizeChart`] and returns the best label, an integer
//! confidence and the full per-size score table.
//!
//! For each size, every measurement that is present in the input, ranged by
//! the size and positively weighted by the active [`WeightProfile`] is scored
//! with [`score_range`]:
//! - inside `[min, max]`: `100 * (1 - |value - center| / (width / 2))`;
//! - outside: `max(0, 100 - 10 * distance_cm)`.
//!
//! The size score is the weighted mean over the scored measurements. The
//! highest score wins; ties resolve to the earliest size in chart order.
//!
//! ```
//! use sizefit_core::MeasurementSet;
//! use sizefit_recommend::{Gender, SizeRecommender};
//!
//! let m = MeasurementSet::from_named([("chest", 94.0), ("shoulder", 47.0), ("arm", 63.0)])?;
//! let rec = SizeRecommender::for_gender(Gender::Male).recommend(&m);
//! assert_eq!(rec.size, "M");
//! assert_eq!(rec.confidence, 100);
//! # Ok::<(), sizefit_core::InputError>(())
//! ```

mod builtin;
mod chart;
mod error;
mod io;
mod profile;
mod recommender;
mod score;

pub use builtin::{mens_chart, womens_chart, Gender, UnknownGender};
pub use chart::{SizeChart, SizeEntry, SizeRange};
pub use error::{InvalidProfileWeight, SizeChartError, SizeChartIoError};
pub use profile::WeightProfile;
pub use recommender::{ExplanationInputs, FitTier, Recommendation, SizeRecommender, SizeScore};
pub use score::{score_range, score_size};
