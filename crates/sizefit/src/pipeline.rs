//! End-to-end sizing: keypoints per angle -> measurements -> size.

use std::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use sizefit_core::{KeypointSet, Measurement, MeasurementSet, ScaleFactor};
use sizefit_fusion::{
    confidence_boost, AngleViews, Conflict, FusionEngine, FusionError, FusionParams, ViewAngle,
};
use sizefit_measure::{AnthropometricParams, BodyType, MeasurementModel};
use sizefit_recommend::{Gender, Recommendation, SizeChart, SizeRecommender, WeightProfile};

use crate::refine::{apply_refinement, BodyBuild, MeasurementRefiner, RejectedOverride};
use crate::PipelineError;

/// Everything the pipeline is tuned by. Every field has a default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub measure: AnthropometricParams,
    pub fusion: FusionParams,
    pub profile: WeightProfile,
    pub gender: Gender,
    /// Replaces the built-in chart for `gender` when set.
    pub size_chart: Option<SizeChart>,
}

/// Pose output for one viewing angle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleObservation {
    pub keypoints: KeypointSet,
    pub scale: ScaleFactor,
    /// Upstream image/pose quality score, 0..=100. The fusion boost is only
    /// scaled by quality when every supplied view carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
}

impl AngleObservation {
    pub fn new(keypoints: KeypointSet, scale: ScaleFactor) -> Self {
        Self {
            keypoints,
            scale,
            quality: None,
        }
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = Some(quality);
        self
    }
}

/// One sizing request: up to three views plus per-call overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front: Option<AngleObservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<AngleObservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<AngleObservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_type: Option<BodyType>,
    /// Use this category's built-in chart for this call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Use this chart for this call; wins over `gender`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_chart: Option<SizeChart>,
}

impl SizingRequest {
    pub fn single(angle: ViewAngle, observation: AngleObservation) -> Self {
        let mut request = Self::default();
        request.set(angle, observation);
        request
    }

    pub fn set(&mut self, angle: ViewAngle, observation: AngleObservation) {
        let slot = match angle {
            ViewAngle::Front => &mut self.front,
            ViewAngle::Back => &mut self.back,
            ViewAngle::Side => &mut self.side,
        };
        *slot = Some(observation);
    }

    /// Supplied views; `EmptyInput` when there are none.
    pub fn views(&self) -> Result<AngleViews<&AngleObservation>, FusionError> {
        AngleViews::from_optional(self.front.as_ref(), self.back.as_ref(), self.side.as_ref())
    }
}

/// What happened with the external refiner for one view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefinementStatus {
    NotConfigured,
    Applied {
        accepted: Vec<Measurement>,
        rejected: Vec<RejectedOverride>,
        confidence_delta: i32,
        body_build: BodyBuild,
    },
    /// The refiner errored; the geometric estimate was used.
    Failed { reason: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleReport {
    pub angle: ViewAngle,
    pub geometric: MeasurementSet,
    /// After refinement; equal to `geometric` when none was applied.
    pub measurements: MeasurementSet,
    pub refinement: RefinementStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizingReport {
    pub angles: Vec<AngleReport>,
    pub fused: MeasurementSet,
    pub conflicts: Vec<Conflict>,
    pub recommendation: Recommendation,
    /// Multi-view boost; quality-scaled only if every view had a quality.
    pub confidence_boost: u8,
    /// Mean confidence delta of the applied refinements.
    pub refinement_delta: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_build: Option<BodyBuild>,
    /// `clamp(recommendation + boost + refinement_delta, 0, 100)`.
    pub final_confidence: u8,
}

impl SizingReport {
    #[inline]
    pub fn size(&self) -> &str {
        &self.recommendation.size
    }
}

/// One sizing session.
///
/// Owns its own [`MeasurementModel`], so calibration done through
/// [`SizingPipeline::calibrate`] only affects this session.
pub struct SizingPipeline {
    model: MeasurementModel,
    fusion: FusionEngine,
    recommender: SizeRecommender,
    refiner: Option<Box<dyn MeasurementRefiner + Send + Sync>>,
}

impl fmt::Debug for SizingPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizingPipeline")
            .field("model", &self.model)
            .field("fusion", &self.fusion)
            .field("recommender", &self.recommender)
            .field("refiner", &self.refiner.is_some())
            .finish()
    }
}

impl Default for SizingPipeline {
    fn default() -> Self {
        Self {
            model: MeasurementModel::default(),
            fusion: FusionEngine::default(),
            recommender: SizeRecommender::default(),
            refiner: None,
        }
    }
}

impl SizingPipeline {
    /// Validate `config` and build a session.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.measure.validate()?;
        let fusion = FusionEngine::new(config.fusion)?;
        let mut recommender =
            SizeRecommender::for_gender(config.gender).with_profile(config.profile);
        if let Some(chart) = config.size_chart {
            recommender = recommender.with_chart(chart);
        }
        Ok(Self {
            model: MeasurementModel::new(config.measure),
            fusion,
            recommender,
            refiner: None,
        })
    }

    pub fn with_refiner(
        mut self,
        refiner: impl MeasurementRefiner + Send + Sync + 'static,
    ) -> Self {
        self.refiner = Some(Box::new(refiner));
        self
    }

    #[inline]
    pub fn model(&self) -> &MeasurementModel {
        &self.model
    }

    #[inline]
    pub fn recommender(&self) -> &SizeRecommender {
        &self.recommender
    }

    /// Learn calibration factors for this session from one real sample.
    pub fn calibrate(
        &mut self,
        observation: &AngleObservation,
        body_type: Option<BodyType>,
        real: &MeasurementSet,
    ) -> Result<Vec<Measurement>, PipelineError> {
        Ok(self
            .model
            .calibrate(&observation.keypoints, observation.scale, body_type, real)?)
    }

    pub fn reset_calibration(&mut self) {
        self.model.reset_calibration();
    }

    /// Measure every view, refine, fuse, check conflicts and recommend.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip_all))]
    pub fn run(&self, request: &SizingRequest) -> Result<SizingReport, PipelineError> {
        let views = request.views()?;
        let num_angles = views.len();
        let qualities: Option<Vec<f64>> = views.iter().map(|(_, o)| o.quality).collect();

        let reports =
            views.try_map(|angle, obs| self.measure_angle(angle, obs, request.body_type))?;
        let measured = reports.clone().map(|_, r| r.measurements);

        let fused = self.fusion.fuse(&measured)?;
        let conflicts = self.fusion.detect_conflicts(&measured);
        let boost = confidence_boost(num_angles, qualities.as_deref());

        let deltas: Vec<i32> = reports
            .iter()
            .filter_map(|(_, r)| match &r.refinement {
                RefinementStatus::Applied {
                    confidence_delta, ..
                } => Some(*confidence_delta),
                _ => None,
            })
            .collect();
        let refinement_delta = if deltas.is_empty() {
            0
        } else {
            (deltas.iter().sum::<i32>() as f64 / deltas.len() as f64).round() as i32
        };
        let body_build = reports.iter().find_map(|(_, r)| match &r.refinement {
            RefinementStatus::Applied { body_build, .. } if *body_build != BodyBuild::Unknown => {
                Some(*body_build)
            }
            _ => None,
        });

        let recommendation = match (&request.size_chart, request.gender) {
            (Some(chart), _) => self.recommender.recommend_with_chart(&fused, chart),
            (None, Some(gender)) => self.recommender.recommend_with_chart(&fused, &gender.chart()),
            (None, None) => self.recommender.recommend(&fused),
        };
        let final_confidence = (i32::from(recommendation.confidence)
            + i32::from(boost)
            + refinement_delta)
            .clamp(0, 100) as u8;

        info!(
            "size {} from {} view(s): confidence {} (+{} views, {:+} refinement) -> {}",
            recommendation.size,
            num_angles,
            recommendation.confidence,
            boost,
            refinement_delta,
            final_confidence
        );

        Ok(SizingReport {
            angles: reports.iter().map(|(_, r)| r.clone()).collect(),
            fused,
            conflicts,
            recommendation,
            confidence_boost: boost,
            refinement_delta,
            body_build,
            final_confidence,
        })
    }

    fn measure_angle(
        &self,
        angle: ViewAngle,
        observation: &AngleObservation,
        body_type: Option<BodyType>,
    ) -> Result<AngleReport, PipelineError> {
        let geometric = self
            .model
            .estimate(&observation.keypoints, observation.scale, body_type)?;

        let Some(refiner) = &self.refiner else {
            return Ok(AngleReport {
                angle,
                measurements: geometric.clone(),
                geometric,
                refinement: RefinementStatus::NotConfigured,
            });
        };

        let (measurements, refinement) =
            match refiner.refine(angle, &observation.keypoints, &geometric) {
                Ok(refinement) => {
                    let applied = apply_refinement(&geometric, &refinement);
                    (
                        applied.measurements,
                        RefinementStatus::Applied {
                            accepted: applied.accepted,
                            rejected: applied.rejected,
                            confidence_delta: applied.confidence_delta,
                            body_build: applied.body_build,
                        },
                    )
                }
                Err(err) => {
                    warn!("{angle} view: {err}; using the geometric estimate");
                    (
                        geometric.clone(),
                        RefinementStatus::Failed {
                            reason: err.to_string(),
                        },
                    )
                }
            };

        Ok(AngleReport {
            angle,
            geometric,
            measurements,
            refinement,
        })
    }
}
