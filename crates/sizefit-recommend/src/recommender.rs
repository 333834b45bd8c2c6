use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};
use sizefit_core::{Measurement, MeasurementSet};

use crate::{score_size, Gender, SizeChart, SizeEntry, WeightProfile};

/// Score of one size, in chart order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeScore {
    pub size: String,
    pub score: f64,
}

/// Coarse fit quality of the recommended size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitTier {
    /// Best score >= 90.
    Excellent,
    /// Best score >= 75.
    Good,
    /// Best score >= 60.
    Fair,
    Closest,
}

impl FitTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            FitTier::Excellent
        } else if score >= 75.0 {
            FitTier::Good
        } else if score >= 60.0 {
            FitTier::Fair
        } else {
            FitTier::Closest
        }
    }
}

/// Structured facts a caller (or a text generator) can explain a
/// recommendation from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplanationInputs {
    pub tier: FitTier,
    /// Scored measurements with their values, in canonical order.
    pub key_measurements: BTreeMap<Measurement, f64>,
    /// Above the recommended size's max.
    pub snug: Vec<Measurement>,
    /// Below the recommended size's min.
    pub loose: Vec<Measurement>,
    /// Runner-up size, if the chart has more than one.
    pub alternative: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub size: String,
    /// `min(100, round(best_score))`.
    pub confidence: u8,
    pub best_score: f64,
    pub explanation: ExplanationInputs,
    pub all_scores: Vec<SizeScore>,
}

impl Recommendation {
    pub fn score_of(&self, size: &str) -> Option<f64> {
        self.all_scores
            .iter()
            .find(|s| s.size == size)
            .map(|s| s.score)
    }

    /// One-paragraph plain-text explanation.
    pub fn summary(&self) -> String {
        let e = &self.explanation;
        let key = e
            .key_measurements
            .iter()
            .map(|(m, v)| format!("{m} ({v:.1} cm)"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = match e.tier {
            FitTier::Excellent => format!(
                "Size {}: excellent fit, closely matching your {key}.",
                self.size
            ),
            FitTier::Good => format!("Size {}: good fit for your {key}.", self.size),
            FitTier::Fair => format!("Size {} recommended, but fit may vary by brand.", self.size),
            FitTier::Closest => format!(
                "Size {} is the closest match. Consider trying adjacent sizes.",
                self.size
            ),
        };
        if matches!(e.tier, FitTier::Fair | FitTier::Closest) {
            if let Some(alt) = &e.alternative {
                out.push_str(&format!(" Next best: {alt}."));
            }
        }
        if !e.snug.is_empty() {
            out.push_str(&format!(" May be slightly snug in {}.", join_names(&e.snug)));
        }
        if !e.loose.is_empty() {
            out.push_str(&format!(" May be slightly loose in {}.", join_names(&e.loose)));
        }
        out
    }
}

fn join_names(list: &[Measurement]) -> String {
    list.iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Scores measurements against every size of a chart and picks the best.
#[derive(Clone, Debug)]
pub struct SizeRecommender {
    chart: SizeChart,
    profile: WeightProfile,
}

impl Default for SizeRecommender {
    fn default() -> Self {
        Self::for_gender(Gender::default())
    }
}

impl SizeRecommender {
    pub fn new(chart: SizeChart, profile: WeightProfile) -> Self {
        Self { chart, profile }
    }

    /// Built-in chart for `gender` with the shirt profile.
    pub fn for_gender(gender: Gender) -> Self {
        Self::new(gender.chart(), WeightProfile::shirt())
    }

    /// Replace the active chart.
    pub fn with_chart(mut self, chart: SizeChart) -> Self {
        self.chart = chart;
        self
    }

    pub fn with_profile(mut self, profile: WeightProfile) -> Self {
        self.profile = profile;
        self
    }

    #[inline]
    pub fn chart(&self) -> &SizeChart {
        &self.chart
    }

    #[inline]
    pub fn profile(&self) -> &WeightProfile {
        &self.profile
    }

    /// Recommend against the active chart.
    pub fn recommend(&self, measurements: &MeasurementSet) -> Recommendation {
        self.recommend_with_chart(measurements, &self.chart)
    }

    /// Recommend against `chart`, which replaces the active chart for this
    /// call only.
    ///
    /// The best size is the highest score; ties go to the size that comes
    /// first in chart order.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(sizes = chart.len()))
    )]
    pub fn recommend_with_chart(
        &self,
        measurements: &MeasurementSet,
        chart: &SizeChart,
    ) -> Recommendation {
        let all_scores: Vec<SizeScore> = chart
            .sizes()
            .iter()
            .map(|entry| SizeScore {
                size: entry.label.clone(),
                score: score_size(measurements, entry, &self.profile),
            })
            .collect();

        // ranked[0] is the winner; a stable sort keeps chart order on ties.
        let mut ranked: Vec<usize> = (0..all_scores.len()).collect();
        ranked.sort_by(|&a, &b| all_scores[b].score.total_cmp(&all_scores[a].score));
        let best = ranked.first().copied().unwrap_or(0);
        let alternative = ranked.get(1).map(|&i| all_scores[i].size.clone());

        let entry = &chart.sizes()[best];
        let best_score = all_scores[best].score;
        let confidence = best_score.round().clamp(0.0, 100.0) as u8;
        debug!(
            "recommended {} (score {:.1}, confidence {}) over {} sizes",
            entry.label,
            best_score,
            confidence,
            all_scores.len()
        );

        Recommendation {
            size: entry.label.clone(),
            confidence,
            best_score,
            explanation: self.explain(measurements, entry, best_score, alternative),
            all_scores,
        }
    }

    fn explain(
        &self,
        measurements: &MeasurementSet,
        entry: &SizeEntry,
        best_score: f64,
        alternative: Option<String>,
    ) -> ExplanationInputs {
        let mut snug = Vec::new();
        let mut loose = Vec::new();
        for (m, value) in measurements.iter() {
            let Some(range) = entry.range(m) else {
                continue;
            };
            if value > range.max {
                snug.push(m);
            } else if value < range.min {
                loose.push(m);
            }
        }
        let key_measurements = self
            .profile
            .scored()
            .filter_map(|(m, _)| measurements.get(m).map(|v| (m, v)))
            .collect();

        ExplanationInputs {
            tier: FitTier::from_score(best_score),
            key_measurements,
            snug,
            loose,
            alternative,
        }
    }
}
