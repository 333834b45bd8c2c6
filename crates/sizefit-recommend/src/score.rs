//! Weighted range matching.

use sizefit_core::MeasurementSet;

use crate::{SizeEntry, SizeRange, WeightProfile};

/// Score one value against one range, in `[0, 100]`.
///
/// Inside the range the score falls linearly from 100 at the center to 0 at
/// either bound. Outside it drops 10 points per centimeter of distance to the
/// nearer bound. A zero-width range scores 100 on its single value.
pub fn score_range(value: f64, range: SizeRange) -> f64 {
    if range.contains(value) {
        let half_width = range.width() / 2.0;
        if half_width <= 0.0 {
            return 100.0;
        }
        100.0 * (1.0 - (value - range.center()).abs() / half_width)
    } else {
        let distance = if value < range.min {
            range.min - value
        } else {
            value - range.max
        };
        (100.0 - 10.0 * distance).max(0.0)
    }
}

/// Weighted mean of [`score_range`] over every measurement that is present in
/// `measurements`, ranged by `size` and positively weighted by `profile`.
///
/// Returns 0 when nothing can be scored.
pub fn score_size(measurements: &MeasurementSet, size: &SizeEntry, profile: &WeightProfile) -> f64 {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for (measurement, weight) in profile.scored() {
        let (Some(value), Some(range)) = (measurements.get(measurement), size.range(measurement))
        else {
            continue;
        };
        weighted += score_range(value, range) * weight;
        total_weight += weight;
    }
    if total_weight > 0.0 {
        weighted / total_weight
    } else {
        0.0
    }
}
