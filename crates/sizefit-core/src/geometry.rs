//! Small distance helpers over 2D pixel points.

use nalgebra::Point2;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point2<f64>, b: Point2<f64>) -> f64 {
    nalgebra::distance(&a, &b)
}

/// Midpoint of the segment `a`-`b`.
#[inline]
pub fn midpoint(a: Point2<f64>, b: Point2<f64>) -> Point2<f64> {
    nalgebra::center(&a, &b)
}

/// Summed segment lengths along `points`; 0 for fewer than two points.
pub fn polyline_length(points: &[Point2<f64>]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Arithmetic mean of two values.
#[inline]
pub fn mean2(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}
