// ABOUTME: Shared numeric helpers for classification and delta computation
// ABOUTME: Normalized deviations, band midpoints, Euclidean norm, and guarded percentages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Numeric helpers
//!
//! Every helper returns a well-defined value for every input: missing operands
//! and zero denominators collapse to `0.0` (for distances) or `None` (for
//! deltas) instead of producing NaN or infinity.

use pierre_core::models::MetricTarget;

/// Midpoint of a closed interval
#[must_use]
pub fn midpoint(min: f64, max: f64) -> f64 {
    (min + max) / 2.0
}

/// `|value - reference| / reference`, or `0.0` when the reference is zero
#[must_use]
pub fn reference_deviation(value: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    (value - reference).abs() / reference
}

/// `|value - midpoint| / (max - min)`, or `0.0` for a zero or negative span
#[must_use]
pub fn band_deviation(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span <= 0.0 {
        return 0.0;
    }
    (value - midpoint(min, max)).abs() / span
}

/// Normalized deviation of an observed value from a rule target
///
/// Absence on either side contributes `0.0`, as do bands missing a bound.
#[must_use]
pub fn normalized_deviation(value: Option<f64>, target: Option<&MetricTarget>) -> f64 {
    match (value, target) {
        (Some(value), Some(MetricTarget::Reference(reference))) => {
            reference_deviation(value, *reference)
        }
        (
            Some(value),
            Some(MetricTarget::Band {
                min: Some(min),
                max: Some(max),
            }),
        ) => band_deviation(value, *min, *max),
        _ => 0.0,
    }
}

/// Square root of the sum of squares
#[must_use]
pub fn euclidean_norm(components: &[f64]) -> f64 {
    components.iter().map(|c| c * c).sum::<f64>().sqrt()
}

/// `value - mean`, or `None` when either operand is missing
#[must_use]
pub fn difference(value: Option<f64>, mean: Option<f64>) -> Option<f64> {
    Some(value? - mean?)
}

/// `delta / mean * 100`, or `None` when either is missing or the mean is zero
#[must_use]
pub fn percentage_of(delta: Option<f64>, mean: Option<f64>) -> Option<f64> {
    let (delta, mean) = (delta?, mean?);
    if mean == 0.0 {
        return None;
    }
    Some(delta / mean * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_reference_deviation() {
        assert!((reference_deviation(14_000.0, 15_000.0) - 1.0 / 15.0).abs() < EPSILON);
        assert!((reference_deviation(14_000.0, 5_000.0) - 1.8).abs() < EPSILON);
        assert!(reference_deviation(10.0, 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_band_deviation_guards_span() {
        assert!((band_deviation(150.0, 100.0, 140.0) - 0.75).abs() < EPSILON);
        assert!(band_deviation(150.0, 120.0, 120.0).abs() < EPSILON);
        assert!(band_deviation(150.0, 140.0, 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_missing_operands_contribute_zero() {
        let band = MetricTarget::Band {
            min: Some(100.0),
            max: None,
        };
        assert!(normalized_deviation(Some(120.0), Some(&band)).abs() < EPSILON);
        assert!(normalized_deviation(None, Some(&MetricTarget::Reference(5.0))).abs() < EPSILON);
        assert!(normalized_deviation(Some(5.0), None).abs() < EPSILON);
    }

    #[test]
    fn test_euclidean_norm() {
        assert!((euclidean_norm(&[3.0, 4.0, 0.0]) - 5.0).abs() < EPSILON);
        assert!(euclidean_norm(&[]).abs() < EPSILON);
    }

    #[test]
    fn test_percentage_guards() {
        assert_eq!(percentage_of(Some(10.0), Some(100.0)), Some(10.0));
        assert_eq!(percentage_of(Some(10.0), Some(0.0)), None);
        assert_eq!(percentage_of(None, Some(100.0)), None);
        assert_eq!(difference(Some(110.0), None), None);
    }
}
