// ABOUTME: Delta calculator comparing an activity with its category baseline means
// ABOUTME: Produces signed and percentage differences with null propagation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_core::models::{
    ActivityObservation, BaselineStats, CategoryId, DeltaRecord, MetricDelta, TrackedMetric,
};

use crate::numeric::{difference, percentage_of};

/// Pure delta computation
pub struct DeltaCalculator;

impl DeltaCalculator {
    /// Compare `activity` with the means of `baseline`
    ///
    /// Without a baseline every metric is null: the first observation in a
    /// category has nothing to compare against. Percentages are not rounded.
    #[must_use]
    pub fn compute_delta(
        activity: &ActivityObservation,
        category_id: CategoryId,
        baseline: Option<&BaselineStats>,
    ) -> DeltaRecord {
        let mut record = DeltaRecord::undefined(
            activity.user_id(),
            activity.id(),
            activity.kind().clone(),
            category_id,
        );
        let Some(baseline) = baseline else {
            return record;
        };

        for metric in TrackedMetric::ALL {
            record.set_metric(
                metric,
                Self::metric_delta(activity.metric(metric), baseline.mean(metric)),
            );
        }
        record
    }

    /// Delta for a single pair of operands
    #[must_use]
    pub fn metric_delta(value: Option<f64>, mean: Option<f64>) -> MetricDelta {
        let delta = difference(value, mean);
        MetricDelta {
            delta,
            pct: percentage_of(delta, mean),
        }
    }
}

#[cfg(test)]
mod tests {
    use pierre_core::models::{ActivityBuilder, ActivityKind, CategoryKey, RunningMoments};
    use uuid::Uuid;

    use super::*;

    fn baseline_with(user: Uuid, distance_mean: Option<f64>, hr_mean: Option<f64>) -> BaselineStats {
        let mut stats =
            BaselineStats::empty(CategoryKey::new(user, ActivityKind::Run, CategoryId(2)));
        stats.count = 4;
        stats.distance = RunningMoments {
            mean: distance_mean,
            m2: Some(0.0),
        };
        stats.heart_rate = RunningMoments {
            mean: hr_mean,
            m2: Some(0.0),
        };
        stats
    }

    #[test]
    fn test_missing_baseline_yields_all_null_record_with_keys() {
        let user = Uuid::new_v4();
        let activity = ActivityBuilder::new(user, ActivityKind::Run)
            .distance(10_000.0)
            .build();
        let record = DeltaCalculator::compute_delta(&activity, CategoryId(3), None);
        assert!(record.is_undefined());
        assert_eq!(record.user_id, user);
        assert_eq!(record.activity_id, activity.id());
        assert_eq!(record.category_id, CategoryId(3));
        assert_eq!(record.kind, ActivityKind::Run);
    }

    #[test]
    fn test_simple_delta_and_percentage() {
        let user = Uuid::new_v4();
        let activity = ActivityBuilder::new(user, ActivityKind::Run)
            .distance(110.0)
            .build();
        let baseline = baseline_with(user, Some(100.0), None);
        let record = DeltaCalculator::compute_delta(&activity, CategoryId(2), Some(&baseline));
        assert_eq!(record.distance.delta, Some(10.0));
        assert_eq!(record.distance.pct, Some(10.0));
    }

    #[test]
    fn test_null_propagation() {
        let user = Uuid::new_v4();
        let activity = ActivityBuilder::new(user, ActivityKind::Run)
            .heart_rate(150.0)
            .elevation_gain(80.0)
            .build();
        let baseline = baseline_with(user, Some(5_000.0), Some(0.0));
        let record = DeltaCalculator::compute_delta(&activity, CategoryId(2), Some(&baseline));

        // activity lacks distance
        assert_eq!(record.distance, MetricDelta::UNDEFINED);
        // zero mean: delta defined, percentage not
        assert_eq!(record.heart_rate.delta, Some(150.0));
        assert_eq!(record.heart_rate.pct, None);
        // baseline lacks elevation
        assert_eq!(record.elevation_gain, MetricDelta::UNDEFINED);
    }

    #[test]
    fn test_negative_delta_keeps_sign() {
        let delta = DeltaCalculator::metric_delta(Some(90.0), Some(120.0));
        assert_eq!(delta.delta, Some(-30.0));
        assert_eq!(delta.pct, Some(-25.0));
    }
}
