// ABOUTME: Incremental baseline updater applying Welford's online algorithm per metric
// ABOUTME: Initializes new baselines on first observation and advances the shared count
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Baseline Updater
//!
//! Folds one activity into a category baseline. Each metric carries a running
//! mean and a running sum of squared deviations (M2); the update uses the
//! baseline's count *before* it is incremented:
//!
//! ```text
//! delta  = value - mean
//! mean'  = mean + delta / (n + 1)
//! delta2 = value - mean'
//! m2'    = m2 + delta * delta2
//! ```
//!
//! The result matches a two-pass mean and `Σ(x - x̄)²` within floating-point
//! tolerance. A metric missing from the activity keeps its moments while the
//! shared count still advances.

use chrono::Utc;
use pierre_core::models::{
    ActivityObservation, BaselineStats, CategoryId, CategoryKey, RunningMoments, TrackedMetric,
};
use tracing::trace;

/// Pure baseline update
pub struct BaselineUpdater;

impl BaselineUpdater {
    /// Fold `activity` into `prior`, or start a new baseline when absent
    #[must_use]
    pub fn update_baseline(
        category_id: CategoryId,
        prior: Option<BaselineStats>,
        activity: &ActivityObservation,
    ) -> BaselineStats {
        let Some(mut stats) = prior else {
            return Self::initialize(category_id, activity);
        };

        let n = stats.count;
        for metric in TrackedMetric::ALL {
            if let Some(value) = activity.metric(metric) {
                let moments = stats.moments_mut(metric);
                *moments = Self::welford_step(*moments, n, value);
            }
        }
        stats.count = n + 1;
        stats.updated_at = Utc::now();

        trace!(
            user_id = %stats.key.user_id,
            category_id = %category_id,
            count = stats.count,
            "advanced baseline"
        );
        stats
    }

    /// Baseline holding a single observation
    #[must_use]
    pub fn initialize(category_id: CategoryId, activity: &ActivityObservation) -> BaselineStats {
        let key = CategoryKey::new(activity.user_id(), activity.kind().clone(), category_id);
        let mut stats = BaselineStats::empty(key);
        for metric in TrackedMetric::ALL {
            *stats.moments_mut(metric) = RunningMoments::first(activity.metric(metric));
        }
        stats.count = 1;
        stats
    }

    /// One Welford step using the pre-update count `n`
    ///
    /// A missing mean or M2, or a zero count, treats `value` as the first
    /// data point.
    #[must_use]
    pub fn welford_step(moments: RunningMoments, n: u64, value: f64) -> RunningMoments {
        let (Some(mean), Some(m2)) = (moments.mean, moments.m2) else {
            return RunningMoments::first(Some(value));
        };
        if n == 0 {
            return RunningMoments::first(Some(value));
        }

        let delta = value - mean;
        let new_mean = mean + delta / (n + 1) as f64;
        let delta2 = value - new_mean;
        RunningMoments {
            mean: Some(new_mean),
            m2: Some(delta.mul_add(delta2, m2)),
        }
    }
}
