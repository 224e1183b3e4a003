// ABOUTME: Running per-category baseline statistics (Welford mean and M2 accumulators)
// ABOUTME: One record per (user, activity kind, category) with a shared observation count
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryKey, TrackedMetric};

/// Running mean and sum of squared deviations for one metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningMoments {
    /// Running mean, absent until a value has been observed
    pub mean: Option<f64>,
    /// Welford M2 accumulator
    pub m2: Option<f64>,
}

impl RunningMoments {
    /// Moments after observing a single value (or none)
    #[must_use]
    pub const fn first(value: Option<f64>) -> Self {
        Self {
            mean: value,
            m2: Some(0.0),
        }
    }
}

/// Running statistics for a (user, activity kind, category) triple
///
/// Created lazily on the first contributing activity. The count is shared by
/// every metric in the record and only ever increases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineStats {
    /// Natural key
    #[serde(flatten)]
    pub key: CategoryKey,
    /// Distance moments
    pub distance: RunningMoments,
    /// Heart rate moments
    #[serde(rename = "hr")]
    pub heart_rate: RunningMoments,
    /// Pace moments
    #[serde(rename = "avg_pace")]
    pub pace: RunningMoments,
    /// Duration moments
    pub duration: RunningMoments,
    /// Elevation gain moments
    pub elevation_gain: RunningMoments,
    /// Elevation loss moments
    pub elevation_loss: RunningMoments,
    /// Activities folded into this baseline
    pub count: u64,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl BaselineStats {
    /// Empty baseline with zero observations
    #[must_use]
    pub fn empty(key: CategoryKey) -> Self {
        Self {
            key,
            distance: RunningMoments::default(),
            heart_rate: RunningMoments::default(),
            pace: RunningMoments::default(),
            duration: RunningMoments::default(),
            elevation_gain: RunningMoments::default(),
            elevation_loss: RunningMoments::default(),
            count: 0,
            updated_at: Utc::now(),
        }
    }

    /// Moments for one metric
    #[must_use]
    pub const fn moments(&self, metric: TrackedMetric) -> &RunningMoments {
        match metric {
            TrackedMetric::Distance => &self.distance,
            TrackedMetric::HeartRate => &self.heart_rate,
            TrackedMetric::Pace => &self.pace,
            TrackedMetric::Duration => &self.duration,
            TrackedMetric::ElevationGain => &self.elevation_gain,
            TrackedMetric::ElevationLoss => &self.elevation_loss,
        }
    }

    /// Mutable moments for one metric
    pub fn moments_mut(&mut self, metric: TrackedMetric) -> &mut RunningMoments {
        match metric {
            TrackedMetric::Distance => &mut self.distance,
            TrackedMetric::HeartRate => &mut self.heart_rate,
            TrackedMetric::Pace => &mut self.pace,
            TrackedMetric::Duration => &mut self.duration,
            TrackedMetric::ElevationGain => &mut self.elevation_gain,
            TrackedMetric::ElevationLoss => &mut self.elevation_loss,
        }
    }

    /// Running mean of one metric
    #[must_use]
    pub const fn mean(&self, metric: TrackedMetric) -> Option<f64> {
        self.moments(metric).mean
    }

    /// Sample variance `M2 / (count - 1)`
    ///
    /// Uses the shared count, so it is exact only for metrics present on every
    /// contributing activity. `None` with fewer than two observations.
    #[must_use]
    pub fn sample_variance(&self, metric: TrackedMetric) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        self.moments(metric)
            .m2
            .map(|m2| m2 / (self.count - 1) as f64)
    }

    /// Sample standard deviation
    #[must_use]
    pub fn std_dev(&self, metric: TrackedMetric) -> Option<f64> {
        self.sample_variance(metric).map(f64::sqrt)
    }
}
