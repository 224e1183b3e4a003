// ABOUTME: Delta records comparing one activity against its category baseline
// ABOUTME: Signed and percentage differences per tracked metric, null when undefined
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActivityKind, CategoryId, TrackedMetric};

/// Natural key of a delta record: (user, activity, category)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeltaKey {
    /// Owning user
    pub user_id: Uuid,
    /// Compared activity
    pub activity_id: Uuid,
    /// Category the activity was classified into
    pub category_id: CategoryId,
}

/// Signed and percentage difference for one metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    /// `value - baseline mean`
    pub delta: Option<f64>,
    /// `delta / baseline mean * 100`
    pub pct: Option<f64>,
}

impl MetricDelta {
    /// Both fields null
    pub const UNDEFINED: Self = Self {
        delta: None,
        pct: None,
    };
}

/// Comparison of one activity with its category baseline
///
/// Immutable once created. A record whose every metric is null represents the
/// first observation in a category, where no comparison is possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaRecord {
    /// Owning user
    pub user_id: Uuid,
    /// Compared activity
    pub activity_id: Uuid,
    /// Activity kind
    pub kind: ActivityKind,
    /// Category used for the comparison
    pub category_id: CategoryId,
    /// Distance delta
    pub distance: MetricDelta,
    /// Heart rate delta
    #[serde(rename = "hr")]
    pub heart_rate: MetricDelta,
    /// Pace delta
    #[serde(rename = "avg_pace")]
    pub pace: MetricDelta,
    /// Duration delta
    pub duration: MetricDelta,
    /// Elevation gain delta
    pub elevation_gain: MetricDelta,
    /// Elevation loss delta
    pub elevation_loss: MetricDelta,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl DeltaRecord {
    /// Record with keys set and every metric null
    #[must_use]
    pub fn undefined(
        user_id: Uuid,
        activity_id: Uuid,
        kind: ActivityKind,
        category_id: CategoryId,
    ) -> Self {
        Self {
            user_id,
            activity_id,
            kind,
            category_id,
            distance: MetricDelta::UNDEFINED,
            heart_rate: MetricDelta::UNDEFINED,
            pace: MetricDelta::UNDEFINED,
            duration: MetricDelta::UNDEFINED,
            elevation_gain: MetricDelta::UNDEFINED,
            elevation_loss: MetricDelta::UNDEFINED,
            created_at: Utc::now(),
        }
    }

    /// Natural key
    #[must_use]
    pub const fn key(&self) -> DeltaKey {
        DeltaKey {
            user_id: self.user_id,
            activity_id: self.activity_id,
            category_id: self.category_id,
        }
    }

    /// Delta for one metric
    #[must_use]
    pub const fn metric(&self, metric: TrackedMetric) -> MetricDelta {
        match metric {
            TrackedMetric::Distance => self.distance,
            TrackedMetric::HeartRate => self.heart_rate,
            TrackedMetric::Pace => self.pace,
            TrackedMetric::Duration => self.duration,
            TrackedMetric::ElevationGain => self.elevation_gain,
            TrackedMetric::ElevationLoss => self.elevation_loss,
        }
    }

    /// Replace the delta for one metric
    pub fn set_metric(&mut self, metric: TrackedMetric, delta: MetricDelta) {
        let slot = match metric {
            TrackedMetric::Distance => &mut self.distance,
            TrackedMetric::HeartRate => &mut self.heart_rate,
            TrackedMetric::Pace => &mut self.pace,
            TrackedMetric::Duration => &mut self.duration,
            TrackedMetric::ElevationGain => &mut self.elevation_gain,
            TrackedMetric::ElevationLoss => &mut self.elevation_loss,
        };
        *slot = delta;
    }

    /// Whether no metric could be compared
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        TrackedMetric::ALL
            .iter()
            .all(|m| self.metric(*m) == MetricDelta::UNDEFINED)
    }
}
