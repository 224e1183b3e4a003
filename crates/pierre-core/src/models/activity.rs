// ABOUTME: Immutable activity observation consumed by classification and baselines
// ABOUTME: Holds owner, kind, and optional tracked metrics with a builder for construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActivityKind, TrackedMetric};

/// Optional measurements recorded for one activity
///
/// Any field may be absent: "not recorded for this activity kind" is a normal
/// state and never an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    /// Distance in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Average heart rate in bpm
    #[serde(default, rename = "hr", skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    /// Average pace in seconds per kilometer
    #[serde(default, rename = "avg_pace", skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    /// Total elapsed time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Elevation gain in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
    /// Elevation loss in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_loss: Option<f64>,
}

impl ActivityMetrics {
    /// Value of one tracked metric
    #[must_use]
    pub const fn get(&self, metric: TrackedMetric) -> Option<f64> {
        match metric {
            TrackedMetric::Distance => self.distance,
            TrackedMetric::HeartRate => self.heart_rate,
            TrackedMetric::Pace => self.pace,
            TrackedMetric::Duration => self.duration,
            TrackedMetric::ElevationGain => self.elevation_gain,
            TrackedMetric::ElevationLoss => self.elevation_loss,
        }
    }

    /// Set one tracked metric
    pub fn set(&mut self, metric: TrackedMetric, value: Option<f64>) {
        let slot = match metric {
            TrackedMetric::Distance => &mut self.distance,
            TrackedMetric::HeartRate => &mut self.heart_rate,
            TrackedMetric::Pace => &mut self.pace,
            TrackedMetric::Duration => &mut self.duration,
            TrackedMetric::ElevationGain => &mut self.elevation_gain,
            TrackedMetric::ElevationLoss => &mut self.elevation_loss,
        };
        *slot = value;
    }
}

/// Snapshot of one completed activity
///
/// Observations are read-only inputs to the engine. Fields are private; use
/// [`ActivityBuilder`] to create new instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityObservation {
    id: Uuid,
    user_id: Uuid,
    kind: ActivityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    metrics: ActivityMetrics,
}

impl ActivityObservation {
    /// Activity identifier
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Owning user
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Activity kind
    #[must_use]
    pub const fn kind(&self) -> &ActivityKind {
        &self.kind
    }

    /// Optional title
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Optional start time
    #[must_use]
    pub const fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// All recorded metrics
    #[must_use]
    pub const fn metrics(&self) -> &ActivityMetrics {
        &self.metrics
    }

    /// Value of one tracked metric
    #[must_use]
    pub const fn metric(&self, metric: TrackedMetric) -> Option<f64> {
        self.metrics.get(metric)
    }
}

/// Builder for constructing [`ActivityObservation`] instances
///
/// # Examples
///
/// ```rust
/// use pierre_core::models::{ActivityBuilder, ActivityKind, TrackedMetric};
/// use uuid::Uuid;
///
/// let activity = ActivityBuilder::new(Uuid::new_v4(), ActivityKind::Run)
///     .distance(5_000.0)
///     .heart_rate(150.0)
///     .build();
///
/// assert_eq!(activity.metric(TrackedMetric::Distance), Some(5_000.0));
/// assert_eq!(activity.metric(TrackedMetric::ElevationGain), None);
/// ```
#[derive(Debug, Clone)]
pub struct ActivityBuilder {
    activity: ActivityObservation,
}

impl ActivityBuilder {
    /// Creates a builder with a fresh activity id
    #[must_use]
    pub fn new(user_id: Uuid, kind: ActivityKind) -> Self {
        Self {
            activity: ActivityObservation {
                id: Uuid::new_v4(),
                user_id,
                kind,
                name: None,
                start_date: None,
                metrics: ActivityMetrics::default(),
            },
        }
    }

    /// Use an explicit activity id
    #[must_use]
    pub const fn id(mut self, id: Uuid) -> Self {
        self.activity.id = id;
        self
    }

    /// Set the title
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.activity.name = Some(name.into());
        self
    }

    /// Set the start time
    #[must_use]
    pub const fn start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.activity.start_date = Some(start_date);
        self
    }

    /// Set distance in meters
    #[must_use]
    pub const fn distance(mut self, meters: f64) -> Self {
        self.activity.metrics.distance = Some(meters);
        self
    }

    /// Set average heart rate
    #[must_use]
    pub const fn heart_rate(mut self, bpm: f64) -> Self {
        self.activity.metrics.heart_rate = Some(bpm);
        self
    }

    /// Set average pace in seconds per kilometer
    #[must_use]
    pub const fn pace(mut self, seconds_per_km: f64) -> Self {
        self.activity.metrics.pace = Some(seconds_per_km);
        self
    }

    /// Set total elapsed time in seconds
    #[must_use]
    pub const fn duration(mut self, seconds: f64) -> Self {
        self.activity.metrics.duration = Some(seconds);
        self
    }

    /// Set elevation gain in meters
    #[must_use]
    pub const fn elevation_gain(mut self, meters: f64) -> Self {
        self.activity.metrics.elevation_gain = Some(meters);
        self
    }

    /// Set elevation loss in meters
    #[must_use]
    pub const fn elevation_loss(mut self, meters: f64) -> Self {
        self.activity.metrics.elevation_loss = Some(meters);
        self
    }

    /// Replace all metrics at once
    #[must_use]
    pub const fn metrics(mut self, metrics: ActivityMetrics) -> Self {
        self.activity.metrics = metrics;
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> ActivityObservation {
        self.activity
    }
}
