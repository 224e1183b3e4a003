// ABOUTME: Tracked metric enumeration shared by deltas, baselines, and classification
// ABOUTME: Names the six per-activity measurements and the three classification dimensions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::metric_keys;

/// Measurement tracked per activity by the delta and baseline pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedMetric {
    /// Distance in meters
    Distance,
    /// Average heart rate in bpm
    #[serde(rename = "hr")]
    HeartRate,
    /// Average pace in seconds per kilometer
    #[serde(rename = "avg_pace")]
    Pace,
    /// Total elapsed time in seconds
    Duration,
    /// Elevation gain in meters
    ElevationGain,
    /// Elevation loss in meters
    ElevationLoss,
}

impl TrackedMetric {
    /// Every tracked metric, in record order
    pub const ALL: [Self; 6] = [
        Self::Distance,
        Self::HeartRate,
        Self::Pace,
        Self::Duration,
        Self::ElevationGain,
        Self::ElevationLoss,
    ];

    /// The fixed classification vector: distance, heart rate, elevation gain
    pub const CLASSIFICATION: [Self; 3] = [Self::Distance, Self::HeartRate, Self::ElevationGain];

    /// Key used in rule maps and serialized records
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Distance => metric_keys::DISTANCE,
            Self::HeartRate => metric_keys::HEART_RATE,
            Self::Pace => metric_keys::PACE,
            Self::Duration => metric_keys::DURATION,
            Self::ElevationGain => metric_keys::ELEVATION_GAIN,
            Self::ElevationLoss => metric_keys::ELEVATION_LOSS,
        }
    }
}

impl fmt::Display for TrackedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
