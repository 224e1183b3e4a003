// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Metric keys, insight generation defaults, and notification limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into small domain modules rather than one flat list.

/// Metric keys as they appear in rule definitions and serialized records
pub mod metric_keys {
    /// Distance in meters
    pub const DISTANCE: &str = "distance";
    /// Average heart rate in beats per minute
    pub const HEART_RATE: &str = "hr";
    /// Average pace in seconds per kilometer
    pub const PACE: &str = "avg_pace";
    /// Total elapsed time in seconds
    pub const DURATION: &str = "duration";
    /// Elevation gain in meters
    pub const ELEVATION_GAIN: &str = "elevation_gain";
    /// Elevation loss in meters
    pub const ELEVATION_LOSS: &str = "elevation_loss";
    /// Average power in watts (carried by rules, not tracked by baselines)
    pub const POWER: &str = "power";
    /// Average cadence (carried by rules, not tracked by baselines)
    pub const CADENCE: &str = "cadence";
    /// Average speed (carried by rules, not tracked by baselines)
    pub const SPEED: &str = "speed";
}

/// Defaults for the insight text generation call
pub mod insights {
    /// Default chat completions base URL
    pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
    /// Default model used to render insights
    pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
    /// Per-request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Connection timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Attempts before giving up
    pub const MAX_ATTEMPTS: u32 = 3;
    /// Base delay for exponential backoff in milliseconds
    pub const BACKOFF_BASE_MS: u64 = 1_000;
}

/// Notification hub limits
pub mod notifications {
    /// Buffered messages per connected user before sends start failing
    pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
}

/// Service identity used by logging
pub mod service {
    /// Service name reported in logs
    pub const SERVICE_NAME: &str = "pierre-activity-insights";
}
