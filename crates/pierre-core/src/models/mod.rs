// ABOUTME: Core data models for activity classification and per-category baselines
// ABOUTME: Re-exports activity observations, kinds, categories, rules, baselines, and deltas
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Plain data shared by the engine and its stores. Nothing in this module
//! performs I/O.
//!
//! ## Core Models
//!
//! - `ActivityObservation`: one completed activity with optional metrics
//! - `ActivityKind`: fixed enumeration of sport types, grouped for defaults
//! - `CategoryRule`: a user's metric targets for one intensity category
//! - `BaselineStats`: running mean and M2 per metric for a category
//! - `DeltaRecord`: comparison of one activity against its baseline
//! - `ActivityInsight`: rendered commentary for an activity

mod activity;
mod baseline;
mod category;
mod delta;
mod insight;
mod metric;
mod rule;
mod sport;

pub use activity::{ActivityBuilder, ActivityMetrics, ActivityObservation};
pub use baseline::{BaselineStats, RunningMoments};
pub use category::{ActivityCategory, CategoryCatalog, CategoryId};
pub use delta::{DeltaKey, DeltaRecord, MetricDelta};
pub use insight::ActivityInsight;
pub use metric::TrackedMetric;
pub use rule::{CategoryKey, CategoryRule, MetricTarget};
pub use sport::{normalize_name, ActivityGroup, ActivityKind};
