// ABOUTME: Activity intelligence engine: classification, delta computation, baseline updates
// ABOUTME: Pure functions over pierre-core models, shared by the pipeline and the CLI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Intelligence
//!
//! Deterministic algorithms behind activity insights:
//!
//! - [`classifier::Classifier`] assigns an activity to its nearest category rule
//! - [`delta::DeltaCalculator`] compares an activity with a category baseline
//! - [`baseline::BaselineUpdater`] folds an activity into running statistics
//!
//! None of these functions touch storage. Callers serialize read-modify-write
//! cycles on a baseline themselves.

/// Incremental baseline statistics
pub mod baseline;
/// Nearest-centroid classification
pub mod classifier;
/// Activity versus baseline deltas
pub mod delta;
/// Shared numeric helpers
pub mod numeric;

pub use baseline::BaselineUpdater;
pub use classifier::{BatchClassification, Classifier, RuleScore};
pub use delta::DeltaCalculator;
