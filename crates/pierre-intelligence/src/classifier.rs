// ABOUTME: Nearest-centroid activity classifier over user-defined category rules
// ABOUTME: Scores rules by Euclidean norm of normalized deviations on distance, HR, and elevation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Activity Classifier
//!
//! Picks the single best-matching intensity category for an activity. Each
//! candidate rule of the activity's kind gets a score: the Euclidean norm of
//! the normalized deviations on the fixed classification vector (distance,
//! heart rate, elevation gain). The lowest score wins and ties keep the first
//! rule encountered, so the result is deterministic for a stable rule order.
//!
//! Missing metrics on either side contribute zero to their dimension. An
//! activity with no metrics therefore scores zero against every rule and lands
//! in the first one.

use pierre_core::models::{ActivityObservation, CategoryId, CategoryRule, TrackedMetric};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::numeric::{euclidean_norm, normalized_deviation};

/// Score of one candidate rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleScore {
    /// Category of the scored rule
    pub category_id: CategoryId,
    /// Euclidean distance from the rule centroid
    pub score: f64,
}

/// Result of classifying one activity in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchClassification {
    /// Classified activity
    pub activity_id: Uuid,
    /// Selected category, if any rule applied
    pub category_id: Option<CategoryId>,
}

/// Nearest-centroid classifier
pub struct Classifier;

impl Classifier {
    /// Score an activity against one rule
    #[must_use]
    pub fn score(activity: &ActivityObservation, rule: &CategoryRule) -> f64 {
        let components = TrackedMetric::CLASSIFICATION
            .map(|metric| normalized_deviation(activity.metric(metric), rule.target(metric)));
        euclidean_norm(&components)
    }

    /// Scores for every rule matching the activity's kind, in rule order
    #[must_use]
    pub fn score_all(activity: &ActivityObservation, rules: &[CategoryRule]) -> Vec<RuleScore> {
        rules
            .iter()
            .filter(|rule| rule.kind == *activity.kind())
            .map(|rule| RuleScore {
                category_id: rule.category_id,
                score: Self::score(activity, rule),
            })
            .collect()
    }

    /// Best-matching category, or `None` when no rule matches the activity's kind
    #[must_use]
    pub fn classify(activity: &ActivityObservation, rules: &[CategoryRule]) -> Option<CategoryId> {
        let mut best: Option<RuleScore> = None;
        for candidate in Self::score_all(activity, rules) {
            // strict comparison keeps the first rule on ties; NaN never wins
            let threshold = best.map_or(f64::INFINITY, |current| current.score);
            if candidate.score < threshold {
                best = Some(candidate);
            }
        }

        debug!(
            activity_id = %activity.id(),
            kind = %activity.kind(),
            category_id = ?best.map(|b| b.category_id),
            score = ?best.map(|b| b.score),
            "classified activity"
        );
        best.map(|b| b.category_id)
    }

    /// Classify many activities against one rule set in parallel
    ///
    /// Used when a user's rules change and their history must be reassigned.
    /// Output order matches input order.
    #[must_use]
    pub fn classify_batch(
        activities: &[ActivityObservation],
        rules: &[CategoryRule],
    ) -> Vec<BatchClassification> {
        activities
            .par_iter()
            .map(|activity| BatchClassification {
                activity_id: activity.id(),
                category_id: Self::classify(activity, rules),
            })
            .collect()
    }
}
