// ABOUTME: Category rule vectors keyed by user, activity kind, and category
// ABOUTME: Supports single reference values and explicit min/max bands per metric
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActivityKind, CategoryId, TrackedMetric};
use crate::errors::RuleValidationError;

/// Natural key shared by rules and baselines: (user, activity kind, category)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryKey {
    /// Owning user
    pub user_id: Uuid,
    /// Activity kind
    pub kind: ActivityKind,
    /// Intensity category
    pub category_id: CategoryId,
}

impl CategoryKey {
    /// Create a key
    #[must_use]
    pub const fn new(user_id: Uuid, kind: ActivityKind, category_id: CategoryId) -> Self {
        Self {
            user_id,
            kind,
            category_id,
        }
    }
}

/// Expected value of one metric for a category
///
/// Serialized untagged: a bare number is a reference value, an object with
/// `min`/`max` is a band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricTarget {
    /// Single reference value representing the category midpoint
    Reference(f64),
    /// Explicit interval; the midpoint is `(min + max) / 2`
    Band {
        /// Lower bound
        #[serde(default)]
        min: Option<f64>,
        /// Upper bound
        #[serde(default)]
        max: Option<f64>,
    },
}

impl MetricTarget {
    /// Build a band from both bounds
    #[must_use]
    pub const fn band(min: f64, max: f64) -> Self {
        Self::Band {
            min: Some(min),
            max: Some(max),
        }
    }

    fn validate(&self, metric: &str) -> Result<(), RuleValidationError> {
        let non_finite = || RuleValidationError::NonFinite {
            metric: metric.to_owned(),
        };
        match *self {
            Self::Reference(value) => {
                if !value.is_finite() {
                    return Err(non_finite());
                }
                if value < 0.0 {
                    return Err(RuleValidationError::NegativeReference {
                        metric: metric.to_owned(),
                        value,
                    });
                }
            }
            Self::Band { min, max } => {
                if min.is_some_and(|v| !v.is_finite()) || max.is_some_and(|v| !v.is_finite()) {
                    return Err(non_finite());
                }
                if let (Some(min), Some(max)) = (min, max) {
                    if max < min {
                        return Err(RuleValidationError::InvertedBand {
                            metric: metric.to_owned(),
                            min,
                            max,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// A user's definition of one intensity category for one activity kind
///
/// Holds an arbitrary mapping of metric name to [`MetricTarget`]. Rules for the
/// same (user, kind) pair may cover disjoint metric subsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Owning user
    pub user_id: Uuid,
    /// Activity kind the rule applies to
    pub kind: ActivityKind,
    /// Category this rule selects
    pub category_id: CategoryId,
    /// Metric name to expected value
    pub targets: BTreeMap<String, MetricTarget>,
    /// Last modification time
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl CategoryRule {
    /// Create an empty rule
    #[must_use]
    pub fn new(user_id: Uuid, kind: ActivityKind, category_id: CategoryId) -> Self {
        Self {
            user_id,
            kind,
            category_id,
            targets: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Add a reference-value target
    #[must_use]
    pub fn with_reference(mut self, metric: impl Into<String>, value: f64) -> Self {
        self.targets
            .insert(metric.into(), MetricTarget::Reference(value));
        self
    }

    /// Add a band target
    #[must_use]
    pub fn with_band(mut self, metric: impl Into<String>, min: f64, max: f64) -> Self {
        self.targets
            .insert(metric.into(), MetricTarget::band(min, max));
        self
    }

    /// Natural key of this rule
    #[must_use]
    pub fn key(&self) -> CategoryKey {
        CategoryKey::new(self.user_id, self.kind.clone(), self.category_id)
    }

    /// Target for a tracked metric, if the rule defines one
    #[must_use]
    pub fn target(&self, metric: TrackedMetric) -> Option<&MetricTarget> {
        self.targets.get(metric.key())
    }

    /// Check the rule is well formed
    ///
    /// # Errors
    ///
    /// Returns [`RuleValidationError`] for empty rules, non-finite values,
    /// negative references, or bands whose max lies below their min.
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        if self.targets.is_empty() {
            return Err(RuleValidationError::Empty {
                category_id: self.category_id.get(),
            });
        }
        self.targets
            .iter()
            .try_for_each(|(metric, target)| target.validate(metric))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> CategoryRule {
        CategoryRule::new(Uuid::new_v4(), ActivityKind::Run, CategoryId(2))
    }

    #[test]
    fn test_reference_and_band_deserialize_untagged() {
        let json = r#"{"distance": 5000, "hr": {"min": 110, "max": 140}}"#;
        let targets: BTreeMap<String, MetricTarget> =
            serde_json::from_str(json).unwrap_or_default();
        assert_eq!(targets.get("distance"), Some(&MetricTarget::Reference(5000.0)));
        assert_eq!(targets.get("hr"), Some(&MetricTarget::band(110.0, 140.0)));
    }

    #[test]
    fn test_validate_accepts_well_formed_rule() {
        let rule = rule()
            .with_reference("distance", 5000.0)
            .with_band("hr", 110.0, 140.0);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_band() {
        let rule = rule().with_band("hr", 150.0, 120.0);
        assert!(matches!(
            rule.validate(),
            Err(RuleValidationError::InvertedBand { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_and_non_finite() {
        assert!(matches!(
            rule().validate(),
            Err(RuleValidationError::Empty { category_id: 2 })
        ));
        let rule = rule().with_reference("distance", f64::NAN);
        assert!(matches!(
            rule.validate(),
            Err(RuleValidationError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_target_lookup_uses_metric_key() {
        let rule = rule().with_reference("elevation_gain", 120.0);
        assert_eq!(
            rule.target(TrackedMetric::ElevationGain),
            Some(&MetricTarget::Reference(120.0))
        );
        assert_eq!(rule.target(TrackedMetric::Distance), None);
    }
}
