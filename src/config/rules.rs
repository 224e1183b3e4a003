// ABOUTME: Default category rule tables per sport group, loadable from JSON
// ABOUTME: Builds per-user category rules from group defaults filtered by the kind's insight metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Default Rule Configuration
//!
//! New users start with one rule per (activity kind, category) derived from a
//! table of reference values per sport group. The table is shaped as
//!
//! ```json
//! {
//!   "categories": [{ "id": 1, "slug": "recovery", "display_name": "Recovery" }],
//!   "groups": { "run": { "hr": { "recovery": 110.0, "easy": 125.0 } } }
//! }
//! ```
//!
//! `categories` may be omitted, in which case the canonical ten are used.

use std::collections::BTreeMap;
use std::path::Path;

use pierre_core::constants::metric_keys::{DISTANCE, ELEVATION_GAIN, HEART_RATE};
use pierre_core::models::{
    ActivityCategory, ActivityGroup, ActivityKind, CategoryCatalog, CategoryRule,
};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// metric key -> category slug -> reference value
pub type MetricTable = BTreeMap<String, BTreeMap<String, f64>>;

/// Reference values for every category, in canonical slug order
type Row = [f64; 10];

const SLUGS: [&str; 10] = [
    "recovery",
    "easy",
    "steady",
    "tempo",
    "threshold",
    "vo2_max",
    "anaerobic",
    "long",
    "race",
    "mixed",
];

const HIKE_ELEVATION: Row = [
    200.0, 400.0, 700.0, 900.0, 1_100.0, 600.0, 300.0, 1_500.0, 1_200.0, 900.0,
];

/// Built-in tables: group, then (metric, values) pairs
const BUILT_IN: [(ActivityGroup, &[(&str, Row)]); 11] = [
    (
        ActivityGroup::Run,
        &[
            (
                HEART_RATE,
                [110.0, 125.0, 140.0, 155.0, 170.0, 180.0, 190.0, 135.0, 175.0, 150.0],
            ),
            (
                DISTANCE,
                [
                    3_000.0, 5_000.0, 8_000.0, 10_000.0, 12_000.0, 3_000.0, 1_000.0, 20_000.0,
                    21_097.0, 12_000.0,
                ],
            ),
            (
                ELEVATION_GAIN,
                [50.0, 100.0, 200.0, 200.0, 200.0, 100.0, 50.0, 600.0, 300.0, 400.0],
            ),
        ],
    ),
    (
        ActivityGroup::Ride,
        &[
            (
                HEART_RATE,
                [95.0, 110.0, 125.0, 140.0, 155.0, 165.0, 175.0, 120.0, 160.0, 135.0],
            ),
            (
                DISTANCE,
                [
                    10_000.0, 20_000.0, 40_000.0, 50_000.0, 60_000.0, 20_000.0, 5_000.0,
                    80_000.0, 90_000.0, 50_000.0,
                ],
            ),
            (
                ELEVATION_GAIN,
                [
                    100.0, 300.0, 600.0, 800.0, 1_000.0, 400.0, 200.0, 1_500.0, 1_200.0, 900.0,
                ],
            ),
        ],
    ),
    (
        ActivityGroup::Walk,
        &[
            (
                HEART_RATE,
                [85.0, 95.0, 105.0, 115.0, 125.0, 130.0, 135.0, 100.0, 120.0, 110.0],
            ),
            (
                DISTANCE,
                [
                    2_000.0, 3_000.0, 5_000.0, 6_000.0, 7_000.0, 8_000.0, 3_000.0, 10_000.0,
                    8_000.0, 6_000.0,
                ],
            ),
            (
                ELEVATION_GAIN,
                [20.0, 40.0, 80.0, 100.0, 120.0, 80.0, 40.0, 200.0, 120.0, 100.0],
            ),
        ],
    ),
    (
        ActivityGroup::Hike,
        &[
            (
                HEART_RATE,
                [95.0, 105.0, 120.0, 135.0, 145.0, 155.0, 165.0, 115.0, 150.0, 130.0],
            ),
            (
                DISTANCE,
                [
                    5_000.0, 8_000.0, 12_000.0, 15_000.0, 18_000.0, 8_000.0, 4_000.0, 20_000.0,
                    18_000.0, 15_000.0,
                ],
            ),
            (ELEVATION_GAIN, HIKE_ELEVATION),
        ],
    ),
    (
        ActivityGroup::Row,
        &[
            (
                HEART_RATE,
                [95.0, 110.0, 130.0, 150.0, 165.0, 175.0, 185.0, 125.0, 170.0, 145.0],
            ),
            (
                DISTANCE,
                [
                    2_000.0, 4_000.0, 6_000.0, 8_000.0, 10_000.0, 3_000.0, 1_000.0, 12_000.0,
                    10_000.0, 8_000.0,
                ],
            ),
        ],
    ),
    (
        ActivityGroup::Swim,
        &[
            (
                HEART_RATE,
                [100.0, 115.0, 130.0, 145.0, 155.0, 165.0, 175.0, 120.0, 160.0, 140.0],
            ),
            (
                DISTANCE,
                [
                    500.0, 1_000.0, 1_500.0, 2_000.0, 2_500.0, 1_200.0, 600.0, 3_000.0, 2_500.0,
                    2_000.0,
                ],
            ),
        ],
    ),
    (
        ActivityGroup::Snow,
        &[
            (
                HEART_RATE,
                [95.0, 110.0, 125.0, 140.0, 150.0, 160.0, 170.0, 120.0, 150.0, 135.0],
            ),
            (
                DISTANCE,
                [
                    5_000.0, 8_000.0, 12_000.0, 15_000.0, 18_000.0, 7_000.0, 4_000.0, 20_000.0,
                    16_000.0, 12_000.0,
                ],
            ),
            (ELEVATION_GAIN, HIKE_ELEVATION),
        ],
    ),
    (
        ActivityGroup::Skate,
        &[
            (
                HEART_RATE,
                [95.0, 110.0, 125.0, 140.0, 155.0, 165.0, 175.0, 120.0, 160.0, 140.0],
            ),
            (
                DISTANCE,
                [
                    3_000.0, 6_000.0, 12_000.0, 15_000.0, 20_000.0, 8_000.0, 4_000.0, 25_000.0,
                    20_000.0, 15_000.0,
                ],
            ),
        ],
    ),
    (
        ActivityGroup::Water,
        &[
            (
                HEART_RATE,
                [95.0, 105.0, 120.0, 135.0, 145.0, 155.0, 165.0, 115.0, 150.0, 130.0],
            ),
            (
                DISTANCE,
                [
                    5_000.0, 8_000.0, 15_000.0, 20_000.0, 25_000.0, 10_000.0, 6_000.0, 30_000.0,
                    25_000.0, 20_000.0,
                ],
            ),
        ],
    ),
    (
        ActivityGroup::Field,
        &[
            (
                HEART_RATE,
                [95.0, 110.0, 130.0, 150.0, 165.0, 175.0, 185.0, 120.0, 175.0, 150.0],
            ),
            (
                DISTANCE,
                [
                    1_000.0, 2_000.0, 4_000.0, 6_000.0, 8_000.0, 4_000.0, 2_000.0, 8_000.0,
                    10_000.0, 6_000.0,
                ],
            ),
        ],
    ),
    (
        ActivityGroup::Gym,
        &[
            (
                HEART_RATE,
                [90.0, 100.0, 110.0, 120.0, 130.0, 140.0, 150.0, 100.0, 130.0, 115.0],
            ),
            (DISTANCE, [0.0; 10]),
            (ELEVATION_GAIN, [0.0; 10]),
        ],
    ),
];

/// Per-group reference tables used to seed new users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultRuleConfig {
    /// Category catalog the tables refer to
    #[serde(default = "ActivityCategory::canonical")]
    pub categories: Vec<ActivityCategory>,
    /// group -> metric -> category slug -> reference value
    #[serde(default)]
    pub groups: BTreeMap<String, MetricTable>,
}

impl Default for DefaultRuleConfig {
    fn default() -> Self {
        let groups = BUILT_IN
            .iter()
            .map(|(group, metrics)| {
                let table = metrics
                    .iter()
                    .map(|(metric, row)| {
                        let by_slug = SLUGS
                            .iter()
                            .zip(row.iter())
                            .map(|(slug, value)| ((*slug).to_owned(), *value))
                            .collect();
                        ((*metric).to_owned(), by_slug)
                    })
                    .collect();
                (group.as_str().to_owned(), table)
            })
            .collect();

        Self {
            categories: ActivityCategory::canonical(),
            groups,
        }
    }
}

impl DefaultRuleConfig {
    /// Parse and validate a JSON document
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the document is malformed or holds
    /// invalid values.
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AppError::config(format!("Invalid rule configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON rule configuration from disk
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            AppError::config(format!(
                "Cannot read rule configuration {}: {e}",
                path.display()
            ))
        })?;
        let config = Self::from_json_str(&contents)?;
        debug!(
            path = %path.display(),
            groups = config.groups.len(),
            "loaded rule configuration"
        );
        Ok(config)
    }

    /// Check that every value is a finite, non-negative number and every slug
    /// names a known category
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first offending entry.
    pub fn validate(&self) -> AppResult<()> {
        let catalog = self.catalog();
        for (group, metrics) in &self.groups {
            for (metric, by_slug) in metrics {
                for (slug, value) in by_slug {
                    if catalog.by_slug(slug).is_none() {
                        return Err(AppError::config(format!(
                            "Unknown category '{slug}' in group '{group}' metric '{metric}'"
                        )));
                    }
                    if !value.is_finite() || *value < 0.0 {
                        return Err(AppError::config(format!(
                            "Invalid reference {value} for {group}.{metric}.{slug}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Catalog built from the configured categories
    #[must_use]
    pub fn catalog(&self) -> CategoryCatalog {
        CategoryCatalog::new(self.categories.clone())
    }

    /// Metric tables for a sport group
    #[must_use]
    pub fn group(&self, group: ActivityGroup) -> Option<&MetricTable> {
        self.groups.get(group.as_str())
    }

    /// Default rule for one (kind, category), or `None` when nothing applies
    ///
    /// Only metrics the kind discusses in insights are emitted.
    #[must_use]
    pub fn rule_for(
        &self,
        user_id: Uuid,
        kind: &ActivityKind,
        category: &ActivityCategory,
    ) -> Option<CategoryRule> {
        let table = self.group(kind.group())?;
        let mut rule = CategoryRule::new(user_id, kind.clone(), category.id);
        for metric in kind.insight_parameters() {
            if let Some(value) = table.get(*metric).and_then(|m| m.get(&category.slug)) {
                rule = rule.with_reference(*metric, *value);
            }
        }
        if rule.targets.is_empty() {
            None
        } else {
            Some(rule)
        }
    }

    /// Every default rule for `kind`, ordered by category id
    #[must_use]
    pub fn rules_for_kind(&self, user_id: Uuid, kind: &ActivityKind) -> Vec<CategoryRule> {
        self.catalog()
            .iter()
            .filter_map(|category| self.rule_for(user_id, kind, category))
            .collect()
    }
}
