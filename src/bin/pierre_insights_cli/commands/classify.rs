// ABOUTME: classify command for pierre-insights
// ABOUTME: Scores activities from a JSON file against the default rules and prints the winners
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::Path;

use anyhow::{Context, Result};
use pierre_activity_insights::config::DefaultRuleConfig;
use pierre_activity_insights::engine::{Classifier, RuleScore};
use pierre_activity_insights::models::{ActivityKind, CategoryId};
use pierre_activity_insights::replay::load_activities;
use serde::Serialize;
use uuid::Uuid;

use crate::helpers::display::print_json;

#[derive(Serialize)]
struct Classification<'a> {
    activity_id: Uuid,
    kind: &'a ActivityKind,
    category_id: Option<CategoryId>,
    category: Option<&'a str>,
    scores: Vec<RuleScore>,
}

/// Classify every activity in `file`
pub async fn run(config: &DefaultRuleConfig, file: &Path) -> Result<()> {
    let activities = load_activities(file)
        .await
        .with_context(|| format!("failed to load activities from {}", file.display()))?;
    let catalog = config.catalog();

    let results: Vec<Classification<'_>> = activities
        .iter()
        .map(|activity| {
            let rules = config.rules_for_kind(activity.user_id(), activity.kind());
            let category_id = Classifier::classify(activity, &rules);
            Classification {
                activity_id: activity.id(),
                kind: activity.kind(),
                category_id,
                category: category_id
                    .and_then(|id| catalog.by_id(id))
                    .map(|category| category.slug.as_str()),
                scores: Classifier::score_all(activity, &rules),
            }
        })
        .collect();

    print_json(&results)
}
