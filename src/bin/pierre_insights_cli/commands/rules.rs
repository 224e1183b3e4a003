// ABOUTME: rules command for pierre-insights
// ABOUTME: Prints the default metric targets per category for one activity type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use pierre_activity_insights::config::DefaultRuleConfig;
use pierre_activity_insights::models::{ActivityKind, CategoryId, MetricTarget};
use serde::Serialize;
use uuid::Uuid;

use crate::helpers::display::print_json;

#[derive(Serialize)]
struct RuleView<'a> {
    category_id: CategoryId,
    category: &'a str,
    display_name: &'a str,
    targets: BTreeMap<String, MetricTarget>,
}

/// Print the defaults for `kind_name`
pub fn run(config: &DefaultRuleConfig, kind_name: &str) -> Result<()> {
    let kind = ActivityKind::from_name(kind_name);
    let rules = config.rules_for_kind(Uuid::nil(), &kind);
    if rules.is_empty() {
        bail!("no default rules for activity type '{kind_name}'");
    }

    let catalog = config.catalog();
    let views: Vec<RuleView<'_>> = rules
        .into_iter()
        .map(|rule| {
            let (slug, name) = catalog.label(rule.category_id);
            RuleView {
                category_id: rule.category_id,
                category: slug,
                display_name: name,
                targets: rule.targets,
            }
        })
        .collect();

    print_json(&views)
}
