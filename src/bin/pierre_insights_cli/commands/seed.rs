// ABOUTME: seed command for pierre-insights
// ABOUTME: Writes default rules for one user and prints what was created
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use anyhow::{Context, Result};
use pierre_activity_insights::config::DefaultRuleConfig;
use pierre_activity_insights::models::{ActivityKind, CategoryRule};
use pierre_activity_insights::permissions::AuthContext;
use pierre_activity_insights::repositories::{InMemoryRepositories, RuleRepository};
use pierre_activity_insights::seeding::RuleSeeder;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::helpers::display::{parse_kinds, print_json};

#[derive(Serialize)]
struct SeedOutput {
    user_id: Uuid,
    created: usize,
    skipped: usize,
    rules: Vec<CategoryRule>,
}

/// Seed `user` and print the resulting rules
pub async fn run(config: DefaultRuleConfig, user: Uuid, kind_names: &[String]) -> Result<()> {
    let repos = InMemoryRepositories::new();
    let seeder = RuleSeeder::new(Arc::new(config), repos.repositories().rules);
    let ctx = AuthContext::service();

    let mut kinds = parse_kinds(kind_names);
    info!(%user, kinds = kinds.len(), "seeding default rules");
    let report = seeder
        .seed_user(&ctx, user, &kinds)
        .await
        .context("seeding failed")?;

    if kinds.is_empty() {
        kinds = ActivityKind::STANDARD.to_vec();
    }
    let mut rules = Vec::new();
    for kind in &kinds {
        let seeded = repos
            .rules
            .get_rules(&ctx, user, kind)
            .await?
            .into_result("Category rules")?;
        rules.extend(seeded);
    }

    print_json(&SeedOutput {
        user_id: user,
        created: report.created,
        skipped: report.skipped,
        rules,
    })
}
