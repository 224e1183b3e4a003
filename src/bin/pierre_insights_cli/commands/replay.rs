// ABOUTME: replay command for pierre-insights
// ABOUTME: Runs a file of activities through the pipeline and prints every outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use pierre_activity_insights::config::{DefaultRuleConfig, ServerConfig};
use pierre_activity_insights::insights::LlmInsightRenderer;
use pierre_activity_insights::replay::{load_activities, Replayer};
use pierre_activity_insights::repositories::Repositories;
use tracing::info;

use crate::helpers::display::print_json;

/// Replay `file`, rendering insights when `render` is set and a key exists
pub async fn run(
    config: &ServerConfig,
    rules: DefaultRuleConfig,
    file: &Path,
    render: bool,
) -> Result<()> {
    let activities = load_activities(file)
        .await
        .with_context(|| format!("failed to load activities from {}", file.display()))?;

    let mut replayer = Replayer::new(Repositories::in_memory(), Arc::new(rules))
        .with_notifications(config.notification_hub());
    if render {
        let renderer = LlmInsightRenderer::from_config(&config.insights)
            .context("failed to build insight renderer")?;
        if let Some(renderer) = renderer {
            replayer = replayer.with_renderer(Arc::new(renderer));
        }
    }

    info!(activities = activities.len(), "replaying activities");
    let report = replayer.run(&activities).await.context("replay failed")?;
    print_json(&report)
}
