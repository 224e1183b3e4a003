// ABOUTME: Offline replay of recorded activities through the processing pipeline
// ABOUTME: Loads activity JSON, seeds default rules for every owner, and processes in order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use pierre_core::models::{ActivityKind, ActivityObservation};
use pierre_core::permissions::AuthContext;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::DefaultRuleConfig;
use crate::errors::{AppError, AppResult};
use crate::insights::InsightRenderer;
use crate::notifications::{ActivityNotification, NotificationHub};
use crate::pipeline::{ActivityInsightPipeline, ProcessingOutcome};
use crate::repositories::Repositories;
use crate::seeding::{RuleSeeder, SeedReport};

#[derive(Deserialize)]
#[serde(untagged)]
enum ActivityDocument {
    Many(Vec<ActivityObservation>),
    One(Box<ActivityObservation>),
}

/// Parse one activity object or an array of them
///
/// # Errors
///
/// Returns `InvalidInput` if the document is not valid activity JSON.
pub fn parse_activities(json: &str) -> AppResult<Vec<ActivityObservation>> {
    let document: ActivityDocument = serde_json::from_str(json)
        .map_err(|e| AppError::invalid_input(format!("Invalid activity JSON: {e}")))?;
    Ok(match document {
        ActivityDocument::Many(activities) => activities,
        ActivityDocument::One(activity) => vec![*activity],
    })
}

/// Read activities from a JSON file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load_activities(path: &Path) -> AppResult<Vec<ActivityObservation>> {
    let contents = fs::read_to_string(path).await.map_err(|e| {
        AppError::invalid_input(format!("Cannot read {}: {e}", path.display()))
    })?;
    parse_activities(&contents)
}

/// Result of a replay run
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Rules seeded before processing
    pub seeded: SeedReport,
    /// One outcome per input activity, in input order
    pub outcomes: Vec<ProcessingOutcome>,
    /// Notifications delivered to each owner, in delivery order
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub notifications: BTreeMap<Uuid, Vec<ActivityNotification>>,
}

/// Fresh in-memory stores plus a pipeline over them
pub struct Replayer {
    seeder: RuleSeeder,
    pipeline: ActivityInsightPipeline,
    hub: Option<NotificationHub>,
    ctx: AuthContext,
}

impl Replayer {
    /// Replayer over `repositories`, seeding from `rules`
    #[must_use]
    pub fn new(repositories: Repositories, rules: Arc<DefaultRuleConfig>) -> Self {
        let catalog = rules.catalog();
        Self {
            seeder: RuleSeeder::new(rules, Arc::clone(&repositories.rules)),
            pipeline: ActivityInsightPipeline::new(repositories, catalog),
            hub: None,
            ctx: AuthContext::service(),
        }
    }

    /// Render insights while replaying
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn InsightRenderer>) -> Self {
        self.pipeline = self.pipeline.with_renderer(renderer);
        self
    }

    /// Connect every owner to `hub` during the run and collect what they receive
    ///
    /// Messages beyond the hub's channel capacity are dropped.
    #[must_use]
    pub fn with_notifications(mut self, hub: NotificationHub) -> Self {
        self.pipeline = self.pipeline.with_notifications(hub.clone());
        self.hub = Some(hub);
        self
    }

    /// Seed defaults for every (owner, kind) present, then process in order
    ///
    /// # Errors
    ///
    /// Returns the first seeding or processing error.
    #[instrument(skip_all, fields(activities = activities.len()))]
    pub async fn run(&self, activities: &[ActivityObservation]) -> AppResult<ReplayReport> {
        let owners = kinds_by_owner(activities);
        let mut seeded = SeedReport::default();
        let mut receivers = BTreeMap::new();
        for (user_id, kinds) in owners {
            let kinds: Vec<ActivityKind> = kinds.into_iter().collect();
            let report = self.seeder.seed_user(&self.ctx, user_id, &kinds).await?;
            seeded.created += report.created;
            seeded.skipped += report.skipped;
            if let Some(hub) = &self.hub {
                receivers.insert(user_id, hub.connect(user_id));
            }
        }

        let outcomes = self.pipeline.process_all(&self.ctx, activities).await?;

        let mut notifications = BTreeMap::new();
        for (user_id, mut receiver) in receivers {
            let mut received = Vec::new();
            while let Ok(message) = receiver.try_recv() {
                received.push(message);
            }
            if let Some(hub) = &self.hub {
                hub.disconnect(user_id);
            }
            notifications.insert(user_id, received);
        }

        info!(
            rules_seeded = seeded.created,
            outcomes = outcomes.len(),
            notified_users = notifications.len(),
            "replay finished"
        );
        Ok(ReplayReport {
            seeded,
            outcomes,
            notifications,
        })
    }
}

fn kinds_by_owner(activities: &[ActivityObservation]) -> BTreeMap<Uuid, BTreeSet<ActivityKind>> {
    let mut owners: BTreeMap<Uuid, BTreeSet<ActivityKind>> = BTreeMap::new();
    for activity in activities {
        owners
            .entry(activity.user_id())
            .or_default()
            .insert(activity.kind().clone());
    }
    owners
}
