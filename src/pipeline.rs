// ABOUTME: Activity processing pipeline: classify, compare with baseline, update baseline, render insight
// ABOUTME: Serializes baseline read-modify-write per (user, kind, category) with async locks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Processing Pipeline
//!
//! One call to [`ActivityInsightPipeline::process`] takes an activity through
//! every stage. The baseline for a category key is only ever touched while
//! the key's lock is held, and a delta record doubles as the "already seen"
//! marker so replaying an activity never counts it twice.
//!
//! Insight rendering happens after the lock is released. A rendering failure
//! is logged and the activity is still reported as processed.

use std::sync::Arc;

use dashmap::DashMap;
use pierre_core::models::{
    ActivityInsight, ActivityObservation, BaselineStats, CategoryCatalog, CategoryId, CategoryKey,
    DeltaKey, DeltaRecord,
};
use pierre_core::permissions::AuthContext;
use pierre_intelligence::{BaselineUpdater, Classifier, DeltaCalculator};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::errors::{AppResult, ErrorCode};
use crate::insights::{InsightContext, InsightRenderer};
use crate::notifications::{ActivityNotification, NotificationHub};
use crate::repositories::{Entity, Repositories};

/// What happened to one activity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingOutcome {
    /// No category could be chosen
    Unclassified {
        /// Skipped activity
        activity_id: Uuid,
        /// Why
        reason: String,
    },
    /// A delta for this activity and category already exists
    AlreadyProcessed {
        /// Skipped activity
        activity_id: Uuid,
        /// Category chosen on this run
        category_id: CategoryId,
    },
    /// Delta computed and baseline advanced
    Processed {
        /// Processed activity
        activity_id: Uuid,
        /// Selected category
        category_id: CategoryId,
        /// Comparison against the prior baseline
        delta: DeltaRecord,
        /// Baseline after folding the activity in
        baseline: BaselineStats,
        /// Rendered commentary, when a renderer is configured and succeeded
        insight: Option<ActivityInsight>,
    },
}

impl ProcessingOutcome {
    /// Activity the outcome refers to
    #[must_use]
    pub const fn activity_id(&self) -> Uuid {
        match self {
            Self::Unclassified { activity_id, .. }
            | Self::AlreadyProcessed { activity_id, .. }
            | Self::Processed { activity_id, .. } => *activity_id,
        }
    }

    /// Chosen category, if any
    #[must_use]
    pub const fn category_id(&self) -> Option<CategoryId> {
        match self {
            Self::Unclassified { .. } => None,
            Self::AlreadyProcessed { category_id, .. } | Self::Processed { category_id, .. } => {
                Some(*category_id)
            }
        }
    }
}

/// Orchestrates the engine against the repositories
pub struct ActivityInsightPipeline {
    repositories: Repositories,
    catalog: CategoryCatalog,
    renderer: Option<Arc<dyn InsightRenderer>>,
    notifications: Option<NotificationHub>,
    locks: DashMap<CategoryKey, Arc<Mutex<()>>>,
}

impl ActivityInsightPipeline {
    /// Pipeline without insight rendering or notifications
    #[must_use]
    pub fn new(repositories: Repositories, catalog: CategoryCatalog) -> Self {
        Self {
            repositories,
            catalog,
            renderer: None,
            notifications: None,
            locks: DashMap::new(),
        }
    }

    /// Render insights with `renderer`
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn InsightRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Push events to connected users through `hub`
    #[must_use]
    pub fn with_notifications(mut self, hub: NotificationHub) -> Self {
        self.notifications = Some(hub);
        self
    }

    /// Category catalog used for labels
    #[must_use]
    pub const fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Run one activity through every stage
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` when `ctx` may not act for the activity's
    /// owner, or any storage error. Insight rendering failures are not errors.
    #[instrument(
        skip(self, ctx, activity),
        fields(
            activity_id = %activity.id(),
            user_id = %activity.user_id(),
            kind = %activity.kind().display_name(),
        )
    )]
    pub async fn process(
        &self,
        ctx: &AuthContext,
        activity: &ActivityObservation,
    ) -> AppResult<ProcessingOutcome> {
        let activity_id = activity.id();
        let user_id = activity.user_id();

        let rules = self
            .repositories
            .rules
            .get_rules(ctx, user_id, activity.kind())
            .await?
            .into_result("Category rules")?;

        let Some(category_id) = Classifier::classify(activity, &rules) else {
            let reason = format!(
                "no category rules for activity type {}",
                activity.kind().display_name()
            );
            info!(%reason, "activity left unclassified");
            self.notify(
                user_id,
                ActivityNotification::ActivityUnclassified {
                    activity_id,
                    reason: reason.clone(),
                },
            );
            return Ok(ProcessingOutcome::Unclassified {
                activity_id,
                reason,
            });
        };

        let key = CategoryKey::new(user_id, activity.kind().clone(), category_id);
        let Some((delta, baseline)) = self.advance_baseline(ctx, activity, &key).await? else {
            debug!(%category_id, "activity already processed");
            return Ok(ProcessingOutcome::AlreadyProcessed {
                activity_id,
                category_id,
            });
        };

        let (category_slug, _) = self.catalog.label(category_id);
        info!(
            %category_id,
            category = category_slug,
            baseline_count = baseline.count,
            "activity classified"
        );
        self.notify(
            user_id,
            ActivityNotification::ActivityClassified {
                activity_id,
                category_id,
                category_slug: category_slug.to_owned(),
                baseline_count: baseline.count,
            },
        );

        let insight = self.render_insight(ctx, activity, &delta).await?;

        Ok(ProcessingOutcome::Processed {
            activity_id,
            category_id,
            delta,
            baseline,
            insight,
        })
    }

    /// Process activities one after another, in order
    ///
    /// # Errors
    ///
    /// Stops at the first activity that fails.
    pub async fn process_all(
        &self,
        ctx: &AuthContext,
        activities: &[ActivityObservation],
    ) -> AppResult<Vec<ProcessingOutcome>> {
        let mut outcomes = Vec::with_capacity(activities.len());
        for activity in activities {
            outcomes.push(self.process(ctx, activity).await?);
        }
        Ok(outcomes)
    }

    fn lock_for(&self, key: &CategoryKey) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.entry(key.clone()).or_default().value())
    }

    /// Drop the lock entry for `key` once no task holds or awaits it
    fn release_lock(&self, key: &CategoryKey, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.locks
            .remove_if(key, |_, entry| Arc::strong_count(entry) == 1);
    }

    /// Number of baseline keys with a live lock entry
    #[must_use]
    pub fn active_locks(&self) -> usize {
        self.locks.len()
    }

    /// Delta against the prior baseline plus the advanced baseline, or `None`
    /// when the activity was already folded into this category
    async fn advance_baseline(
        &self,
        ctx: &AuthContext,
        activity: &ActivityObservation,
        key: &CategoryKey,
    ) -> AppResult<Option<(DeltaRecord, BaselineStats)>> {
        let lock = self.lock_for(key);
        let result = {
            let _guard = lock.lock().await;
            self.advance_baseline_locked(ctx, activity, key).await
        };
        self.release_lock(key, lock);
        result
    }

    async fn advance_baseline_locked(
        &self,
        ctx: &AuthContext,
        activity: &ActivityObservation,
        key: &CategoryKey,
    ) -> AppResult<Option<(DeltaRecord, BaselineStats)>> {
        let delta_key = DeltaKey {
            user_id: key.user_id,
            activity_id: activity.id(),
            category_id: key.category_id,
        };
        let existing = self.repositories.deltas.get(ctx, &delta_key).await?;
        if existing.into_optional(DeltaRecord::RESOURCE)?.is_some() {
            return Ok(None);
        }

        let prior = self
            .repositories
            .baselines
            .get_baseline(ctx, key)
            .await?
            .into_optional(BaselineStats::RESOURCE)?;

        let delta = DeltaCalculator::compute_delta(activity, key.category_id, prior.as_ref());
        let delta = self
            .repositories
            .deltas
            .create(ctx, delta)
            .await?
            .into_result(DeltaRecord::RESOURCE)?;

        let baseline = BaselineUpdater::update_baseline(key.category_id, prior, activity);
        let baseline = self
            .repositories
            .baselines
            .upsert(ctx, baseline)
            .await?
            .into_result(BaselineStats::RESOURCE)?;

        Ok(Some((delta, baseline)))
    }

    async fn render_insight(
        &self,
        ctx: &AuthContext,
        activity: &ActivityObservation,
        delta: &DeltaRecord,
    ) -> AppResult<Option<ActivityInsight>> {
        let Some(renderer) = &self.renderer else {
            return Ok(None);
        };

        let context = InsightContext::new(delta.clone(), activity, &self.catalog);
        let text = match renderer.render(&context).await {
            Ok(text) => text,
            Err(error) => {
                warn!(error = %error, "continuing without insight");
                return Ok(None);
            }
        };

        let insight =
            ActivityInsight::new(activity.id(), activity.user_id(), text, renderer.model());
        let stored = self.store_insight(ctx, insight).await?;

        self.notify(
            stored.user_id,
            ActivityNotification::InsightReady {
                activity_id: stored.activity_id,
                category_id: delta.category_id,
                insight_text: stored.insight_text.clone(),
            },
        );
        Ok(Some(stored))
    }

    /// Insert, or replace the insight left by an earlier classification
    async fn store_insight(
        &self,
        ctx: &AuthContext,
        insight: ActivityInsight,
    ) -> AppResult<ActivityInsight> {
        let insights = &self.repositories.insights;
        match insights.create(ctx, insight.clone()).await {
            Ok(access) => access.into_result(ActivityInsight::RESOURCE),
            Err(e) if e.code == ErrorCode::ResourceAlreadyExists => insights
                .update(ctx, insight)
                .await?
                .into_result(ActivityInsight::RESOURCE),
            Err(e) => Err(e),
        }
    }

    fn notify(&self, user_id: Uuid, message: ActivityNotification) {
        if let Some(hub) = &self.notifications {
            hub.send_message(user_id, message);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use pierre_core::models::{ActivityBuilder, ActivityKind, CategoryRule};

    use super::*;
    use crate::repositories::{InMemoryRepositories, ScopedRepository};

    async fn pipeline_with_rules(user: Uuid) -> ActivityInsightPipeline {
        let repos = InMemoryRepositories::new();
        let ctx = AuthContext::for_user(user);
        for (category, distance) in [(1, 5_000.0), (2, 15_000.0)] {
            repos
                .rules
                .create(
                    &ctx,
                    CategoryRule::new(user, ActivityKind::Run, CategoryId(category))
                        .with_reference("distance", distance),
                )
                .await
                .unwrap();
        }
        ActivityInsightPipeline::new(repos.repositories(), CategoryCatalog::default())
    }

    #[tokio::test]
    async fn test_first_then_second_activity() {
        let user = Uuid::new_v4();
        let pipeline = pipeline_with_rules(user).await;
        let ctx = AuthContext::for_user(user);

        let first = ActivityBuilder::new(user, ActivityKind::Run)
            .distance(14_000.0)
            .build();
        let ProcessingOutcome::Processed {
            category_id,
            delta,
            baseline,
            ..
        } = pipeline.process(&ctx, &first).await.unwrap()
        else {
            panic!("expected processed outcome");
        };
        assert_eq!(category_id, CategoryId(2));
        assert!(delta.is_undefined());
        assert_eq!(baseline.count, 1);

        let second = ActivityBuilder::new(user, ActivityKind::Run)
            .distance(16_000.0)
            .build();
        let ProcessingOutcome::Processed {
            delta, baseline, ..
        } = pipeline.process(&ctx, &second).await.unwrap()
        else {
            panic!("expected processed outcome");
        };
        assert_eq!(delta.distance.delta, Some(2_000.0));
        assert_eq!(baseline.count, 2);
        assert_eq!(baseline.distance.mean, Some(15_000.0));
    }

    #[tokio::test]
    async fn test_replay_is_not_double_counted() {
        let user = Uuid::new_v4();
        let pipeline = pipeline_with_rules(user).await;
        let ctx = AuthContext::for_user(user);
        let activity = ActivityBuilder::new(user, ActivityKind::Run)
            .distance(5_500.0)
            .build();

        pipeline.process(&ctx, &activity).await.unwrap();
        let again = pipeline.process(&ctx, &activity).await.unwrap();
        assert_eq!(
            again,
            ProcessingOutcome::AlreadyProcessed {
                activity_id: activity.id(),
                category_id: CategoryId(1),
            }
        );
    }

    #[tokio::test]
    async fn test_kind_without_rules_is_unclassified() {
        let user = Uuid::new_v4();
        let pipeline = pipeline_with_rules(user).await;
        let activity = ActivityBuilder::new(user, ActivityKind::LapSwimming)
            .distance(2_000.0)
            .build();

        let outcome = pipeline
            .process(&AuthContext::for_user(user), &activity)
            .await
            .unwrap();
        assert!(matches!(outcome, ProcessingOutcome::Unclassified { .. }));
        assert_eq!(outcome.category_id(), None);
    }

    #[tokio::test]
    async fn test_foreign_context_is_rejected() {
        let user = Uuid::new_v4();
        let pipeline = pipeline_with_rules(user).await;
        let activity = ActivityBuilder::new(user, ActivityKind::Run)
            .distance(5_000.0)
            .build();

        let err = pipeline
            .process(&AuthContext::for_user(Uuid::new_v4()), &activity)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }
}
