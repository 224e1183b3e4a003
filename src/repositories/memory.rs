// ABOUTME: In-memory repository implementation backed by concurrent hash maps
// ABOUTME: Used by the CLI replay path and by tests; ownership is enforced per key
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use pierre_core::models::{
    ActivityInsight, ActivityKind, BaselineStats, CategoryKey, CategoryRule, DeltaRecord,
};
use pierre_core::permissions::{AccessMode, AuthContext};
use tracing::debug;
use uuid::Uuid;

use super::{
    Access, BaselineRepository, DeltaRepository, Entity, InsightRepository, Repositories,
    RuleRepository, ScopedRepository,
};
use crate::errors::{AppError, AppResult};

/// One entity table keyed by its natural key
pub struct MemoryTable<E: Entity> {
    entries: DashMap<E::Key, E>,
}

impl<E: Entity> Default for MemoryTable<E> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<E: Entity> MemoryTable<E> {
    /// Empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn permits(ctx: &AuthContext, key: &E::Key, mode: AccessMode) -> bool {
        ctx.can_access(E::owner_of(key), mode)
    }

    fn select(&self, predicate: impl Fn(&E) -> bool) -> Vec<E> {
        self.entries
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn remove_unchecked(&self, key: &E::Key) -> Option<E> {
        self.entries.remove(key).map(|(_, entity)| entity)
    }
}

#[async_trait]
impl<E: Entity> ScopedRepository<E> for MemoryTable<E> {
    async fn get(&self, ctx: &AuthContext, key: &E::Key) -> AppResult<Access<E>> {
        if !Self::permits(ctx, key, AccessMode::Read) {
            return Ok(Access::Forbidden);
        }
        Ok(self
            .entries
            .get(key)
            .map_or(Access::NotFound, |entry| Access::Found(entry.value().clone())))
    }

    async fn create(&self, ctx: &AuthContext, entity: E) -> AppResult<Access<E>> {
        let key = entity.key();
        if !Self::permits(ctx, &key, AccessMode::Write) {
            return Ok(Access::Forbidden);
        }
        entity.validate()?;

        match self.entries.entry(key) {
            MapEntry::Occupied(occupied) => {
                debug!(
                    key = ?occupied.key(),
                    resource = E::RESOURCE,
                    "create rejected, key taken"
                );
                Err(AppError::already_exists(E::RESOURCE)
                    .with_user_id(E::owner_of(occupied.key()))
                    .with_resource_id(format!("{:?}", occupied.key())))
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(entity.clone());
                Ok(Access::Found(entity))
            }
        }
    }

    async fn update(&self, ctx: &AuthContext, entity: E) -> AppResult<Access<E>> {
        let key = entity.key();
        if !Self::permits(ctx, &key, AccessMode::Write) {
            return Ok(Access::Forbidden);
        }
        entity.validate()?;

        Ok(match self.entries.get_mut(&key) {
            Some(mut slot) => {
                *slot = entity.clone();
                Access::Found(entity)
            }
            None => Access::NotFound,
        })
    }

    async fn delete(&self, ctx: &AuthContext, key: &E::Key) -> AppResult<Access<E>> {
        if !Self::permits(ctx, key, AccessMode::Write) {
            return Ok(Access::Forbidden);
        }
        Ok(self
            .remove_unchecked(key)
            .map_or(Access::NotFound, Access::Found))
    }
}

#[async_trait]
impl BaselineRepository for MemoryTable<BaselineStats> {
    async fn upsert(
        &self,
        ctx: &AuthContext,
        baseline: BaselineStats,
    ) -> AppResult<Access<BaselineStats>> {
        if !Self::permits(ctx, &baseline.key, AccessMode::Write) {
            return Ok(Access::Forbidden);
        }
        self.entries.insert(baseline.key.clone(), baseline.clone());
        Ok(Access::Found(baseline))
    }
}

#[async_trait]
impl DeltaRepository for MemoryTable<DeltaRecord> {
    async fn list_for_activity(
        &self,
        ctx: &AuthContext,
        user_id: Uuid,
        activity_id: Uuid,
    ) -> AppResult<Access<Vec<DeltaRecord>>> {
        if !ctx.can_access(user_id, AccessMode::Read) {
            return Ok(Access::Forbidden);
        }
        let mut deltas =
            self.select(|delta| delta.user_id == user_id && delta.activity_id == activity_id);
        deltas.sort_by_key(|delta| delta.category_id);
        Ok(Access::Found(deltas))
    }
}

#[async_trait]
impl InsightRepository for MemoryTable<ActivityInsight> {
    async fn list_for_user(
        &self,
        ctx: &AuthContext,
        user_id: Uuid,
    ) -> AppResult<Access<Vec<ActivityInsight>>> {
        if !ctx.can_access(user_id, AccessMode::Read) {
            return Ok(Access::Forbidden);
        }
        let mut insights = self.select(|insight| insight.user_id == user_id);
        insights.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Access::Found(insights))
    }
}

/// Rule table that drops the matching baseline when a rule is deleted
pub struct InMemoryRuleRepository {
    rules: MemoryTable<CategoryRule>,
    baselines: Arc<MemoryTable<BaselineStats>>,
}

#[async_trait]
impl ScopedRepository<CategoryRule> for InMemoryRuleRepository {
    async fn get(
        &self,
        ctx: &AuthContext,
        key: &CategoryKey,
    ) -> AppResult<Access<CategoryRule>> {
        self.rules.get(ctx, key).await
    }

    async fn create(
        &self,
        ctx: &AuthContext,
        rule: CategoryRule,
    ) -> AppResult<Access<CategoryRule>> {
        self.rules.create(ctx, rule).await
    }

    async fn update(
        &self,
        ctx: &AuthContext,
        rule: CategoryRule,
    ) -> AppResult<Access<CategoryRule>> {
        self.rules.update(ctx, rule).await
    }

    async fn delete(
        &self,
        ctx: &AuthContext,
        key: &CategoryKey,
    ) -> AppResult<Access<CategoryRule>> {
        let removed = self.rules.delete(ctx, key).await?;
        if removed.is_found() && self.baselines.remove_unchecked(key).is_some() {
            debug!(?key, "removed baseline with deleted rule");
        }
        Ok(removed)
    }
}

#[async_trait]
impl RuleRepository for InMemoryRuleRepository {
    async fn get_rules(
        &self,
        ctx: &AuthContext,
        user_id: Uuid,
        kind: &ActivityKind,
    ) -> AppResult<Access<Vec<CategoryRule>>> {
        if !ctx.can_access(user_id, AccessMode::Read) {
            return Ok(Access::Forbidden);
        }
        let mut rules = self
            .rules
            .select(|rule| rule.user_id == user_id && &rule.kind == kind);
        rules.sort_by_key(|rule| rule.category_id);
        Ok(Access::Found(rules))
    }
}

/// Concrete in-memory stores, kept typed so tests can inspect them
pub struct InMemoryRepositories {
    /// Category rules
    pub rules: Arc<InMemoryRuleRepository>,
    /// Running baselines
    pub baselines: Arc<MemoryTable<BaselineStats>>,
    /// Delta records
    pub deltas: Arc<MemoryTable<DeltaRecord>>,
    /// Insights
    pub insights: Arc<MemoryTable<ActivityInsight>>,
}

impl Default for InMemoryRepositories {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepositories {
    /// Empty stores
    #[must_use]
    pub fn new() -> Self {
        let baselines = Arc::new(MemoryTable::new());
        Self {
            rules: Arc::new(InMemoryRuleRepository {
                rules: MemoryTable::new(),
                baselines: Arc::clone(&baselines),
            }),
            baselines,
            deltas: Arc::new(MemoryTable::new()),
            insights: Arc::new(MemoryTable::new()),
        }
    }

    /// Trait-object view shared with the pipeline
    #[must_use]
    pub fn repositories(&self) -> Repositories {
        Repositories {
            rules: self.rules.clone(),
            baselines: self.baselines.clone(),
            deltas: self.deltas.clone(),
            insights: self.insights.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pierre_core::models::CategoryId;
    use pierre_core::permissions::Scopes;

    use super::*;
    use crate::errors::ErrorCode;

    fn rule(user: Uuid, category: u32, distance: f64) -> CategoryRule {
        CategoryRule::new(user, ActivityKind::Run, CategoryId(category))
            .with_reference("distance", distance)
    }

    #[tokio::test]
    async fn test_owner_round_trip() {
        let repos = InMemoryRepositories::new();
        let user = Uuid::new_v4();
        let ctx = AuthContext::for_user(user);
        let created = repos.rules.create(&ctx, rule(user, 1, 5_000.0)).await.unwrap();
        assert!(created.is_found());

        let fetched = repos.rules.get(&ctx, &rule(user, 1, 0.0).key()).await.unwrap();
        assert_eq!(fetched.found().unwrap().category_id, CategoryId(1));
    }

    #[tokio::test]
    async fn test_foreign_key_is_forbidden_even_when_missing() {
        let repos = InMemoryRepositories::new();
        let owner = Uuid::new_v4();
        let intruder = AuthContext::for_user(Uuid::new_v4());
        let key = rule(owner, 1, 1.0).key();

        assert_eq!(repos.rules.get(&intruder, &key).await.unwrap(), Access::Forbidden);

        repos
            .rules
            .create(&AuthContext::for_user(owner), rule(owner, 1, 1.0))
            .await
            .unwrap();
        assert_eq!(repos.rules.get(&intruder, &key).await.unwrap(), Access::Forbidden);
        assert_eq!(
            repos.rules.delete(&intruder, &key).await.unwrap(),
            Access::Forbidden
        );
    }

    #[tokio::test]
    async fn test_duplicate_create_fails() {
        let repos = InMemoryRepositories::new();
        let user = Uuid::new_v4();
        let ctx = AuthContext::for_user(user);
        repos.rules.create(&ctx, rule(user, 2, 8_000.0)).await.unwrap();

        let err = repos
            .rules
            .create(&ctx, rule(user, 2, 9_000.0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repos = InMemoryRepositories::new();
        let user = Uuid::new_v4();
        let result = repos
            .rules
            .update(&AuthContext::for_user(user), rule(user, 3, 1.0))
            .await
            .unwrap();
        assert_eq!(result, Access::NotFound);
    }

    #[tokio::test]
    async fn test_invalid_rule_rejected() {
        let repos = InMemoryRepositories::new();
        let user = Uuid::new_v4();
        let err = repos
            .rules
            .create(&AuthContext::for_user(user), rule(user, 1, -5.0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(repos.rules.rules.is_empty());
    }

    #[tokio::test]
    async fn test_read_only_context_cannot_write() {
        let repos = InMemoryRepositories::new();
        let user = Uuid::new_v4();
        let ctx = AuthContext::new(user, Scopes::READ);
        assert_eq!(
            repos.rules.create(&ctx, rule(user, 1, 1.0)).await.unwrap(),
            Access::Forbidden
        );
    }

    #[tokio::test]
    async fn test_rule_delete_cascades_to_baseline() {
        let repos = InMemoryRepositories::new();
        let user = Uuid::new_v4();
        let ctx = AuthContext::for_user(user);
        let rule = rule(user, 4, 10_000.0);
        let key = rule.key();
        repos.rules.create(&ctx, rule).await.unwrap();
        repos
            .baselines
            .upsert(&ctx, BaselineStats::empty(key.clone()))
            .await
            .unwrap();

        assert!(repos.rules.delete(&ctx, &key).await.unwrap().is_found());
        assert_eq!(
            repos.baselines.get_baseline(&ctx, &key).await.unwrap(),
            Access::NotFound
        );
    }

    #[tokio::test]
    async fn test_get_rules_filters_and_orders() {
        let repos = InMemoryRepositories::new();
        let user = Uuid::new_v4();
        let ctx = AuthContext::service();
        for category in [5, 1, 3] {
            repos
                .rules
                .create(&ctx, rule(user, category, 1_000.0 * f64::from(category)))
                .await
                .unwrap();
        }
        repos
            .rules
            .create(
                &ctx,
                CategoryRule::new(user, ActivityKind::Ride, CategoryId(1))
                    .with_reference("distance", 30_000.0),
            )
            .await
            .unwrap();

        let rules = repos
            .rules
            .get_rules(&ctx, user, &ActivityKind::Run)
            .await
            .unwrap()
            .found()
            .unwrap();
        let ids: Vec<u32> = rules.iter().map(|r| r.category_id.get()).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }
}
