// ABOUTME: Seeds a user's category rules from the default reference tables
// ABOUTME: Idempotent: rules that already exist for a (user, kind, category) are left alone
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use pierre_core::models::{ActivityKind, CategoryRule};
use pierre_core::permissions::AuthContext;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::DefaultRuleConfig;
use crate::errors::{AppResult, ErrorCode};
use crate::repositories::RuleRepository;

/// Counts from one seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    /// Rules written
    pub created: usize,
    /// Rules left untouched because one already existed
    pub skipped: usize,
}

impl SeedReport {
    fn merge(&mut self, other: Self) {
        self.created += other.created;
        self.skipped += other.skipped;
    }
}

/// Writes default rules into a rule repository
pub struct RuleSeeder {
    config: Arc<DefaultRuleConfig>,
    rules: Arc<dyn RuleRepository>,
}

impl RuleSeeder {
    /// Seeder drawing from `config` and writing to `rules`
    #[must_use]
    pub fn new(config: Arc<DefaultRuleConfig>, rules: Arc<dyn RuleRepository>) -> Self {
        Self { config, rules }
    }

    /// Seed every requested kind for `user_id`; an empty list means every
    /// standard kind
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` when `ctx` may not write the user's rules,
    /// or any storage error from the repository.
    #[instrument(skip(self, ctx, kinds), fields(kinds = kinds.len()))]
    pub async fn seed_user(
        &self,
        ctx: &AuthContext,
        user_id: Uuid,
        kinds: &[ActivityKind],
    ) -> AppResult<SeedReport> {
        let kinds = if kinds.is_empty() {
            ActivityKind::STANDARD.to_vec()
        } else {
            kinds.to_vec()
        };

        let mut report = SeedReport::default();
        for kind in &kinds {
            if self.config.group(kind.group()).is_none() {
                debug!(kind = %kind.display_name(), "no default rules for activity group");
                continue;
            }
            report.merge(self.seed_kind(ctx, user_id, kind).await?);
        }

        info!(
            created = report.created,
            skipped = report.skipped,
            "seeded category rules"
        );
        Ok(report)
    }

    async fn seed_kind(
        &self,
        ctx: &AuthContext,
        user_id: Uuid,
        kind: &ActivityKind,
    ) -> AppResult<SeedReport> {
        let mut report = SeedReport::default();
        for rule in self.config.rules_for_kind(user_id, kind) {
            if self.insert_if_absent(ctx, rule).await? {
                report.created += 1;
            } else {
                report.skipped += 1;
            }
        }
        Ok(report)
    }

    async fn insert_if_absent(&self, ctx: &AuthContext, rule: CategoryRule) -> AppResult<bool> {
        const RESOURCE: &str = "Category rule";

        let existing = self.rules.get(ctx, &rule.key()).await?;
        if existing.into_optional(RESOURCE)?.is_some() {
            return Ok(false);
        }

        match self.rules.create(ctx, rule).await {
            Ok(access) => access.into_result(RESOURCE).map(|_| true),
            Err(e) if e.code == ErrorCode::ResourceAlreadyExists => Ok(false),
            Err(e) => Err(e),
        }
    }
}
