// ABOUTME: Capability-scoped repository contracts for rules, baselines, deltas, and insights
// ABOUTME: Every operation takes an AuthContext and reports Found, NotFound, or Forbidden
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Repositories
//!
//! Ownership checks live in one place: the repository. Callers pass an
//! [`AuthContext`] and get back an [`Access`] value instead of an error for
//! the expected "missing" and "not yours" outcomes. Boundary code turns an
//! [`Access`] into an [`AppError`] with [`Access::into_result`].
//!
//! Storage failures are still reported through [`AppResult`].

mod memory;

pub use memory::{InMemoryRepositories, InMemoryRuleRepository, MemoryTable};

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use pierre_core::models::{
    ActivityInsight, ActivityKind, BaselineStats, CategoryKey, CategoryRule, DeltaKey, DeltaRecord,
};
use pierre_core::permissions::AuthContext;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Outcome of a scoped lookup or mutation
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Access<T> {
    /// Entity exists and the caller may touch it
    Found(T),
    /// No entity under the key
    NotFound,
    /// Entity belongs to someone else, or the caller lacks the scope
    Forbidden,
}

impl<T> Access<T> {
    /// Translate into an application error for `resource`
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` for [`Access::NotFound`], `PermissionDenied` for
    /// [`Access::Forbidden`].
    pub fn into_result(self, resource: &str) -> AppResult<T> {
        match self {
            Self::Found(value) => Ok(value),
            Self::NotFound => Err(AppError::not_found(resource)),
            Self::Forbidden => Err(AppError::permission_denied(format!(
                "Access to {resource} denied"
            ))),
        }
    }

    /// `Some` when found, `None` when missing
    ///
    /// # Errors
    ///
    /// `PermissionDenied` for [`Access::Forbidden`].
    pub fn into_optional(self, resource: &str) -> AppResult<Option<T>> {
        match self {
            Self::NotFound => Ok(None),
            other => other.into_result(resource).map(Some),
        }
    }

    /// The entity, treating `Forbidden` like `NotFound`
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound | Self::Forbidden => None,
        }
    }

    /// Whether an entity came back
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Map the found value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Access<U> {
        match self {
            Self::Found(value) => Access::Found(f(value)),
            Self::NotFound => Access::NotFound,
            Self::Forbidden => Access::Forbidden,
        }
    }
}

/// A stored entity with a natural key that names its owner
pub trait Entity: Clone + Send + Sync + 'static {
    /// Natural key
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// Name used in error messages
    const RESOURCE: &'static str;

    /// Key of this entity
    fn key(&self) -> Self::Key;

    /// Owner encoded in a key
    fn owner_of(key: &Self::Key) -> Uuid;

    /// Reject malformed entities before they are persisted
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the entity is malformed.
    fn validate(&self) -> AppResult<()> {
        Ok(())
    }
}

impl Entity for CategoryRule {
    type Key = CategoryKey;
    const RESOURCE: &'static str = "Category rule";

    fn key(&self) -> CategoryKey {
        Self::key(self)
    }

    fn owner_of(key: &CategoryKey) -> Uuid {
        key.user_id
    }

    fn validate(&self) -> AppResult<()> {
        Self::validate(self).map_err(AppError::from)
    }
}

impl Entity for BaselineStats {
    type Key = CategoryKey;
    const RESOURCE: &'static str = "Baseline";

    fn key(&self) -> CategoryKey {
        self.key.clone()
    }

    fn owner_of(key: &CategoryKey) -> Uuid {
        key.user_id
    }
}

impl Entity for DeltaRecord {
    type Key = DeltaKey;
    const RESOURCE: &'static str = "Delta record";

    fn key(&self) -> DeltaKey {
        Self::key(self)
    }

    fn owner_of(key: &DeltaKey) -> Uuid {
        key.user_id
    }
}

/// Natural key of an insight: one per (user, activity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InsightKey {
    /// Owning user
    pub user_id: Uuid,
    /// Described activity
    pub activity_id: Uuid,
}

impl Entity for ActivityInsight {
    type Key = InsightKey;
    const RESOURCE: &'static str = "Activity insight";

    fn key(&self) -> InsightKey {
        InsightKey {
            user_id: self.user_id,
            activity_id: self.activity_id,
        }
    }

    fn owner_of(key: &InsightKey) -> Uuid {
        key.user_id
    }
}

/// CRUD over one entity type, scoped by an authorization context
///
/// A caller may touch an entity iff it owns it or holds the admin scope;
/// reads need `READ`, writes need `WRITE`. Ownership is decided from the key,
/// so a foreign key is `Forbidden` whether or not the entity exists.
#[async_trait]
pub trait ScopedRepository<E: Entity>: Send + Sync {
    /// Fetch by key
    async fn get(&self, ctx: &AuthContext, key: &E::Key) -> AppResult<Access<E>>;

    /// Insert a new entity, returning it as stored
    ///
    /// # Errors
    ///
    /// `ResourceAlreadyExists` when the key is taken, `InvalidInput` when
    /// validation fails.
    async fn create(&self, ctx: &AuthContext, entity: E) -> AppResult<Access<E>>;

    /// Replace an existing entity; `NotFound` when the key is free
    async fn update(&self, ctx: &AuthContext, entity: E) -> AppResult<Access<E>>;

    /// Remove by key, returning the removed entity
    async fn delete(&self, ctx: &AuthContext, key: &E::Key) -> AppResult<Access<E>>;
}

/// Category rules
#[async_trait]
pub trait RuleRepository: ScopedRepository<CategoryRule> {
    /// All rules of `user_id` for `kind`, ordered by category id
    async fn get_rules(
        &self,
        ctx: &AuthContext,
        user_id: Uuid,
        kind: &ActivityKind,
    ) -> AppResult<Access<Vec<CategoryRule>>>;
}

/// Per-category running baselines
#[async_trait]
pub trait BaselineRepository: ScopedRepository<BaselineStats> {
    /// Baseline for a (user, kind, category) key
    async fn get_baseline(
        &self,
        ctx: &AuthContext,
        key: &CategoryKey,
    ) -> AppResult<Access<BaselineStats>> {
        self.get(ctx, key).await
    }

    /// Create the baseline or overwrite the stored one
    async fn upsert(
        &self,
        ctx: &AuthContext,
        baseline: BaselineStats,
    ) -> AppResult<Access<BaselineStats>>;
}

/// Delta records
#[async_trait]
pub trait DeltaRepository: ScopedRepository<DeltaRecord> {
    /// Every delta recorded for one activity
    async fn list_for_activity(
        &self,
        ctx: &AuthContext,
        user_id: Uuid,
        activity_id: Uuid,
    ) -> AppResult<Access<Vec<DeltaRecord>>>;
}

/// Rendered insights
#[async_trait]
pub trait InsightRepository: ScopedRepository<ActivityInsight> {
    /// Insights of one user, newest first
    async fn list_for_user(
        &self,
        ctx: &AuthContext,
        user_id: Uuid,
    ) -> AppResult<Access<Vec<ActivityInsight>>>;
}

/// The four stores the pipeline works against
#[derive(Clone)]
pub struct Repositories {
    /// Category rules
    pub rules: Arc<dyn RuleRepository>,
    /// Running baselines
    pub baselines: Arc<dyn BaselineRepository>,
    /// Delta records
    pub deltas: Arc<dyn DeltaRepository>,
    /// Insights
    pub insights: Arc<dyn InsightRepository>,
}

impl Repositories {
    /// Fresh in-memory stores
    #[must_use]
    pub fn in_memory() -> Self {
        InMemoryRepositories::new().repositories()
    }
}
