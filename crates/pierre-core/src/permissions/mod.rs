// ABOUTME: Authorization context and scope bitflags for capability-scoped repositories
// ABOUTME: Decides whether a caller may read or write an entity owned by a given user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Permissions
//!
//! Every repository operation receives an [`AuthContext`]. The context names
//! the acting user and the scopes granted to it; ownership is checked against
//! the `user_id` stored on each entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

bitflags::bitflags! {
    /// Capability scopes carried by an authorization context
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Scopes: u8 {
        /// May read owned entities
        const READ = 0b0000_0001;
        /// May create, update and delete owned entities
        const WRITE = 0b0000_0010;
        /// May act on entities owned by any user
        const ADMIN = 0b0000_0100;
    }
}

impl Scopes {
    /// Scopes granted to an ordinary signed-in user
    #[must_use]
    pub const fn user() -> Self {
        Self::READ.union(Self::WRITE)
    }

    /// Scopes granted to internal services (seeding, replay)
    #[must_use]
    pub const fn service() -> Self {
        Self::READ.union(Self::WRITE).union(Self::ADMIN)
    }
}

/// Kind of access an operation needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Read-only access
    Read,
    /// Mutating access
    Write,
}

impl AccessMode {
    const fn required_scope(self) -> Scopes {
        match self {
            Self::Read => Scopes::READ,
            Self::Write => Scopes::WRITE,
        }
    }
}

/// Identity and capabilities of the caller of a repository operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Acting user
    pub user_id: Uuid,
    /// Granted scopes
    pub scopes: Scopes,
}

impl AuthContext {
    /// Create a context with explicit scopes
    #[must_use]
    pub const fn new(user_id: Uuid, scopes: Scopes) -> Self {
        Self { user_id, scopes }
    }

    /// Context for a user acting on their own data
    #[must_use]
    pub const fn for_user(user_id: Uuid) -> Self {
        Self::new(user_id, Scopes::user())
    }

    /// Context for internal services acting on behalf of any user
    #[must_use]
    pub const fn service() -> Self {
        Self::new(Uuid::nil(), Scopes::service())
    }

    /// Whether the context holds the admin scope
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.scopes.contains(Scopes::ADMIN)
    }

    /// Whether the caller may access an entity owned by `owner` in `mode`
    #[must_use]
    pub fn can_access(&self, owner: Uuid, mode: AccessMode) -> bool {
        self.scopes.contains(mode.required_scope()) && (self.is_admin() || self.user_id == owner)
    }
}
