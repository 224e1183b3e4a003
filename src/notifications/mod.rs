// ABOUTME: Real-time notification hub keyed by user for pipeline events
// ABOUTME: One bounded channel per connected user, pruned when the receiver goes away
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Notification Hub
//!
//! Tracks one live connection per user. Reconnecting replaces the previous
//! channel, which closes the old receiver. Transport (`WebSocket`, SSE) sits
//! outside this module and drains the receiver returned by
//! [`NotificationHub::connect`].

use std::sync::Arc;

use dashmap::DashMap;
use pierre_core::constants::notifications::DEFAULT_CHANNEL_CAPACITY;
use pierre_core::models::CategoryId;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Events pushed to a connected user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityNotification {
    /// Activity assigned to a category and folded into its baseline
    ActivityClassified {
        /// Processed activity
        activity_id: Uuid,
        /// Selected category
        category_id: CategoryId,
        /// Category slug
        category_slug: String,
        /// Activities in the baseline after this one
        baseline_count: u64,
    },
    /// Insight text is available
    InsightReady {
        /// Described activity
        activity_id: Uuid,
        /// Category used for the comparison
        category_id: CategoryId,
        /// Rendered commentary
        insight_text: String,
    },
    /// No rule matched the activity
    ActivityUnclassified {
        /// Skipped activity
        activity_id: Uuid,
        /// Why classification produced nothing
        reason: String,
    },
}

impl ActivityNotification {
    /// Activity the event refers to
    #[must_use]
    pub const fn activity_id(&self) -> Uuid {
        match self {
            Self::ActivityClassified { activity_id, .. }
            | Self::InsightReady { activity_id, .. }
            | Self::ActivityUnclassified { activity_id, .. } => *activity_id,
        }
    }
}

/// Connection registry and message fan-out
#[derive(Clone)]
pub struct NotificationHub {
    connections: Arc<DashMap<Uuid, mpsc::Sender<ActivityNotification>>>,
    capacity: usize,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl NotificationHub {
    /// Hub whose per-user channels buffer `capacity` messages
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Register a connection for `user_id`, replacing any previous one
    pub fn connect(&self, user_id: Uuid) -> mpsc::Receiver<ActivityNotification> {
        let (tx, rx) = mpsc::channel(self.capacity);
        if self.connections.insert(user_id, tx).is_some() {
            debug!(%user_id, "replaced existing notification connection");
        }
        info!(%user_id, "notification connection registered");
        rx
    }

    /// Drop the connection for `user_id`
    pub fn disconnect(&self, user_id: Uuid) -> bool {
        let removed = self.connections.remove(&user_id).is_some();
        if removed {
            info!(%user_id, "notification connection removed");
        }
        removed
    }

    /// Whether `user_id` has a live connection
    #[must_use]
    pub fn get_connection(&self, user_id: Uuid) -> bool {
        self.connections
            .get(&user_id)
            .is_some_and(|sender| !sender.is_closed())
    }

    /// Alias for [`Self::get_connection`]
    #[must_use]
    pub fn is_connected(&self, user_id: Uuid) -> bool {
        self.get_connection(user_id)
    }

    /// Registered connections, including ones not yet pruned
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Deliver to one user; `false` when not connected, closed, or full
    pub fn send_message(&self, user_id: Uuid, message: ActivityNotification) -> bool {
        let result = match self.connections.get(&user_id) {
            Some(sender) => sender.try_send(message),
            None => {
                debug!(%user_id, "no notification connection");
                return false;
            }
        };

        match result {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(%user_id, "notification channel full, dropping message");
                false
            }
            Err(TrySendError::Closed(_)) => {
                self.prune(user_id);
                false
            }
        }
    }

    /// Deliver to every connected user, returning the number reached
    pub fn broadcast(&self, message: &ActivityNotification) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        for entry in self.connections.iter() {
            match entry.value().try_send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(user_id = %entry.key(), "notification channel full during broadcast");
                }
                Err(TrySendError::Closed(_)) => closed.push(*entry.key()),
            }
        }

        for user_id in closed {
            self.prune(user_id);
        }
        delivered
    }

    fn prune(&self, user_id: Uuid) {
        // a reconnect may have raced in; only drop a closed sender
        if self
            .connections
            .remove_if(&user_id, |_, sender| sender.is_closed())
            .is_some()
        {
            debug!(%user_id, "pruned closed notification connection");
        }
    }
}
