// ABOUTME: Stored natural-language insight generated for a classified activity
// ABOUTME: Records the rendered text and the model that produced it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-text commentary on one activity's delta record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityInsight {
    /// Activity the insight describes
    pub activity_id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Rendered commentary
    pub insight_text: String,
    /// Model that produced the text
    pub model_used: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl ActivityInsight {
    /// Create an insight stamped with the current time
    pub fn new(
        activity_id: Uuid,
        user_id: Uuid,
        insight_text: impl Into<String>,
        model_used: impl Into<String>,
    ) -> Self {
        Self {
            activity_id,
            user_id,
            insight_text: insight_text.into(),
            model_used: model_used.into(),
            created_at: Utc::now(),
        }
    }
}
