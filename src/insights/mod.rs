// ABOUTME: Insight rendering turning delta records into short natural-language commentary
// ABOUTME: LLM-backed renderer with bounded exponential-backoff retry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Activity Insights
//!
//! The pipeline hands a rendered [`InsightContext`] to an [`InsightRenderer`].
//! The production renderer asks an LLM for commentary and retries failed
//! calls with exponential backoff; after the last attempt the last error is
//! returned and the caller decides what to do without an insight.

/// Prompt construction
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pierre_core::constants::insights::{BACKOFF_BASE_MS, MAX_ATTEMPTS};
use pierre_core::models::{ActivityObservation, CategoryCatalog, DeltaRecord};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::config::InsightConfig;
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatRequest, LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};

/// Sampling temperature for insight text
const TEMPERATURE: f32 = 0.4;

/// Upper bound on generated tokens
const MAX_TOKENS: u32 = 400;

/// Everything needed to describe one delta record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightContext {
    /// Delta record to describe
    pub delta: DeltaRecord,
    /// Human-readable activity type
    pub kind_label: String,
    /// Category slug
    pub category_slug: String,
    /// Category display name
    pub category_name: String,
    /// Activity title, when known
    pub activity_name: Option<String>,
}

impl InsightContext {
    /// Build a context, resolving category labels through `catalog`
    #[must_use]
    pub fn new(
        delta: DeltaRecord,
        activity: &ActivityObservation,
        catalog: &CategoryCatalog,
    ) -> Self {
        let (slug, name) = catalog.label(delta.category_id);
        Self {
            kind_label: delta.kind.display_name().to_owned(),
            category_slug: slug.to_owned(),
            category_name: name.to_owned(),
            activity_name: activity.name().map(ToOwned::to_owned),
            delta,
        }
    }
}

/// Produces commentary for a delta record
#[async_trait]
pub trait InsightRenderer: Send + Sync {
    /// Model or engine name recorded alongside the text
    fn model(&self) -> &str;

    /// Render commentary for one delta record
    async fn render(&self, context: &InsightContext) -> AppResult<String>;
}

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, at least one
    pub max_attempts: u32,
    /// Delay unit; attempt `a` waits `base_delay * 2^a` before the next try
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: Duration::from_millis(BACKOFF_BASE_MS),
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt` (1-based), or `None` after the last
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        Some(self.base_delay.saturating_mul(2_u32.saturating_pow(attempt)))
    }
}

impl From<&InsightConfig> for RetryPolicy {
    fn from(config: &InsightConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.backoff_base,
        }
    }
}

/// Renderer backed by a chat completion provider
pub struct LlmInsightRenderer {
    provider: Arc<dyn LlmProvider>,
    model: String,
    retry: RetryPolicy,
}

impl LlmInsightRenderer {
    /// Create a renderer using the provider's default model
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, retry: RetryPolicy) -> Self {
        let model = provider.default_model().to_owned();
        Self {
            provider,
            model,
            retry,
        }
    }

    /// Renderer over the `OpenAI`-compatible provider, or `None` when no API
    /// key is configured
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &InsightConfig) -> AppResult<Option<Self>> {
        if !config.is_enabled() {
            return Ok(None);
        }
        let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::from(config))?;
        Ok(Some(
            Self::new(Arc::new(provider), RetryPolicy::from(config)).with_model(&config.model),
        ))
    }

    /// Use a specific model instead of the provider default
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn request(&self, context: &InsightContext) -> ChatRequest {
        ChatRequest::new(prompts::build_messages(context))
            .with_model(self.model.clone())
            .with_temperature(TEMPERATURE)
            .with_max_tokens(MAX_TOKENS)
    }
}

#[async_trait]
impl InsightRenderer for LlmInsightRenderer {
    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(
        skip(self, context),
        fields(
            activity_id = %context.delta.activity_id,
            category = %context.category_slug,
            provider = %self.provider.name(),
        )
    )]
    async fn render(&self, context: &InsightContext) -> AppResult<String> {
        let request = self.request(context);
        let mut attempt = 1;

        loop {
            let error = match self.provider.complete(&request).await {
                Ok(response) => {
                    if let Some(text) = response.text() {
                        if response.is_truncated() {
                            warn!(attempt, "insight hit the token cap");
                        }
                        debug!(attempt, chars = text.len(), "rendered insight");
                        return Ok(text.to_owned());
                    }
                    AppError::external_service(self.provider.name(), "empty completion")
                }
                Err(error) => error,
            };

            let Some(delay) = self.retry.delay_after(attempt) else {
                warn!(attempt, error = %error, "insight rendering failed, giving up");
                return Err(error);
            };
            warn!(
                attempt,
                retry_in_ms = delay.as_millis() as u64,
                error = %error,
                "insight rendering failed, retrying"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_schedule() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        };
        assert_eq!(policy.delay_after(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_after(2), Some(Duration::from_secs(4)));
        assert_eq!(policy.delay_after(3), None);
    }

    #[test]
    fn test_single_attempt_never_sleeps() {
        let policy = RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::from_secs(1),
        };
        assert_eq!(policy.delay_after(1), None);
    }

    #[test]
    fn test_renderer_disabled_without_key() {
        let config = InsightConfig::default();
        assert!(matches!(LlmInsightRenderer::from_config(&config), Ok(None)));

        let keyed = InsightConfig {
            api_key: Some("sk-test".to_owned()),
            model: "local-model".to_owned(),
            ..InsightConfig::default()
        };
        let renderer = LlmInsightRenderer::from_config(&keyed).ok().flatten();
        assert_eq!(renderer.as_ref().map(InsightRenderer::model), Some("local-model"));
    }
}
