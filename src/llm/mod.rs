// ABOUTME: Chat completion contract used to turn delta records into insight text
// ABOUTME: Message, request and response types plus the async provider trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chat Completion Providers
//!
//! Insight rendering only needs one round trip: a prompt made of system
//! instructions, few-shot pairs and the delta payload goes in, plain text comes
//! out. [`LlmProvider`] is that round trip. The `OpenAI`-compatible client is
//! the production implementation; tests plug in scripted providers.
//!
//! ```rust,no_run
//! use pierre_activity_insights::llm::{ChatMessage, ChatRequest, LlmProvider};
//!
//! async fn summarize(provider: &dyn LlmProvider) {
//!     let request = ChatRequest::new(vec![
//!         ChatMessage::system("You summarize training sessions."),
//!         ChatMessage::user(r#"{"distance": {"delta": 1200.0, "pct": 8.6}}"#),
//!     ])
//!     .with_temperature(0.4);
//!
//!     if let Ok(response) = provider.complete(&request).await {
//!         println!("{}", response.text().unwrap_or("(empty)"));
//!     }
//! }
//! ```

mod openai_compatible;

pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions framing the whole exchange
    System,
    /// Prompt side of a turn
    User,
    /// Completion side of a turn
    Assistant,
}

impl MessageRole {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message of a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author
    pub role: MessageRole,
    /// Text
    pub content: String,
}

impl ChatMessage {
    /// System instructions
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Prompt text
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Example completion in a few-shot pair
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling knobs; unset values fall back to the provider's defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sampling {
    /// Randomness, 0.0 to 2.0
    pub temperature: Option<f32>,
    /// Cap on generated tokens
    pub max_tokens: Option<u32>,
}

/// A complete prompt ready to send
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Prompt messages in order
    pub messages: Vec<ChatMessage>,
    /// Model override; the provider default applies when absent
    pub model: Option<String>,
    /// Sampling settings
    #[serde(default)]
    pub sampling: Sampling,
}

impl ChatRequest {
    /// Request with default model and sampling
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            sampling: Sampling::default(),
        }
    }

    /// Use `model` instead of the provider default
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.sampling.temperature = Some(temperature);
        self
    }

    /// Cap the completion length
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.sampling.max_tokens = Some(max_tokens);
        self
    }
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Sum of both
    pub total_tokens: u32,
}

/// A finished completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Raw completion text
    pub content: String,
    /// Model that produced it
    pub model: String,
    /// Token accounting, when reported
    pub usage: Option<TokenUsage>,
    /// Why generation stopped (`stop`, `length`, ...)
    pub finish_reason: Option<String>,
}

impl ChatResponse {
    /// Trimmed completion text, or `None` when the model said nothing
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        let text = self.content.trim();
        (!text.is_empty()).then_some(text)
    }

    /// Whether generation hit the token cap
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.finish_reason.as_deref() == Some("length")
    }
}

/// A chat completion backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short name used in logs and error messages
    fn name(&self) -> &str;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str;

    /// Run one completion
    ///
    /// # Errors
    ///
    /// Returns an external-service error when the backend is unreachable,
    /// rejects the request or answers with something unparseable.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(content: &str, finish_reason: Option<&str>) -> ChatResponse {
        ChatResponse {
            content: content.to_owned(),
            model: "m".to_owned(),
            usage: None,
            finish_reason: finish_reason.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn test_text_trims_and_rejects_blank() {
        assert_eq!(response("  Run: easy.\n", None).text(), Some("Run: easy."));
        assert_eq!(response(" \n\t", None).text(), None);
    }

    #[test]
    fn test_truncation_flag() {
        assert!(response("Run", Some("length")).is_truncated());
        assert!(!response("Run", Some("stop")).is_truncated());
    }

    #[test]
    fn test_request_builder_sets_sampling() {
        let request = ChatRequest::new(vec![ChatMessage::user("hi")])
            .with_model("small")
            .with_temperature(0.2)
            .with_max_tokens(64);
        assert_eq!(request.model.as_deref(), Some("small"));
        assert_eq!(
            request.sampling,
            Sampling {
                temperature: Some(0.2),
                max_tokens: Some(64),
            }
        );
    }
}
