// ABOUTME: OpenAI-compatible chat completions client used to render activity insights
// ABOUTME: Bearer-authenticated JSON requests with status codes mapped onto AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! Posts to `{base_url}/chat/completions`. Works with the hosted `OpenAI` API
//! and with any server implementing the same protocol.

use std::time::Duration;

use async_trait::async_trait;
use pierre_core::constants::insights::{
    CONNECT_TIMEOUT_SECS, DEFAULT_BASE_URL, DEFAULT_MODEL, REQUEST_TIMEOUT_SECS,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::config::InsightConfig;
use crate::errors::{AppError, AppResult, ErrorCode};

const SERVICE: &str = "OpenAI";

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for OpenAiMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

/// Configuration for the `OpenAI`-compatible provider
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// Bearer token
    pub api_key: Option<String>,
    /// Default model
    pub default_model: String,
    /// Whole-request timeout
    pub request_timeout: Duration,
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            default_model: DEFAULT_MODEL.to_owned(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl From<&InsightConfig> for OpenAiCompatibleConfig {
    fn from(config: &InsightConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            default_model: config.model.clone(),
            request_timeout: config.request_timeout,
        }
    }
}

/// `OpenAI` chat completions client
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Map a non-success status and body onto an application error
    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(
            |_| body.chars().take(200).collect::<String>(),
            |response| response.error.message,
        );

        match status.as_u16() {
            401 => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("API authentication failed: {message}"),
            ),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("LLM rate limit reached: {message}"),
            ),
            400 => AppError::invalid_input(format!("API validation error: {message}")),
            404 => AppError::not_found(format!("Model or endpoint ({message})")),
            502..=504 => AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!("{SERVICE} unavailable ({status}): {message}"),
            ),
            _ => AppError::external_service(SERVICE, format!("API error ({status}): {message}")),
        }
    }

    fn parse_chat_response(body: &str) -> AppResult<ChatResponse> {
        let response: OpenAiResponse = serde_json::from_str(body).map_err(|e| {
            error!("Failed to parse API response: {e}");
            AppError::external_service(SERVICE, format!("Failed to parse response: {e}"))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service(SERVICE, "API returned no choices"))?;

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            model: response.model,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let payload = OpenAiRequest {
            model,
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.sampling.temperature,
            max_tokens: request.sampling.max_tokens,
        };
        debug!(messages = payload.messages.len(), "sending chat completion");

        let mut http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .json(&payload);
        if let Some(api_key) = &self.config.api_key {
            http_request = http_request.bearer_auth(api_key);
        }

        let response = http_request.send().await.map_err(|e| {
            error!("Failed to send request to {SERVICE}: {e}");
            if e.is_timeout() {
                AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    format!("{SERVICE} request timed out"),
                )
            } else {
                AppError::external_service(SERVICE, format!("Failed to connect: {e}"))
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service(SERVICE, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let chat = Self::parse_chat_response(&body)?;
        debug!(
            chars = chat.content.len(),
            finish_reason = ?chat.finish_reason,
            "received chat completion"
        );
        Ok(chat)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let body = r#"{"error": {"message": "bad key", "type": "invalid_request_error"}}"#;
        assert_eq!(
            OpenAiCompatibleProvider::parse_error_response(StatusCode::UNAUTHORIZED, body).code,
            ErrorCode::ExternalAuthFailed
        );
        assert_eq!(
            OpenAiCompatibleProvider::parse_error_response(StatusCode::TOO_MANY_REQUESTS, body)
                .code,
            ErrorCode::ExternalRateLimited
        );
        assert_eq!(
            OpenAiCompatibleProvider::parse_error_response(StatusCode::BAD_REQUEST, body).code,
            ErrorCode::InvalidInput
        );
        assert_eq!(
            OpenAiCompatibleProvider::parse_error_response(StatusCode::NOT_FOUND, body).code,
            ErrorCode::ResourceNotFound
        );
        assert_eq!(
            OpenAiCompatibleProvider::parse_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "<html>oops</html>"
            )
            .code,
            ErrorCode::ExternalServiceError
        );
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "model": "gpt-4.1-mini",
            "choices": [{"message": {"content": "Activity: Run"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        let chat = OpenAiCompatibleProvider::parse_chat_response(body).unwrap();
        assert_eq!(chat.content, "Activity: Run");
        assert_eq!(chat.model, "gpt-4.1-mini");
        assert_eq!(chat.usage.map(|u| u.total_tokens), Some(15));
    }

    #[test]
    fn test_empty_choices_is_external_error() {
        let body = r#"{"model": "gpt-4.1-mini", "choices": []}"#;
        let err = OpenAiCompatibleProvider::parse_chat_response(body).unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalServiceError);
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig {
            base_url: "http://localhost:8080/v1/".to_owned(),
            ..OpenAiCompatibleConfig::default()
        })
        .unwrap();
        assert_eq!(
            provider.api_url("chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }
}
