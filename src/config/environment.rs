// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses insight provider, rule source, and notification settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration
//!
//! All settings come from environment variables; there is no config file for
//! the service itself. Numeric values that fail to parse are configuration
//! errors rather than silent fallbacks.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use pierre_core::constants::{insights, notifications};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::rules::DefaultRuleConfig;
use crate::errors::{AppError, AppResult};
use crate::notifications::NotificationHub;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback to development
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Settings for the insight text generation provider
#[derive(Clone)]
pub struct InsightConfig {
    /// Bearer token; insights are disabled when absent
    pub api_key: Option<String>,
    /// Chat completions base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Attempts before giving up on one insight
    pub max_attempts: u32,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Base delay for exponential backoff between attempts
    pub backoff_base: Duration,
}

impl fmt::Debug for InsightConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_attempts", &self.max_attempts)
            .field("request_timeout", &self.request_timeout)
            .field("backoff_base", &self.backoff_base)
            .finish()
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: insights::DEFAULT_BASE_URL.to_owned(),
            model: insights::DEFAULT_MODEL.to_owned(),
            max_attempts: insights::MAX_ATTEMPTS,
            request_timeout: Duration::from_secs(insights::REQUEST_TIMEOUT_SECS),
            backoff_base: Duration::from_millis(insights::BACKOFF_BASE_MS),
        }
    }
}

impl InsightConfig {
    /// Whether an insight provider can be constructed
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Service configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Insight provider settings
    pub insights: InsightConfig,
    /// Optional JSON file overriding the built-in rule tables
    pub rules_config_path: Option<PathBuf>,
    /// Buffered messages per notification connection
    pub notification_channel_capacity: usize,
    /// Crate version
    pub service_version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            insights: InsightConfig::default(),
            rules_config_path: None,
            notification_channel_capacity: notifications::DEFAULT_CHANNEL_CAPACITY,
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a numeric variable does not parse or
    /// falls outside its allowed range.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let max_attempts: u32 = parse_env_or("INSIGHT_MAX_ATTEMPTS", insights::MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(AppError::config(
                "INSIGHT_MAX_ATTEMPTS must be at least 1",
            ));
        }
        let timeout_secs: u64 =
            parse_env_or("INSIGHT_TIMEOUT_SECS", insights::REQUEST_TIMEOUT_SECS)?;
        let capacity: usize = parse_env_or(
            "NOTIFICATION_CHANNEL_CAPACITY",
            notifications::DEFAULT_CHANNEL_CAPACITY,
        )?;
        if capacity == 0 {
            return Err(AppError::config(
                "NOTIFICATION_CHANNEL_CAPACITY must be at least 1",
            ));
        }

        let config = Self {
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            insights: InsightConfig {
                api_key: non_empty_env("OPENAI_API_KEY"),
                base_url: env_var_or("OPENAI_BASE_URL", insights::DEFAULT_BASE_URL),
                model: env_var_or("INSIGHT_MODEL", insights::DEFAULT_MODEL),
                max_attempts,
                request_timeout: Duration::from_secs(timeout_secs),
                backoff_base: Duration::from_millis(insights::BACKOFF_BASE_MS),
            },
            rules_config_path: non_empty_env("RULES_CONFIG_PATH").map(PathBuf::from),
            notification_channel_capacity: capacity,
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
        };

        if !config.insights.is_enabled() {
            warn!("OPENAI_API_KEY not set, activity insights are disabled");
        }
        config.log_summary();
        Ok(config)
    }

    /// Rule tables from `RULES_CONFIG_PATH`, or the built-in defaults
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configured file cannot be loaded.
    pub async fn load_rule_config(&self) -> AppResult<DefaultRuleConfig> {
        match &self.rules_config_path {
            Some(path) => DefaultRuleConfig::load(path).await,
            None => Ok(DefaultRuleConfig::default()),
        }
    }

    /// Notification hub sized by `notification_channel_capacity`
    #[must_use]
    pub fn notification_hub(&self) -> NotificationHub {
        NotificationHub::new(self.notification_channel_capacity)
    }

    fn log_summary(&self) {
        info!(
            environment = %self.environment,
            insights.enabled = self.insights.is_enabled(),
            insights.model = %self.insights.model,
            insights.max_attempts = self.insights.max_attempts,
            rules.path = ?self.rules_config_path,
            notifications.capacity = self.notification_channel_capacity,
            "Configuration loaded"
        );
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env_or<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid value for {key} ('{raw}'): {e}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::errors::ErrorCode;

    const VARS: [&str; 8] = [
        "ENVIRONMENT",
        "OPENAI_API_KEY",
        "OPENAI_BASE_URL",
        "INSIGHT_MODEL",
        "INSIGHT_MAX_ATTEMPTS",
        "INSIGHT_TIMEOUT_SECS",
        "RULES_CONFIG_PATH",
        "NOTIFICATION_CHANNEL_CAPACITY",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_environment() {
        clear_env();
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.insights.is_enabled());
        assert_eq!(config.insights.model, insights::DEFAULT_MODEL);
        assert_eq!(config.insights.max_attempts, 3);
        assert_eq!(config.insights.request_timeout, Duration::from_secs(30));
        assert_eq!(
            config.notification_channel_capacity,
            notifications::DEFAULT_CHANNEL_CAPACITY
        );
        assert!(config.rules_config_path.is_none());
    }

    #[test]
    #[serial]
    fn test_overrides_from_environment() {
        clear_env();
        env::set_var("ENVIRONMENT", "prod");
        env::set_var("OPENAI_API_KEY", "sk-test");
        env::set_var("INSIGHT_MODEL", "gpt-4o-mini");
        env::set_var("INSIGHT_MAX_ATTEMPTS", "5");
        env::set_var("RULES_CONFIG_PATH", "/etc/pierre/rules.json");

        let config = ServerConfig::from_env().unwrap();
        clear_env();

        assert!(config.environment.is_production());
        assert!(config.insights.is_enabled());
        assert_eq!(config.insights.model, "gpt-4o-mini");
        assert_eq!(config.insights.max_attempts, 5);
        assert_eq!(
            config.rules_config_path,
            Some(PathBuf::from("/etc/pierre/rules.json"))
        );
    }

    #[test]
    #[serial]
    fn test_invalid_numbers_are_config_errors() {
        clear_env();
        env::set_var("INSIGHT_TIMEOUT_SECS", "soon");
        let err = ServerConfig::from_env().unwrap_err();
        clear_env();
        assert_eq!(err.code, ErrorCode::ConfigError);

        env::set_var("INSIGHT_MAX_ATTEMPTS", "0");
        let err = ServerConfig::from_env().unwrap_err();
        clear_env();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = InsightConfig {
            api_key: Some("sk-secret".to_owned()),
            ..InsightConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("REDACTED"));
    }
}
