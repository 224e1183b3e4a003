// ABOUTME: Configuration loading tests for environment settings and rule tables
// ABOUTME: Environment mutations run serially; rule files come from temp directories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(clippy::float_cmp, clippy::missing_panics_doc)]

mod common;

use std::env;
use std::fs;
use std::time::Duration;

use common::init_test_logging;
use pierre_activity_insights::config::{DefaultRuleConfig, Environment, ServerConfig};
use pierre_activity_insights::errors::ErrorCode;
use pierre_activity_insights::models::{ActivityKind, CategoryId, MetricTarget};
use pierre_activity_insights::notifications::ActivityNotification;
use serial_test::serial;
use tempfile::TempDir;
use uuid::Uuid;

const MANAGED_VARS: [&str; 8] = [
    "ENVIRONMENT",
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "INSIGHT_MODEL",
    "INSIGHT_MAX_ATTEMPTS",
    "INSIGHT_TIMEOUT_SECS",
    "NOTIFICATION_CHANNEL_CAPACITY",
    "RULES_CONFIG_PATH",
];

fn clear_env() {
    for key in MANAGED_VARS {
        env::remove_var(key);
    }
}

const OVERRIDE_RULES: &str = r#"{
    "groups": {
        "run": {
            "distance": { "easy": 8000.0, "long": 21000.0 },
            "hr": { "easy": 135.0 }
        }
    }
}"#;

#[test]
#[serial]
fn test_defaults_without_environment() {
    init_test_logging();
    clear_env();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.environment, Environment::Development);
    assert!(!config.insights.is_enabled());
    assert_eq!(config.insights.max_attempts, 3);
    assert!(config.rules_config_path.is_none());
    assert!(config.notification_channel_capacity > 0);
}

#[test]
#[serial]
fn test_environment_overrides() {
    init_test_logging();
    clear_env();
    env::set_var("ENVIRONMENT", "production");
    env::set_var("OPENAI_API_KEY", "sk-local");
    env::set_var("OPENAI_BASE_URL", "http://localhost:11434/v1");
    env::set_var("INSIGHT_MODEL", "llama3.1");
    env::set_var("INSIGHT_MAX_ATTEMPTS", "5");
    env::set_var("INSIGHT_TIMEOUT_SECS", "12");
    env::set_var("NOTIFICATION_CHANNEL_CAPACITY", "8");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert!(config.environment.is_production());
    assert!(config.insights.is_enabled());
    assert_eq!(config.insights.base_url, "http://localhost:11434/v1");
    assert_eq!(config.insights.model, "llama3.1");
    assert_eq!(config.insights.max_attempts, 5);
    assert_eq!(config.insights.request_timeout, Duration::from_secs(12));
    assert_eq!(config.notification_channel_capacity, 8);
    assert!(!format!("{:?}", config.insights).contains("sk-local"));
}

#[test]
#[serial]
fn test_channel_capacity_sizes_notification_hub() {
    init_test_logging();
    clear_env();
    env::set_var("NOTIFICATION_CHANNEL_CAPACITY", "1");

    let config = ServerConfig::from_env().unwrap();
    clear_env();
    let hub = config.notification_hub();
    let user = Uuid::new_v4();
    let _rx = hub.connect(user);

    let message = ActivityNotification::ActivityUnclassified {
        activity_id: Uuid::new_v4(),
        reason: "no rules".to_owned(),
    };
    assert!(hub.send_message(user, message.clone()));
    assert!(!hub.send_message(user, message));
}

#[test]
#[serial]
fn test_blank_api_key_disables_insights() {
    init_test_logging();
    clear_env();
    env::set_var("OPENAI_API_KEY", "   ");

    let config = ServerConfig::from_env().unwrap();
    clear_env();
    assert!(!config.insights.is_enabled());
}

#[test]
#[serial]
fn test_invalid_numbers_are_rejected() {
    init_test_logging();
    for (key, value) in [
        ("INSIGHT_MAX_ATTEMPTS", "many"),
        ("INSIGHT_MAX_ATTEMPTS", "0"),
        ("NOTIFICATION_CHANNEL_CAPACITY", "0"),
        ("INSIGHT_TIMEOUT_SECS", "-4"),
    ] {
        clear_env();
        env::set_var(key, value);
        let err = ServerConfig::from_env().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError, "{key}={value}");
    }
    clear_env();
}

#[tokio::test]
#[serial]
async fn test_rule_file_from_environment() {
    init_test_logging();
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    fs::write(&path, OVERRIDE_RULES).unwrap();
    env::set_var("RULES_CONFIG_PATH", &path);

    let config = ServerConfig::from_env().unwrap();
    clear_env();
    let rules = config.load_rule_config().await.unwrap();

    let run_rules = rules.rules_for_kind(Uuid::new_v4(), &ActivityKind::Run);
    let categories: Vec<CategoryId> = run_rules.iter().map(|r| r.category_id).collect();
    assert_eq!(categories, vec![CategoryId(2), CategoryId(8)]);
    assert_eq!(
        run_rules[0].targets.get("hr"),
        Some(&MetricTarget::Reference(135.0))
    );
    assert!(rules
        .rules_for_kind(Uuid::new_v4(), &ActivityKind::Ride)
        .is_empty());
}

#[tokio::test]
async fn test_missing_rule_file_is_config_error() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let err = DefaultRuleConfig::load(&dir.path().join("absent.json"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
}

#[test]
fn test_rule_file_validation() {
    let unknown_slug = r#"{ "groups": { "run": { "distance": { "sprint": 400.0 } } } }"#;
    let negative = r#"{ "groups": { "run": { "distance": { "easy": -1.0 } } } }"#;

    for json in [unknown_slug, negative, "not json"] {
        let err = DefaultRuleConfig::from_json_str(json).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError, "{json}");
    }
}
