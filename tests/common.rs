// ABOUTME: Shared helpers for activity insights integration tests
// ABOUTME: Logging setup, activity builders, seeded stores and a scripted LLM provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(
    dead_code,
    missing_docs,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

use std::collections::VecDeque;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use pierre_activity_insights::errors::AppError;
use pierre_activity_insights::llm::{ChatRequest, ChatResponse, LlmProvider};
use pierre_activity_insights::models::{
    ActivityBuilder, ActivityKind, ActivityObservation, CategoryId, CategoryRule,
};
use pierre_activity_insights::permissions::AuthContext;
use pierre_activity_insights::repositories::{InMemoryRepositories, ScopedRepository};
use tracing::Level;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests
///
/// Set `TEST_LOG=DEBUG` (or TRACE, INFO) to see pipeline logs.
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_test_writer()
            .init();
    });
}

/// Run of the given distance in metres
pub fn run(user_id: Uuid, distance: f64) -> ActivityObservation {
    ActivityBuilder::new(user_id, ActivityKind::Run)
        .name(format!("{:.1} km run", distance / 1_000.0))
        .distance(distance)
        .build()
}

/// Run with distance and heart rate
pub fn run_with_hr(user_id: Uuid, distance: f64, heart_rate: f64) -> ActivityObservation {
    ActivityBuilder::new(user_id, ActivityKind::Run)
        .distance(distance)
        .heart_rate(heart_rate)
        .build()
}

/// Stores holding two distance-only run rules: recovery at 5 km, easy at 15 km
pub async fn two_rule_stores(user_id: Uuid) -> InMemoryRepositories {
    let stores = InMemoryRepositories::new();
    let ctx = AuthContext::for_user(user_id);
    for (category, distance) in [(1, 5_000.0), (2, 15_000.0)] {
        stores
            .rules
            .create(
                &ctx,
                CategoryRule::new(user_id, ActivityKind::Run, CategoryId(category))
                    .with_reference("distance", distance),
            )
            .await
            .unwrap()
            .into_result("Category rule")
            .unwrap();
    }
    stores
}

/// One scripted provider reply
#[derive(Debug, Clone)]
pub enum Step {
    Reply(String),
    Empty,
    Fail,
}

/// Provider that plays back a fixed script, then keeps replying with a default
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails `failures` times before answering with `text`
    pub fn failing_then(failures: usize, text: &str) -> Arc<Self> {
        let mut script = vec![Step::Fail; failures];
        script.push(Step::Reply(text.to_owned()));
        Arc::new(Self::new(script))
    }

    /// Never succeeds
    pub fn always_failing() -> Arc<Self> {
        Arc::new(Self::new(vec![Step::Fail; 64]))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let step = self.script.lock().unwrap().pop_front();
        let content = match step {
            Some(Step::Fail) => {
                return Err(AppError::external_service(
                    "scripted",
                    format!("failure on attempt {attempt}"),
                ))
            }
            Some(Step::Empty) => String::new(),
            Some(Step::Reply(text)) => text,
            None => "Activity: steady effort, close to your usual numbers.".to_owned(),
        };

        Ok(ChatResponse {
            content,
            model: "scripted-model".to_owned(),
            usage: None,
            finish_reason: Some("stop".to_owned()),
        })
    }
}
