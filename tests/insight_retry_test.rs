// ABOUTME: Retry and backoff tests for the LLM insight renderer
// ABOUTME: Uses a paused tokio clock so the exponential delays are observable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc, clippy::redundant_closure_for_method_calls)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{init_test_logging, run, ScriptedProvider, Step};
use pierre_activity_insights::engine::DeltaCalculator;
use pierre_activity_insights::errors::ErrorCode;
use pierre_activity_insights::insights::{
    InsightContext, InsightRenderer, LlmInsightRenderer, RetryPolicy,
};
use pierre_activity_insights::models::{CategoryCatalog, CategoryId};
use tokio::time::Instant;
use uuid::Uuid;

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_secs(1),
    }
}

fn context() -> InsightContext {
    let activity = run(Uuid::new_v4(), 12_000.0);
    let delta = DeltaCalculator::compute_delta(&activity, CategoryId(2), None);
    InsightContext::new(delta, &activity, &CategoryCatalog::default())
}

#[tokio::test(start_paused = true)]
async fn test_first_attempt_success_does_not_sleep() {
    init_test_logging();
    let provider = ScriptedProvider::failing_then(0, "Run: right on your usual distance.");
    let renderer = LlmInsightRenderer::new(provider.clone(), policy());

    let start = Instant::now();
    let text = renderer.render(&context()).await.unwrap();

    assert_eq!(text, "Run: right on your usual distance.");
    assert_eq!(provider.calls(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_success_after_two_failures_waits_two_then_four_seconds() {
    init_test_logging();
    let provider = ScriptedProvider::failing_then(2, "Run: longer than usual, heart rate steady.");
    let renderer = LlmInsightRenderer::new(provider.clone(), policy());

    let start = Instant::now();
    let text = renderer.render(&context()).await.unwrap();

    assert_eq!(text, "Run: longer than usual, heart rate steady.");
    assert_eq!(provider.calls(), 3);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(6), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(7), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_gives_up_after_max_attempts() {
    init_test_logging();
    let provider = ScriptedProvider::always_failing();
    let renderer = LlmInsightRenderer::new(provider.clone(), policy());

    let err = renderer.render(&context()).await.unwrap_err();

    assert_eq!(provider.calls(), 3);
    assert_eq!(err.code, ErrorCode::ExternalServiceError);
    assert!(err.message.contains("attempt 3"), "{}", err.message);
}

#[tokio::test(start_paused = true)]
async fn test_empty_completion_is_retried() {
    init_test_logging();
    let provider = Arc::new(ScriptedProvider::new(vec![
        Step::Empty,
        Step::Reply("  Run: easy pace, as planned.  ".to_owned()),
    ]));
    let renderer = LlmInsightRenderer::new(provider.clone(), policy());

    let start = Instant::now();
    let text = renderer.render(&context()).await.unwrap();

    assert_eq!(text, "Run: easy pace, as planned.");
    assert_eq!(provider.calls(), 2);
    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_single_attempt_policy_fails_fast() {
    init_test_logging();
    let provider = ScriptedProvider::failing_then(1, "never reached");
    let renderer = LlmInsightRenderer::new(
        provider.clone(),
        RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::from_secs(1),
        },
    );

    let start = Instant::now();
    assert!(renderer.render(&context()).await.is_err());
    assert_eq!(provider.calls(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}
