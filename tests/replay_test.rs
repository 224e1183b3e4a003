// ABOUTME: Replay tests running activity JSON files through seeding and the pipeline
// ABOUTME: Files are written to temp directories and loaded the way the CLI loads them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc, clippy::too_many_lines)]

mod common;

use std::fs;
use std::sync::Arc;

use common::{init_test_logging, ScriptedProvider};
use pierre_activity_insights::config::DefaultRuleConfig;
use pierre_activity_insights::errors::ErrorCode;
use pierre_activity_insights::insights::{LlmInsightRenderer, RetryPolicy};
use pierre_activity_insights::models::ActivityKind;
use pierre_activity_insights::notifications::{ActivityNotification, NotificationHub};
use pierre_activity_insights::permissions::AuthContext;
use pierre_activity_insights::pipeline::ProcessingOutcome;
use pierre_activity_insights::replay::{load_activities, Replayer};
use pierre_activity_insights::repositories::{InMemoryRepositories, RuleRepository};
use serde_json::{json, Value};
use tempfile::TempDir;
use uuid::Uuid;

fn activity(id: Uuid, user_id: Uuid, kind: &str, distance: f64) -> Value {
    json!({
        "id": id,
        "user_id": user_id,
        "kind": kind,
        "name": format!("{kind} session"),
        "distance": distance,
        "hr": 142.0,
        "duration": 3_600.0
    })
}

#[tokio::test]
async fn test_replay_file_seeds_and_processes_in_order() {
    init_test_logging();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let repeated = Uuid::new_v4();
    let document = json!([
        activity(repeated, alice, "Run", 10_000.0),
        activity(Uuid::new_v4(), bob, "Run", 6_000.0),
        activity(repeated, alice, "Run", 10_000.0),
        activity(Uuid::new_v4(), alice, "Transition", 300.0),
    ]);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("activities.json");
    fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();

    let activities = load_activities(&path).await.unwrap();
    assert_eq!(activities.len(), 4);
    assert_eq!(activities[3].kind(), &ActivityKind::Transition);

    let stores = InMemoryRepositories::new();
    let replayer = Replayer::new(stores.repositories(), Arc::new(DefaultRuleConfig::default()));
    let report = replayer.run(&activities).await.unwrap();

    assert_eq!(report.seeded.created, 20);
    assert_eq!(report.seeded.skipped, 0);
    assert_eq!(report.outcomes.len(), 4);
    assert!(matches!(
        report.outcomes[0],
        ProcessingOutcome::Processed { insight: None, .. }
    ));
    assert!(matches!(
        report.outcomes[1],
        ProcessingOutcome::Processed { .. }
    ));
    assert_eq!(
        report.outcomes[2],
        ProcessingOutcome::AlreadyProcessed {
            activity_id: repeated,
            category_id: report.outcomes[0].category_id().unwrap(),
        }
    );
    assert!(matches!(
        report.outcomes[3],
        ProcessingOutcome::Unclassified { .. }
    ));

    let bob_rules = stores
        .rules
        .get_rules(&AuthContext::for_user(bob), bob, &ActivityKind::Run)
        .await
        .unwrap()
        .found()
        .unwrap();
    assert_eq!(bob_rules.len(), 10);

    let serialized = serde_json::to_value(&report).unwrap();
    assert_eq!(serialized["outcomes"][2]["status"], "already_processed");
    assert_eq!(serialized["outcomes"][3]["status"], "unclassified");
}

#[tokio::test]
async fn test_replay_renders_insights_when_configured() {
    init_test_logging();
    let user = Uuid::new_v4();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("one.json");
    fs::write(
        &path,
        activity(Uuid::new_v4(), user, "Ride", 40_000.0).to_string(),
    )
    .unwrap();

    let provider = ScriptedProvider::failing_then(0, "Ride: a solid endurance outing.");
    let replayer = Replayer::new(
        InMemoryRepositories::new().repositories(),
        Arc::new(DefaultRuleConfig::default()),
    )
    .with_renderer(Arc::new(LlmInsightRenderer::new(
        provider.clone(),
        RetryPolicy::default(),
    )));

    let report = replayer
        .run(&load_activities(&path).await.unwrap())
        .await
        .unwrap();

    let ProcessingOutcome::Processed { insight, .. } = &report.outcomes[0] else {
        panic!("expected processed outcome, got {:?}", report.outcomes[0]);
    };
    assert_eq!(
        insight.as_ref().map(|i| i.insight_text.as_str()),
        Some("Ride: a solid endurance outing.")
    );
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_replay_collects_notifications_within_capacity() {
    init_test_logging();
    let user = Uuid::new_v4();
    let document = json!([
        activity(Uuid::new_v4(), user, "Run", 10_000.0),
        activity(Uuid::new_v4(), user, "Run", 12_000.0),
        activity(Uuid::new_v4(), user, "Transition", 300.0),
    ]);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("week.json");
    fs::write(&path, document.to_string()).unwrap();
    let activities = load_activities(&path).await.unwrap();

    let roomy = Replayer::new(
        InMemoryRepositories::new().repositories(),
        Arc::new(DefaultRuleConfig::default()),
    )
    .with_notifications(NotificationHub::new(8));
    let report = roomy.run(&activities).await.unwrap();
    let received = &report.notifications[&user];
    assert_eq!(received.len(), 3);
    assert!(received[..2]
        .iter()
        .all(|n| matches!(n, ActivityNotification::ActivityClassified { .. })));
    assert!(matches!(
        received[2],
        ActivityNotification::ActivityUnclassified { .. }
    ));

    let hub = NotificationHub::new(2);
    let tight = Replayer::new(
        InMemoryRepositories::new().repositories(),
        Arc::new(DefaultRuleConfig::default()),
    )
    .with_notifications(hub.clone());
    let report = tight.run(&activities).await.unwrap();
    assert_eq!(report.notifications[&user].len(), 2);
    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(hub.connection_count(), 0);
}

#[tokio::test]
async fn test_unreadable_file_is_invalid_input() {
    init_test_logging();
    let dir = TempDir::new().unwrap();

    let missing = load_activities(&dir.path().join("nope.json"))
        .await
        .unwrap_err();
    assert_eq!(missing.code, ErrorCode::InvalidInput);

    let path = dir.path().join("broken.json");
    fs::write(&path, "[{\"id\": 1}]").unwrap();
    let broken = load_activities(&path).await.unwrap_err();
    assert_eq!(broken.code, ErrorCode::InvalidInput);
}
