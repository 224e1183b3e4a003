// ABOUTME: Prompt construction for activity insight rendering
// ABOUTME: System instructions, worked example exchanges, and the delta payload message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_core::models::{DeltaRecord, TrackedMetric};
use serde_json::{json, Map, Value};

use super::InsightContext;
use crate::llm::ChatMessage;

/// System instructions, parameterized by activity and category labels
#[must_use]
pub fn system_prompt(kind_label: &str, category_name: &str, category_slug: &str) -> String {
    format!(
        "You are an analytics assistant for endurance athletes.\n\
         \n\
         You receive the percentage differences between one activity and the athlete's \
         running average for the same sport and intensity category. Metrics may include \
         distance, duration, heart rate, pace and elevation gain. A null value means the \
         metric could not be compared.\n\
         \n\
         Current activity type: \"{kind_label}\"\n\
         Intensity category: \"{category_name}\" (slug \"{category_slug}\")\n\
         \n\
         Read the numbers through both the sport and the category:\n\
         - Foot sports (run, walk, hike): pace and heart rate carry the signal.\n\
         - Cycling of any kind: climbing and heart rate matter more than raw distance.\n\
         - Swimming: time and effort trends outweigh GPS distance.\n\
         - Gym work (strength, HIIT, crossfit): heart rate and duration dominate, distance is noise.\n\
         - Snow and board sports: elevation, moving time and heart rate.\n\
         - Yoga and recovery sessions should stay cardiovascularly quiet.\n\
         \n\
         Category expectations: recovery is very light, easy and steady are aerobic, \
         tempo through VO2 max is sustained hard effort, long is extended duration, race \
         is near maximal and mixed varies.\n\
         \n\
         Point out gains and regressions, relate effort to efficiency, flag fatigue or \
         freshness, and explain terrain effects when elevation moves sharply. Quote the \
         percentage behind every claim, rounded to one decimal place.\n\
         \n\
         Output rules:\n\
         - Plain text, never JSON.\n\
         - The first line is exactly: \"Activity: {kind_label} | Category: {category_name} ({category_slug})\"\n\
         - Then a summary of one or two sentences.\n\
         - Then three to five bullet points starting with \"- \".\n\
         - Finish with one line starting \"Recommendation: \"."
    )
}

/// Worked examples as alternating user and assistant messages
#[must_use]
pub fn few_shot_examples() -> Vec<ChatMessage> {
    let examples = [
        (
            json!({
                "activity_type": "Run",
                "category": "easy",
                "distance_pct": 11.8,
                "hr_pct": -4.9,
                "avg_pace_pct": -3.5,
                "duration_pct": 9.6,
                "elevation_gain_pct": 4.0
            }),
            "Activity: Run | Category: Easy (easy)\n\n\
             A longer, quicker run at a lower heart rate than usual points to better aerobic efficiency.\n\n\
             - Distance rose 11.8%, adding aerobic volume.\n\
             - Pace improved 3.5% while heart rate fell 4.9%.\n\
             - Duration grew 9.6% for a bigger endurance stimulus.\n\
             - 4.0% more climbing did not push effort up.\n\n\
             Recommendation: Hold this easy volume and lengthen one run a week by a few minutes.",
        ),
        (
            json!({
                "activity_type": "Ride",
                "category": "tempo",
                "distance_pct": -17.2,
                "hr_pct": 6.1,
                "duration_pct": -14.3,
                "elevation_gain_pct": 28.0
            }),
            "Activity: Ride | Category: Tempo (tempo)\n\n\
             A shorter but much hillier tempo ride drove heart rate up and raised the relative load.\n\n\
             - Distance dropped 17.2% while climbing rose 28.0%.\n\
             - Heart rate climbed 6.1%, reflecting the harder terrain.\n\
             - Duration fell 14.3%, trimming time at tempo.\n\
             - Efficiency slipped slightly against your usual tempo rides.\n\n\
             Recommendation: Keep the next ride easy, then aim for a longer flat tempo block later in the week.",
        ),
        (
            json!({
                "activity_type": "Workout",
                "category": "threshold",
                "distance_pct": null,
                "hr_pct": -1.6,
                "avg_pace_pct": null,
                "duration_pct": -6.2,
                "elevation_gain_pct": null
            }),
            "Activity: Workout | Category: Threshold (threshold)\n\n\
             Slightly shorter with a marginally lower heart rate, this session carried a little less load than your typical threshold work.\n\n\
             - Duration fell 6.2%, cutting time at intensity.\n\
             - Heart rate dipped 1.6%, either better efficiency or a softer effort.\n\
             - Distance and pace do not apply to this session type.\n\n\
             Recommendation: If this was a key workout, add a few minutes at intensity next time.",
        ),
        (
            json!({
                "activity_type": "Hike",
                "category": "long",
                "distance_pct": 9.7,
                "duration_pct": 17.5,
                "elevation_gain_pct": 21.2,
                "hr_pct": 2.3
            }),
            "Activity: Hike | Category: Long (long)\n\n\
             A bigger day on the trail with much more climbing, handled at only a slightly higher heart rate.\n\n\
             - Distance grew 9.7% and time on feet 17.5%.\n\
             - Elevation gain rose 21.2%, the main driver of the extra load.\n\
             - Heart rate increased just 2.3% despite the terrain.\n\n\
             Recommendation: Take an easy day next and keep long hikes at this climbing volume for a couple of weeks.",
        ),
        (
            json!({
                "activity_type": "Yoga",
                "category": "recovery",
                "hr_pct": -3.0,
                "duration_pct": 12.0
            }),
            "Activity: Yoga | Category: Recovery (recovery)\n\n\
             A longer, calmer session that fits its recovery purpose.\n\n\
             - Duration increased 12.0%, more time spent on mobility.\n\
             - Heart rate fell 3.0%, confirming low cardiovascular stress.\n\
             - No sign of hidden intensity creeping in.\n\n\
             Recommendation: Keep sessions like this after your hardest training days.",
        ),
    ];

    examples
        .into_iter()
        .flat_map(|(input, output)| {
            [
                ChatMessage::user(input.to_string()),
                ChatMessage::assistant(output),
            ]
        })
        .collect()
}

/// JSON payload describing one delta record
///
/// Percentages are passed unrounded; null metrics stay null so the model can
/// say a comparison was not possible.
#[must_use]
pub fn delta_payload(context: &InsightContext) -> Value {
    let mut payload = Map::new();
    payload.insert(
        "activity_type".into(),
        Value::from(context.kind_label.as_str()),
    );
    payload.insert(
        "category".into(),
        Value::from(context.category_slug.as_str()),
    );
    if let Some(name) = &context.activity_name {
        payload.insert("activity_name".into(), Value::from(name.as_str()));
    }
    insert_metrics(&mut payload, &context.delta);
    Value::Object(payload)
}

fn insert_metrics(payload: &mut Map<String, Value>, delta: &DeltaRecord) {
    for metric in TrackedMetric::ALL {
        let values = delta.metric(metric);
        payload.insert(format!("{}_pct", metric.key()), json!(values.pct));
        payload.insert(format!("{}_delta", metric.key()), json!(values.delta));
    }
}

/// Full message list for one render
#[must_use]
pub fn build_messages(context: &InsightContext) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt(
        &context.kind_label,
        &context.category_name,
        &context.category_slug,
    ))];
    messages.extend(few_shot_examples());
    messages.push(ChatMessage::user(delta_payload(context).to_string()));
    messages
}

#[cfg(test)]
mod tests {
    use pierre_core::models::{ActivityKind, CategoryId, MetricDelta};
    use uuid::Uuid;

    use super::*;
    use crate::llm::MessageRole;

    fn context() -> InsightContext {
        let mut delta = DeltaRecord::undefined(
            Uuid::new_v4(),
            Uuid::new_v4(),
            ActivityKind::Run,
            CategoryId(2),
        );
        delta.distance = MetricDelta {
            delta: Some(1_200.0),
            pct: Some(12.345),
        };
        InsightContext {
            delta,
            kind_label: "Run".into(),
            category_slug: "easy".into(),
            category_name: "Easy".into(),
            activity_name: Some("Morning loop".into()),
        }
    }

    #[test]
    fn test_system_prompt_pins_header_line() {
        let prompt = system_prompt("Run", "Easy", "easy");
        assert!(prompt.contains("\"Activity: Run | Category: Easy (easy)\""));
        assert!(prompt.contains("one decimal place"));
    }

    #[test]
    fn test_examples_alternate_roles() {
        let examples = few_shot_examples();
        assert_eq!(examples.len(), 10);
        for pair in examples.chunks(2) {
            assert_eq!(pair[0].role, MessageRole::User);
            assert_eq!(pair[1].role, MessageRole::Assistant);
            assert!(pair[1].content.starts_with("Activity: "));
        }
    }

    #[test]
    fn test_payload_carries_nulls_and_labels() {
        let payload = delta_payload(&context());
        assert_eq!(payload["activity_type"], "Run");
        assert_eq!(payload["category"], "easy");
        assert_eq!(payload["distance_pct"], json!(12.345));
        assert!(payload["hr_pct"].is_null());
        assert_eq!(payload["activity_name"], "Morning loop");
    }

    #[test]
    fn test_message_order() {
        let messages = build_messages(&context());
        assert_eq!(messages.len(), 12);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[11].role, MessageRole::User);
    }
}
