//! End-to-end checks over a full generated journey.

use careline_core::{
    explain, generate, DriftPolicy, Event, ExhaustionStrategy, ExplanationSource, JourneyConfig,
    JourneyError, Sentiment,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn seeded(seed: u64) -> JourneyConfig {
    JourneyConfig {
        seed: Some(seed),
        ..JourneyConfig::default()
    }
}

fn milestone_ids(events: &[Event]) -> Vec<&str> {
    events.iter().filter_map(|e| e.event_id.as_deref()).collect()
}

#[test]
fn timestamps_are_non_decreasing() {
    for seed in [1, 7, 42, 1234] {
        let journey = generate(&seeded(seed)).unwrap();
        for pair in journey.events.windows(2) {
            assert!(
                pair[0].timestamp <= pair[1].timestamp,
                "seed {}: {} after {}",
                seed,
                pair[0].timestamp,
                pair[1].timestamp
            );
        }
    }
}

#[test]
fn onboarding_opens_every_journey() {
    for seed in [3, 99] {
        let journey = generate(&seeded(seed)).unwrap();
        let first = &journey.events[0];
        let second = &journey.events[1];
        assert_eq!(first.sender.as_deref(), Some("Ruby"));
        assert!(first.content.as_deref().unwrap().contains("Welcome aboard"));
        assert_eq!(second.sender.as_deref(), Some("Rohan"));
        assert!(second.content.as_deref().unwrap().contains("high ApoB"));
        assert_eq!(first.timestamp, "2025-08-01 09:00");
    }
}

#[test]
fn fixed_milestones_fire_exactly_once() {
    let journey = generate(&seeded(21)).unwrap();
    let ids = milestone_ids(&journey.events);
    for id in [
        "evt_w00_baseline",
        "evt_w05_back_pain",
        "evt_w10_illness",
        "evt_w15_new_goal",
        "evt_w12_results",
        "evt_w24_results",
    ] {
        assert_eq!(ids.iter().filter(|&&i| i == id).count(), 1, "{}", id);
    }
    let illness = journey
        .events
        .iter()
        .find(|e| e.event_id.as_deref() == Some("evt_w10_illness"))
        .unwrap();
    assert_eq!(illness.timestamp, "2025-10-13 08:00");
    assert_eq!(illness.related_to.as_deref(), Some("illness"));
}

#[test]
fn travel_weeks_emit_trip_milestones() {
    let journey = generate(&seeded(8)).unwrap();
    let trips = milestone_ids(&journey.events)
        .into_iter()
        .filter(|id| id.ends_with("_travel"))
        .count();
    assert_eq!(trips, 8);
}

#[test]
fn seeded_runs_are_reproducible() {
    let a = generate(&seeded(77)).unwrap();
    let b = generate(&seeded(77)).unwrap();
    assert_eq!(a, b);
    let c = generate(&seeded(78)).unwrap();
    assert_ne!(a.events, c.events);
}

#[test]
fn every_snapshot_is_in_range() {
    for drift in [DriftPolicy::SkipAfterScripted, DriftPolicy::Always] {
        let config = JourneyConfig {
            drift,
            exhaustion: ExhaustionStrategy::Stamp,
            ..seeded(5)
        };
        let journey = generate(&config).unwrap();
        for event in &journey.events {
            let snapshot = event.health_metrics_snapshot.as_ref().unwrap();
            assert!(snapshot.in_range(), "{:?}", snapshot);
        }
    }
}

#[test]
fn messages_carry_wire_fields() {
    let journey = generate(&seeded(12)).unwrap();
    let json = serde_json::to_value(&journey.events).unwrap();
    let team_reply = json
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["sender"] == "Dr. Warren" && e["relatedTo"] == "illness")
        .unwrap();
    assert_eq!(team_reply["type"], "message");
    assert_eq!(team_reply["healthMetricsSnapshot"]["RecoveryScore"], 22);
    assert_eq!(team_reply["healthMetricsSnapshot"]["POTS_symptoms"], "severe");
    assert!(team_reply["decisionRationale"].is_string());
    assert!(team_reply["serviceInteractionType"].is_string());
}

#[test]
fn explain_echoes_stored_rationale() {
    let journey = generate(&seeded(31)).unwrap();
    let expected = journey
        .events
        .iter()
        .rev()
        .filter(|e| e.has_text())
        .find(|e| e.search_blob().contains("apob"))
        .and_then(|e| e.decision_rationale.clone());

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let out = explain("apob", &journey.events, &mut rng).unwrap();
    assert_eq!(out.source, ExplanationSource::Matched);
    assert_eq!(out.rationale, expected);
}

#[test]
fn explain_rejects_empty_query() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(explain("", &[], &mut rng), Err(JourneyError::EmptyQuery));
}

#[test]
fn explain_on_unknown_topic_falls_back_to_neel() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let out = explain("I'm furious about the parking", &[], &mut rng).unwrap();
    assert_eq!(out.source, ExplanationSource::Synthesized);
    assert_eq!(out.detected_sentiment, Sentiment::Angry);
    assert_eq!(out.specialist.as_deref(), Some("Neel"));
    assert!(out
        .explanation
        .starts_with("I understand your frustration"));
}

#[test]
fn quarterly_wrap_closes_every_journey() {
    // 32 and 8 end on a travel week; 30 and 7 do not.
    for weeks in [32, 30, 8, 7] {
        for seed in [1, 2, 42] {
            let config = JourneyConfig {
                weeks,
                ..seeded(seed)
            };
            let journey = generate(&config).unwrap();
            let last = journey.events.last().unwrap();
            assert_eq!(
                last.related_to.as_deref(),
                Some("quarterly_review"),
                "weeks {} seed {}: closed with {:?} at {}",
                weeks,
                seed,
                last.related_to,
                last.timestamp
            );
            assert_eq!(last.sender.as_deref(), Some("Neel"));
            let wraps = journey
                .events
                .iter()
                .filter(|e| e.related_to.as_deref() == Some("quarterly_review"))
                .count();
            assert_eq!(wraps, 1);
        }
    }
}
