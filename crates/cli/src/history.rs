//! Lenient parsing of caller-supplied journey data.

use careline_core::Event;
use log::debug;
use serde_json::Value;

/// Accepts a flat event list or a `{timeline_events, chat_messages}`
/// object. Items that are not objects are skipped, while mistyped fields
/// inside an object only blank that field. The result is in timestamp
/// order.
pub(crate) fn parse_history(value: &Value) -> Vec<Event> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => ["timeline_events", "chat_messages", "events"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_array))
            .flatten()
            .collect(),
        _ => Vec::new(),
    };

    let mut events: Vec<Event> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Event>(item.clone()) {
            Ok(event) => Some(event),
            Err(e) => {
                debug!("skipping unreadable journey item: {}", e);
                None
            }
        })
        .collect();
    events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_list() {
        let events = parse_history(&json!([
            {"type": "message", "timestamp": "2025-08-02 10:00", "content": "b"},
            {"type": "message", "timestamp": "2025-08-01 10:00", "content": "a"},
            "not an event"
        ]));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].content.as_deref(), Some("a"));
    }

    #[test]
    fn split_object_is_merged() {
        let events = parse_history(&json!({
            "timeline_events": [{"type": "event", "timestamp": "2025-08-03 09:00", "description": "Trip"}],
            "chat_messages": [{"type": "message", "timestamp": "2025-08-01 09:00", "content": "Hi"}]
        }));
        assert_eq!(events.len(), 2);
        assert!(events[0].is_message());
        assert!(!events[1].is_message());
    }

    #[test]
    fn mistyped_item_still_matches_explain() {
        use careline_core::ExplanationSource;
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        let events = parse_history(&json!([
            {
                "type": null,
                "sender": "Dr. Warren",
                "timestamp": "2025-09-01 10:00",
                "content": "ApoB is still 104, so we add a second cardio block.",
                "decisionRationale": "Plateau after 12 weeks.",
                "healthMetricsSnapshot": {"HRV": "N/A", "ApoB": 104},
                "sentiment": "neutral"
            },
            {"type": "message", "timestamp": "2025-08-20 10:00", "content": "Packing for Seoul.", "pillar": 7}
        ]));
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].health_metrics_snapshot, None);
        assert_eq!(events[0].pillar.as_deref(), Some("7"));

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let out = careline_core::explain("Why did my ApoB plan change?", &events, &mut rng).unwrap();
        assert_eq!(out.source, ExplanationSource::Matched);
        assert_eq!(out.rationale.as_deref(), Some("Plateau after 12 weeks."));
    }

    #[test]
    fn anything_else_is_empty() {
        assert!(parse_history(&json!("journey")).is_empty());
        assert!(parse_history(&Value::Null).is_empty());
    }
}
