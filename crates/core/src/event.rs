//! Timeline records: chat messages and milestone events.

use serde::{Deserialize, Serialize};

use crate::metrics::MetricSnapshot;
use crate::respond::Reply;
use crate::sentiment::Sentiment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum EventKind {
    #[default]
    Message,
    Event,
}

impl From<String> for EventKind {
    fn from(raw: String) -> Self {
        if raw.eq_ignore_ascii_case("event") {
            EventKind::Event
        } else {
            EventKind::Message
        }
    }
}

/// How a message came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionType {
    #[serde(rename = "proactive check-in")]
    ProactiveCheckIn,
    #[serde(rename = "member-initiated query")]
    MemberQuery,
    #[serde(rename = "intervention_update")]
    InterventionUpdate,
    #[serde(rename = "diagnostic")]
    Diagnostic,
    #[serde(rename = "logistics")]
    Logistics,
    #[serde(rename = "general")]
    General,
}

/// One entry of the journey.
///
/// Deserialization never rejects an item for one bad field: wrong-typed
/// or null values read as absent, so caller-supplied history in any of
/// the historical shapes can still be searched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    #[serde(rename = "type", deserialize_with = "lenient::or_default")]
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::text")]
    pub event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::text")]
    pub sender: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::text")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::text")]
    pub details: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub decision_rationale: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub pillar: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub related_to: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub health_metrics_snapshot: Option<MetricSnapshot>,
    #[serde(deserialize_with = "lenient::text")]
    pub intervention_effect: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub monetary_factor: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub time_efficiency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub service_interaction_type: Option<InteractionType>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::text")]
    pub specialist_involved: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub next_steps: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::or_default")]
    pub sentiment: Option<Sentiment>,
}

mod lenient {
    use serde::de::{DeserializeOwned, Deserializer};
    use serde::Deserialize;
    use serde_json::Value;

    /// Anything that does not read as `T` becomes `T::default()`.
    pub(super) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    /// Strings as-is, numbers and booleans rendered, everything else absent.
    pub(super) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }
}

impl Event {
    /// Turn a generated reply into a chat message.
    pub fn message(timestamp: String, reply: Reply) -> Self {
        Event {
            kind: EventKind::Message,
            sender: Some(reply.sender.name().to_string()),
            timestamp,
            content: Some(reply.text),
            decision_rationale: reply.rationale,
            pillar: reply.pillar,
            related_to: Some(reply.related_to),
            health_metrics_snapshot: Some(reply.metrics),
            intervention_effect: reply.effect,
            monetary_factor: reply.monetary,
            time_efficiency: reply.time_efficiency,
            service_interaction_type: Some(reply.interaction),
            specialist_involved: Some(reply.specialist.name().to_string()),
            next_steps: reply.next_steps,
            sentiment: Some(reply.sentiment),
            ..Event::default()
        }
    }

    /// A timeline milestone carrying a copy of the current metrics.
    pub fn milestone(
        event_id: String,
        timestamp: String,
        description: impl Into<String>,
        details: impl Into<String>,
        metrics: &MetricSnapshot,
    ) -> Self {
        Event {
            kind: EventKind::Event,
            event_id: Some(event_id),
            timestamp,
            description: Some(description.into()),
            details: Some(details.into()),
            health_metrics_snapshot: Some(metrics.clone()),
            ..Event::default()
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.decision_rationale = Some(rationale.into());
        self
    }

    pub fn with_pillar(mut self, pillar: impl Into<String>) -> Self {
        self.pillar = Some(pillar.into());
        self
    }

    pub fn with_related(mut self, related: impl Into<String>) -> Self {
        self.related_to = Some(related.into());
        self
    }

    pub fn is_message(&self) -> bool {
        self.kind == EventKind::Message
    }

    /// Lower-cased concatenation of the searchable text fields.
    pub fn search_blob(&self) -> String {
        [
            &self.content,
            &self.description,
            &self.details,
            &self.decision_rationale,
        ]
        .iter()
        .filter_map(|f| f.as_deref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }

    /// True when at least one text field carries something to search.
    pub fn has_text(&self) -> bool {
        [
            &self.content,
            &self.description,
            &self.details,
            &self.decision_rationale,
        ]
        .iter()
        .any(|f| f.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_history_item() {
        let raw = r#"{
            "type": "message",
            "sender": "Dr. Warren",
            "timestamp": "2025-08-10 09:00",
            "content": "ApoB is trending down.",
            "decisionRationale": "Quarterly checkpoint.",
            "sentiment": "content",
            "unknownField": 12
        }"#;
        let ev: Event = serde_json::from_str(raw).unwrap();
        assert!(ev.is_message());
        assert_eq!(ev.sentiment, Some(Sentiment::Neutral));
        assert_eq!(ev.decision_rationale.as_deref(), Some("Quarterly checkpoint."));
        assert!(ev.search_blob().contains("apob is trending"));
    }

    #[test]
    fn mistyped_fields_read_as_absent() {
        let raw = r#"{
            "type": null,
            "sender": ["Dr. Warren"],
            "timestamp": "2025-09-01 10:00",
            "content": "ApoB is holding at 104.",
            "decisionRationale": 12,
            "healthMetricsSnapshot": {"HRV": "N/A"},
            "serviceInteractionType": "phone call",
            "sentiment": 3
        }"#;
        let ev: Event = serde_json::from_str(raw).unwrap();
        assert!(ev.is_message());
        assert_eq!(ev.sender, None);
        assert_eq!(ev.decision_rationale.as_deref(), Some("12"));
        assert_eq!(ev.health_metrics_snapshot, None);
        assert_eq!(ev.service_interaction_type, None);
        assert_eq!(ev.sentiment, None);
        assert!(ev.search_blob().contains("apob is holding"));
    }

    #[test]
    fn generated_events_read_back_unchanged() {
        let ev = Event::milestone(
            "evt_w04_travel".into(),
            "2025-08-31 07:00".into(),
            "Business trip to Seoul",
            "Client summit.",
            &MetricSnapshot::baseline(),
        )
        .with_rationale("Protect sleep on arrival.");
        let json = serde_json::to_string(&ev).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ev);
    }

    #[test]
    fn milestone_serializes_wire_names() {
        let ev = Event::milestone(
            "evt_w10_illness".into(),
            "2025-10-13 08:00".into(),
            "Acute illness",
            "Fever and orthostatic symptoms.",
            &MetricSnapshot::baseline(),
        )
        .with_pillar("Medical");
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "event");
        assert_eq!(json["eventId"], "evt_w10_illness");
        assert_eq!(json["healthMetricsSnapshot"]["ApoB"], 105);
        assert!(json.get("content").is_none());
        assert!(json["decisionRationale"].is_null());
    }

    #[test]
    fn empty_item_has_no_text() {
        let ev = Event::default();
        assert!(!ev.has_text());
        assert_eq!(ev.search_blob(), "");
    }
}
