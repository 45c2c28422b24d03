//! Static knowledge base: short, grounded guidance per topic.
//!
//! A knowledge hit overrides the requested speaker; the reply is always
//! attributed to the entry's specialist.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::persona::Persona;
use crate::topic::Topic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeEntry {
    pub key: &'static str,
    pub topic: Topic,
    pub specialist: Persona,
    pub summary: &'static str,
    pub advice: &'static str,
    pub next_steps: &'static str,
}

/// Wire shape served by the knowledge-base endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeCard {
    pub specialist: Persona,
    pub summary: &'static str,
    pub advice: &'static str,
}

pub const KNOWLEDGE_BASE: [KnowledgeEntry; 7] = [
    KnowledgeEntry {
        key: "apob",
        topic: Topic::ApoB,
        specialist: Persona::DrWarren,
        summary: "Elevated ApoB reflects a higher number of atherogenic particles; lowering it typically combines diet quality, fiber, exercise, weight management, and sometimes medication.",
        advice: "short-term, increase viscous fiber, reduce saturated fat, and add 2-3 cardio sessions a week. Re-test in 8-12 weeks. If still elevated, we consider pharmacotherapy after shared decision-making.",
        next_steps: "Re-test in 8-12 weeks.",
    },
    KnowledgeEntry {
        key: "sleep",
        topic: Topic::Sleep,
        specialist: Persona::Advik,
        summary: "Fragmented sleep depresses HRV and recovery. Jet lag, late meals, and late caffeine are common drivers.",
        advice: "stabilize wake time, front-load light and movement, finish the last meal 3+ hours before bed, keep the bedroom cool and dark, and try a 10-15 minute wind-down breathwork block.",
        next_steps: "Adopt wind-down + fixed wake for 10 days; report HRV and subjective energy.",
    },
    KnowledgeEntry {
        key: "jet_lag",
        topic: Topic::Travel,
        specialist: Persona::Ruby,
        summary: "Timed light, movement, hydration, and meal timing shift circadian rhythm efficiently.",
        advice: "pre-shift wake time by 30-45 minutes over 3-4 days, seek morning light at the destination, avoid long naps on day 1, and time caffeine after first light exposure.",
        next_steps: "We'll send a timed light and meal schedule; confirm arrival times with Ruby.",
    },
    KnowledgeEntry {
        key: "diet_adherence",
        topic: Topic::DietAdherence,
        specialist: Persona::Carla,
        summary: "In travel-heavy weeks, adherence hinges on defaults and environment design.",
        advice: "anchor breakfast with protein and fiber, carry shelf-stable options, pre-order room-service basics, and keep a 'no dessert on weekdays' rule unless planned.",
        next_steps: "Carla will push a 3-option travel menu to WhatsApp.",
    },
    KnowledgeEntry {
        key: "back_pain",
        topic: Topic::BackPain,
        specialist: Persona::Rachel,
        summary: "Long-haul sitting plus weak hip extension drives low back tightness.",
        advice: "take micro-breaks every 45-60 minutes, hold a couch stretch 90s per side, add glute bridges and suitcase carries, and modify lifts until pain stays under 3/10 for 72h.",
        next_steps: "Rachel to send a 12-minute mobility + activation routine.",
    },
    KnowledgeEntry {
        key: "cognition_fatigue",
        topic: Topic::CognitionFatigue,
        specialist: Persona::DrWarren,
        summary: "Cognitive dips often mirror sleep deficits, stress load, and glucose variability.",
        advice: "work in 90-minute focus blocks with a 10-minute reset, brighten the workspace in the morning, time caffeine 60-90 minutes after waking, and keep meals small and protein-forward to blunt the post-lunch dip.",
        next_steps: "Trial 90-minute focus blocks + post-lunch walk for 7 days.",
    },
    KnowledgeEntry {
        key: "hypertension",
        topic: Topic::Hypertension,
        specialist: Persona::DrWarren,
        summary: "Blood pressure risk responds to sodium reduction, aerobic volume, and weight control.",
        advice: "eat DASH-style, accumulate 150+ minutes a week of moderate cardio, reduce alcohol, and confirm with a home BP log morning and evening for 7-10 days.",
        next_steps: "Start a home BP log: AM/PM for 7-10 days.",
    },
];

pub fn lookup(topic: Topic) -> Option<&'static KnowledgeEntry> {
    KNOWLEDGE_BASE.iter().find(|entry| entry.topic == topic)
}

/// The knowledge base keyed by topic, as served over HTTP.
pub fn catalog() -> BTreeMap<&'static str, KnowledgeCard> {
    KNOWLEDGE_BASE
        .iter()
        .map(|entry| {
            (
                entry.key,
                KnowledgeCard {
                    specialist: entry.specialist,
                    summary: entry.summary,
                    advice: entry.advice,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_topic() {
        assert_eq!(lookup(Topic::ApoB).map(|e| e.key), Some("apob"));
        assert_eq!(lookup(Topic::Travel).map(|e| e.specialist), Some(Persona::Ruby));
        assert!(lookup(Topic::Cost).is_none());
    }

    #[test]
    fn catalog_has_every_entry() {
        let json = serde_json::to_value(catalog()).unwrap();
        assert_eq!(json.as_object().map(|o| o.len()), Some(7));
        assert_eq!(json["back_pain"]["specialist"], "Rachel");
    }
}
