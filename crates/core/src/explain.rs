//! Keyword retrieval over a journey.
//!
//! The most recent item whose text contains the query, or a synonym of
//! one of its words, is echoed back with its stored decision fields. When
//! nothing matches, a fresh reply is generated instead.

use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::context::JourneyContext;
use crate::error::JourneyError;
use crate::event::Event;
use crate::metrics::MetricSnapshot;
use crate::sentiment::{self, Sentiment};
use crate::templates::{ExhaustionStrategy, PoolKey};

/// A query word found in a group matches any other word of that group.
const SYNONYM_GROUPS: &[&[&str]] = &[
    &["apob", "cholesterol", "lipid", "lipids", "ldl", "statin"],
    &["sleep", "insomnia", "tired", "rest", "deep"],
    &["hrv", "recovery", "readiness", "heart"],
    &["travel", "trip", "flight", "flying", "jet", "lag"],
    &["back", "pain", "posture", "spine", "lumbar"],
    &["diet", "food", "meal", "meals", "nutrition", "fiber", "protein"],
    &["exercise", "training", "workout", "sessions", "strength", "zone"],
    &["ill", "illness", "sick", "fever", "unwell", "pots", "dizzy"],
    &["glucose", "sugar", "cgm"],
    &["cost", "price", "money", "expensive", "budget"],
    &["time", "busy", "schedule", "calendar"],
    &["labs", "diagnostic", "diagnostics", "panel", "test", "re-test", "results"],
];

/// Where an explanation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationSource {
    /// Echoed from a journey item.
    Matched,
    /// Generated because nothing in the journey matched.
    Synthesized,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub explanation: String,
    /// Sentiment stored on the matched item, or of the generated reply.
    pub sentiment: Sentiment,
    /// Sentiment of the query itself.
    pub detected_sentiment: Sentiment,
    pub source: ExplanationSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pillar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<String>,
}

/// Explain a query against `history`, most recent match first.
pub fn explain<R: Rng>(query: &str, history: &[Event], rng: &mut R) -> Result<Explanation, JourneyError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(JourneyError::EmptyQuery);
    }
    let detected = sentiment::classify(query);
    let latest = history
        .iter()
        .rev()
        .find_map(|e| e.health_metrics_snapshot.clone())
        .unwrap_or_default();
    let mut ctx = JourneyContext::new(rng, ExhaustionStrategy::Recycle).with_metrics(latest);

    match find_match(query, history) {
        Some(item) => {
            debug!("explain: '{}' matched item at {}", query, item.timestamp);
            let lead = fill_lead(&ctx.pick(PoolKey::ExplainLead), &ctx.metrics);
            Ok(Explanation {
                explanation: format!(
                    "{}{}\n\n{}",
                    detected.opener(),
                    lead,
                    describe(item)
                ),
                sentiment: item.sentiment.unwrap_or_default(),
                detected_sentiment: detected,
                source: ExplanationSource::Matched,
                rationale: item.decision_rationale.clone(),
                pillar: item.pillar.clone(),
                metrics: item.health_metrics_snapshot.clone(),
                effect: item.intervention_effect.clone(),
                specialist: item
                    .specialist_involved
                    .clone()
                    .or_else(|| item.sender.clone()),
                next_steps: item.next_steps.clone(),
            })
        }
        None => {
            debug!("explain: '{}' had no match, synthesizing", query);
            let reply = ctx.respond("assistant", query, &[]);
            Ok(Explanation {
                explanation: format!("{}{}", detected.opener(), reply.text),
                sentiment: reply.sentiment,
                detected_sentiment: detected,
                source: ExplanationSource::Synthesized,
                rationale: reply.rationale,
                pillar: reply.pillar,
                metrics: Some(reply.metrics),
                effect: reply.effect,
                specialist: Some(reply.specialist.name().to_string()),
                next_steps: reply.next_steps,
            })
        }
    }
}

/// Most recent item matching the query verbatim or through a synonym.
pub fn find_match<'a>(query: &str, history: &'a [Event]) -> Option<&'a Event> {
    let lowered = query.to_lowercase();
    let synonyms: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .filter_map(|w| SYNONYM_GROUPS.iter().find(|group| group.contains(&w)))
        .flat_map(|group| group.iter().copied())
        .collect();

    history.iter().rev().filter(|e| e.has_text()).find(|e| {
        let blob = e.search_blob();
        blob.contains(&lowered) || synonyms.iter().any(|s| contains_word(&blob, s))
    })
}

/// Whole-word containment, so "ill" does not match "will".
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .any(|w| w == word)
}

fn fill_lead(lead: &str, metrics: &MetricSnapshot) -> String {
    lead.replace("{hrv}", &metrics.hrv.to_string())
        .replace("{glucose}", &metrics.glucose_avg.to_string())
        .replace("{recovery}", &metrics.recovery_score.to_string())
}

/// Item text followed by one bold line per stored decision field.
fn describe(item: &Event) -> String {
    let base = match (&item.content, &item.description, &item.details) {
        (Some(content), _, _) => content.clone(),
        (None, Some(description), Some(details)) => format!("{}: {}", description, details),
        (None, Some(description), None) => description.clone(),
        (None, None, Some(details)) => details.clone(),
        (None, None, None) => String::new(),
    };

    let fields = [
        ("Rationale", &item.decision_rationale),
        ("Pillar Impact", &item.pillar),
        ("Observed Effectiveness", &item.intervention_effect),
        ("Cost Consideration", &item.monetary_factor),
        ("Time Efficiency", &item.time_efficiency),
        ("Specialist Involved", &item.specialist_involved),
        ("Next Steps", &item.next_steps),
    ];
    let mut out = base;
    for (label, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            out.push_str(&format!("\n**{}:** {}", label, value));
        }
    }
    out
}
