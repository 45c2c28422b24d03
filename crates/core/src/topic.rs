//! Conversation topics, keyword classification, specialist routing and
//! the member's topic memory.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::persona::Persona;

/// Pre-classified subject of a message.
///
/// The first group are topics free text can be classified into. The
/// narrative topics are only ever chosen by the synthesizer directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    ApoB,
    Sleep,
    Travel,
    DietAdherence,
    BackPain,
    CognitionFatigue,
    Hypertension,
    MetricsConcern,
    FamilyCold,
    Logistics,
    Cost,
    Time,
    General,

    CheckIn,
    DiagnosticScheduling,
    DiagnosticConfirmation,
    DiagnosticResults,
    ExerciseUpdate,
    ExerciseAdherence,
    ExerciseDeviation,
    ExerciseAdaptation,
    TravelPrep,
    TravelLogistics,
    TravelRecovery,
    BackPainIntervention,
    Illness,
    NewGoal,
}

/// Ordered keyword groups; the first hit wins.
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::ApoB, &["apob", "apo b", "apo-b", "cholesterol", "lipid"]),
    (Topic::Sleep, &["sleep", "fragmented", "snor", "insomnia"]),
    (
        Topic::Travel,
        &["jet lag", "travel", "flight", "flying", "london", "seoul", "new york", "jakarta"],
    ),
    (
        Topic::DietAdherence,
        &["adherence", "late dinner", "snack", "protein", "fiber", "meal", "diet"],
    ),
    (Topic::BackPain, &["back", "shoulder", "posture", "pain"]),
    (Topic::CognitionFatigue, &["focus", "fatigue", "cognitive", "brain fog"]),
    (Topic::Hypertension, &["blood pressure", "hypertension", "bp log"]),
    (Topic::Cost, &["cost", "monetary", "price", "budget", "expensive", "insurance"]),
    (Topic::FamilyCold, &["cold", "flu", "sick", "virus"]),
    (Topic::Logistics, &["coordinate", "labs", "scan", "vo2", "book a", "slot"]),
    (Topic::Time, &["busy", "time", "schedule", "calendar"]),
    (Topic::MetricsConcern, &["hrv", "recovery", "metric", "readiness", "resting hr"]),
];

/// Topics the member raises in unscripted Q&A.
pub const MEMBER_TOPICS: [Topic; 11] = [
    Topic::ApoB,
    Topic::Sleep,
    Topic::Travel,
    Topic::DietAdherence,
    Topic::BackPain,
    Topic::CognitionFatigue,
    Topic::MetricsConcern,
    Topic::FamilyCold,
    Topic::Logistics,
    Topic::Cost,
    Topic::Time,
];

/// Member-raised topics that are always promoted into the timeline.
pub const SIGNIFICANT_TOPICS: [Topic; 5] = [
    Topic::ApoB,
    Topic::BackPain,
    Topic::Travel,
    Topic::MetricsConcern,
    Topic::Hypertension,
];

/// Specialist routing for member questions, checked in order.
const ROUTES: &[(Persona, &[&str])] = &[
    (
        Persona::DrWarren,
        &["apob", "cholesterol", "blood pressure", "fatigue", "focus", "cold", "meditation"],
    ),
    (
        Persona::Advik,
        &["travel", "jet lag", "flight", "flying", "seoul", "london", "new york", "hrv", "recovery", "sleep"],
    ),
    (Persona::Rachel, &["back", "shoulder", "posture", "pain", "mobility"]),
    (
        Persona::Carla,
        &["fiber", "protein", "dinner", "snack", "meal", "adherence", "diet"],
    ),
    (Persona::Neel, &["cost", "budget", "price", "worth", "busy", "time"]),
];

impl Topic {
    /// Classify free text into a topic. Unmatched text is `General`.
    pub fn classify(text: &str) -> Topic {
        let lowered = text.to_lowercase();
        TOPIC_KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
            .map(|(topic, _)| *topic)
            .unwrap_or(Topic::General)
    }

    /// Stable key stored in `relatedTo`.
    pub fn key(self) -> &'static str {
        match self {
            Topic::ApoB => "apob",
            Topic::Sleep => "sleep",
            Topic::Travel => "travel_related",
            Topic::DietAdherence => "diet_adherence",
            Topic::BackPain => "back_pain",
            Topic::CognitionFatigue => "cognition_fatigue",
            Topic::Hypertension => "hypertension",
            Topic::MetricsConcern => "metrics_concern",
            Topic::FamilyCold => "family_cold",
            Topic::Logistics => "logistics",
            Topic::Cost => "cost",
            Topic::Time => "time",
            Topic::General => "general",
            Topic::CheckIn => "check_in",
            Topic::DiagnosticScheduling => "diagnostic_scheduling",
            Topic::DiagnosticConfirmation => "diagnostic_confirmation",
            Topic::DiagnosticResults => "diagnostic_results",
            Topic::ExerciseUpdate => "exercise_update",
            Topic::ExerciseAdherence => "exercise_adherence",
            Topic::ExerciseDeviation => "exercise_deviation",
            Topic::ExerciseAdaptation => "exercise_adaptation",
            Topic::TravelPrep => "travel_prep",
            Topic::TravelLogistics => "travel_logistics",
            Topic::TravelRecovery => "travel_recovery",
            Topic::BackPainIntervention => "back_pain_intervention",
            Topic::Illness => "illness",
            Topic::NewGoal => "new_goal",
        }
    }

    /// Health pillar a topic contributes to.
    pub fn pillar(self) -> &'static str {
        match self {
            Topic::ApoB | Topic::Hypertension | Topic::DiagnosticResults => "Metabolic Health",
            Topic::Sleep | Topic::MetricsConcern => "Recovery & Sleep",
            Topic::Travel | Topic::TravelPrep | Topic::TravelLogistics | Topic::TravelRecovery => {
                "Travel Resilience"
            }
            Topic::DietAdherence => "Nutrition",
            Topic::BackPain | Topic::BackPainIntervention => "Musculoskeletal",
            Topic::CognitionFatigue => "Cognitive Performance",
            Topic::FamilyCold | Topic::Illness => "Medical",
            Topic::Logistics | Topic::DiagnosticScheduling | Topic::DiagnosticConfirmation => {
                "Diagnostics"
            }
            Topic::Cost | Topic::Time | Topic::NewGoal => "Strategy",
            Topic::ExerciseUpdate
            | Topic::ExerciseAdherence
            | Topic::ExerciseDeviation
            | Topic::ExerciseAdaptation => "Exercise",
            Topic::CheckIn | Topic::General => "General",
        }
    }

    pub fn is_significant(self) -> bool {
        SIGNIFICANT_TOPICS.contains(&self)
    }
}

/// Pick the specialist who should answer a member message.
/// Unrouted text goes to Ruby, the orchestrator.
pub fn route_specialist(text: &str) -> Persona {
    let lowered = text.to_lowercase();
    ROUTES
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(persona, _)| *persona)
        .unwrap_or(Persona::Ruby)
}

/// Topics the member raised recently, each stamped with its week.
#[derive(Debug, Clone, Default)]
pub struct TopicMemory {
    entries: Vec<(Topic, u32)>,
}

impl TopicMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, topic: Topic, week: u32) {
        self.entries.push((topic, week));
    }

    /// Drop entries older than the cooldown window.
    pub fn prune(&mut self, now_week: u32, cooldown_weeks: u32) {
        self.entries
            .retain(|(_, week)| now_week.saturating_sub(*week) < cooldown_weeks);
    }

    pub fn is_cooling(&self, topic: Topic, now_week: u32, cooldown_weeks: u32) -> bool {
        self.entries
            .iter()
            .any(|(t, week)| *t == topic && now_week.saturating_sub(*week) < cooldown_weeks)
    }

    fn last_raised(&self, topic: Topic) -> Option<u32> {
        self.entries
            .iter()
            .filter(|(t, _)| *t == topic)
            .map(|(_, week)| *week)
            .max()
    }

    /// Choose a topic, avoiding ones still in cooldown.
    ///
    /// When every candidate is cooling, the least recently raised topics
    /// are used instead.
    pub fn select<R: Rng + ?Sized>(
        &self,
        candidates: &[Topic],
        now_week: u32,
        cooldown_weeks: u32,
        rng: &mut R,
    ) -> Topic {
        let fresh: Vec<Topic> = candidates
            .iter()
            .copied()
            .filter(|t| !self.is_cooling(*t, now_week, cooldown_weeks))
            .collect();
        if let Some(topic) = fresh.choose(rng) {
            return *topic;
        }

        let oldest = candidates
            .iter()
            .filter_map(|t| self.last_raised(*t))
            .min();
        let stale: Vec<Topic> = candidates
            .iter()
            .copied()
            .filter(|t| self.last_raised(*t) == oldest)
            .collect();
        stale.choose(rng).copied().unwrap_or(Topic::General)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn classify_follows_priority_order() {
        assert_eq!(Topic::classify("What about my ApoB?"), Topic::ApoB);
        assert_eq!(
            Topic::classify("Back from Seoul, how do we tweak jet lag?"),
            Topic::Travel
        );
        assert_eq!(Topic::classify("Desk posture hurts"), Topic::BackPain);
        assert_eq!(Topic::classify("Is this worth the cost?"), Topic::Cost);
        assert_eq!(Topic::classify("nothing relevant"), Topic::General);
    }

    #[test]
    fn routing_by_keyword() {
        assert_eq!(route_specialist("my apob is high"), Persona::DrWarren);
        assert_eq!(route_specialist("travel next week"), Persona::Advik);
        assert_eq!(route_specialist("lower back is tight"), Persona::Rachel);
        assert_eq!(route_specialist("can Sarah sort it?"), Persona::Ruby);
    }

    #[test]
    fn cooldown_excludes_recent_topics() {
        let mut memory = TopicMemory::new();
        memory.record(Topic::ApoB, 4);
        memory.record(Topic::Sleep, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = memory.select(&[Topic::ApoB, Topic::Sleep, Topic::Cost], 5, 3, &mut rng);
            assert_eq!(picked, Topic::Cost);
        }
    }

    #[test]
    fn all_cooling_falls_back_to_oldest() {
        let mut memory = TopicMemory::new();
        memory.record(Topic::ApoB, 3);
        memory.record(Topic::Sleep, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let picked = memory.select(&[Topic::ApoB, Topic::Sleep], 5, 4, &mut rng);
        assert_eq!(picked, Topic::ApoB);
    }

    #[test]
    fn prune_drops_expired_entries() {
        let mut memory = TopicMemory::new();
        memory.record(Topic::ApoB, 1);
        memory.record(Topic::Sleep, 6);
        memory.prune(6, 3);
        assert_eq!(memory.entries.len(), 1);
        assert!(!memory.is_cooling(Topic::ApoB, 6, 3));
        assert!(memory.is_cooling(Topic::Sleep, 6, 3));
    }
}
