//! Weekly event synthesizer.
//!
//! Drives one [`JourneyContext`] through an onboarding arc, `weeks`
//! simulated weeks and a closing wrap-up, collecting every promoted
//! message and milestone into a flat, timestamp-ordered list.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Duration, PrimitiveDateTime};

use crate::context::JourneyContext;
use crate::error::JourneyError;
use crate::event::{Event, InteractionType};
use crate::metrics::{MetricPatch, Nudge, Severity};
use crate::persona::Persona;
use crate::respond::Reply;
use crate::sentiment;
use crate::templates::{ExhaustionStrategy, PoolKey};
use crate::topic::{route_specialist, Topic, MEMBER_TOPICS};

/// Upper bound on accepted `weeks` (ten years).
pub const MAX_WEEKS: u32 = 520;

/// Upper bound on member Q&A exchanges drawn for a single week.
const MAX_QA_PER_WEEK: u32 = 12;

const BACK_PAIN_WEEK: u32 = 5;
const ILLNESS_WEEK: u32 = 10;
const NEW_GOAL_WEEK: u32 = 15;

/// Phrases in a team reply that promote a Q&A exchange into the timeline.
const DECISION_PHRASES: &[&str] = &[
    "recommend",
    "protocol",
    "critical",
    "re-test",
    "pharmacotherapy",
    "regress",
    "modify",
];

/// Whether the end-of-week drift runs after a scripted overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftPolicy {
    /// Weeks with a scripted overwrite keep the scripted values.
    #[default]
    SkipAfterScripted,
    /// Drift runs every week, on top of any scripted values.
    Always,
}

/// Knobs for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JourneyConfig {
    pub weeks: u32,
    /// First onboarding timestamp, `YYYY-MM-DD HH:MM`.
    pub start: String,
    pub diagnostic_interval: u32,
    pub exercise_interval: u32,
    pub travel_interval: u32,
    /// Poisson mean of member Q&A exchanges per week.
    pub qa_mean: f64,
    pub topic_cooldown_weeks: u32,
    pub adherence_probability: f64,
    pub check_in_probability: f64,
    pub exhaustion: ExhaustionStrategy,
    pub drift: DriftPolicy,
    pub seed: Option<u64>,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        JourneyConfig {
            weeks: 32,
            start: "2025-08-01 00:00".to_string(),
            diagnostic_interval: 12,
            exercise_interval: 2,
            travel_interval: 4,
            qa_mean: 5.0,
            topic_cooldown_weeks: 3,
            adherence_probability: 0.5,
            check_in_probability: 0.35,
            exhaustion: ExhaustionStrategy::Recycle,
            drift: DriftPolicy::SkipAfterScripted,
            seed: None,
        }
    }
}

impl JourneyConfig {
    pub fn validate(&self) -> Result<(), JourneyError> {
        if self.weeks == 0 || self.weeks > MAX_WEEKS {
            return Err(JourneyError::invalid(
                "weeks",
                format!("must be between 1 and {}, got {}", MAX_WEEKS, self.weeks),
            ));
        }
        for (field, value) in [
            ("diagnostic_interval", self.diagnostic_interval),
            ("exercise_interval", self.exercise_interval),
            ("travel_interval", self.travel_interval),
        ] {
            if value == 0 {
                return Err(JourneyError::invalid(field, "must be greater than zero"));
            }
        }
        for (field, value) in [
            ("adherence_probability", self.adherence_probability),
            ("check_in_probability", self.check_in_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(JourneyError::invalid(
                    field,
                    format!("must be within [0, 1], got {}", value),
                ));
            }
        }
        if !self.qa_mean.is_finite() || self.qa_mean < 0.0 {
            return Err(JourneyError::invalid(
                "qa_mean",
                format!("must be a finite, non-negative number, got {}", self.qa_mean),
            ));
        }
        parse_timestamp(&self.start)?;
        Ok(())
    }
}

/// A generated journey and the seed that reproduces it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Journey {
    pub seed: u64,
    pub events: Vec<Event>,
}

/// Journey split into milestones and chat messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitJourney {
    pub timeline_events: Vec<Event>,
    pub chat_messages: Vec<Event>,
}

impl Journey {
    pub fn split(self) -> SplitJourney {
        let (chat_messages, timeline_events) = self.events.into_iter().partition(Event::is_message);
        SplitJourney {
            timeline_events,
            chat_messages,
        }
    }
}

pub fn parse_timestamp(raw: &str) -> Result<PrimitiveDateTime, JourneyError> {
    PrimitiveDateTime::parse(raw, format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .map_err(|e| JourneyError::invalid("start", format!("'{}': {}", raw, e)))
}

/// Render as `YYYY-MM-DD HH:MM`; fixed width, so string order is time order.
pub fn format_timestamp(at: PrimitiveDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute()
    )
}

/// Generate a complete journey.
///
/// Seeded configurations are reproducible; without a seed one is drawn
/// from entropy and reported on the returned [`Journey`].
pub fn generate(config: &JourneyConfig) -> Result<Journey, JourneyError> {
    config.validate()?;
    let start = parse_timestamp(&config.start)?;
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());

    let mut synth = Synthesizer {
        config,
        start,
        ctx: JourneyContext::new(ChaCha8Rng::seed_from_u64(seed), config.exhaustion),
        events: Vec::new(),
    };
    synth.onboarding();
    for week in 1..=config.weeks {
        synth.run_week(week);
    }
    synth.wrap_up();

    let mut events = synth.events;
    events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    let milestones = events.iter().filter(|e| !e.is_message()).count();
    info!(
        "generated journey: seed={} weeks={} events={} milestones={}",
        seed,
        config.weeks,
        events.len(),
        milestones
    );
    Ok(Journey { seed, events })
}

/// Draw from a Poisson distribution (Knuth), capped at [`MAX_QA_PER_WEEK`].
fn poisson<R: Rng + ?Sized>(mean: f64, rng: &mut R) -> u32 {
    if mean <= 0.0 {
        return 0;
    }
    let limit = (-mean).exp();
    let mut product = 1.0;
    let mut k = 0;
    loop {
        product *= rng.gen::<f64>();
        if product <= limit || k >= MAX_QA_PER_WEEK {
            return k;
        }
        k += 1;
    }
}

/// Scripted metric values for the lab re-tests.
fn results_patch(week: u32) -> Option<MetricPatch> {
    match week {
        12 => Some(MetricPatch {
            apob: Some(98),
            glucose_avg: Some(100),
            hrv: Some(52),
            recovery_score: Some(74),
            ..MetricPatch::default()
        }),
        24 => Some(MetricPatch {
            apob: Some(101),
            glucose_avg: Some(99),
            hrv: Some(55),
            ..MetricPatch::default()
        }),
        _ => None,
    }
}

fn is_significant(topic: Topic, reply: &Reply) -> bool {
    let lowered = reply.text.to_lowercase();
    topic.is_significant() || DECISION_PHRASES.iter().any(|p| lowered.contains(p))
}

struct Synthesizer<'a> {
    config: &'a JourneyConfig,
    start: PrimitiveDateTime,
    ctx: JourneyContext<ChaCha8Rng>,
    events: Vec<Event>,
}

impl Synthesizer<'_> {
    /// Timestamp `day` days and `minutes` minutes into `week`.
    fn at(&self, week: u32, day: i64, minutes: i64) -> String {
        let offset = Duration::weeks(i64::from(week)) + Duration::days(day) + Duration::minutes(minutes);
        format_timestamp(self.start + offset)
    }

    fn reply(&mut self, speaker: Persona, topic: Topic) -> Reply {
        self.ctx.respond_to(speaker, topic, &self.events)
    }

    fn push(&mut self, timestamp: String, reply: Reply) {
        self.events.push(Event::message(timestamp, reply));
    }

    fn milestone(&self, week: u32, tag: &str, timestamp: String, description: &str, details: String) -> Event {
        debug!("week {}: milestone '{}'", week, description);
        Event::milestone(
            format!("evt_w{:02}_{}", week, tag),
            timestamp,
            description,
            details,
            &self.ctx.metrics,
        )
    }

    /// A hand-written message carrying the current snapshot.
    fn scripted(&self, sender: Persona, related: &str, text: String) -> Reply {
        let interaction = if sender.is_member() {
            InteractionType::MemberQuery
        } else {
            InteractionType::General
        };
        Reply {
            sender,
            sentiment: sentiment::classify(&text),
            text,
            rationale: None,
            pillar: Some("Onboarding".to_string()),
            related_to: related.to_string(),
            metrics: self.ctx.metrics.clone(),
            effect: None,
            monetary: None,
            time_efficiency: None,
            interaction,
            specialist: sender,
            next_steps: None,
        }
    }

    fn onboarding(&mut self) {
        let greeting = self.scripted(
            Persona::Ruby,
            "onboarding",
            format!(
                "{}Welcome aboard, Rohan! I'll coordinate the whole team around your goals. To start, what's bothering you most right now?",
                Persona::Ruby.prefix()
            ),
        );
        let greeting_at = self.at(0, 0, 9 * 60);
        self.push(greeting_at, greeting);

        let complaint = self.scripted(
            Persona::Rohan,
            "onboarding",
            "Honestly, I'm frustrated. My last physical flagged high ApoB, my sleep is a mess from constant travel, and the POTS symptoms make long days brutal. I need a plan that fits my calendar.".to_string(),
        );
        let complaint_at = self.at(0, 0, 10 * 60);
        self.push(complaint_at, complaint);

        let reassurance = Reply {
            rationale: Some("Establish a baseline before any intervention.".to_string()),
            next_steps: Some("Baseline diagnostics within the week.".to_string()),
            ..self.scripted(
                Persona::Ruby,
                "onboarding",
                format!(
                    "{}Thank you for trusting us with this. Dr. Warren leads on ApoB, Advik on sleep and travel recovery, Carla on nutrition and Rachel on movement. First step is a baseline diagnostic panel so we work from real numbers.",
                    Persona::Ruby.prefix()
                ),
            )
        };
        let reassurance_at = self.at(0, 0, 11 * 60);
        self.push(reassurance_at, reassurance);

        let baseline_at = self.at(0, 2, 9 * 60);
        let baseline = self
            .milestone(
                0,
                "baseline",
                baseline_at,
                "Baseline diagnostics scheduled",
                "Full blood panel (ApoB, lipids, glucose), wearable sync and a movement screen.".to_string(),
            )
            .with_rationale("Every later decision is measured against this baseline.")
            .with_pillar("Diagnostics")
            .with_related("onboarding");
        self.events.push(baseline);
    }

    fn run_week(&mut self, week: u32) {
        self.ctx.week = week;
        self.ctx.topics.prune(week, self.config.topic_cooldown_weeks);

        let mut scripted = false;
        self.check_in(week);
        if week % self.config.diagnostic_interval == 0 {
            self.diagnostics(week);
        }
        if let Some(patch) = results_patch(week) {
            self.results(week, &patch);
            scripted = true;
        }
        if week % self.config.exercise_interval == 0 {
            self.exercise(week);
        }
        if week % self.config.travel_interval == 0 {
            self.travel(week);
        }
        self.member_questions(week);
        scripted |= self.fixed_milestones(week);

        if scripted && self.config.drift == DriftPolicy::SkipAfterScripted {
            debug!("week {}: drift skipped after scripted overwrite", week);
        } else {
            self.ctx
                .metrics
                .advance_week(week, self.config.travel_interval, &mut self.ctx.rng);
        }
        if week % self.config.travel_interval == 0 {
            self.travel_recovery(week);
        }
    }

    fn check_in(&mut self, week: u32) {
        if !self.ctx.rng.gen_bool(self.config.check_in_probability) {
            return;
        }
        let persona = Persona::TEAM.choose(&mut self.ctx.rng).copied().unwrap_or(Persona::Ruby);
        let reply = self.reply(persona, Topic::CheckIn);
        let at = self.at(week, 0, 9 * 60);
        self.push(at, reply);
    }

    fn diagnostics(&mut self, week: u32) {
        let scheduling = self.reply(Persona::Ruby, Topic::DiagnosticScheduling);
        let at = self.at(week, 1, 10 * 60);
        self.push(at, scheduling);

        let confirmation = self.reply(Persona::Rohan, Topic::DiagnosticConfirmation);
        let at = self.at(week, 1, 12 * 60);
        self.push(at, confirmation);
    }

    fn results(&mut self, week: u32, patch: &MetricPatch) {
        self.ctx.metrics.apply_patch(patch);
        let at = self.at(week, 4, 16 * 60);
        let event = self
            .milestone(
                week,
                "results",
                at.clone(),
                "Diagnostic results reviewed",
                format!(
                    "ApoB {} mg/dL, glucose avg {} mg/dL, HRV {}ms.",
                    self.ctx.metrics.apob, self.ctx.metrics.glucose_avg, self.ctx.metrics.hrv
                ),
            )
            .with_pillar("Metabolic Health")
            .with_related(Topic::DiagnosticResults.key());
        self.events.push(event);

        let reply = self.reply(Persona::DrWarren, Topic::DiagnosticResults);
        self.push(at, reply);
    }

    fn exercise(&mut self, week: u32) {
        let update = self.reply(Persona::Rachel, Topic::ExerciseUpdate);
        let at = self.at(week, 2, 8 * 60);
        self.push(at, update);

        let at = self.at(week, 5, 19 * 60);
        if self.ctx.rng.gen_bool(self.config.adherence_probability) {
            self.ctx.metrics.apply_nudge(Nudge::Positive);
            let adherence = self.reply(Persona::Rohan, Topic::ExerciseAdherence);
            self.push(at, adherence);
        } else {
            self.ctx.metrics.apply_nudge(Nudge::Negative);
            let deviation = self.reply(Persona::Rohan, Topic::ExerciseDeviation);
            self.push(at, deviation);

            let adaptation = self.reply(Persona::Advik, Topic::ExerciseAdaptation);
            let at = self.at(week, 5, 21 * 60);
            self.push(at, adaptation);
        }
    }

    fn travel(&mut self, week: u32) {
        let city = self.ctx.pick(PoolKey::TravelDestination);
        let context = self.ctx.pick(PoolKey::TravelContext);

        let mut prep = self.reply(Persona::Rohan, Topic::TravelPrep);
        prep.text = prep.text.replace("{city}", &city);
        let at = self.at(week, 0, 18 * 60);
        self.push(at, prep);

        let logistics = self.reply(Persona::Ruby, Topic::TravelLogistics);
        let at = self.at(week, 1, 9 * 60);
        self.push(at, logistics);

        let at = self.at(week, 2, 7 * 60);
        let trip = self
            .milestone(week, "travel", at, &format!("Business trip to {}", city), context)
            .with_pillar(Topic::Travel.pillar())
            .with_related(Topic::Travel.key());
        self.events.push(trip);

        self.ctx.metrics.apply_travel_shock(&mut self.ctx.rng);
    }

    /// Advik's debrief lands at the start of the following week, once the
    /// travel week's drift is in the snapshot.
    fn travel_recovery(&mut self, week: u32) {
        let recovery = self.reply(Persona::Advik, Topic::TravelRecovery);
        let at = self.at(week + 1, 0, 10 * 60);
        self.push(at, recovery);
    }

    fn member_questions(&mut self, week: u32) {
        let count = poisson(self.config.qa_mean, &mut self.ctx.rng);
        for _ in 0..count {
            let topic = self.ctx.topics.select(
                &MEMBER_TOPICS,
                week,
                self.config.topic_cooldown_weeks,
                &mut self.ctx.rng,
            );
            let question = self.reply(Persona::Rohan, topic);
            let specialist = route_specialist(&question.text);
            let answer = self
                .ctx
                .respond(specialist.name(), &question.text, &self.events);

            if !is_significant(topic, &answer) {
                continue;
            }
            let day = self.ctx.rng.gen_range(0..7);
            let minute = self.ctx.rng.gen_range(8 * 60..20 * 60);
            let asked = self.at(week, day, minute);
            let answered = self.at(week, day, minute + 30);
            self.push(asked, question);
            self.push(answered, answer);
        }
    }

    /// One-off narrative beats. Returns true when a scripted overwrite
    /// should hold through the week's drift (the illness only).
    fn fixed_milestones(&mut self, week: u32) -> bool {
        match week {
            BACK_PAIN_WEEK => {
                self.ctx.metrics.apply_patch(&MetricPatch {
                    back_pain: Some(Severity::Severe),
                    ..MetricPatch::default()
                });
                let report = self.reply(Persona::Rohan, Topic::BackPainIntervention);
                let at = self.at(week, 2, 7 * 60 + 30);
                self.push(at, report);

                let at = self.at(week, 2, 8 * 60);
                let flare = self
                    .milestone(
                        week,
                        "back_pain",
                        at,
                        "Acute low back flare",
                        "Pain after a long-haul flight; lifting paused for 72h.".to_string(),
                    )
                    .with_pillar(Topic::BackPainIntervention.pillar())
                    .with_related(Topic::BackPainIntervention.key());
                self.events.push(flare);

                let plan = self.reply(Persona::Rachel, Topic::BackPainIntervention);
                let at = self.at(week, 2, 9 * 60);
                self.push(at, plan);
                false
            }
            ILLNESS_WEEK => {
                self.ctx.metrics.apply_patch(&MetricPatch {
                    recovery_score: Some(22),
                    hrv: Some(34),
                    pots_symptoms: Some(Severity::Severe),
                    ..MetricPatch::default()
                });
                let report = self.reply(Persona::Rohan, Topic::Illness);
                let at = self.at(week, 3, 7 * 60);
                self.push(at, report);

                let at = self.at(week, 3, 8 * 60);
                let illness = self
                    .milestone(
                        week,
                        "illness",
                        at,
                        "Acute illness",
                        "Fever with orthostatic symptoms; training paused.".to_string(),
                    )
                    .with_rationale("Safety overrides the training plan during acute illness.")
                    .with_pillar(Topic::Illness.pillar())
                    .with_related(Topic::Illness.key());
                self.events.push(illness);

                let care = self.reply(Persona::DrWarren, Topic::Illness);
                let at = self.at(week, 3, 8 * 60 + 30);
                self.push(at, care);
                true
            }
            NEW_GOAL_WEEK => {
                let announcement = self.reply(Persona::Rohan, Topic::NewGoal);
                let at = self.at(week, 4, 20 * 60);
                self.push(at, announcement);

                let at = self.at(week, 4, 20 * 60 + 30);
                let goal = self
                    .milestone(
                        week,
                        "new_goal",
                        at,
                        "New goal set",
                        "Member-chosen performance goal folded into the training plan.".to_string(),
                    )
                    .with_pillar(Topic::NewGoal.pillar())
                    .with_related(Topic::NewGoal.key());
                self.events.push(goal);

                let support = self.reply(Persona::Neel, Topic::NewGoal);
                let at = self.at(week, 4, 21 * 60);
                self.push(at, support);
                false
            }
            _ => false,
        }
    }

    fn wrap_up(&mut self) {
        let weeks = self.config.weeks;
        let m = &self.ctx.metrics;
        let text = format!(
            "{}That's a full cycle. ApoB is at {} mg/dL, HRV {}ms and recovery {}%. Next quarter we lock in what's working and plan around your travel calendar.",
            Persona::Neel.prefix(),
            m.apob,
            m.hrv,
            m.recovery_score
        );
        let wrap = Reply {
            rationale: Some("Quarterly review to set priorities for the next block.".to_string()),
            pillar: Some("Strategy".to_string()),
            next_steps: Some("Quarterly planning session with the full team.".to_string()),
            interaction: InteractionType::ProactiveCheckIn,
            ..self.scripted(Persona::Neel, "quarterly_review", text)
        };
        // After every in-week slot, including the last travel debrief.
        let at = self.at(weeks + 1, 1, 10 * 60);
        self.push(at, wrap);
    }
}
