//! Response generator.
//!
//! Text is classified into a [`Topic`] once; the reply is then built by a
//! single match over the topic. Knowledge-base topics win for team
//! speakers, and the knowledge entry's specialist replaces the requested
//! speaker. Unknown speakers and unmatched topics fall through to generic
//! per-persona replies rather than failing.

use rand::Rng;
use serde::Serialize;

use crate::context::JourneyContext;
use crate::event::{Event, InteractionType};
use crate::knowledge::{self, KnowledgeEntry};
use crate::metrics::MetricSnapshot;
use crate::persona::Persona;
use crate::sentiment::{self, Sentiment};
use crate::templates::PoolKey;
use crate::topic::{Topic, MEMBER_TOPICS};

/// How far back a member topic counts as "raised recently".
const RECENT_WINDOW: usize = 8;

/// Recovery score under which the member's mood skews negative.
const LOW_RECOVERY: i32 = 50;

/// Everything generated for one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub sender: Persona,
    pub text: String,
    pub rationale: Option<String>,
    pub pillar: Option<String>,
    pub related_to: String,
    pub metrics: MetricSnapshot,
    pub effect: Option<String>,
    pub monetary: Option<String>,
    pub time_efficiency: Option<String>,
    pub interaction: InteractionType,
    pub specialist: Persona,
    pub next_steps: Option<String>,
    pub sentiment: Sentiment,
}

/// A team reply before the intro, follow-up and metadata are attached.
struct Draft {
    body: String,
    rationale: String,
    effect: Option<String>,
    monetary: Option<&'static str>,
    time_efficiency: Option<&'static str>,
    next_steps: Option<String>,
    interaction: InteractionType,
    pillar: Option<&'static str>,
    follow_up: bool,
}

impl Draft {
    fn new(body: impl Into<String>, rationale: impl Into<String>) -> Self {
        Draft {
            body: body.into(),
            rationale: rationale.into(),
            effect: None,
            monetary: None,
            time_efficiency: None,
            next_steps: None,
            interaction: InteractionType::InterventionUpdate,
            pillar: None,
            follow_up: true,
        }
    }
}

impl<R: Rng> JourneyContext<R> {
    /// Respond as `role` to free-text `context`.
    pub fn respond(&mut self, role: &str, context: &str, history: &[Event]) -> Reply {
        let speaker = Persona::resolve(role);
        let topic = Topic::classify(context);
        self.respond_to(speaker, topic, history)
    }

    /// Respond as `speaker` on an already-classified topic.
    pub fn respond_to(&mut self, speaker: Persona, topic: Topic, history: &[Event]) -> Reply {
        if speaker.is_member() {
            self.member_reply(topic, history)
        } else if let Some(entry) = knowledge::lookup(topic) {
            self.knowledge_reply(entry, topic, history)
        } else {
            let draft = self.draft(speaker, topic);
            self.finish(speaker, topic, draft, history)
        }
    }

    fn member_reply(&mut self, topic: Topic, history: &[Event]) -> Reply {
        let mut text = self.pick(PoolKey::Member(topic));
        if MEMBER_TOPICS.contains(&topic) && raised_recently(history, topic) {
            text = format!("Circling back on this. {}", text);
        }

        let mut mood = sentiment::classify(&text);
        if self.metrics.recovery_score < LOW_RECOVERY && !mood.is_negative() {
            mood = Sentiment::Frustrated;
        }

        self.topics.record(topic, self.week);

        Reply {
            sender: Persona::Rohan,
            text,
            rationale: None,
            pillar: Some("Member Engagement".to_string()),
            related_to: topic.key().to_string(),
            metrics: self.metrics.clone(),
            effect: None,
            monetary: None,
            time_efficiency: None,
            interaction: InteractionType::MemberQuery,
            specialist: Persona::Rohan,
            next_steps: None,
            sentiment: mood,
        }
    }

    fn knowledge_reply(&mut self, entry: &KnowledgeEntry, topic: Topic, history: &[Event]) -> Reply {
        let body = format!(
            "Thanks for flagging this. {} For you, {}",
            entry.summary, entry.advice
        );
        let draft = Draft {
            next_steps: Some(entry.next_steps.to_string()),
            ..Draft::new(
                body,
                format!(
                    "Evidence-based guidance on {} tailored to the member's profile.",
                    entry.key
                ),
            )
        };
        self.finish(entry.specialist, topic, draft, history)
    }

    fn draft(&mut self, speaker: Persona, topic: Topic) -> Draft {
        let m = self.metrics.clone();
        match topic {
            Topic::CheckIn => {
                let opener = self.pick(PoolKey::CheckIn(speaker));
                let (reading, pillar) = match speaker {
                    Persona::Advik => (
                        format!("HRV is {}ms and recovery {}%.", m.hrv, m.recovery_score),
                        "Recovery & Sleep",
                    ),
                    Persona::DrWarren => (
                        format!("ApoB is tracking at ~{} mg/dL.", m.apob),
                        "Metabolic Health",
                    ),
                    Persona::Carla => (
                        format!("Glucose is averaging {} mg/dL.", m.glucose_avg),
                        "Nutrition",
                    ),
                    Persona::Rachel => (
                        format!("Back pain is reading {} right now.", m.back_pain),
                        "Musculoskeletal",
                    ),
                    _ => (
                        format!("Recovery sits at {}%.", m.recovery_score),
                        "General",
                    ),
                };
                Draft {
                    interaction: InteractionType::ProactiveCheckIn,
                    pillar: Some(pillar),
                    ..Draft::new(
                        format!("{} {}", opener, reading),
                        "Proactive touchpoint keeps momentum between reviews.",
                    )
                }
            }
            Topic::DiagnosticScheduling => Draft {
                monetary: Some("Covered under the annual screening package."),
                time_efficiency: Some("Single 40-minute visit before work hours."),
                next_steps: Some("Confirm a slot; fast from 8pm the night before.".to_string()),
                interaction: InteractionType::Logistics,
                ..Draft::new(
                    "Your quarterly diagnostic panel is due. I've held two early-morning slots next week for fasting labs (ApoB, glucose, lipids, hsCRP) plus a wearable data pull.",
                    "Quarterly re-test tracks progress against the ApoB goal.",
                )
            },
            Topic::DiagnosticResults => {
                let baseline = MetricSnapshot::baseline();
                let readings = format!(
                    "Your re-test is back. ApoB is {} mg/dL (baseline {}), glucose averages {} mg/dL and HRV is {}ms.",
                    m.apob, baseline.apob, m.glucose_avg, m.hrv
                );
                let (verdict, effect) = if m.apob <= baseline.apob - 5 {
                    (
                        "That's a meaningful improvement, so we recommend holding the current protocol.",
                        format!("ApoB down {} mg/dL since baseline.", baseline.apob - m.apob),
                    )
                } else {
                    (
                        "Progress has plateaued, so I recommend a second weekly cardio block and tighter fiber targets before we discuss medication.",
                        "ApoB has stalled short of target.".to_string(),
                    )
                };
                Draft {
                    effect: Some(effect),
                    next_steps: Some("Re-test in 12 weeks.".to_string()),
                    interaction: InteractionType::Diagnostic,
                    ..Draft::new(
                        format!("{} {}", readings, verdict),
                        "Lab results compared with baseline to decide whether to hold or escalate.",
                    )
                }
            }
            Topic::ExerciseUpdate => {
                let scaling = if m.recovery_score < LOW_RECOVERY {
                    format!("Volume is trimmed because recovery is low ({}%).", m.recovery_score)
                } else {
                    format!("Scaled to your current recovery of {}%.", m.recovery_score)
                };
                Draft {
                    time_efficiency: Some("About 2.5 hours across the fortnight."),
                    next_steps: Some("Log each session in the app.".to_string()),
                    ..Draft::new(
                        format!(
                            "Next two weeks: 3 x 25-minute zone 2 sessions, 2 short strength circuits, and 5 minutes of daily mobility. {}",
                            scaling
                        ),
                        "Progressive overload paced to current recovery.",
                    )
                }
            }
            Topic::ExerciseAdaptation => Draft {
                effect: Some("Plan adapted to real adherence.".to_string()),
                time_efficiency: Some("15 minutes, no gym needed."),
                next_steps: Some("Try the 15-minute circuits for one week and report back.".to_string()),
                ..Draft::new(
                    "No problem, missed sessions are data. I'm swapping the plan to 3 x 15-minute hotel-room circuits you can do before calls, and cutting strength volume by 20% until adherence settles.",
                    "Adjust the plan to the member's actual schedule rather than pushing volume.",
                )
            },
            Topic::TravelLogistics => Draft {
                monetary: Some("Uses existing corporate travel bookings."),
                time_efficiency: Some("Zero extra planning time for the member."),
                interaction: InteractionType::Logistics,
                follow_up: false,
                ..Draft::new(
                    "Sarah and I have the trip covered: aisle seat on the overnight leg, a hotel with a gym, room-service breakfast pre-ordered (eggs, oats, berries), and light-exposure windows blocked in your calendar.",
                    "Remove logistics friction so the plan survives travel.",
                )
            },
            Topic::TravelRecovery => Draft {
                effect: Some("Expected post-travel dip; recovery protocol applied.".to_string()),
                next_steps: Some("Zone 2 only for 5 days; report morning HRV.".to_string()),
                ..Draft::new(
                    format!(
                        "Welcome back. The trip cost you: HRV {}ms, recovery {}%, deep sleep {} minutes. For the next 5 days it's zone 2 only, morning light, and lights out by 10:30.",
                        m.hrv, m.recovery_score, m.deep_sleep
                    ),
                    "A recovery-first week after travel avoids compounding fatigue.",
                )
            },
            Topic::Illness => Draft {
                effect: Some("Training paused to protect recovery.".to_string()),
                next_steps: Some("Reassess in 72h; resume with easy walks.".to_string()),
                pillar: Some("Medical"),
                follow_up: false,
                ..Draft::new(
                    format!(
                        "Sorry you're unwell. Recovery is down to {}% and POTS symptoms are {}, so training is paused. Hydrate with electrolytes, salt your meals, rise slowly, and message me if the dizziness worsens. This is critical: no intense exercise until symptoms clear.",
                        m.recovery_score, m.pots_symptoms
                    ),
                    "Acute illness with orthostatic symptoms: safety overrides the training plan.",
                )
            },
            Topic::BackPainIntervention => Draft {
                effect: Some("Pain-guided regression of lifting for 72h.".to_string()),
                next_steps: Some("Re-check pain score in 72h; physio session booked.".to_string()),
                ..Draft::new(
                    format!(
                        "Let's act on this now. Pain is {} today, so for 72h: no loaded spinal flexion, walk 10 minutes every 2 hours, couch stretch 90s per side, and heat before bed. I'm rebuilding your sessions around hip extension so this stops recurring.",
                        m.back_pain
                    ),
                    "Acute low back flare after travel: de-load first, then fix the hip extension deficit.",
                )
            },
            Topic::NewGoal => Draft {
                next_steps: Some("Advik to re-plan the next block around the new goal.".to_string()),
                pillar: Some("Strategy"),
                ..Draft::new(
                    "Love that. A goal you actually enjoy is the best adherence tool we have. Advik will fold it into your training blocks and we'll track it alongside ApoB and sleep so it supports the original goals rather than competing with them.",
                    "A new intrinsic goal raises adherence; integrate it instead of adding load.",
                )
            },
            Topic::MetricsConcern => {
                let call = if m.recovery_score < 60 || m.hrv < 40 {
                    "That's a signal to back off: I recommend dropping intensity for 4 days."
                } else {
                    "That's within your normal range, so keep the plan and keep sleep consistent."
                };
                Draft {
                    pillar: Some("Recovery & Sleep"),
                    ..Draft::new(
                        format!(
                            "Looking at your data: HRV {}ms, resting HR {} bpm, recovery {}%. {}",
                            m.hrv, m.resting_hr, m.recovery_score, call
                        ),
                        "Training load matched to objective readiness metrics.",
                    )
                }
            }
            Topic::Cost => Draft {
                monetary: Some("Prioritises devices already owned and covered labs; optional extras deferred."),
                ..Draft::new(
                    "Fair question. The highest-value pieces are the quarterly labs and the wearable you already own. Anything extra is optional, and we keep spend on what moves ApoB and recovery.",
                    "Cost-conscious plan: spend only where it changes decisions.",
                )
            },
            Topic::Time => Draft {
                time_efficiency: Some("Cut to about 60 minutes a week of structured work."),
                ..Draft::new(
                    "Understood. Minimum viable week: two 20-minute zone 2 sessions, protein at breakfast, and lights out by 11. Everything else comes off your plate.",
                    "Protect the highest-leverage habits when time is scarce.",
                )
            },
            Topic::FamilyCold => Draft {
                pillar: Some("Medical"),
                ..Draft::new(
                    "Sensible to be careful. Prioritise sleep, wash hands often, keep vitamin D steady, and drop to easy sessions if you feel anything coming on.",
                    "Reduce infection risk during a heavy week.",
                )
            },
            Topic::Logistics => Draft {
                time_efficiency: Some("One bundled visit instead of three."),
                interaction: InteractionType::Logistics,
                ..Draft::new(
                    "On it. Sarah and I will coordinate the slots and send one calendar invite with everything bundled.",
                    "Bundle appointments to minimise disruption.",
                )
            },
            _ => {
                let opener = self.pick(PoolKey::Fallback(speaker));
                Draft {
                    pillar: Some("General"),
                    interaction: InteractionType::General,
                    ..Draft::new(
                        format!(
                            "{} Current snapshot: HRV {}ms, Recovery {}%.",
                            opener, m.hrv, m.recovery_score
                        ),
                        "Routine check-in adjusted to current metrics.",
                    )
                }
            }
        }
    }

    fn finish(&mut self, speaker: Persona, topic: Topic, draft: Draft, history: &[Event]) -> Reply {
        let mood = sentiment::classify(&draft.body);
        let mut text = format!("{}{}", intro(speaker, history), draft.body);
        if draft.follow_up {
            let question = self.pick(PoolKey::FollowUp(speaker.style()));
            text.push(' ');
            text.push_str(&question);
        }

        Reply {
            sender: speaker,
            text,
            rationale: Some(draft.rationale),
            pillar: Some(draft.pillar.unwrap_or(topic.pillar()).to_string()),
            related_to: topic.key().to_string(),
            metrics: self.metrics.clone(),
            effect: draft.effect,
            monetary: draft.monetary.map(str::to_string),
            time_efficiency: draft.time_efficiency.map(str::to_string),
            interaction: draft.interaction,
            specialist: speaker,
            next_steps: draft.next_steps,
            sentiment: mood,
        }
    }
}

/// Full introduction, or a short one when the same persona sent the
/// previous team message.
fn intro(speaker: Persona, history: &[Event]) -> String {
    let last_team_sender = history
        .iter()
        .rev()
        .filter(|e| e.is_message())
        .filter_map(|e| e.sender.as_deref())
        .find(|s| Persona::resolve(s) != Persona::Rohan);
    if last_team_sender == Some(speaker.name()) {
        format!("{} again. ", speaker.name())
    } else {
        speaker.prefix()
    }
}

fn raised_recently(history: &[Event], topic: Topic) -> bool {
    history
        .iter()
        .rev()
        .take(RECENT_WINDOW)
        .any(|e| {
            e.sender.as_deref() == Some(Persona::Rohan.name())
                && e.related_to.as_deref() == Some(topic.key())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::ExhaustionStrategy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ctx() -> JourneyContext<ChaCha8Rng> {
        JourneyContext::new(ChaCha8Rng::seed_from_u64(42), ExhaustionStrategy::Recycle)
    }

    #[test]
    fn knowledge_hit_overrides_speaker() {
        let mut ctx = ctx();
        let reply = ctx.respond("Rachel", "What should I do about my ApoB?", &[]);
        assert_eq!(reply.sender, Persona::DrWarren);
        assert_eq!(reply.specialist, Persona::DrWarren);
        assert!(reply.text.starts_with("Dr. Warren (Medical Strategist) here. "));
        assert_eq!(reply.next_steps.as_deref(), Some("Re-test in 8-12 weeks."));
        assert_eq!(reply.related_to, "apob");
    }

    #[test]
    fn unknown_role_and_text_fall_back_to_generic() {
        let mut ctx = ctx();
        let reply = ctx.respond("assistant", "zzz", &[]);
        assert_eq!(reply.sender, Persona::Neel);
        assert_eq!(
            reply.rationale.as_deref(),
            Some("Routine check-in adjusted to current metrics.")
        );
        assert!(reply.text.contains("HRV 45ms"));
    }

    #[test]
    fn reply_carries_a_snapshot_copy() {
        let mut ctx = ctx();
        let reply = ctx.respond_to(Persona::Advik, Topic::CheckIn, &[]);
        ctx.metrics.hrv = 80;
        assert_eq!(reply.metrics.hrv, 45);
    }

    #[test]
    fn member_reply_records_topic_and_skews_mood_when_recovery_low() {
        let mut ctx = ctx();
        ctx.week = 3;
        ctx.metrics.recovery_score = 30;
        let reply = ctx.respond("member", "thinking about cost", &[]);
        assert_eq!(reply.sender, Persona::Rohan);
        assert_eq!(reply.related_to, "cost");
        assert!(reply.sentiment.is_negative());
        assert!(ctx.topics.is_cooling(Topic::Cost, 3, 2));
    }

    #[test]
    fn repeated_team_speaker_gets_short_intro() {
        let mut ctx = ctx();
        let first = ctx.respond_to(Persona::Carla, Topic::CheckIn, &[]);
        let history = vec![Event::message("2025-08-01 09:00".into(), first)];
        let second = ctx.respond_to(Persona::Carla, Topic::CheckIn, &history);
        assert!(second.text.starts_with("Carla again. "));
    }

    #[test]
    fn results_narrative_follows_metrics() {
        let mut ctx = ctx();
        ctx.metrics.apob = 92;
        let improving = ctx.respond_to(Persona::DrWarren, Topic::DiagnosticResults, &[]);
        assert!(improving.text.contains("meaningful improvement"));
        ctx.metrics.apob = 104;
        let flat = ctx.respond_to(Persona::DrWarren, Topic::DiagnosticResults, &[]);
        assert!(flat.text.contains("plateaued"));
    }
}
