//! Static phrase lists backing every template pool.
//!
//! Every list is non-empty. `{city}` placeholders are filled by the
//! synthesizer.

use crate::persona::{Persona, VoiceStyle};
use crate::templates::PoolKey;
use crate::topic::Topic;

pub(crate) fn phrases(key: PoolKey) -> &'static [&'static str] {
    match key {
        PoolKey::FollowUp(style) => follow_ups(style),
        PoolKey::Member(topic) => member(topic),
        PoolKey::CheckIn(persona) => check_ins(persona),
        PoolKey::Fallback(persona) => fallbacks(persona),
        PoolKey::ExplainLead => EXPLAIN_LEADS,
        PoolKey::TravelDestination => &["London", "New York", "Seoul", "Jakarta"],
        PoolKey::TravelContext => &[
            "Long-haul travel week",
            "Regional sales summit (dense schedule)",
            "Board-level review week with late calls",
            "Back-to-back client visits across time zones",
        ],
    }
}

fn follow_ups(style: VoiceStyle) -> &'static [&'static str] {
    match style {
        VoiceStyle::Warm => &[
            "Does that plan feel doable this week?",
            "Want me to loop in Sarah to remove logistics?",
            "What's your biggest blocker here?",
        ],
        VoiceStyle::Analytical => &[
            "Can you share 2-3 mornings of HRV/RestingHR trends?",
            "Would you be open to a 10-day experiment so we can compare metrics?",
            "If we adjust training load by 10-15%, how confident are you it fits your schedule?",
        ],
        VoiceStyle::Coach => &[
            "Which meal is most at risk this week: breakfast, lunch, or dinner?",
            "If I give you 3 travel-proof options, will you try one daily?",
            "Shall we set a simple rule: protein + fiber at every meal?",
        ],
        VoiceStyle::Direct => &[
            "Rate your pain now 0-10. If it's above 3, we regress the plan for 72h.",
            "Can you add two 5-minute mobility breaks today?",
            "Do you have bands in your bag? If yes, I'll program a 12-minute circuit.",
        ],
        VoiceStyle::Clinical => &[
            "Any new meds, supplements or acute illness recently?",
            "Shall we add labs or a home BP log to clarify the picture?",
            "Are you okay if I document this and set a re-check in 4 weeks?",
        ],
        VoiceStyle::Reassuring => &[
            "Let's keep the big picture in view: you're trending the right way.",
            "Do you want me on your next review call to align priorities?",
            "We'll pace changes so nothing breaks your work rhythm.",
        ],
    }
}

fn member(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::ApoB => &[
            "Saw ApoB mentioned in the last report. How worried should I be?",
            "Is my ApoB moving fast enough, or do we need to change something?",
            "Does the travel diet undo the ApoB work we've been doing?",
        ],
        Topic::Sleep => &[
            "Sleep feels fragmented despite 7 hours. Any quick wins?",
            "Waking at 3am most nights this week. What should I change?",
            "Deep sleep numbers look thin. Is that a concern?",
        ],
        Topic::Travel => &[
            "Flying to New York next week. Can you refresh the travel protocol?",
            "Back from Seoul and energy was flat mid-day. How do we tweak jet lag?",
            "London again. Can we adapt meals to local dining options while I travel?",
        ],
        Topic::DietAdherence => &[
            "Adherence slipped this week with too many late client dinners.",
            "I'm low on fiber while on the road. What's the minimum effective approach?",
            "Need easy protein snacks I can keep in my bag.",
        ],
        Topic::BackPain => &[
            "Back pain flared up after the flight. What's the next step?",
            "Shoulder is tight after the new block. Worth modifying?",
            "Desk posture is aggravating my low back. Can we address this?",
        ],
        Topic::CognitionFatigue => &[
            "Hard to focus during late-night calls. Any quick strategies?",
            "Mental fatigue creeping in and it seems to mirror my HRV.",
            "Would short meditation blocks actually help focus?",
        ],
        Topic::MetricsConcern => &[
            "My recovery scores are trending lower this week. Am I pushing too hard?",
            "HRV is lower the past few mornings. Should we adjust training?",
            "Resting HR crept up a few beats. Is that meaningful?",
        ],
        Topic::FamilyCold => &[
            "My son has a cold. Best way for me to avoid it during a heavy week?",
            "Half the office has the flu. Anything I should do differently?",
        ],
        Topic::Logistics => &[
            "Can Sarah coordinate the water quality test and VO2 slot?",
            "I've got a 36-hour window next week. Can we front-load labs and scans?",
        ],
        Topic::Cost => &[
            "Is the extra wearable really worth the cost?",
            "What's the cheapest version of this plan that still works?",
            "Do I need the full panel again or is that over-spending?",
        ],
        Topic::Time => &[
            "I'm slammed this month. What's the minimum I should keep doing?",
            "Busy quarter ahead. Can we compress the routine to 15 minutes?",
            "My calendar is chaos. Which habit matters most right now?",
        ],
        Topic::DiagnosticConfirmation => &[
            "Booked. Sarah has the early slot in my calendar.",
            "Confirmed. I'll fast from 8pm the night before.",
            "Works for me. Send the prep instructions to Sarah as well.",
        ],
        Topic::ExerciseAdherence => &[
            "Hit all the sessions this block. Zone 2 felt easier by the end.",
            "Managed the full plan, even the hotel-gym days.",
            "Done and logged. The mobility work is paying off.",
        ],
        Topic::ExerciseDeviation => &[
            "Only got through half the sessions. Meetings ate my mornings.",
            "Skipped most of the strength work this block, honestly.",
            "Fell off the plan after Tuesday. Travel and late calls again.",
        ],
        Topic::TravelPrep => &[
            "Heading to {city} next week for client meetings.",
            "Another trip coming up: {city}, five days.",
            "Flying out to {city} on Monday. Tight schedule once I land.",
        ],
        Topic::Illness => &[
            "Came down with something. Fever last night and dizzy on standing.",
            "Feeling awful today, sore throat and wiped out. Heart rate jumps when I stand.",
        ],
        Topic::BackPainIntervention => &[
            "Lower back seized up this morning after the long flight. Struggling to sit.",
            "My back locked up lifting a suitcase. Sharp pain when I bend.",
        ],
        Topic::NewGoal => &[
            "I've started playing padel on weekends and I'm hooked. Can we build around it?",
            "Signed up for a 10k in four months. Can the plan support that?",
        ],
        _ => &[
            "Quick one: anything I should change this week?",
            "Honestly not sure what to focus on right now.",
            "Checking in. What's the priority for the next few days?",
        ],
    }
}

fn check_ins(persona: Persona) -> &'static [&'static str] {
    match persona {
        Persona::Ruby => &[
            "Quick check-in to see how the week is landing.",
            "Just making sure nothing in your schedule is blocking the plan.",
            "Checking whether Sarah needs anything from us this week.",
        ],
        Persona::DrWarren => &[
            "Routine clinical check-in on your trends.",
            "Reviewing your latest numbers before the next lab cycle.",
        ],
        Persona::Advik => &[
            "I've been looking at your wearable trends this week.",
            "Pattern review from your last seven mornings.",
            "Your readiness data flagged something worth a look.",
        ],
        Persona::Carla => &[
            "Nutrition check-in ahead of a busy week.",
            "Checking how the breakfast defaults are holding up.",
        ],
        Persona::Rachel => &[
            "Movement check-in: how's the back feeling?",
            "Form check on this week's sessions.",
        ],
        Persona::Neel | Persona::Rohan => &[
            "Stepping back to look at the bigger picture with you.",
            "Quarter-to-date review of where we are against your goals.",
        ],
    }
}

fn fallbacks(persona: Persona) -> &'static [&'static str] {
    match persona {
        Persona::Ruby => &[
            "Got it. I'll take care of the coordination so you don't have to.",
            "Noted. I'm lining up the right person on the team for this.",
        ],
        Persona::DrWarren => &[
            "Understood. I'm reviewing this against your clinical history.",
            "Thank you. That's useful context for your next review.",
        ],
        Persona::Advik => &[
            "Got it. I'm integrating this into your plan.",
            "Interesting. That lines up with a pattern in your data.",
        ],
        Persona::Carla => &[
            "Noted. Let's keep the food side simple around this.",
            "Understood. I'll adjust your defaults to fit.",
        ],
        Persona::Rachel => &[
            "Got it. We'll keep the movement plan honest around this.",
            "Thanks for flagging. I'll adjust your sessions.",
        ],
        Persona::Neel | Persona::Rohan => &[
            "Understood. We'll fold this into the bigger plan.",
            "Thanks, that helps me keep priorities aligned.",
        ],
    }
}

/// `{hrv}`, `{glucose}` and `{recovery}` are filled from the latest snapshot.
const EXPLAIN_LEADS: &[&str] = &[
    "This recommendation balanced impact with your workload. Your recovery is {recovery}%, suggesting we can progress without overloading you.",
    "We weighed recent patterns (HRV ~{hrv}ms, glucose avg ~{glucose} mg/dL) and picked the next safest, highest-leverage step.",
    "The plan shifts now because readiness looks adequate (Recovery {recovery}%). The choice minimizes friction during travel-heavy weeks.",
    "Based on adherence signals and metrics (HRV {hrv}ms), we chose an option that preserves consistency over intensity.",
    "This follows the trend line we've been tracking and your stated priorities around time-efficiency.",
];
