//! The member and the care team.
//!
//! Personas only flavour text: each has a name, a role title and a voice
//! style used to pick follow-up questions. Logic never branches on voice.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Persona {
    Rohan,
    Ruby,
    #[serde(rename = "Dr. Warren")]
    DrWarren,
    Advik,
    Carla,
    Rachel,
    Neel,
}

/// Voice style of a team persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceStyle {
    Warm,
    Clinical,
    Analytical,
    Coach,
    Direct,
    Reassuring,
}

impl Persona {
    /// Every care-team persona, in roster order.
    pub const TEAM: [Persona; 6] = [
        Persona::Ruby,
        Persona::DrWarren,
        Persona::Advik,
        Persona::Carla,
        Persona::Rachel,
        Persona::Neel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Persona::Rohan => "Rohan",
            Persona::Ruby => "Ruby",
            Persona::DrWarren => "Dr. Warren",
            Persona::Advik => "Advik",
            Persona::Carla => "Carla",
            Persona::Rachel => "Rachel",
            Persona::Neel => "Neel",
        }
    }

    pub fn role(self) -> &'static str {
        match self {
            Persona::Rohan => "Member",
            Persona::Ruby => "Concierge / Orchestrator",
            Persona::DrWarren => "Medical Strategist",
            Persona::Advik => "Performance Scientist",
            Persona::Carla => "Nutritionist",
            Persona::Rachel => "PT / Physiotherapist",
            Persona::Neel => "Concierge Lead / Relationship Manager",
        }
    }

    pub fn voice(self) -> &'static str {
        match self {
            Persona::Rohan => "Analytical, driven, values efficiency",
            Persona::Ruby => "Empathetic, organized, proactive, removes friction",
            Persona::DrWarren => "Authoritative, precise, scientific, explains complex topics",
            Persona::Advik => "Analytical, curious, pattern-oriented, data-driven insights",
            Persona::Carla => "Practical, educational, focused on behavioral change",
            Persona::Rachel => "Direct, encouraging, focused on form and function",
            Persona::Neel => "Strategic, reassuring, focused on the big picture",
        }
    }

    pub fn style(self) -> VoiceStyle {
        match self {
            Persona::Rohan | Persona::Ruby => VoiceStyle::Warm,
            Persona::DrWarren => VoiceStyle::Clinical,
            Persona::Advik => VoiceStyle::Analytical,
            Persona::Carla => VoiceStyle::Coach,
            Persona::Rachel => VoiceStyle::Direct,
            Persona::Neel => VoiceStyle::Reassuring,
        }
    }

    pub fn is_member(self) -> bool {
        self == Persona::Rohan
    }

    /// Resolve a free-form role or name.
    ///
    /// Matching is case-insensitive on the display name, the bare surname
    /// ("warren") and a few member aliases. Anything unrecognised, including
    /// a synthetic "assistant", resolves to Neel.
    pub fn resolve(raw: &str) -> Persona {
        let key = raw.trim().to_lowercase();
        match key.as_str() {
            "rohan" | "member" | "user" => Persona::Rohan,
            "ruby" | "concierge" => Persona::Ruby,
            "dr. warren" | "dr warren" | "warren" | "medical" => Persona::DrWarren,
            "advik" | "performance" => Persona::Advik,
            "carla" | "nutrition" => Persona::Carla,
            "rachel" | "physio" => Persona::Rachel,
            _ => Persona::Neel,
        }
    }

    /// Self-introduction used to open team replies.
    pub fn prefix(self) -> String {
        format!("{} ({}) here. ", self.name(), self.role())
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Public roster entry for a team persona.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaCard {
    pub name: &'static str,
    pub role: &'static str,
    pub voice: &'static str,
    pub style: VoiceStyle,
}

pub fn team_roster() -> Vec<PersonaCard> {
    Persona::TEAM
        .iter()
        .map(|p| PersonaCard {
            name: p.name(),
            role: p.role(),
            voice: p.voice(),
            style: p.style(),
        })
        .collect()
}

/// Static description of the member the journey is written for.
#[derive(Debug, Clone, Serialize)]
pub struct MemberProfile {
    pub name: &'static str,
    pub age: u8,
    pub occupation: &'static str,
    pub residence: &'static str,
    pub personal_assistant: &'static str,
    pub health_goals: &'static [&'static str],
    pub concerns: &'static [&'static str],
    pub values: &'static str,
    pub tech_stack: &'static str,
    pub lifestyle: &'static str,
}

pub fn member_profile() -> MemberProfile {
    MemberProfile {
        name: "Rohan Patel",
        age: 46,
        occupation: "Regional Head of Sales (FinTech), frequent international travel",
        residence: "Singapore",
        personal_assistant: "Sarah Tan",
        health_goals: &[
            "Reduce risk of heart disease (family history, ApoB focus)",
            "Enhance cognitive function and focus",
            "Implement annual full-body health screenings",
        ],
        concerns: &[
            "POTS/autonomic dysfunction (dizziness, high intensity HR)",
            "Work-related stress, cognitive fatigue",
            "Lower back pain (from travel/desk work)",
            "Sleep quality issues",
            "Elevated ApoB (metabolic health)",
            "Dietary adherence due to travel/busy schedule",
        ],
        values: "Analytical, driven, values efficiency, evidence-based approaches",
        tech_stack: "Garmin watch for runs, considering Whoop/Oura, willing to share data",
        lifestyle: "Exercises mornings (20 min), occasional runs, employs a cook, ~50% plan adherence",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_known_and_unknown_roles() {
        assert_eq!(Persona::resolve("Dr. Warren"), Persona::DrWarren);
        assert_eq!(Persona::resolve("  RACHEL "), Persona::Rachel);
        assert_eq!(Persona::resolve("member"), Persona::Rohan);
        assert_eq!(Persona::resolve("assistant"), Persona::Neel);
        assert_eq!(Persona::resolve(""), Persona::Neel);
    }

    #[test]
    fn serializes_display_name() {
        let json = serde_json::to_string(&Persona::DrWarren).unwrap();
        assert_eq!(json, "\"Dr. Warren\"");
    }

    #[test]
    fn roster_excludes_member() {
        let roster = team_roster();
        assert_eq!(roster.len(), 6);
        assert!(roster.iter().all(|c| c.name != "Rohan"));
    }
}
