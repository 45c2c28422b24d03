//! Keyword sentiment tagger.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mood label attached to messages and explain queries.
///
/// Deserialization is lenient: unknown labels read as `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Sentiment {
    Angry,
    Sad,
    Frustrated,
    Curious,
    Nonchalant,
    Positive,
    #[default]
    Neutral,
}

/// Checked in order; the first group with a hit wins.
const KEYWORDS: &[(Sentiment, &[&str])] = &[
    (
        Sentiment::Angry,
        &["furious", "angry", "outraged", "livid", "unacceptable", "ridiculous", "pissed"],
    ),
    (
        Sentiment::Sad,
        &["sad", "feeling down", "depressed", "hopeless", "discouraged", "miserable", "disappointed"],
    ),
    (
        Sentiment::Frustrated,
        &["frustrat", "annoyed", "fed up", "stuck", "slipped", "flared", "aggravating", "upset"],
    ),
    (
        Sentiment::Curious,
        &["why", "how ", "what", "wonder", "curious", "explain", "confused", "unclear", "?"],
    ),
    (
        Sentiment::Positive,
        &["great", "good", "happy", "thanks", "progress", "better", "excited", "love", "improv"],
    ),
    (
        Sentiment::Nonchalant,
        &["whatever", "no big deal", "meh", "don't care", "not fussed"],
    ),
];

/// Classify free text into exactly one label. Empty input is neutral.
pub fn classify(text: &str) -> Sentiment {
    let lowered = text.to_lowercase();
    if lowered.trim().is_empty() {
        return Sentiment::Neutral;
    }
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(label, _)| *label)
        .unwrap_or(Sentiment::Neutral)
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Angry => "angry",
            Sentiment::Sad => "sad",
            Sentiment::Frustrated => "frustrated",
            Sentiment::Curious => "curious",
            Sentiment::Nonchalant => "nonchalant",
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
        }
    }

    pub fn is_negative(self) -> bool {
        matches!(
            self,
            Sentiment::Angry | Sentiment::Sad | Sentiment::Frustrated
        )
    }

    /// Empathetic opener used by explanations.
    pub fn opener(self) -> &'static str {
        match self {
            Sentiment::Angry | Sentiment::Sad | Sentiment::Frustrated => {
                "I understand your frustration, and I want to walk you through it. "
            }
            Sentiment::Curious => "Great question. ",
            Sentiment::Positive => "Great observation. ",
            Sentiment::Nonchalant | Sentiment::Neutral => "Here's the context: ",
        }
    }
}

impl From<String> for Sentiment {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "angry" => Sentiment::Angry,
            "sad" => Sentiment::Sad,
            "frustrated" => Sentiment::Frustrated,
            "curious" => Sentiment::Curious,
            "nonchalant" => Sentiment::Nonchalant,
            "positive" => Sentiment::Positive,
            _ => Sentiment::Neutral,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_examples() {
        assert_eq!(classify("I'm furious about this"), Sentiment::Angry);
        assert_eq!(classify("why did this happen"), Sentiment::Curious);
        assert_eq!(classify(""), Sentiment::Neutral);
        assert_eq!(classify("   \t"), Sentiment::Neutral);
    }

    #[test]
    fn negative_beats_curiosity() {
        assert_eq!(
            classify("Why is this so ridiculous?"),
            Sentiment::Angry
        );
        assert_eq!(
            classify("Adherence slipped this week, what now?"),
            Sentiment::Frustrated
        );
    }

    #[test]
    fn case_insensitive_positive_and_fallback() {
        assert_eq!(classify("GREAT progress this month"), Sentiment::Positive);
        assert_eq!(classify("Meh, no big deal"), Sentiment::Nonchalant);
        assert_eq!(classify("Booked the lab slot."), Sentiment::Neutral);
    }

    #[test]
    fn lenient_label_parsing() {
        let s: Sentiment = serde_json::from_str("\"Curious\"").unwrap();
        assert_eq!(s, Sentiment::Curious);
        let s: Sentiment = serde_json::from_str("\"ecstatic\"").unwrap();
        assert_eq!(s, Sentiment::Neutral);
    }
}
