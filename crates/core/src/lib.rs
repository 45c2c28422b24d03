//! careline-core: synthetic health-coaching journeys.
//!
//! Generates a dated transcript between a member and a care team, with a
//! simulated health-metric state evolving week by week, and answers
//! keyword "explain" queries against a generated journey.
//!
//! # Public API
//!
//! - [`generate()`] -- run the weekly synthesizer for a [`JourneyConfig`]
//! - [`explain()`] -- retrieve or synthesize an [`Explanation`]
//! - [`JourneyContext`] -- per-run state; its `respond` methods are the
//!   response generator
//! - [`sentiment::classify`] -- keyword sentiment tagger
//!
//! Nothing here performs I/O; every run owns its own state.

mod catalog;
pub mod context;
pub mod error;
pub mod event;
pub mod explain;
pub mod knowledge;
pub mod metrics;
pub mod persona;
pub mod respond;
pub mod sentiment;
pub mod synth;
pub mod templates;
pub mod topic;

// ── Convenience re-exports ───────────────────────────────────────────

pub use context::JourneyContext;
pub use error::JourneyError;
pub use event::{Event, EventKind, InteractionType};
pub use explain::{explain, Explanation, ExplanationSource};
pub use metrics::{MetricSnapshot, Severity};
pub use persona::{Persona, VoiceStyle};
pub use respond::Reply;
pub use sentiment::Sentiment;
pub use synth::{generate, DriftPolicy, Journey, JourneyConfig, SplitJourney};
pub use templates::ExhaustionStrategy;
pub use topic::Topic;
