//! Template pools with within-run de-duplication.
//!
//! A [`TemplateBook`] is created fresh for each journey. Pools are built
//! lazily from the static phrase catalog the first time a key is used.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::persona::{Persona, VoiceStyle};
use crate::topic::Topic;

/// What a pool does once every candidate has been used this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExhaustionStrategy {
    /// Clear the used-set and start over.
    #[default]
    Recycle,
    /// Start over, but stamp reused strings with their cycle number.
    Stamp,
}

/// Identifies one pool of candidate strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKey {
    /// Follow-up questions closing a team reply.
    FollowUp(VoiceStyle),
    /// Member utterances for a topic.
    Member(Topic),
    /// Proactive check-in openers for a team persona.
    CheckIn(Persona),
    /// Generic reply body for a team persona.
    Fallback(Persona),
    /// Lead sentence for explanations.
    ExplainLead,
    TravelDestination,
    TravelContext,
}

/// Candidate strings plus the indices already used this run.
#[derive(Debug, Clone)]
pub struct TemplatePool {
    candidates: &'static [&'static str],
    used: HashSet<usize>,
    cycles: u32,
}

impl TemplatePool {
    /// Panics if `candidates` is empty; every catalog list is non-empty.
    pub fn new(candidates: &'static [&'static str]) -> Self {
        assert!(!candidates.is_empty(), "template pool must not be empty");
        TemplatePool {
            candidates,
            used: HashSet::new(),
            cycles: 0,
        }
    }

    /// Pick uniformly among unused candidates and mark the pick used.
    pub fn pick<R: Rng + ?Sized>(&mut self, rng: &mut R, strategy: ExhaustionStrategy) -> String {
        if self.used.len() >= self.candidates.len() {
            self.used.clear();
            self.cycles += 1;
        }
        let fresh: Vec<usize> = (0..self.candidates.len())
            .filter(|i| !self.used.contains(i))
            .collect();
        let idx = fresh[rng.gen_range(0..fresh.len())];
        self.used.insert(idx);

        let text = self.candidates[idx];
        match strategy {
            ExhaustionStrategy::Stamp if self.cycles > 0 => {
                format!("{} (variant {})", text, self.cycles + 1)
            }
            _ => text.to_string(),
        }
    }
}

/// All pools for one journey.
#[derive(Debug, Clone, Default)]
pub struct TemplateBook {
    pools: HashMap<PoolKey, TemplatePool>,
    strategy: ExhaustionStrategy,
}

impl TemplateBook {
    pub fn new(strategy: ExhaustionStrategy) -> Self {
        TemplateBook {
            pools: HashMap::new(),
            strategy,
        }
    }

    pub fn pick<R: Rng + ?Sized>(&mut self, key: PoolKey, rng: &mut R) -> String {
        let strategy = self.strategy;
        self.pools
            .entry(key)
            .or_insert_with(|| TemplatePool::new(catalog::phrases(key)))
            .pick(rng, strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const POOL: &[&str] = &["alpha", "beta", "gamma"];

    #[test]
    fn no_repeats_within_a_cycle() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pool = TemplatePool::new(POOL);
        let mut seen: Vec<String> = (0..3)
            .map(|_| pool.pick(&mut rng, ExhaustionStrategy::Recycle))
            .collect();
        seen.sort();
        assert_eq!(seen, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn recycle_reuses_after_exhaustion() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut pool = TemplatePool::new(POOL);
        for _ in 0..10 {
            let s = pool.pick(&mut rng, ExhaustionStrategy::Recycle);
            assert!(POOL.contains(&s.as_str()));
        }
    }

    #[test]
    fn stamp_marks_reused_strings() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut pool = TemplatePool::new(POOL);
        let first: Vec<String> = (0..3)
            .map(|_| pool.pick(&mut rng, ExhaustionStrategy::Stamp))
            .collect();
        assert!(first.iter().all(|s| !s.contains("variant")));
        let fourth = pool.pick(&mut rng, ExhaustionStrategy::Stamp);
        assert!(fourth.ends_with("(variant 2)"), "{}", fourth);
    }

    #[test]
    fn every_catalog_pool_is_usable() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut book = TemplateBook::new(ExhaustionStrategy::Recycle);
        for style in [
            VoiceStyle::Warm,
            VoiceStyle::Clinical,
            VoiceStyle::Analytical,
            VoiceStyle::Coach,
            VoiceStyle::Direct,
            VoiceStyle::Reassuring,
        ] {
            for _ in 0..8 {
                assert!(!book.pick(PoolKey::FollowUp(style), &mut rng).is_empty());
            }
        }
        for persona in Persona::TEAM {
            assert!(!book.pick(PoolKey::CheckIn(persona), &mut rng).is_empty());
            assert!(!book.pick(PoolKey::Fallback(persona), &mut rng).is_empty());
        }
    }
}
