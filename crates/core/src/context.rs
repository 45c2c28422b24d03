//! Per-journey mutable state, threaded explicitly through every call.

use rand::Rng;

use crate::metrics::MetricSnapshot;
use crate::templates::{ExhaustionStrategy, PoolKey, TemplateBook};
use crate::topic::TopicMemory;

/// Everything one generation run mutates.
///
/// Built fresh per request and dropped at the end; nothing here is shared
/// between runs.
pub struct JourneyContext<R> {
    pub rng: R,
    pub metrics: MetricSnapshot,
    pub templates: TemplateBook,
    pub topics: TopicMemory,
    /// Current 1-based simulated week (0 during onboarding).
    pub week: u32,
}

impl<R: Rng> JourneyContext<R> {
    pub fn new(rng: R, strategy: ExhaustionStrategy) -> Self {
        JourneyContext {
            rng,
            metrics: MetricSnapshot::baseline(),
            templates: TemplateBook::new(strategy),
            topics: TopicMemory::new(),
            week: 0,
        }
    }

    pub fn with_metrics(mut self, metrics: MetricSnapshot) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn pick(&mut self, key: PoolKey) -> String {
        self.templates.pick(key, &mut self.rng)
    }
}
