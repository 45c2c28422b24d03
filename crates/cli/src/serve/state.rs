//! Application state.

use careline_core::JourneyConfig;

/// Shared across request handlers. Read-only: each request builds its own
/// journey context, so nothing here is mutated after startup.
pub(crate) struct AppState {
    /// Base configuration for generated journeys.
    pub(crate) config: JourneyConfig,
}

impl AppState {
    pub(crate) fn new(config: JourneyConfig) -> Self {
        Self { config }
    }
}
