//! Application state for the HTTP server.

use std::sync::Arc;

use crate::clock::Clock;
use crate::db::repository::FullRepository;
use crate::services::{
    ExperimentAnalytics, PatternAnalyzer, RecommendationEngine, SubmissionScheduler,
};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for store operations
    pub repository: Arc<dyn FullRepository>,
    /// Time source shared by all services
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create a new application state with the given repository and clock.
    pub fn new(repository: Arc<dyn FullRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub fn analyzer(&self) -> PatternAnalyzer {
        PatternAnalyzer::new(self.repository.clone())
    }

    pub fn engine(&self) -> RecommendationEngine {
        RecommendationEngine::new(self.repository.clone(), self.clock.clone())
    }

    pub fn scheduler(&self) -> SubmissionScheduler {
        SubmissionScheduler::new(self.repository.clone(), self.clock.clone())
    }

    pub fn experiments(&self) -> ExperimentAnalytics {
        ExperimentAnalytics::new(self.repository.clone(), self.clock.clone())
    }
}
