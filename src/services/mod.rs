//! Service layer for business logic and orchestration.
//!
//! Services sit between the repositories and the HTTP handlers. The analyzer
//! feeds the recommendation engine; the scheduler and experiment analytics
//! stand alone and share only the store and clock.

pub mod experiments;

pub mod pattern_analyzer;

pub mod recommendation;

pub mod scheduler;

pub use experiments::ExperimentAnalytics;
pub use pattern_analyzer::PatternAnalyzer;
pub use recommendation::RecommendationEngine;
pub use scheduler::SubmissionScheduler;
