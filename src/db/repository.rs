//! Repository trait definitions.
//!
//! The store contract covers five logical collections: submission metrics,
//! industry patterns, recommendations, scheduled submissions, and
//! experiments. Each trait exposes insert, owner-scoped point lookup,
//! filtered list, and update-by-id; experiment tallies additionally get
//! atomic increment operations so concurrent recordings never lose counts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Experiment, IndustryTimingPattern, ScheduledSubmission, SubmissionMetric, TestGroup,
    TimingRecommendation,
};

pub use super::error::{ErrorContext, RepositoryError, RepositoryResult};

/// Historical submission facts.
#[async_trait]
pub trait MetricsRepository: Send + Sync {
    /// Persist one submission metric.
    async fn store_metric(&self, metric: &SubmissionMetric) -> RepositoryResult<()>;

    /// All metrics for a user, optionally restricted to one industry.
    async fn list_user_metrics(
        &self,
        user_id: &str,
        industry: Option<&str>,
    ) -> RepositoryResult<Vec<SubmissionMetric>>;

    /// Metrics for a user submitted at or after `since`.
    async fn list_user_metrics_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> RepositoryResult<Vec<SubmissionMetric>>;

    /// All metrics across users for an (industry, company-size) segment.
    async fn list_segment_metrics(
        &self,
        industry: &str,
        company_size: &str,
    ) -> RepositoryResult<Vec<SubmissionMetric>>;
}

/// Precomputed per-segment timing patterns.
#[async_trait]
pub trait PatternRepository: Send + Sync {
    /// Exact-key lookup; `None` when no precomputed row exists.
    async fn find_pattern(
        &self,
        industry: &str,
        company_size: &str,
    ) -> RepositoryResult<Option<IndustryTimingPattern>>;

    /// Insert or replace the pattern row for its segment key.
    async fn store_pattern(&self, pattern: &IndustryTimingPattern) -> RepositoryResult<()>;
}

/// Persisted timing recommendations.
#[async_trait]
pub trait RecommendationRepository: Send + Sync {
    async fn store_recommendation(
        &self,
        recommendation: &TimingRecommendation,
    ) -> RepositoryResult<()>;

    /// Newest recommendation with `valid_until > now`, or `None`.
    /// Absence is a valid empty result, never an error.
    async fn latest_valid_recommendation(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Option<TimingRecommendation>>;
}

/// Scheduled future submissions.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn insert_schedule(&self, schedule: &ScheduledSubmission) -> RepositoryResult<()>;

    /// Owner-scoped point lookup; missing rows propagate as `NotFound`.
    async fn get_schedule(&self, user_id: &str, id: Uuid)
        -> RepositoryResult<ScheduledSubmission>;

    /// Update-by-id; the row must already exist.
    async fn update_schedule(&self, schedule: &ScheduledSubmission) -> RepositoryResult<()>;

    /// All schedules for a user, ascending by scheduled time.
    async fn list_user_schedules(
        &self,
        user_id: &str,
    ) -> RepositoryResult<Vec<ScheduledSubmission>>;

    /// All `scheduled` rows (any user) due at or before `now`, for the
    /// externally triggered processing pass.
    async fn list_due_schedules(
        &self,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Vec<ScheduledSubmission>>;

    /// All `scheduled` rows with reminders enabled and not yet sent.
    async fn list_reminder_candidates(&self) -> RepositoryResult<Vec<ScheduledSubmission>>;
}

/// Timing experiments with atomic tally updates.
#[async_trait]
pub trait ExperimentRepository: Send + Sync {
    async fn insert_experiment(&self, experiment: &Experiment) -> RepositoryResult<()>;

    /// Owner-scoped point lookup; missing rows propagate as `NotFound`.
    async fn get_experiment(&self, user_id: &str, id: Uuid) -> RepositoryResult<Experiment>;

    async fn update_experiment(&self, experiment: &Experiment) -> RepositoryResult<()>;

    /// Experiments for a user, newest first.
    async fn list_user_experiments(&self, user_id: &str) -> RepositoryResult<Vec<Experiment>>;

    /// Atomically increment one group's submission counter and recompute its
    /// rates. Returns the updated experiment.
    async fn record_submission(
        &self,
        user_id: &str,
        id: Uuid,
        group: TestGroup,
    ) -> RepositoryResult<Experiment>;

    /// Atomically increment one group's response counter (and interview
    /// counter when `interview` is set) and recompute its rates.
    async fn record_response(
        &self,
        user_id: &str,
        id: Uuid,
        group: TestGroup,
        interview: bool,
    ) -> RepositoryResult<Experiment>;
}

/// Combined repository interface implemented by each backend.
#[async_trait]
pub trait FullRepository:
    MetricsRepository
    + PatternRepository
    + RecommendationRepository
    + ScheduleRepository
    + ExperimentRepository
{
    /// Whether the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
