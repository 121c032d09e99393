//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap and Vec structures, providing fast, deterministic,
//! and isolated execution.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::db::repository::*;
use crate::models::{
    Experiment, IndustryTimingPattern, ScheduleStatus, ScheduledSubmission, SubmissionMetric,
    TestGroup, TimingRecommendation,
};

/// In-memory local repository.
///
/// All collections live behind one `RwLock`, which also makes the experiment
/// tally increments atomic: a recording takes the write lock, bumps the
/// counter, and recomputes rates before anyone else can read the row.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    metrics: Vec<SubmissionMetric>,
    patterns: HashMap<(String, String), IndustryTimingPattern>,
    recommendations: Vec<TimingRecommendation>,
    schedules: HashMap<Uuid, ScheduledSubmission>,
    experiments: HashMap<Uuid, Experiment>,

    // Connection health
    is_healthy: bool,

    // Schedule ids that fail on update, for batch error-path tests
    failing_schedule_updates: Vec<Uuid>,
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                is_healthy: true,
                ..Default::default()
            })),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write().unwrap();
        data.is_healthy = healthy;
    }

    /// Make updates to one schedule id fail, to exercise per-item error
    /// collection in the periodic batch operations.
    pub fn fail_schedule_updates(&self, id: Uuid) {
        let mut data = self.data.write().unwrap();
        data.failing_schedule_updates.push(id);
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        let healthy = data.is_healthy;
        *data = LocalData {
            is_healthy: healthy,
            ..Default::default()
        };
    }

    /// Number of stored submission metrics.
    pub fn metric_count(&self) -> usize {
        self.data.read().unwrap().metrics.len()
    }

    /// Number of stored schedules.
    pub fn schedule_count(&self) -> usize {
        self.data.read().unwrap().schedules.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        let data = self.data.read().unwrap();
        if !data.is_healthy {
            return Err(RepositoryError::connection("Store is not healthy"));
        }
        Ok(())
    }

    fn missing_schedule(id: Uuid) -> RepositoryError {
        RepositoryError::not_found_with_context(
            "Scheduled submission not found",
            ErrorContext::new("get_schedule")
                .with_entity("scheduled_submission")
                .with_entity_id(id),
        )
    }

    fn missing_experiment(id: Uuid) -> RepositoryError {
        RepositoryError::not_found_with_context(
            "Experiment not found",
            ErrorContext::new("get_experiment")
                .with_entity("experiment")
                .with_entity_id(id),
        )
    }
}

#[async_trait]
impl MetricsRepository for LocalRepository {
    async fn store_metric(&self, metric: &SubmissionMetric) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        data.metrics.push(metric.clone());
        Ok(())
    }

    async fn list_user_metrics(
        &self,
        user_id: &str,
        industry: Option<&str>,
    ) -> RepositoryResult<Vec<SubmissionMetric>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .metrics
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter(|m| industry.is_none_or(|i| m.industry == i))
            .cloned()
            .collect())
    }

    async fn list_user_metrics_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> RepositoryResult<Vec<SubmissionMetric>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .metrics
            .iter()
            .filter(|m| m.user_id == user_id && m.submitted_at >= since)
            .cloned()
            .collect())
    }

    async fn list_segment_metrics(
        &self,
        industry: &str,
        company_size: &str,
    ) -> RepositoryResult<Vec<SubmissionMetric>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .metrics
            .iter()
            .filter(|m| m.industry == industry && m.company_size == company_size)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PatternRepository for LocalRepository {
    async fn find_pattern(
        &self,
        industry: &str,
        company_size: &str,
    ) -> RepositoryResult<Option<IndustryTimingPattern>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .patterns
            .get(&(industry.to_string(), company_size.to_string()))
            .cloned())
    }

    async fn store_pattern(&self, pattern: &IndustryTimingPattern) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        data.patterns.insert(
            (pattern.industry.clone(), pattern.company_size.clone()),
            pattern.clone(),
        );
        Ok(())
    }
}

#[async_trait]
impl RecommendationRepository for LocalRepository {
    async fn store_recommendation(
        &self,
        recommendation: &TimingRecommendation,
    ) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        data.recommendations.push(recommendation.clone());
        Ok(())
    }

    async fn latest_valid_recommendation(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Option<TimingRecommendation>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .recommendations
            .iter()
            .filter(|r| r.user_id == user_id && r.valid_until > now)
            .max_by_key(|r| r.created_at)
            .cloned())
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn insert_schedule(&self, schedule: &ScheduledSubmission) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        data.schedules.insert(schedule.id, schedule.clone());
        Ok(())
    }

    async fn get_schedule(
        &self,
        user_id: &str,
        id: Uuid,
    ) -> RepositoryResult<ScheduledSubmission> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        data.schedules
            .get(&id)
            .filter(|s| s.user_id == user_id)
            .cloned()
            .ok_or_else(|| Self::missing_schedule(id))
    }

    async fn update_schedule(&self, schedule: &ScheduledSubmission) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        if data.failing_schedule_updates.contains(&schedule.id) {
            return Err(RepositoryError::query(format!(
                "Simulated update failure for schedule {}",
                schedule.id
            )));
        }
        if !data.schedules.contains_key(&schedule.id) {
            return Err(Self::missing_schedule(schedule.id));
        }
        data.schedules.insert(schedule.id, schedule.clone());
        Ok(())
    }

    async fn list_user_schedules(
        &self,
        user_id: &str,
    ) -> RepositoryResult<Vec<ScheduledSubmission>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut schedules: Vec<ScheduledSubmission> = data
            .schedules
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        schedules.sort_by_key(|s| s.scheduled_submit_time);
        Ok(schedules)
    }

    async fn list_due_schedules(
        &self,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Vec<ScheduledSubmission>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut due: Vec<ScheduledSubmission> = data
            .schedules
            .values()
            .filter(|s| s.status == ScheduleStatus::Scheduled && s.scheduled_submit_time <= now)
            .cloned()
            .collect();
        due.sort_by_key(|s| s.scheduled_submit_time);
        Ok(due)
    }

    async fn list_reminder_candidates(&self) -> RepositoryResult<Vec<ScheduledSubmission>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut candidates: Vec<ScheduledSubmission> = data
            .schedules
            .values()
            .filter(|s| {
                s.status == ScheduleStatus::Scheduled
                    && s.send_reminder
                    && s.reminder_sent_at.is_none()
            })
            .cloned()
            .collect();
        candidates.sort_by_key(|s| s.scheduled_submit_time);
        Ok(candidates)
    }
}

#[async_trait]
impl ExperimentRepository for LocalRepository {
    async fn insert_experiment(&self, experiment: &Experiment) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        data.experiments.insert(experiment.id, experiment.clone());
        Ok(())
    }

    async fn get_experiment(&self, user_id: &str, id: Uuid) -> RepositoryResult<Experiment> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        data.experiments
            .get(&id)
            .filter(|e| e.user_id == user_id)
            .cloned()
            .ok_or_else(|| Self::missing_experiment(id))
    }

    async fn update_experiment(&self, experiment: &Experiment) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        if !data.experiments.contains_key(&experiment.id) {
            return Err(Self::missing_experiment(experiment.id));
        }
        data.experiments.insert(experiment.id, experiment.clone());
        Ok(())
    }

    async fn list_user_experiments(&self, user_id: &str) -> RepositoryResult<Vec<Experiment>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut experiments: Vec<Experiment> = data
            .experiments
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        experiments.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(experiments)
    }

    async fn record_submission(
        &self,
        user_id: &str,
        id: Uuid,
        group: TestGroup,
    ) -> RepositoryResult<Experiment> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        let experiment = data
            .experiments
            .get_mut(&id)
            .filter(|e| e.user_id == user_id)
            .ok_or_else(|| Self::missing_experiment(id))?;
        match group {
            TestGroup::Control => experiment.control_submissions += 1,
            TestGroup::Variant => experiment.variant_submissions += 1,
        }
        experiment.recompute_rates(group);
        Ok(experiment.clone())
    }

    async fn record_response(
        &self,
        user_id: &str,
        id: Uuid,
        group: TestGroup,
        interview: bool,
    ) -> RepositoryResult<Experiment> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        let experiment = data
            .experiments
            .get_mut(&id)
            .filter(|e| e.user_id == user_id)
            .ok_or_else(|| Self::missing_experiment(id))?;
        match group {
            TestGroup::Control => {
                experiment.control_responses += 1;
                if interview {
                    experiment.control_interviews += 1;
                }
            }
            TestGroup::Variant => {
                experiment.variant_responses += 1;
                if interview {
                    experiment.variant_interviews += 1;
                }
            }
        }
        experiment.recompute_rates(group);
        Ok(experiment.clone())
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read().unwrap();
        Ok(data.is_healthy)
    }
}
