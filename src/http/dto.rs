//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Domain payloads are re-exported from the models module since they already
//! derive Serialize/Deserialize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export domain payloads that travel on the wire unchanged.
pub use crate::models::{
    CalendarView, CompletedTest, Experiment, IndustryTimingPattern, NewExperiment,
    NewScheduledSubmission, NewSubmissionMetric, ProcessReport, RecommendationRequest,
    ReminderReport, ResponseType, ScheduledSubmission, SchedulingStatistics, SubmissionMetric,
    TestAnalysis, TimingRecommendation,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Request body for tracking a submission metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackMetricRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub metric: NewSubmissionMetric,
}

/// Query parameters for the segment pattern endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternQuery {
    pub industry: String,
    pub company_size: String,
}

/// Query parameters for the user correlation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorrelationQuery {
    #[serde(default)]
    pub industry: Option<String>,
}

/// Response for the latest-recommendation endpoint; an absent
/// recommendation is a valid empty result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestRecommendationResponse {
    pub recommendation: Option<TimingRecommendation>,
}

/// Request body for creating a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub schedule: NewScheduledSubmission,
}

/// Request body for rescheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub user_id: String,
    pub new_time: DateTime<Utc>,
}

/// Request body for operations that only need the owning user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerRequest {
    pub user_id: String,
}

/// Query parameters for the calendar endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarQuery {
    pub month: u32,
    pub year: i32,
}

/// Schedule listing with total count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleListResponse {
    pub schedules: Vec<ScheduledSubmission>,
    pub total: usize,
}

/// Request body for creating an experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExperimentRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub experiment: NewExperiment,
}

/// Request body for recording a test submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordTestSubmissionRequest {
    pub user_id: String,
    pub is_control_group: bool,
    pub application_id: String,
}

/// Request body for recording a test response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordTestResponseRequest {
    pub user_id: String,
    pub is_control_group: bool,
    pub response_type: ResponseType,
}

/// Query parameters naming the owning user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerQuery {
    pub user_id: String,
}

/// Experiment listing with total count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentListResponse {
    pub experiments: Vec<Experiment>,
    pub total: usize,
}

/// Query parameters for the timing breakdown endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimingBreakdownQuery {
    #[serde(default)]
    pub days: Option<i64>,
}
