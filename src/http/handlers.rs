//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to one public service method and performs only
//! user resolution and JSON shape-mapping before delegating to the service
//! layer.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use super::dto::{
    CalendarQuery, CorrelationQuery, CreateExperimentRequest, CreateScheduleRequest,
    ExperimentListResponse, HealthResponse, LatestRecommendationResponse, OwnerQuery,
    OwnerRequest, PatternQuery, RecordTestResponseRequest, RecordTestSubmissionRequest,
    RescheduleRequest, ScheduleListResponse, TimingBreakdownQuery, TrackMetricRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::correlation::{AnalysisOutcome, CorrelationAnalysis, TimingBreakdown};
use crate::models::{
    CalendarView, CompletedTest, Experiment, IndustryTimingPattern, ProcessReport,
    RecommendationRequest, ReminderReport, ScheduledSubmission, SchedulingStatistics,
    SubmissionMetric, TestAnalysis, TimingRecommendation,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Pattern Analysis
// =============================================================================

/// POST /v1/metrics
pub async fn track_metric(
    State(state): State<AppState>,
    Json(request): Json<TrackMetricRequest>,
) -> HandlerResult<SubmissionMetric> {
    let metric = state
        .analyzer()
        .track_submission(&request.user_id, request.metric)
        .await?;
    Ok(Json(metric))
}

/// GET /v1/patterns
pub async fn get_pattern(
    State(state): State<AppState>,
    Query(query): Query<PatternQuery>,
) -> HandlerResult<IndustryTimingPattern> {
    let pattern = state
        .analyzer()
        .analyze_industry_patterns(&query.industry, &query.company_size)
        .await?;
    Ok(Json(pattern))
}

/// GET /v1/users/{user_id}/correlation
pub async fn get_user_correlation(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<CorrelationQuery>,
) -> HandlerResult<AnalysisOutcome<CorrelationAnalysis>> {
    let outcome = state
        .analyzer()
        .calculate_timing_correlation(&user_id, query.industry.as_deref())
        .await?;
    Ok(Json(outcome))
}

// =============================================================================
// Recommendations
// =============================================================================

/// POST /v1/users/{user_id}/recommendations
pub async fn create_recommendation(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<RecommendationRequest>,
) -> HandlerResult<TimingRecommendation> {
    let engine = state.engine();
    let recommendation = engine.generate_recommendation(&user_id, &request).await?;
    engine.save_recommendation(&recommendation).await?;
    Ok(Json(recommendation))
}

/// GET /v1/users/{user_id}/recommendations/latest
pub async fn get_latest_recommendation(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<LatestRecommendationResponse> {
    let recommendation = state.engine().get_latest_recommendation(&user_id).await?;
    Ok(Json(LatestRecommendationResponse { recommendation }))
}

// =============================================================================
// Scheduling
// =============================================================================

/// POST /v1/schedules
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(request): Json<CreateScheduleRequest>,
) -> HandlerResult<ScheduledSubmission> {
    let schedule = state
        .scheduler()
        .schedule_submission(&request.user_id, request.schedule)
        .await?;
    Ok(Json(schedule))
}

/// GET /v1/users/{user_id}/schedules
pub async fn list_schedules(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<ScheduleListResponse> {
    let schedules = state
        .scheduler()
        .get_user_scheduled_submissions(&user_id)
        .await?;
    let total = schedules.len();
    Ok(Json(ScheduleListResponse { schedules, total }))
}

/// GET /v1/users/{user_id}/schedules/upcoming
pub async fn upcoming_schedules(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<ScheduleListResponse> {
    let schedules = state.scheduler().get_upcoming_submissions(&user_id).await?;
    let total = schedules.len();
    Ok(Json(ScheduleListResponse { schedules, total }))
}

/// POST /v1/schedules/{id}/reschedule
pub async fn reschedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RescheduleRequest>,
) -> HandlerResult<ScheduledSubmission> {
    let schedule = state
        .scheduler()
        .reschedule_submission(&request.user_id, id, request.new_time)
        .await?;
    Ok(Json(schedule))
}

/// POST /v1/schedules/{id}/cancel
pub async fn cancel_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<OwnerRequest>,
) -> HandlerResult<ScheduledSubmission> {
    let schedule = state
        .scheduler()
        .cancel_schedule(&request.user_id, id)
        .await?;
    Ok(Json(schedule))
}

/// POST /v1/schedules/process
///
/// Periodic trigger: transition all due submissions.
pub async fn process_schedules(State(state): State<AppState>) -> HandlerResult<ProcessReport> {
    let report = state.scheduler().process_scheduled_submissions().await?;
    Ok(Json(report))
}

/// POST /v1/schedules/reminders
///
/// Periodic trigger: mark reminders whose window has opened.
pub async fn send_reminders(State(state): State<AppState>) -> HandlerResult<ReminderReport> {
    let report = state.scheduler().send_reminders().await?;
    Ok(Json(report))
}

/// GET /v1/users/{user_id}/calendar
pub async fn calendar_view(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> HandlerResult<CalendarView> {
    let view = state
        .scheduler()
        .get_calendar_view(&user_id, query.month, query.year)
        .await?;
    Ok(Json(view))
}

/// GET /v1/users/{user_id}/schedules/statistics
pub async fn scheduling_statistics(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<SchedulingStatistics> {
    let stats = state.scheduler().get_scheduling_statistics(&user_id).await?;
    Ok(Json(stats))
}

// =============================================================================
// Experiments
// =============================================================================

/// POST /v1/experiments
pub async fn create_experiment(
    State(state): State<AppState>,
    Json(request): Json<CreateExperimentRequest>,
) -> HandlerResult<Experiment> {
    let experiment = state
        .experiments()
        .create_ab_test(&request.user_id, request.experiment)
        .await?;
    Ok(Json(experiment))
}

/// POST /v1/experiments/{id}/submissions
pub async fn record_test_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordTestSubmissionRequest>,
) -> HandlerResult<Experiment> {
    let experiment = state
        .experiments()
        .record_test_submission(
            &request.user_id,
            id,
            request.is_control_group,
            &request.application_id,
        )
        .await?;
    Ok(Json(experiment))
}

/// POST /v1/experiments/{id}/responses
pub async fn record_test_response(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordTestResponseRequest>,
) -> HandlerResult<Experiment> {
    let experiment = state
        .experiments()
        .record_test_response(
            &request.user_id,
            id,
            request.is_control_group,
            request.response_type,
        )
        .await?;
    Ok(Json(experiment))
}

/// GET /v1/experiments/{id}/analysis
pub async fn analyze_experiment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<OwnerQuery>,
) -> HandlerResult<TestAnalysis> {
    let analysis = state
        .experiments()
        .analyze_test_results(&query.user_id, id)
        .await?;
    Ok(Json(analysis))
}

/// POST /v1/experiments/{id}/complete
pub async fn complete_experiment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<OwnerRequest>,
) -> HandlerResult<CompletedTest> {
    let completed = state
        .experiments()
        .complete_test(&request.user_id, id)
        .await?;
    Ok(Json(completed))
}

/// GET /v1/users/{user_id}/experiments
pub async fn list_experiments(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<ExperimentListResponse> {
    let experiments = state.experiments().get_test_history(&user_id).await?;
    let total = experiments.len();
    Ok(Json(ExperimentListResponse { experiments, total }))
}

/// GET /v1/users/{user_id}/timing-correlation
pub async fn timing_breakdown(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<TimingBreakdownQuery>,
) -> HandlerResult<AnalysisOutcome<TimingBreakdown>> {
    let outcome = state
        .experiments()
        .track_timing_correlation(&user_id, query.days)
        .await?;
    Ok(Json(outcome))
}
