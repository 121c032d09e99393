//! Repository contract tests against the local backend.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use ato_rust::db::repositories::LocalRepository;
use ato_rust::db::repository::{
    ExperimentRepository, FullRepository, MetricsRepository, RecommendationRepository,
    ScheduleRepository,
};
use ato_rust::db::{BackendKind, RepositoryConfig, RepositoryFactory};
use ato_rust::models::{
    Experiment, ExperimentStatus, NewSubmissionMetric, ScheduleStatus, ScheduledSubmission,
    SubmissionMetric, TestGroup, TimingRecommendation,
};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap()
}

fn metric(user: &str, industry: &str, at: chrono::DateTime<Utc>) -> SubmissionMetric {
    SubmissionMetric::from_new(
        user,
        NewSubmissionMetric {
            application_id: "app".to_string(),
            submitted_at: at,
            industry: industry.to_string(),
            company_size: "startup".to_string(),
            got_interview: true,
            response_time_hours: None,
        },
    )
}

fn schedule(user: &str, at: chrono::DateTime<Utc>) -> ScheduledSubmission {
    ScheduledSubmission {
        id: Uuid::new_v4(),
        user_id: user.to_string(),
        application_id: "app".to_string(),
        scheduled_submit_time: at,
        status: ScheduleStatus::Scheduled,
        send_reminder: true,
        reminder_minutes_before: 30,
        reminder_sent_at: None,
        previous_scheduled_time: None,
        is_rescheduled: false,
        scheduling_reason: None,
        actual_submit_time: None,
        created_at: at - Duration::days(1),
    }
}

fn experiment(user: &str) -> Experiment {
    Experiment {
        id: Uuid::new_v4(),
        user_id: user.to_string(),
        test_name: "t".to_string(),
        control_timing: "Tuesday 9 AM".to_string(),
        variant_timing: "Thursday 2 PM".to_string(),
        test_duration_days: 30,
        minimum_sample_size: 20,
        status: ExperimentStatus::Active,
        control_submissions: 0,
        control_responses: 0,
        control_interviews: 0,
        control_response_rate: 0.0,
        control_interview_rate: 0.0,
        variant_submissions: 0,
        variant_responses: 0,
        variant_interviews: 0,
        variant_response_rate: 0.0,
        variant_interview_rate: 0.0,
        p_value: None,
        is_significant: None,
        winning_variant: None,
        recommendation_text: None,
        started_at: now(),
        ended_at: None,
    }
}

fn recommendation(user: &str, created_at: chrono::DateTime<Utc>) -> TimingRecommendation {
    TimingRecommendation {
        user_id: user.to_string(),
        recommended_day: "Tuesday".to_string(),
        recommended_time_range: "9-11 AM".to_string(),
        reasoning: String::new(),
        warnings: vec![],
        current_recommendation: String::new(),
        time_until_optimal_minutes: 0,
        estimated_improvement_rate: 25.0,
        confidence_level: 0.5,
        historical_success_rate: 0.15,
        created_at,
        valid_until: TimingRecommendation::expiry(created_at),
    }
}

#[tokio::test]
async fn test_factory_builds_configured_backend() {
    let config = RepositoryConfig::default();
    assert_eq!(config.backend, BackendKind::Local);
    let repo = RepositoryFactory::create(&config).unwrap();
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_metric_queries_are_owner_scoped() {
    let repo = LocalRepository::new();
    repo.store_metric(&metric("u1", "Technology", now())).await.unwrap();
    repo.store_metric(&metric("u1", "Finance", now())).await.unwrap();
    repo.store_metric(&metric("u2", "Technology", now())).await.unwrap();

    assert_eq!(repo.list_user_metrics("u1", None).await.unwrap().len(), 2);
    assert_eq!(
        repo.list_user_metrics("u1", Some("Finance")).await.unwrap().len(),
        1
    );
    assert_eq!(repo.list_user_metrics("u3", None).await.unwrap().len(), 0);

    // Segment queries aggregate across users.
    assert_eq!(
        repo.list_segment_metrics("Technology", "startup").await.unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_metrics_since_filters_by_time() {
    let repo = LocalRepository::new();
    repo.store_metric(&metric("u1", "Technology", now())).await.unwrap();
    repo.store_metric(&metric("u1", "Technology", now() - Duration::days(40)))
        .await
        .unwrap();

    let recent = repo
        .list_user_metrics_since("u1", now() - Duration::days(30))
        .await
        .unwrap();
    assert_eq!(recent.len(), 1);
}

#[tokio::test]
async fn test_latest_recommendation_picks_newest_valid() {
    let repo = LocalRepository::new();
    repo.store_recommendation(&recommendation("u1", now() - Duration::days(3)))
        .await
        .unwrap();
    let mut newer = recommendation("u1", now() - Duration::days(1));
    newer.recommended_day = "Wednesday".to_string();
    repo.store_recommendation(&newer).await.unwrap();
    // Expired row, ignored even though newest by creation among expired.
    repo.store_recommendation(&recommendation("u1", now() - Duration::days(30)))
        .await
        .unwrap();

    let latest = repo.latest_valid_recommendation("u1", now()).await.unwrap();
    assert_eq!(latest.unwrap().recommended_day, "Wednesday");

    let other = repo.latest_valid_recommendation("u2", now()).await.unwrap();
    assert!(other.is_none());
}

#[tokio::test]
async fn test_due_and_reminder_listings() {
    let repo = LocalRepository::new();
    let due = schedule("u1", now() - Duration::hours(1));
    let future = schedule("u1", now() + Duration::hours(1));
    let mut done = schedule("u2", now() - Duration::hours(2));
    done.status = ScheduleStatus::Submitted;
    let mut reminded = schedule("u2", now() + Duration::hours(2));
    reminded.reminder_sent_at = Some(now() - Duration::minutes(10));

    for s in [&due, &future, &done, &reminded] {
        repo.insert_schedule(s).await.unwrap();
    }

    let due_rows = repo.list_due_schedules(now()).await.unwrap();
    assert_eq!(due_rows.len(), 1);
    assert_eq!(due_rows[0].id, due.id);

    let candidates = repo.list_reminder_candidates().await.unwrap();
    assert_eq!(candidates.len(), 2);
    assert!(candidates.iter().all(|s| s.reminder_sent_at.is_none()));
}

#[tokio::test]
async fn test_schedule_lookup_is_owner_scoped() {
    let repo = LocalRepository::new();
    let row = schedule("u1", now());
    repo.insert_schedule(&row).await.unwrap();

    assert!(repo.get_schedule("u1", row.id).await.is_ok());
    let err = repo.get_schedule("u2", row.id).await.unwrap_err();
    assert!(err.is_not_found());

    let mut ghost = row.clone();
    ghost.id = Uuid::new_v4();
    let err = repo.update_schedule(&ghost).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_experiment_increments_recompute_rates() {
    let repo = LocalRepository::new();
    let row = experiment("u1");
    repo.insert_experiment(&row).await.unwrap();

    for _ in 0..4 {
        repo.record_submission("u1", row.id, TestGroup::Control).await.unwrap();
    }
    let updated = repo
        .record_response("u1", row.id, TestGroup::Control, true)
        .await
        .unwrap();

    assert_eq!(updated.control_submissions, 4);
    assert_eq!(updated.control_responses, 1);
    assert_eq!(updated.control_interviews, 1);
    assert_eq!(updated.control_response_rate, 25.0);
    assert_eq!(updated.variant_response_rate, 0.0);

    let err = repo
        .record_submission("u2", row.id, TestGroup::Control)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_unhealthy_store_rejects_operations() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);

    let err = repo.store_metric(&metric("u1", "Technology", now())).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(!repo.health_check().await.unwrap());
}
