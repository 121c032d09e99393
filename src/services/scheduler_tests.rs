use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use crate::clock::{Clock, FixedClock};
use crate::db::repositories::LocalRepository;
use crate::db::repository::{FullRepository, RepositoryError};
use crate::models::{NewScheduledSubmission, ScheduleStatus};
use crate::services::scheduler::SubmissionScheduler;

/// Monday 2024-06-03, 08:00 UTC.
fn monday_morning() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap()
}

fn new_schedule(app: &str, at: chrono::DateTime<Utc>) -> NewScheduledSubmission {
    NewScheduledSubmission {
        application_id: app.to_string(),
        scheduled_submit_time: at,
        send_reminder: None,
        reminder_minutes_before: None,
        scheduling_reason: None,
    }
}

fn setup() -> (SubmissionScheduler, Arc<LocalRepository>, Arc<FixedClock>) {
    let repo = Arc::new(LocalRepository::new());
    let clock = Arc::new(FixedClock::new(monday_morning()));
    let scheduler = SubmissionScheduler::new(
        repo.clone() as Arc<dyn FullRepository>,
        clock.clone() as Arc<dyn Clock>,
    );
    (scheduler, repo, clock)
}

#[tokio::test]
async fn test_schedule_defaults() {
    let (scheduler, _repo, _clock) = setup();

    let schedule = scheduler
        .schedule_submission("u1", new_schedule("app-1", monday_morning() + Duration::hours(2)))
        .await
        .unwrap();

    assert_eq!(schedule.status, ScheduleStatus::Scheduled);
    assert!(schedule.send_reminder);
    assert_eq!(schedule.reminder_minutes_before, 30);
    assert!(!schedule.is_rescheduled);
    assert!(schedule.reminder_sent_at.is_none());
}

#[tokio::test]
async fn test_upcoming_excludes_cancelled_and_far_future() {
    let (scheduler, _repo, _clock) = setup();
    let now = monday_morning();

    let soon = scheduler
        .schedule_submission("u1", new_schedule("soon", now + Duration::days(2)))
        .await
        .unwrap();
    let cancelled = scheduler
        .schedule_submission("u1", new_schedule("cancelled", now + Duration::days(3)))
        .await
        .unwrap();
    scheduler
        .schedule_submission("u1", new_schedule("late", now + Duration::days(10)))
        .await
        .unwrap();
    scheduler
        .schedule_submission("u1", new_schedule("past", now - Duration::hours(1)))
        .await
        .unwrap();
    scheduler.cancel_schedule("u1", cancelled.id).await.unwrap();

    let upcoming = scheduler.get_upcoming_submissions("u1").await.unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].id, soon.id);
}

#[tokio::test]
async fn test_upcoming_is_time_ascending() {
    let (scheduler, _repo, _clock) = setup();
    let now = monday_morning();

    scheduler
        .schedule_submission("u1", new_schedule("b", now + Duration::days(3)))
        .await
        .unwrap();
    scheduler
        .schedule_submission("u1", new_schedule("a", now + Duration::days(1)))
        .await
        .unwrap();

    let upcoming = scheduler.get_upcoming_submissions("u1").await.unwrap();
    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0].application_id, "a");
    assert_eq!(upcoming[1].application_id, "b");
}

#[tokio::test]
async fn test_reschedule_records_previous_time() {
    let (scheduler, _repo, _clock) = setup();
    let original = monday_morning() + Duration::days(1);
    let moved = monday_morning() + Duration::days(2);

    let schedule = scheduler
        .schedule_submission("u1", new_schedule("app-1", original))
        .await
        .unwrap();
    let updated = scheduler
        .reschedule_submission("u1", schedule.id, moved)
        .await
        .unwrap();

    assert_eq!(updated.scheduled_submit_time, moved);
    assert_eq!(updated.previous_scheduled_time, Some(original));
    assert!(updated.is_rescheduled);
    assert_eq!(updated.status, ScheduleStatus::Scheduled);
}

#[tokio::test]
async fn test_cancel_terminal_record_is_rejected() {
    let (scheduler, _repo, _clock) = setup();

    let schedule = scheduler
        .schedule_submission("u1", new_schedule("app-1", monday_morning() + Duration::days(1)))
        .await
        .unwrap();
    scheduler.cancel_schedule("u1", schedule.id).await.unwrap();

    let err = scheduler.cancel_schedule("u1", schedule.id).await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_cancel_unknown_schedule_is_not_found() {
    let (scheduler, _repo, _clock) = setup();
    let err = scheduler
        .cancel_schedule("u1", uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_other_users_schedules_are_invisible() {
    let (scheduler, _repo, _clock) = setup();

    let schedule = scheduler
        .schedule_submission("u1", new_schedule("app-1", monday_morning() + Duration::days(1)))
        .await
        .unwrap();

    let err = scheduler.cancel_schedule("u2", schedule.id).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(scheduler
        .get_user_scheduled_submissions("u2")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_process_picks_up_due_rows_exactly_once() {
    let (scheduler, _repo, clock) = setup();
    let now = monday_morning();

    let due = scheduler
        .schedule_submission("u1", new_schedule("due", now + Duration::minutes(30)))
        .await
        .unwrap();
    scheduler
        .schedule_submission("u1", new_schedule("future", now + Duration::days(2)))
        .await
        .unwrap();

    clock.advance(Duration::hours(1));
    let report = scheduler.process_scheduled_submissions().await.unwrap();
    assert_eq!(report.processed, 1);
    assert!(report.errors.is_empty());

    let processed = scheduler
        .get_user_scheduled_submissions("u1")
        .await
        .unwrap()
        .into_iter()
        .find(|s| s.id == due.id)
        .unwrap();
    assert_eq!(processed.status, ScheduleStatus::Submitted);
    assert_eq!(processed.actual_submit_time, Some(clock.now()));

    // Second pass finds nothing left to do.
    let report = scheduler.process_scheduled_submissions().await.unwrap();
    assert_eq!(report.processed, 0);
}

#[tokio::test]
async fn test_process_tolerates_per_item_failures() {
    let (scheduler, repo, clock) = setup();
    let now = monday_morning();

    let poisoned = scheduler
        .schedule_submission("u1", new_schedule("poisoned", now + Duration::minutes(5)))
        .await
        .unwrap();
    scheduler
        .schedule_submission("u1", new_schedule("healthy", now + Duration::minutes(10)))
        .await
        .unwrap();
    repo.fail_schedule_updates(poisoned.id);

    clock.advance(Duration::hours(1));
    let report = scheduler.process_scheduled_submissions().await.unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains(&poisoned.id.to_string()));
}

#[tokio::test]
async fn test_reminder_fires_once_inside_window() {
    let (scheduler, _repo, clock) = setup();

    // Scheduled for Monday 09:00 with a 30-minute reminder window.
    scheduler
        .schedule_submission("u1", new_schedule("app-1", monday_morning() + Duration::hours(1)))
        .await
        .unwrap();

    // 08:25 is still outside the window (35 minutes to go).
    clock.set(monday_morning() + Duration::minutes(25));
    let report = scheduler.send_reminders().await.unwrap();
    assert_eq!(report.reminders_sent, 0);

    // 08:45 is inside the window.
    clock.set(monday_morning() + Duration::minutes(45));
    let report = scheduler.send_reminders().await.unwrap();
    assert_eq!(report.reminders_sent, 1);

    // Already reminded: the second invocation skips it.
    let report = scheduler.send_reminders().await.unwrap();
    assert_eq!(report.reminders_sent, 0);
}

#[tokio::test]
async fn test_reminder_skips_past_due_rows() {
    let (scheduler, _repo, clock) = setup();

    scheduler
        .schedule_submission("u1", new_schedule("app-1", monday_morning() + Duration::hours(1)))
        .await
        .unwrap();

    clock.set(monday_morning() + Duration::hours(2));
    let report = scheduler.send_reminders().await.unwrap();
    assert_eq!(report.reminders_sent, 0);
}

#[tokio::test]
async fn test_calendar_view_groups_by_day() {
    let (scheduler, _repo, _clock) = setup();

    scheduler
        .schedule_submission(
            "u1",
            new_schedule("a", Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()),
        )
        .await
        .unwrap();
    scheduler
        .schedule_submission(
            "u1",
            new_schedule("b", Utc.with_ymd_and_hms(2024, 6, 10, 15, 30, 0).unwrap()),
        )
        .await
        .unwrap();
    scheduler
        .schedule_submission(
            "u1",
            new_schedule("c", Utc.with_ymd_and_hms(2024, 6, 21, 11, 0, 0).unwrap()),
        )
        .await
        .unwrap();
    // Different month, excluded.
    scheduler
        .schedule_submission(
            "u1",
            new_schedule("d", Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap()),
        )
        .await
        .unwrap();

    let view = scheduler.get_calendar_view("u1", 6, 2024).await.unwrap();
    assert_eq!(view.total_scheduled, 3);
    assert_eq!(view.active_days, 2);
    assert_eq!(view.days[&10].len(), 2);
    assert_eq!(view.days[&10][1].time, "15:30");
    assert_eq!(view.days[&21].len(), 1);
}

#[tokio::test]
async fn test_calendar_view_rejects_invalid_month() {
    let (scheduler, _repo, _clock) = setup();
    let err = scheduler.get_calendar_view("u1", 13, 2024).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn test_statistics_partition_and_conversion() {
    let (scheduler, _repo, clock) = setup();
    let now = monday_morning();

    // One future scheduled, one overdue scheduled, one submitted, one cancelled.
    scheduler
        .schedule_submission("u1", new_schedule("future", now + Duration::days(1)))
        .await
        .unwrap();
    scheduler
        .schedule_submission("u1", new_schedule("overdue", now - Duration::hours(2)))
        .await
        .unwrap();
    let done = scheduler
        .schedule_submission("u1", new_schedule("done", now - Duration::days(1)))
        .await
        .unwrap();
    let cancelled = scheduler
        .schedule_submission("u1", new_schedule("gone", now + Duration::days(2)))
        .await
        .unwrap();
    scheduler.cancel_schedule("u1", cancelled.id).await.unwrap();

    // Rewind so that only `done` is due, process it, then restore the clock.
    let before = clock.now();
    clock.set(now - Duration::hours(12));
    let report = scheduler.process_scheduled_submissions().await.unwrap();
    assert_eq!(report.processed, 1);
    clock.set(before);

    let stats = scheduler.get_scheduling_statistics("u1").await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.scheduled, 2);
    assert_eq!(stats.submitted, 1);
    assert_eq!(stats.cancelled, 1);
    assert_eq!(stats.upcoming, 1);
    assert_eq!(stats.overdue, 1);
    // 1 submitted / (2 scheduled + 1 submitted)
    assert!((stats.conversion_rate - 100.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_conversion_rate_zero_without_data() {
    let (scheduler, _repo, _clock) = setup();
    let stats = scheduler.get_scheduling_statistics("u1").await.unwrap();
    assert_eq!(stats.total, 0);
    assert_eq!(stats.conversion_rate, 0.0);
}
