//! Scheduled submission management.
//!
//! Creates, reschedules, and cancels future submissions, and hosts the two
//! periodically triggered passes: transitioning due submissions and firing
//! reminders. Actual delivery is delegated to a notification dispatcher;
//! this service only decides when something is due and marks it handled.

use std::sync::Arc;

use chrono::{Datelike, Duration, Utc};
use uuid::Uuid;

use crate::clock::Clock;
use crate::db::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::models::{
    CalendarEntry, CalendarView, NewScheduledSubmission, ProcessReport, ReminderReport,
    ScheduleStatus, ScheduledSubmission, SchedulingStatistics, DEFAULT_REMINDER_MINUTES,
};

/// Horizon for the upcoming-submissions view.
const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Manages concrete future submissions and their reminders.
pub struct SubmissionScheduler {
    repository: Arc<dyn FullRepository>,
    clock: Arc<dyn Clock>,
}

impl SubmissionScheduler {
    pub fn new(repository: Arc<dyn FullRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Create a scheduled submission. Reminders default to on, 30 minutes
    /// before the scheduled time.
    pub async fn schedule_submission(
        &self,
        user_id: &str,
        new: NewScheduledSubmission,
    ) -> RepositoryResult<ScheduledSubmission> {
        let schedule = ScheduledSubmission {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            application_id: new.application_id,
            scheduled_submit_time: new.scheduled_submit_time,
            status: ScheduleStatus::Scheduled,
            send_reminder: new.send_reminder.unwrap_or(true),
            reminder_minutes_before: new
                .reminder_minutes_before
                .unwrap_or(DEFAULT_REMINDER_MINUTES),
            reminder_sent_at: None,
            previous_scheduled_time: None,
            is_rescheduled: false,
            scheduling_reason: new.scheduling_reason,
            actual_submit_time: None,
            created_at: self.clock.now(),
        };
        self.repository.insert_schedule(&schedule).await?;
        Ok(schedule)
    }

    /// All of a user's schedules, ascending by scheduled time.
    pub async fn get_user_scheduled_submissions(
        &self,
        user_id: &str,
    ) -> RepositoryResult<Vec<ScheduledSubmission>> {
        self.repository.list_user_schedules(user_id).await
    }

    /// Still-scheduled submissions due within the next 7 days, ascending.
    pub async fn get_upcoming_submissions(
        &self,
        user_id: &str,
    ) -> RepositoryResult<Vec<ScheduledSubmission>> {
        let now = self.clock.now();
        let horizon = now + Duration::days(UPCOMING_WINDOW_DAYS);
        let schedules = self.repository.list_user_schedules(user_id).await?;
        Ok(schedules
            .into_iter()
            .filter(|s| {
                s.status == ScheduleStatus::Scheduled
                    && s.scheduled_submit_time > now
                    && s.scheduled_submit_time <= horizon
            })
            .collect())
    }

    /// Move a schedule to a new time, recording the prior one. The status is
    /// left unchanged.
    pub async fn reschedule_submission(
        &self,
        user_id: &str,
        id: Uuid,
        new_time: chrono::DateTime<Utc>,
    ) -> RepositoryResult<ScheduledSubmission> {
        let mut schedule = self.repository.get_schedule(user_id, id).await?;
        schedule.previous_scheduled_time = Some(schedule.scheduled_submit_time);
        schedule.scheduled_submit_time = new_time;
        schedule.is_rescheduled = true;
        self.repository.update_schedule(&schedule).await?;
        Ok(schedule)
    }

    /// Cancel a schedule. Only `scheduled` records may be cancelled;
    /// submitted or already-cancelled records are rejected.
    pub async fn cancel_schedule(
        &self,
        user_id: &str,
        id: Uuid,
    ) -> RepositoryResult<ScheduledSubmission> {
        let mut schedule = self.repository.get_schedule(user_id, id).await?;
        if schedule.status != ScheduleStatus::Scheduled {
            return Err(RepositoryError::ValidationError {
                message: format!(
                    "Cannot cancel a submission in status '{}'",
                    schedule.status.as_str()
                ),
                context: ErrorContext::new("cancel_schedule")
                    .with_entity("scheduled_submission")
                    .with_entity_id(id),
            });
        }
        schedule.status = ScheduleStatus::Cancelled;
        self.repository.update_schedule(&schedule).await?;
        Ok(schedule)
    }

    /// Externally triggered periodic pass: transition every due `scheduled`
    /// row to `submitted`. Per-item failures are collected in the report and
    /// never abort the batch.
    pub async fn process_scheduled_submissions(&self) -> RepositoryResult<ProcessReport> {
        let now = self.clock.now();
        let due = self.repository.list_due_schedules(now).await?;

        let mut report = ProcessReport::default();
        for mut schedule in due {
            schedule.status = ScheduleStatus::Submitted;
            schedule.actual_submit_time = Some(now);
            match self.repository.update_schedule(&schedule).await {
                Ok(()) => {
                    log::info!(
                        "Processed scheduled submission {} for application {}",
                        schedule.id,
                        schedule.application_id
                    );
                    report.processed += 1;
                }
                Err(e) => {
                    log::warn!("Failed to process schedule {}: {}", schedule.id, e);
                    report.errors.push(format!("{}: {}", schedule.id, e));
                }
            }
        }
        Ok(report)
    }

    /// Externally triggered periodic pass: mark reminders whose window has
    /// opened. Out-of-window or already-reminded rows are skipped, never
    /// retried.
    pub async fn send_reminders(&self) -> RepositoryResult<ReminderReport> {
        let now = self.clock.now();
        let candidates = self.repository.list_reminder_candidates().await?;

        let mut report = ReminderReport::default();
        for mut schedule in candidates {
            let minutes_until = (schedule.scheduled_submit_time - now).num_minutes();
            if minutes_until <= 0 || minutes_until > schedule.reminder_minutes_before {
                continue;
            }
            schedule.reminder_sent_at = Some(now);
            match self.repository.update_schedule(&schedule).await {
                Ok(()) => {
                    log::info!(
                        "Reminder due for schedule {} ({} minutes before submission)",
                        schedule.id,
                        minutes_until
                    );
                    report.reminders_sent += 1;
                }
                Err(e) => {
                    log::warn!("Failed to mark reminder for {}: {}", schedule.id, e);
                    report.errors.push(format!("{}: {}", schedule.id, e));
                }
            }
        }
        Ok(report)
    }

    /// One month of schedules grouped by day-of-month.
    pub async fn get_calendar_view(
        &self,
        user_id: &str,
        month: u32,
        year: i32,
    ) -> RepositoryResult<CalendarView> {
        if !(1..=12).contains(&month) {
            return Err(RepositoryError::validation(format!(
                "Invalid month: {}",
                month
            )));
        }

        let schedules = self.repository.list_user_schedules(user_id).await?;
        let mut view = CalendarView {
            month,
            year,
            days: Default::default(),
            total_scheduled: 0,
            active_days: 0,
        };
        for schedule in schedules {
            let time = schedule.scheduled_submit_time;
            if time.month() != month || time.year() != year {
                continue;
            }
            view.total_scheduled += 1;
            view.days
                .entry(time.day())
                .or_default()
                .push(CalendarEntry {
                    schedule_id: schedule.id,
                    application_id: schedule.application_id,
                    time: time.format("%H:%M").to_string(),
                    status: schedule.status,
                });
        }
        view.active_days = view.days.len();
        Ok(view)
    }

    /// Per-status partition plus upcoming/overdue counts and the
    /// scheduled-to-submitted conversion rate.
    pub async fn get_scheduling_statistics(
        &self,
        user_id: &str,
    ) -> RepositoryResult<SchedulingStatistics> {
        let now = self.clock.now();
        let schedules = self.repository.list_user_schedules(user_id).await?;

        let mut stats = SchedulingStatistics {
            total: schedules.len(),
            scheduled: 0,
            submitted: 0,
            cancelled: 0,
            upcoming: 0,
            overdue: 0,
            conversion_rate: 0.0,
        };
        for schedule in &schedules {
            match schedule.status {
                ScheduleStatus::Scheduled => {
                    stats.scheduled += 1;
                    if schedule.scheduled_submit_time > now {
                        stats.upcoming += 1;
                    } else {
                        stats.overdue += 1;
                    }
                }
                ScheduleStatus::Submitted => stats.submitted += 1,
                ScheduleStatus::Cancelled => stats.cancelled += 1,
            }
        }
        let denominator = stats.scheduled + stats.submitted;
        if denominator > 0 {
            stats.conversion_rate = stats.submitted as f64 / denominator as f64 * 100.0;
        }
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod scheduler_tests;
