//! Scheduled future submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Default reminder lead time in minutes.
pub const DEFAULT_REMINDER_MINUTES: i64 = 30;

/// Lifecycle state of a scheduled submission. Transitions out of
/// `Scheduled` are one-way; there is no resurrection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Scheduled,
    Submitted,
    Cancelled,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Scheduled => "scheduled",
            ScheduleStatus::Submitted => "submitted",
            ScheduleStatus::Cancelled => "cancelled",
        }
    }
}

/// A planned future submission with optional reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledSubmission {
    pub id: Uuid,
    pub user_id: String,
    pub application_id: String,
    pub scheduled_submit_time: DateTime<Utc>,
    pub status: ScheduleStatus,
    pub send_reminder: bool,
    pub reminder_minutes_before: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_sent_at: Option<DateTime<Utc>>,
    /// Set when rescheduled; holds the time the submission moved away from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_scheduled_time: Option<DateTime<Utc>>,
    pub is_rescheduled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduling_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_submit_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied data for creating a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScheduledSubmission {
    pub application_id: String,
    pub scheduled_submit_time: DateTime<Utc>,
    /// Defaults to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_reminder: Option<bool>,
    /// Defaults to 30.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_minutes_before: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduling_reason: Option<String>,
}

/// Outcome of one periodic `process_scheduled_submissions` run.
/// Per-item failures are collected here, never thrown mid-batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessReport {
    pub processed: usize,
    pub errors: Vec<String>,
}

/// Outcome of one periodic `send_reminders` run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderReport {
    pub reminders_sent: usize,
    pub errors: Vec<String>,
}

/// One schedule rendered for the calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub schedule_id: Uuid,
    pub application_id: String,
    /// Formatted time of day, e.g. "09:00".
    pub time: String,
    pub status: ScheduleStatus,
}

/// A month of scheduled submissions grouped by day-of-month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarView {
    pub month: u32,
    pub year: i32,
    pub days: BTreeMap<u32, Vec<CalendarEntry>>,
    pub total_scheduled: usize,
    /// Number of distinct days with at least one entry.
    pub active_days: usize,
}

/// Per-user scheduling statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingStatistics {
    pub total: usize,
    pub scheduled: usize,
    pub submitted: usize,
    pub cancelled: usize,
    /// Scheduled with a future submit time.
    pub upcoming: usize,
    /// Scheduled but past-due without a terminal transition.
    pub overdue: usize,
    /// submitted / (scheduled + submitted) × 100; zero when undefined.
    pub conversion_rate: f64,
}
