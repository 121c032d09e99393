//! Historical submission facts.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::week;

/// One tracked application submission. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionMetric {
    /// Owning user.
    pub user_id: String,
    /// Application the submission belongs to.
    pub application_id: String,
    /// Submission instant in UTC.
    pub submitted_at: DateTime<Utc>,
    /// Day name derived from `submitted_at` (canonical Sunday-first names).
    pub day_of_week: String,
    /// Hour of day derived from `submitted_at`, `0..24`.
    pub hour_of_day: u32,
    /// Industry segment of the target company.
    pub industry: String,
    /// Company-size segment (e.g. "startup", "enterprise").
    pub company_size: String,
    /// Whether the submission led to an interview invitation.
    pub got_interview: bool,
    /// Hours between submission and first response, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_hours: Option<f64>,
}

/// Submission data as reported by the caller; day/hour are derived on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubmissionMetric {
    pub application_id: String,
    pub submitted_at: DateTime<Utc>,
    pub industry: String,
    pub company_size: String,
    pub got_interview: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_hours: Option<f64>,
}

impl SubmissionMetric {
    /// Build the persisted metric from caller-supplied data, deriving the
    /// day-of-week name and hour-of-day from the submission instant.
    pub fn from_new(user_id: impl Into<String>, new: NewSubmissionMetric) -> Self {
        let day_index = week::date_index(&new.submitted_at);
        Self {
            user_id: user_id.into(),
            application_id: new.application_id,
            day_of_week: week::day_name(day_index).to_string(),
            hour_of_day: new.submitted_at.hour(),
            submitted_at: new.submitted_at,
            industry: new.industry,
            company_size: new.company_size,
            got_interview: new.got_interview,
            response_time_hours: new.response_time_hours,
        }
    }

    /// Canonical day index (0 = Sunday) of the submission.
    pub fn day_index(&self) -> usize {
        week::date_index(&self.submitted_at)
    }
}
