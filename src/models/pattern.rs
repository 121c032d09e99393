//! Aggregated industry timing patterns.

use serde::{Deserialize, Serialize};

use super::timezone::TimezoneNote;

/// Historical submission-timing statistics for one (industry, company-size)
/// segment. Read-mostly; computed on demand when no precomputed row exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryTimingPattern {
    pub industry: String,
    pub company_size: String,
    /// Day name with the highest response rate.
    pub best_day_of_week: String,
    /// Starting hour of the best 3-hour window, `0..=21`.
    pub best_hour_start: u32,
    /// Display label for the best window, e.g. "9-11 AM".
    pub best_hour_range: String,
    /// Interview rate across all submissions in the segment, `0..=1`.
    pub avg_response_rate: f64,
    /// Number of submissions the pattern was derived from.
    pub submission_count: usize,
    /// Day names with response rates well below the segment mean.
    pub bad_days: Vec<String>,
    /// Qualitative notes explaining the bad days plus seasonal caveats.
    pub avoid_reasons: Vec<String>,
    /// Mean response latency over submissions that got a response, whole hours.
    pub avg_response_time_hours: i64,
    /// Static per-zone offset table with notes.
    pub time_zone_considerations: Vec<TimezoneNote>,
}

impl IndustryTimingPattern {
    /// Display label for a window starting at `start` and spanning `span` hours.
    ///
    /// The literal "AM" suffix matches the historical display format.
    // TODO: pick AM/PM from the actual hour once the display format is settled
    pub fn hour_range_label(start: f64, span: u32) -> String {
        let end = start + span as f64;
        format!(
            "{}-{} AM",
            Self::trim_hour(start),
            Self::trim_hour(end % 24.0)
        )
    }

    fn trim_hour(hour: f64) -> String {
        if hour.fract() == 0.0 {
            format!("{}", hour as i64)
        } else {
            format!("{}", hour)
        }
    }
}
