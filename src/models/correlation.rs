//! Correlation analysis contracts.
//!
//! Trend-style analyses share one outcome shape: below the sample minimum
//! they return a structured insufficient-data payload instead of failing,
//! which is an expected steady state for new users, not an error.

use serde::{Deserialize, Serialize};

/// Minimum number of submissions required before correlation analyses run.
pub const MIN_CORRELATION_SAMPLES: usize = 5;

/// Outcome of an analysis that needs a minimum sample size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome<T> {
    /// Not enough tracked submissions yet.
    InsufficientData {
        minimum_required: usize,
        actual: usize,
        message: String,
    },
    /// Analysis ran; payload carries the results.
    Ready {
        #[serde(flatten)]
        analysis: T,
    },
}

impl<T> AnalysisOutcome<T> {
    /// Build the insufficient-data arm with the standard message.
    pub fn insufficient(actual: usize) -> Self {
        AnalysisOutcome::InsufficientData {
            minimum_required: MIN_CORRELATION_SAMPLES,
            actual,
            message: format!(
                "Not enough data yet: {} submissions tracked, {} required. Track more submissions to unlock timing analysis.",
                actual, MIN_CORRELATION_SAMPLES
            ),
        }
    }

    pub fn ready(analysis: T) -> Self {
        AnalysisOutcome::Ready { analysis }
    }

    /// The ready payload, if the analysis ran.
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            AnalysisOutcome::Ready { analysis } => Some(analysis),
            AnalysisOutcome::InsufficientData { .. } => None,
        }
    }
}

/// Success statistics for one bucket (a day or an hour).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotStat {
    /// Bucket label: a day name or an hour like "14:00".
    pub label: String,
    pub successes: usize,
    pub total: usize,
    /// successes / total, rounded to 2 decimals; zero for empty buckets.
    pub success_ratio: f64,
}

/// Per-user day/hour correlation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    pub best_day: SlotStat,
    pub best_hour: SlotStat,
    pub by_day: Vec<SlotStat>,
    pub by_hour: Vec<SlotStat>,
    pub summary: String,
}

/// Success statistics for one (day, hour) combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRanking {
    pub day: String,
    pub hour: u32,
    pub successes: usize,
    pub total: usize,
    pub success_ratio: f64,
}

/// Success-rate ranking over recent (day, hour) submission slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingBreakdown {
    /// How many days of history were considered.
    pub window_days: i64,
    /// Slots ranked by success ratio, best first.
    pub slots: Vec<SlotRanking>,
    pub best: SlotRanking,
}

/// Round a ratio to 2 decimal places.
pub fn round_ratio(successes: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (successes as f64 / total as f64 * 100.0).round() / 100.0
}
