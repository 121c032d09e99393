//! Timing A/B test experiments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default test duration when the caller does not supply one.
pub const DEFAULT_TEST_DURATION_DAYS: i64 = 30;
/// Default per-group minimum sample size.
pub const DEFAULT_MINIMUM_SAMPLE_SIZE: usize = 20;

/// Lifecycle state of an experiment. Created active, finalized to a
/// terminal status by `complete_test`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentStatus {
    Active,
    Completed,
    Inconclusive,
}

/// Which arm of the experiment a submission or response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestGroup {
    Control,
    Variant,
}

impl TestGroup {
    pub fn from_is_control(is_control: bool) -> Self {
        if is_control {
            TestGroup::Control
        } else {
            TestGroup::Variant
        }
    }
}

/// How a company responded to a tracked submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Interview,
    Rejection,
    FollowUp,
}

/// A timing A/B test with per-group tallies. Counters are mutated
/// incrementally through atomic repository operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    pub id: Uuid,
    pub user_id: String,
    pub test_name: String,
    /// Timing description for the control arm, e.g. "Tuesday 9 AM".
    pub control_timing: String,
    pub variant_timing: String,
    pub test_duration_days: i64,
    pub minimum_sample_size: usize,
    pub status: ExperimentStatus,

    pub control_submissions: usize,
    pub control_responses: usize,
    pub control_interviews: usize,
    /// Percent of control submissions that got any response.
    pub control_response_rate: f64,
    /// Percent of control submissions that got an interview.
    pub control_interview_rate: f64,

    pub variant_submissions: usize,
    pub variant_responses: usize,
    pub variant_interviews: usize,
    pub variant_response_rate: f64,
    pub variant_interview_rate: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_significant: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation_text: Option<String>,

    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Experiment {
    /// Recompute the derived percentage rates for one group from its tallies.
    /// Rates are zero while the group has no submissions.
    pub fn recompute_rates(&mut self, group: TestGroup) {
        match group {
            TestGroup::Control => {
                self.control_response_rate =
                    percentage(self.control_responses, self.control_submissions);
                self.control_interview_rate =
                    percentage(self.control_interviews, self.control_submissions);
            }
            TestGroup::Variant => {
                self.variant_response_rate =
                    percentage(self.variant_responses, self.variant_submissions);
                self.variant_interview_rate =
                    percentage(self.variant_interviews, self.variant_submissions);
            }
        }
    }

    /// Snapshot of one group's tallies and rates.
    pub fn group_metrics(&self, group: TestGroup) -> GroupMetrics {
        match group {
            TestGroup::Control => GroupMetrics {
                submissions: self.control_submissions,
                responses: self.control_responses,
                interviews: self.control_interviews,
                response_rate: self.control_response_rate,
                interview_rate: self.control_interview_rate,
            },
            TestGroup::Variant => GroupMetrics {
                submissions: self.variant_submissions,
                responses: self.variant_responses,
                interviews: self.variant_interviews,
                response_rate: self.variant_response_rate,
                interview_rate: self.variant_interview_rate,
            },
        }
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Caller-supplied data for creating an experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExperiment {
    pub test_name: String,
    pub control_timing: String,
    pub variant_timing: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_duration_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_sample_size: Option<usize>,
}

/// Snapshot of one experiment arm at analysis time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMetrics {
    pub submissions: usize,
    pub responses: usize,
    pub interviews: usize,
    pub response_rate: f64,
    pub interview_rate: f64,
}

/// Result of a significance analysis, persisted back onto the experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestAnalysis {
    pub test_id: Uuid,
    pub test_name: String,
    pub control: GroupMetrics,
    pub variant: GroupMetrics,
    /// variant.response_rate − control.response_rate, percentage points.
    pub response_rate_improvement: f64,
    pub chi_square: f64,
    /// Bucketed approximation, not an exact p-value.
    pub p_value: f64,
    pub is_significant: bool,
    /// "control", "variant", or "inconclusive" on a tie.
    pub winning_variant: String,
    /// Sample-size-based confidence in acting on the result, `0..=1`.
    pub implementation_confidence: f64,
    pub recommendation_text: String,
}

/// Final outcome of `complete_test`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedTest {
    pub status: ExperimentStatus,
    pub analysis: TestAnalysis,
    /// Canned guidance keyed by the winning variant.
    pub next_steps: Vec<String>,
}
