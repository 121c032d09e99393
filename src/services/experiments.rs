//! Timing A/B test analytics.
//!
//! Variant bookkeeping, response tracking, chi-square significance testing,
//! and recommendation text for submission-timing experiments. Tally updates
//! go through atomic repository operations so concurrent recordings never
//! lose an increment.

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::clock::Clock;
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::correlation::{
    round_ratio, AnalysisOutcome, SlotRanking, TimingBreakdown, MIN_CORRELATION_SAMPLES,
};
use crate::models::week;
use crate::models::{
    CompletedTest, Experiment, ExperimentStatus, NewExperiment, ResponseType, TestAnalysis,
    TestGroup, DEFAULT_MINIMUM_SAMPLE_SIZE, DEFAULT_TEST_DURATION_DAYS,
};

/// Chi-square threshold for significance at one degree of freedom (p < 0.05).
const CHI_SQUARE_THRESHOLD: f64 = 3.84;
/// Default history window for the timing breakdown, days.
pub const DEFAULT_CORRELATION_WINDOW_DAYS: i64 = 30;

/// Manages timing A/B tests and their statistics.
pub struct ExperimentAnalytics {
    repository: Arc<dyn FullRepository>,
    clock: Arc<dyn Clock>,
}

impl ExperimentAnalytics {
    pub fn new(repository: Arc<dyn FullRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Create an active A/B test with default duration and sample size.
    pub async fn create_ab_test(
        &self,
        user_id: &str,
        new: NewExperiment,
    ) -> RepositoryResult<Experiment> {
        let experiment = Experiment {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            test_name: new.test_name,
            control_timing: new.control_timing,
            variant_timing: new.variant_timing,
            test_duration_days: new.test_duration_days.unwrap_or(DEFAULT_TEST_DURATION_DAYS),
            minimum_sample_size: new
                .minimum_sample_size
                .unwrap_or(DEFAULT_MINIMUM_SAMPLE_SIZE),
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
            started_at: self.clock.now(),
            ended_at: None,
        };
        self.repository.insert_experiment(&experiment).await?;
        Ok(experiment)
    }

    /// Count one submission for a test group.
    pub async fn record_test_submission(
        &self,
        user_id: &str,
        test_id: Uuid,
        is_control_group: bool,
        application_id: &str,
    ) -> RepositoryResult<Experiment> {
        let group = TestGroup::from_is_control(is_control_group);
        log::debug!(
            "Recording {} submission {} for test {}",
            if is_control_group { "control" } else { "variant" },
            application_id,
            test_id
        );
        self.repository
            .record_submission(user_id, test_id, group)
            .await
    }

    /// Count one response for a test group. Every response bumps the
    /// response tally; only interviews bump the interview tally.
    pub async fn record_test_response(
        &self,
        user_id: &str,
        test_id: Uuid,
        is_control_group: bool,
        response_type: ResponseType,
    ) -> RepositoryResult<Experiment> {
        let group = TestGroup::from_is_control(is_control_group);
        let interview = response_type == ResponseType::Interview;
        self.repository
            .record_response(user_id, test_id, group, interview)
            .await
    }

    /// Run the significance analysis and persist the results back onto the
    /// experiment.
    pub async fn analyze_test_results(
        &self,
        user_id: &str,
        test_id: Uuid,
    ) -> RepositoryResult<TestAnalysis> {
        let mut experiment = self.repository.get_experiment(user_id, test_id).await?;
        let analysis = analyze(&experiment);

        experiment.p_value = Some(analysis.p_value);
        experiment.is_significant = Some(analysis.is_significant);
        experiment.winning_variant = Some(analysis.winning_variant.clone());
        experiment.recommendation_text = Some(analysis.recommendation_text.clone());
        self.repository.update_experiment(&experiment).await?;

        Ok(analysis)
    }

    /// Finalize a test: re-run the analysis, move to a terminal status, and
    /// return next-step guidance keyed by the winner.
    pub async fn complete_test(
        &self,
        user_id: &str,
        test_id: Uuid,
    ) -> RepositoryResult<CompletedTest> {
        let analysis = self.analyze_test_results(user_id, test_id).await?;

        let mut experiment = self.repository.get_experiment(user_id, test_id).await?;
        let status = if analysis.is_significant {
            ExperimentStatus::Completed
        } else {
            ExperimentStatus::Inconclusive
        };
        experiment.status = status;
        experiment.ended_at = Some(self.clock.now());
        self.repository.update_experiment(&experiment).await?;

        Ok(CompletedTest {
            status,
            next_steps: next_steps(&analysis.winning_variant),
            analysis,
        })
    }

    /// All of a user's experiments, newest first.
    pub async fn get_test_history(&self, user_id: &str) -> RepositoryResult<Vec<Experiment>> {
        self.repository.list_user_experiments(user_id).await
    }

    /// Success-rate ranking over recent (day, hour) submission slots.
    pub async fn track_timing_correlation(
        &self,
        user_id: &str,
        days: Option<i64>,
    ) -> RepositoryResult<AnalysisOutcome<TimingBreakdown>> {
        let window_days = days.unwrap_or(DEFAULT_CORRELATION_WINDOW_DAYS);
        let since = self.clock.now() - Duration::days(window_days);
        let metrics = self
            .repository
            .list_user_metrics_since(user_id, since)
            .await?;
        if metrics.len() < MIN_CORRELATION_SAMPLES {
            return Ok(AnalysisOutcome::insufficient(metrics.len()));
        }

        let mut buckets: std::collections::BTreeMap<(usize, u32), (usize, usize)> =
            Default::default();
        for metric in &metrics {
            let entry = buckets
                .entry((metric.day_index(), metric.hour_of_day % 24))
                .or_default();
            entry.0 += 1;
            if metric.got_interview {
                entry.1 += 1;
            }
        }

        let mut slots: Vec<SlotRanking> = buckets
            .into_iter()
            .map(|((day, hour), (total, successes))| SlotRanking {
                day: week::day_name(day).to_string(),
                hour,
                successes,
                total,
                success_ratio: round_ratio(successes, total),
            })
            .collect();
        slots.sort_by(|a, b| {
            b.success_ratio
                .partial_cmp(&a.success_ratio)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let best = slots[0].clone();

        Ok(AnalysisOutcome::ready(TimingBreakdown {
            window_days,
            slots,
            best,
        }))
    }
}

/// Significance analysis over the experiment's current tallies.
fn analyze(experiment: &Experiment) -> TestAnalysis {
    let control = experiment.group_metrics(TestGroup::Control);
    let variant = experiment.group_metrics(TestGroup::Variant);

    let chi_square = chi_square_2x2(
        control.responses,
        control.submissions.saturating_sub(control.responses),
        variant.responses,
        variant.submissions.saturating_sub(variant.responses),
    );
    let is_significant = chi_square > CHI_SQUARE_THRESHOLD;
    let p_value = approximate_p_value(chi_square);

    let winning_variant = if variant.response_rate > control.response_rate {
        "variant"
    } else if control.response_rate > variant.response_rate {
        "control"
    } else {
        "inconclusive"
    }
    .to_string();

    let total = control.submissions + variant.submissions;
    let implementation_confidence =
        (total as f64 / (2 * experiment.minimum_sample_size) as f64).clamp(0.0, 1.0);

    let response_rate_improvement = variant.response_rate - control.response_rate;
    let recommendation_text = recommendation_text(
        experiment,
        &winning_variant,
        is_significant,
        response_rate_improvement,
    );

    TestAnalysis {
        test_id: experiment.id,
        test_name: experiment.test_name.clone(),
        control,
        variant,
        response_rate_improvement,
        chi_square,
        p_value,
        is_significant,
        winning_variant,
        implementation_confidence,
        recommendation_text,
    }
}

/// Chi-square statistic for the 2x2 success/failure table:
/// `χ² = (ad − bc)² · N / (r1 · r2 · c1 · c2)`, denominator guarded to 1.
fn chi_square_2x2(a: usize, b: usize, c: usize, d: usize) -> f64 {
    let (a, b, c, d) = (a as f64, b as f64, c as f64, d as f64);
    let n = a + b + c + d;
    let mut denominator = (a + b) * (c + d) * (a + c) * (b + d);
    if denominator == 0.0 {
        denominator = 1.0;
    }
    let diff = a * d - b * c;
    diff * diff * n / denominator
}

/// Bucketed p-value approximation for one degree of freedom. The
/// significance decision uses the chi-square threshold directly.
fn approximate_p_value(chi_square: f64) -> f64 {
    if chi_square < 1.0 {
        0.3
    } else if chi_square < CHI_SQUARE_THRESHOLD {
        0.05
    } else if chi_square < 6.63 {
        0.01
    } else {
        0.001
    }
}

fn recommendation_text(
    experiment: &Experiment,
    winner: &str,
    is_significant: bool,
    improvement: f64,
) -> String {
    if !is_significant {
        return "No statistically significant difference yet. Keep the test running to gather more submissions.".to_string();
    }
    match winner {
        "variant" => format!(
            "Adopt the variant timing ({}): response rate improved by {:.1} percentage points over the control.",
            experiment.variant_timing, improvement
        ),
        "control" => format!(
            "Keep the control timing ({}): the variant underperformed by {:.1} percentage points.",
            experiment.control_timing,
            improvement.abs()
        ),
        _ => "The groups performed identically; keep the current timing.".to_string(),
    }
}

/// Canned next-step guidance keyed by the winning variant.
fn next_steps(winner: &str) -> Vec<String> {
    let steps: &[&str] = match winner {
        "variant" => &[
            "Roll the variant timing out to all future submissions",
            "Re-run the test next quarter to confirm the effect holds",
            "Watch response rates for two more weeks for regressions",
        ],
        "control" => &[
            "Keep the control timing as the default",
            "Investigate why the variant underperformed before testing again",
            "Consider testing a different day or hour window next",
        ],
        _ => &[
            "Extend the test duration to gather more samples",
            "Raise the minimum sample size before the next analysis",
            "Try a larger timing difference between the groups",
        ],
    };
    steps.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
#[path = "experiments_tests.rs"]
mod experiments_tests;
