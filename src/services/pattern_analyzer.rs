//! Historical submission-timing pattern analysis.
//!
//! Derives per-(industry, company-size) timing patterns from tracked
//! submission metrics: best day, best 3-hour window, bad days with
//! qualitative avoid reasons, and average response latency. The
//! recommendation engine builds on these patterns.

use std::sync::Arc;

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::correlation::{
    round_ratio, AnalysisOutcome, CorrelationAnalysis, SlotStat, MIN_CORRELATION_SAMPLES,
};
use crate::models::week;
use crate::models::{timezone, IndustryTimingPattern, NewSubmissionMetric, SubmissionMetric};

/// Width of the hour window scanned for the best submission time.
pub const BEST_WINDOW_HOURS: usize = 3;
/// Days whose response rate falls below this fraction of the mean are "bad".
const BAD_DAY_FACTOR: f64 = 0.7;
/// Baseline response rate assumed for segments with no history.
const BASELINE_RESPONSE_RATE: f64 = 0.15;

/// Analyzes historical submission outcomes per industry segment.
pub struct PatternAnalyzer {
    repository: Arc<dyn FullRepository>,
}

impl PatternAnalyzer {
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self { repository }
    }

    /// Timing pattern for a segment.
    ///
    /// Prefers a precomputed pattern row with an exact key match. Otherwise
    /// aggregates the segment's submission metrics on demand; a segment with
    /// no history gets a fixed default pattern.
    pub async fn analyze_industry_patterns(
        &self,
        industry: &str,
        company_size: &str,
    ) -> RepositoryResult<IndustryTimingPattern> {
        if let Some(pattern) = self.repository.find_pattern(industry, company_size).await? {
            return Ok(pattern);
        }

        let metrics = self
            .repository
            .list_segment_metrics(industry, company_size)
            .await?;
        if metrics.is_empty() {
            log::debug!(
                "No history for segment ({}, {}); using default pattern",
                industry,
                company_size
            );
            return Ok(Self::default_pattern(industry, company_size));
        }

        Ok(Self::compute_pattern(industry, company_size, &metrics))
    }

    /// Persist one submission metric, deriving day-of-week and hour-of-day
    /// from the submission instant.
    pub async fn track_submission(
        &self,
        user_id: &str,
        new: NewSubmissionMetric,
    ) -> RepositoryResult<SubmissionMetric> {
        let metric = SubmissionMetric::from_new(user_id, new);
        self.repository.store_metric(&metric).await?;
        Ok(metric)
    }

    /// Per-user day/hour success correlation, optionally filtered by industry.
    ///
    /// Below the sample minimum this returns a structured insufficient-data
    /// payload naming the minimum and the actual count.
    pub async fn calculate_timing_correlation(
        &self,
        user_id: &str,
        industry: Option<&str>,
    ) -> RepositoryResult<AnalysisOutcome<CorrelationAnalysis>> {
        let metrics = self.repository.list_user_metrics(user_id, industry).await?;
        if metrics.len() < MIN_CORRELATION_SAMPLES {
            return Ok(AnalysisOutcome::insufficient(metrics.len()));
        }

        let mut day_buckets = [(0usize, 0usize); 7];
        let mut hour_buckets = [(0usize, 0usize); 24];
        for metric in &metrics {
            let day = metric.day_index();
            let hour = metric.hour_of_day as usize % 24;
            day_buckets[day].0 += 1;
            hour_buckets[hour].0 += 1;
            if metric.got_interview {
                day_buckets[day].1 += 1;
                hour_buckets[hour].1 += 1;
            }
        }

        let by_day: Vec<SlotStat> = day_buckets
            .iter()
            .enumerate()
            .map(|(day, &(total, successes))| SlotStat {
                label: week::day_name(day).to_string(),
                successes,
                total,
                success_ratio: round_ratio(successes, total),
            })
            .collect();
        let by_hour: Vec<SlotStat> = hour_buckets
            .iter()
            .enumerate()
            .map(|(hour, &(total, successes))| SlotStat {
                label: format!("{:02}:00", hour),
                successes,
                total,
                success_ratio: round_ratio(successes, total),
            })
            .collect();

        let best_day = best_slot(&by_day);
        let best_hour = best_slot(&by_hour);
        let summary = format!(
            "Your submissions perform best on {} around {}, with a {:.0}% success rate.",
            best_day.label,
            best_hour.label,
            best_day.success_ratio * 100.0
        );

        Ok(AnalysisOutcome::ready(CorrelationAnalysis {
            best_day,
            best_hour,
            by_day,
            by_hour,
            summary,
        }))
    }

    /// Fixed pattern for segments with no tracked history.
    fn default_pattern(industry: &str, company_size: &str) -> IndustryTimingPattern {
        IndustryTimingPattern {
            industry: industry.to_string(),
            company_size: company_size.to_string(),
            best_day_of_week: "Tuesday".to_string(),
            best_hour_start: 9,
            best_hour_range: "9-11 AM".to_string(),
            avg_response_rate: BASELINE_RESPONSE_RATE,
            submission_count: 0,
            bad_days: vec![
                "Friday".to_string(),
                "Saturday".to_string(),
                "Sunday".to_string(),
            ],
            avoid_reasons: avoid_reasons(&["Friday", "Saturday", "Sunday"]),
            avg_response_time_hours: 0,
            time_zone_considerations: timezone::considerations(),
        }
    }

    fn compute_pattern(
        industry: &str,
        company_size: &str,
        metrics: &[SubmissionMetric],
    ) -> IndustryTimingPattern {
        let mut day_buckets = [(0usize, 0usize); 7];
        let mut hour_buckets = [(0usize, 0usize); 24];
        let mut responses = 0usize;
        for metric in metrics {
            let day = metric.day_index();
            let hour = metric.hour_of_day as usize % 24;
            day_buckets[day].0 += 1;
            hour_buckets[hour].0 += 1;
            if metric.got_interview {
                day_buckets[day].1 += 1;
                hour_buckets[hour].1 += 1;
                responses += 1;
            }
        }

        let day_rates: Vec<f64> = day_buckets.iter().map(|&b| bucket_rate(b)).collect();
        let hour_rates: Vec<f64> = hour_buckets.iter().map(|&b| bucket_rate(b)).collect();

        // First occurrence wins ties, canonical Sunday-first order.
        let best_day = argmax(&day_rates);
        let best_hour_start = best_window_start(&hour_rates);

        let mean_day_rate = day_rates.iter().sum::<f64>() / day_rates.len() as f64;
        let bad_days: Vec<String> = day_rates
            .iter()
            .enumerate()
            .filter(|(_, &rate)| rate < BAD_DAY_FACTOR * mean_day_rate)
            .map(|(day, _)| week::day_name(day).to_string())
            .collect();
        let bad_refs: Vec<&str> = bad_days.iter().map(String::as_str).collect();

        let response_times: Vec<f64> = metrics
            .iter()
            .filter_map(|m| m.response_time_hours)
            .collect();
        let avg_response_time_hours = if response_times.is_empty() {
            0
        } else {
            (response_times.iter().sum::<f64>() / response_times.len() as f64).round() as i64
        };

        let avoid_reasons = avoid_reasons(&bad_refs);

        IndustryTimingPattern {
            industry: industry.to_string(),
            company_size: company_size.to_string(),
            best_day_of_week: week::day_name(best_day).to_string(),
            best_hour_start: best_hour_start as u32,
            best_hour_range: IndustryTimingPattern::hour_range_label(best_hour_start as f64, 2),
            avg_response_rate: if metrics.is_empty() {
                0.0
            } else {
                responses as f64 / metrics.len() as f64
            },
            submission_count: metrics.len(),
            bad_days,
            avoid_reasons,
            avg_response_time_hours,
            time_zone_considerations: timezone::considerations(),
        }
    }
}

/// responses / submissions for one bucket, zero when empty.
fn bucket_rate((total, successes): (usize, usize)) -> f64 {
    if total == 0 {
        0.0
    } else {
        successes as f64 / total as f64
    }
}

/// Index of the maximum value; the first occurrence wins ties.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Starting hour of the 3-hour window with the highest mean rate.
/// Ties keep the lowest start hour.
fn best_window_start(hour_rates: &[f64]) -> usize {
    let mut best_start = 0;
    let mut best_mean = f64::NEG_INFINITY;
    for start in 0..=(24 - BEST_WINDOW_HOURS) {
        let mean = hour_rates[start..start + BEST_WINDOW_HOURS]
            .iter()
            .sum::<f64>()
            / BEST_WINDOW_HOURS as f64;
        if mean > best_mean {
            best_mean = mean;
            best_start = start;
        }
    }
    best_start
}

/// Highest-ratio slot; the first occurrence wins ties.
fn best_slot(slots: &[SlotStat]) -> SlotStat {
    let mut best = &slots[0];
    for slot in slots {
        if slot.success_ratio > best.success_ratio {
            best = slot;
        }
    }
    best.clone()
}

/// Qualitative notes keyed off which days turned out bad, plus seasonal
/// caveats that always apply.
fn avoid_reasons(bad_days: &[&str]) -> Vec<String> {
    let mut reasons = Vec::new();
    if bad_days.iter().any(|d| d.eq_ignore_ascii_case("Friday")) {
        reasons.push(
            "Friday submissions tend to sit in inboxes over the weekend".to_string(),
        );
    }
    if bad_days
        .iter()
        .any(|d| week::day_index(d).map(week::is_weekend).unwrap_or(false))
    {
        reasons.push("Weekend submissions see minimal recruiter activity".to_string());
    }
    if bad_days.iter().any(|d| d.eq_ignore_ascii_case("Monday")) {
        reasons.push("Monday mornings are crowded with weekend backlog triage".to_string());
    }
    reasons.push("Month-end weeks compete with closing deadlines for attention".to_string());
    reasons.push("Quarter-end periods pull hiring managers into planning cycles".to_string());
    reasons.push("Major holiday weeks see sharply reduced recruiter activity".to_string());
    reasons
}

#[cfg(test)]
#[path = "pattern_analyzer_tests.rs"]
mod pattern_analyzer_tests;
