//! Personalized timing recommendation engine.
//!
//! Consumes a segment pattern from the analyzer, shifts the optimal window
//! into the user's timezone, scores confidence from data volume and the
//! applicant quality signal, and emits contextual warnings for the current
//! date.

use std::sync::Arc;

use chrono::{Datelike, Timelike};

use crate::clock::Clock;
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::week;
use crate::models::{
    timezone, IndustryTimingPattern, RecommendationRequest, TimingRecommendation,
};

use super::pattern_analyzer::PatternAnalyzer;

/// Width of the recommended submission window in hours.
const WINDOW_HOURS: f64 = 2.0;
/// Flat improvement estimate when no quality score is available, percent.
const DEFAULT_IMPROVEMENT_RATE: f64 = 25.0;
/// Submission count at which data-volume confidence saturates.
const FULL_CONFIDENCE_SAMPLES: f64 = 20.0;

/// Generates and persists timing recommendations.
pub struct RecommendationEngine {
    repository: Arc<dyn FullRepository>,
    clock: Arc<dyn Clock>,
    analyzer: PatternAnalyzer,
}

/// A pattern window shifted into the user's timezone.
#[derive(Debug, Clone, PartialEq)]
struct AdjustedWindow {
    /// Canonical day index after any day roll.
    day: usize,
    /// Window starting hour, fractional for half-hour offsets, `0..24`.
    start_hour: f64,
    /// Display label for the window.
    label: String,
}

impl RecommendationEngine {
    pub fn new(repository: Arc<dyn FullRepository>, clock: Arc<dyn Clock>) -> Self {
        let analyzer = PatternAnalyzer::new(repository.clone());
        Self {
            repository,
            clock,
            analyzer,
        }
    }

    /// Build a personalized recommendation from the segment pattern.
    pub async fn generate_recommendation(
        &self,
        user_id: &str,
        request: &RecommendationRequest,
    ) -> RepositoryResult<TimingRecommendation> {
        let pattern = self
            .analyzer
            .analyze_industry_patterns(&request.industry, &request.company_size)
            .await?;

        let window = adjust_window(&pattern, request.timezone.as_deref());
        let now = self.clock.now();

        let current_day = week::date_index(&now);
        // Fractional, so half-hour window starts (IST) compare correctly.
        let current_hour = now.hour() as f64 + now.minute() as f64 / 60.0;
        let in_window = current_day == window.day
            && current_hour >= window.start_hour
            && current_hour < window.start_hour + WINDOW_HOURS;

        let (current_recommendation, time_until_optimal_minutes) = if in_window {
            ("Submit now - you are inside the optimal window".to_string(), 0)
        } else {
            let minutes = minutes_until_window(&window, &now);
            let guidance = format!(
                "Wait for the next {} window ({}), about {} hour(s) away",
                week::day_name(window.day),
                window.label,
                minutes / 60
            );
            (guidance, minutes)
        };

        let estimated_improvement_rate = improvement_rate(request.quality_score);
        let confidence_level =
            confidence_level(pattern.submission_count, request.quality_score);
        let historical_success_rate = match request.quality_score {
            None => pattern.avg_response_rate,
            Some(quality) => (15.0 + quality / 100.0 * 70.0).clamp(0.0, 100.0),
        };

        let reasoning = format!(
            "For {} roles at {} companies, submitting on {} between {} has historically performed best; optimal timing is worth roughly a {:.0}% lift in response rate.",
            request.industry,
            request.company_size,
            week::day_name(window.day),
            window.label,
            estimated_improvement_rate
        );

        Ok(TimingRecommendation {
            user_id: user_id.to_string(),
            recommended_day: week::day_name(window.day).to_string(),
            recommended_time_range: window.label,
            reasoning,
            warnings: current_date_warnings(&now, &request.industry),
            current_recommendation,
            time_until_optimal_minutes,
            estimated_improvement_rate,
            confidence_level,
            historical_success_rate,
            created_at: now,
            valid_until: TimingRecommendation::expiry(now),
        })
    }

    /// Persist a recommendation with its 7-day validity window.
    pub async fn save_recommendation(
        &self,
        recommendation: &TimingRecommendation,
    ) -> RepositoryResult<()> {
        self.repository
            .store_recommendation(recommendation)
            .await
    }

    /// Newest non-expired recommendation for the user. `None` is a valid
    /// empty result, not an error.
    pub async fn get_latest_recommendation(
        &self,
        user_id: &str,
    ) -> RepositoryResult<Option<TimingRecommendation>> {
        self.repository
            .latest_valid_recommendation(user_id, self.clock.now())
            .await
    }
}

/// Shift the pattern's best window into the requested timezone.
///
/// The hour is shifted by the EST-relative offset; leaving `0..24` rolls the
/// recommended day exactly once in the matching direction. Unknown timezone
/// codes fall back to the EST offset of zero.
fn adjust_window(pattern: &IndustryTimingPattern, tz: Option<&str>) -> AdjustedWindow {
    let code = tz.unwrap_or(timezone::DEFAULT_TIMEZONE);
    let offset = timezone::offset_for(code).unwrap_or_else(|| {
        log::warn!("Unknown timezone code '{}'; assuming EST", code);
        0.0
    });

    let mut day =
        week::day_index(&pattern.best_day_of_week).unwrap_or_else(|| {
            log::warn!(
                "Unknown day name '{}' in pattern; assuming Tuesday",
                pattern.best_day_of_week
            );
            2
        });
    let mut start_hour = pattern.best_hour_start as f64 - offset;
    if start_hour < 0.0 {
        start_hour += 24.0;
        day = week::roll(day, -1);
    } else if start_hour >= 24.0 {
        start_hour -= 24.0;
        day = week::roll(day, 1);
    }

    AdjustedWindow {
        day,
        start_hour,
        label: IndustryTimingPattern::hour_range_label(start_hour, WINDOW_HOURS as u32),
    }
}

/// Minutes from `now` to the next occurrence of the window.
///
/// On the window's own day but past it, waiting resumes at the next day's
/// window; otherwise the circular day distance plus the hour delta applies.
fn minutes_until_window(window: &AdjustedWindow, now: &chrono::DateTime<chrono::Utc>) -> i64 {
    let current_day = week::date_index(now);
    let current_minutes = (now.hour() * 60 + now.minute()) as i64;
    let window_minutes = (window.start_hour * 60.0).round() as i64;

    let mut days_until = week::days_until(current_day, window.day) as i64;
    if days_until == 0 && current_minutes >= window_minutes {
        days_until = 1;
    }

    (days_until * 24 * 60 + window_minutes - current_minutes).max(0)
}

/// Expected response-rate lift from optimal timing, percent.
///
/// Lower applicant quality is modeled as benefiting more from timing, so the
/// estimate falls as the quality score rises, clamped to `10..=50`.
fn improvement_rate(quality_score: Option<f64>) -> f64 {
    match quality_score {
        None => DEFAULT_IMPROVEMENT_RATE,
        Some(quality) => (40.0 - quality / 100.0 * 25.0).clamp(10.0, 50.0),
    }
}

/// Confidence from data volume, nudged by the quality signal, `0..=1`.
fn confidence_level(submission_count: usize, quality_score: Option<f64>) -> f64 {
    let base = (submission_count as f64 / FULL_CONFIDENCE_SAMPLES).min(1.0);
    let boost = quality_score
        .map(|quality| ((quality - 50.0) / 50.0 * 0.3).clamp(-0.2, 0.3))
        .unwrap_or(0.0);
    (base * (1.0 + boost)).min(1.0)
}

/// Warnings derived from the current date, independent of the recommended
/// window.
fn current_date_warnings(now: &chrono::DateTime<chrono::Utc>, industry: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    let day = week::date_index(now);
    let hour = now.hour();

    if day == 5 {
        warnings
            .push("It's Friday - applications often sit unread over the weekend".to_string());
    }
    if week::is_weekend(day) {
        warnings.push("Weekend submissions see much lower recruiter activity".to_string());
    }
    if hour < 7 || hour > 18 {
        warnings.push(
            "Outside typical business hours - consider waiting for the morning".to_string(),
        );
    }
    if now.day() >= 25 {
        warnings.push("Month-end: hiring teams are busy closing out the month".to_string());
    }
    if matches!(now.month(), 2 | 5 | 8 | 11) && now.day() >= 20 {
        warnings
            .push("Quarter-end approaching - decision makers may be in planning".to_string());
    }
    if industry == "Technology" {
        warnings.push(
            "Technology companies often batch-review applications midweek".to_string(),
        );
    }
    warnings
}

#[cfg(test)]
#[path = "recommendation_tests.rs"]
mod recommendation_tests;
