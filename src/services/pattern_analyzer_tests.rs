use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use crate::db::repositories::LocalRepository;
use crate::db::repository::{FullRepository, PatternRepository};
use crate::models::correlation::AnalysisOutcome;
use crate::models::{timezone, IndustryTimingPattern, NewSubmissionMetric};
use crate::services::pattern_analyzer::PatternAnalyzer;

/// 2024-06-02 is a Sunday; offsets pick the weekday.
fn submission_at(day_offset: i64, hour: u32, got_interview: bool) -> NewSubmissionMetric {
    let sunday = Utc.with_ymd_and_hms(2024, 6, 2, hour, 0, 0).unwrap();
    NewSubmissionMetric {
        application_id: format!("app-{}-{}", day_offset, hour),
        submitted_at: sunday + Duration::days(day_offset),
        industry: "Technology".to_string(),
        company_size: "startup".to_string(),
        got_interview,
        response_time_hours: None,
    }
}

fn analyzer() -> (PatternAnalyzer, Arc<LocalRepository>) {
    let repo = Arc::new(LocalRepository::new());
    let analyzer = PatternAnalyzer::new(repo.clone() as Arc<dyn FullRepository>);
    (analyzer, repo)
}

#[tokio::test]
async fn test_zero_history_returns_default_pattern() {
    let (analyzer, _repo) = analyzer();

    let pattern = analyzer
        .analyze_industry_patterns("Finance", "enterprise")
        .await
        .unwrap();

    assert_eq!(pattern.best_day_of_week, "Tuesday");
    assert_eq!(pattern.best_hour_range, "9-11 AM");
    assert_eq!(pattern.avg_response_rate, 0.15);
    assert_eq!(pattern.submission_count, 0);
    assert_eq!(pattern.bad_days, vec!["Friday", "Saturday", "Sunday"]);
    assert!(!pattern.avoid_reasons.is_empty());
}

#[tokio::test]
async fn test_precomputed_pattern_is_preferred() {
    let (analyzer, repo) = analyzer();

    let stored = IndustryTimingPattern {
        industry: "Technology".to_string(),
        company_size: "startup".to_string(),
        best_day_of_week: "Thursday".to_string(),
        best_hour_start: 14,
        best_hour_range: "14-16 AM".to_string(),
        avg_response_rate: 0.42,
        submission_count: 123,
        bad_days: vec!["Monday".to_string()],
        avoid_reasons: vec![],
        avg_response_time_hours: 48,
        time_zone_considerations: timezone::considerations(),
    };
    repo.store_pattern(&stored).await.unwrap();

    // Add conflicting raw history that would compute a different answer.
    for i in 0..5 {
        analyzer
            .track_submission("u1", submission_at(2, 9 + i % 2, true))
            .await
            .unwrap();
    }

    let pattern = analyzer
        .analyze_industry_patterns("Technology", "startup")
        .await
        .unwrap();
    assert_eq!(pattern.best_day_of_week, "Thursday");
    assert_eq!(pattern.submission_count, 123);
}

#[tokio::test]
async fn test_wednesday_dominates_and_other_days_are_bad() {
    let (analyzer, _repo) = analyzer();

    // Wednesday: 10/10 interviews. Every other day: 0/10.
    for day in 0..7 {
        for i in 0..10 {
            analyzer
                .track_submission("u1", submission_at(day, 9 + (i % 3) as u32, day == 3))
                .await
                .unwrap();
        }
    }

    let pattern = analyzer
        .analyze_industry_patterns("Technology", "startup")
        .await
        .unwrap();

    assert_eq!(pattern.best_day_of_week, "Wednesday");
    assert_eq!(pattern.submission_count, 70);
    assert!((pattern.avg_response_rate - 10.0 / 70.0).abs() < 1e-9);
    // All six zero-rate days fall below 0.7x the mean.
    assert_eq!(pattern.bad_days.len(), 6);
    assert!(!pattern.bad_days.contains(&"Wednesday".to_string()));
}

#[tokio::test]
async fn test_best_window_tie_keeps_lowest_start() {
    let (analyzer, _repo) = analyzer();

    // Identical success profile at 6-8 and at 15-17.
    for &hour in &[6, 7, 8, 15, 16, 17] {
        analyzer
            .track_submission("u1", submission_at(2, hour, true))
            .await
            .unwrap();
        analyzer
            .track_submission("u1", submission_at(3, hour, false))
            .await
            .unwrap();
    }

    let pattern = analyzer
        .analyze_industry_patterns("Technology", "startup")
        .await
        .unwrap();
    assert_eq!(pattern.best_hour_start, 6);
    assert_eq!(pattern.best_hour_range, "6-8 AM");
}

#[tokio::test]
async fn test_average_response_time_rounds_to_whole_hours() {
    let (analyzer, _repo) = analyzer();

    for (i, hours) in [Some(24.0), Some(49.0), None].iter().enumerate() {
        let mut new = submission_at(2, 10, true);
        new.application_id = format!("app-{}", i);
        new.response_time_hours = *hours;
        analyzer.track_submission("u1", new).await.unwrap();
    }

    let pattern = analyzer
        .analyze_industry_patterns("Technology", "startup")
        .await
        .unwrap();
    // mean of 24 and 49 is 36.5, rounded to 37
    assert_eq!(pattern.avg_response_time_hours, 37);
}

#[tokio::test]
async fn test_track_submission_derives_day_and_hour() {
    let (analyzer, _repo) = analyzer();

    let metric = analyzer
        .track_submission("u1", submission_at(3, 14, true))
        .await
        .unwrap();
    assert_eq!(metric.day_of_week, "Wednesday");
    assert_eq!(metric.hour_of_day, 14);
    assert_eq!(metric.user_id, "u1");
}

#[tokio::test]
async fn test_correlation_below_minimum_is_insufficient() {
    let (analyzer, _repo) = analyzer();

    for day in 0..4 {
        analyzer
            .track_submission("u1", submission_at(day, 9, true))
            .await
            .unwrap();
    }

    let outcome = analyzer
        .calculate_timing_correlation("u1", None)
        .await
        .unwrap();
    match outcome {
        AnalysisOutcome::InsufficientData {
            minimum_required,
            actual,
            ..
        } => {
            assert_eq!(minimum_required, 5);
            assert_eq!(actual, 4);
        }
        AnalysisOutcome::Ready { .. } => panic!("expected insufficient data"),
    }
}

#[tokio::test]
async fn test_correlation_finds_best_day_and_hour() {
    let (analyzer, _repo) = analyzer();

    // Tuesday 10:00 wins; Thursday 16:00 loses.
    for _ in 0..3 {
        analyzer
            .track_submission("u1", submission_at(2, 10, true))
            .await
            .unwrap();
    }
    analyzer
        .track_submission("u1", submission_at(4, 16, false))
        .await
        .unwrap();
    analyzer
        .track_submission("u1", submission_at(4, 16, false))
        .await
        .unwrap();

    let outcome = analyzer
        .calculate_timing_correlation("u1", None)
        .await
        .unwrap();
    let analysis = outcome.as_ready().expect("expected analysis");
    assert_eq!(analysis.best_day.label, "Tuesday");
    assert_eq!(analysis.best_day.success_ratio, 1.0);
    assert_eq!(analysis.best_hour.label, "10:00");
    assert!(analysis.summary.contains("Tuesday"));
    assert_eq!(analysis.by_day.len(), 7);
    assert_eq!(analysis.by_hour.len(), 24);
}

#[tokio::test]
async fn test_correlation_respects_industry_filter() {
    let (analyzer, _repo) = analyzer();

    for day in 0..6 {
        analyzer
            .track_submission("u1", submission_at(day, 9, true))
            .await
            .unwrap();
    }

    let outcome = analyzer
        .calculate_timing_correlation("u1", Some("Finance"))
        .await
        .unwrap();
    assert!(outcome.as_ready().is_none());
}
