//! Domain types shared across services, repositories, and the HTTP API.

pub mod correlation;
pub mod experiment;
pub mod metric;
pub mod pattern;
pub mod recommendation;
pub mod schedule;
pub mod timezone;
pub mod week;

pub use correlation::{
    AnalysisOutcome, CorrelationAnalysis, SlotRanking, SlotStat, TimingBreakdown,
    MIN_CORRELATION_SAMPLES,
};
pub use experiment::{
    CompletedTest, Experiment, ExperimentStatus, GroupMetrics, NewExperiment, ResponseType,
    TestAnalysis, TestGroup, DEFAULT_MINIMUM_SAMPLE_SIZE, DEFAULT_TEST_DURATION_DAYS,
};
pub use metric::{NewSubmissionMetric, SubmissionMetric};
pub use pattern::IndustryTimingPattern;
pub use recommendation::{
    RecommendationRequest, TimingRecommendation, RECOMMENDATION_VALIDITY_DAYS,
};
pub use schedule::{
    CalendarEntry, CalendarView, NewScheduledSubmission, ProcessReport, ReminderReport,
    ScheduleStatus, ScheduledSubmission, SchedulingStatistics, DEFAULT_REMINDER_MINUTES,
};
pub use timezone::{TimezoneNote, DEFAULT_TIMEZONE, TIMEZONE_OFFSETS};
