//! Personalized timing recommendations.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a recommendation stays valid after creation.
pub const RECOMMENDATION_VALIDITY_DAYS: i64 = 7;

/// Inputs for generating a recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub industry: String,
    pub company_size: String,
    /// Applicant quality signal in `0..=100`, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    /// Timezone code from the offset table; defaults to EST.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_remote: Option<bool>,
}

/// A persisted timing recommendation. Newer rows supersede older ones;
/// "latest" queries only consider rows with `valid_until` in the future.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingRecommendation {
    pub user_id: String,
    pub recommended_day: String,
    pub recommended_time_range: String,
    pub reasoning: String,
    pub warnings: Vec<String>,
    /// Real-time guidance, e.g. "Submit now" or "Wait N hours".
    pub current_recommendation: String,
    /// Minutes until the recommended window opens; zero when inside it.
    pub time_until_optimal_minutes: i64,
    /// Expected response-rate lift from optimal timing, percent in `10..=50`.
    pub estimated_improvement_rate: f64,
    /// Engine's self-assessed certainty, `0..=1`.
    pub confidence_level: f64,
    /// Projected success rate, `0..=100`.
    pub historical_success_rate: f64,
    pub created_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

impl TimingRecommendation {
    /// Validity window end for a recommendation created at `created_at`.
    pub fn expiry(created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + Duration::days(RECOMMENDATION_VALIDITY_DAYS)
    }

    /// Whether the recommendation is still valid at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_until > now
    }
}
