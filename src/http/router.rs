//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Pattern analysis
        .route("/metrics", post(handlers::track_metric))
        .route("/patterns", get(handlers::get_pattern))
        .route("/users/{user_id}/correlation", get(handlers::get_user_correlation))
        // Recommendations
        .route("/users/{user_id}/recommendations", post(handlers::create_recommendation))
        .route(
            "/users/{user_id}/recommendations/latest",
            get(handlers::get_latest_recommendation),
        )
        // Scheduling
        .route("/schedules", post(handlers::create_schedule))
        .route("/schedules/process", post(handlers::process_schedules))
        .route("/schedules/reminders", post(handlers::send_reminders))
        .route("/schedules/{id}/reschedule", post(handlers::reschedule))
        .route("/schedules/{id}/cancel", post(handlers::cancel_schedule))
        .route("/users/{user_id}/schedules", get(handlers::list_schedules))
        .route("/users/{user_id}/schedules/upcoming", get(handlers::upcoming_schedules))
        .route(
            "/users/{user_id}/schedules/statistics",
            get(handlers::scheduling_statistics),
        )
        .route("/users/{user_id}/calendar", get(handlers::calendar_view))
        // Experiments
        .route("/experiments", post(handlers::create_experiment))
        .route("/experiments/{id}/submissions", post(handlers::record_test_submission))
        .route("/experiments/{id}/responses", post(handlers::record_test_response))
        .route("/experiments/{id}/analysis", get(handlers::analyze_experiment))
        .route("/experiments/{id}/complete", post(handlers::complete_experiment))
        .route("/users/{user_id}/experiments", get(handlers::list_experiments))
        .route(
            "/users/{user_id}/timing-correlation",
            get(handlers::timing_breakdown),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
