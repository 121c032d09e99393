//! # ATO Rust Backend
//!
//! Submission timing optimization engine for job applications.
//!
//! This crate analyzes historical application-submission outcomes to recommend
//! *when* to submit, schedules future submissions with reminders, and runs
//! controlled timing experiments with chi-square significance testing. The
//! backend exposes a REST API via Axum for the frontend.
//!
//! ## Features
//!
//! - **Pattern Analysis**: aggregate per-segment submission timing statistics
//! - **Recommendations**: timezone-adjusted, quality-weighted timing advice
//! - **Scheduling**: future submissions, reminders, calendar view, statistics
//! - **Experiments**: timing A/B tests with significance testing
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types shared across services and the API
//! - [`db`]: Repository pattern and persistence layer
//! - [`services`]: High-level business logic (analyzer, engine, scheduler, experiments)
//! - [`clock`]: Injectable time source so relative-time logic stays testable
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod clock;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
