//! Persistence layer for timing data.
//!
//! This module provides abstractions for store operations via the Repository
//! pattern, allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API)                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services::*) - Business Logic           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository.rs) - Abstract Interface │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! The store contract covers five logical collections: submission metrics,
//! industry patterns, recommendations, scheduled submissions, and
//! experiments. Experiment tallies are incremented through atomic repository
//! operations rather than read-modify-write in callers.

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod error;
pub mod factory;
pub mod repositories;
pub mod repository;

pub use config::{BackendKind, RepositoryConfig};
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use factory::RepositoryFactory;
pub use repositories::LocalRepository;
pub use repository::{
    ExperimentRepository, FullRepository, MetricsRepository, PatternRepository,
    RecommendationRepository, ScheduleRepository,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Initialize the global repository singleton for the configured backend.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let config = RepositoryConfig::load().map_err(|e| anyhow::Error::msg(e.to_string()))?;
    let repo =
        RepositoryFactory::create(&config).map_err(|e| anyhow::Error::msg(e.to_string()))?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if REPOSITORY.get().is_none() {
        let _ = init_repository();
    }

    REPOSITORY
        .get()
        .context("Store not initialized. Call init_repository() first.")
}
