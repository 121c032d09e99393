//! Axum-based HTTP server for the timing optimization API.
//!
//! One endpoint per public service method. Handlers perform only user
//! resolution and JSON shape-mapping; all decision logic lives in the
//! service layer.
//!
//! # Modules
//!
//! - [`dto`]: Request/response types
//! - [`error`]: HTTP error mapping
//! - [`handlers`]: Request handlers
//! - [`router`]: Route and middleware wiring
//! - [`state`]: Shared application state

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
