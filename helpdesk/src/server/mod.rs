//! HTTP server module for the helpdesk.
//!
//! This module provides the Axum-based HTTP server with:
//! - Application state management
//! - Health, readiness and metrics endpoints
//! - Router configuration

pub mod health;
pub mod routes;
pub mod state;

pub use health::{health_check, metrics_handler, readiness_check};
pub use routes::{build_app, build_router};
pub use state::AppState;
