//! Axum integration for Helpdesk.
//!
//! The shell around the pure core: HTTP error mapping and request
//! correlation. Routing and handlers live in the `helpdesk` crate.
//!
//! # Example
//!
//! ```
//! use axum::{Json, Router, routing::get};
//! use helpdesk_core::{StoreError, TicketId};
//! use helpdesk_web::{AppError, CorrelationId, WebResult, correlation_id_layer};
//!
//! async fn missing(correlation_id: CorrelationId) -> WebResult<Json<()>> {
//!     tracing::info!(%correlation_id, "Looking up ticket");
//!     Err(StoreError::NotFound(TicketId::new()).into())
//! }
//!
//! let app: Router = Router::new()
//!     .route("/missing", get(missing))
//!     .layer(correlation_id_layer());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::CorrelationId;
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
