//! Helpdesk - support ticket tracking with stats and AI-assisted classification
//!
//! The application crate wires the workspace together:
//!
//! - **Configuration** from environment variables ([`Config`])
//! - **Resources**: ticket store (`PostgreSQL` or in-memory) and classifier
//! - **HTTP API**: tickets, stats and classification under `/api`
//! - **Metrics**: Prometheus counters and histograms at `/metrics`
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────────────────────┐
//!   HTTP ───────▶ │  api::{tickets, stats,   │
//!                 │        classify}         │
//!                 └──────────────────────────┘
//!                    │            │        │
//!          list/insert/update     │     classify
//!                    ▼            ▼        ▼
//!             ┌─────────────┐ ┌───────┐ ┌────────────┐    ┌───────────────┐
//!             │ TicketStore │ │ Stats │ │ Classifier │──▶ │ InferenceProv.│
//!             └─────────────┘ └───────┘ └────────────┘    └───────────────┘
//!                                            │ failure
//!                                            ▼
//!                                      keyword rules
//! ```
//!
//! # Example
//!
//! ```
//! use helpdesk::server::{AppState, build_app};
//! use helpdesk_core::{Classifier, ClassifierConfig, InMemoryTicketStore, SystemClock, UnconfiguredProvider};
//! use std::sync::Arc;
//!
//! let state = AppState::new(
//!     Arc::new(InMemoryTicketStore::new(Arc::new(SystemClock))),
//!     Arc::new(Classifier::new(Arc::new(UnconfiguredProvider), ClassifierConfig::default())),
//! );
//! let app = build_app(state, &[]);
//! # let _ = app;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod metrics;
pub mod provider;
pub mod server;

pub use bootstrap::Resources;
pub use config::Config;
pub use provider::{AnthropicProvider, build_provider};
pub use server::{AppState, build_app, build_router};
