//! # Helpdesk Core
//!
//! Domain types, the statistics engine and the ticket classifier for Helpdesk.
//!
//! This crate has no I/O of its own. Storage and inference are reached through
//! the [`TicketStore`] and [`InferenceProvider`] traits, and time through
//! [`Clock`], so every component can be driven deterministically in tests.
//!
//! ## Components
//!
//! - **Types**: [`Ticket`], its label enums and validated input types
//! - **Store**: the [`TicketStore`] trait and an in-memory implementation
//! - **Stats**: pure aggregation over a ticket slice ([`StatsSnapshot`])
//! - **Classifier**: provider-backed labelling with a keyword fallback
//!
//! ## Example
//!
//! ```
//! use helpdesk_core::{
//!     Category, Classifier, ClassifierConfig, Priority, UnconfiguredProvider,
//! };
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let classifier = Classifier::new(Arc::new(UnconfiguredProvider), ClassifierConfig::default());
//! let result = classifier.classify("I was charged twice").await.unwrap();
//!
//! assert_eq!(result.suggested_category, Category::Billing);
//! assert_eq!(result.suggested_priority, Priority::Medium);
//! assert!(result.warning.is_some());
//! # });
//! ```

pub mod classifier;
pub mod environment;
pub mod provider;
pub mod stats;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub use classifier::{
    ClassificationResult, Classifier, ClassifierConfig, ClassifyError, FALLBACK_WARNING,
    PrimaryPathError,
};
pub use environment::{Clock, SystemClock};
pub use provider::{CompletionRequest, InferenceProvider, ProviderError, UnconfiguredProvider};
pub use stats::StatsSnapshot;
pub use store::{InMemoryTicketStore, StoreError, TicketFilter, TicketStore};
pub use types::{
    Category, MAX_TITLE_LENGTH, NewTicket, ParseLabelError, Priority, Status, Ticket, TicketId,
    TicketPatch, TicketValidationError,
};
