//! Application state for the helpdesk HTTP server.

use helpdesk_core::{Classifier, TicketStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via Arc) for each request. The store is the only shared
/// mutable resource; the classifier holds immutable configuration.
#[derive(Clone)]
pub struct AppState {
    /// Ticket persistence
    pub store: Arc<dyn TicketStore>,

    /// Label suggestions for ticket descriptions
    pub classifier: Arc<Classifier>,

    /// Prometheus handle, `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state without a metrics endpoint.
    #[must_use]
    pub fn new(store: Arc<dyn TicketStore>, classifier: Arc<Classifier>) -> Self {
        Self {
            store,
            classifier,
            metrics: None,
        }
    }

    /// Serve the given Prometheus handle at `/metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
