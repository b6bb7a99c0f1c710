//! Business metrics for the helpdesk.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `helpdesk_tickets_created_total` - Tickets created
//! - `helpdesk_tickets_updated_total` - Tickets updated
//! - `helpdesk_stats_requests_total` - Stats snapshots computed
//! - `helpdesk_classifications_total{path, reason}` - Classifications by path
//! - `helpdesk_ticket_store_operations_total{store, operation}` - Store calls
//!
//! ## Gauges
//! - `helpdesk_stats_snapshot_tickets` - Tickets in the latest stats snapshot
//!
//! ## Histograms
//! - `helpdesk_provider_duration_seconds` - Inference provider latency

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Latency buckets for every `*_duration_seconds` histogram.
const DURATION_BUCKETS: &[f64] = &[0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

/// Register descriptions for every metric.
///
/// Call once at startup, after installing the recorder.
pub fn register_metrics() {
    describe_counter!("helpdesk_tickets_created_total", "Total number of tickets created");
    describe_counter!("helpdesk_tickets_updated_total", "Total number of ticket updates");
    describe_counter!(
        "helpdesk_stats_requests_total",
        "Total number of stats snapshots computed"
    );
    describe_gauge!(
        "helpdesk_stats_snapshot_tickets",
        "Number of tickets in the most recent stats snapshot"
    );
    describe_counter!(
        "helpdesk_classifications_total",
        "Classifications by path (primary, fallback) and reason"
    );
    describe_histogram!(
        "helpdesk_provider_duration_seconds",
        "Time spent waiting on the inference provider"
    );
    describe_counter!(
        "helpdesk_ticket_store_operations_total",
        "Ticket store operations by store and operation"
    );

    tracing::info!("Metrics registered");
}

/// Install the global Prometheus recorder and register metric descriptions.
///
/// # Errors
///
/// Returns an error if a recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Suffix("duration_seconds".to_string()), DURATION_BUCKETS)?
        .install_recorder()?;

    register_metrics();
    Ok(handle)
}

/// Record a ticket creation.
pub fn record_ticket_created() {
    metrics::counter!("helpdesk_tickets_created_total").increment(1);
}

/// Record a ticket update.
pub fn record_ticket_updated() {
    metrics::counter!("helpdesk_tickets_updated_total").increment(1);
}

/// Record a stats request over `total_tickets` tickets.
#[allow(clippy::cast_precision_loss)] // Gauge values are f64
pub fn record_stats_request(total_tickets: u64) {
    metrics::counter!("helpdesk_stats_requests_total").increment(1);
    metrics::gauge!("helpdesk_stats_snapshot_tickets").set(total_tickets as f64);
    tracing::debug!(total_tickets, "Recorded stats_request metric");
}
