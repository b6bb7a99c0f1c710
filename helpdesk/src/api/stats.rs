//! Statistics endpoint.
//!
//! - GET /api/tickets/stats - Aggregate statistics, optionally over a filtered view

use super::tickets::TicketQuery;
use crate::metrics;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use helpdesk_core::StatsSnapshot;
use helpdesk_web::AppError;

/// Compute statistics over one snapshot of the ticket collection.
///
/// Accepts the same filters as the list endpoint. Every field of the response
/// is derived from a single store read.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8000/api/tickets/stats
/// # {"total_tickets":5,"open_tickets":3,"avg_tickets_per_day":1.67,
/// #  "priority_breakdown":{"low":2,"high":3},"category_breakdown":{"billing":5}}
/// ```
pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<TicketQuery>,
) -> Result<Json<StatsSnapshot>, AppError> {
    let filter = query.into_filter()?;
    let tickets = state.store.list(&filter).await?;

    let snapshot = StatsSnapshot::compute(&tickets);
    metrics::record_stats_request(snapshot.total_tickets);

    Ok(Json(snapshot))
}
