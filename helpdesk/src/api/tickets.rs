//! Ticket API endpoints.
//!
//! - POST /api/tickets - Create a ticket
//! - GET /api/tickets - List tickets, newest first, with optional filters
//! - GET /api/tickets/:id - Fetch one ticket
//! - PATCH|PUT /api/tickets/:id - Update a ticket

use super::{json_rejection, path_rejection};
use crate::metrics;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use helpdesk_core::{NewTicket, ParseLabelError, Ticket, TicketFilter, TicketId, TicketPatch};
use helpdesk_web::{AppError, CorrelationId};
use serde::Deserialize;
use std::str::FromStr;

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters shared by listing and stats.
///
/// Values arrive as plain strings so that empty parameters (`?category=`)
/// can be ignored and unknown labels reported as validation errors.
#[derive(Debug, Default, Deserialize)]
pub struct TicketQuery {
    /// Filter by category
    pub category: Option<String>,
    /// Filter by priority
    pub priority: Option<String>,
    /// Filter by status
    pub status: Option<String>,
    /// Whitespace-separated terms that must all occur in title or description
    pub search: Option<String>,
}

impl TicketQuery {
    /// Converts the query into a store filter.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown label value.
    pub fn into_filter(self) -> Result<TicketFilter, AppError> {
        let mut filter = TicketFilter::all();

        if let Some(category) = label(self.category.as_deref())? {
            filter = filter.with_category(category);
        }
        if let Some(priority) = label(self.priority.as_deref())? {
            filter = filter.with_priority(priority);
        }
        if let Some(status) = label(self.status.as_deref())? {
            filter = filter.with_status(status);
        }
        if let Some(search) = self.search.filter(|s| !s.trim().is_empty()) {
            filter = filter.with_search(search);
        }

        Ok(filter)
    }
}

fn label<T>(value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = ParseLabelError>,
{
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e: ParseLabelError| AppError::validation(e.to_string())),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a ticket.
///
/// Omitted labels default to `general` / `low` / `open`.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8000/api/tickets \
///   -H "Content-Type: application/json" \
///   -d '{"title": "Refund request", "description": "Charged twice", "category": "billing"}'
/// ```
#[tracing::instrument(skip_all, fields(correlation_id = %correlation_id))]
pub async fn create_ticket(
    correlation_id: CorrelationId,
    State(state): State<AppState>,
    payload: Result<Json<NewTicket>, JsonRejection>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let Json(new_ticket) = payload.map_err(|e| json_rejection(&e))?;

    let ticket = state.store.insert(new_ticket).await?;
    metrics::record_ticket_created();
    tracing::info!(
        ticket_id = %ticket.id,
        category = %ticket.category,
        priority = %ticket.priority,
        "Ticket created"
    );

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// List tickets, newest first.
///
/// # Example
///
/// ```bash
/// curl 'http://localhost:8000/api/tickets?category=billing&status=open&search=refund'
/// ```
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<TicketQuery>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    let filter = query.into_filter()?;
    let tickets = state.store.list(&filter).await?;
    Ok(Json(tickets))
}

/// Fetch one ticket by id.
pub async fn get_ticket(
    State(state): State<AppState>,
    id: Result<Path<TicketId>, PathRejection>,
) -> Result<Json<Ticket>, AppError> {
    let Path(id) = id.map_err(|e| path_rejection(&e))?;

    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Ticket", id))
}

/// Update a ticket. Fields absent from the body are left unchanged.
///
/// Served for both PATCH and PUT.
///
/// # Example
///
/// ```bash
/// curl -X PATCH http://localhost:8000/api/tickets/550e8400-e29b-41d4-a716-446655440000 \
///   -H "Content-Type: application/json" \
///   -d '{"status": "resolved"}'
/// ```
#[tracing::instrument(skip_all, fields(correlation_id = %correlation_id))]
pub async fn update_ticket(
    correlation_id: CorrelationId,
    State(state): State<AppState>,
    id: Result<Path<TicketId>, PathRejection>,
    payload: Result<Json<TicketPatch>, JsonRejection>,
) -> Result<Json<Ticket>, AppError> {
    let Path(id) = id.map_err(|e| path_rejection(&e))?;
    let Json(patch) = payload.map_err(|e| json_rejection(&e))?;

    let ticket = state.store.update(id, patch).await?;
    metrics::record_ticket_updated();
    tracing::info!(ticket_id = %ticket.id, status = %ticket.status, "Ticket updated");

    Ok(Json(ticket))
}
