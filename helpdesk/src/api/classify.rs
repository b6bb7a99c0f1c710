//! Classification endpoint.
//!
//! - POST /api/tickets/classify - Suggest a category and priority

use super::json_rejection;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use helpdesk_core::ClassificationResult;
use helpdesk_web::{AppError, CorrelationId};
use serde::Deserialize;

/// Request to classify a ticket description.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    /// Free-text description; a missing field counts as empty
    #[serde(default)]
    pub description: String,
}

/// Suggest labels for a description.
///
/// Provider failures never surface here: the response then carries keyword
/// rule labels and a `warning`. Only an empty description is rejected.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8000/api/tickets/classify \
///   -H "Content-Type: application/json" \
///   -d '{"description": "I was charged twice for my subscription"}'
/// # {"suggested_category":"billing","suggested_priority":"medium"}
/// ```
#[tracing::instrument(skip_all, fields(correlation_id = %correlation_id))]
pub async fn classify_ticket(
    correlation_id: CorrelationId,
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassificationResult>, AppError> {
    let Json(request) = payload.map_err(|e| json_rejection(&e))?;

    let result = state.classifier.classify(&request.description).await?;
    Ok(Json(result))
}
