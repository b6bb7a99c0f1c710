//! API endpoints for the helpdesk.
//!
//! - Tickets: create, list, fetch and update tickets
//! - Stats: aggregate statistics over the ticket collection
//! - Classify: category/priority suggestions for a description

pub mod classify;
pub mod stats;
pub mod tickets;

pub use classify::classify_ticket;
pub use stats::get_stats;
pub use tickets::{TicketQuery, create_ticket, get_ticket, list_tickets, update_ticket};

use axum::extract::rejection::{JsonRejection, PathRejection};
use helpdesk_web::AppError;

/// Malformed JSON bodies are client errors.
fn json_rejection(rejection: &JsonRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}

fn path_rejection(rejection: &PathRejection) -> AppError {
    AppError::bad_request(format!("Invalid ticket id: {}", rejection.body_text()))
}
