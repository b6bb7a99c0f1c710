//! Statistics aggregation engine.
//!
//! Every function here is a pure function of the ticket slice it is given. A
//! [`StatsSnapshot`] is computed from one slice, so all of its fields describe
//! the same collection: `total_tickets` always equals the sum of either
//! breakdown.
//!
//! Tickets are grouped into calendar days by the UTC date of `created_at`.

use crate::types::{Category, Priority, Status, Ticket};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Derived statistics over a ticket collection. Never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Number of tickets
    pub total_tickets: u64,
    /// Number of tickets with status `open`
    pub open_tickets: u64,
    /// Mean tickets per distinct creation day, rounded to 2 decimals
    pub avg_tickets_per_day: f64,
    /// Count per priority (only priorities that occur)
    pub priority_breakdown: BTreeMap<Priority, u64>,
    /// Count per category (only categories that occur)
    pub category_breakdown: BTreeMap<Category, u64>,
}

impl StatsSnapshot {
    /// Computes every statistic from the same slice.
    #[must_use]
    pub fn compute(tickets: &[Ticket]) -> Self {
        Self {
            total_tickets: total(tickets),
            open_tickets: open_count(tickets),
            avg_tickets_per_day: average_per_day(tickets),
            priority_breakdown: breakdown_by(tickets, |t| t.priority),
            category_breakdown: breakdown_by(tickets, |t| t.category),
        }
    }
}

/// Number of tickets in the collection.
#[must_use]
pub fn total(tickets: &[Ticket]) -> u64 {
    tickets.len() as u64
}

/// Number of tickets whose status is `open`.
#[must_use]
pub fn open_count(tickets: &[Ticket]) -> u64 {
    tickets.iter().filter(|t| t.status == Status::Open).count() as u64
}

/// Mean of the per-day ticket counts, rounded to 2 decimal places.
///
/// Only days with at least one ticket count as days. Returns `0.0` for an
/// empty collection.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Ticket counts are far below 2^52
pub fn average_per_day(tickets: &[Ticket]) -> f64 {
    let per_day = tickets_per_day(tickets);
    if per_day.is_empty() {
        return 0.0;
    }

    let days = per_day.len() as f64;
    let mean = per_day.values().sum::<u64>() as f64 / days;
    round_to_hundredths(mean)
}

/// Counts tickets per calendar day (UTC).
#[must_use]
pub fn tickets_per_day(tickets: &[Ticket]) -> BTreeMap<NaiveDate, u64> {
    breakdown_by(tickets, |t| t.created_at.date_naive())
}

/// Counts tickets per value of the selected field.
///
/// The map is sparse: values that never occur are absent, never zero.
///
/// ```
/// use helpdesk_core::stats::breakdown_by;
/// use helpdesk_core::Ticket;
///
/// let tickets: Vec<Ticket> = Vec::new();
/// assert!(breakdown_by(&tickets, |t| t.category).is_empty());
/// ```
#[must_use]
pub fn breakdown_by<K, F>(tickets: &[Ticket], field: F) -> BTreeMap<K, u64>
where
    K: Ord,
    F: Fn(&Ticket) -> K,
{
    let mut counts = BTreeMap::new();
    for ticket in tickets {
        *counts.entry(field(ticket)).or_insert(0) += 1;
    }
    counts
}

/// Halves round to even: 2.125 becomes 2.12.
fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
