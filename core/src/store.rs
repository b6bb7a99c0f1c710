//! Ticket persistence seam.
//!
//! [`TicketStore`] is the only shared mutable resource in the system. The
//! statistics engine and the classifier never write to it; HTTP handlers use it
//! for create/list/update and to take the snapshot that stats are computed from.
//!
//! One call to [`TicketStore::list`] returns one consistent view of the
//! collection. Implementations must not interleave concurrent writes into a
//! single result.

use crate::environment::Clock;
use crate::types::{
    Category, NewTicket, Priority, Status, Ticket, TicketId, TicketPatch, TicketValidationError,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors surfaced by ticket stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No ticket with the given id
    #[error("ticket {0} not found")]
    NotFound(TicketId),

    /// Submitted fields failed validation
    #[error("invalid ticket: {0}")]
    Validation(#[from] TicketValidationError),

    /// Underlying storage failed
    #[error("storage error: {0}")]
    Backend(String),

    /// A stored row could not be mapped back to a ticket
    #[error("corrupt ticket record: {0}")]
    Corrupt(String),
}

/// Filter applied when listing tickets.
///
/// All present criteria must match. `search` is split on whitespace and every
/// term must occur, case-insensitively, in the title or the description.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilter {
    /// Exact category
    pub category: Option<Category>,
    /// Exact priority
    pub priority: Option<Priority>,
    /// Exact status
    pub status: Option<Status>,
    /// Free-text search over title and description
    pub search: Option<String>,
}

impl TicketFilter {
    /// Filter that matches every ticket
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Builder: Restrict to a category
    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Builder: Restrict to a priority
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Builder: Restrict to a status
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Builder: Free-text search
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Lower-cased search terms. Empty when there is no search.
    #[must_use]
    pub fn search_terms(&self) -> Vec<String> {
        self.search
            .as_deref()
            .map(|s| s.split_whitespace().map(str::to_lowercase).collect())
            .unwrap_or_default()
    }

    /// Returns `true` if the ticket satisfies every criterion.
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.category.is_some_and(|c| c != ticket.category)
            || self.priority.is_some_and(|p| p != ticket.priority)
            || self.status.is_some_and(|s| s != ticket.status)
        {
            return false;
        }

        let terms = self.search_terms();
        if terms.is_empty() {
            return true;
        }

        let title = ticket.title.to_lowercase();
        let description = ticket.description.to_lowercase();
        terms
            .iter()
            .all(|term| title.contains(term.as_str()) || description.contains(term.as_str()))
    }
}

/// Storage for tickets.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Short backend name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Validates and stores a new ticket, assigning its id and `created_at`.
    ///
    /// # Errors
    ///
    /// `StoreError::Validation` for bad input, `StoreError::Backend` on storage failure.
    async fn insert(&self, ticket: NewTicket) -> Result<Ticket, StoreError>;

    /// Fetches a ticket by id.
    ///
    /// # Errors
    ///
    /// `StoreError::Backend` on storage failure.
    async fn get(&self, id: TicketId) -> Result<Option<Ticket>, StoreError>;

    /// Lists tickets matching the filter, newest-created first.
    ///
    /// The result is a single consistent snapshot of the collection.
    ///
    /// # Errors
    ///
    /// `StoreError::Backend` on storage failure.
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, StoreError>;

    /// Applies a partial update and returns the updated ticket.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if the id is unknown, `StoreError::Validation`
    /// for bad input.
    async fn update(&self, id: TicketId, patch: TicketPatch) -> Result<Ticket, StoreError>;

    /// Checks that the backend is reachable.
    ///
    /// # Errors
    ///
    /// `StoreError::Backend` if it is not.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// In-memory ticket store.
///
/// Tickets are kept in insertion order behind a single lock, so every
/// [`list`](TicketStore::list) call observes one consistent collection.
#[derive(Clone)]
pub struct InMemoryTicketStore {
    tickets: Arc<RwLock<Vec<Ticket>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTicketStore {
    /// Create an empty store using the given clock for `created_at`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tickets: Arc::new(RwLock::new(Vec::new())),
            clock,
        }
    }

    /// Create a store pre-populated with tickets (kept in the given order)
    #[must_use]
    pub fn with_tickets(clock: Arc<dyn Clock>, tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: Arc::new(RwLock::new(tickets)),
            clock,
        }
    }

    /// Number of stored tickets
    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    /// Returns `true` if no tickets are stored
    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, ticket: NewTicket) -> Result<Ticket, StoreError> {
        ticket.validate()?;

        let ticket = ticket.into_ticket(TicketId::new(), self.clock.now());
        self.tickets.write().await.push(ticket.clone());

        tracing::debug!(ticket_id = %ticket.id, "Ticket inserted");
        Ok(ticket)
    }

    async fn get(&self, id: TicketId) -> Result<Option<Ticket>, StoreError> {
        let tickets = self.tickets.read().await;
        Ok(tickets.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, StoreError> {
        let mut matching: Vec<Ticket> = {
            let tickets = self.tickets.read().await;
            // Most recent insertion first so equal timestamps stay newest-first
            tickets
                .iter()
                .rev()
                .filter(|t| filter.matches(t))
                .cloned()
                .collect()
        };

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn update(&self, id: TicketId, patch: TicketPatch) -> Result<Ticket, StoreError> {
        patch.validate()?;

        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;

        patch.apply(ticket);
        tracing::debug!(ticket_id = %id, "Ticket updated");
        Ok(ticket.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Mutex;

    /// Advances one minute on every call.
    struct StepClock(Mutex<DateTime<Utc>>);

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Utc> {
            let mut time = self.0.lock().unwrap();
            *time += Duration::minutes(1);
            *time
        }
    }

    fn store() -> InMemoryTicketStore {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        InMemoryTicketStore::new(Arc::new(StepClock(Mutex::new(start))))
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamp() {
        let store = store();
        let ticket = store
            .insert(NewTicket::new("Refund", "Please refund me"))
            .await
            .unwrap();

        assert_eq!(
            ticket.created_at,
            Utc.with_ymd_and_hms(2025, 1, 1, 9, 1, 0).unwrap()
        );
        assert_eq!(store.get(ticket.id).await.unwrap(), Some(ticket));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_ticket() {
        let store = store();
        let err = store.insert(NewTicket::new("", "body")).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Validation(TicketValidationError::EmptyTitle)
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = store();
        let first = store.insert(NewTicket::new("First", "a")).await.unwrap();
        let second = store.insert(NewTicket::new("Second", "b")).await.unwrap();
        let third = store.insert(NewTicket::new("Third", "c")).await.unwrap();

        let ids: Vec<TicketId> = store
            .list(&TicketFilter::all())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();

        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn test_list_filters_by_labels() {
        let store = store();
        store
            .insert(NewTicket::new("Card", "charged twice").with_category(Category::Billing))
            .await
            .unwrap();
        store
            .insert(
                NewTicket::new("Crash", "app crashes")
                    .with_category(Category::Technical)
                    .with_priority(Priority::High),
            )
            .await
            .unwrap();

        let billing = store
            .list(&TicketFilter::all().with_category(Category::Billing))
            .await
            .unwrap();
        assert_eq!(billing.len(), 1);
        assert_eq!(billing[0].title, "Card");

        let high_open = store
            .list(
                &TicketFilter::all()
                    .with_priority(Priority::High)
                    .with_status(Status::Open),
            )
            .await
            .unwrap();
        assert_eq!(high_open.len(), 1);
        assert_eq!(high_open[0].title, "Crash");
    }

    #[tokio::test]
    async fn test_search_requires_every_term() {
        let store = store();
        store
            .insert(NewTicket::new("Login broken", "Cannot reset password"))
            .await
            .unwrap();
        store
            .insert(NewTicket::new("Password policy", "Question about rules"))
            .await
            .unwrap();

        let both = store
            .list(&TicketFilter::all().with_search("PASSWORD"))
            .await
            .unwrap();
        assert_eq!(both.len(), 2);

        let one = store
            .list(&TicketFilter::all().with_search("login password"))
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].title, "Login broken");

        let blank = store
            .list(&TicketFilter::all().with_search("   "))
            .await
            .unwrap();
        assert_eq!(blank.len(), 2);
    }

    #[tokio::test]
    async fn test_update_patches_ticket() {
        let store = store();
        let ticket = store.insert(NewTicket::new("Hi", "there")).await.unwrap();

        let updated = store
            .update(ticket.id, TicketPatch::status(Status::Resolved))
            .await
            .unwrap();

        assert_eq!(updated.status, Status::Resolved);
        assert_eq!(updated.created_at, ticket.created_at);
        assert_eq!(store.get(ticket.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_unknown_ticket() {
        let store = store();
        let id = TicketId::new();
        let err = store
            .update(id, TicketPatch::status(Status::Closed))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_update_validates_patch() {
        let store = store();
        let ticket = store.insert(NewTicket::new("Hi", "there")).await.unwrap();
        let patch = TicketPatch {
            description: Some("  ".to_string()),
            ..TicketPatch::default()
        };

        let err = store.update(ticket.id, patch).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(TicketValidationError::EmptyDescription)
        ));
        assert_eq!(store.get(ticket.id).await.unwrap(), Some(ticket));
    }
}
