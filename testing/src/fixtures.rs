//! Ticket fixtures and proptest strategies.

use chrono::{DateTime, Duration, TimeZone, Utc};
use helpdesk_core::types::{Category, NewTicket, Priority, Status, Ticket, TicketId};
use proptest::prelude::*;

/// Fluent builder for fully-formed tickets.
///
/// Defaults to an open, general, low-priority ticket created at
/// 2025-01-01 00:00:00 UTC.
///
/// ```
/// use helpdesk_core::{Category, Status};
/// use helpdesk_testing::TicketBuilder;
///
/// let ticket = TicketBuilder::new()
///     .category(Category::Billing)
///     .status(Status::Resolved)
///     .build();
/// assert_eq!(ticket.category, Category::Billing);
/// ```
#[derive(Debug, Clone)]
pub struct TicketBuilder {
    id: TicketId,
    title: String,
    description: String,
    category: Category,
    priority: Priority,
    status: Status,
    created_at: DateTime<Utc>,
}

impl Default for TicketBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketBuilder {
    /// Create a builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: TicketId::new(),
            title: "Test ticket".to_string(),
            description: "Something needs attention".to_string(),
            category: Category::General,
            priority: Priority::Low,
            status: Status::Open,
            created_at: base_time(),
        }
    }

    /// Set title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set category
    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set priority
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set status
    #[must_use]
    pub const fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set creation time
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set creation time as whole days after 2025-01-01
    #[must_use]
    pub fn on_day(mut self, day: i64) -> Self {
        self.created_at = base_time() + Duration::days(day);
        self
    }

    /// Build the ticket
    #[must_use]
    pub fn build(self) -> Ticket {
        NewTicket::new(self.title, self.description)
            .with_category(self.category)
            .with_priority(self.priority)
            .with_status(self.status)
            .into_ticket(self.id, self.created_at)
    }
}

/// A small, varied ticket set spread over three days.
///
/// | day | category  | priority | status      |
/// |-----|-----------|----------|-------------|
/// | 0   | billing   | medium   | open        |
/// | 0   | technical | high     | open        |
/// | 1   | technical | critical | in_progress |
/// | 2   | account   | medium   | resolved    |
/// | 2   | general   | low      | closed      |
#[must_use]
pub fn sample_tickets() -> Vec<Ticket> {
    vec![
        TicketBuilder::new()
            .title("Double charge")
            .description("I was charged twice for my subscription")
            .category(Category::Billing)
            .priority(Priority::Medium)
            .on_day(0)
            .build(),
        TicketBuilder::new()
            .title("Export broken")
            .description("CSV export throws an error")
            .category(Category::Technical)
            .priority(Priority::High)
            .on_day(0)
            .build(),
        TicketBuilder::new()
            .title("Site down")
            .description("Dashboard returns 500 for everyone")
            .category(Category::Technical)
            .priority(Priority::Critical)
            .status(Status::InProgress)
            .on_day(1)
            .build(),
        TicketBuilder::new()
            .title("Locked out")
            .description("Cannot log in after password reset")
            .category(Category::Account)
            .priority(Priority::Medium)
            .status(Status::Resolved)
            .on_day(2)
            .build(),
        TicketBuilder::new()
            .title("Question")
            .description("Where can I find the changelog?")
            .status(Status::Closed)
            .on_day(2)
            .build(),
    ]
}

#[allow(clippy::unwrap_used)] // Fixed, valid timestamp
fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

/// Strategy over every category.
pub fn arb_category() -> impl Strategy<Value = Category> {
    proptest::sample::select(Category::ALL)
}

/// Strategy over every priority.
pub fn arb_priority() -> impl Strategy<Value = Priority> {
    proptest::sample::select(Priority::ALL)
}

/// Strategy over every status.
pub fn arb_status() -> impl Strategy<Value = Status> {
    proptest::sample::select(Status::ALL)
}

/// Strategy for tickets created within `days` days of 2025-01-01.
pub fn arb_ticket(days: u32) -> impl Strategy<Value = Ticket> {
    let days = i64::from(days.max(1));
    (
        arb_category(),
        arb_priority(),
        arb_status(),
        0..days,
        0..86_400i64,
    )
        .prop_map(|(category, priority, status, day, second)| {
            TicketBuilder::new()
                .category(category)
                .priority(priority)
                .status(status)
                .created_at(base_time() + Duration::days(day) + Duration::seconds(second))
                .build()
        })
}

/// Strategy for ticket collections of up to `max_len` tickets.
pub fn arb_tickets(max_len: usize, days: u32) -> impl Strategy<Value = Vec<Ticket>> {
    proptest::collection::vec(arb_ticket(days), 0..=max_len)
}
