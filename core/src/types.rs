//! Domain types for support tickets.
//!
//! A ticket carries two classification labels (`Category`, `Priority`) and a
//! workflow `Status`. All three are closed enums, so a ticket can never hold a
//! free-text or missing label no matter how it was created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Maximum title length, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a ticket, assigned by the store on creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Creates a new random `TicketId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `TicketId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Labels
// ============================================================================

/// Error returned when a string is not a valid label value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} value: {value:?}")]
pub struct ParseLabelError {
    /// Which field was being parsed (`category`, `priority`, `status`)
    pub field: &'static str,
    /// The rejected input
    pub value: String,
}

/// Generates `as_str`, `ALL`, `Display` and a case-insensitive `FromStr` for a
/// unit-only label enum.
macro_rules! label_enum {
    ($ty:ident, $field:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            /// Every value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire representation of this value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseLabelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim();
                $(
                    if normalized.eq_ignore_ascii_case($text) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(ParseLabelError {
                    field: $field,
                    value: s.to_string(),
                })
            }
        }
    };
}

/// Ticket category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Payments, invoices, refunds
    Billing,
    /// Bugs, errors, outages
    Technical,
    /// Login, profile, access
    Account,
    /// Everything else
    #[default]
    General,
}

label_enum!(Category, "category", {
    Billing => "billing",
    Technical => "technical",
    Account => "account",
    General => "general",
});

/// Ticket priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can wait
    #[default]
    Low,
    /// Normal handling
    Medium,
    /// Needs attention soon
    High,
    /// Drop everything
    Critical,
}

label_enum!(Priority, "priority", {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

/// Ticket workflow status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Newly created, not yet picked up
    #[default]
    Open,
    /// Someone is working on it
    InProgress,
    /// Fix delivered
    Resolved,
    /// No further action
    Closed,
}

label_enum!(Status, "status", {
    Open => "open",
    InProgress => "in_progress",
    Resolved => "resolved",
    Closed => "closed",
});

// ============================================================================
// Ticket
// ============================================================================

/// A support ticket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier
    pub id: TicketId,
    /// Short summary
    pub title: String,
    /// Free-text description of the problem
    pub description: String,
    /// Category label
    pub category: Category,
    /// Priority label
    pub priority: Priority,
    /// Workflow status
    pub status: Status,
    /// When the ticket was created (immutable)
    pub created_at: DateTime<Utc>,
}

/// Validation failures for ticket text fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketValidationError {
    /// Title is empty or whitespace
    #[error("title cannot be empty")]
    EmptyTitle,

    /// Title exceeds [`MAX_TITLE_LENGTH`]
    #[error("title too long ({actual} characters, max {max})")]
    TitleTooLong {
        /// Allowed maximum
        max: usize,
        /// Submitted length
        actual: usize,
    },

    /// Description is empty or whitespace
    #[error("description cannot be empty")]
    EmptyDescription,
}

fn validate_title(title: &str) -> Result<(), TicketValidationError> {
    if title.trim().is_empty() {
        return Err(TicketValidationError::EmptyTitle);
    }

    let actual = title.chars().count();
    if actual > MAX_TITLE_LENGTH {
        return Err(TicketValidationError::TitleTooLong {
            max: MAX_TITLE_LENGTH,
            actual,
        });
    }

    Ok(())
}

fn validate_description(description: &str) -> Result<(), TicketValidationError> {
    if description.trim().is_empty() {
        return Err(TicketValidationError::EmptyDescription);
    }
    Ok(())
}

/// Fields supplied when creating a ticket.
///
/// `id` and `created_at` are assigned by the store. Omitted labels fall back to
/// `general` / `low` / `open`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    /// Short summary
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Category label (defaults to `general`)
    #[serde(default)]
    pub category: Option<Category>,
    /// Priority label (defaults to `low`)
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Initial status (defaults to `open`)
    #[serde(default)]
    pub status: Option<Status>,
}

impl NewTicket {
    /// Creates a new ticket request with default labels
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Builder: Set category
    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Builder: Set priority
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Builder: Set status
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Checks title and description.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), TicketValidationError> {
        validate_title(&self.title)?;
        validate_description(&self.description)
    }

    /// Materializes the ticket with a store-assigned id and timestamp.
    #[must_use]
    pub fn into_ticket(self, id: TicketId, created_at: DateTime<Utc>) -> Ticket {
        Ticket {
            id,
            title: self.title,
            description: self.description,
            category: self.category.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            created_at,
        }
    }
}

/// Partial update of a ticket. `None` fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New category
    pub category: Option<Category>,
    /// New priority
    pub priority: Option<Priority>,
    /// New status
    pub status: Option<Status>,
}

impl TicketPatch {
    /// Patch that only changes the status
    #[must_use]
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns `true` if the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }

    /// Checks the text fields that are present.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), TicketValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }

    /// Applies the patch in place. `id` and `created_at` are never touched.
    pub fn apply(&self, ticket: &mut Ticket) {
        if let Some(title) = &self.title {
            ticket.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            ticket.description.clone_from(description);
        }
        if let Some(category) = self.category {
            ticket.category = category;
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn test_label_parsing_is_case_insensitive() {
        assert_eq!("Billing".parse::<Category>().unwrap(), Category::Billing);
        assert_eq!(" CRITICAL ".parse::<Priority>().unwrap(), Priority::Critical);
        assert_eq!("in_progress".parse::<Status>().unwrap(), Status::InProgress);
    }

    #[test]
    fn test_label_parsing_rejects_unknown_values() {
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err.field, "priority");
        assert_eq!(err.value, "urgent");
    }

    #[test]
    fn test_label_serialization() {
        assert_eq!(serde_json::to_string(&Category::Technical).unwrap(), r#""technical""#);
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), r#""in_progress""#);
        for status in Status::ALL {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_new_ticket_defaults() {
        let ticket = NewTicket::new("Printer", "It is on fire")
            .into_ticket(TicketId::new(), Utc::now());

        assert_eq!(ticket.category, Category::General);
        assert_eq!(ticket.priority, Priority::Low);
        assert_eq!(ticket.status, Status::Open);
    }

    #[test]
    fn test_new_ticket_deserializes_without_labels() {
        let new: NewTicket =
            serde_json::from_str(r#"{"title":"Hi","description":"There"}"#).unwrap();
        assert_eq!(new.category, None);
        assert!(new.validate().is_ok());
    }

    #[test]
    fn test_new_ticket_validation() {
        assert_eq!(
            NewTicket::new("   ", "desc").validate(),
            Err(TicketValidationError::EmptyTitle)
        );
        assert_eq!(
            NewTicket::new("title", "").validate(),
            Err(TicketValidationError::EmptyDescription)
        );

        let long = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert_eq!(
            NewTicket::new(long, "desc").validate(),
            Err(TicketValidationError::TitleTooLong {
                max: MAX_TITLE_LENGTH,
                actual: MAX_TITLE_LENGTH + 1,
            })
        );

        let exact = "é".repeat(MAX_TITLE_LENGTH);
        assert!(NewTicket::new(exact, "desc").validate().is_ok());
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let created_at = Utc::now();
        let id = TicketId::new();
        let mut ticket = NewTicket::new("Old", "Body").into_ticket(id, created_at);

        let patch = TicketPatch {
            title: Some("New".to_string()),
            priority: Some(Priority::High),
            ..TicketPatch::default()
        };
        patch.apply(&mut ticket);

        assert_eq!(ticket.title, "New");
        assert_eq!(ticket.description, "Body");
        assert_eq!(ticket.priority, Priority::High);
        assert_eq!(ticket.category, Category::General);
        assert_eq!(ticket.id, id);
        assert_eq!(ticket.created_at, created_at);
    }

    #[test]
    fn test_patch_ignores_unknown_fields() {
        let patch: TicketPatch =
            serde_json::from_str(r#"{"status":"closed","created_at":"2020-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(patch, TicketPatch::status(Status::Closed));
        assert!(!patch.is_empty());
        assert!(TicketPatch::default().is_empty());
    }
}
