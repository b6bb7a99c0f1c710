//! # Helpdesk Testing
//!
//! Testing utilities and helpers for Helpdesk.
//!
//! This crate provides:
//! - Deterministic [`Clock`] implementations
//! - Scripted [`InferenceProvider`](helpdesk_core::InferenceProvider)s
//! - Ticket builders and proptest strategies
//! - A Given-When-Then harness for the classifier
//!
//! ## Example
//!
//! ```
//! use helpdesk_core::{Category, Priority};
//! use helpdesk_testing::{ClassifierTest, ScriptedProvider};
//!
//! # tokio_test::block_on(async {
//! ClassifierTest::new()
//!     .given_provider(ScriptedProvider::replying(r#"{"category":"account","priority":"high"}"#))
//!     .when_classifying("I cannot sign in")
//!     .then_labels(Category::Account, Priority::High)
//!     .then_no_warning()
//!     .run()
//!     .await;
//! # });
//! ```

use chrono::{DateTime, Utc};
use helpdesk_core::environment::Clock;

pub mod fixtures;
pub mod providers;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use helpdesk_testing::mocks::FixedClock;
    /// use helpdesk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to.
    ///
    /// Useful for spreading tickets across days.
    ///
    /// ```
    /// use helpdesk_testing::mocks::{ManualClock, test_clock};
    /// use helpdesk_core::environment::Clock;
    ///
    /// let clock = ManualClock::new(test_clock().now());
    /// let start = clock.now();
    /// clock.advance(chrono::Duration::days(1));
    /// assert_eq!(clock.now() - start, chrono::Duration::days(1));
    /// ```
    #[derive(Debug)]
    pub struct ManualClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Create a clock starting at the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }

        /// Jump to an absolute time
        pub fn set(&self, to: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = to;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Installs a test-friendly tracing subscriber.
///
/// Safe to call from every test; only the first call has an effect.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use classifier_test::ClassifierTest;
pub use fixtures::{TicketBuilder, sample_tickets};
pub use mocks::{FixedClock, ManualClock, test_clock};
pub use providers::{FailingProvider, ScriptedProvider, StalledProvider};
