//! # Invitation Testing
//!
//! Testing utilities for the invitation services.
//!
//! This crate provides:
//! - Deterministic clocks ([`FixedClock`], [`MockClock`])
//! - In-memory repositories with failure injection
//! - A [`TestHarness`] wiring all three services to shared in-memory storage
//! - Property-based testing strategies for domain inputs
//!
//! ## Example
//!
//! ```
//! use invitation_core::NewGuest;
//! use invitation_testing::TestHarness;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> invitation_core::Result<()> {
//! let harness = TestHarness::new();
//! let guest = harness.guests.create(NewGuest::named("Aisha")).await?;
//! assert_eq!(guest.guest_number.as_str(), "1001");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use invitation_core::environment::Clock;

pub mod harness;
pub mod repositories;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use invitation_testing::mocks::FixedClock;
    /// use invitation_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
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

    /// Clock moved forward by hand.
    ///
    /// Clones share the same time, so a test can keep one handle and give
    /// another to the services.
    #[derive(Debug, Clone)]
    pub struct MockClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl MockClock {
        /// Start at the given time
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward.
        pub fn advance(&self, by: chrono::Duration) {
            if let Ok(mut time) = self.time.lock() {
                *time += by;
            }
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
                .lock()
                .map_or_else(|poisoned| *poisoned.into_inner(), |time| *time)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_epoch())
    }

    /// 2025-01-01 00:00:00 UTC, the start time of every test clock.
    #[must_use]
    pub fn test_epoch() -> DateTime<Utc> {
        DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use invitation_core::{NewGuest, RsvpSubmission};
    use proptest::prelude::*;

    /// Guest profiles with a non-blank name.
    pub fn arb_new_guest() -> impl Strategy<Value = NewGuest> {
        (
            "[A-Za-z][A-Za-z ]{0,23}",
            proptest::option::of("[0-9]{7,12}"),
            proptest::option::of("[a-z]{1,8}@[a-z]{1,8}\\.com"),
            proptest::option::of(prop_oneof![
                Just("Family".to_string()),
                Just("Friends".to_string()),
                Just("Work".to_string()),
                Just(String::new()),
            ]),
        )
            .prop_map(|(name, phone, email, group)| NewGuest {
                name,
                phone,
                email,
                group,
            })
    }

    /// Any submission a caller could pass, including attending with zero
    /// guests and declining with a non-zero count.
    pub fn arb_submission() -> impl Strategy<Value = RsvpSubmission> {
        (any::<bool>(), 0u32..12, ".{0,40}").prop_map(|(attending, guests_count, message)| {
            RsvpSubmission {
                attending,
                guests_count,
                message,
            }
        })
    }

    /// A sequence of access attempts drawn from a small fingerprint pool so
    /// repeats are common.
    pub fn arb_fingerprints() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec((0u8..5).prop_map(|n| format!("device-{n}")), 1..16)
    }
}

/// Install a tracing subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs.
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
pub use harness::TestHarness;
pub use mocks::{FixedClock, MockClock, test_clock, test_epoch};
pub use repositories::{InMemoryDeviceRepository, InMemoryGuestRepository, InMemorySettingsRepository};
