//! # Invitation Core
//!
//! Guest identity, device access control and the RSVP lifecycle behind a
//! personalised invitation site.
//!
//! Every invitee gets a link keyed by a guest number. Opening the link goes
//! through the device registry (at most two devices per link), the invitee
//! reads their guest record, and submits or updates an attendance response.
//! The admin console aggregates responses and manages the guest list.
//!
//! ## Components
//!
//! - **Guest store** ([`GuestStore`]): guest records, numbering, RSVP writes
//! - **Device registry** ([`DeviceRegistry`]): per-link device cap
//! - **RSVP state machine** ([`rsvp`]): legal transitions and payload shape
//! - **Aggregation** ([`compute_stats`]): counts derived from the guest list
//! - **Settings** ([`SettingsStore`]): event-wide singleton configuration
//!
//! ## Architecture
//!
//! ```text
//! guest number (URL)
//!        │
//!        ▼
//! ┌──────────────────┐   denied   ┌──────────────┐
//! │ DeviceRegistry   │──────────▶ │ 403 / capped │
//! └────────┬─────────┘            └──────────────┘
//!          │ authorized
//!          ▼
//! ┌──────────────────┐   RSVP     ┌──────────────────┐
//! │ GuestStore       │──────────▶ │ rsvp state rules │
//! └────────┬─────────┘            └──────────────────┘
//!          │ find_all
//!          ▼
//! ┌──────────────────┐
//! │ compute_stats    │  (pure, no persisted state)
//! └──────────────────┘
//! ```
//!
//! Services hold no cross-request state: each call goes back to the
//! repositories in [`providers`]. Persistence backends live in other crates
//! (`invitation-postgres`, and in-memory mocks in `invitation-testing`).

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod constants;
pub mod device;
pub mod error;
pub mod guest;
pub mod numbering;
pub mod providers;
pub mod rsvp;
pub mod services;
pub mod settings;
pub mod stats;

pub use device::{AdmissionOutcome, DeviceAdmission, DeviceRegistration, RegisteredDevice};
pub use error::{InvitationError, Result};
pub use guest::{Guest, GuestId, GuestNumber, NewGuest};
pub use rsvp::{Attendance, RsvpStatus, RsvpSubmission};
pub use services::{DeviceRegistry, GuestStore, SettingsStore};
pub use settings::{Settings, SettingsPatch};
pub use stats::{GuestStats, compute_stats};

/// Environment module - Dependency injection traits
///
/// All time-dependent behaviour (timestamps, fallback guest numbers) reads the
/// clock through this trait so tests can pin it.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use invitation_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
