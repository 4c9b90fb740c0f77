//! Invitation constants.
//!
//! Design constants shared by the guest store, the device registry and the
//! persistence backends.

/// Maximum number of distinct devices that may open one invitation link.
///
/// Not configurable per guest.
pub const MAX_DEVICES_PER_GUEST: usize = 2;

/// Guest number assigned to the first guest of an empty store.
pub const FIRST_GUEST_NUMBER: u64 = 1001;

/// Number of low-order timestamp digits kept by the fallback numbering path.
pub const FALLBACK_NUMBER_DIGITS: u32 = 6;

/// Group assigned to guests created without one.
pub const DEFAULT_GROUP: &str = "General";

/// Guest count recorded when an attending guest omits it.
///
/// Applied by callers before they reach the RSVP state machine.
pub const DEFAULT_ATTENDING_GUESTS: u32 = 1;
