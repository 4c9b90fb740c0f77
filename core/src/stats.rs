//! Response aggregation for the admin console.
//!
//! Derived on demand from the guest list; nothing here is persisted.

use crate::guest::Guest;
use crate::rsvp::RsvpStatus;
use serde::{Deserialize, Serialize};

/// Summary of responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestStats {
    /// Number of guests.
    pub total: u64,
    /// Guests with status `confirmed`.
    pub confirmed: u64,
    /// Guests with status `declined`.
    pub declined: u64,
    /// Guests with status `pending`.
    pub pending: u64,
    /// Expected headcount: party sizes of confirmed guests.
    pub total_guests: u64,
}

/// Aggregate a guest collection.
///
/// `total_guests` sums `guestsCount` over confirmed guests only, counting a
/// guest whose count was never recorded as one person.
#[must_use]
pub fn compute_stats(guests: &[Guest]) -> GuestStats {
    guests.iter().fold(GuestStats::default(), |mut stats, guest| {
        stats.total += 1;
        match guest.status() {
            RsvpStatus::Confirmed => {
                stats.confirmed += 1;
                stats.total_guests += guest
                    .attendance()
                    .map_or(1, |attendance| u64::from(attendance.headcount()));
            }
            RsvpStatus::Declined => stats.declined += 1,
            RsvpStatus::Pending => stats.pending += 1,
        }
        stats
    })
}
