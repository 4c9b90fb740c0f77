//! Guest repository trait.

use crate::error::Result;
use crate::guest::{Guest, GuestNumber};

/// Guest persistence.
///
/// # Implementation Notes
///
/// - Guest numbers are not unique at the storage level. Lookups by number
///   return the earliest-created match.
/// - `save_rsvp` must write status and attendance in one atomic operation.
pub trait GuestRepository: Send + Sync {
    /// Highest numeric guest number, compared as integers.
    ///
    /// Non-numeric numbers are ignored. `None` when no numeric number exists.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    fn max_guest_number(&self) -> impl std::future::Future<Output = Result<Option<u64>>> + Send;

    /// Insert a new guest.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    fn insert_guest(&self, guest: &Guest) -> impl std::future::Future<Output = Result<()>> + Send;

    /// First guest (by creation time) with the given number.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    fn find_by_number(
        &self,
        guest_number: &GuestNumber,
    ) -> impl std::future::Future<Output = Result<Option<Guest>>> + Send;

    /// Every guest, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    fn list_guests(&self) -> impl std::future::Future<Output = Result<Vec<Guest>>> + Send;

    /// Persist the RSVP fields of a guest: `status`, `attendance` and
    /// `updated_at`, written together in one operation.
    ///
    /// Matches on the guest's storage id. Returns `false` when the row no
    /// longer exists.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails. On error nothing is written.
    fn save_rsvp(&self, guest: &Guest) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Delete the first guest with the given number.
    ///
    /// Returns the deleted guest, or `None` when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    fn delete_by_number(
        &self,
        guest_number: &GuestNumber,
    ) -> impl std::future::Future<Output = Result<Option<Guest>>> + Send;
}
