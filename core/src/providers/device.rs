//! Device registration repository trait.

use crate::device::DeviceRegistration;
use crate::error::Result;
use crate::guest::GuestNumber;

/// Device registration persistence, keyed by guest number.
///
/// # Implementation Notes
///
/// - At most one registration per guest number
/// - `put_registration` replaces the whole record (devices and count)
pub trait DeviceRepository: Send + Sync {
    /// Registration for a guest number, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    fn get_registration(
        &self,
        guest_number: &GuestNumber,
    ) -> impl std::future::Future<Output = Result<Option<DeviceRegistration>>> + Send;

    /// Create or replace a registration.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    fn put_registration(
        &self,
        registration: &DeviceRegistration,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Remove a registration. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    fn delete_registration(
        &self,
        guest_number: &GuestNumber,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}
