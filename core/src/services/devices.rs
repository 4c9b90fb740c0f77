//! Device registry: per-link device cap.

use crate::device::{self, DeviceAdmission};
use crate::environment::Clock;
use crate::error::{InvitationError, Result};
use crate::guest::GuestNumber;
use crate::providers::DeviceRepository;
use std::sync::Arc;

/// Bounds how many devices may open one invitation link.
///
/// Read-modify-write without a lock: two first-time registrations racing on
/// the same guest number can both see "no registration" and the later write
/// wins.
pub struct DeviceRegistry<D> {
    devices: D,
    clock: Arc<dyn Clock>,
}

impl<D: DeviceRepository> DeviceRegistry<D> {
    /// Create a device registry.
    #[must_use]
    pub fn new(devices: D, clock: Arc<dyn Clock>) -> Self {
        Self { devices, clock }
    }

    /// Register an access attempt from a device.
    ///
    /// A denial is reported through [`DeviceAdmission::authorized`], not as
    /// an error; use [`DeviceAdmission::ensure_authorized`] to turn it into
    /// [`InvitationError::CapacityExceeded`].
    ///
    /// # Errors
    ///
    /// - [`InvitationError::Validation`] if the fingerprint is blank
    /// - [`InvitationError::Storage`] if the registration cannot be read or
    ///   written
    #[tracing::instrument(skip(self, fingerprint, user_agent), fields(guest_number = %guest_number), name = "device_register")]
    pub async fn register(
        &self,
        guest_number: &GuestNumber,
        fingerprint: &str,
        user_agent: &str,
    ) -> Result<DeviceAdmission> {
        let fingerprint = fingerprint.trim();
        if fingerprint.is_empty() {
            return Err(InvitationError::validation("fingerprint is required"));
        }

        let existing = self.devices.get_registration(guest_number).await?;
        let (changed, admission) =
            device::admit(existing, guest_number, fingerprint, user_agent, self.clock.now());

        if let Some(registration) = changed {
            self.devices.put_registration(&registration).await?;
        }

        metrics::counter!(
            "invitation_device_admissions_total",
            "outcome" => admission.outcome.as_str()
        )
        .increment(1);

        if admission.authorized() {
            tracing::debug!(
                outcome = admission.outcome.as_str(),
                device_count = admission.device_count,
                "Device authorized"
            );
        } else {
            tracing::warn!(device_count = admission.device_count, "Device limit reached, access denied");
        }

        Ok(admission)
    }

    /// Number of devices registered for a guest number (0 if none).
    ///
    /// # Errors
    ///
    /// Returns [`InvitationError::Storage`] if the registration cannot be read.
    pub async fn count(&self, guest_number: &GuestNumber) -> Result<u32> {
        let registration = self.devices.get_registration(guest_number).await?;
        Ok(registration.map_or(0, |r| r.total_devices()))
    }
}
