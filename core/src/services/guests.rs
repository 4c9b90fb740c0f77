//! Guest store: creation, lookup, RSVP writes and deletion.

use crate::environment::Clock;
use crate::error::{InvitationError, Result};
use crate::guest::{Guest, GuestId, GuestNumber, NewGuest};
use crate::numbering::{fallback_guest_number, next_guest_number};
use crate::providers::{DeviceRepository, GuestRepository};
use crate::rsvp::RsvpSubmission;
use crate::stats::{GuestStats, compute_stats};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// CRUD over guest records.
///
/// Holds the device repository only to clean up registrations when a guest
/// is deleted.
pub struct GuestStore<G, D> {
    guests: G,
    devices: D,
    clock: Arc<dyn Clock>,
}

impl<G, D> GuestStore<G, D>
where
    G: GuestRepository,
    D: DeviceRepository,
{
    /// Create a guest store.
    #[must_use]
    pub fn new(guests: G, devices: D, clock: Arc<dyn Clock>) -> Self {
        Self {
            guests,
            devices,
            clock,
        }
    }

    /// Add a guest with the next guest number.
    ///
    /// The number is the current maximum plus one (`1001` for the first
    /// guest). If the maximum cannot be read, a clock-derived number is used
    /// instead and a warning is logged.
    ///
    /// # Errors
    ///
    /// - [`InvitationError::Validation`] if the name is blank
    /// - [`InvitationError::Storage`] if the guest cannot be written
    #[tracing::instrument(skip(self, profile), name = "guest_create")]
    pub async fn create(&self, profile: NewGuest) -> Result<Guest> {
        profile.validate()?;

        let now = self.clock.now();
        let guest_number = self.allocate_number(now).await;
        let guest = Guest::new(GuestId::new(), guest_number, profile, now);

        self.guests.insert_guest(&guest).await?;

        metrics::counter!("invitation_guests_created_total").increment(1);
        tracing::info!(
            guest_number = %guest.guest_number,
            group = %guest.group,
            "Guest created"
        );

        Ok(guest)
    }

    /// Add several guests.
    ///
    /// Every profile is validated before anything is written. Guests are then
    /// created one after another, so on the happy path they receive
    /// consecutive numbers in input order.
    ///
    /// # Errors
    ///
    /// - [`InvitationError::Validation`] if the list is empty or any entry
    ///   has a blank name (the message names the first offending index)
    /// - [`InvitationError::Storage`] if a write fails; guests created before
    ///   the failure are kept
    #[tracing::instrument(skip(self, profiles), fields(count = profiles.len()), name = "guest_create_many")]
    pub async fn create_many(&self, profiles: Vec<NewGuest>) -> Result<Vec<Guest>> {
        if profiles.is_empty() {
            return Err(InvitationError::validation("at least one guest is required"));
        }

        for (index, profile) in profiles.iter().enumerate() {
            profile
                .validate()
                .map_err(|e| InvitationError::validation(format!("guests[{index}]: {}", validation_message(&e))))?;
        }

        let mut created = Vec::with_capacity(profiles.len());
        for profile in profiles {
            created.push(self.create(profile).await?);
        }

        tracing::info!(count = created.len(), "Bulk guest creation completed");
        Ok(created)
    }

    /// Guest with the given number, `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationError::Storage`] if the store cannot be read.
    pub async fn find_by_number(&self, guest_number: &GuestNumber) -> Result<Option<Guest>> {
        self.guests.find_by_number(guest_number).await
    }

    /// All guests, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationError::Storage`] if the store cannot be read.
    pub async fn find_all(&self) -> Result<Vec<Guest>> {
        self.guests.list_guests().await
    }

    /// Record or replace a guest's RSVP.
    ///
    /// The previous attendance is overwritten wholesale and the status is
    /// recomputed from the new one. Concurrent submissions for the same guest
    /// are not ordered: the last write wins.
    ///
    /// # Errors
    ///
    /// - [`InvitationError::NotFound`] if no guest has this number
    /// - [`InvitationError::Storage`] if the write fails (the stored record is
    ///   left unchanged)
    #[tracing::instrument(skip(self, submission), fields(guest_number = %guest_number), name = "guest_update_rsvp")]
    pub async fn update_rsvp(&self, guest_number: &GuestNumber, submission: RsvpSubmission) -> Result<Guest> {
        let mut guest = self
            .guests
            .find_by_number(guest_number)
            .await?
            .ok_or_else(|| InvitationError::not_found(guest_number.as_str()))?;

        guest.record_rsvp(&submission, self.clock.now());

        if !self.guests.save_rsvp(&guest).await? {
            return Err(InvitationError::not_found(guest_number.as_str()));
        }

        metrics::counter!("invitation_rsvp_submitted_total", "status" => guest.status().as_str())
            .increment(1);
        tracing::info!(
            status = %guest.status(),
            guests_count = guest.attendance().and_then(|a| a.guests_count),
            "RSVP recorded"
        );

        Ok(guest)
    }

    /// Delete a guest and, best-effort, its device registration.
    ///
    /// Returns the deleted guest, or `None` if no guest has this number. A
    /// failure to remove the device registration is logged and does not
    /// undo the guest deletion.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationError::Storage`] if the guest cannot be deleted.
    #[tracing::instrument(skip(self), fields(guest_number = %guest_number), name = "guest_delete")]
    pub async fn delete_by_number(&self, guest_number: &GuestNumber) -> Result<Option<Guest>> {
        let Some(deleted) = self.guests.delete_by_number(guest_number).await? else {
            tracing::debug!("No guest to delete");
            return Ok(None);
        };

        match self.devices.delete_registration(guest_number).await {
            Ok(removed) => tracing::debug!(removed, "Device registration cleanup"),
            Err(error) => tracing::warn!(
                error = %error,
                "Failed to remove device registration for deleted guest"
            ),
        }

        metrics::counter!("invitation_guests_deleted_total").increment(1);
        tracing::info!("Guest deleted");

        Ok(Some(deleted))
    }

    /// Response summary over the current guest list.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationError::Storage`] if the store cannot be read.
    pub async fn stats(&self) -> Result<GuestStats> {
        let guests = self.find_all().await?;
        Ok(compute_stats(&guests))
    }

    async fn allocate_number(&self, now: DateTime<Utc>) -> GuestNumber {
        match self.guests.max_guest_number().await {
            Ok(current_max) => next_guest_number(current_max),
            Err(error) => {
                let fallback = fallback_guest_number(now);
                metrics::counter!("invitation_guest_number_fallback_total").increment(1);
                tracing::warn!(
                    error = %error,
                    guest_number = %fallback,
                    "Could not read highest guest number, using clock-derived number"
                );
                fallback
            }
        }
    }
}

fn validation_message(error: &InvitationError) -> String {
    match error {
        InvitationError::Validation(message) => message.clone(),
        other => other.to_string(),
    }
}
