//! In-memory repositories.
//!
//! Each repository is cheap to clone; clones share storage, so a test can
//! keep a handle for assertions and failure injection while the services
//! own another.

use invitation_core::error::{InvitationError, Result};
use invitation_core::providers::{DeviceRepository, GuestRepository, SettingsRepository};
use invitation_core::{DeviceRegistration, Guest, GuestNumber, Settings};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

fn lock_failed() -> InvitationError {
    InvitationError::storage("Mutex lock failed")
}

fn check(flag: &AtomicBool, operation: &str) -> Result<()> {
    if flag.load(Ordering::SeqCst) {
        Err(InvitationError::storage(format!("injected failure: {operation}")))
    } else {
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Guests
// ═══════════════════════════════════════════════════════════════════════

/// In-memory guest storage.
///
/// Guests are kept in insertion order. Ties on `created_at` are broken by
/// insertion order, which keeps results deterministic under a fixed clock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGuestRepository {
    guests: Arc<Mutex<Vec<Guest>>>,
    fail_max_lookup: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryGuestRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `max_guest_number` fail (forces fallback numbering).
    pub fn fail_max_lookup(&self, fail: bool) {
        self.fail_max_lookup.store(fail, Ordering::SeqCst);
    }

    /// Make every read other than the max lookup fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail without touching storage.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Store a guest as-is, bypassing numbering. Used to seed duplicates or
    /// legacy records.
    pub fn seed(&self, guest: Guest) {
        if let Ok(mut guests) = self.guests.lock() {
            guests.push(guest);
        }
    }

    /// Number of stored guests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guests.lock().map_or(0, |guests| guests.len())
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored guest in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Guest> {
        self.guests.lock().map(|guests| guests.clone()).unwrap_or_default()
    }
}

/// Position of the earliest-created guest with this number.
fn first_match(guests: &[Guest], guest_number: &GuestNumber) -> Option<usize> {
    guests
        .iter()
        .enumerate()
        .filter(|(_, g)| &g.guest_number == guest_number)
        .min_by_key(|(index, g)| (g.created_at, *index))
        .map(|(index, _)| index)
}

impl GuestRepository for InMemoryGuestRepository {
    fn max_guest_number(&self) -> impl Future<Output = Result<Option<u64>>> + Send {
        let guests = Arc::clone(&self.guests);
        let fail = Arc::clone(&self.fail_max_lookup);

        async move {
            check(&fail, "max_guest_number")?;
            let guests = guests.lock().map_err(|_| lock_failed())?;
            Ok(invitation_core::numbering::max_sequence(
                guests.iter().map(|g| &g.guest_number),
            ))
        }
    }

    fn insert_guest(&self, guest: &Guest) -> impl Future<Output = Result<()>> + Send {
        let guests = Arc::clone(&self.guests);
        let fail = Arc::clone(&self.fail_writes);
        let guest = guest.clone();

        async move {
            check(&fail, "insert_guest")?;
            guests.lock().map_err(|_| lock_failed())?.push(guest);
            Ok(())
        }
    }

    fn find_by_number(&self, guest_number: &GuestNumber) -> impl Future<Output = Result<Option<Guest>>> + Send {
        let guests = Arc::clone(&self.guests);
        let fail = Arc::clone(&self.fail_reads);
        let guest_number = guest_number.clone();

        async move {
            check(&fail, "find_by_number")?;
            let guests = guests.lock().map_err(|_| lock_failed())?;
            Ok(first_match(&guests, &guest_number).map(|index| guests[index].clone()))
        }
    }

    fn list_guests(&self) -> impl Future<Output = Result<Vec<Guest>>> + Send {
        let guests = Arc::clone(&self.guests);
        let fail = Arc::clone(&self.fail_reads);

        async move {
            check(&fail, "list_guests")?;
            let guests = guests.lock().map_err(|_| lock_failed())?;
            let mut ordered: Vec<(usize, Guest)> = guests.iter().cloned().enumerate().collect();
            ordered.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
            Ok(ordered.into_iter().map(|(_, g)| g).collect())
        }
    }

    fn save_rsvp(&self, guest: &Guest) -> impl Future<Output = Result<bool>> + Send {
        let guests = Arc::clone(&self.guests);
        let fail = Arc::clone(&self.fail_writes);
        let guest = guest.clone();

        async move {
            check(&fail, "save_rsvp")?;
            let mut guests = guests.lock().map_err(|_| lock_failed())?;
            let Some(stored) = guests.iter_mut().find(|g| g.id == guest.id) else {
                return Ok(false);
            };

            let mut updated = stored.clone().with_attendance(guest.attendance().cloned());
            updated.updated_at = guest.updated_at;
            *stored = updated;
            Ok(true)
        }
    }

    fn delete_by_number(&self, guest_number: &GuestNumber) -> impl Future<Output = Result<Option<Guest>>> + Send {
        let guests = Arc::clone(&self.guests);
        let fail = Arc::clone(&self.fail_writes);
        let guest_number = guest_number.clone();

        async move {
            check(&fail, "delete_by_number")?;
            let mut guests = guests.lock().map_err(|_| lock_failed())?;
            Ok(first_match(&guests, &guest_number).map(|index| guests.remove(index)))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Device registrations
// ═══════════════════════════════════════════════════════════════════════

/// In-memory device registrations keyed by guest number.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeviceRepository {
    registrations: Arc<Mutex<HashMap<GuestNumber, DeviceRegistration>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
}

impl InMemoryDeviceRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `get_registration` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make `put_registration` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make `delete_registration` fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Stored registration for a guest number.
    #[must_use]
    pub fn get(&self, guest_number: &GuestNumber) -> Option<DeviceRegistration> {
        self.registrations
            .lock()
            .ok()
            .and_then(|registrations| registrations.get(guest_number).cloned())
    }

    /// Number of stored registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.lock().map_or(0, |registrations| registrations.len())
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DeviceRepository for InMemoryDeviceRepository {
    fn get_registration(
        &self,
        guest_number: &GuestNumber,
    ) -> impl Future<Output = Result<Option<DeviceRegistration>>> + Send {
        let registrations = Arc::clone(&self.registrations);
        let fail = Arc::clone(&self.fail_reads);
        let guest_number = guest_number.clone();

        async move {
            check(&fail, "get_registration")?;
            let registrations = registrations.lock().map_err(|_| lock_failed())?;
            Ok(registrations.get(&guest_number).cloned())
        }
    }

    fn put_registration(&self, registration: &DeviceRegistration) -> impl Future<Output = Result<()>> + Send {
        let registrations = Arc::clone(&self.registrations);
        let fail = Arc::clone(&self.fail_writes);
        let registration = registration.clone();

        async move {
            check(&fail, "put_registration")?;
            registrations
                .lock()
                .map_err(|_| lock_failed())?
                .insert(registration.guest_number.clone(), registration);
            Ok(())
        }
    }

    fn delete_registration(&self, guest_number: &GuestNumber) -> impl Future<Output = Result<bool>> + Send {
        let registrations = Arc::clone(&self.registrations);
        let fail = Arc::clone(&self.fail_deletes);
        let guest_number = guest_number.clone();

        async move {
            check(&fail, "delete_registration")?;
            let removed = registrations
                .lock()
                .map_err(|_| lock_failed())?
                .remove(&guest_number);
            Ok(removed.is_some())
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════════

/// In-memory settings singleton.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsRepository {
    settings: Arc<Mutex<Option<Settings>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemorySettingsRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `store` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Currently stored settings.
    #[must_use]
    pub fn stored(&self) -> Option<Settings> {
        self.settings.lock().ok().and_then(|settings| settings.clone())
    }
}

impl SettingsRepository for InMemorySettingsRepository {
    fn load(&self) -> impl Future<Output = Result<Option<Settings>>> + Send {
        let settings = Arc::clone(&self.settings);

        async move { Ok(settings.lock().map_err(|_| lock_failed())?.clone()) }
    }

    fn store(&self, settings: &Settings) -> impl Future<Output = Result<()>> + Send {
        let stored = Arc::clone(&self.settings);
        let fail = Arc::clone(&self.fail_writes);
        let settings = settings.clone();

        async move {
            check(&fail, "store_settings")?;
            *stored.lock().map_err(|_| lock_failed())? = Some(settings);
            Ok(())
        }
    }
}
