//! Application state for Axum handlers.

use crate::admin::AdminGate;
use axum::extract::FromRef;
use invitation_core::environment::Clock;
use invitation_core::providers::{DeviceRepository, GuestRepository, SettingsRepository};
use invitation_core::{DeviceRegistry, GuestStore, SettingsStore};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Generic over the repositories so the same router runs against
/// `PostgreSQL` in production and in-memory storage in tests.
pub struct AppState<G, D, S> {
    /// Guest records and RSVPs.
    pub guests: Arc<GuestStore<G, D>>,
    /// Per-link device cap.
    pub devices: Arc<DeviceRegistry<D>>,
    /// Event settings.
    pub settings: Arc<SettingsStore<S>>,
    /// Admin passphrase check.
    pub admin: AdminGate,
}

impl<G, D, S> AppState<G, D, S>
where
    G: GuestRepository,
    D: DeviceRepository + Clone,
    S: SettingsRepository,
{
    /// Wire the services over the given repositories.
    ///
    /// The device repository is shared by the registry and the guest store
    /// (for cleanup on deletion).
    #[must_use]
    pub fn new(guests: G, devices: D, settings: S, clock: Arc<dyn Clock>, admin: AdminGate) -> Self {
        Self {
            guests: Arc::new(GuestStore::new(guests, devices.clone(), Arc::clone(&clock))),
            devices: Arc::new(DeviceRegistry::new(devices, Arc::clone(&clock))),
            settings: Arc::new(SettingsStore::new(settings, clock)),
            admin,
        }
    }
}

impl<G, D, S> Clone for AppState<G, D, S> {
    fn clone(&self) -> Self {
        Self {
            guests: Arc::clone(&self.guests),
            devices: Arc::clone(&self.devices),
            settings: Arc::clone(&self.settings),
            admin: self.admin.clone(),
        }
    }
}

impl<G, D, S> FromRef<AppState<G, D, S>> for AdminGate {
    fn from_ref(state: &AppState<G, D, S>) -> Self {
        state.admin.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invitation_testing::{
        InMemoryDeviceRepository, InMemoryGuestRepository, InMemorySettingsRepository, test_clock,
    };

    #[test]
    fn test_state_is_clone_without_clone_repositories() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState<InMemoryGuestRepository, InMemoryDeviceRepository, InMemorySettingsRepository>>();
    }

    #[test]
    fn test_admin_gate_from_state() {
        let state = AppState::new(
            InMemoryGuestRepository::new(),
            InMemoryDeviceRepository::new(),
            InMemorySettingsRepository::new(),
            Arc::new(test_clock()),
            AdminGate::new("pass"),
        );
        assert!(AdminGate::from_ref(&state).verify("pass"));
    }
}
