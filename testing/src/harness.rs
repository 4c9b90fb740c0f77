//! Service harness over shared in-memory storage.

use crate::mocks::{MockClock, test_epoch};
use crate::repositories::{InMemoryDeviceRepository, InMemoryGuestRepository, InMemorySettingsRepository};
use invitation_core::environment::Clock;
use invitation_core::{DeviceRegistry, GuestStore, SettingsStore};
use std::sync::Arc;

/// Guest store over in-memory repositories.
pub type TestGuestStore = GuestStore<InMemoryGuestRepository, InMemoryDeviceRepository>;
/// Device registry over an in-memory repository.
pub type TestDeviceRegistry = DeviceRegistry<InMemoryDeviceRepository>;
/// Settings store over an in-memory repository.
pub type TestSettingsStore = SettingsStore<InMemorySettingsRepository>;

/// All three services wired to the same storage and clock.
///
/// The repository handles stay available for assertions and failure
/// injection.
pub struct TestHarness {
    /// Guest store under test.
    pub guests: TestGuestStore,
    /// Device registry under test.
    pub devices: TestDeviceRegistry,
    /// Settings store under test.
    pub settings: TestSettingsStore,
    /// Guest storage shared with [`TestHarness::guests`].
    pub guest_repo: InMemoryGuestRepository,
    /// Device storage shared with the guest store and the registry.
    pub device_repo: InMemoryDeviceRepository,
    /// Settings storage.
    pub settings_repo: InMemorySettingsRepository,
    /// Clock shared by every service, starting at [`test_epoch`].
    pub clock: MockClock,
}

impl TestHarness {
    /// Fresh harness with empty storage.
    #[must_use]
    pub fn new() -> Self {
        crate::init_test_tracing();
        let clock = MockClock::new(test_epoch());
        let shared: Arc<dyn Clock> = Arc::new(clock.clone());

        let guest_repo = InMemoryGuestRepository::new();
        let device_repo = InMemoryDeviceRepository::new();
        let settings_repo = InMemorySettingsRepository::new();

        Self {
            guests: GuestStore::new(guest_repo.clone(), device_repo.clone(), Arc::clone(&shared)),
            devices: DeviceRegistry::new(device_repo.clone(), Arc::clone(&shared)),
            settings: SettingsStore::new(settings_repo.clone(), shared),
            guest_repo,
            device_repo,
            settings_repo,
            clock,
        }
    }

    /// Move the shared clock forward by whole seconds.
    pub fn tick(&self, seconds: i64) {
        self.clock.advance(chrono::Duration::seconds(seconds));
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
