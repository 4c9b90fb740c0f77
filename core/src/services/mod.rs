//! Services exposed to the presentation layer.
//!
//! Each service is generic over the repositories it needs and reads the
//! clock through [`crate::environment::Clock`]. None of them caches: every
//! operation is a fresh round-trip to storage.

pub mod devices;
pub mod guests;
pub mod settings;

pub use devices::DeviceRegistry;
pub use guests::GuestStore;
pub use settings::SettingsStore;
