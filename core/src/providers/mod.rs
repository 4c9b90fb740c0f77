//! Storage providers.
//!
//! Traits for the persistence the services depend on. The services hold no
//! state of their own: every call goes back to a repository.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌─────────────────────┐
//! │ GuestStore   │───▶│ GuestRepository  │───▶│ PostgreSQL / mocks  │
//! │ DeviceReg.   │───▶│ DeviceRepository │───▶│                     │
//! │ SettingsSt.  │───▶│ SettingsRepo.    │───▶│                     │
//! └──────────────┘    └──────────────────┘    └─────────────────────┘
//! ```
//!
//! This enables:
//! - **Testing**: in-memory mocks with failure injection
//! - **Production**: `PostgreSQL` via `invitation-postgres`

pub mod device;
pub mod guest;
pub mod settings;

pub use device::DeviceRepository;
pub use guest::GuestRepository;
pub use settings::SettingsRepository;
