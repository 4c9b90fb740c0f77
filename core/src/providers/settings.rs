//! Settings repository trait.

use crate::error::Result;
use crate::settings::Settings;

/// Storage for the settings singleton.
pub trait SettingsRepository: Send + Sync {
    /// The stored settings, `None` before the first write.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    fn load(&self) -> impl std::future::Future<Output = Result<Option<Settings>>> + Send;

    /// Create or replace the singleton.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    fn store(&self, settings: &Settings) -> impl std::future::Future<Output = Result<()>> + Send;
}
