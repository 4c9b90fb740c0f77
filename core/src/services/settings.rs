//! Settings store.

use crate::environment::Clock;
use crate::error::Result;
use crate::providers::SettingsRepository;
use crate::settings::{Settings, SettingsPatch};
use std::sync::Arc;

/// Access to the event settings singleton.
pub struct SettingsStore<S> {
    settings: S,
    clock: Arc<dyn Clock>,
}

impl<S: SettingsRepository> SettingsStore<S> {
    /// Create a settings store.
    #[must_use]
    pub fn new(settings: S, clock: Arc<dyn Clock>) -> Self {
        Self { settings, clock }
    }

    /// Current settings, writing the defaults on first read.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InvitationError::Storage`] if the settings cannot be
    /// read or the defaults cannot be written.
    pub async fn get(&self) -> Result<Settings> {
        if let Some(settings) = self.settings.load().await? {
            return Ok(settings);
        }

        let defaults = Settings::defaults(self.clock.now());
        self.settings.store(&defaults).await?;
        tracing::info!("Settings initialised with defaults");
        Ok(defaults)
    }

    /// Merge a patch into the settings and bump `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InvitationError::Storage`] if the settings cannot be
    /// read or written.
    pub async fn update(&self, patch: SettingsPatch) -> Result<Settings> {
        let mut settings = self.get().await?;
        settings.apply(patch, self.clock.now());
        self.settings.store(&settings).await?;
        tracing::info!("Settings updated");
        Ok(settings)
    }
}
