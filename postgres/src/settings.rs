//! `PostgreSQL` settings repository.

use invitation_core::error::{InvitationError, Result};
use invitation_core::providers::SettingsRepository;
use invitation_core::Settings;
use sqlx::{PgPool, Row};

/// `PostgreSQL` settings repository (single row, `id = 1`).
#[derive(Clone)]
pub struct PostgresSettingsRepository {
    pool: PgPool,
}

impl PostgresSettingsRepository {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SettingsRepository for PostgresSettingsRepository {
    async fn load(&self) -> Result<Option<Settings>> {
        let row = sqlx::query(
            r"
            SELECT couple_names, wedding_date, venue, theme, rsvp_deadline, updated_at
            FROM settings
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| InvitationError::storage(format!("Failed to load settings: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let decode = |e: sqlx::Error| InvitationError::storage(format!("Failed to decode settings: {e}"));
        Ok(Some(Settings {
            couple_names: row.try_get("couple_names").map_err(decode)?,
            wedding_date: row.try_get("wedding_date").map_err(decode)?,
            venue: row.try_get("venue").map_err(decode)?,
            theme: row.try_get("theme").map_err(decode)?,
            rsvp_deadline: row.try_get("rsvp_deadline").map_err(decode)?,
            updated_at: row.try_get("updated_at").map_err(decode)?,
        }))
    }

    async fn store(&self, settings: &Settings) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO settings (id, couple_names, wedding_date, venue, theme, rsvp_deadline, updated_at)
            VALUES (1, $1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET couple_names = EXCLUDED.couple_names,
                wedding_date = EXCLUDED.wedding_date,
                venue = EXCLUDED.venue,
                theme = EXCLUDED.theme,
                rsvp_deadline = EXCLUDED.rsvp_deadline,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(&settings.couple_names)
        .bind(&settings.wedding_date)
        .bind(&settings.venue)
        .bind(&settings.theme)
        .bind(&settings.rsvp_deadline)
        .bind(settings.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| InvitationError::storage(format!("Failed to store settings: {e}")))?;

        Ok(())
    }
}
