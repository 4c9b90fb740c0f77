//! `PostgreSQL` device registration repository.

use invitation_core::error::{InvitationError, Result};
use invitation_core::providers::DeviceRepository;
use invitation_core::{DeviceRegistration, GuestNumber, RegisteredDevice};
use sqlx::types::Json;
use sqlx::{PgPool, Row};

/// `PostgreSQL` device registration repository.
///
/// Writes are plain upserts: there is no row lock between the read and the
/// write of an admission, so the last writer wins.
#[derive(Clone)]
pub struct PostgresDeviceRepository {
    pool: PgPool,
}

impl PostgresDeviceRepository {
    /// Create a new device registration repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for PostgresDeviceRepository {
    async fn get_registration(&self, guest_number: &GuestNumber) -> Result<Option<DeviceRegistration>> {
        let row = sqlx::query(
            r"
            SELECT devices, total_devices, created_at, updated_at
            FROM device_registrations
            WHERE guest_number = $1
            ",
        )
        .bind(guest_number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| InvitationError::storage(format!("Failed to get device registration: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let decode = |e: sqlx::Error| InvitationError::storage(format!("Failed to decode device registration: {e}"));
        let devices: Json<Vec<RegisteredDevice>> = row.try_get("devices").map_err(decode)?;
        let stored_total: i32 = row.try_get("total_devices").map_err(decode)?;

        let registration = DeviceRegistration::restore(
            guest_number.clone(),
            devices.0,
            row.try_get("created_at").map_err(decode)?,
            row.try_get("updated_at").map_err(decode)?,
        );

        if i64::from(stored_total) != i64::from(registration.total_devices()) {
            tracing::warn!(
                guest_number = %guest_number,
                stored_total,
                actual = registration.total_devices(),
                "Stored device count disagrees with device list"
            );
        }

        Ok(Some(registration))
    }

    async fn put_registration(&self, registration: &DeviceRegistration) -> Result<()> {
        let total_devices = i32::try_from(registration.total_devices()).unwrap_or(i32::MAX);

        sqlx::query(
            r"
            INSERT INTO device_registrations (guest_number, devices, total_devices, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (guest_number) DO UPDATE
            SET devices = EXCLUDED.devices,
                total_devices = EXCLUDED.total_devices,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(registration.guest_number.as_str())
        .bind(Json(registration.devices()))
        .bind(total_devices)
        .bind(registration.created_at)
        .bind(registration.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| InvitationError::storage(format!("Failed to save device registration: {e}")))?;

        Ok(())
    }

    async fn delete_registration(&self, guest_number: &GuestNumber) -> Result<bool> {
        let result = sqlx::query("DELETE FROM device_registrations WHERE guest_number = $1")
            .bind(guest_number.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| InvitationError::storage(format!("Failed to delete device registration: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
