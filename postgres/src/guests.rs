//! `PostgreSQL` guest repository.

use chrono::{DateTime, Utc};
use invitation_core::error::{InvitationError, Result};
use invitation_core::providers::GuestRepository;
use invitation_core::{Attendance, Guest, GuestId, GuestNumber, NewGuest, RsvpStatus};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const GUEST_COLUMNS: &str = "id, guest_number, name, phone, email, guest_group, status, attendance, created_at, updated_at";

/// `PostgreSQL` guest repository.
#[derive(Clone)]
pub struct PostgresGuestRepository {
    pool: PgPool,
}

impl PostgresGuestRepository {
    /// Create a new guest repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_guest(row: &PgRow) -> Result<Guest> {
        let decode = |e: sqlx::Error| InvitationError::storage(format!("Failed to decode guest row: {e}"));

        let id: Uuid = row.try_get("id").map_err(decode)?;
        let guest_number: String = row.try_get("guest_number").map_err(decode)?;
        let stored_status: String = row.try_get("status").map_err(decode)?;
        let attendance: Option<Json<Attendance>> = row.try_get("attendance").map_err(decode)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;

        let profile = NewGuest {
            name: row.try_get("name").map_err(decode)?,
            phone: row.try_get("phone").map_err(decode)?,
            email: row.try_get("email").map_err(decode)?,
            group: row.try_get("guest_group").map_err(decode)?,
        };

        let mut guest = Guest::new(GuestId(id), GuestNumber::parse(&guest_number)?, profile, created_at)
            .with_attendance(attendance.map(|json| json.0));
        guest.updated_at = row.try_get("updated_at").map_err(decode)?;

        // Status is always derived from attendance; the column only serves filters.
        if RsvpStatus::parse(&stored_status).ok() != Some(guest.status()) {
            tracing::warn!(
                guest_number = %guest.guest_number,
                stored = %stored_status,
                derived = %guest.status(),
                "Stored status disagrees with attendance, using derived status"
            );
        }

        Ok(guest)
    }
}

impl GuestRepository for PostgresGuestRepository {
    async fn max_guest_number(&self) -> Result<Option<u64>> {
        let max: Option<i64> = sqlx::query_scalar(
            r"
            SELECT MAX(guest_number::BIGINT)
            FROM guests
            WHERE guest_number ~ '^[0-9]{1,18}$'
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| InvitationError::storage(format!("Failed to read highest guest number: {e}")))?;

        Ok(max.and_then(|value| u64::try_from(value).ok()))
    }

    async fn insert_guest(&self, guest: &Guest) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO guests (
                id, guest_number, name, phone, email, guest_group,
                status, attendance, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(guest.id.0)
        .bind(guest.guest_number.as_str())
        .bind(&guest.name)
        .bind(guest.phone.as_deref())
        .bind(guest.email.as_deref())
        .bind(&guest.group)
        .bind(guest.status().as_str())
        .bind(guest.attendance().map(Json))
        .bind(guest.created_at)
        .bind(guest.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| InvitationError::storage(format!("Failed to insert guest: {e}")))?;

        Ok(())
    }

    async fn find_by_number(&self, guest_number: &GuestNumber) -> Result<Option<Guest>> {
        let row = sqlx::query(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE guest_number = $1 ORDER BY created_at ASC, id ASC LIMIT 1"
        ))
        .bind(guest_number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| InvitationError::storage(format!("Failed to find guest: {e}")))?;

        row.as_ref().map(Self::row_to_guest).transpose()
    }

    async fn list_guests(&self) -> Result<Vec<Guest>> {
        let rows = sqlx::query(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| InvitationError::storage(format!("Failed to list guests: {e}")))?;

        rows.iter().map(Self::row_to_guest).collect()
    }

    async fn save_rsvp(&self, guest: &Guest) -> Result<bool> {
        let result = sqlx::query(
            r"
            UPDATE guests
            SET status = $2, attendance = $3, updated_at = $4
            WHERE id = $1
            ",
        )
        .bind(guest.id.0)
        .bind(guest.status().as_str())
        .bind(guest.attendance().map(Json))
        .bind(guest.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| InvitationError::storage(format!("Failed to save RSVP: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_number(&self, guest_number: &GuestNumber) -> Result<Option<Guest>> {
        let row = sqlx::query(&format!(
            r"
            DELETE FROM guests
            WHERE id = (
                SELECT id FROM guests
                WHERE guest_number = $1
                ORDER BY created_at ASC, id ASC
                LIMIT 1
            )
            RETURNING {GUEST_COLUMNS}
            "
        ))
        .bind(guest_number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| InvitationError::storage(format!("Failed to delete guest: {e}")))?;

        row.as_ref().map(Self::row_to_guest).transpose()
    }
}
