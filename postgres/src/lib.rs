//! `PostgreSQL` repositories for the invitation services.
//!
//! This crate implements the repository traits from `invitation-core` over a
//! shared `sqlx` connection pool:
//!
//! - [`PostgresGuestRepository`]: `guests` table
//! - [`PostgresDeviceRepository`]: `device_registrations` table
//! - [`PostgresSettingsRepository`]: `settings` singleton row
//!
//! All queries are runtime-checked (`sqlx::query` + `bind`), so building the
//! crate does not need a live database.
//!
//! # Example
//!
//! ```no_run
//! use invitation_postgres::{PostgresGuestRepository, migrate};
//! use sqlx::PgPool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgres://localhost/invitation").await?;
//! migrate(&pool).await?;
//! let guests = PostgresGuestRepository::new(pool);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use invitation_core::error::{InvitationError, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

mod devices;
mod guests;
mod settings;

pub use devices::PostgresDeviceRepository;
pub use guests::PostgresGuestRepository;
pub use settings::PostgresSettingsRepository;

/// Connection pool sizing.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Maximum open connections.
    pub max_connections: u32,
    /// Connections kept open when idle.
    pub min_connections: u32,
    /// How long to wait for a connection.
    pub connect_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// Open a connection pool.
///
/// # Errors
///
/// Returns [`InvitationError::Storage`] if the database is unreachable.
pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.connect_timeout)
        .connect(database_url)
        .await
        .map_err(|e| InvitationError::storage(format!("Failed to connect to database: {e}")))
}

/// Run the embedded migrations.
///
/// # Errors
///
/// Returns [`InvitationError::Storage`] if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| InvitationError::storage(format!("Migration failed: {e}")))?;
    tracing::info!("Database migrations applied");
    Ok(())
}
