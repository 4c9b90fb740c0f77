//! Invitation RSVP HTTP server.
//!
//! Wires the Postgres repositories into the invitation services, serves the
//! HTTP API and a Prometheus endpoint, and shuts down cleanly on Ctrl+C or
//! SIGTERM.

mod config;
mod telemetry;

use config::Config;
use invitation_core::environment::SystemClock;
use invitation_postgres::{PostgresDeviceRepository, PostgresGuestRepository, PostgresSettingsRepository};
use invitation_web::{AdminGate, AppState, cors_layer, router};
use telemetry::MetricsServer;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,invitation=debug,sqlx=warn,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting invitation server");

    // Load configuration
    let config = Config::from_env();
    if config.uses_default_passphrase() {
        warn!("ADMIN_PASSPHRASE is not set, using the default; set it before exposing the admin console");
    }
    info!(
        bind = %config.bind_address(),
        metrics = %config.metrics_address(),
        cors_origin = config.server.cors_allowed_origin.as_deref().unwrap_or("*"),
        "Configuration loaded"
    );

    // Database
    info!("Connecting to database...");
    let pool = invitation_postgres::connect(&config.postgres.url, &config.pool_settings()).await?;
    invitation_postgres::migrate(&pool).await?;
    info!("Database ready");

    // Services
    let state = AppState::new(
        PostgresGuestRepository::new(pool.clone()),
        PostgresDeviceRepository::new(pool.clone()),
        PostgresSettingsRepository::new(pool),
        Arc::new(SystemClock),
        AdminGate::new(config.admin.passphrase.as_str()),
    );
    let app = router(state).layer(cors_layer(config.server.cors_allowed_origin.as_deref()));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Metrics
    let mut metrics_server = MetricsServer::new(config.metrics_address().parse()?);
    metrics_server.start().await?;
    let metrics_task = tokio::spawn(metrics_server.serve(wait_for(shutdown_rx)));

    // HTTP
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await?;

    match metrics_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "Metrics server failed"),
        Err(e) => error!(error = %e, "Metrics task panicked"),
    }

    info!("Shutdown complete");
    Ok(())
}

/// Resolve once the shutdown flag flips (or the sender is dropped).
async fn wait_for(mut shutdown: watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
