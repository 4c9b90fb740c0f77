//! Prometheus metrics exporter.
//!
//! Installs the global `metrics` recorder and serves the rendered registry
//! at `GET /metrics` on its own listener.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start().await?;
//! tokio::spawn(server.serve(shutdown));
//! ```

use axum::{Router, routing::get};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::future::Future;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
    /// Failed to bind or run the HTTP listener
    #[error("Metrics server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Prometheus metrics server.
pub struct MetricsServer {
    addr: SocketAddr,
    listener: Option<TcpListener>,
    handle: Option<PrometheusHandle>,
}

impl MetricsServer {
    /// Create a new metrics server for `addr`. Nothing is bound until
    /// [`MetricsServer::start`].
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            listener: None,
            handle: None,
        }
    }

    /// Address the listener is bound to (the requested one before `start`).
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Bind the listener, then install the global recorder.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Io`] if the address cannot be bound and
    /// [`MetricsError::Install`] if the recorder cannot be installed.
    /// A recorder that is already installed is tolerated.
    pub async fn start(&mut self) -> Result<(), MetricsError> {
        let listener = TcpListener::bind(self.addr).await?;
        self.addr = listener.local_addr()?;
        self.listener = Some(listener);

        register_metrics();

        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Serve `/metrics` on the listener bound by `start` until `shutdown`
    /// resolves.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Io`] if serving fails.
    pub async fn serve(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<(), MetricsError> {
        let (Some(listener), Some(handle)) = (self.listener, self.handle) else {
            tracing::warn!("Metrics recorder not owned by this server, not serving /metrics");
            return Ok(());
        };

        let app = Router::new().route("/metrics", get(move || std::future::ready(handle.render())));
        tracing::info!(addr = %self.addr, "Metrics available at http://{}/metrics", self.addr);

        axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
        Ok(())
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!(
        "invitation_guests_created_total",
        "Total number of guests created"
    );
    describe_counter!(
        "invitation_guests_deleted_total",
        "Total number of guests deleted"
    );
    describe_counter!(
        "invitation_guest_number_fallback_total",
        "Guest numbers synthesised from the clock because the maximum lookup failed"
    );
    describe_counter!(
        "invitation_rsvp_submitted_total",
        "Total number of RSVP submissions, by resulting status"
    );
    describe_counter!(
        "invitation_device_admissions_total",
        "Total number of device access attempts, by outcome"
    );
}
