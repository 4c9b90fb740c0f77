//! HTTP surface for the invitation services.
//!
//! Thin Axum handlers over [`invitation_core`]: each handler parses the
//! request, calls one service operation and maps the result (or the
//! [`invitation_core::InvitationError`]) to a response.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, admin gate
//! │  - Request parsing, caller defaults     │  ← CORS, correlation ids
//! │  - Response serialization               │  ← Logging
//! ├─────────────────────────────────────────┤
//! │         invitation-core                 │
//! │  - GuestStore, DeviceRegistry           │  ← Repository traits
//! │  - SettingsStore, compute_stats         │  ← Pure state machines
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use invitation_web::{AdminGate, AppState, router};
//!
//! let state = AppState::new(guests, devices, settings, Arc::new(SystemClock), AdminGate::new("secret"));
//! let app = router(state);
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod admin;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use admin::{ADMIN_PASSPHRASE_HEADER, AdminAccess, AdminGate};
pub use error::AppError;
pub use extractors::{ClientIp, CorrelationId, JsonBody, UserAgent};
pub use middleware::{CORRELATION_ID_HEADER, cors_layer, request_context};
pub use router::router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
