//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by domain. Handlers
//! marked admin take an [`crate::admin::AdminAccess`] argument.

pub mod admin;
pub mod devices;
pub mod guests;
pub mod health;
pub mod rsvp;
pub mod settings;

// Re-export common handler utilities
pub use health::health_check;

/// Generic `{ "success": true }` acknowledgement.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct Ack {
    /// Always `true`; failures are reported as errors.
    pub success: bool,
}

impl Ack {
    /// Successful acknowledgement.
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }
}
