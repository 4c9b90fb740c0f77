//! Error types for guest, device and settings operations.

use thiserror::Error;

/// Result type alias for invitation operations.
pub type Result<T> = std::result::Result<T, InvitationError>;

/// Error taxonomy for the invitation core.
///
/// Every failure reaches the caller as one of these variants with a
/// human-readable message. Nothing is retried inside the core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvitationError {
    // ═══════════════════════════════════════════════════════════
    // Lookup Errors
    // ═══════════════════════════════════════════════════════════

    /// No guest carries this guest number.
    #[error("Guest {guest_number} not found")]
    NotFound {
        /// Guest number that was looked up
        guest_number: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Input Errors
    // ═══════════════════════════════════════════════════════════

    /// Required input missing or malformed.
    #[error("Validation failed: {0}")]
    Validation(String),

    // ═══════════════════════════════════════════════════════════
    // Access Control
    // ═══════════════════════════════════════════════════════════

    /// The invitation link already has the maximum number of devices.
    #[error("Device limit reached for guest {guest_number} ({device_count} devices registered)")]
    CapacityExceeded {
        /// Guest number whose link is capped
        guest_number: String,
        /// Devices currently registered
        device_count: u32,
    },

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// The persistence layer is unreachable or rejected a write.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl InvitationError {
    /// Shorthand for [`InvitationError::NotFound`].
    pub fn not_found(guest_number: impl Into<String>) -> Self {
        Self::NotFound {
            guest_number: guest_number.into(),
        }
    }

    /// Shorthand for [`InvitationError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for [`InvitationError::Storage`].
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Returns `true` if this error is caused by the caller's input or the
    /// state of the invitation rather than by the backend.
    ///
    /// # Examples
    ///
    /// ```
    /// # use invitation_core::InvitationError;
    /// assert!(InvitationError::validation("name is required").is_user_error());
    /// assert!(!InvitationError::storage("connection refused").is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Validation(_) | Self::CapacityExceeded { .. }
        )
    }

    /// Returns `true` for [`InvitationError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            InvitationError::not_found("9999").to_string(),
            "Guest 9999 not found"
        );
        assert_eq!(
            InvitationError::CapacityExceeded {
                guest_number: "1001".to_string(),
                device_count: 2,
            }
            .to_string(),
            "Device limit reached for guest 1001 (2 devices registered)"
        );
    }

    #[test]
    fn test_classification() {
        assert!(InvitationError::not_found("1").is_not_found());
        assert!(!InvitationError::storage("down").is_not_found());
        assert!(!InvitationError::storage("down").is_user_error());
    }
}
