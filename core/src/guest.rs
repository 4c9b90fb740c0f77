//! Guest records.
//!
//! A guest is created once by an admin (pending, no attendance), mutated only
//! through RSVP submission, and deleted explicitly. `status` and `attendance`
//! are private so the pair can only change together.

use crate::constants::DEFAULT_GROUP;
use crate::error::{InvitationError, Result};
use crate::rsvp::{Attendance, RsvpStatus, RsvpSubmission};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Storage-assigned guest identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(pub Uuid);

impl GuestId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GuestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Externally visible guest identifier embedded in invitation links.
///
/// A decimal string. Ordering between numbers uses [`GuestNumber::sequence`]
/// (integer semantics), never string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestNumber(String);

impl GuestNumber {
    /// Parse a guest number as received from a link or request.
    ///
    /// Surrounding whitespace is ignored. Non-numeric values are accepted:
    /// they simply never match a guest.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationError::Validation`] if the value is empty.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvitationError::validation("guestNumber is required"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Guest number for a position in the numeric sequence.
    #[must_use]
    pub fn from_sequence(value: u64) -> Self {
        Self(value.to_string())
    }

    /// Numeric value, if the number is a plain decimal.
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    /// Borrow the raw string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuestNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GuestNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Profile supplied when an admin adds a guest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewGuest {
    /// Display name (required).
    #[serde(default)]
    pub name: String,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Seating/invitation group; `"General"` when absent.
    #[serde(default)]
    pub group: Option<String>,
}

impl NewGuest {
    /// Profile with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the group.
    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationError::Validation`] if the name is blank.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(InvitationError::validation("name is required"));
        }
        Ok(())
    }
}

/// An invitee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    /// Storage identifier.
    pub id: GuestId,
    /// Number embedded in the invitation link.
    pub guest_number: GuestNumber,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Invitation group.
    pub group: String,
    status: RsvpStatus,
    attendance: Option<Attendance>,
    /// When the guest was added.
    pub created_at: DateTime<Utc>,
    /// Last write to this record.
    pub updated_at: DateTime<Utc>,
}

impl Guest {
    /// A freshly created guest: pending, no attendance.
    #[must_use]
    pub fn new(id: GuestId, guest_number: GuestNumber, profile: NewGuest, now: DateTime<Utc>) -> Self {
        let group = profile
            .group
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| DEFAULT_GROUP.to_string());

        Self {
            id,
            guest_number,
            name: profile.name.trim().to_string(),
            phone: profile.phone,
            email: profile.email,
            group,
            status: RsvpStatus::Pending,
            attendance: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a previously stored attendance, deriving the status from it.
    ///
    /// Used by repositories when loading records.
    #[must_use]
    pub fn with_attendance(mut self, attendance: Option<Attendance>) -> Self {
        self.status = RsvpStatus::for_attendance(attendance.as_ref());
        self.attendance = attendance;
        self
    }

    /// Current status (always consistent with [`Guest::attendance`]).
    #[must_use]
    pub const fn status(&self) -> RsvpStatus {
        self.status
    }

    /// Current attendance, `None` while pending.
    #[must_use]
    pub const fn attendance(&self) -> Option<&Attendance> {
        self.attendance.as_ref()
    }

    /// Record an RSVP: replace the attendance wholesale and recompute the
    /// status in one step.
    pub fn record_rsvp(&mut self, submission: &RsvpSubmission, now: DateTime<Utc>) {
        let attendance = Attendance::from_submission(submission, now);
        self.status = RsvpStatus::for_attendance(Some(&attendance));
        self.attendance = Some(attendance);
        self.updated_at = now;
    }
}
