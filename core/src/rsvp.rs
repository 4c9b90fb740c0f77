//! RSVP state machine.
//!
//! # States
//!
//! ```text
//!            submit(attending = true)
//! ┌─────────┐ ─────────────────────▶ ┌───────────┐
//! │ pending │                        │ confirmed │ ◀─┐
//! └─────────┘ ─────────────────────▶ └───────────┘   │ resubmit
//!            submit(attending = false)    ▲ │        │ (either way)
//!                                         │ ▼        │
//!                                    ┌───────────┐ ──┘
//!                                    │ declined  │
//!                                    └───────────┘
//! ```
//!
//! Any state moves to `confirmed` or `declined` by (re)submission. Nothing
//! moves back to `pending`: a guest only has no attendance before their
//! first submission.
//!
//! `status` is redundant with `attendance.attending` and exists so stores can
//! filter without reading the nested document. The two are always written
//! together by [`crate::Guest::record_rsvp`].

use crate::error::{InvitationError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attendance status of a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    /// No response yet (`attendance` is null).
    Pending,
    /// Responded and attending.
    Confirmed,
    /// Responded and not attending.
    Declined,
}

impl RsvpStatus {
    /// Status implied by an attendance record.
    ///
    /// This is the only way a status is ever produced for a guest.
    #[must_use]
    pub const fn for_attendance(attendance: Option<&Attendance>) -> Self {
        match attendance {
            None => Self::Pending,
            Some(Attendance {
                attending: true, ..
            }) => Self::Confirmed,
            Some(Attendance {
                attending: false, ..
            }) => Self::Declined,
        }
    }

    /// Convert status to its storage/wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Declined => "declined",
        }
    }

    /// Parse status from its storage representation.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationError::Storage`] if the string is not a known
    /// status (the value came from a corrupt row).
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "declined" => Ok(Self::Declined),
            _ => Err(InvitationError::storage(format!("Invalid RSVP status: {s}"))),
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded attendance response.
///
/// Always replaced wholesale; there is no partial update and no history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    /// Whether the guest is coming.
    pub attending: bool,

    /// Party size. Zero when declining.
    ///
    /// `None` only for records written before the count was captured; the
    /// headcount treats those as a single guest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests_count: Option<u32>,

    /// Free-text note to the hosts. May be empty.
    #[serde(default)]
    pub message: String,

    /// When this response was recorded.
    pub submitted_at: DateTime<Utc>,
}

impl Attendance {
    /// Build the attendance record for a submission.
    ///
    /// A declining submission always records zero guests, whatever was sent.
    /// An attending submission records the count it was given, including 0;
    /// callers apply the default of one before getting here.
    #[must_use]
    pub fn from_submission(submission: &RsvpSubmission, submitted_at: DateTime<Utc>) -> Self {
        let guests_count = if submission.attending {
            submission.guests_count
        } else {
            0
        };

        Self {
            attending: submission.attending,
            guests_count: Some(guests_count),
            message: submission.message.clone(),
            submitted_at,
        }
    }

    /// Number of people this response brings, falling back to one when the
    /// count was never recorded.
    #[must_use]
    pub fn headcount(&self) -> u32 {
        self.guests_count.unwrap_or(1)
    }
}

/// An RSVP as submitted by the invitee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSubmission {
    /// Whether the guest is coming.
    pub attending: bool,
    /// Party size; ignored (forced to 0) when not attending.
    pub guests_count: u32,
    /// Free-text note; not validated.
    pub message: String,
}

impl RsvpSubmission {
    /// An attending response for `guests_count` people.
    #[must_use]
    pub fn attending(guests_count: u32, message: impl Into<String>) -> Self {
        Self {
            attending: true,
            guests_count,
            message: message.into(),
        }
    }

    /// A declining response.
    #[must_use]
    pub fn declining(message: impl Into<String>) -> Self {
        Self {
            attending: false,
            guests_count: 0,
            message: message.into(),
        }
    }
}

/// Checks `status == for_attendance(attendance)`.
#[must_use]
pub fn is_consistent(status: RsvpStatus, attendance: Option<&Attendance>) -> bool {
    status == RsvpStatus::for_attendance(attendance)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }

    #[test]
    fn test_status_for_attendance() {
        assert_eq!(RsvpStatus::for_attendance(None), RsvpStatus::Pending);

        let yes = Attendance::from_submission(&RsvpSubmission::attending(3, ""), at());
        assert_eq!(RsvpStatus::for_attendance(Some(&yes)), RsvpStatus::Confirmed);

        let no = Attendance::from_submission(&RsvpSubmission::declining("sorry"), at());
        assert_eq!(RsvpStatus::for_attendance(Some(&no)), RsvpStatus::Declined);
    }

    #[test]
    fn test_declining_forces_zero_guests() {
        let submission = RsvpSubmission {
            attending: false,
            guests_count: 5,
            message: String::new(),
        };
        let attendance = Attendance::from_submission(&submission, at());
        assert_eq!(attendance.guests_count, Some(0));
    }

    #[test]
    fn test_attending_keeps_count_as_given() {
        // Zero is persisted as-is; defaulting is the caller's job.
        let attendance = Attendance::from_submission(&RsvpSubmission::attending(0, ""), at());
        assert_eq!(attendance.guests_count, Some(0));

        let attendance = Attendance::from_submission(&RsvpSubmission::attending(4, "❤️"), at());
        assert_eq!(attendance.guests_count, Some(4));
        assert_eq!(attendance.message, "❤️");
        assert_eq!(attendance.submitted_at, at());
    }

    #[test]
    fn test_headcount_falls_back_to_one() {
        let mut attendance = Attendance::from_submission(&RsvpSubmission::attending(2, ""), at());
        assert_eq!(attendance.headcount(), 2);
        attendance.guests_count = None;
        assert_eq!(attendance.headcount(), 1);
    }

    #[test]
    fn test_status_roundtrip_strings() {
        for status in [RsvpStatus::Pending, RsvpStatus::Confirmed, RsvpStatus::Declined] {
            assert_eq!(RsvpStatus::parse(status.as_str()), Ok(status));
        }
        assert!(matches!(
            RsvpStatus::parse("maybe"),
            Err(InvitationError::Storage(_))
        ));
    }

    #[test]
    fn test_wire_shape() {
        let attendance = Attendance::from_submission(&RsvpSubmission::attending(2, "hi"), at());
        let json = serde_json::to_value(&attendance).unwrap();
        assert_eq!(json["attending"], true);
        assert_eq!(json["guestsCount"], 2);
        assert_eq!(json["message"], "hi");
        assert!(json.get("submittedAt").is_some());

        let legacy: Attendance = serde_json::from_value(serde_json::json!({
            "attending": true,
            "submittedAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(legacy.guests_count, None);
        assert_eq!(legacy.message, "");
    }

    proptest! {
        #[test]
        fn prop_submission_yields_consistent_status(
            attending in any::<bool>(),
            guests_count in 0u32..50,
            message in ".{0,20}",
        ) {
            let submission = RsvpSubmission { attending, guests_count, message };
            let attendance = Attendance::from_submission(&submission, at());
            let status = RsvpStatus::for_attendance(Some(&attendance));

            prop_assert!(is_consistent(status, Some(&attendance)));
            prop_assert_ne!(status, RsvpStatus::Pending);
            if !attending {
                prop_assert_eq!(attendance.guests_count, Some(0));
            }
        }
    }
}
