//! RSVP submission handlers.
//!
//! The request body is lenient about optional fields. Defaults are applied
//! here, before the submission reaches the guest store:
//!
//! | Field         | Absent (attending) | Absent (declining) |
//! |---------------|--------------------|--------------------|
//! | `guestsCount` | 1                  | 0                  |
//! | `message`     | `""`               | `""`               |
//!
//! An attending guest sending `guestsCount: 0` is also treated as 1.

use crate::WebResult;
use crate::error::AppError;
use crate::extractors::{CorrelationId, JsonBody};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use invitation_core::constants::DEFAULT_ATTENDING_GUESTS;
use invitation_core::providers::{DeviceRepository, GuestRepository, SettingsRepository};
use invitation_core::{GuestNumber, RsvpStatus, RsvpSubmission};
use serde::{Deserialize, Serialize};

/// RSVP form as posted by the invitation page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    /// Guest number (required on `POST /api/rsvp`, ignored on the path route).
    #[serde(default)]
    pub guest_number: Option<String>,
    /// Name typed into the form. Informational only.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the guest will attend.
    #[serde(default)]
    pub attending: Option<bool>,
    /// Party size.
    #[serde(default)]
    pub guests_count: Option<u32>,
    /// Note to the hosts.
    #[serde(default)]
    pub message: Option<String>,
}

impl RsvpRequest {
    /// Apply the caller defaults and produce a well-formed submission.
    ///
    /// # Errors
    ///
    /// Returns a 400 error when `attending` is missing.
    pub fn submission(&self) -> WebResult<RsvpSubmission> {
        let attending = self
            .attending
            .ok_or_else(|| AppError::validation("attending is required"))?;
        let message = self.message.clone().unwrap_or_default();

        Ok(if attending {
            let guests_count = self
                .guests_count
                .filter(|count| *count > 0)
                .unwrap_or(DEFAULT_ATTENDING_GUESTS);
            RsvpSubmission::attending(guests_count, message)
        } else {
            RsvpSubmission::declining(message)
        })
    }
}

/// Response to an accepted RSVP.
#[derive(Debug, Serialize)]
pub struct RsvpResponse {
    /// Always `true`.
    pub success: bool,
    /// Status after the submission.
    pub status: RsvpStatus,
}

/// Submit or change an RSVP, guest number in the body.
///
/// # Endpoint
///
/// ```text
/// POST /api/rsvp
/// { "guestNumber": "1001", "attending": true, "guestsCount": 2, "message": "..." }
/// ```
///
/// # Errors
///
/// - 400 when `guestNumber` or `attending` is missing
/// - 404 when no guest carries the number
pub async fn submit_rsvp<G, D, S>(
    State(state): State<AppState<G, D, S>>,
    correlation_id: CorrelationId,
    JsonBody(request): JsonBody<RsvpRequest>,
) -> WebResult<Json<RsvpResponse>>
where
    G: GuestRepository + 'static,
    D: DeviceRepository + 'static,
    S: SettingsRepository + 'static,
{
    let guest_number = GuestNumber::parse(request.guest_number.as_deref().unwrap_or_default())?;
    record(&state, &guest_number, &request, correlation_id).await
}

/// Submit or change an RSVP, guest number in the path.
///
/// # Endpoint
///
/// ```text
/// PUT /api/guests/:guest_number/rsvp
/// { "attending": false, "message": "..." }
/// ```
///
/// # Errors
///
/// - 400 when `attending` is missing
/// - 404 when no guest carries the number
pub async fn update_rsvp<G, D, S>(
    State(state): State<AppState<G, D, S>>,
    correlation_id: CorrelationId,
    Path(raw): Path<String>,
    JsonBody(request): JsonBody<RsvpRequest>,
) -> WebResult<Json<RsvpResponse>>
where
    G: GuestRepository + 'static,
    D: DeviceRepository + 'static,
    S: SettingsRepository + 'static,
{
    let guest_number = GuestNumber::parse(&raw)?;
    record(&state, &guest_number, &request, correlation_id).await
}

async fn record<G, D, S>(
    state: &AppState<G, D, S>,
    guest_number: &GuestNumber,
    request: &RsvpRequest,
    correlation_id: CorrelationId,
) -> WebResult<Json<RsvpResponse>>
where
    G: GuestRepository,
    D: DeviceRepository,
    S: SettingsRepository,
{
    let submission = request.submission()?;
    let guest = state.guests.update_rsvp(guest_number, submission).await?;

    tracing::info!(
        correlation_id = %correlation_id.0,
        guest_number = %guest_number,
        status = %guest.status(),
        "RSVP recorded"
    );

    Ok(Json(RsvpResponse {
        success: true,
        status: guest.status(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    fn request(attending: Option<bool>, guests_count: Option<u32>) -> RsvpRequest {
        RsvpRequest {
            attending,
            guests_count,
            ..RsvpRequest::default()
        }
    }

    #[test]
    fn test_attending_without_count_defaults_to_one() {
        let submission = request(Some(true), None).submission().unwrap();
        assert_eq!(submission, RsvpSubmission::attending(1, ""));
    }

    #[test]
    fn test_attending_with_zero_count_defaults_to_one() {
        let submission = request(Some(true), Some(0)).submission().unwrap();
        assert_eq!(submission.guests_count, 1);
    }

    #[test]
    fn test_declining_ignores_count() {
        let submission = request(Some(false), Some(4)).submission().unwrap();
        assert_eq!(submission, RsvpSubmission::declining(""));
    }

    #[test]
    fn test_missing_attending_is_rejected() {
        let err = request(None, Some(2)).submission().unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parses_camel_case_body() {
        let request: RsvpRequest = serde_json::from_str(
            r#"{"guestNumber":"1001","attending":true,"guestsCount":3,"message":"yay"}"#,
        )
        .unwrap();
        assert_eq!(request.guest_number.as_deref(), Some("1001"));
        assert_eq!(request.submission().unwrap(), RsvpSubmission::attending(3, "yay"));
    }
}
