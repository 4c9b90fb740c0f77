//! Device registration handlers.
//!
//! Called by the invitation page before it shows anything. A denied device
//! gets 403 with the current count so the page can explain the limit.

use crate::WebResult;
use crate::extractors::{ClientIp, CorrelationId, JsonBody, UserAgent};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use invitation_core::providers::{DeviceRepository, GuestRepository, SettingsRepository};
use invitation_core::{AdmissionOutcome, DeviceAdmission, GuestNumber};
use serde::{Deserialize, Serialize};

/// Message shown to a device refused by the cap.
pub const DEVICE_LIMIT_MESSAGE: &str = "This invitation has already been opened on the maximum number of devices";

/// Device registration request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceRequest {
    /// Client-computed fingerprint.
    #[serde(default)]
    pub fingerprint: String,
    /// User agent reported by the page; the request header is used otherwise.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Guest number from the invitation link.
    #[serde(default)]
    pub guest_number: String,
}

/// Outcome of a registration attempt.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceResponse {
    /// Whether the device may open the invitation.
    pub authorized: bool,
    /// Devices registered after the attempt.
    pub device_count: u32,
    /// Whether this attempt registered the device for the first time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new_registration: Option<bool>,
    /// Whether the device was already registered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_registered: Option<bool>,
    /// Explanation for a denied device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<&DeviceAdmission> for RegisterDeviceResponse {
    fn from(admission: &DeviceAdmission) -> Self {
        if admission.authorized() {
            Self {
                authorized: true,
                device_count: admission.device_count,
                is_new_registration: Some(admission.outcome.is_new_device()),
                is_registered: Some(admission.outcome == AdmissionOutcome::KnownDevice),
                message: None,
            }
        } else {
            Self {
                authorized: false,
                device_count: admission.device_count,
                is_new_registration: None,
                is_registered: None,
                message: Some(DEVICE_LIMIT_MESSAGE),
            }
        }
    }
}

/// Device count for a link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCountResponse {
    /// Guest number queried.
    pub guest_number: GuestNumber,
    /// Devices registered (0 if none).
    pub device_count: u32,
}

/// Register (or recognise) the device opening an invitation link.
///
/// # Endpoint
///
/// ```text
/// POST /api/devices/register
/// { "fingerprint": "...", "guestNumber": "1001", "userAgent": "..." }
/// ```
///
/// # Response
///
/// - 200 `{ authorized: true, deviceCount, isNewRegistration, isRegistered }`
/// - 403 `{ authorized: false, deviceCount, message }` when the link is capped
///
/// # Errors
///
/// 400 when `fingerprint` or `guestNumber` is missing.
pub async fn register_device<G, D, S>(
    State(state): State<AppState<G, D, S>>,
    correlation_id: CorrelationId,
    ClientIp(client_ip): ClientIp,
    UserAgent(header_user_agent): UserAgent,
    JsonBody(request): JsonBody<RegisterDeviceRequest>,
) -> WebResult<(StatusCode, Json<RegisterDeviceResponse>)>
where
    G: GuestRepository + 'static,
    D: DeviceRepository + 'static,
    S: SettingsRepository + 'static,
{
    let guest_number = GuestNumber::parse(&request.guest_number)?;
    let user_agent = request
        .user_agent
        .filter(|ua| !ua.trim().is_empty())
        .unwrap_or(header_user_agent);

    let admission = state
        .devices
        .register(&guest_number, &request.fingerprint, &user_agent)
        .await?;

    tracing::info!(
        correlation_id = %correlation_id.0,
        guest_number = %guest_number,
        client_ip = ?client_ip,
        outcome = admission.outcome.as_str(),
        "Device registration"
    );

    let status = if admission.authorized() {
        StatusCode::OK
    } else {
        StatusCode::FORBIDDEN
    };
    Ok((status, Json(RegisterDeviceResponse::from(&admission))))
}

/// Number of devices registered for a link.
///
/// # Endpoint
///
/// ```text
/// GET /api/devices/:guest_number
/// ```
pub async fn device_count<G, D, S>(
    State(state): State<AppState<G, D, S>>,
    Path(raw): Path<String>,
) -> WebResult<Json<DeviceCountResponse>>
where
    G: GuestRepository + 'static,
    D: DeviceRepository + 'static,
    S: SettingsRepository + 'static,
{
    let guest_number = GuestNumber::parse(&raw)?;
    let device_count = state.devices.count(&guest_number).await?;

    Ok(Json(DeviceCountResponse {
        guest_number,
        device_count,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    fn admission(outcome: AdmissionOutcome, device_count: u32) -> DeviceAdmission {
        DeviceAdmission {
            guest_number: GuestNumber::from_sequence(1001),
            outcome,
            device_count,
        }
    }

    #[test]
    fn test_known_device_response() {
        let response = RegisterDeviceResponse::from(&admission(AdmissionOutcome::KnownDevice, 2));
        assert!(response.authorized);
        assert_eq!(response.is_new_registration, Some(false));
        assert_eq!(response.is_registered, Some(true));
    }

    #[test]
    fn test_denied_response_omits_flags() {
        let response = RegisterDeviceResponse::from(&admission(AdmissionOutcome::Denied, 2));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["authorized"], false);
        assert_eq!(json["deviceCount"], 2);
        assert!(json.get("isNewRegistration").is_none());
        assert!(json.get("message").is_some());
    }
}
