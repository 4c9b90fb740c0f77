//! Guest handlers.
//!
//! The public lookup backs the invitation page. Everything else is used by
//! the admin console and requires [`AdminAccess`].

use crate::admin::AdminAccess;
use crate::WebResult;
use crate::extractors::JsonBody;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use invitation_core::providers::{DeviceRepository, GuestRepository, SettingsRepository};
use invitation_core::{Guest, GuestNumber, GuestStats, InvitationError, NewGuest};
use serde::{Deserialize, Serialize};

/// Response for a single guest creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuestResponse {
    /// Always `true`.
    pub success: bool,
    /// Number assigned to the new guest.
    pub guest_number: GuestNumber,
    /// The stored record.
    pub guest: Guest,
}

/// Request body for bulk creation.
#[derive(Debug, Deserialize)]
pub struct BulkCreateRequest {
    /// Profiles to create, in order.
    #[serde(default)]
    pub guests: Vec<NewGuest>,
}

/// Response for bulk creation.
#[derive(Debug, Serialize)]
pub struct BulkCreateResponse {
    /// Always `true`.
    pub success: bool,
    /// Number of guests created.
    pub created: usize,
    /// The stored records, in request order.
    pub guests: Vec<Guest>,
}

/// Response for a deletion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteGuestResponse {
    /// Always `true`.
    pub success: bool,
    /// The record as it was before deletion.
    pub deleted_guest: Guest,
}

/// Look up the guest behind an invitation link.
///
/// # Endpoint
///
/// ```text
/// GET /api/guests/:guest_number
/// ```
///
/// # Errors
///
/// 404 when no guest carries the number.
pub async fn get_guest<G, D, S>(
    State(state): State<AppState<G, D, S>>,
    Path(raw): Path<String>,
) -> WebResult<Json<Guest>>
where
    G: GuestRepository + 'static,
    D: DeviceRepository + 'static,
    S: SettingsRepository + 'static,
{
    let guest_number = GuestNumber::parse(&raw)?;
    let guest = state
        .guests
        .find_by_number(&guest_number)
        .await?
        .ok_or_else(|| InvitationError::not_found(guest_number.as_str()))?;

    Ok(Json(guest))
}

/// List every guest, newest first.
///
/// # Endpoint
///
/// ```text
/// GET /api/guests
/// ```
pub async fn list_guests<G, D, S>(
    State(state): State<AppState<G, D, S>>,
    _admin: AdminAccess,
) -> WebResult<Json<Vec<Guest>>>
where
    G: GuestRepository + 'static,
    D: DeviceRepository + 'static,
    S: SettingsRepository + 'static,
{
    Ok(Json(state.guests.find_all().await?))
}

/// Add one guest.
///
/// # Endpoint
///
/// ```text
/// POST /api/guests
/// { "name": "Aisha", "phone": "...", "email": "...", "group": "Family" }
/// ```
///
/// Responds 201 with the assigned guest number.
///
/// # Errors
///
/// 400 when `name` is missing or blank.
pub async fn create_guest<G, D, S>(
    State(state): State<AppState<G, D, S>>,
    _admin: AdminAccess,
    JsonBody(profile): JsonBody<NewGuest>,
) -> WebResult<(StatusCode, Json<CreateGuestResponse>)>
where
    G: GuestRepository + 'static,
    D: DeviceRepository + 'static,
    S: SettingsRepository + 'static,
{
    let guest = state.guests.create(profile).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateGuestResponse {
            success: true,
            guest_number: guest.guest_number.clone(),
            guest,
        }),
    ))
}

/// Add a batch of guests.
///
/// Every profile is validated before anything is written.
///
/// # Endpoint
///
/// ```text
/// POST /api/guests/bulk
/// { "guests": [ { "name": "..." }, ... ] }
/// ```
///
/// # Errors
///
/// 400 when the list is empty or any entry lacks a name.
pub async fn create_guests_bulk<G, D, S>(
    State(state): State<AppState<G, D, S>>,
    _admin: AdminAccess,
    JsonBody(request): JsonBody<BulkCreateRequest>,
) -> WebResult<(StatusCode, Json<BulkCreateResponse>)>
where
    G: GuestRepository + 'static,
    D: DeviceRepository + 'static,
    S: SettingsRepository + 'static,
{
    let guests = state.guests.create_many(request.guests).await?;

    Ok((
        StatusCode::CREATED,
        Json(BulkCreateResponse {
            success: true,
            created: guests.len(),
            guests,
        }),
    ))
}

/// Delete a guest and its device registration.
///
/// # Endpoint
///
/// ```text
/// DELETE /api/guests/:guest_number
/// ```
///
/// # Errors
///
/// 404 when no guest carries the number.
pub async fn delete_guest<G, D, S>(
    State(state): State<AppState<G, D, S>>,
    _admin: AdminAccess,
    Path(raw): Path<String>,
) -> WebResult<Json<DeleteGuestResponse>>
where
    G: GuestRepository + 'static,
    D: DeviceRepository + 'static,
    S: SettingsRepository + 'static,
{
    let guest_number = GuestNumber::parse(&raw)?;
    let deleted_guest = state
        .guests
        .delete_by_number(&guest_number)
        .await?
        .ok_or_else(|| InvitationError::not_found(guest_number.as_str()))?;

    Ok(Json(DeleteGuestResponse {
        success: true,
        deleted_guest,
    }))
}

/// Response counts for the admin dashboard.
///
/// # Endpoint
///
/// ```text
/// GET /api/stats
/// ```
pub async fn guest_stats<G, D, S>(
    State(state): State<AppState<G, D, S>>,
    _admin: AdminAccess,
) -> WebResult<Json<GuestStats>>
where
    G: GuestRepository + 'static,
    D: DeviceRepository + 'static,
    S: SettingsRepository + 'static,
{
    Ok(Json(state.guests.stats().await?))
}
