//! Event settings handlers.

use crate::admin::AdminAccess;
use crate::WebResult;
use crate::extractors::JsonBody;
use crate::state::AppState;
use axum::{Json, extract::State};
use invitation_core::providers::{DeviceRepository, GuestRepository, SettingsRepository};
use invitation_core::{Settings, SettingsPatch};

/// Current settings; defaults are stored on first read.
///
/// # Endpoint
///
/// ```text
/// GET /api/settings
/// ```
pub async fn get_settings<G, D, S>(State(state): State<AppState<G, D, S>>) -> WebResult<Json<Settings>>
where
    G: GuestRepository + 'static,
    D: DeviceRepository + 'static,
    S: SettingsRepository + 'static,
{
    Ok(Json(state.settings.get().await?))
}

/// Merge a partial update into the settings.
///
/// # Endpoint
///
/// ```text
/// PUT /api/settings
/// { "venue": "Old Mill" }
/// ```
pub async fn update_settings<G, D, S>(
    State(state): State<AppState<G, D, S>>,
    _admin: AdminAccess,
    JsonBody(patch): JsonBody<SettingsPatch>,
) -> WebResult<Json<Settings>>
where
    G: GuestRepository + 'static,
    D: DeviceRepository + 'static,
    S: SettingsRepository + 'static,
{
    Ok(Json(state.settings.update(patch).await?))
}
