//! Router composition.
//!
//! Wires every handler into one Axum router over an [`AppState`].

use crate::handlers::{admin, devices, guests, health, rsvp, settings};
use crate::middleware::request_context;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};
use invitation_core::providers::{DeviceRepository, GuestRepository, SettingsRepository};
use tower_http::trace::TraceLayer;

/// Create the application router.
///
/// # Routes
///
/// ## Public (invitation page)
/// - `GET /health` - Liveness
/// - `GET /api/guests/:guest_number` - Guest behind a link
/// - `POST /api/rsvp` - Submit an RSVP (guest number in body)
/// - `PUT /api/guests/:guest_number/rsvp` - Submit an RSVP (guest number in path)
/// - `POST /api/devices/register` - Device admission
/// - `GET /api/devices/:guest_number` - Device count
/// - `GET /api/settings` - Event settings
///
/// ## Admin (`X-Admin-Passphrase`)
/// - `POST /api/admin/verify` - Passphrase check
/// - `GET /api/guests` - Guest list
/// - `POST /api/guests` - Add a guest
/// - `POST /api/guests/bulk` - Add several guests
/// - `DELETE /api/guests/:guest_number` - Remove a guest
/// - `GET /api/stats` - Response counts
/// - `PUT /api/settings` - Update settings
///
/// CORS is left to the caller (see [`crate::middleware::cors_layer`]).
///
/// # Example
///
/// ```rust,ignore
/// let state = AppState::new(guests, devices, settings, Arc::new(SystemClock), AdminGate::new(passphrase));
/// let app = router(state).layer(cors_layer(None));
/// ```
pub fn router<G, D, S>(state: AppState<G, D, S>) -> Router
where
    G: GuestRepository + 'static,
    D: DeviceRepository + 'static,
    S: SettingsRepository + 'static,
{
    Router::new()
        .route("/health", get(health::health_check))
        // Guests
        .route(
            "/api/guests",
            get(guests::list_guests::<G, D, S>).post(guests::create_guest::<G, D, S>),
        )
        .route("/api/guests/bulk", post(guests::create_guests_bulk::<G, D, S>))
        .route(
            "/api/guests/:guest_number",
            get(guests::get_guest::<G, D, S>).delete(guests::delete_guest::<G, D, S>),
        )
        .route("/api/stats", get(guests::guest_stats::<G, D, S>))
        // RSVP
        .route("/api/rsvp", post(rsvp::submit_rsvp::<G, D, S>))
        .route("/api/guests/:guest_number/rsvp", put(rsvp::update_rsvp::<G, D, S>))
        // Devices
        .route("/api/devices/register", post(devices::register_device::<G, D, S>))
        .route("/api/devices/:guest_number", get(devices::device_count::<G, D, S>))
        // Settings
        .route(
            "/api/settings",
            get(settings::get_settings::<G, D, S>).put(settings::update_settings::<G, D, S>),
        )
        // Admin
        .route("/api/admin/verify", post(admin::verify_admin))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_context))
        .with_state(state)
}
