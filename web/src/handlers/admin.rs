//! Admin console login check.

use super::Ack;
use crate::admin::AdminAccess;
use axum::Json;

/// Check the passphrase the console is about to store.
///
/// # Endpoint
///
/// ```text
/// POST /api/admin/verify
/// X-Admin-Passphrase: ...
/// ```
///
/// Responds `{ "success": true }`. A wrong passphrase is rejected by the
/// [`AdminAccess`] extractor with 401 before this body runs.
#[allow(clippy::unused_async)]
pub async fn verify_admin(_admin: AdminAccess) -> Json<Ack> {
    tracing::debug!("Admin passphrase verified");
    Json(Ack::ok())
}
