//! Shared admin passphrase gate.
//!
//! Admin routes require the `X-Admin-Passphrase` header to match the
//! configured passphrase. This is a shared secret, not user authentication.

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use constant_time_eq::constant_time_eq;
use std::sync::Arc;

/// Header carrying the admin passphrase.
pub const ADMIN_PASSPHRASE_HEADER: &str = "X-Admin-Passphrase";

/// The configured admin passphrase.
#[derive(Clone)]
pub struct AdminGate {
    passphrase: Arc<str>,
}

impl AdminGate {
    /// Gate checking against `passphrase`.
    #[must_use]
    pub fn new(passphrase: impl Into<Arc<str>>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }

    /// Constant-time comparison with the configured passphrase.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        !self.passphrase.is_empty() && constant_time_eq(self.passphrase.as_bytes(), candidate.as_bytes())
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate").finish_non_exhaustive()
    }
}

/// Proof that the request carried the admin passphrase.
///
/// Add as a handler argument to protect a route; rejects with 401.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

#[async_trait]
impl<S> FromRequestParts<S> for AdminAccess
where
    AdminGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = AdminGate::from_ref(state);
        let candidate = parts
            .headers
            .get(ADMIN_PASSPHRASE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if gate.verify(candidate) {
            Ok(Self)
        } else {
            tracing::warn!(path = %parts.uri.path(), "Rejected admin request");
            Err(AppError::unauthorized("Invalid admin passphrase"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)] // Test code can use expect
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_verify() {
        let gate = AdminGate::new("open sesame");
        assert!(gate.verify("open sesame"));
        assert!(!gate.verify("open sesam"));
        assert!(!gate.verify(""));
    }

    #[test]
    fn test_empty_passphrase_never_matches() {
        assert!(!AdminGate::new("").verify(""));
    }

    #[test]
    fn test_debug_hides_passphrase() {
        assert!(!format!("{:?}", AdminGate::new("secret")).contains("secret"));
    }

    #[tokio::test]
    async fn test_extractor() {
        let gate = AdminGate::new("open sesame");

        let req = Request::builder()
            .header(ADMIN_PASSPHRASE_HEADER, "open sesame")
            .body(())
            .expect("Valid request");
        let (mut parts, _) = req.into_parts();
        assert!(AdminAccess::from_request_parts(&mut parts, &gate).await.is_ok());

        let req = Request::builder().body(()).expect("Valid request");
        let (mut parts, _) = req.into_parts();
        let rejection = AdminAccess::from_request_parts(&mut parts, &gate)
            .await
            .expect_err("missing header is rejected");
        assert_eq!(rejection.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
