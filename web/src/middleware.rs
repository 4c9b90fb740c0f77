//! Request context and CORS.
//!
//! [`request_context`] runs around every route. It resolves the request's
//! correlation id, stores it in the request extensions for the
//! [`CorrelationId`](crate::CorrelationId) extractor, and echoes it back in
//! the `X-Correlation-ID` response header. Handlers run inside a `request`
//! span carrying the correlation id, the method, the path and, for
//! `/api/guests/:n` and `/api/devices/:n`, the guest number.

use axum::{
    extract::Request,
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the correlation id in both directions.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Correlation and span middleware, installed with `axum::middleware::from_fn`.
pub async fn request_context(mut req: Request, next: Next) -> Response {
    let correlation_id = req
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .unwrap_or_else(Uuid::new_v4);
    req.extensions_mut().insert(correlation_id);

    let span = tracing::info_span!(
        "request",
        correlation_id = %correlation_id,
        method = %req.method(),
        path = %req.uri().path(),
        guest_number = tracing::field::Empty,
    );
    if let Some(guest_number) = guest_number_in_path(req.uri().path()) {
        span.record("guest_number", guest_number);
    }

    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

/// Guest number addressed by a `/api/guests/:n` or `/api/devices/:n` path.
fn guest_number_in_path(path: &str) -> Option<&str> {
    let mut segments = path.trim_matches('/').split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some("api"), Some("guests" | "devices"), Some(candidate))
            if !candidate.is_empty() && candidate.bytes().all(|b| b.is_ascii_digit()) =>
        {
            Some(candidate)
        }
        _ => None,
    }
}

/// CORS for the browser invitation page.
///
/// With an origin configured only that origin is allowed; otherwise any
/// origin is. The admin passphrase and correlation headers are always allowed.
#[must_use]
pub fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-admin-passphrase"),
            header::HeaderName::from_static("x-correlation-id"),
        ])
        .expose_headers([header::HeaderName::from_static("x-correlation-id")]);

    let Some(origin) = allowed_origin else {
        return base.allow_origin(Any);
    };
    match HeaderValue::from_str(origin) {
        Ok(origin) => base.allow_origin(origin),
        Err(_) => {
            tracing::warn!(origin, "CORS origin is not a valid header value; allowing any origin");
            base.allow_origin(Any)
        }
    }
}
