//! Request extractors used by the invitation handlers.
//!
//! Device registration logs the [`CorrelationId`] and [`ClientIp`] and falls
//! back to the [`UserAgent`] header when the body carries none. Every JSON
//! body goes through [`JsonBody`] so malformed payloads get the same error
//! envelope as any other validation failure.

use crate::error::AppError;
use axum::{
    Json, async_trait,
    extract::{ConnectInfo, FromRequest, FromRequestParts, Request, rejection::JsonRejection},
    http::{header, request::Parts},
};
use serde::de::DeserializeOwned;
use std::net::{IpAddr, SocketAddr};
use uuid::Uuid;

/// Correlation id resolved by [`request_context`](crate::request_context).
///
/// Outside that middleware a fresh id is generated.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Uuid>().copied().unwrap_or_else(Uuid::new_v4)))
    }
}

/// Caller address for registration logs.
///
/// The first `X-Forwarded-For` hop wins over the socket address, since the
/// service normally sits behind a proxy. `None` when neither is available.
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub Option<IpAddr>);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("X-Forwarded-For")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .and_then(|hop| hop.trim().parse::<IpAddr>().ok());
        let peer = || parts.extensions.get::<ConnectInfo<SocketAddr>>().map(|info| info.0.ip());

        Ok(Self(forwarded.or_else(peer)))
    }
}

/// `User-Agent` header, `"Unknown"` when absent or not valid text.
#[derive(Debug, Clone)]
pub struct UserAgent(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UserAgent
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("Unknown");

        Ok(Self(user_agent.to_string()))
    }
}

/// JSON request body whose rejections render as [`AppError`].
///
/// Bodies that parse but do not fit the expected shape (a string where a
/// count belongs) are `VALIDATION_ERROR`; unparseable bodies and a missing
/// content type are `BAD_REQUEST`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(body_rejection(&rejection)),
        }
    }
}

fn body_rejection(rejection: &JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(_) => AppError::validation(rejection.body_text()),
        _ => AppError::bad_request(rejection.body_text()),
    }
}
