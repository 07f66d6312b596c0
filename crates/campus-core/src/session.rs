//! Session token extractors.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::request::Parts;

use campus_domain::id::SessionToken;

use crate::error::AppError;

/// Header carrying the opaque session token issued at login.
pub const SESSION_HEADER: &str = "x-campus-session";

fn token_from(parts: &Parts) -> Option<SessionToken> {
    parts
        .headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// Required session token. Rejects with 401 when the header is absent or is
/// not a token. Whether the token is still live is up to the handler.
#[derive(Debug, Clone, Copy)]
pub struct SessionHeader(pub SessionToken);

impl<S> FromRequestParts<S> for SessionHeader
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = token_from(parts);
        async move { token.map(Self).ok_or(AppError::Unauthorized) }
    }
}

/// Session token when present and well-formed; never rejects.
#[derive(Debug, Clone, Copy)]
pub struct OptionalSession(pub Option<SessionToken>);

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = token_from(parts);
        async move { Ok(Self(token)) }
    }
}
