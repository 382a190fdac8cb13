//! `Authorization: Bearer <token>` extractor.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;

/// Raw session token taken from the `Authorization` header.
///
/// Only checks presence and the `Bearer` scheme. Signature and expiry are
/// checked by the handler with [`crate::token::validate_session_token`].
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Rejection for a missing or malformed `Authorization` header (401).
#[derive(Debug)]
pub struct MissingBearer;

impl IntoResponse for MissingBearer {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": "INVALID_TOKEN",
            "message": "invalid token",
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = MissingBearer;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_bearer)
            .map(str::to_owned);

        async move { token.map(BearerToken).ok_or(MissingBearer) }
    }
}
