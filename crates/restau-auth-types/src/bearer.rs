//! `Authorization: Bearer <token>` extractor.

use axum::extract::FromRequestParts;
use axum_extra::headers::authorization::{Authorization, Bearer};
use axum_extra::headers::HeaderMapExt;
use http::HeaderMap;
use http::request::Parts;

use restau_core::error::AppError;

/// Raw bearer token taken from the `Authorization` header.
///
/// Rejects with 401 when the header is absent, not a bearer credential, or
/// empty. Signature and expiry are checked by the caller.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the token from request headers without going through an extractor.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        headers
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.token().to_owned())
            .filter(|t| !t.is_empty())
            .map(BearerToken)
            .ok_or(AppError::Unauthorized("missing bearer token"))
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = Self::from_headers(&parts.headers);
        async move { token }
    }
}
