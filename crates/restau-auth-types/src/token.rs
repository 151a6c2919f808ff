//! JWT access and refresh tokens.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Which half of the token pair a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Errors returned by token issuance and validation.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("expected {expected:?} token, got {actual:?}")]
    WrongKind {
        expected: TokenKind,
        actual: TokenKind,
    },
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user email |
/// | `typ` | custom | [`TokenKind`] |
/// | `iat` | `iat` | issued at, seconds since epoch |
/// | `exp` | `exp` | expiration, seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub typ: TokenKind,
    pub iat: u64,
    pub exp: u64,
}

/// Identity carried by a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub email: String,
    pub kind: TokenKind,
    pub exp: u64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub exp: u64,
}

/// Lifetimes for the two token kinds, in seconds.
#[derive(Debug, Clone, Copy)]
pub struct TokenTtl {
    pub access_secs: u64,
    pub refresh_secs: u64,
}

impl TokenTtl {
    pub fn from_config(access_minutes: u64, refresh_days: u64) -> Self {
        Self {
            access_secs: access_minutes * 60,
            refresh_secs: refresh_days * 24 * 60 * 60,
        }
    }

    pub fn for_kind(&self, kind: TokenKind) -> u64 {
        match kind {
            TokenKind::Access => self.access_secs,
            TokenKind::Refresh => self.refresh_secs,
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Sign a token for `email` that expires `ttl_secs` from now.
pub fn issue_token(
    email: &str,
    kind: TokenKind,
    ttl_secs: u64,
    secret: &str,
) -> Result<IssuedToken, AuthError> {
    let iat = now_secs();
    let claims = JwtClaims {
        sub: email.to_owned(),
        typ: kind,
        iat,
        exp: iat + ttl_secs,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::Signing)?;
    Ok(IssuedToken {
        token,
        exp: claims.exp,
    })
}

/// Decode and validate a JWT, returning raw claims.
///
/// HS256 only, `exp` checked with the default 60s leeway, `exp` and `sub`
/// required.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

/// Validate a token of the given kind and return its identity.
pub fn validate_token(
    token: &str,
    expected: TokenKind,
    secret: &str,
) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, secret)?;
    if claims.sub.trim().is_empty() {
        return Err(AuthError::Malformed);
    }
    if claims.typ != expected {
        return Err(AuthError::WrongKind {
            expected,
            actual: claims.typ,
        });
    }
    Ok(TokenInfo {
        email: claims.sub,
        kind: claims.typ,
        exp: claims.exp,
    })
}

pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    validate_token(token, TokenKind::Access, secret)
}

pub fn validate_refresh_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    validate_token(token, TokenKind::Refresh, secret)
}
