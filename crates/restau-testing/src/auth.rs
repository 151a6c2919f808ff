//! Bearer-token helpers for integration tests.
//!
//! Tokens are minted with the real signer, so requests built here go
//! through the same validation path as production traffic.

use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};

use restau_auth_types::token::{TokenKind, issue_token};

/// Secret used by every test that signs or validates tokens.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Identity presented by a test request.
pub struct MockAuth {
    pub email: String,
    pub secret: String,
}

impl MockAuth {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.to_owned(),
            secret: TEST_JWT_SECRET.to_owned(),
        }
    }

    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = secret.to_owned();
        self
    }

    pub fn token(&self, kind: TokenKind) -> String {
        issue_token(&self.email, kind, 600, &self.secret)
            .unwrap()
            .token
    }

    pub fn access_token(&self) -> String {
        self.token(TokenKind::Access)
    }

    /// `("authorization", "Bearer <access token>")`.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        let value = HeaderValue::from_str(&format!("Bearer {}", self.access_token())).unwrap();
        (AUTHORIZATION, value)
    }
}
