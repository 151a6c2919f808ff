use restau_auth_types::password::verify_password;
use restau_auth_types::token::{
    IssuedToken, TokenInfo, TokenKind, TokenTtl, issue_token, validate_access_token,
    validate_refresh_token,
};
use restau_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;
use crate::usecase::user::{CreateUserInput, create_account};

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: IssuedToken,
    pub refresh_token: IssuedToken,
}

fn issue_pair(email: &str, ttl: TokenTtl, secret: &str) -> Result<TokenPair, ApiError> {
    Ok(TokenPair {
        access_token: issue_token(email, TokenKind::Access, ttl.access_secs, secret)?,
        refresh_token: issue_token(email, TokenKind::Refresh, ttl.refresh_secs, secret)?,
    })
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

/// Self-service sign-up. Always creates a `client`.
pub struct RegisterUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RegisterUseCase<R> {
    pub async fn execute(&self, input: RegisterInput) -> Result<User, ApiError> {
        create_account(
            &self.repo,
            CreateUserInput {
                name: input.name,
                address: input.address,
                phone: input.phone,
                email: input.email,
                password: input.password,
                role: UserRole::Client,
            },
        )
        .await
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: String,
    pub ttl: TokenTtl,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let email = email.trim().to_lowercase();
        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .filter(|u| u.active)
            .ok_or(ApiError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }
        tracing::info!(user_id = user.id, "login");
        issue_pair(&user.email, self.ttl, &self.jwt_secret)
    }
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

pub struct RefreshTokenUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: String,
    pub ttl: TokenTtl,
}

impl<R: UserRepository> RefreshTokenUseCase<R> {
    pub async fn execute(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let info = validate_refresh_token(refresh_token, &self.jwt_secret)?;
        let user = self
            .repo
            .find_by_email(&info.email)
            .await?
            .filter(|u| u.active)
            .ok_or(ApiError::InvalidToken)?;
        issue_pair(&user.email, self.ttl, &self.jwt_secret)
    }
}

// ── VerifyToken ──────────────────────────────────────────────────────────────

pub fn verify_access_token(token: &str, secret: &str) -> Result<TokenInfo, ApiError> {
    Ok(validate_access_token(token, secret)?)
}

// ── ResolveCurrentUser ───────────────────────────────────────────────────────

/// Map a bearer access token to the active account it was issued for.
pub struct ResolveCurrentUserUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> ResolveCurrentUserUseCase<R> {
    pub async fn execute(&self, token: &str) -> Result<User, ApiError> {
        let info = verify_access_token(token, &self.jwt_secret)?;
        self.repo
            .find_by_email(&info.email)
            .await?
            .filter(|u| u.active)
            .ok_or(ApiError::UserNotFound)
    }
}
