use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use restau_auth_types::bearer::BearerToken;

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::auth::{
    LoginUseCase, RefreshTokenUseCase, RegisterInput, RegisterUseCase, TokenPair,
    verify_access_token,
};

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token.token,
            refresh_token: pair.refresh_token.token,
            token_type: "bearer",
        }
    }
}

// ── POST /auth/register ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let usecase = RegisterUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(RegisterInput {
            name: body.name,
            address: body.address,
            phone: body.phone,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let usecase = LoginUseCase {
        repo: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
        ttl: state.token_ttl,
    };
    let pair = usecase.execute(&body.email, &body.password).await?;
    Ok(Json(pair.into()))
}

// ── POST /auth/refresh ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let usecase = RefreshTokenUseCase {
        repo: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
        ttl: state.token_ttl,
    };
    let pair = usecase.execute(&body.refresh_token).await?;
    Ok(Json(pair.into()))
}

// ── GET /auth/verify-token ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct VerifyTokenResponse {
    pub message: &'static str,
    pub email: String,
    #[serde(serialize_with = "restau_core::serde::to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

pub async fn verify_token(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<VerifyTokenResponse>, ApiError> {
    let info = verify_access_token(token.as_str(), &state.jwt_secret)?;
    let expires_at = i64::try_from(info.exp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or(ApiError::InvalidToken)?;
    Ok(Json(VerifyTokenResponse {
        message: "token is valid",
        email: info.email,
        expires_at,
    }))
}

// ── GET /auth/me ─────────────────────────────────────────────────────────────

pub async fn me(current: CurrentUser) -> Json<UserResponse> {
    Json(current.0.into())
}
