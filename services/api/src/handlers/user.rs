use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use restau_domain::user::UserRole;

use crate::domain::types::User;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::handlers::order::OrderResponse;
use crate::state::AppState;
use crate::usecase::order::ListUserOrdersUseCase;
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeactivateUserUseCase, GetUserUseCase, ListUsersUseCase,
    UpdateUserInput, UpdateUserUseCase,
};

/// Public view of an account. The password hash never leaves the service.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub role: UserRole,
    pub active: bool,
    #[serde(serialize_with = "restau_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            address: user.address,
            phone: user.phone,
            email: user.email,
            role: user.role,
            active: user.active,
            created_at: user.created_at,
        }
    }
}

// ── GET /utilisateurs ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

pub async fn list_users(
    current: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    current.require_admin()?;
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute(query.include_inactive).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── POST /utilisateurs ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
}

pub async fn create_user(
    current: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    current.require_admin()?;
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(CreateUserInput {
            name: body.name,
            address: body.address,
            phone: body.phone,
            email: body.email,
            password: body.password,
            role: body.role.unwrap_or(UserRole::Client),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /utilisateurs/me ─────────────────────────────────────────────────────

pub async fn get_me(current: CurrentUser) -> Json<UserResponse> {
    Json(current.0.into())
}

// ── GET /utilisateurs/{id} ───────────────────────────────────────────────────

pub async fn get_user(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    current.require_admin()?;
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PATCH /utilisateurs/{id} ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub active: Option<bool>,
}

pub async fn update_user(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    current.require_admin()?;
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            id,
            UpdateUserInput {
                name: body.name,
                address: body.address,
                phone: body.phone,
                email: body.email,
                password: body.password,
                role: body.role,
                active: body.active,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── DELETE /utilisateurs/{id} ────────────────────────────────────────────────

pub async fn delete_user(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    current.require_admin()?;
    let usecase = DeactivateUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /utilisateurs/{id}/commandes ─────────────────────────────────────────

pub async fn list_user_orders(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let usecase = ListUserOrdersUseCase {
        orders: state.order_repo(),
        users: state.user_repo(),
    };
    let orders = usecase.execute(&current.actor(), id).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}
