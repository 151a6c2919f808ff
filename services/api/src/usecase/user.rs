use anyhow::Context as _;

use restau_auth_types::password::hash_password;
use restau_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::{NewUser, User, UserChanges, validate_email};
use crate::error::ApiError;

fn check_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::Validation("password cannot be empty".into()));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ApiError> {
    if !validate_email(email) {
        return Err(ApiError::Validation(format!("invalid email: {email}")));
    }
    Ok(())
}

pub struct CreateUserInput {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Validate, check email uniqueness, hash the password and insert.
pub(crate) async fn create_account<R: UserRepository>(
    repo: &R,
    input: CreateUserInput,
) -> Result<User, ApiError> {
    let email = input.email.trim().to_lowercase();
    check_email(&email)?;
    check_password(&input.password)?;
    if repo.find_by_email(&email).await?.is_some() {
        return Err(ApiError::EmailAlreadyExists);
    }
    let password_hash = hash_password(&input.password).context("hash password")?;
    let user = repo
        .create(&NewUser {
            name: input.name,
            address: input.address,
            phone: input.phone,
            email,
            password_hash,
            role: input.role,
        })
        .await?;
    tracing::info!(user_id = user.id, role = %user.role, "user created");
    Ok(user)
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, include_inactive: bool) -> Result<Vec<User>, ApiError> {
        self.repo.list(include_inactive).await
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<User, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, ApiError> {
        create_account(&self.repo, input).await
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub active: Option<bool>,
}

impl UpdateUserInput {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.role.is_none()
            && self.active.is_none()
    }
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(&self, id: i32, input: UpdateUserInput) -> Result<User, ApiError> {
        if input.is_empty() {
            return Err(ApiError::MissingData);
        }
        let email = input.email.map(|e| e.trim().to_lowercase());
        if let Some(ref email) = email {
            check_email(email)?;
            if let Some(existing) = self.repo.find_by_email(email).await? {
                if existing.id != id {
                    return Err(ApiError::EmailAlreadyExists);
                }
            }
        }
        let password_hash = match input.password {
            Some(ref password) => {
                check_password(password)?;
                Some(hash_password(password).context("hash password")?)
            }
            None => None,
        };
        let changes = UserChanges {
            name: input.name,
            address: input.address,
            phone: input.phone,
            email,
            password_hash,
            role: input.role,
            active: input.active,
        };
        self.repo
            .update(id, &changes)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── DeactivateUser ───────────────────────────────────────────────────────────

/// Soft delete: the account stays but can no longer log in.
pub struct DeactivateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeactivateUserUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<(), ApiError> {
        let changes = UserChanges {
            active: Some(false),
            ..Default::default()
        };
        self.repo
            .update(id, &changes)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        tracing::info!(user_id = id, "user deactivated");
        Ok(())
    }
}
