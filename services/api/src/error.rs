use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use restau_auth_types::token::AuthError;
use restau_core::error::{AppError, error_response};
use restau_domain::money::AmountError;

/// API service error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("category not found")]
    CategoryNotFound,
    #[error("product not found")]
    ProductNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("order not found")]
    OrderNotFound,
    #[error("order line not found")]
    OrderLineNotFound,
    #[error("email already registered")]
    EmailAlreadyExists,
    #[error("category already exists")]
    CategoryAlreadyExists,
    #[error("category still has products")]
    CategoryInUse,
    #[error("product is used by order lines")]
    ProductInUse,
    #[error("{0}")]
    Validation(String),
    #[error("missing data")]
    MissingData,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("forbidden")]
    Forbidden,
    #[error(transparent)]
    App(AppError),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::OrderLineNotFound => "ORDER_LINE_NOT_FOUND",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::CategoryAlreadyExists => "CATEGORY_ALREADY_EXISTS",
            Self::CategoryInUse => "CATEGORY_IN_USE",
            Self::ProductInUse => "PRODUCT_IN_USE",
            Self::Validation(_) => "INVALID_INPUT",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Forbidden => "FORBIDDEN",
            Self::App(e) => e.kind(),
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::CategoryNotFound
            | Self::ProductNotFound
            | Self::UserNotFound
            | Self::OrderNotFound
            | Self::OrderLineNotFound => StatusCode::NOT_FOUND,
            Self::EmailAlreadyExists | Self::Validation(_) | Self::MissingData => {
                StatusCode::BAD_REQUEST
            }
            Self::CategoryAlreadyExists | Self::CategoryInUse | Self::ProductInUse => {
                StatusCode::CONFLICT
            }
            Self::InvalidCredentials | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::App(e) => e.status(),
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Internal(inner) => Self::Internal(inner),
            other => Self::App(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Signing(inner) => Self::Internal(anyhow::Error::new(inner)),
            _ => Self::InvalidToken,
        }
    }
}

impl From<AmountError> for ApiError {
    fn from(e: AmountError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), self.to_string())
    }
}
