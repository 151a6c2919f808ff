//! Authenticated caller extractor and role guards.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use restau_auth_types::bearer::BearerToken;

use crate::domain::types::{Actor, User};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::auth::ResolveCurrentUserUseCase;

/// Active account behind the request's bearer access token.
///
/// 401 for a missing, expired or tampered token; 404 when the token's
/// subject no longer maps to an active user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        self.0.actor()
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if !self.0.role.is_admin() {
            return Err(ApiError::Forbidden);
        }
        Ok(())
    }

    /// Admins and employees.
    pub fn require_staff(&self) -> Result<(), ApiError> {
        if !self.0.role.is_staff() {
            return Err(ApiError::Forbidden);
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = BearerToken::from_headers(&parts.headers);
        let state = state.clone();

        async move {
            let token = token?;
            let usecase = ResolveCurrentUserUseCase {
                repo: state.user_repo(),
                jwt_secret: state.jwt_secret.clone(),
            };
            let user = usecase.execute(token.as_str()).await?;
            Ok(CurrentUser(user))
        }
    }
}
