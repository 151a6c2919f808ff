use std::sync::Arc;

use sea_orm::DatabaseConnection;

use restau_auth_types::token::TokenTtl;

use crate::infra::db::{
    DbCategoryRepository, DbOrderLineRepository, DbOrderRepository, DbProductRepository,
    DbUserRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub jwt_secret: String,
    pub token_ttl: TokenTtl,
}

impl AppState {
    pub fn category_repo(&self) -> DbCategoryRepository {
        DbCategoryRepository {
            db: self.db.clone(),
        }
    }

    pub fn product_repo(&self) -> DbProductRepository {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn order_line_repo(&self) -> DbOrderLineRepository {
        DbOrderLineRepository {
            db: self.db.clone(),
        }
    }
}
