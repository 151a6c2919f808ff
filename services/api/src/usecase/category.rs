use crate::domain::repository::CategoryRepository;
use crate::domain::types::{Category, CategoryChanges, NewCategory};
use crate::error::ApiError;

fn normalize_name(name: &str) -> Result<String, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("category name cannot be empty".into()));
    }
    Ok(name.to_owned())
}

// ── ListCategories ───────────────────────────────────────────────────────────

pub struct ListCategoriesUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> ListCategoriesUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Category>, ApiError> {
        self.repo.list().await
    }
}

// ── GetCategory ──────────────────────────────────────────────────────────────

pub struct GetCategoryUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> GetCategoryUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Category, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::CategoryNotFound)
    }
}

// ── CreateCategory ───────────────────────────────────────────────────────────

pub struct CreateCategoryUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> CreateCategoryUseCase<R> {
    pub async fn execute(&self, input: NewCategory) -> Result<Category, ApiError> {
        let name = normalize_name(&input.name)?;
        if self.repo.find_by_name(&name).await?.is_some() {
            return Err(ApiError::CategoryAlreadyExists);
        }
        self.repo
            .create(&NewCategory {
                name,
                description: input.description,
            })
            .await
    }
}

// ── UpdateCategory ───────────────────────────────────────────────────────────

pub struct UpdateCategoryUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> UpdateCategoryUseCase<R> {
    pub async fn execute(&self, id: i32, changes: CategoryChanges) -> Result<Category, ApiError> {
        if changes.is_empty() {
            return Err(ApiError::MissingData);
        }
        let name = changes.name.as_deref().map(normalize_name).transpose()?;
        if let Some(ref name) = name {
            if let Some(existing) = self.repo.find_by_name(name).await? {
                if existing.id != id {
                    return Err(ApiError::CategoryAlreadyExists);
                }
            }
        }
        self.repo
            .update(
                id,
                &CategoryChanges {
                    name,
                    description: changes.description,
                },
            )
            .await?
            .ok_or(ApiError::CategoryNotFound)
    }
}

// ── DeleteCategory ───────────────────────────────────────────────────────────

pub struct DeleteCategoryUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> DeleteCategoryUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<(), ApiError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(ApiError::CategoryNotFound);
        }
        if self.repo.count_products(id).await? > 0 {
            return Err(ApiError::CategoryInUse);
        }
        if !self.repo.delete(id).await? {
            return Err(ApiError::CategoryNotFound);
        }
        Ok(())
    }
}
