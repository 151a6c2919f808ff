use restau_domain::money::{check_price, check_stock};

use crate::domain::repository::{CategoryRepository, ProductRepository};
use crate::domain::types::{NewProduct, Product, ProductChanges, ProductFilter};
use crate::error::ApiError;

fn check_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("product name cannot be empty".into()));
    }
    Ok(())
}

// ── ListProducts ─────────────────────────────────────────────────────────────

pub struct ListProductsUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> ListProductsUseCase<R> {
    pub async fn execute(&self, filter: ProductFilter) -> Result<Vec<Product>, ApiError> {
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
            if min > max {
                return Err(ApiError::Validation(
                    "min_price cannot exceed max_price".into(),
                ));
            }
        }
        self.repo.list(&filter).await
    }
}

// ── GetProduct ───────────────────────────────────────────────────────────────

pub struct GetProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> GetProductUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Product, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::ProductNotFound)
    }
}

// ── CreateProduct ────────────────────────────────────────────────────────────

pub struct CreateProductUseCase<P: ProductRepository, C: CategoryRepository> {
    pub products: P,
    pub categories: C,
}

impl<P: ProductRepository, C: CategoryRepository> CreateProductUseCase<P, C> {
    pub async fn execute(&self, input: NewProduct) -> Result<Product, ApiError> {
        check_name(&input.name)?;
        check_price(input.price)?;
        check_stock(input.stock)?;
        if self
            .categories
            .find_by_id(input.category_id)
            .await?
            .is_none()
        {
            return Err(ApiError::CategoryNotFound);
        }
        self.products.create(&input).await
    }
}

// ── UpdateProduct ────────────────────────────────────────────────────────────

pub struct UpdateProductUseCase<P: ProductRepository, C: CategoryRepository> {
    pub products: P,
    pub categories: C,
}

impl<P: ProductRepository, C: CategoryRepository> UpdateProductUseCase<P, C> {
    pub async fn execute(&self, id: i32, changes: ProductChanges) -> Result<Product, ApiError> {
        if changes.is_empty() {
            return Err(ApiError::MissingData);
        }
        if let Some(ref name) = changes.name {
            check_name(name)?;
        }
        if let Some(price) = changes.price {
            check_price(price)?;
        }
        if let Some(stock) = changes.stock {
            check_stock(stock)?;
        }
        if let Some(category_id) = changes.category_id {
            if self.categories.find_by_id(category_id).await?.is_none() {
                return Err(ApiError::CategoryNotFound);
            }
        }
        self.products
            .update(id, &changes)
            .await?
            .ok_or(ApiError::ProductNotFound)
    }
}

// ── DeleteProduct ────────────────────────────────────────────────────────────

pub struct DeleteProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> DeleteProductUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<(), ApiError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(ApiError::ProductNotFound);
        }
        if self.repo.count_order_lines(id).await? > 0 {
            return Err(ApiError::ProductInUse);
        }
        if !self.repo.delete(id).await? {
            return Err(ApiError::ProductNotFound);
        }
        Ok(())
    }
}
