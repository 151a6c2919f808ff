#![allow(async_fn_in_trait)]

use crate::domain::types::{
    Category, CategoryChanges, NewCategory, NewOrder, NewProduct, NewUser, Order, OrderChanges,
    OrderFilter, OrderLine, OrderLineFilter, PricedLine, Product, ProductChanges, ProductFilter,
    User, UserChanges,
};
use crate::error::ApiError;

/// Repository for menu categories.
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, ApiError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, ApiError>;
    async fn create(&self, category: &NewCategory) -> Result<Category, ApiError>;
    /// Apply changes. Returns `None` if the category does not exist.
    async fn update(
        &self,
        id: i32,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>, ApiError>;
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
    async fn count_products(&self, id: i32) -> Result<u64, ApiError>;
}

/// Repository for menu products.
pub trait ProductRepository: Send + Sync {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ApiError>;
    async fn create(&self, product: &NewProduct) -> Result<Product, ApiError>;
    /// Apply changes. Returns `None` if the product does not exist.
    async fn update(
        &self,
        id: i32,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, ApiError>;
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
    async fn count_order_lines(&self, id: i32) -> Result<u64, ApiError>;
}

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn list(&self, include_inactive: bool) -> Result<Vec<User>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError>;
    /// Looks up active and inactive accounts alike.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn create(&self, user: &NewUser) -> Result<User, ApiError>;
    /// Apply changes. Returns `None` if the user does not exist.
    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, ApiError>;
}

/// Repository for orders.
///
/// Every write keeps `orders.total` equal to the sum of the order's line
/// totals within the same transaction.
pub trait OrderRepository: Send + Sync {
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, ApiError>;
    async fn lines(&self, order_id: i32) -> Result<Vec<OrderLine>, ApiError>;
    /// Insert the order and its initial lines; the stored total is their sum.
    async fn create(
        &self,
        order: &NewOrder,
        lines: &[PricedLine],
    ) -> Result<(Order, Vec<OrderLine>), ApiError>;
    /// Apply changes, then recompute the total from the current lines.
    /// Returns `None` if the order does not exist.
    async fn update(&self, id: i32, changes: &OrderChanges) -> Result<Option<Order>, ApiError>;
    /// Delete the order and, by cascade, its lines. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Repository for order lines.
///
/// Each mutation adjusts the owning order's total by the line delta in the
/// same transaction, with the order row locked.
pub trait OrderLineRepository: Send + Sync {
    async fn list(&self, filter: &OrderLineFilter) -> Result<Vec<OrderLine>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<OrderLine>, ApiError>;
    /// Returns `None` if the order does not exist.
    async fn insert(
        &self,
        order_id: i32,
        line: &PricedLine,
    ) -> Result<Option<OrderLine>, ApiError>;
    /// Replace the line's values. Returns `None` if the line does not exist.
    async fn update(&self, id: i32, line: &PricedLine) -> Result<Option<OrderLine>, ApiError>;
    /// Returns the deleted line, or `None` if it did not exist.
    async fn delete(&self, id: i32) -> Result<Option<OrderLine>, ApiError>;
}
