use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use restau_domain::order::OrderStatus;
use restau_domain::user::UserRole;

// ── Category ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

// ── Product ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub category_id: Option<i32>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.category_id.is_none()
    }
}

/// Product search. Every field narrows the result; all `None` lists everything.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub id: Option<i32>,
    pub category_id: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_stock: Option<i32>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        self.id.is_none_or(|id| product.id == id)
            && self.category_id.is_none_or(|c| product.category_id == c)
            && self.min_price.is_none_or(|p| product.price >= p)
            && self.max_price.is_none_or(|p| product.price <= p)
            && self.min_stock.is_none_or(|s| product.stock >= s)
    }
}

// ── User ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.id,
            role: self.role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Field changes for a user. `password_hash` is already hashed.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub active: Option<bool>,
}

/// Minimal shape check: one `@` with a non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !email.chars().any(char::is_whitespace)
}

/// Caller identity resolved from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub role: UserRole,
}

impl Actor {
    /// Staff see every order; clients only their own.
    pub fn can_access(&self, owner_id: i32) -> bool {
        self.role.is_staff() || self.user_id == owner_id
    }
}

// ── Order ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub ordered_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub total: Decimal,
}

#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i32,
    pub status: OrderStatus,
    pub ordered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub user_id: Option<i32>,
    pub status: Option<OrderStatus>,
    pub ordered_at: Option<DateTime<Utc>>,
}

impl OrderChanges {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.status.is_none() && self.ordered_at.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub user_id: Option<i32>,
    pub status: Option<OrderStatus>,
    /// Calendar day (UTC) of `ordered_at`.
    pub date: Option<NaiveDate>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.user_id.is_none_or(|u| order.user_id == u)
            && self.status.is_none_or(|s| order.status == s)
            && self.date.is_none_or(|d| order.ordered_at.date_naive() == d)
    }
}

/// Total recomputed from the lines, independent of the stored column.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotal {
    pub order_id: i32,
    pub total: Decimal,
    pub line_count: usize,
}

// ── Order line ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Line values validated and priced, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct OrderLineFilter {
    pub order_id: Option<i32>,
    /// Only lines of orders owned by this user.
    pub owner_id: Option<i32>,
}
