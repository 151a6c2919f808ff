use std::sync::{Arc, Mutex, OnceLock};

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use restau_api::domain::repository::{
    CategoryRepository, OrderLineRepository, OrderRepository, ProductRepository, UserRepository,
};
use restau_api::domain::types::{
    Category, CategoryChanges, NewCategory, NewOrder, NewProduct, NewUser, Order, OrderChanges,
    OrderFilter, OrderLine, OrderLineFilter, PricedLine, Product, ProductChanges, ProductFilter,
    User, UserChanges,
};
use restau_api::error::ApiError;
use restau_auth_types::password::hash_password;
use restau_domain::money::{adjust_total, sum_line_totals};
use restau_domain::order::OrderStatus;
use restau_domain::user::UserRole;

pub use restau_testing::auth::TEST_JWT_SECRET;

pub const TEST_PASSWORD: &str = "correct-horse";

/// Argon2 is slow in debug builds; hash the shared password once.
pub fn test_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).unwrap())
        .clone()
}

// ── MemoryStore ──────────────────────────────────────────────────────────────

/// Rows shared by every mock repository built from the same [`MemoryStore`],
/// so a line mutation is visible on its order the way it is in Postgres.
#[derive(Default)]
pub struct Tables {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub users: Vec<User>,
    pub orders: Vec<Order>,
    pub lines: Vec<OrderLine>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    pub tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> MockCategoryRepo {
        MockCategoryRepo {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn products(&self) -> MockProductRepo {
        MockProductRepo {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn users(&self) -> MockUserRepo {
        MockUserRepo {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn orders(&self) -> MockOrderRepo {
        MockOrderRepo {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn lines(&self) -> MockOrderLineRepo {
        MockOrderLineRepo {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn add_category(&self, name: &str) -> Category {
        let mut t = self.tables.lock().unwrap();
        let category = Category {
            id: t.next_id(),
            name: name.to_owned(),
            description: None,
        };
        t.categories.push(category.clone());
        category
    }

    /// `price` in cents.
    pub fn add_product(&self, name: &str, category_id: i32, price: i64) -> Product {
        let mut t = self.tables.lock().unwrap();
        let product = Product {
            id: t.next_id(),
            name: name.to_owned(),
            description: None,
            price: Decimal::new(price, 2),
            stock: 10,
            category_id,
        };
        t.products.push(product.clone());
        product
    }

    pub fn add_user(&self, email: &str, role: UserRole) -> User {
        let mut t = self.tables.lock().unwrap();
        let user = User {
            id: t.next_id(),
            name: "Test User".to_owned(),
            address: "1 rue de la Paix".to_owned(),
            phone: "0600000000".to_owned(),
            email: email.to_owned(),
            password_hash: test_password_hash(),
            role,
            active: true,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        };
        t.users.push(user.clone());
        user
    }

    pub fn add_order(&self, user_id: i32) -> Order {
        let mut t = self.tables.lock().unwrap();
        let order = Order {
            id: t.next_id(),
            user_id,
            ordered_at: Utc.with_ymd_and_hms(2025, 6, 1, 19, 30, 0).unwrap(),
            status: OrderStatus::Preparation,
            total: Decimal::ZERO,
        };
        t.orders.push(order.clone());
        order
    }

    pub fn order(&self, id: i32) -> Order {
        let t = self.tables.lock().unwrap();
        t.orders.iter().find(|o| o.id == id).cloned().unwrap()
    }

    /// Sum of the stored line totals of `order_id`.
    pub fn line_sum(&self, order_id: i32) -> Decimal {
        let t = self.tables.lock().unwrap();
        sum_line_totals(
            t.lines
                .iter()
                .filter(|l| l.order_id == order_id)
                .map(|l| l.line_total),
        )
        .unwrap()
    }

    /// Overwrite the stored total, simulating a column that drifted.
    pub fn set_total(&self, order_id: i32, total: Decimal) {
        let mut t = self.tables.lock().unwrap();
        if let Some(o) = t.orders.iter_mut().find(|o| o.id == order_id) {
            o.total = total;
        }
    }
}

// ── MockCategoryRepo ─────────────────────────────────────────────────────────

pub struct MockCategoryRepo {
    tables: Arc<Mutex<Tables>>,
}

impl CategoryRepository for MockCategoryRepo {
    async fn list(&self) -> Result<Vec<Category>, ApiError> {
        Ok(self.tables.lock().unwrap().categories.clone())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn create(&self, category: &NewCategory) -> Result<Category, ApiError> {
        let mut t = self.tables.lock().unwrap();
        // unique index on categories.name
        if t.categories.iter().any(|c| c.name == category.name) {
            return Err(ApiError::CategoryAlreadyExists);
        }
        let created = Category {
            id: t.next_id(),
            name: category.name.clone(),
            description: category.description.clone(),
        };
        t.categories.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let Some(c) = t.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(ref name) = changes.name {
            c.name = name.clone();
        }
        if let Some(ref description) = changes.description {
            c.description = Some(description.clone());
        }
        Ok(Some(c.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.categories.len();
        t.categories.retain(|c| c.id != id);
        Ok(t.categories.len() < before)
    }

    async fn count_products(&self, id: i32) -> Result<u64, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.products.iter().filter(|p| p.category_id == id).count() as u64)
    }
}

// ── MockProductRepo ──────────────────────────────────────────────────────────

pub struct MockProductRepo {
    tables: Arc<Mutex<Tables>>,
}

impl ProductRepository for MockProductRepo {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.products.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let created = Product {
            id: t.next_id(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            category_id: product.category_id,
        };
        t.products.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let Some(p) = t.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(ref name) = changes.name {
            p.name = name.clone();
        }
        if let Some(ref description) = changes.description {
            p.description = Some(description.clone());
        }
        if let Some(price) = changes.price {
            p.price = price;
        }
        if let Some(stock) = changes.stock {
            p.stock = stock;
        }
        if let Some(category_id) = changes.category_id {
            p.category_id = category_id;
        }
        Ok(Some(p.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.products.len();
        t.products.retain(|p| p.id != id);
        Ok(t.products.len() < before)
    }

    async fn count_order_lines(&self, id: i32) -> Result<u64, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.lines.iter().filter(|l| l.product_id == id).count() as u64)
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    tables: Arc<Mutex<Tables>>,
}

impl UserRepository for MockUserRepo {
    async fn list(&self, include_inactive: bool) -> Result<Vec<User>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users
            .iter()
            .filter(|u| include_inactive || u.active)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let mut t = self.tables.lock().unwrap();
        // unique index on users.email
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(ApiError::EmailAlreadyExists);
        }
        let created = User {
            id: t.next_id(),
            name: user.name.clone(),
            address: user.address.clone(),
            phone: user.phone.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            active: true,
            created_at: Utc::now(),
        };
        t.users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let Some(u) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(ref name) = changes.name {
            u.name = name.clone();
        }
        if let Some(ref address) = changes.address {
            u.address = address.clone();
        }
        if let Some(ref phone) = changes.phone {
            u.phone = phone.clone();
        }
        if let Some(ref email) = changes.email {
            u.email = email.clone();
        }
        if let Some(ref hash) = changes.password_hash {
            u.password_hash = hash.clone();
        }
        if let Some(role) = changes.role {
            u.role = role;
        }
        if let Some(active) = changes.active {
            u.active = active;
        }
        Ok(Some(u.clone()))
    }
}

// ── Stale lookups ────────────────────────────────────────────────────────────

/// Wraps a repository whose lookups by unique key miss a row inserted by a
/// concurrent request, so only the storage constraint catches the duplicate.
pub struct StaleLookup<R>(pub R);

impl UserRepository for StaleLookup<MockUserRepo> {
    async fn list(&self, include_inactive: bool) -> Result<Vec<User>, ApiError> {
        self.0.list(include_inactive).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        self.0.find_by_id(id).await
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, ApiError> {
        Ok(None)
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        self.0.create(user).await
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, ApiError> {
        self.0.update(id, changes).await
    }
}

impl CategoryRepository for StaleLookup<MockCategoryRepo> {
    async fn list(&self) -> Result<Vec<Category>, ApiError> {
        self.0.list().await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, ApiError> {
        self.0.find_by_id(id).await
    }

    async fn find_by_name(&self, _name: &str) -> Result<Option<Category>, ApiError> {
        Ok(None)
    }

    async fn create(&self, category: &NewCategory) -> Result<Category, ApiError> {
        self.0.create(category).await
    }

    async fn update(
        &self,
        id: i32,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>, ApiError> {
        self.0.update(id, changes).await
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        self.0.delete(id).await
    }

    async fn count_products(&self, id: i32) -> Result<u64, ApiError> {
        self.0.count_products(id).await
    }
}

// ── MockOrderRepo ────────────────────────────────────────────────────────────

pub struct MockOrderRepo {
    tables: Arc<Mutex<Tables>>,
}

impl OrderRepository for MockOrderRepo {
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn lines(&self, order_id: i32) -> Result<Vec<OrderLine>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.lines
            .iter()
            .filter(|l| l.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        order: &NewOrder,
        lines: &[PricedLine],
    ) -> Result<(Order, Vec<OrderLine>), ApiError> {
        let mut t = self.tables.lock().unwrap();
        let created = Order {
            id: t.next_id(),
            user_id: order.user_id,
            ordered_at: order.ordered_at,
            status: order.status,
            total: sum_line_totals(lines.iter().map(|l| l.line_total))?,
        };
        let mut inserted = Vec::with_capacity(lines.len());
        for line in lines {
            let row = OrderLine {
                id: t.next_id(),
                order_id: created.id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_total: line.line_total,
            };
            t.lines.push(row.clone());
            inserted.push(row);
        }
        t.orders.push(created.clone());
        Ok((created, inserted))
    }

    async fn update(&self, id: i32, changes: &OrderChanges) -> Result<Option<Order>, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let total = sum_line_totals(
            t.lines
                .iter()
                .filter(|l| l.order_id == id)
                .map(|l| l.line_total),
        )?;
        let Some(o) = t.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        if let Some(user_id) = changes.user_id {
            o.user_id = user_id;
        }
        if let Some(status) = changes.status {
            o.status = status;
        }
        if let Some(ordered_at) = changes.ordered_at {
            o.ordered_at = ordered_at;
        }
        o.total = total;
        Ok(Some(o.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.orders.len();
        t.orders.retain(|o| o.id != id);
        t.lines.retain(|l| l.order_id != id);
        Ok(t.orders.len() < before)
    }
}

// ── MockOrderLineRepo ────────────────────────────────────────────────────────

pub struct MockOrderLineRepo {
    tables: Arc<Mutex<Tables>>,
}

fn shift_total(
    t: &mut Tables,
    order_id: i32,
    old_line: Decimal,
    new_line: Decimal,
) -> Result<(), ApiError> {
    if let Some(o) = t.orders.iter_mut().find(|o| o.id == order_id) {
        o.total = adjust_total(o.total, old_line, new_line)?;
    }
    Ok(())
}

impl OrderLineRepository for MockOrderLineRepo {
    async fn list(&self, filter: &OrderLineFilter) -> Result<Vec<OrderLine>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.lines
            .iter()
            .filter(|l| filter.order_id.is_none_or(|o| l.order_id == o))
            .filter(|l| {
                filter.owner_id.is_none_or(|owner| {
                    t.orders
                        .iter()
                        .any(|o| o.id == l.order_id && o.user_id == owner)
                })
            })
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<OrderLine>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.lines.iter().find(|l| l.id == id).cloned())
    }

    async fn insert(
        &self,
        order_id: i32,
        line: &PricedLine,
    ) -> Result<Option<OrderLine>, ApiError> {
        let mut t = self.tables.lock().unwrap();
        if !t.orders.iter().any(|o| o.id == order_id) {
            return Ok(None);
        }
        shift_total(&mut t, order_id, Decimal::ZERO, line.line_total)?;
        let row = OrderLine {
            id: t.next_id(),
            order_id,
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total,
        };
        t.lines.push(row.clone());
        Ok(Some(row))
    }

    async fn update(&self, id: i32, line: &PricedLine) -> Result<Option<OrderLine>, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let Some(row) = t.lines.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        let old_total = row.line_total;
        row.product_id = line.product_id;
        row.quantity = line.quantity;
        row.unit_price = line.unit_price;
        row.line_total = line.line_total;
        let updated = row.clone();
        shift_total(&mut t, updated.order_id, old_total, updated.line_total)?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<Option<OrderLine>, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let Some(pos) = t.lines.iter().position(|l| l.id == id) else {
            return Ok(None);
        };
        let removed = t.lines.remove(pos);
        shift_total(&mut t, removed.order_id, removed.line_total, Decimal::ZERO)?;
        Ok(Some(removed))
    }
}
