use std::sync::Arc;

use anyhow::Context as _;
use chrono::{NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel as _, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, SqlErr, TransactionError, TransactionTrait,
};

use restau_api_schema::{categories, order_lines, orders, products, users};
use restau_domain::money::{AmountError, adjust_total, sum_line_totals};
use restau_domain::order::OrderStatus;
use restau_domain::user::UserRole;

use crate::domain::repository::{
    CategoryRepository, OrderLineRepository, OrderRepository, ProductRepository, UserRepository,
};
use crate::domain::types::{
    Category, CategoryChanges, NewCategory, NewOrder, NewProduct, NewUser, Order, OrderChanges,
    OrderFilter, OrderLine, OrderLineFilter, PricedLine, Product, ProductChanges, ProductFilter,
    User, UserChanges,
};
use crate::error::ApiError;

/// Unique-index violations become `conflict`; anything else is internal.
fn unique_or_internal(err: DbErr, conflict: ApiError, action: &'static str) -> ApiError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return conflict;
    }
    ApiError::Internal(anyhow::Error::new(err).context(action))
}

/// Failure inside a write transaction that recomputes an order total.
#[derive(Debug, thiserror::Error)]
enum TotalTxnError {
    #[error(transparent)]
    Db(#[from] DbErr),
    #[error(transparent)]
    Amount(#[from] AmountError),
}

fn total_txn_failure(err: TransactionError<TotalTxnError>, action: &'static str) -> ApiError {
    match err {
        TransactionError::Transaction(TotalTxnError::Amount(e)) => e.into(),
        other => ApiError::Internal(anyhow::Error::new(other).context(action)),
    }
}

// ── Category repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCategoryRepository {
    pub db: Arc<DatabaseConnection>,
}

impl CategoryRepository for DbCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, ApiError> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Id)
            .all(self.db.as_ref())
            .await
            .context("list categories")?;
        Ok(models.into_iter().map(category_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, ApiError> {
        let model = categories::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find category by id")?;
        Ok(model.map(category_from_model))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, ApiError> {
        let model = categories::Entity::find()
            .filter(categories::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .context("find category by name")?;
        Ok(model.map(category_from_model))
    }

    async fn create(&self, category: &NewCategory) -> Result<Category, ApiError> {
        let model = categories::ActiveModel {
            name: Set(category.name.clone()),
            description: Set(category.description.clone()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| {
            unique_or_internal(e, ApiError::CategoryAlreadyExists, "create category")
        })?;
        Ok(category_from_model(model))
    }

    async fn update(
        &self,
        id: i32,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>, ApiError> {
        let Some(model) = categories::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find category for update")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        if let Some(ref name) = changes.name {
            am.name = Set(name.clone());
        }
        if let Some(ref description) = changes.description {
            am.description = Set(Some(description.clone()));
        }
        let model = am
            .update(self.db.as_ref())
            .await
            .map_err(|e| {
                unique_or_internal(e, ApiError::CategoryAlreadyExists, "update category")
            })?;
        Ok(Some(category_from_model(model)))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = categories::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .context("delete category")?;
        Ok(result.rows_affected > 0)
    }

    async fn count_products(&self, id: i32) -> Result<u64, ApiError> {
        let count = products::Entity::find()
            .filter(products::Column::CategoryId.eq(id))
            .count(self.db.as_ref())
            .await
            .context("count products in category")?;
        Ok(count)
    }
}

fn category_from_model(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
        description: model.description,
    }
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: Arc<DatabaseConnection>,
}

impl ProductRepository for DbProductRepository {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, ApiError> {
        let mut query = products::Entity::find();
        if let Some(id) = filter.id {
            query = query.filter(products::Column::Id.eq(id));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(products::Column::CategoryId.eq(category_id));
        }
        if let Some(min_price) = filter.min_price {
            query = query.filter(products::Column::Price.gte(min_price));
        }
        if let Some(max_price) = filter.max_price {
            query = query.filter(products::Column::Price.lte(max_price));
        }
        if let Some(min_stock) = filter.min_stock {
            query = query.filter(products::Column::Stock.gte(min_stock));
        }
        let models = query
            .order_by_asc(products::Column::Id)
            .all(self.db.as_ref())
            .await
            .context("list products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ApiError> {
        let model = products::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find product by id")?;
        Ok(model.map(product_from_model))
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let model = products::ActiveModel {
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            price: Set(product.price),
            stock: Set(product.stock),
            category_id: Set(product.category_id),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .context("create product")?;
        Ok(product_from_model(model))
    }

    async fn update(
        &self,
        id: i32,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, ApiError> {
        let Some(model) = products::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find product for update")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        if let Some(ref name) = changes.name {
            am.name = Set(name.clone());
        }
        if let Some(ref description) = changes.description {
            am.description = Set(Some(description.clone()));
        }
        if let Some(price) = changes.price {
            am.price = Set(price);
        }
        if let Some(stock) = changes.stock {
            am.stock = Set(stock);
        }
        if let Some(category_id) = changes.category_id {
            am.category_id = Set(category_id);
        }
        let model = am.update(self.db.as_ref()).await.context("update product")?;
        Ok(Some(product_from_model(model)))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = products::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .context("delete product")?;
        Ok(result.rows_affected > 0)
    }

    async fn count_order_lines(&self, id: i32) -> Result<u64, ApiError> {
        let count = order_lines::Entity::find()
            .filter(order_lines::Column::ProductId.eq(id))
            .count(self.db.as_ref())
            .await
            .context("count order lines for product")?;
        Ok(count)
    }
}

fn product_from_model(model: products::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        stock: model.stock,
        category_id: model.category_id,
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: Arc<DatabaseConnection>,
}

impl UserRepository for DbUserRepository {
    async fn list(&self, include_inactive: bool) -> Result<Vec<User>, ApiError> {
        let mut query = users::Entity::find();
        if !include_inactive {
            query = query.filter(users::Column::Active.eq(true));
        }
        let models = query
            .order_by_asc(users::Column::Id)
            .all(self.db.as_ref())
            .await
            .context("list users")?;
        let users = models
            .into_iter()
            .map(user_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(users)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let model = users::ActiveModel {
            name: Set(user.name.clone()),
            address: Set(user.address.clone()),
            phone: Set(user.phone.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_owned()),
            active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| {
            unique_or_internal(e, ApiError::EmailAlreadyExists, "create user")
        })?;
        Ok(user_from_model(model)?)
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, ApiError> {
        let Some(model) = users::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find user for update")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        if let Some(ref name) = changes.name {
            am.name = Set(name.clone());
        }
        if let Some(ref address) = changes.address {
            am.address = Set(address.clone());
        }
        if let Some(ref phone) = changes.phone {
            am.phone = Set(phone.clone());
        }
        if let Some(ref email) = changes.email {
            am.email = Set(email.clone());
        }
        if let Some(ref password_hash) = changes.password_hash {
            am.password_hash = Set(password_hash.clone());
        }
        if let Some(role) = changes.role {
            am.role = Set(role.as_str().to_owned());
        }
        if let Some(active) = changes.active {
            am.active = Set(active);
        }
        let model = am
            .update(self.db.as_ref())
            .await
            .map_err(|e| {
                unique_or_internal(e, ApiError::EmailAlreadyExists, "update user")
            })?;
        Ok(Some(user_from_model(model)?))
    }
}

fn user_from_model(model: users::Model) -> anyhow::Result<User> {
    let role = model
        .role
        .parse::<UserRole>()
        .with_context(|| format!("user {} has an unknown role", model.id))?;
    Ok(User {
        id: model.id,
        name: model.name,
        address: model.address,
        phone: model.phone,
        email: model.email,
        password_hash: model.password_hash,
        role,
        active: model.active,
        created_at: model.created_at,
    })
}

// ── Order repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: Arc<DatabaseConnection>,
}

impl OrderRepository for DbOrderRepository {
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, ApiError> {
        let mut query = orders::Entity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(orders::Column::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(orders::Column::Status.eq(status.as_str()));
        }
        if let Some(date) = filter.date {
            let start = date.and_time(NaiveTime::MIN).and_utc();
            let end = start + chrono::Duration::days(1);
            query = query
                .filter(orders::Column::OrderedAt.gte(start))
                .filter(orders::Column::OrderedAt.lt(end));
        }
        let models = query
            .order_by_desc(orders::Column::OrderedAt)
            .order_by_desc(orders::Column::Id)
            .all(self.db.as_ref())
            .await
            .context("list orders")?;
        let orders = models
            .into_iter()
            .map(order_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(orders)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, ApiError> {
        let model = orders::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find order by id")?;
        Ok(model.map(order_from_model).transpose()?)
    }

    async fn lines(&self, order_id: i32) -> Result<Vec<OrderLine>, ApiError> {
        let models = order_lines::Entity::find()
            .filter(order_lines::Column::OrderId.eq(order_id))
            .order_by_asc(order_lines::Column::Id)
            .all(self.db.as_ref())
            .await
            .context("list order lines")?;
        Ok(models.into_iter().map(line_from_model).collect())
    }

    async fn create(
        &self,
        order: &NewOrder,
        lines: &[PricedLine],
    ) -> Result<(Order, Vec<OrderLine>), ApiError> {
        let order = order.clone();
        let lines = lines.to_vec();
        let (model, line_models) = self
            .db
            .transaction::<_, (orders::Model, Vec<order_lines::Model>), TotalTxnError>(|txn| {
                Box::pin(async move {
                    let total = sum_line_totals(lines.iter().map(|l| l.line_total))?;
                    let model = orders::ActiveModel {
                        user_id: Set(order.user_id),
                        ordered_at: Set(order.ordered_at),
                        status: Set(order.status.as_str().to_owned()),
                        total: Set(total),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    let mut inserted = Vec::with_capacity(lines.len());
                    for line in &lines {
                        let line_model = order_lines::ActiveModel {
                            order_id: Set(model.id),
                            product_id: Set(line.product_id),
                            quantity: Set(line.quantity),
                            unit_price: Set(line.unit_price),
                            line_total: Set(line.line_total),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await?;
                        inserted.push(line_model);
                    }
                    Ok((model, inserted))
                })
            })
            .await
            .map_err(|e| total_txn_failure(e, "create order with lines"))?;
        Ok((
            order_from_model(model)?,
            line_models.into_iter().map(line_from_model).collect(),
        ))
    }

    async fn update(&self, id: i32, changes: &OrderChanges) -> Result<Option<Order>, ApiError> {
        let changes = changes.clone();
        let model = self
            .db
            .transaction::<_, Option<orders::Model>, TotalTxnError>(|txn| {
                Box::pin(async move {
                    let Some(model) = orders::Entity::find_by_id(id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                    else {
                        return Ok(None);
                    };
                    let line_totals = order_lines::Entity::find()
                        .filter(order_lines::Column::OrderId.eq(id))
                        .all(txn)
                        .await?
                        .into_iter()
                        .map(|l| l.line_total);

                    let mut am = model.into_active_model();
                    if let Some(user_id) = changes.user_id {
                        am.user_id = Set(user_id);
                    }
                    if let Some(status) = changes.status {
                        am.status = Set(status.as_str().to_owned());
                    }
                    if let Some(ordered_at) = changes.ordered_at {
                        am.ordered_at = Set(ordered_at);
                    }
                    am.total = Set(sum_line_totals(line_totals)?);
                    Ok(Some(am.update(txn).await?))
                })
            })
            .await
            .map_err(|e| total_txn_failure(e, "update order"))?;
        Ok(model.map(order_from_model).transpose()?)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = orders::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .context("delete order")?;
        Ok(result.rows_affected > 0)
    }
}

fn order_from_model(model: orders::Model) -> anyhow::Result<Order> {
    let status = model
        .status
        .parse::<OrderStatus>()
        .with_context(|| format!("order {} has an unknown status", model.id))?;
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        ordered_at: model.ordered_at,
        status,
        total: model.total,
    })
}

// ── Order line repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderLineRepository {
    pub db: Arc<DatabaseConnection>,
}

/// Lock the order row a line belongs to, then re-read the line under that lock.
///
/// Every line writer locks the order first, so the returned line and order
/// total cannot change until the transaction ends.
async fn lock_line_and_order<C: sea_orm::ConnectionTrait>(
    txn: &C,
    line_id: i32,
) -> Result<Option<(order_lines::Model, orders::Model)>, DbErr> {
    let Some(line) = order_lines::Entity::find_by_id(line_id).one(txn).await? else {
        return Ok(None);
    };
    let Some(order) = orders::Entity::find_by_id(line.order_id)
        .lock_exclusive()
        .one(txn)
        .await?
    else {
        return Ok(None);
    };
    let line = order_lines::Entity::find_by_id(line_id).one(txn).await?;
    Ok(line.map(|line| (line, order)))
}

impl OrderLineRepository for DbOrderLineRepository {
    async fn list(&self, filter: &OrderLineFilter) -> Result<Vec<OrderLine>, ApiError> {
        let mut query = order_lines::Entity::find();
        if let Some(order_id) = filter.order_id {
            query = query.filter(order_lines::Column::OrderId.eq(order_id));
        }
        if let Some(owner_id) = filter.owner_id {
            query = query
                .join(JoinType::InnerJoin, order_lines::Relation::Order.def())
                .filter(orders::Column::UserId.eq(owner_id));
        }
        let models = query
            .order_by_asc(order_lines::Column::Id)
            .all(self.db.as_ref())
            .await
            .context("list order lines")?;
        Ok(models.into_iter().map(line_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<OrderLine>, ApiError> {
        let model = order_lines::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .context("find order line by id")?;
        Ok(model.map(line_from_model))
    }

    async fn insert(
        &self,
        order_id: i32,
        line: &PricedLine,
    ) -> Result<Option<OrderLine>, ApiError> {
        let line = line.clone();
        let model = self
            .db
            .transaction::<_, Option<order_lines::Model>, TotalTxnError>(|txn| {
                Box::pin(async move {
                    let Some(order) = orders::Entity::find_by_id(order_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                    else {
                        return Ok(None);
                    };
                    let inserted = order_lines::ActiveModel {
                        order_id: Set(order_id),
                        product_id: Set(line.product_id),
                        quantity: Set(line.quantity),
                        unit_price: Set(line.unit_price),
                        line_total: Set(line.line_total),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    let total = adjust_total(order.total, Decimal::ZERO, inserted.line_total)?;
                    let mut am = order.into_active_model();
                    am.total = Set(total);
                    am.update(txn).await?;
                    Ok(Some(inserted))
                })
            })
            .await
            .map_err(|e| total_txn_failure(e, "insert order line"))?;
        Ok(model.map(line_from_model))
    }

    async fn update(&self, id: i32, line: &PricedLine) -> Result<Option<OrderLine>, ApiError> {
        let line = line.clone();
        let model = self
            .db
            .transaction::<_, Option<order_lines::Model>, TotalTxnError>(|txn| {
                Box::pin(async move {
                    let Some((current, order)) = lock_line_and_order(txn, id).await? else {
                        return Ok(None);
                    };
                    let old_line_total = current.line_total;

                    let mut am = current.into_active_model();
                    am.product_id = Set(line.product_id);
                    am.quantity = Set(line.quantity);
                    am.unit_price = Set(line.unit_price);
                    am.line_total = Set(line.line_total);
                    let updated = am.update(txn).await?;

                    let total = adjust_total(order.total, old_line_total, updated.line_total)?;
                    let mut am = order.into_active_model();
                    am.total = Set(total);
                    am.update(txn).await?;
                    Ok(Some(updated))
                })
            })
            .await
            .map_err(|e| total_txn_failure(e, "update order line"))?;
        Ok(model.map(line_from_model))
    }

    async fn delete(&self, id: i32) -> Result<Option<OrderLine>, ApiError> {
        let model = self
            .db
            .transaction::<_, Option<order_lines::Model>, TotalTxnError>(|txn| {
                Box::pin(async move {
                    let Some((current, order)) = lock_line_and_order(txn, id).await? else {
                        return Ok(None);
                    };
                    order_lines::Entity::delete_by_id(id).exec(txn).await?;

                    let total = adjust_total(order.total, current.line_total, Decimal::ZERO)?;
                    let mut am = order.into_active_model();
                    am.total = Set(total);
                    am.update(txn).await?;
                    Ok(Some(current))
                })
            })
            .await
            .map_err(|e| total_txn_failure(e, "delete order line"))?;
        Ok(model.map(line_from_model))
    }
}

fn line_from_model(model: order_lines::Model) -> OrderLine {
    OrderLine {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        unit_price: model.unit_price,
        line_total: model.line_total,
    }
}
