use chrono::{DateTime, Utc};

use restau_domain::money::sum_line_totals;
use restau_domain::order::OrderStatus;

use crate::domain::repository::{OrderRepository, ProductRepository, UserRepository};
use crate::domain::types::{
    Actor, NewOrder, Order, OrderChanges, OrderDetail, OrderFilter, OrderTotal,
};
use crate::error::ApiError;
use crate::usecase::order_line::{LineInput, accessible_order, price_line};

// ── ListOrders ───────────────────────────────────────────────────────────────

pub struct ListOrdersUseCase<R: OrderRepository> {
    pub repo: R,
}

impl<R: OrderRepository> ListOrdersUseCase<R> {
    /// Clients only ever see their own orders.
    pub async fn execute(&self, actor: &Actor, filter: OrderFilter) -> Result<Vec<Order>, ApiError> {
        let mut filter = filter;
        if !actor.role.is_staff() {
            if filter.user_id.is_some_and(|u| u != actor.user_id) {
                return Err(ApiError::Forbidden);
            }
            filter.user_id = Some(actor.user_id);
        }
        self.repo.list(&filter).await
    }
}

// ── ListUserOrders ───────────────────────────────────────────────────────────

pub struct ListUserOrdersUseCase<O: OrderRepository, U: UserRepository> {
    pub orders: O,
    pub users: U,
}

impl<O: OrderRepository, U: UserRepository> ListUserOrdersUseCase<O, U> {
    pub async fn execute(&self, actor: &Actor, user_id: i32) -> Result<Vec<Order>, ApiError> {
        if !actor.can_access(user_id) {
            return Err(ApiError::Forbidden);
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }
        let filter = OrderFilter {
            user_id: Some(user_id),
            ..Default::default()
        };
        self.orders.list(&filter).await
    }
}

// ── GetOrder ─────────────────────────────────────────────────────────────────

pub struct GetOrderUseCase<R: OrderRepository> {
    pub repo: R,
}

impl<R: OrderRepository> GetOrderUseCase<R> {
    pub async fn execute(&self, actor: &Actor, id: i32) -> Result<OrderDetail, ApiError> {
        let order = accessible_order(&self.repo, actor, id).await?;
        let lines = self.repo.lines(id).await?;
        Ok(OrderDetail { order, lines })
    }
}

// ── CreateOrder ──────────────────────────────────────────────────────────────

pub struct CreateOrderInput {
    /// Defaults to the caller.
    pub user_id: Option<i32>,
    pub status: Option<OrderStatus>,
    pub ordered_at: Option<DateTime<Utc>>,
    pub lines: Vec<LineInput>,
}

pub struct CreateOrderUseCase<O: OrderRepository, U: UserRepository, P: ProductRepository> {
    pub orders: O,
    pub users: U,
    pub products: P,
}

impl<O, U, P> CreateOrderUseCase<O, U, P>
where
    O: OrderRepository,
    U: UserRepository,
    P: ProductRepository,
{
    pub async fn execute(
        &self,
        actor: &Actor,
        input: CreateOrderInput,
    ) -> Result<OrderDetail, ApiError> {
        let user_id = input.user_id.unwrap_or(actor.user_id);
        if !actor.can_access(user_id) {
            return Err(ApiError::Forbidden);
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }
        let mut priced = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            priced.push(price_line(&self.products, line).await?);
        }
        let new_order = NewOrder {
            user_id,
            status: input.status.unwrap_or_default(),
            ordered_at: input.ordered_at.unwrap_or_else(Utc::now),
        };
        let (order, lines) = self.orders.create(&new_order, &priced).await?;
        tracing::info!(
            order_id = order.id,
            user_id,
            line_count = lines.len(),
            total = %order.total,
            "order created"
        );
        Ok(OrderDetail { order, lines })
    }
}

// ── UpdateOrder ──────────────────────────────────────────────────────────────

pub struct UpdateOrderUseCase<O: OrderRepository, U: UserRepository> {
    pub orders: O,
    pub users: U,
}

impl<O: OrderRepository, U: UserRepository> UpdateOrderUseCase<O, U> {
    /// Apply field changes; the stored total is recomputed from the lines.
    pub async fn execute(
        &self,
        actor: &Actor,
        id: i32,
        changes: OrderChanges,
    ) -> Result<OrderDetail, ApiError> {
        if !actor.role.is_staff() {
            return Err(ApiError::Forbidden);
        }
        if changes.is_empty() {
            return Err(ApiError::MissingData);
        }
        if let Some(user_id) = changes.user_id {
            if self.users.find_by_id(user_id).await?.is_none() {
                return Err(ApiError::UserNotFound);
            }
        }
        let order = self
            .orders
            .update(id, &changes)
            .await?
            .ok_or(ApiError::OrderNotFound)?;
        tracing::info!(order_id = id, status = %order.status, total = %order.total, "order updated");
        let lines = self.orders.lines(id).await?;
        Ok(OrderDetail { order, lines })
    }
}

// ── DeleteOrder ──────────────────────────────────────────────────────────────

pub struct DeleteOrderUseCase<R: OrderRepository> {
    pub repo: R,
}

impl<R: OrderRepository> DeleteOrderUseCase<R> {
    pub async fn execute(&self, actor: &Actor, id: i32) -> Result<(), ApiError> {
        if !actor.role.is_staff() {
            return Err(ApiError::Forbidden);
        }
        if !self.repo.delete(id).await? {
            return Err(ApiError::OrderNotFound);
        }
        tracing::info!(order_id = id, "order deleted");
        Ok(())
    }
}

// ── OrderTotal ───────────────────────────────────────────────────────────────

pub struct OrderTotalUseCase<R: OrderRepository> {
    pub repo: R,
}

impl<R: OrderRepository> OrderTotalUseCase<R> {
    /// Sum the current lines, ignoring the stored column.
    pub async fn execute(&self, actor: &Actor, id: i32) -> Result<OrderTotal, ApiError> {
        accessible_order(&self.repo, actor, id).await?;
        let lines = self.repo.lines(id).await?;
        Ok(OrderTotal {
            order_id: id,
            total: sum_line_totals(lines.iter().map(|l| l.line_total))?,
            line_count: lines.len(),
        })
    }
}
