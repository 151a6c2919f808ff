use rust_decimal::Decimal;

use restau_domain::money::{check_price, check_quantity, line_total};

use crate::domain::repository::{OrderLineRepository, OrderRepository, ProductRepository};
use crate::domain::types::{Actor, Order, OrderDetail, OrderLine, OrderLineFilter, PricedLine};
use crate::error::ApiError;

/// Line values as submitted. `unit_price` falls back to the product's price.
#[derive(Debug, Clone)]
pub struct LineInput {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
}

/// Validate a line and compute its total.
pub(crate) async fn price_line<P: ProductRepository>(
    products: &P,
    input: &LineInput,
) -> Result<PricedLine, ApiError> {
    check_quantity(input.quantity)?;
    let unit_price = match input.unit_price {
        Some(price) => {
            check_price(price)?;
            if products.find_by_id(input.product_id).await?.is_none() {
                return Err(ApiError::ProductNotFound);
            }
            price
        }
        None => {
            products
                .find_by_id(input.product_id)
                .await?
                .ok_or(ApiError::ProductNotFound)?
                .price
        }
    };
    Ok(PricedLine {
        product_id: input.product_id,
        quantity: input.quantity,
        unit_price,
        line_total: line_total(input.quantity, unit_price)?,
    })
}

/// Load an order the actor may touch.
pub(crate) async fn accessible_order<O: OrderRepository>(
    orders: &O,
    actor: &Actor,
    order_id: i32,
) -> Result<Order, ApiError> {
    let order = orders
        .find_by_id(order_id)
        .await?
        .ok_or(ApiError::OrderNotFound)?;
    if !actor.can_access(order.user_id) {
        return Err(ApiError::Forbidden);
    }
    Ok(order)
}

async fn order_detail<O: OrderRepository>(
    orders: &O,
    order_id: i32,
) -> Result<OrderDetail, ApiError> {
    let order = orders
        .find_by_id(order_id)
        .await?
        .ok_or(ApiError::OrderNotFound)?;
    let lines = orders.lines(order_id).await?;
    Ok(OrderDetail { order, lines })
}

// ── ListOrderLines ───────────────────────────────────────────────────────────

pub struct ListOrderLinesUseCase<L: OrderLineRepository, O: OrderRepository> {
    pub lines: L,
    pub orders: O,
}

impl<L: OrderLineRepository, O: OrderRepository> ListOrderLinesUseCase<L, O> {
    pub async fn execute(
        &self,
        actor: &Actor,
        order_id: Option<i32>,
    ) -> Result<Vec<OrderLine>, ApiError> {
        if let Some(order_id) = order_id {
            accessible_order(&self.orders, actor, order_id).await?;
        }
        let filter = OrderLineFilter {
            order_id,
            owner_id: (!actor.role.is_staff()).then_some(actor.user_id),
        };
        self.lines.list(&filter).await
    }
}

// ── GetOrderLine ─────────────────────────────────────────────────────────────

pub struct GetOrderLineUseCase<L: OrderLineRepository, O: OrderRepository> {
    pub lines: L,
    pub orders: O,
}

impl<L: OrderLineRepository, O: OrderRepository> GetOrderLineUseCase<L, O> {
    pub async fn execute(&self, actor: &Actor, id: i32) -> Result<OrderLine, ApiError> {
        let line = self
            .lines
            .find_by_id(id)
            .await?
            .ok_or(ApiError::OrderLineNotFound)?;
        accessible_order(&self.orders, actor, line.order_id).await?;
        Ok(line)
    }
}

// ── CreateOrderLine ──────────────────────────────────────────────────────────

pub struct CreateOrderLineUseCase<L: OrderLineRepository, O: OrderRepository, P: ProductRepository>
{
    pub lines: L,
    pub orders: O,
    pub products: P,
}

impl<L, O, P> CreateOrderLineUseCase<L, O, P>
where
    L: OrderLineRepository,
    O: OrderRepository,
    P: ProductRepository,
{
    /// Add a line and return the order with its adjusted total.
    pub async fn execute(
        &self,
        actor: &Actor,
        order_id: i32,
        input: LineInput,
    ) -> Result<OrderDetail, ApiError> {
        accessible_order(&self.orders, actor, order_id).await?;
        let priced = price_line(&self.products, &input).await?;
        let line = self
            .lines
            .insert(order_id, &priced)
            .await?
            .ok_or(ApiError::OrderNotFound)?;
        tracing::info!(
            order_id,
            line_id = line.id,
            line_total = %line.line_total,
            "order line created"
        );
        order_detail(&self.orders, order_id).await
    }
}

// ── UpdateOrderLine ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct UpdateOrderLineInput {
    pub product_id: Option<i32>,
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
}

pub struct UpdateOrderLineUseCase<L: OrderLineRepository, O: OrderRepository, P: ProductRepository>
{
    pub lines: L,
    pub orders: O,
    pub products: P,
}

impl<L, O, P> UpdateOrderLineUseCase<L, O, P>
where
    L: OrderLineRepository,
    O: OrderRepository,
    P: ProductRepository,
{
    /// Merge the changes over the stored line, reprice it and return the
    /// order with its adjusted total.
    pub async fn execute(
        &self,
        actor: &Actor,
        id: i32,
        input: UpdateOrderLineInput,
    ) -> Result<OrderDetail, ApiError> {
        if input.product_id.is_none() && input.quantity.is_none() && input.unit_price.is_none() {
            return Err(ApiError::Validation("no order line field to update".into()));
        }
        let current = self
            .lines
            .find_by_id(id)
            .await?
            .ok_or(ApiError::OrderLineNotFound)?;
        accessible_order(&self.orders, actor, current.order_id).await?;

        let product_changed = input
            .product_id
            .is_some_and(|p| p != current.product_id);
        // Switching product without an explicit price takes the new product's price.
        let unit_price = match input.unit_price {
            Some(price) => Some(price),
            None if product_changed => None,
            None => Some(current.unit_price),
        };
        let merged = LineInput {
            product_id: input.product_id.unwrap_or(current.product_id),
            quantity: input.quantity.unwrap_or(current.quantity),
            unit_price,
        };
        let priced = price_line(&self.products, &merged).await?;
        let line = self
            .lines
            .update(id, &priced)
            .await?
            .ok_or(ApiError::OrderLineNotFound)?;
        tracing::info!(
            order_id = line.order_id,
            line_id = line.id,
            old_line_total = %current.line_total,
            line_total = %line.line_total,
            "order line updated"
        );
        order_detail(&self.orders, line.order_id).await
    }
}

// ── DeleteOrderLine ──────────────────────────────────────────────────────────

pub struct DeleteOrderLineUseCase<L: OrderLineRepository, O: OrderRepository> {
    pub lines: L,
    pub orders: O,
}

impl<L: OrderLineRepository, O: OrderRepository> DeleteOrderLineUseCase<L, O> {
    /// Remove a line and return the order with its reduced total.
    pub async fn execute(&self, actor: &Actor, id: i32) -> Result<OrderDetail, ApiError> {
        let current = self
            .lines
            .find_by_id(id)
            .await?
            .ok_or(ApiError::OrderLineNotFound)?;
        accessible_order(&self.orders, actor, current.order_id).await?;
        let deleted = self
            .lines
            .delete(id)
            .await?
            .ok_or(ApiError::OrderLineNotFound)?;
        tracing::info!(
            order_id = deleted.order_id,
            line_id = deleted.id,
            line_total = %deleted.line_total,
            "order line deleted"
        );
        order_detail(&self.orders, deleted.order_id).await
    }
}
