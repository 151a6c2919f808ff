use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use restau_domain::order::OrderStatus;

use crate::domain::types::{Order, OrderChanges, OrderDetail, OrderFilter, OrderLine};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::order::{
    CreateOrderInput, CreateOrderUseCase, DeleteOrderUseCase, GetOrderUseCase, ListOrdersUseCase,
    OrderTotalUseCase, UpdateOrderUseCase,
};
use crate::usecase::order_line::LineInput;

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    #[serde(serialize_with = "restau_core::serde::to_rfc3339_ms")]
    pub ordered_at: DateTime<Utc>,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            ordered_at: order.ordered_at,
            status: order.status,
            total: order.total,
        }
    }
}

#[derive(Serialize)]
pub struct OrderLineResponse {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(line: OrderLine) -> Self {
        Self {
            id: line.id,
            order_id: line.order_id,
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total,
        }
    }
}

/// An order with its lines, as returned by every order or line write.
#[derive(Serialize)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub lines: Vec<OrderLineResponse>,
}

impl From<OrderDetail> for OrderDetailResponse {
    fn from(detail: OrderDetail) -> Self {
        Self {
            order: detail.order.into(),
            lines: detail.lines.into_iter().map(OrderLineResponse::from).collect(),
        }
    }
}

// ── GET /commandes ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListOrdersQuery {
    pub user_id: Option<i32>,
    pub status: Option<OrderStatus>,
    /// `YYYY-MM-DD`, UTC.
    pub date: Option<NaiveDate>,
}

pub async fn list_orders(
    current: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let usecase = ListOrdersUseCase {
        repo: state.order_repo(),
    };
    let orders = usecase
        .execute(
            &current.actor(),
            OrderFilter {
                user_id: query.user_id,
                status: query.status,
                date: query.date,
            },
        )
        .await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

// ── POST /commandes ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LineRequest {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
}

impl From<LineRequest> for LineInput {
    fn from(line: LineRequest) -> Self {
        Self {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: Option<i32>,
    pub status: Option<OrderStatus>,
    pub ordered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lines: Vec<LineRequest>,
}

pub async fn create_order(
    current: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderDetailResponse>), ApiError> {
    let usecase = CreateOrderUseCase {
        orders: state.order_repo(),
        users: state.user_repo(),
        products: state.product_repo(),
    };
    let detail = usecase
        .execute(
            &current.actor(),
            CreateOrderInput {
                user_id: body.user_id,
                status: body.status,
                ordered_at: body.ordered_at,
                lines: body.lines.into_iter().map(LineInput::from).collect(),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

// ── GET /commandes/{id} ──────────────────────────────────────────────────────

pub async fn get_order(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderDetailResponse>, ApiError> {
    let usecase = GetOrderUseCase {
        repo: state.order_repo(),
    };
    Ok(Json(usecase.execute(&current.actor(), id).await?.into()))
}

// ── PUT|PATCH /commandes/{id} ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateOrderRequest {
    pub user_id: Option<i32>,
    pub status: Option<OrderStatus>,
    pub ordered_at: Option<DateTime<Utc>>,
}

pub async fn update_order(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateOrderRequest>,
) -> Result<Json<OrderDetailResponse>, ApiError> {
    let usecase = UpdateOrderUseCase {
        orders: state.order_repo(),
        users: state.user_repo(),
    };
    let detail = usecase
        .execute(
            &current.actor(),
            id,
            OrderChanges {
                user_id: body.user_id,
                status: body.status,
                ordered_at: body.ordered_at,
            },
        )
        .await?;
    Ok(Json(detail.into()))
}

// ── DELETE /commandes/{id} ───────────────────────────────────────────────────

pub async fn delete_order(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteOrderUseCase {
        repo: state.order_repo(),
    };
    usecase.execute(&current.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /commandes/{id}/total ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct OrderTotalResponse {
    pub order_id: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub line_count: usize,
}

pub async fn get_order_total(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderTotalResponse>, ApiError> {
    let usecase = OrderTotalUseCase {
        repo: state.order_repo(),
    };
    let total = usecase.execute(&current.actor(), id).await?;
    Ok(Json(OrderTotalResponse {
        order_id: total.order_id,
        total: total.total,
        line_count: total.line_count,
    }))
}
