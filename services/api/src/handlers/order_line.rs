use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::handlers::order::{OrderDetailResponse, OrderLineResponse};
use crate::state::AppState;
use crate::usecase::order_line::{
    CreateOrderLineUseCase, DeleteOrderLineUseCase, GetOrderLineUseCase, LineInput,
    ListOrderLinesUseCase, UpdateOrderLineInput, UpdateOrderLineUseCase,
};

// ── GET /lignes-de-commande ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListOrderLinesQuery {
    pub order_id: Option<i32>,
}

pub async fn list_order_lines(
    current: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ListOrderLinesQuery>,
) -> Result<Json<Vec<OrderLineResponse>>, ApiError> {
    let usecase = ListOrderLinesUseCase {
        lines: state.order_line_repo(),
        orders: state.order_repo(),
    };
    let lines = usecase.execute(&current.actor(), query.order_id).await?;
    Ok(Json(lines.into_iter().map(OrderLineResponse::from).collect()))
}

// ── GET /lignes-de-commande/{id} ─────────────────────────────────────────────

pub async fn get_order_line(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderLineResponse>, ApiError> {
    let usecase = GetOrderLineUseCase {
        lines: state.order_line_repo(),
        orders: state.order_repo(),
    };
    Ok(Json(usecase.execute(&current.actor(), id).await?.into()))
}

// ── POST /lignes-de-commande ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateOrderLineRequest {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
}

pub async fn create_order_line(
    current: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateOrderLineRequest>,
) -> Result<(StatusCode, Json<OrderDetailResponse>), ApiError> {
    let usecase = CreateOrderLineUseCase {
        lines: state.order_line_repo(),
        orders: state.order_repo(),
        products: state.product_repo(),
    };
    let detail = usecase
        .execute(
            &current.actor(),
            body.order_id,
            LineInput {
                product_id: body.product_id,
                quantity: body.quantity,
                unit_price: body.unit_price,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

// ── PUT|PATCH /lignes-de-commande/{id} ───────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateOrderLineRequest {
    pub product_id: Option<i32>,
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
}

pub async fn update_order_line(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateOrderLineRequest>,
) -> Result<Json<OrderDetailResponse>, ApiError> {
    let usecase = UpdateOrderLineUseCase {
        lines: state.order_line_repo(),
        orders: state.order_repo(),
        products: state.product_repo(),
    };
    let detail = usecase
        .execute(
            &current.actor(),
            id,
            UpdateOrderLineInput {
                product_id: body.product_id,
                quantity: body.quantity,
                unit_price: body.unit_price,
            },
        )
        .await?;
    Ok(Json(detail.into()))
}

// ── DELETE /lignes-de-commande/{id} ──────────────────────────────────────────

pub async fn delete_order_line(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderDetailResponse>, ApiError> {
    let usecase = DeleteOrderLineUseCase {
        lines: state.order_line_repo(),
        orders: state.order_repo(),
    };
    Ok(Json(usecase.execute(&current.actor(), id).await?.into()))
}
