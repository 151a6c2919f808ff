use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::types::{NewProduct, Product, ProductChanges, ProductFilter};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::product::{
    CreateProductUseCase, DeleteProductUseCase, GetProductUseCase, ListProductsUseCase,
    UpdateProductUseCase,
};

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    pub category_id: i32,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            category_id: product.category_id,
        }
    }
}

// ── GET /produits ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListProductsQuery {
    pub id: Option<i32>,
    pub category_id: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_stock: Option<i32>,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let usecase = ListProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase
        .execute(ProductFilter {
            id: query.id,
            category_id: query.category_id,
            min_price: query.min_price,
            max_price: query.max_price,
            min_stock: query.min_stock,
        })
        .await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

// ── GET /produits/{id} ───────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductResponse>, ApiError> {
    let usecase = GetProductUseCase {
        repo: state.product_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── POST /produits ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    pub category_id: i32,
}

pub async fn create_product(
    current: CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    current.require_staff()?;
    let usecase = CreateProductUseCase {
        products: state.product_repo(),
        categories: state.category_repo(),
    };
    let product = usecase
        .execute(NewProduct {
            name: body.name,
            description: body.description,
            price: body.price,
            stock: body.stock,
            category_id: body.category_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

// ── PATCH /produits/{id} ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub category_id: Option<i32>,
}

pub async fn update_product(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    current.require_staff()?;
    let usecase = UpdateProductUseCase {
        products: state.product_repo(),
        categories: state.category_repo(),
    };
    let product = usecase
        .execute(
            id,
            ProductChanges {
                name: body.name,
                description: body.description,
                price: body.price,
                stock: body.stock,
                category_id: body.category_id,
            },
        )
        .await?;
    Ok(Json(product.into()))
}

// ── DELETE /produits/{id} ────────────────────────────────────────────────────

pub async fn delete_product(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    current.require_staff()?;
    let usecase = DeleteProductUseCase {
        repo: state.product_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
