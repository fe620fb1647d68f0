//! HTTP handlers for product and carousel CRUD.

use crate::{
    errors::AppError,
    models::{
        carousel::{Carousel, CarouselInput},
        product::{Product, ProductInput, ProductPage},
        response::ApiResponse,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
    pub sort_field: Option<String>,
}

fn default_page_size() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

// --- products ---

/// GET `/v1/products` — paged listing with total count.
pub async fn list_products_paged(
    State(state): State<AppState>,
    Query(q): Query<PageQuery>,
) -> Result<Json<ApiResponse<ProductPage>>, AppError> {
    let page = state
        .catalog
        .products_paged(q.page, q.size, q.sort_field.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

/// GET `/v1/products/all`
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    Ok(Json(ApiResponse::success(state.catalog.list_products().await?)))
}

/// GET `/v1/products/search?name=`
pub async fn search_products(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    Ok(Json(ApiResponse::success(
        state.catalog.search_products(&q.name).await?,
    )))
}

/// GET `/v1/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    Ok(Json(ApiResponse::success(state.catalog.get_product(id).await?)))
}

/// POST `/v1/products` — returns the new row id.
pub async fn add_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ApiResponse<i64>>, AppError> {
    let id = state.catalog.add_product(input).await?;
    Ok(Json(ApiResponse::success(id)))
}

/// PUT `/v1/products/{id}`
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    state.catalog.update_product(id, input).await?;
    Ok(Json(ApiResponse::success(format!("product {id} updated"))))
}

/// DELETE `/v1/products/{id}`
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    state.catalog.delete_product(id).await?;
    Ok(Json(ApiResponse::success(format!("product {id} deleted"))))
}

// --- carousels ---

/// GET `/v1/carousels` — paged, display order by default.
pub async fn list_carousels_paged(
    State(state): State<AppState>,
    Query(q): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Carousel>>>, AppError> {
    let slides = state
        .catalog
        .carousels_paged(q.page, q.size, q.sort_field.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(slides)))
}

/// GET `/v1/carousels/all`
pub async fn list_carousels(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Carousel>>>, AppError> {
    Ok(Json(ApiResponse::success(
        state.catalog.list_carousels().await?,
    )))
}

/// GET `/v1/carousels/{id}`
pub async fn get_carousel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Carousel>>, AppError> {
    Ok(Json(ApiResponse::success(state.catalog.get_carousel(id).await?)))
}

/// POST `/v1/carousels` — returns the new row id; duplicate image URLs
/// are rejected with 409.
pub async fn add_carousel(
    State(state): State<AppState>,
    Json(input): Json<CarouselInput>,
) -> Result<Json<ApiResponse<i64>>, AppError> {
    let id = state.catalog.add_carousel(input).await?;
    Ok(Json(ApiResponse::success(id)))
}

/// PUT `/v1/carousels/{id}`
pub async fn update_carousel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CarouselInput>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    state.catalog.update_carousel(id, input).await?;
    Ok(Json(ApiResponse::success(format!("carousel {id} updated"))))
}

/// DELETE `/v1/carousels/{id}`
pub async fn delete_carousel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    state.catalog.delete_carousel(id).await?;
    Ok(Json(ApiResponse::success(format!("carousel {id} deleted"))))
}
