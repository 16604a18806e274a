//! Handlers for the `/products` catalog stub.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use parkett_core::error::CoreError;
use parkett_core::types::DbId;
use parkett_db::models::product::{CreateProduct, Product};
use parkett_db::repositories::ProductRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/products
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = ProductRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/v1/products
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = ProductRepo::list(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/v1/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Product>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    Ok(Json(product))
}
