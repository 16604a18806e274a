//! Handlers for the `/offers` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use parkett_core::error::CoreError;
use parkett_core::types::DbId;
use parkett_db::models::offer::{CreateOffer, Offer, OfferPreview, UpdateOffer};
use parkett_db::repositories::OfferRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/offers
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateOffer>,
) -> AppResult<(StatusCode, Json<Offer>)> {
    let offer = OfferRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

/// GET /api/v1/projects/{project_id}/offers
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Offer>>> {
    let offers = OfferRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(offers))
}

/// GET /api/v1/offers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Offer>> {
    let offer = OfferRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Offer", id }))?;
    Ok(Json(offer))
}

/// PUT /api/v1/offers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOffer>,
) -> AppResult<Json<Offer>> {
    let offer = OfferRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Offer", id }))?;
    Ok(Json(offer))
}

/// GET /api/v1/offers/{id}/preview
///
/// The nested breakdown, from the frozen snapshot when one is present and
/// well-formed, otherwise recomputed live from the hierarchy.
pub async fn preview(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<OfferPreview>> {
    let preview = OfferRepo::preview(&state.pool, id).await?;
    Ok(Json(preview))
}
