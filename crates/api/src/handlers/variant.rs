//! Handlers for the `/variants` resource.
//!
//! Variants are nested under phases for creation, listing, reordering,
//! and offer-candidate queries.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use parkett_core::error::CoreError;
use parkett_core::offer::OfferVariant;
use parkett_core::types::DbId;
use parkett_db::models::ordering::ReorderInput;
use parkett_db::models::variant::{CreateVariant, DuplicateVariant, UpdateVariant, Variant};
use parkett_db::repositories::VariantRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/phases/{phase_id}/variants
///
/// Overrides `input.phase_id` with the value from the URL path.
pub async fn create(
    State(state): State<AppState>,
    Path(phase_id): Path<DbId>,
    Json(mut input): Json<CreateVariant>,
) -> AppResult<(StatusCode, Json<Variant>)> {
    input.phase_id = phase_id;
    let variant = VariantRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(variant)))
}

/// GET /api/v1/phases/{phase_id}/variants
pub async fn list_by_phase(
    State(state): State<AppState>,
    Path(phase_id): Path<DbId>,
) -> AppResult<Json<Vec<Variant>>> {
    let variants = VariantRepo::list_by_phase(&state.pool, phase_id).await?;
    Ok(Json(variants))
}

/// GET /api/v1/phases/{phase_id}/offer-variants
///
/// Candidate variants for composing an offer: `include_in_offer` only,
/// ordered, with computed totals.
pub async fn list_for_offer(
    State(state): State<AppState>,
    Path(phase_id): Path<DbId>,
) -> AppResult<Json<Vec<OfferVariant>>> {
    let variants = VariantRepo::list_for_offer(&state.pool, phase_id).await?;
    Ok(Json(variants))
}

/// GET /api/v1/variants/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Variant>> {
    let variant = VariantRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Variant",
            id,
        }))?;
    Ok(Json(variant))
}

/// PUT /api/v1/variants/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVariant>,
) -> AppResult<Json<Variant>> {
    let variant = VariantRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Variant",
            id,
        }))?;
    Ok(Json(variant))
}

/// DELETE /api/v1/variants/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = VariantRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Variant",
            id,
        }))
    }
}

/// Request body for the discount toggle.
#[derive(Debug, Deserialize)]
pub struct ToggleDiscount {
    pub discount_enabled: bool,
}

/// PUT /api/v1/variants/{id}/discount
///
/// Flips the toggle and cascades the resolved discount state to all
/// rooms and line items of the variant.
pub async fn toggle_discount(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ToggleDiscount>,
) -> AppResult<Json<Variant>> {
    let variant = VariantRepo::toggle_discount(&state.pool, id, input.discount_enabled).await?;
    Ok(Json(variant))
}

/// POST /api/v1/variants/{id}/select
///
/// Marks this variant as the phase's selected one, un-marking siblings.
pub async fn select(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Json<Variant>> {
    let variant = VariantRepo::set_selected(&state.pool, id).await?;
    Ok(Json(variant))
}

/// POST /api/v1/phases/{phase_id}/variants/reorder
pub async fn reorder(
    State(state): State<AppState>,
    Path(phase_id): Path<DbId>,
    Json(input): Json<ReorderInput>,
) -> AppResult<Json<Vec<Variant>>> {
    let variants = VariantRepo::reorder(&state.pool, phase_id, input).await?;
    Ok(Json(variants))
}

/// POST /api/v1/variants/{id}/duplicate
pub async fn duplicate(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DuplicateVariant>,
) -> AppResult<(StatusCode, Json<Variant>)> {
    let clone = VariantRepo::duplicate(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(clone)))
}
