//! Handlers for the `/phases` resource.
//!
//! Phases are nested under projects for creation and listing:
//! `/projects/{project_id}/phases`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use parkett_core::error::CoreError;
use parkett_core::types::DbId;
use parkett_db::models::ordering::ReorderInput;
use parkett_db::models::phase::{CreatePhase, Phase, UpdatePhase};
use parkett_db::repositories::PhaseRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/phases
///
/// Overrides `input.project_id` with the value from the URL path.
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<CreatePhase>,
) -> AppResult<(StatusCode, Json<Phase>)> {
    input.project_id = project_id;
    let phase = PhaseRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(phase)))
}

/// GET /api/v1/projects/{project_id}/phases
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Phase>>> {
    let phases = PhaseRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(phases))
}

/// GET /api/v1/phases/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Phase>> {
    let phase = PhaseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Phase", id }))?;
    Ok(Json(phase))
}

/// PUT /api/v1/phases/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePhase>,
) -> AppResult<Json<Phase>> {
    let phase = PhaseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Phase", id }))?;
    Ok(Json(phase))
}

/// Request body for the discount toggle.
#[derive(Debug, Deserialize)]
pub struct ToggleDiscount {
    pub discount_enabled: bool,
}

/// PUT /api/v1/phases/{id}/discount
///
/// Flips the toggle and cascades the re-resolved discount state to all
/// variants, rooms, and line items of the phase.
pub async fn toggle_discount(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ToggleDiscount>,
) -> AppResult<Json<Phase>> {
    let phase = PhaseRepo::toggle_discount(&state.pool, id, input.discount_enabled).await?;
    Ok(Json(phase))
}

/// DELETE /api/v1/phases/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = PhaseRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Phase", id }))
    }
}

/// POST /api/v1/projects/{project_id}/phases/reorder
///
/// Body is either the full phase ID list in desired order, or explicit
/// `{id, new_order}` pairs.
pub async fn reorder(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<ReorderInput>,
) -> AppResult<Json<Vec<Phase>>> {
    let phases = PhaseRepo::reorder(&state.pool, project_id, input).await?;
    Ok(Json(phases))
}
