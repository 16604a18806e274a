//! Handlers for the `/rooms` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use parkett_core::error::CoreError;
use parkett_core::types::DbId;
use parkett_db::models::room::{CreateRoom, DuplicateRoom, Room, UpdateRoom};
use parkett_db::repositories::RoomRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/variants/{variant_id}/rooms
///
/// Overrides `input.variant_id` with the value from the URL path. The
/// stored discount state is decided by the cascade resolver.
pub async fn create(
    State(state): State<AppState>,
    Path(variant_id): Path<DbId>,
    Json(mut input): Json<CreateRoom>,
) -> AppResult<(StatusCode, Json<Room>)> {
    input.variant_id = variant_id;
    let room = RoomRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// GET /api/v1/variants/{variant_id}/rooms
pub async fn list_by_variant(
    State(state): State<AppState>,
    Path(variant_id): Path<DbId>,
) -> AppResult<Json<Vec<Room>>> {
    let rooms = RoomRepo::list_by_variant(&state.pool, variant_id).await?;
    Ok(Json(rooms))
}

/// GET /api/v1/rooms/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Room>> {
    let room = RoomRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Room", id }))?;
    Ok(Json(room))
}

/// PUT /api/v1/rooms/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoom>,
) -> AppResult<Json<Room>> {
    let room = RoomRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Room", id }))?;
    Ok(Json(room))
}

/// DELETE /api/v1/rooms/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = RoomRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Room", id }))
    }
}

/// POST /api/v1/rooms/{id}/duplicate
pub async fn duplicate(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DuplicateRoom>,
) -> AppResult<(StatusCode, Json<Room>)> {
    let clone = RoomRepo::duplicate(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(clone)))
}
