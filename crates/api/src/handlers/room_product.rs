//! Handlers for room line items.
//!
//! Creation and listing are nested under rooms:
//! `/rooms/{room_id}/products`; updates and deletes address the line item
//! directly at `/room-products/{id}`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use parkett_core::error::CoreError;
use parkett_core::types::DbId;
use parkett_db::models::room_product::{CreateRoomProduct, RoomProduct, UpdateRoomProduct};
use parkett_db::repositories::RoomProductRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/rooms/{room_id}/products
///
/// Overrides `input.room_id` with the value from the URL path.
pub async fn create(
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
    Json(mut input): Json<CreateRoomProduct>,
) -> AppResult<(StatusCode, Json<RoomProduct>)> {
    input.room_id = room_id;
    let line = RoomProductRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// GET /api/v1/rooms/{room_id}/products
pub async fn list_by_room(
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<Json<Vec<RoomProduct>>> {
    let lines = RoomProductRepo::list_by_room(&state.pool, room_id).await?;
    Ok(Json(lines))
}

/// PUT /api/v1/room-products/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoomProduct>,
) -> AppResult<Json<RoomProduct>> {
    let line = RoomProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "RoomProduct",
            id,
        }))?;
    Ok(Json(line))
}

/// DELETE /api/v1/room-products/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = RoomProductRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "RoomProduct",
            id,
        }))
    }
}
