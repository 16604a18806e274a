//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::state::AppState;

/// GET /health
///
/// Verifies database connectivity.
pub async fn health(State(state): State<AppState>) -> AppResult<Json<Value>> {
    parkett_db::health_check(&state.pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}
