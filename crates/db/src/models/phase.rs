//! Phase entity model and DTOs.

use parkett_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `phases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Phase {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    /// Unique within the owning project (application-enforced).
    pub phase_order: i32,
    /// One of `created | quoted | won | lost | archived`.
    pub status: String,
    pub discount_enabled: bool,
    pub phase_discount: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new phase.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhase {
    pub project_id: DbId,
    pub name: String,
    /// Explicit position; rejected with a conflict if already taken.
    /// Defaults to the next free position when omitted.
    pub phase_order: Option<i32>,
    pub status: Option<String>,
    pub discount_enabled: Option<bool>,
    pub phase_discount: Option<f64>,
}

/// DTO for updating an existing phase. All fields are optional.
///
/// `discount_enabled` is deliberately absent: flipping the toggle cascades
/// to descendants and goes through `PhaseRepo::toggle_discount`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePhase {
    pub name: Option<String>,
    pub status: Option<String>,
    pub phase_discount: Option<f64>,
}
