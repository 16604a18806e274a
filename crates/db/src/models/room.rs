//! Room entity model and DTOs.

use parkett_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rooms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: DbId,
    pub variant_id: DbId,
    pub name: String,
    /// Square metres.
    pub area: f64,
    pub discount: f64,
    pub discount_enabled: bool,
    pub waste_percent: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new room.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoom {
    pub variant_id: DbId,
    pub name: String,
    pub area: Option<f64>,
    /// Explicit discount override; the cascade resolver decides the final
    /// state (ancestor toggles can still force it off).
    pub discount: Option<f64>,
    pub waste_percent: Option<f64>,
}

/// DTO for updating an existing room. All fields are optional.
///
/// `discount`/`discount_enabled` are deliberately absent: outside of the
/// creation-time override, the cascade resolver is the only writer of that
/// pair.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoom {
    pub name: Option<String>,
    pub area: Option<f64>,
    pub waste_percent: Option<f64>,
}

/// Which line items a room duplication clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCloneMode {
    All,
    Selected,
    None,
}

/// DTO for duplicating a room.
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicateRoom {
    /// Defaults to the source room's own variant.
    pub target_variant_id: Option<DbId>,
    /// Name for the copy; defaults to `"<source name> (copy)"`.
    pub name: Option<String>,
    pub product_mode: ProductCloneMode,
    /// Required when `product_mode` is `selected`.
    pub selected_product_ids: Option<Vec<DbId>>,
}
