//! Room line item model and DTOs.

use parkett_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `room_products` table: one catalog product placed into a
/// room.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoomProduct {
    pub id: DbId,
    pub room_id: DbId,
    pub product_id: DbId,
    pub quantity: f64,
    pub unit_price: f64,
    pub discount: f64,
    pub discount_enabled: bool,
    pub waste_percent: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new line item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomProduct {
    pub room_id: DbId,
    pub product_id: DbId,
    pub quantity: f64,
    /// Defaults to the catalog product's current unit price when omitted.
    pub unit_price: Option<f64>,
    /// Defaults to mirroring the owning room's discount state when omitted.
    pub discount: Option<f64>,
    pub discount_enabled: Option<bool>,
    pub waste_percent: Option<f64>,
}

/// DTO for updating an existing line item. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoomProduct {
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub discount: Option<f64>,
    pub discount_enabled: Option<bool>,
    pub waste_percent: Option<f64>,
}
