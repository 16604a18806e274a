//! Variant entity model and DTOs.

use parkett_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `variants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Variant {
    pub id: DbId,
    pub phase_id: DbId,
    pub name: String,
    pub variant_order: i32,
    pub discount_enabled: bool,
    pub variant_discount: f64,
    /// Whether this variant participates in offer totals.
    pub include_in_offer: bool,
    /// At most one `true` per phase.
    pub is_selected: bool,
    pub architect: Option<String>,
    pub architect_commission: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new variant.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVariant {
    pub phase_id: DbId,
    pub name: String,
    /// Defaults to the next position within the phase when omitted.
    pub variant_order: Option<i32>,
    pub discount_enabled: Option<bool>,
    pub variant_discount: Option<f64>,
    pub include_in_offer: Option<bool>,
    /// Inherited from the owning project when omitted.
    pub architect: Option<String>,
    /// Inherited from the owning project when omitted.
    pub architect_commission: Option<f64>,
}

/// DTO for updating an existing variant. All fields are optional.
///
/// `discount_enabled` is deliberately absent: flipping the toggle cascades
/// to descendants and goes through `VariantRepo::toggle_discount`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateVariant {
    pub name: Option<String>,
    pub variant_discount: Option<f64>,
    pub include_in_offer: Option<bool>,
    pub architect: Option<String>,
    pub architect_commission: Option<f64>,
}

/// Which rooms a variant duplication clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomCloneMode {
    All,
    Selected,
}

/// DTO for duplicating a variant.
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicateVariant {
    /// Defaults to the source variant's own phase.
    pub target_phase_id: Option<DbId>,
    /// Name for the copy; defaults to `"<source name> (copy)"`.
    pub name: Option<String>,
    pub room_mode: RoomCloneMode,
    /// Required when `room_mode` is `selected`.
    pub selected_room_ids: Option<Vec<DbId>>,
    /// Whether each cloned room also clones its line items.
    #[serde(default = "default_include_products")]
    pub include_products: bool,
}

fn default_include_products() -> bool {
    true
}
