//! Offer entity model and DTOs.

use chrono::NaiveDate;
use parkett_core::offer::OfferBreakdown;
use parkett_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `offers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Offer {
    pub id: DbId,
    pub project_id: DbId,
    pub phase_id: Option<DbId>,
    /// Globally unique.
    pub offer_number: String,
    pub status: String,
    pub valid_until: Option<NaiveDate>,
    /// Optional frozen snapshot of the breakdown; see
    /// [`parkett_core::offer::resolve_source`].
    pub conditions: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new offer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOffer {
    pub project_id: DbId,
    pub phase_id: Option<DbId>,
    pub offer_number: String,
    pub status: Option<String>,
    pub valid_until: Option<NaiveDate>,
    pub conditions: Option<serde_json::Value>,
}

/// DTO for updating an existing offer's header fields. All fields are
/// optional; `conditions` replaces the stored snapshot wholesale when
/// present.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOffer {
    pub status: Option<String>,
    pub valid_until: Option<NaiveDate>,
    pub conditions: Option<serde_json::Value>,
}

/// The preview payload returned for an offer: its nested breakdown plus
/// which computation path produced it.
#[derive(Debug, Clone, Serialize)]
pub struct OfferPreview {
    pub offer_id: DbId,
    pub offer_number: String,
    /// `"snapshot"` or `"live"`.
    pub source: &'static str,
    pub breakdown: OfferBreakdown,
}
