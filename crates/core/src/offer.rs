//! Offer content types: the persisted snapshot payload and the
//! snapshot-vs-live duality.
//!
//! An Offer may carry a `conditions` JSON document freezing the
//! variant/room/product selection and totals chosen at send time. The
//! payload shape (camelCase field names) is load-bearing: previously saved
//! offers must keep parsing. When no snapshot is present, or it does not
//! match the expected shape, the offer is computed live from the hierarchy.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// One product line inside an offer breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferProduct {
    pub product_id: DbId,
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub discount_percent: f64,
    pub total_price: f64,
}

/// One room inside an offer breakdown.
///
/// `quantity` is the number of product lines in the room, not an area.
/// Kept as `f64` so historical snapshots with fractional values still
/// parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRoom {
    pub room_id: DbId,
    pub room_name: String,
    pub quantity: f64,
    pub total_price: f64,
    #[serde(default)]
    pub products: Vec<OfferProduct>,
}

/// One selected variant inside an offer breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferVariant {
    pub variant_id: DbId,
    pub variant_name: String,
    pub total_price: f64,
    #[serde(default)]
    pub rooms: Vec<OfferRoom>,
}

/// The full nested breakdown presented for an offer, and the exact shape
/// persisted in the `conditions` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferBreakdown {
    pub selected_variants: Vec<OfferVariant>,
    pub total_value: f64,
}

/// Where an offer's presented content comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum OfferSource {
    /// A deliberate selection frozen at send time; used verbatim.
    Snapshot(OfferBreakdown),
    /// No usable snapshot; recompute from the hierarchy store.
    Live,
}

impl OfferSource {
    /// Label reported alongside a preview so callers can tell which path
    /// produced it.
    pub fn label(&self) -> &'static str {
        match self {
            OfferSource::Snapshot(_) => "snapshot",
            OfferSource::Live => "live",
        }
    }
}

/// Resolve the content source for an offer from its raw `conditions`
/// column.
///
/// A missing, unparseable, or incompletely-shaped snapshot is not an
/// error: the offer silently falls back to live computation.
pub fn resolve_source(conditions: Option<&serde_json::Value>) -> OfferSource {
    match conditions {
        Some(value) => match serde_json::from_value::<OfferBreakdown>(value.clone()) {
            Ok(snapshot) => OfferSource::Snapshot(snapshot),
            Err(_) => OfferSource::Live,
        },
        None => OfferSource::Live,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot_json() -> serde_json::Value {
        json!({
            "selectedVariants": [{
                "variantId": 7,
                "variantName": "Oak premium",
                "totalPrice": 1023.75,
                "rooms": [{
                    "roomId": 12,
                    "roomName": "Living room",
                    "quantity": 1.0,
                    "totalPrice": 1023.75,
                    "products": [{
                        "productId": 3,
                        "productName": "Oak plank 180mm",
                        "quantity": 25.0,
                        "unitPrice": 45.50,
                        "discountPercent": 10.0,
                        "totalPrice": 1023.75
                    }]
                }]
            }],
            "totalValue": 1023.75
        })
    }

    #[test]
    fn well_formed_snapshot_is_used_verbatim() {
        let source = resolve_source(Some(&snapshot_json()));
        match source {
            OfferSource::Snapshot(breakdown) => {
                assert_eq!(breakdown.total_value, 1023.75);
                assert_eq!(breakdown.selected_variants.len(), 1);
                let variant = &breakdown.selected_variants[0];
                assert_eq!(variant.variant_id, 7);
                assert_eq!(variant.rooms[0].products[0].discount_percent, 10.0);
            }
            OfferSource::Live => panic!("expected snapshot source"),
        }
    }

    #[test]
    fn missing_conditions_fall_back_to_live() {
        assert_eq!(resolve_source(None), OfferSource::Live);
    }

    #[test]
    fn wrong_shape_falls_back_to_live() {
        let value = json!({"foo": "bar"});
        assert_eq!(resolve_source(Some(&value)), OfferSource::Live);
    }

    #[test]
    fn non_object_conditions_fall_back_to_live() {
        let value = json!("just a free-text note");
        assert_eq!(resolve_source(Some(&value)), OfferSource::Live);
    }

    #[test]
    fn rooms_and_products_default_to_empty() {
        let value = json!({
            "selectedVariants": [{
                "variantId": 1,
                "variantName": "Bare",
                "totalPrice": 0.0
            }],
            "totalValue": 0.0
        });
        match resolve_source(Some(&value)) {
            OfferSource::Snapshot(breakdown) => {
                assert!(breakdown.selected_variants[0].rooms.is_empty());
            }
            OfferSource::Live => panic!("expected snapshot source"),
        }
    }

    #[test]
    fn breakdown_serializes_with_camel_case_keys() {
        let breakdown = OfferBreakdown {
            selected_variants: vec![],
            total_value: 12.5,
        };
        let value = serde_json::to_value(&breakdown).unwrap();
        assert!(value.get("selectedVariants").is_some());
        assert!(value.get("totalValue").is_some());
    }

    #[test]
    fn source_labels() {
        assert_eq!(OfferSource::Live.label(), "live");
        let snap = OfferSource::Snapshot(OfferBreakdown {
            selected_variants: vec![],
            total_value: 0.0,
        });
        assert_eq!(snap.label(), "snapshot");
    }
}
