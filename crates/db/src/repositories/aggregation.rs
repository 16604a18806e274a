//! Live price aggregation over the hierarchy.
//!
//! Builds the nested variant/room/product breakdown for a phase by
//! re-applying the line formula to current rows. Line totals stay
//! unrounded; room and variant subtotals are rounded once at this
//! presentation boundary. In this path a room's presented `quantity` is
//! its line-item count.

use parkett_core::offer::{OfferProduct, OfferRoom, OfferVariant};
use parkett_core::pricing;
use parkett_core::types::DbId;
use sqlx::PgPool;

/// Compute the breakdown for every `include_in_offer` variant of a phase,
/// ordered by `variant_order`.
pub(crate) async fn phase_breakdown(
    pool: &PgPool,
    phase_id: DbId,
) -> Result<Vec<OfferVariant>, sqlx::Error> {
    let variant_rows: Vec<(DbId, String)> = sqlx::query_as(
        "SELECT id, name FROM variants \
         WHERE phase_id = $1 AND include_in_offer = true \
         ORDER BY variant_order ASC",
    )
    .bind(phase_id)
    .fetch_all(pool)
    .await?;

    let mut variants = Vec::with_capacity(variant_rows.len());
    for (variant_id, variant_name) in variant_rows {
        let room_rows: Vec<(DbId, String)> =
            sqlx::query_as("SELECT id, name FROM rooms WHERE variant_id = $1 ORDER BY id ASC")
                .bind(variant_id)
                .fetch_all(pool)
                .await?;

        let mut rooms = Vec::with_capacity(room_rows.len());
        for (room_id, room_name) in room_rows {
            rooms.push(room_breakdown(pool, room_id, room_name).await?);
        }

        let total_price = pricing::variant_total(rooms.iter().map(|r| r.total_price));
        variants.push(OfferVariant {
            variant_id,
            variant_name,
            total_price,
            rooms,
        });
    }
    Ok(variants)
}

/// Compute the presented breakdown for one room.
async fn room_breakdown(
    pool: &PgPool,
    room_id: DbId,
    room_name: String,
) -> Result<OfferRoom, sqlx::Error> {
    let line_rows: Vec<(DbId, String, f64, f64, f64, bool)> = sqlx::query_as(
        "SELECT rp.product_id, p.name, rp.quantity, rp.unit_price, rp.discount, rp.discount_enabled \
         FROM room_products rp \
         JOIN products p ON p.id = rp.product_id \
         WHERE rp.room_id = $1 \
         ORDER BY rp.id ASC",
    )
    .bind(room_id)
    .fetch_all(pool)
    .await?;

    let products: Vec<OfferProduct> = line_rows
        .into_iter()
        .map(
            |(product_id, product_name, quantity, unit_price, discount, discount_enabled)| {
                let discount_percent = if discount_enabled { discount } else { 0.0 };
                OfferProduct {
                    product_id,
                    product_name,
                    quantity,
                    unit_price,
                    discount_percent,
                    total_price: pricing::line_total(quantity, unit_price, Some(discount_percent)),
                }
            },
        )
        .collect();

    let total_price = pricing::room_total(products.iter().map(|p| p.total_price));
    Ok(OfferRoom {
        room_id,
        room_name,
        quantity: products.len() as f64,
        total_price,
        products,
    })
}
