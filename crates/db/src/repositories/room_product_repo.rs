//! Repository for the `room_products` table.

use parkett_core::types::DbId;
use parkett_core::validation::{validate_non_negative, validate_percent};
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::models::room_product::{CreateRoomProduct, RoomProduct, UpdateRoomProduct};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, room_id, product_id, quantity, unit_price, discount, \
    discount_enabled, waste_percent, created_at, updated_at";

/// Provides CRUD operations for room line items.
pub struct RoomProductRepo;

impl RoomProductRepo {
    /// Insert a new line item.
    ///
    /// `unit_price` defaults to the catalog product's current price;
    /// `discount`/`discount_enabled` default to mirroring the owning
    /// room's state, matching what a cascade would write.
    pub async fn create(pool: &PgPool, input: &CreateRoomProduct) -> DbResult<RoomProduct> {
        if let Some(discount) = input.discount {
            validate_percent(discount, "discount").map_err(DbError::Core)?;
        }
        validate_non_negative(input.quantity, "quantity").map_err(DbError::Core)?;

        let mut tx = pool.begin().await?;

        let room: Option<(f64, bool)> =
            sqlx::query_as("SELECT discount, discount_enabled FROM rooms WHERE id = $1")
                .bind(input.room_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((room_discount, room_discount_enabled)) = room else {
            return Err(DbError::not_found("Room", input.room_id));
        };

        let catalog_price: Option<(f64,)> =
            sqlx::query_as("SELECT unit_price FROM products WHERE id = $1")
                .bind(input.product_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((catalog_price,)) = catalog_price else {
            return Err(DbError::not_found("Product", input.product_id));
        };

        let unit_price = input.unit_price.unwrap_or(catalog_price);
        let discount = input.discount.unwrap_or(room_discount);
        let discount_enabled = input.discount_enabled.unwrap_or(room_discount_enabled);

        let query = format!(
            "INSERT INTO room_products
                (room_id, product_id, quantity, unit_price, discount,
                 discount_enabled, waste_percent)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0))
             RETURNING {COLUMNS}"
        );
        let line = sqlx::query_as::<_, RoomProduct>(&query)
            .bind(input.room_id)
            .bind(input.product_id)
            .bind(input.quantity)
            .bind(unit_price)
            .bind(discount)
            .bind(discount_enabled)
            .bind(input.waste_percent)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(line)
    }

    /// Find a line item by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RoomProduct>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM room_products WHERE id = $1");
        sqlx::query_as::<_, RoomProduct>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all line items for a room, ordered by creation.
    pub async fn list_by_room(pool: &PgPool, room_id: DbId) -> Result<Vec<RoomProduct>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM room_products WHERE room_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, RoomProduct>(&query)
            .bind(room_id)
            .fetch_all(pool)
            .await
    }

    /// Update a line item. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRoomProduct,
    ) -> DbResult<Option<RoomProduct>> {
        if let Some(discount) = input.discount {
            validate_percent(discount, "discount").map_err(DbError::Core)?;
        }
        if let Some(quantity) = input.quantity {
            validate_non_negative(quantity, "quantity").map_err(DbError::Core)?;
        }
        let query = format!(
            "UPDATE room_products SET
                quantity = COALESCE($2, quantity),
                unit_price = COALESCE($3, unit_price),
                discount = COALESCE($4, discount),
                discount_enabled = COALESCE($5, discount_enabled),
                waste_percent = COALESCE($6, waste_percent),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let line = sqlx::query_as::<_, RoomProduct>(&query)
            .bind(id)
            .bind(input.quantity)
            .bind(input.unit_price)
            .bind(input.discount)
            .bind(input.discount_enabled)
            .bind(input.waste_percent)
            .fetch_optional(pool)
            .await?;
        Ok(line)
    }

    /// Delete a line item by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM room_products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
