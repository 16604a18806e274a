//! Repository for the `rooms` table.
//!
//! Room creation and duplication both derive their discount state through
//! the cascade resolver: a room always obeys the discount policy of the
//! commercial context (variant + phase) it lands in.

use parkett_core::discount::{resolve_room_discount, DiscountConfig, ResolvedDiscount};
use parkett_core::types::DbId;
use parkett_core::validation::{validate_non_negative, validate_percent};
use sqlx::{PgConnection, PgPool};

use crate::error::{DbError, DbResult};
use crate::models::room::{CreateRoom, DuplicateRoom, ProductCloneMode, Room, UpdateRoom};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, variant_id, name, area, discount, discount_enabled, \
    waste_percent, created_at, updated_at";

/// Provides CRUD and duplication operations for rooms.
pub struct RoomRepo;

impl RoomRepo {
    /// Insert a new room under a variant.
    ///
    /// The stored discount state is whatever the cascade resolver decides
    /// for the variant/phase pair and the optional explicit override.
    pub async fn create(pool: &PgPool, input: &CreateRoom) -> DbResult<Room> {
        if let Some(discount) = input.discount {
            validate_percent(discount, "discount").map_err(DbError::Core)?;
        }
        if let Some(area) = input.area {
            validate_non_negative(area, "area").map_err(DbError::Core)?;
        }

        let mut tx = pool.begin().await?;

        let resolved = Self::resolve_for_variant(&mut tx, input.variant_id, input.discount).await?;

        let query = format!(
            "INSERT INTO rooms
                (variant_id, name, area, discount, discount_enabled, waste_percent)
             VALUES ($1, $2, COALESCE($3, 0), $4, $5, COALESCE($6, 0))
             RETURNING {COLUMNS}"
        );
        let room = sqlx::query_as::<_, Room>(&query)
            .bind(input.variant_id)
            .bind(&input.name)
            .bind(input.area)
            .bind(resolved.discount)
            .bind(resolved.discount_enabled)
            .bind(input.waste_percent)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(room)
    }

    /// Find a room by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all rooms for a variant, ordered by creation.
    pub async fn list_by_variant(pool: &PgPool, variant_id: DbId) -> Result<Vec<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE variant_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Room>(&query)
            .bind(variant_id)
            .fetch_all(pool)
            .await
    }

    /// Update a room's plain fields. Only non-`None` fields are applied.
    ///
    /// The discount pair is not updatable here; the cascade resolver owns
    /// it after creation.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateRoom) -> DbResult<Option<Room>> {
        if let Some(area) = input.area {
            validate_non_negative(area, "area").map_err(DbError::Core)?;
        }
        let query = format!(
            "UPDATE rooms SET
                name = COALESCE($2, name),
                area = COALESCE($3, area),
                waste_percent = COALESCE($4, waste_percent),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let room = sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.area)
            .bind(input.waste_percent)
            .fetch_optional(pool)
            .await?;
        Ok(room)
    }

    /// Delete a room.
    ///
    /// Fails with `InvalidState` while the room owns line items. Returns
    /// `false` if the room does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> DbResult<bool> {
        let mut tx = pool.begin().await?;

        let exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(false);
        }

        let has_products: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM room_products WHERE room_id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if has_products.0 {
            return Err(DbError::invalid_state(format!(
                "room {id} still owns product line items; remove the products first"
            )));
        }

        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Duplicate a room, optionally into another variant.
    ///
    /// The copy's discount state is re-resolved against the *target*
    /// variant/phase configuration: a source discount only survives as the
    /// explicit value when the source had its discount enabled, and a
    /// disabled target context always forces `{0, false}`. Line items are
    /// cloned verbatim per `product_mode`; media attachments on the source
    /// are not duplicated.
    pub async fn duplicate(pool: &PgPool, room_id: DbId, options: &DuplicateRoom) -> DbResult<Room> {
        if options.product_mode == ProductCloneMode::Selected
            && options
                .selected_product_ids
                .as_deref()
                .unwrap_or(&[])
                .is_empty()
        {
            return Err(DbError::invalid_state(
                "product_mode 'selected' requires a non-empty selected_product_ids list",
            ));
        }

        let mut tx = pool.begin().await?;

        let source_query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        let source = sqlx::query_as::<_, Room>(&source_query)
            .bind(room_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::not_found("Room", room_id))?;

        let target_variant_id = options.target_variant_id.unwrap_or(source.variant_id);
        let explicit = source.discount_enabled.then_some(source.discount);
        let resolved = Self::resolve_for_variant(&mut tx, target_variant_id, explicit).await?;

        let name = options
            .name
            .clone()
            .unwrap_or_else(|| format!("{} (copy)", source.name));

        let insert_query = format!(
            "INSERT INTO rooms
                (variant_id, name, area, discount, discount_enabled, waste_percent)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let clone = sqlx::query_as::<_, Room>(&insert_query)
            .bind(target_variant_id)
            .bind(&name)
            .bind(source.area)
            .bind(resolved.discount)
            .bind(resolved.discount_enabled)
            .bind(source.waste_percent)
            .fetch_one(&mut *tx)
            .await?;

        match options.product_mode {
            ProductCloneMode::All => {
                sqlx::query(
                    "INSERT INTO room_products
                        (room_id, product_id, quantity, unit_price, discount,
                         discount_enabled, waste_percent)
                     SELECT $1, product_id, quantity, unit_price, discount,
                            discount_enabled, waste_percent
                     FROM room_products WHERE room_id = $2",
                )
                .bind(clone.id)
                .bind(source.id)
                .execute(&mut *tx)
                .await?;
            }
            ProductCloneMode::Selected => {
                let ids = options.selected_product_ids.as_deref().unwrap_or(&[]);
                sqlx::query(
                    "INSERT INTO room_products
                        (room_id, product_id, quantity, unit_price, discount,
                         discount_enabled, waste_percent)
                     SELECT $1, product_id, quantity, unit_price, discount,
                            discount_enabled, waste_percent
                     FROM room_products WHERE room_id = $2 AND id = ANY($3)",
                )
                .bind(clone.id)
                .bind(source.id)
                .bind(ids)
                .execute(&mut *tx)
                .await?;
            }
            ProductCloneMode::None => {}
        }

        tx.commit().await?;
        tracing::info!(
            source_room = room_id,
            clone_room = clone.id,
            target_variant = target_variant_id,
            "duplicated room"
        );
        Ok(clone)
    }

    /// Resolve the discount state a room should carry under `variant_id`,
    /// or `NotFound` if the variant does not exist.
    async fn resolve_for_variant(
        conn: &mut PgConnection,
        variant_id: DbId,
        explicit: Option<f64>,
    ) -> DbResult<ResolvedDiscount> {
        let context: Option<(bool, f64, bool, f64)> = sqlx::query_as(
            "SELECT v.discount_enabled, v.variant_discount, p.discount_enabled, p.phase_discount \
             FROM variants v JOIN phases p ON v.phase_id = p.id \
             WHERE v.id = $1",
        )
        .bind(variant_id)
        .fetch_optional(&mut *conn)
        .await?;
        let Some((variant_enabled, variant_discount, phase_enabled, phase_discount)) = context
        else {
            return Err(DbError::not_found("Variant", variant_id));
        };

        Ok(resolve_room_discount(
            DiscountConfig {
                enabled: phase_enabled,
                percent: phase_discount,
            },
            DiscountConfig {
                enabled: variant_enabled,
                percent: variant_discount,
            },
            explicit,
        ))
    }
}
