//! Repository for the `variants` table.
//!
//! Besides CRUD this owns the three invariant-bearing variant operations:
//! the discount cascade (toggle propagates to every room and line item of
//! the variant, atomically), exclusive selection (at most one
//! `is_selected` per phase), and duplication (cloned rooms keep their
//! discount state verbatim).

use parkett_core::discount::DiscountConfig;
use parkett_core::offer::OfferVariant;
use parkett_core::types::DbId;
use parkett_core::validation::validate_percent;
use sqlx::{PgConnection, PgPool};

use crate::error::{DbError, DbResult};
use crate::models::ordering::ReorderInput;
use crate::models::variant::{
    CreateVariant, DuplicateVariant, RoomCloneMode, UpdateVariant, Variant,
};
use crate::repositories::aggregation;
use crate::repositories::ordering::{reorder_siblings, SiblingSet};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, phase_id, name, variant_order, discount_enabled, \
    variant_discount, include_in_offer, is_selected, architect, architect_commission, \
    created_at, updated_at";

/// Rows written by a discount cascade, for logging and tests.
#[derive(Debug, Clone, Copy)]
pub struct CascadeOutcome {
    pub rooms_updated: u64,
    pub products_updated: u64,
}

/// Provides CRUD, cascade, selection, ordering, and duplication operations
/// for variants.
pub struct VariantRepo;

impl VariantRepo {
    /// Insert a new variant.
    ///
    /// `architect`/`architect_commission` fall back to the owning
    /// project's values when not supplied. `variant_order` defaults to the
    /// next position within the phase.
    pub async fn create(pool: &PgPool, input: &CreateVariant) -> DbResult<Variant> {
        if let Some(discount) = input.variant_discount {
            validate_percent(discount, "variant_discount").map_err(DbError::Core)?;
        }

        let mut tx = pool.begin().await?;

        let project: Option<(Option<String>, Option<f64>)> = sqlx::query_as(
            "SELECT p.architect, p.architect_commission \
             FROM projects p JOIN phases ph ON ph.project_id = p.id \
             WHERE ph.id = $1",
        )
        .bind(input.phase_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((project_architect, project_commission)) = project else {
            return Err(DbError::not_found("Phase", input.phase_id));
        };

        let order = match input.variant_order {
            Some(order) => order,
            None => {
                let next: (i32,) = sqlx::query_as(
                    "SELECT COALESCE(MAX(variant_order), 0) + 1 FROM variants WHERE phase_id = $1",
                )
                .bind(input.phase_id)
                .fetch_one(&mut *tx)
                .await?;
                next.0
            }
        };

        let architect = input.architect.clone().or(project_architect);
        let commission = input.architect_commission.or(project_commission);

        let query = format!(
            "INSERT INTO variants
                (phase_id, name, variant_order, discount_enabled, variant_discount,
                 include_in_offer, architect, architect_commission)
             VALUES ($1, $2, $3, COALESCE($4, false), COALESCE($5, 0),
                     COALESCE($6, false), $7, $8)
             RETURNING {COLUMNS}"
        );
        let variant = sqlx::query_as::<_, Variant>(&query)
            .bind(input.phase_id)
            .bind(&input.name)
            .bind(order)
            .bind(input.discount_enabled)
            .bind(input.variant_discount)
            .bind(input.include_in_offer)
            .bind(&architect)
            .bind(commission)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(variant)
    }

    /// Find a variant by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Variant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM variants WHERE id = $1");
        sqlx::query_as::<_, Variant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all variants for a phase, ordered by position.
    pub async fn list_by_phase(pool: &PgPool, phase_id: DbId) -> Result<Vec<Variant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM variants WHERE phase_id = $1 ORDER BY variant_order ASC"
        );
        sqlx::query_as::<_, Variant>(&query)
            .bind(phase_id)
            .fetch_all(pool)
            .await
    }

    /// Update a variant's plain fields. Only non-`None` fields are applied.
    ///
    /// The discount toggle is excluded here; it cascades and goes through
    /// [`VariantRepo::toggle_discount`].
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVariant,
    ) -> DbResult<Option<Variant>> {
        if let Some(discount) = input.variant_discount {
            validate_percent(discount, "variant_discount").map_err(DbError::Core)?;
        }
        let query = format!(
            "UPDATE variants SET
                name = COALESCE($2, name),
                variant_discount = COALESCE($3, variant_discount),
                include_in_offer = COALESCE($4, include_in_offer),
                architect = COALESCE($5, architect),
                architect_commission = COALESCE($6, architect_commission),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let variant = sqlx::query_as::<_, Variant>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.variant_discount)
            .bind(input.include_in_offer)
            .bind(&input.architect)
            .bind(input.architect_commission)
            .fetch_optional(pool)
            .await?;
        Ok(variant)
    }

    /// Delete a variant.
    ///
    /// Fails with `InvalidState` if any of its rooms still owns line
    /// items; empty rooms are removed together with the variant. Returns
    /// `false` if the variant does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> DbResult<bool> {
        let mut tx = pool.begin().await?;

        let exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM variants WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(false);
        }

        let has_products: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM room_products rp
                JOIN rooms r ON rp.room_id = r.id
                WHERE r.variant_id = $1
             )",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if has_products.0 {
            return Err(DbError::invalid_state(format!(
                "variant {id} still owns product line items; remove the products first"
            )));
        }

        sqlx::query("DELETE FROM rooms WHERE variant_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM variants WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip a variant's discount toggle and cascade the resolved state to
    /// every room and line item it owns, in one transaction.
    pub async fn toggle_discount(pool: &PgPool, id: DbId, enabled: bool) -> DbResult<Variant> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE variants SET discount_enabled = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let variant = sqlx::query_as::<_, Variant>(&query)
            .bind(id)
            .bind(enabled)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::not_found("Variant", id))?;

        let outcome = Self::apply_discount_cascade(&mut tx, &variant).await?;
        tx.commit().await?;

        tracing::info!(
            variant_id = id,
            enabled,
            rooms = outcome.rooms_updated,
            products = outcome.products_updated,
            "applied discount cascade"
        );
        Ok(variant)
    }

    /// Re-resolve the discount state for every room of `variant` and
    /// mirror it onto their line items.
    ///
    /// Runs on the caller's connection so it stays inside whatever
    /// transaction triggered it; exposed so the cascade can be exercised
    /// (and audited) in isolation.
    pub async fn apply_discount_cascade(
        conn: &mut PgConnection,
        variant: &Variant,
    ) -> DbResult<CascadeOutcome> {
        let phase: (bool, f64) =
            sqlx::query_as("SELECT discount_enabled, phase_discount FROM phases WHERE id = $1")
                .bind(variant.phase_id)
                .fetch_one(&mut *conn)
                .await?;

        let resolved = parkett_core::discount::resolve_room_discount(
            DiscountConfig {
                enabled: phase.0,
                percent: phase.1,
            },
            DiscountConfig {
                enabled: variant.discount_enabled,
                percent: variant.variant_discount,
            },
            None,
        );

        let rooms = sqlx::query(
            "UPDATE rooms SET discount = $1, discount_enabled = $2, updated_at = NOW() \
             WHERE variant_id = $3",
        )
        .bind(resolved.discount)
        .bind(resolved.discount_enabled)
        .bind(variant.id)
        .execute(&mut *conn)
        .await?;

        let products = sqlx::query(
            "UPDATE room_products SET discount = $1, discount_enabled = $2, updated_at = NOW() \
             WHERE room_id IN (SELECT id FROM rooms WHERE variant_id = $3)",
        )
        .bind(resolved.discount)
        .bind(resolved.discount_enabled)
        .bind(variant.id)
        .execute(&mut *conn)
        .await?;

        Ok(CascadeOutcome {
            rooms_updated: rooms.rows_affected(),
            products_updated: products.rows_affected(),
        })
    }

    /// Re-resolve the discount state of every variant's rooms under a
    /// phase, after the phase's own toggle changed. Runs on the caller's
    /// connection; each variant resolves against its own configuration.
    pub(crate) async fn cascade_phase(
        conn: &mut PgConnection,
        phase_id: DbId,
    ) -> DbResult<CascadeOutcome> {
        let query = format!("SELECT {COLUMNS} FROM variants WHERE phase_id = $1");
        let variants = sqlx::query_as::<_, Variant>(&query)
            .bind(phase_id)
            .fetch_all(&mut *conn)
            .await?;

        let mut total = CascadeOutcome {
            rooms_updated: 0,
            products_updated: 0,
        };
        for variant in &variants {
            let outcome = Self::apply_discount_cascade(&mut *conn, variant).await?;
            total.rooms_updated += outcome.rooms_updated;
            total.products_updated += outcome.products_updated;
        }
        Ok(total)
    }

    /// Mark a variant as the selected one for its phase, un-marking every
    /// sibling in the same transaction.
    pub async fn set_selected(pool: &PgPool, id: DbId) -> DbResult<Variant> {
        let mut tx = pool.begin().await?;

        let phase: Option<(DbId,)> = sqlx::query_as("SELECT phase_id FROM variants WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some((phase_id,)) = phase else {
            return Err(DbError::not_found("Variant", id));
        };

        // Unset current selection (if any)
        sqlx::query(
            "UPDATE variants SET is_selected = false, updated_at = NOW() \
             WHERE phase_id = $1 AND is_selected = true",
        )
        .bind(phase_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE variants SET is_selected = true, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let variant = sqlx::query_as::<_, Variant>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(variant)
    }

    /// Reorder a phase's variants atomically via stage-then-assign.
    ///
    /// Returns the phase's variants in their new order.
    pub async fn reorder(
        pool: &PgPool,
        phase_id: DbId,
        input: ReorderInput,
    ) -> DbResult<Vec<Variant>> {
        let assignments = input.into_pairs();
        let mut tx = pool.begin().await?;
        reorder_siblings(&mut tx, SiblingSet::Variants, phase_id, &assignments).await?;
        tx.commit().await?;
        Ok(Self::list_by_phase(pool, phase_id).await?)
    }

    /// Duplicate a variant, optionally into another phase.
    ///
    /// The copy starts as a draft (`include_in_offer = false`, never
    /// selected) at the next free position in the target phase. Cloned
    /// rooms keep their `discount`/`discount_enabled` verbatim from the
    /// source, without re-resolving against the target phase's discount
    /// configuration.
    pub async fn duplicate(
        pool: &PgPool,
        variant_id: DbId,
        options: &DuplicateVariant,
    ) -> DbResult<Variant> {
        if options.room_mode == RoomCloneMode::Selected
            && options.selected_room_ids.as_deref().unwrap_or(&[]).is_empty()
        {
            return Err(DbError::invalid_state(
                "room_mode 'selected' requires a non-empty selected_room_ids list",
            ));
        }

        let mut tx = pool.begin().await?;

        let source_query = format!("SELECT {COLUMNS} FROM variants WHERE id = $1");
        let source = sqlx::query_as::<_, Variant>(&source_query)
            .bind(variant_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::not_found("Variant", variant_id))?;

        let target_phase_id = options.target_phase_id.unwrap_or(source.phase_id);
        let target_exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM phases WHERE id = $1")
            .bind(target_phase_id)
            .fetch_optional(&mut *tx)
            .await?;
        if target_exists.is_none() {
            return Err(DbError::not_found("Phase", target_phase_id));
        }

        let next_order: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(variant_order), 0) + 1 FROM variants WHERE phase_id = $1",
        )
        .bind(target_phase_id)
        .fetch_one(&mut *tx)
        .await?;

        let name = options
            .name
            .clone()
            .unwrap_or_else(|| format!("{} (copy)", source.name));

        let insert_query = format!(
            "INSERT INTO variants
                (phase_id, name, variant_order, discount_enabled, variant_discount,
                 include_in_offer, is_selected, architect, architect_commission)
             VALUES ($1, $2, $3, $4, $5, false, false, $6, $7)
             RETURNING {COLUMNS}"
        );
        let clone = sqlx::query_as::<_, Variant>(&insert_query)
            .bind(target_phase_id)
            .bind(&name)
            .bind(next_order.0)
            .bind(source.discount_enabled)
            .bind(source.variant_discount)
            .bind(&source.architect)
            .bind(source.architect_commission)
            .fetch_one(&mut *tx)
            .await?;

        let room_rows: Vec<(DbId,)> = match options.room_mode {
            RoomCloneMode::All => {
                sqlx::query_as("SELECT id FROM rooms WHERE variant_id = $1 ORDER BY id ASC")
                    .bind(source.id)
                    .fetch_all(&mut *tx)
                    .await?
            }
            RoomCloneMode::Selected => {
                let ids = options.selected_room_ids.as_deref().unwrap_or(&[]);
                sqlx::query_as(
                    "SELECT id FROM rooms WHERE variant_id = $1 AND id = ANY($2) ORDER BY id ASC",
                )
                .bind(source.id)
                .bind(ids)
                .fetch_all(&mut *tx)
                .await?
            }
        };

        for (room_id,) in &room_rows {
            // Discount state copied verbatim, not re-resolved.
            let new_room: (DbId,) = sqlx::query_as(
                "INSERT INTO rooms
                    (variant_id, name, area, discount, discount_enabled, waste_percent)
                 SELECT $1, name, area, discount, discount_enabled, waste_percent
                 FROM rooms WHERE id = $2
                 RETURNING id",
            )
            .bind(clone.id)
            .bind(room_id)
            .fetch_one(&mut *tx)
            .await?;

            if options.include_products {
                sqlx::query(
                    "INSERT INTO room_products
                        (room_id, product_id, quantity, unit_price, discount,
                         discount_enabled, waste_percent)
                     SELECT $1, product_id, quantity, unit_price, discount,
                            discount_enabled, waste_percent
                     FROM room_products WHERE room_id = $2",
                )
                .bind(new_room.0)
                .bind(room_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        tracing::info!(
            source_variant = variant_id,
            clone_variant = clone.id,
            target_phase = target_phase_id,
            rooms = room_rows.len(),
            "duplicated variant"
        );
        Ok(clone)
    }

    /// Candidate variants for composing an offer: `include_in_offer` only,
    /// ordered by position, each with its computed breakdown and totals.
    pub async fn list_for_offer(pool: &PgPool, phase_id: DbId) -> DbResult<Vec<OfferVariant>> {
        Ok(aggregation::phase_breakdown(pool, phase_id).await?)
    }
}
