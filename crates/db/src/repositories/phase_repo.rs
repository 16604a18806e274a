//! Repository for the `phases` table.

use parkett_core::types::DbId;
use parkett_core::validation::validate_percent;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::models::ordering::ReorderInput;
use crate::models::phase::{CreatePhase, Phase, UpdatePhase};
use crate::repositories::ordering::{reorder_siblings, SiblingSet};
use crate::repositories::VariantRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, phase_order, status, \
    discount_enabled, phase_discount, created_at, updated_at";

/// Provides CRUD and ordering operations for phases.
pub struct PhaseRepo;

impl PhaseRepo {
    /// Insert a new phase.
    ///
    /// An explicit `phase_order` colliding with an existing sibling is a
    /// conflict; when omitted, the next free position is assigned.
    pub async fn create(pool: &PgPool, input: &CreatePhase) -> DbResult<Phase> {
        if let Some(discount) = input.phase_discount {
            validate_percent(discount, "phase_discount").map_err(DbError::Core)?;
        }

        let mut tx = pool.begin().await?;

        let project_exists: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1")
                .bind(input.project_id)
                .fetch_optional(&mut *tx)
                .await?;
        if project_exists.is_none() {
            return Err(DbError::not_found("Project", input.project_id));
        }

        let order = match input.phase_order {
            Some(order) => {
                let taken: Option<(DbId,)> = sqlx::query_as(
                    "SELECT id FROM phases WHERE project_id = $1 AND phase_order = $2",
                )
                .bind(input.project_id)
                .bind(order)
                .fetch_optional(&mut *tx)
                .await?;
                if taken.is_some() {
                    return Err(DbError::conflict(format!(
                        "phase_order {order} is already taken in project {}",
                        input.project_id
                    )));
                }
                order
            }
            None => {
                let next: (i32,) = sqlx::query_as(
                    "SELECT COALESCE(MAX(phase_order), 0) + 1 FROM phases WHERE project_id = $1",
                )
                .bind(input.project_id)
                .fetch_one(&mut *tx)
                .await?;
                next.0
            }
        };

        let query = format!(
            "INSERT INTO phases
                (project_id, name, phase_order, status, discount_enabled, phase_discount)
             VALUES ($1, $2, $3, COALESCE($4, 'created'), COALESCE($5, false), COALESCE($6, 0))
             RETURNING {COLUMNS}"
        );
        let phase = sqlx::query_as::<_, Phase>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(order)
            .bind(&input.status)
            .bind(input.discount_enabled)
            .bind(input.phase_discount)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(phase)
    }

    /// Find a phase by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Phase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM phases WHERE id = $1");
        sqlx::query_as::<_, Phase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all phases for a project, ordered by position.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Phase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM phases WHERE project_id = $1 ORDER BY phase_order ASC"
        );
        sqlx::query_as::<_, Phase>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a phase's plain fields. Only non-`None` fields are applied.
    ///
    /// The discount toggle is excluded here; it cascades and goes through
    /// [`PhaseRepo::toggle_discount`]. Returns `None` if no row with the
    /// given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePhase,
    ) -> DbResult<Option<Phase>> {
        if let Some(discount) = input.phase_discount {
            validate_percent(discount, "phase_discount").map_err(DbError::Core)?;
        }
        let query = format!(
            "UPDATE phases SET
                name = COALESCE($2, name),
                status = COALESCE($3, status),
                phase_discount = COALESCE($4, phase_discount),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let phase = sqlx::query_as::<_, Phase>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.status)
            .bind(input.phase_discount)
            .fetch_optional(pool)
            .await?;
        Ok(phase)
    }

    /// Flip a phase's discount toggle and cascade the re-resolved state
    /// through every variant, room, and line item it owns, in one
    /// transaction.
    pub async fn toggle_discount(pool: &PgPool, id: DbId, enabled: bool) -> DbResult<Phase> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE phases SET discount_enabled = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let phase = sqlx::query_as::<_, Phase>(&query)
            .bind(id)
            .bind(enabled)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::not_found("Phase", id))?;

        let outcome = VariantRepo::cascade_phase(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(
            phase_id = id,
            enabled,
            rooms = outcome.rooms_updated,
            products = outcome.products_updated,
            "applied discount cascade"
        );
        Ok(phase)
    }

    /// Delete a phase.
    ///
    /// Fails with `InvalidState` if any room under the phase still owns
    /// line items; empty descendants (rooms without products, variants
    /// without rooms) are removed together with the phase. Offers pointing
    /// at the phase are detached, not deleted. Returns `false` if the
    /// phase does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> DbResult<bool> {
        let mut tx = pool.begin().await?;

        let exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM phases WHERE id = $1")
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
                JOIN variants v ON r.variant_id = v.id
                WHERE v.phase_id = $1
             )",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if has_products.0 {
            return Err(DbError::invalid_state(format!(
                "phase {id} still owns product line items; remove the products first"
            )));
        }

        sqlx::query(
            "DELETE FROM rooms WHERE variant_id IN (SELECT id FROM variants WHERE phase_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM variants WHERE phase_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE offers SET phase_id = NULL, updated_at = NOW() WHERE phase_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM phases WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reorder a project's phases atomically via stage-then-assign.
    ///
    /// Returns the project's phases in their new order. Any foreign ID or
    /// duplicate target position aborts before any write.
    pub async fn reorder(
        pool: &PgPool,
        project_id: DbId,
        input: ReorderInput,
    ) -> DbResult<Vec<Phase>> {
        let assignments = input.into_pairs();
        let mut tx = pool.begin().await?;
        reorder_siblings(&mut tx, SiblingSet::Phases, project_id, &assignments).await?;
        tx.commit().await?;
        Ok(Self::list_by_project(pool, project_id).await?)
    }
}
