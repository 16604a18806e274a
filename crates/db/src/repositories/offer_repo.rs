//! Repository for the `offers` table.
//!
//! The preview operation resolves the snapshot-vs-live duality: a
//! well-formed `conditions` snapshot is presented verbatim, anything else
//! falls back to live aggregation over the hierarchy.

use parkett_core::offer::{resolve_source, OfferBreakdown, OfferSource};
use parkett_core::pricing;
use parkett_core::types::DbId;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::models::offer::{CreateOffer, Offer, OfferPreview, UpdateOffer};
use crate::repositories::aggregation;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, phase_id, offer_number, status, valid_until, \
    conditions, created_at, updated_at";

/// Provides CRUD and preview operations for offers.
pub struct OfferRepo;

impl OfferRepo {
    /// Insert a new offer.
    ///
    /// A duplicate `offer_number` violates `uq_offers_offer_number` and
    /// surfaces as a conflict.
    pub async fn create(pool: &PgPool, input: &CreateOffer) -> DbResult<Offer> {
        let mut tx = pool.begin().await?;

        let project_exists: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1")
                .bind(input.project_id)
                .fetch_optional(&mut *tx)
                .await?;
        if project_exists.is_none() {
            return Err(DbError::not_found("Project", input.project_id));
        }

        if let Some(phase_id) = input.phase_id {
            let phase_exists: Option<(DbId,)> =
                sqlx::query_as("SELECT id FROM phases WHERE id = $1")
                    .bind(phase_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if phase_exists.is_none() {
                return Err(DbError::not_found("Phase", phase_id));
            }
        }

        let query = format!(
            "INSERT INTO offers
                (project_id, phase_id, offer_number, status, valid_until, conditions)
             VALUES ($1, $2, $3, COALESCE($4, 'draft'), $5, $6)
             RETURNING {COLUMNS}"
        );
        let offer = sqlx::query_as::<_, Offer>(&query)
            .bind(input.project_id)
            .bind(input.phase_id)
            .bind(&input.offer_number)
            .bind(&input.status)
            .bind(input.valid_until)
            .bind(&input.conditions)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(offer)
    }

    /// Find an offer by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Offer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM offers WHERE id = $1");
        sqlx::query_as::<_, Offer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all offers for a project, newest first.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Offer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM offers WHERE project_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update an offer's header fields. Only non-`None` fields are
    /// applied; `conditions` replaces the stored snapshot wholesale.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOffer,
    ) -> Result<Option<Offer>, sqlx::Error> {
        let query = format!(
            "UPDATE offers SET
                status = COALESCE($2, status),
                valid_until = COALESCE($3, valid_until),
                conditions = COALESCE($4, conditions),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(input.valid_until)
            .bind(&input.conditions)
            .fetch_optional(pool)
            .await
    }

    /// Compute the presented breakdown for an offer.
    ///
    /// Snapshot path when `conditions` parses to a full breakdown, live
    /// path otherwise. An offer with neither a snapshot nor a phase
    /// previews as an empty breakdown.
    pub async fn preview(pool: &PgPool, id: DbId) -> DbResult<OfferPreview> {
        let offer = Self::find_by_id(pool, id)
            .await?
            .ok_or(DbError::not_found("Offer", id))?;

        let source = resolve_source(offer.conditions.as_ref());
        let label = source.label();
        let breakdown = match source {
            OfferSource::Snapshot(breakdown) => breakdown,
            OfferSource::Live => {
                let selected_variants = match offer.phase_id {
                    Some(phase_id) => aggregation::phase_breakdown(pool, phase_id).await?,
                    None => Vec::new(),
                };
                let total_value =
                    pricing::round2(selected_variants.iter().map(|v| v.total_price).sum());
                OfferBreakdown {
                    selected_variants,
                    total_value,
                }
            }
        };

        Ok(OfferPreview {
            offer_id: offer.id,
            offer_number: offer.offer_number,
            source: label,
            breakdown,
        })
    }
}
