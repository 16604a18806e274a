//! Repository for the `projects` table.

use parkett_core::types::DbId;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, client_name, architect, architect_commission, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, client_name, architect, architect_commission)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.client_name)
            .bind(&input.architect)
            .bind(input.architect_commission)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                client_name = COALESCE($3, client_name),
                architect = COALESCE($4, architect),
                architect_commission = COALESCE($5, architect_commission),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.client_name)
            .bind(&input.architect)
            .bind(input.architect_commission)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project.
    ///
    /// Fails with `InvalidState` while the project still owns phases or
    /// offers. Returns `false` if the project does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> DbResult<bool> {
        let mut tx = pool.begin().await?;

        let exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(false);
        }

        let has_children: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM phases WHERE project_id = $1)
                 OR EXISTS (SELECT 1 FROM offers WHERE project_id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if has_children.0 {
            return Err(DbError::invalid_state(format!(
                "project {id} still owns phases or offers; remove them first"
            )));
        }

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
