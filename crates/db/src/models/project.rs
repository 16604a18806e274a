//! Project entity model and DTOs.

use parkett_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub client_name: Option<String>,
    pub architect: Option<String>,
    /// Percent commission for the architect, inherited by variants created
    /// under this project when not explicitly supplied.
    pub architect_commission: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub client_name: Option<String>,
    pub architect: Option<String>,
    pub architect_commission: Option<f64>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub client_name: Option<String>,
    pub architect: Option<String>,
    pub architect_commission: Option<f64>,
}
