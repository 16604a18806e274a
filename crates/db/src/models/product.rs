//! Catalog product model and DTOs.
//!
//! The catalog itself is managed elsewhere; this is the minimal record the
//! offer hierarchy's line items reference.

use parkett_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub sku: String,
    pub unit: String,
    pub unit_price: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub sku: String,
    /// Defaults to `'m2'` if omitted.
    pub unit: Option<String>,
    /// Defaults to 0 if omitted.
    pub unit_price: Option<f64>,
}
