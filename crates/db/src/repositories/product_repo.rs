//! Repository for the `products` catalog table.
//!
//! Catalog management proper lives outside this service; these are the
//! lookups and inserts the offer hierarchy needs.

use parkett_core::types::DbId;
use sqlx::PgPool;

use crate::models::product::{CreateProduct, Product};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, sku, unit, unit_price, created_at, updated_at";

/// Provides minimal catalog operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product. A duplicate SKU violates
    /// `uq_products_sku` and surfaces as a conflict.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (name, sku, unit, unit_price)
             VALUES ($1, $2, COALESCE($3, 'm2'), COALESCE($4, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(&input.sku)
            .bind(&input.unit)
            .bind(input.unit_price)
            .fetch_one(pool)
            .await
    }

    /// Find a product by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all products ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products ORDER BY name ASC");
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }
}
