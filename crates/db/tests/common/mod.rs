//! Shared builders for repository integration tests.
//!
//! Each helper creates one entity with sensible defaults through the real
//! repository layer, so tests read as scenarios rather than DTO noise.

#![allow(dead_code)]

use parkett_db::models::phase::{CreatePhase, Phase};
use parkett_db::models::product::{CreateProduct, Product};
use parkett_db::models::project::{CreateProject, Project};
use parkett_db::models::room::{CreateRoom, Room};
use parkett_db::models::room_product::{CreateRoomProduct, RoomProduct};
use parkett_db::models::variant::{CreateVariant, Variant};
use parkett_db::repositories::{
    PhaseRepo, ProductRepo, ProjectRepo, RoomProductRepo, RoomRepo, VariantRepo,
};
use sqlx::PgPool;

pub async fn project(pool: &PgPool) -> Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Riverside Tower".to_string(),
            client_name: Some("Huber Immobilien".to_string()),
            architect: Some("Studio Meier".to_string()),
            architect_commission: Some(5.0),
        },
    )
    .await
    .unwrap()
}

pub async fn phase(pool: &PgPool, project_id: i64, discount_enabled: bool, discount: f64) -> Phase {
    PhaseRepo::create(
        pool,
        &CreatePhase {
            project_id,
            name: "Construction phase".to_string(),
            phase_order: None,
            status: None,
            discount_enabled: Some(discount_enabled),
            phase_discount: Some(discount),
        },
    )
    .await
    .unwrap()
}

pub async fn variant(pool: &PgPool, phase_id: i64, discount_enabled: bool) -> Variant {
    VariantRepo::create(
        pool,
        &CreateVariant {
            phase_id,
            name: "Oak premium".to_string(),
            variant_order: None,
            discount_enabled: Some(discount_enabled),
            variant_discount: Some(0.0),
            include_in_offer: Some(true),
            architect: None,
            architect_commission: None,
        },
    )
    .await
    .unwrap()
}

pub async fn room(pool: &PgPool, variant_id: i64, explicit_discount: Option<f64>) -> Room {
    RoomRepo::create(
        pool,
        &CreateRoom {
            variant_id,
            name: "Living room".to_string(),
            area: Some(25.0),
            discount: explicit_discount,
            waste_percent: Some(5.0),
        },
    )
    .await
    .unwrap()
}

pub async fn product(pool: &PgPool, sku: &str) -> Product {
    ProductRepo::create(
        pool,
        &CreateProduct {
            name: format!("Oak plank {sku}"),
            sku: sku.to_string(),
            unit: None,
            unit_price: Some(45.50),
        },
    )
    .await
    .unwrap()
}

pub async fn line(
    pool: &PgPool,
    room_id: i64,
    product_id: i64,
    quantity: f64,
    unit_price: f64,
) -> RoomProduct {
    RoomProductRepo::create(
        pool,
        &CreateRoomProduct {
            room_id,
            product_id,
            quantity,
            unit_price: Some(unit_price),
            discount: None,
            discount_enabled: None,
            waste_percent: None,
        },
    )
    .await
    .unwrap()
}
