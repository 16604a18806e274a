//! Integration tests for room and variant duplication.
//!
//! The two operations treat discount state differently on purpose: a
//! duplicated room re-resolves against its target context, a duplicated
//! variant carries its rooms' discount state over verbatim.

mod common;

use assert_matches::assert_matches;
use parkett_core::error::CoreError;
use parkett_db::error::DbError;
use parkett_db::models::room::{DuplicateRoom, ProductCloneMode};
use parkett_db::models::variant::{DuplicateVariant, RoomCloneMode};
use parkett_db::repositories::{RoomProductRepo, RoomRepo, VariantRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn room_copy_re_resolves_against_target_context(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 10.0).await;
    let source_variant = common::variant(&pool, phase.id, true).await;
    let room = common::room(&pool, source_variant.id, Some(7.5)).await;

    let disabled_phase = common::phase(&pool, project.id, false, 20.0).await;
    let disabled_variant = common::variant(&pool, disabled_phase.id, true).await;

    let clone = RoomRepo::duplicate(
        &pool,
        room.id,
        &DuplicateRoom {
            target_variant_id: Some(disabled_variant.id),
            name: None,
            product_mode: ProductCloneMode::None,
            selected_product_ids: None,
        },
    )
    .await
    .unwrap();

    // The source's 7.5% does not survive a disabled target context.
    assert_eq!(clone.variant_id, disabled_variant.id);
    assert_eq!(clone.discount, 0.0);
    assert!(!clone.discount_enabled);
    assert_eq!(clone.name, "Living room (copy)");
    assert_eq!(clone.area, room.area);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn room_copy_keeps_explicit_discount_under_enabled_target(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 10.0).await;
    let variant = common::variant(&pool, phase.id, true).await;
    let room = common::room(&pool, variant.id, Some(7.5)).await;

    let other_phase = common::phase(&pool, project.id, true, 15.0).await;
    let other_variant = common::variant(&pool, other_phase.id, true).await;

    let clone = RoomRepo::duplicate(
        &pool,
        room.id,
        &DuplicateRoom {
            target_variant_id: Some(other_variant.id),
            name: Some("Bedroom".to_string()),
            product_mode: ProductCloneMode::None,
            selected_product_ids: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(clone.name, "Bedroom");
    assert_eq!(clone.discount, 7.5);
    assert!(clone.discount_enabled);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn disabled_source_room_inherits_target_phase_discount(pool: PgPool) {
    let project = common::project(&pool).await;
    let off_phase = common::phase(&pool, project.id, false, 0.0).await;
    let off_variant = common::variant(&pool, off_phase.id, false).await;
    let room = common::room(&pool, off_variant.id, Some(7.5)).await;
    assert!(!room.discount_enabled);

    let on_phase = common::phase(&pool, project.id, true, 15.0).await;
    let on_variant = common::variant(&pool, on_phase.id, true).await;

    let clone = RoomRepo::duplicate(
        &pool,
        room.id,
        &DuplicateRoom {
            target_variant_id: Some(on_variant.id),
            name: None,
            product_mode: ProductCloneMode::None,
            selected_product_ids: None,
        },
    )
    .await
    .unwrap();

    // A disabled source carries no explicit value, so the target phase's
    // 15% applies.
    assert_eq!(clone.discount, 15.0);
    assert!(clone.discount_enabled);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn room_product_clone_modes(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 10.0).await;
    let variant = common::variant(&pool, phase.id, true).await;
    let room = common::room(&pool, variant.id, None).await;
    let oak = common::product(&pool, "OAK-180").await;
    let walnut = common::product(&pool, "WAL-220").await;
    let oak_line = common::line(&pool, room.id, oak.id, 25.0, 45.50).await;
    common::line(&pool, room.id, walnut.id, 10.0, 62.00).await;

    let all = RoomRepo::duplicate(
        &pool,
        room.id,
        &DuplicateRoom {
            target_variant_id: None,
            name: None,
            product_mode: ProductCloneMode::All,
            selected_product_ids: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(
        RoomProductRepo::list_by_room(&pool, all.id).await.unwrap().len(),
        2
    );

    let selected = RoomRepo::duplicate(
        &pool,
        room.id,
        &DuplicateRoom {
            target_variant_id: None,
            name: None,
            product_mode: ProductCloneMode::Selected,
            selected_product_ids: Some(vec![oak_line.id]),
        },
    )
    .await
    .unwrap();
    let lines = RoomProductRepo::list_by_room(&pool, selected.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_id, oak.id);

    let none = RoomRepo::duplicate(
        &pool,
        room.id,
        &DuplicateRoom {
            target_variant_id: None,
            name: None,
            product_mode: ProductCloneMode::None,
            selected_product_ids: None,
        },
    )
    .await
    .unwrap();
    assert!(RoomProductRepo::list_by_room(&pool, none.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn selected_mode_without_ids_is_rejected(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 10.0).await;
    let variant = common::variant(&pool, phase.id, true).await;
    let room = common::room(&pool, variant.id, None).await;

    let result = RoomRepo::duplicate(
        &pool,
        room.id,
        &DuplicateRoom {
            target_variant_id: None,
            name: None,
            product_mode: ProductCloneMode::Selected,
            selected_product_ids: Some(vec![]),
        },
    )
    .await;
    assert_matches!(result, Err(DbError::Core(CoreError::InvalidState(_))));

    let result = VariantRepo::duplicate(
        &pool,
        variant.id,
        &DuplicateVariant {
            target_phase_id: None,
            name: None,
            room_mode: RoomCloneMode::Selected,
            selected_room_ids: None,
            include_products: true,
        },
    )
    .await;
    assert_matches!(result, Err(DbError::Core(CoreError::InvalidState(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn variant_copy_keeps_room_discounts_verbatim(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 10.0).await;
    let variant = common::variant(&pool, phase.id, true).await;
    let room = common::room(&pool, variant.id, Some(7.5)).await;
    let oak = common::product(&pool, "OAK-180").await;
    common::line(&pool, room.id, oak.id, 25.0, 45.50).await;

    // Target phase has a different, disabled discount configuration.
    let target_phase = common::phase(&pool, project.id, false, 20.0).await;

    let clone = VariantRepo::duplicate(
        &pool,
        variant.id,
        &DuplicateVariant {
            target_phase_id: Some(target_phase.id),
            name: None,
            room_mode: RoomCloneMode::All,
            selected_room_ids: None,
            include_products: true,
        },
    )
    .await
    .unwrap();

    assert_eq!(clone.phase_id, target_phase.id);
    assert_eq!(clone.name, "Oak premium (copy)");
    assert_eq!(clone.variant_order, 1);
    assert!(!clone.include_in_offer);
    assert!(!clone.is_selected);

    // Unlike room duplication, the cloned rooms are not re-resolved.
    let rooms = RoomRepo::list_by_variant(&pool, clone.id).await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].discount, 7.5);
    assert!(rooms[0].discount_enabled);

    let lines = RoomProductRepo::list_by_room(&pool, rooms[0].id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 25.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn variant_copy_without_products_clones_empty_rooms(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 10.0).await;
    let variant = common::variant(&pool, phase.id, true).await;
    let room = common::room(&pool, variant.id, None).await;
    let oak = common::product(&pool, "OAK-180").await;
    common::line(&pool, room.id, oak.id, 25.0, 45.50).await;

    let clone = VariantRepo::duplicate(
        &pool,
        variant.id,
        &DuplicateVariant {
            target_phase_id: None,
            name: None,
            room_mode: RoomCloneMode::All,
            selected_room_ids: None,
            include_products: false,
        },
    )
    .await
    .unwrap();

    let rooms = RoomRepo::list_by_variant(&pool, clone.id).await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert!(RoomProductRepo::list_by_room(&pool, rooms[0].id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn variant_copy_takes_next_order_in_target_phase(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 10.0).await;
    common::variant(&pool, phase.id, true).await;
    let source = common::variant(&pool, phase.id, true).await;

    let clone = VariantRepo::duplicate(
        &pool,
        source.id,
        &DuplicateVariant {
            target_phase_id: None,
            name: Some("Third".to_string()),
            room_mode: RoomCloneMode::All,
            selected_room_ids: None,
            include_products: true,
        },
    )
    .await
    .unwrap();

    assert_eq!(clone.variant_order, 3);
    assert_eq!(clone.name, "Third");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn variant_copy_with_selected_rooms_only(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 10.0).await;
    let variant = common::variant(&pool, phase.id, true).await;
    let keep = common::room(&pool, variant.id, None).await;
    common::room(&pool, variant.id, None).await;

    let clone = VariantRepo::duplicate(
        &pool,
        variant.id,
        &DuplicateVariant {
            target_phase_id: None,
            name: None,
            room_mode: RoomCloneMode::Selected,
            selected_room_ids: Some(vec![keep.id]),
            include_products: true,
        },
    )
    .await
    .unwrap();

    let rooms = RoomRepo::list_by_variant(&pool, clone.id).await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].name, keep.name);
}
