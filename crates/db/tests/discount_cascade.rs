//! Integration tests for the discount cascade: resolver behaviour at room
//! creation and atomic propagation on variant toggles.

mod common;

use parkett_db::repositories::{PhaseRepo, RoomProductRepo, RoomRepo, VariantRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn room_inherits_phase_discount_on_creation(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 10.0).await;
    let variant = common::variant(&pool, phase.id, true).await;

    let room = common::room(&pool, variant.id, None).await;
    assert_eq!(room.discount, 10.0);
    assert!(room.discount_enabled);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn explicit_discount_overrides_inheritance(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 10.0).await;
    let variant = common::variant(&pool, phase.id, true).await;

    let room = common::room(&pool, variant.id, Some(7.5)).await;
    assert_eq!(room.discount, 7.5);
    assert!(room.discount_enabled);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn disabled_ancestor_forces_discount_off_despite_explicit_value(pool: PgPool) {
    let project = common::project(&pool).await;

    // Phase toggle off
    let phase = common::phase(&pool, project.id, false, 10.0).await;
    let variant = common::variant(&pool, phase.id, true).await;
    let room = common::room(&pool, variant.id, Some(25.0)).await;
    assert_eq!(room.discount, 0.0);
    assert!(!room.discount_enabled);

    // Variant toggle off
    let phase = common::phase(&pool, project.id, true, 10.0).await;
    let variant = common::variant(&pool, phase.id, false).await;
    let room = common::room(&pool, variant.id, Some(25.0)).await;
    assert_eq!(room.discount, 0.0);
    assert!(!room.discount_enabled);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn toggle_off_cascades_to_all_rooms_and_line_items(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 10.0).await;
    let variant = common::variant(&pool, phase.id, true).await;
    let room_a = common::room(&pool, variant.id, None).await;
    let room_b = common::room(&pool, variant.id, Some(15.0)).await;
    let oak = common::product(&pool, "OAK-180").await;
    common::line(&pool, room_a.id, oak.id, 25.0, 45.50).await;
    common::line(&pool, room_b.id, oak.id, 10.0, 45.50).await;

    let toggled = VariantRepo::toggle_discount(&pool, variant.id, false)
        .await
        .unwrap();
    assert!(!toggled.discount_enabled);

    for room_id in [room_a.id, room_b.id] {
        let room = RoomRepo::find_by_id(&pool, room_id).await.unwrap().unwrap();
        assert_eq!(room.discount, 0.0);
        assert!(!room.discount_enabled);

        for item in RoomProductRepo::list_by_room(&pool, room_id).await.unwrap() {
            assert_eq!(item.discount, 0.0);
            assert!(!item.discount_enabled);
        }
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn toggle_back_on_reapplies_phase_discount(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 12.0).await;
    let variant = common::variant(&pool, phase.id, true).await;
    let room = common::room(&pool, variant.id, Some(3.0)).await;
    let oak = common::product(&pool, "OAK-180").await;
    common::line(&pool, room.id, oak.id, 25.0, 45.50).await;

    VariantRepo::toggle_discount(&pool, variant.id, false)
        .await
        .unwrap();
    VariantRepo::toggle_discount(&pool, variant.id, true)
        .await
        .unwrap();

    // The explicit creation-time value does not survive a toggle cycle;
    // rooms inherit the phase discount again.
    let room = RoomRepo::find_by_id(&pool, room.id).await.unwrap().unwrap();
    assert_eq!(room.discount, 12.0);
    assert!(room.discount_enabled);

    let items = RoomProductRepo::list_by_room(&pool, room.id).await.unwrap();
    assert_eq!(items[0].discount, 12.0);
    assert!(items[0].discount_enabled);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn phase_toggle_off_cascades_through_every_variant(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 10.0).await;
    let variant_a = common::variant(&pool, phase.id, true).await;
    let variant_b = common::variant(&pool, phase.id, true).await;
    let room_a = common::room(&pool, variant_a.id, None).await;
    let room_b = common::room(&pool, variant_b.id, Some(15.0)).await;
    let oak = common::product(&pool, "OAK-180").await;
    common::line(&pool, room_a.id, oak.id, 25.0, 45.50).await;
    assert!(room_a.discount_enabled);

    let toggled = PhaseRepo::toggle_discount(&pool, phase.id, false)
        .await
        .unwrap();
    assert!(!toggled.discount_enabled);

    // No room may stay enabled under a disabled phase.
    for room_id in [room_a.id, room_b.id] {
        let room = RoomRepo::find_by_id(&pool, room_id).await.unwrap().unwrap();
        assert_eq!(room.discount, 0.0);
        assert!(!room.discount_enabled);
    }
    let items = RoomProductRepo::list_by_room(&pool, room_a.id).await.unwrap();
    assert_eq!(items[0].discount, 0.0);
    assert!(!items[0].discount_enabled);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn phase_toggle_on_restores_inheritance_where_variants_allow(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, false, 12.0).await;
    let enabled_variant = common::variant(&pool, phase.id, true).await;
    let disabled_variant = common::variant(&pool, phase.id, false).await;
    let inheriting = common::room(&pool, enabled_variant.id, None).await;
    let blocked = common::room(&pool, disabled_variant.id, None).await;

    PhaseRepo::toggle_discount(&pool, phase.id, true)
        .await
        .unwrap();

    let inheriting = RoomRepo::find_by_id(&pool, inheriting.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(inheriting.discount, 12.0);
    assert!(inheriting.discount_enabled);

    // A variant with its own toggle off keeps its rooms off.
    let blocked = RoomRepo::find_by_id(&pool, blocked.id).await.unwrap().unwrap();
    assert_eq!(blocked.discount, 0.0);
    assert!(!blocked.discount_enabled);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn toggle_on_under_disabled_phase_stays_off(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, false, 12.0).await;
    let variant = common::variant(&pool, phase.id, false).await;
    let room = common::room(&pool, variant.id, None).await;

    VariantRepo::toggle_discount(&pool, variant.id, true)
        .await
        .unwrap();

    let room = RoomRepo::find_by_id(&pool, room.id).await.unwrap().unwrap();
    assert_eq!(room.discount, 0.0);
    assert!(!room.discount_enabled);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn new_line_item_mirrors_room_discount_state(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, true, 8.0).await;
    let variant = common::variant(&pool, phase.id, true).await;
    let room = common::room(&pool, variant.id, None).await;
    let oak = common::product(&pool, "OAK-180").await;

    let item = common::line(&pool, room.id, oak.id, 5.0, 45.50).await;
    assert_eq!(item.discount, 8.0);
    assert!(item.discount_enabled);
}
