//! Integration tests for sibling reordering: permutations apply
//! atomically, invalid requests abort without touching the ordering.

mod common;

use assert_matches::assert_matches;
use parkett_core::error::CoreError;
use parkett_db::error::DbError;
use parkett_db::models::ordering::{ReorderInput, ReorderPair};
use parkett_db::repositories::{PhaseRepo, VariantRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn ordered_id_list_permutes_phases(pool: PgPool) {
    let project = common::project(&pool).await;
    let a = common::phase(&pool, project.id, false, 0.0).await;
    let b = common::phase(&pool, project.id, false, 0.0).await;
    let c = common::phase(&pool, project.id, false, 0.0).await;

    let phases = PhaseRepo::reorder(
        &pool,
        project.id,
        ReorderInput::OrderedIds(vec![c.id, a.id, b.id]),
    )
    .await
    .unwrap();

    let positions: Vec<(i64, i32)> = phases.iter().map(|p| (p.id, p.phase_order)).collect();
    assert_eq!(positions, vec![(c.id, 1), (a.id, 2), (b.id, 3)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn explicit_pairs_swap_two_phases(pool: PgPool) {
    let project = common::project(&pool).await;
    let a = common::phase(&pool, project.id, false, 0.0).await;
    let b = common::phase(&pool, project.id, false, 0.0).await;

    // A full swap would collide under pairwise updates; the staged write
    // must pull it off without an intermediate duplicate.
    let phases = PhaseRepo::reorder(
        &pool,
        project.id,
        ReorderInput::Pairs(vec![
            ReorderPair {
                id: a.id,
                new_order: 2,
            },
            ReorderPair {
                id: b.id,
                new_order: 1,
            },
        ]),
    )
    .await
    .unwrap();

    let positions: Vec<(i64, i32)> = phases.iter().map(|p| (p.id, p.phase_order)).collect();
    assert_eq!(positions, vec![(b.id, 1), (a.id, 2)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_target_order_aborts_without_writes(pool: PgPool) {
    let project = common::project(&pool).await;
    let a = common::phase(&pool, project.id, false, 0.0).await;
    let b = common::phase(&pool, project.id, false, 0.0).await;

    let result = PhaseRepo::reorder(
        &pool,
        project.id,
        ReorderInput::Pairs(vec![
            ReorderPair {
                id: a.id,
                new_order: 1,
            },
            ReorderPair {
                id: b.id,
                new_order: 1,
            },
        ]),
    )
    .await;
    assert_matches!(result, Err(DbError::Core(CoreError::InvalidState(_))));

    let phases = PhaseRepo::list_by_project(&pool, project.id).await.unwrap();
    let positions: Vec<(i64, i32)> = phases.iter().map(|p| (p.id, p.phase_order)).collect();
    assert_eq!(positions, vec![(a.id, 1), (b.id, 2)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_phase_id_aborts_without_writes(pool: PgPool) {
    let project = common::project(&pool).await;
    let a = common::phase(&pool, project.id, false, 0.0).await;

    let other_project = common::project(&pool).await;
    let foreign = common::phase(&pool, other_project.id, false, 0.0).await;

    let result = PhaseRepo::reorder(
        &pool,
        project.id,
        ReorderInput::OrderedIds(vec![foreign.id, a.id]),
    )
    .await;
    assert_matches!(result, Err(DbError::Core(CoreError::InvalidState(_))));

    let untouched = PhaseRepo::find_by_id(&pool, foreign.id).await.unwrap().unwrap();
    assert_eq!(untouched.phase_order, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_reorder_into_occupied_position_aborts(pool: PgPool) {
    let project = common::project(&pool).await;
    let a = common::phase(&pool, project.id, false, 0.0).await;
    let b = common::phase(&pool, project.id, false, 0.0).await;

    // b wants position 1, but a still holds it and is not part of the
    // request; accepting this would leave two phases on the same order.
    let result = PhaseRepo::reorder(
        &pool,
        project.id,
        ReorderInput::Pairs(vec![ReorderPair {
            id: b.id,
            new_order: 1,
        }]),
    )
    .await;
    assert_matches!(result, Err(DbError::Core(CoreError::InvalidState(_))));

    let phases = PhaseRepo::list_by_project(&pool, project.id).await.unwrap();
    let positions: Vec<(i64, i32)> = phases.iter().map(|p| (p.id, p.phase_order)).collect();
    assert_eq!(positions, vec![(a.id, 1), (b.id, 2)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_id_in_request_aborts(pool: PgPool) {
    let project = common::project(&pool).await;
    let a = common::phase(&pool, project.id, false, 0.0).await;

    let result = PhaseRepo::reorder(
        &pool,
        project.id,
        ReorderInput::Pairs(vec![
            ReorderPair {
                id: a.id,
                new_order: 1,
            },
            ReorderPair {
                id: a.id,
                new_order: 2,
            },
        ]),
    )
    .await;
    assert_matches!(result, Err(DbError::Core(CoreError::InvalidState(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn negative_target_order_aborts(pool: PgPool) {
    let project = common::project(&pool).await;
    let a = common::phase(&pool, project.id, false, 0.0).await;

    let result = PhaseRepo::reorder(
        &pool,
        project.id,
        ReorderInput::Pairs(vec![ReorderPair {
            id: a.id,
            new_order: -3,
        }]),
    )
    .await;
    assert_matches!(result, Err(DbError::Core(CoreError::InvalidState(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn variants_reorder_within_their_phase(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, false, 0.0).await;
    let a = common::variant(&pool, phase.id, false).await;
    let b = common::variant(&pool, phase.id, false).await;
    let c = common::variant(&pool, phase.id, false).await;

    let variants = VariantRepo::reorder(
        &pool,
        phase.id,
        ReorderInput::OrderedIds(vec![b.id, c.id, a.id]),
    )
    .await
    .unwrap();

    let positions: Vec<(i64, i32)> = variants.iter().map(|v| (v.id, v.variant_order)).collect();
    assert_eq!(positions, vec![(b.id, 1), (c.id, 2), (a.id, 3)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_reorder_leaves_other_siblings_alone(pool: PgPool) {
    let project = common::project(&pool).await;
    let phase = common::phase(&pool, project.id, false, 0.0).await;
    let a = common::variant(&pool, phase.id, false).await;
    let b = common::variant(&pool, phase.id, false).await;
    let c = common::variant(&pool, phase.id, false).await;

    // Move only c to the front position formerly held by a.
    VariantRepo::reorder(
        &pool,
        phase.id,
        ReorderInput::Pairs(vec![
            ReorderPair {
                id: c.id,
                new_order: 1,
            },
            ReorderPair {
                id: a.id,
                new_order: 3,
            },
        ]),
    )
    .await
    .unwrap();

    let b_row = VariantRepo::find_by_id(&pool, b.id).await.unwrap().unwrap();
    assert_eq!(b_row.variant_order, 2);
}
