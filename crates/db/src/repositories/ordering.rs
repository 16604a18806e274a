//! Generic sibling reordering under the order-uniqueness invariant.
//!
//! A naive pairwise swap can momentarily (or, on partial failure,
//! permanently) collide two siblings on the same order value. Instead,
//! within the caller's transaction every referenced sibling is first
//! staged to a shared out-of-range sentinel, then each one is assigned its
//! final position. Validation happens before any write: a foreign ID, a
//! duplicate ID, a duplicate target position, or a target position held by
//! a sibling outside the request aborts the whole request.

use std::collections::{HashMap, HashSet};

use parkett_core::types::DbId;
use sqlx::{PgConnection, Row};

use crate::error::{DbError, DbResult};

/// Out-of-range placeholder no valid order value can collide with.
pub(crate) const ORDER_SENTINEL: i32 = -1;

/// Which sibling set a reorder targets. Table and column names are inlined
/// into SQL, so they are fixed here rather than passed as strings by
/// callers.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SiblingSet {
    /// `phases` ordered by `phase_order` within a project.
    Phases,
    /// `variants` ordered by `variant_order` within a phase.
    Variants,
}

impl SiblingSet {
    fn table(self) -> &'static str {
        match self {
            SiblingSet::Phases => "phases",
            SiblingSet::Variants => "variants",
        }
    }

    fn parent_column(self) -> &'static str {
        match self {
            SiblingSet::Phases => "project_id",
            SiblingSet::Variants => "phase_id",
        }
    }

    fn order_column(self) -> &'static str {
        match self {
            SiblingSet::Phases => "phase_order",
            SiblingSet::Variants => "variant_order",
        }
    }

    fn label(self) -> &'static str {
        match self {
            SiblingSet::Phases => "phase",
            SiblingSet::Variants => "variant",
        }
    }
}

/// Apply order assignments to a sibling set inside the caller's
/// transaction.
///
/// Stage-then-assign: all referenced rows move to [`ORDER_SENTINEL`] in
/// one bulk update, then each receives its final position. The caller
/// commits or rolls back.
pub(crate) async fn reorder_siblings(
    conn: &mut PgConnection,
    set: SiblingSet,
    parent_id: DbId,
    assignments: &[(DbId, i32)],
) -> DbResult<()> {
    if assignments.is_empty() {
        return Ok(());
    }

    // -- Validation, before any write --
    let sibling_rows = sqlx::query(&format!(
        "SELECT id, {} FROM {} WHERE {} = $1",
        set.order_column(),
        set.table(),
        set.parent_column()
    ))
    .bind(parent_id)
    .fetch_all(&mut *conn)
    .await?;
    let siblings: HashMap<DbId, i32> = sibling_rows
        .iter()
        .map(|row| (row.get("id"), row.get(set.order_column())))
        .collect();

    let mut seen_ids = HashSet::new();
    let mut seen_orders = HashSet::new();
    for &(id, new_order) in assignments {
        if !siblings.contains_key(&id) {
            return Err(DbError::invalid_state(format!(
                "{} {id} does not belong to the requested parent {parent_id}",
                set.label()
            )));
        }
        if !seen_ids.insert(id) {
            return Err(DbError::invalid_state(format!(
                "{} {id} appears more than once in the reorder request",
                set.label()
            )));
        }
        if new_order < 0 {
            return Err(DbError::invalid_state(format!(
                "target order {new_order} for {} {id} is out of range",
                set.label()
            )));
        }
        if !seen_orders.insert(new_order) {
            return Err(DbError::invalid_state(format!(
                "target order {new_order} is assigned to more than one {}",
                set.label()
            )));
        }
    }

    // A partial request must not land on a position a sibling outside the
    // request still holds; order values stay unique across the whole set.
    for (&sibling_id, &current_order) in &siblings {
        if !seen_ids.contains(&sibling_id) && seen_orders.contains(&current_order) {
            return Err(DbError::invalid_state(format!(
                "target order {current_order} is already held by {} {sibling_id}, \
                 which is not part of the reorder request",
                set.label()
            )));
        }
    }

    // -- Phase 1: stage every referenced sibling to the sentinel --
    let ids: Vec<DbId> = assignments.iter().map(|&(id, _)| id).collect();
    sqlx::query(&format!(
        "UPDATE {} SET {} = $1, updated_at = NOW() WHERE id = ANY($2)",
        set.table(),
        set.order_column()
    ))
    .bind(ORDER_SENTINEL)
    .bind(&ids)
    .execute(&mut *conn)
    .await?;

    // -- Phase 2: assign final positions --
    for &(id, new_order) in assignments {
        sqlx::query(&format!(
            "UPDATE {} SET {} = $1, updated_at = NOW() WHERE id = $2",
            set.table(),
            set.order_column()
        ))
        .bind(new_order)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    }

    tracing::debug!(
        set = set.table(),
        parent_id,
        moved = assignments.len(),
        "reordered siblings"
    );
    Ok(())
}
