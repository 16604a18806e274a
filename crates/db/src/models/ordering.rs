//! Reorder request shapes shared by phase and variant reordering.

use parkett_core::types::DbId;
use serde::Deserialize;

/// One `{id, new_order}` assignment.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReorderPair {
    pub id: DbId,
    #[serde(alias = "newOrder")]
    pub new_order: i32,
}

/// A reorder request: either the full sibling ID list in desired order
/// (positions assigned 1..n), or explicit `{id, new_order}` pairs.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReorderInput {
    Pairs(Vec<ReorderPair>),
    OrderedIds(Vec<DbId>),
}

impl ReorderInput {
    /// Normalize to explicit `(id, new_order)` assignments.
    pub fn into_pairs(self) -> Vec<(DbId, i32)> {
        match self {
            ReorderInput::Pairs(pairs) => pairs.into_iter().map(|p| (p.id, p.new_order)).collect(),
            ReorderInput::OrderedIds(ids) => ids
                .into_iter()
                .zip(1..)
                .map(|(id, position)| (id, position))
                .collect(),
        }
    }
}
