//! Error type for store operations that enforce domain invariants.
//!
//! Plain CRUD methods keep bare `sqlx::Error` signatures; operations that
//! validate cross-entity invariants (delete guards, reordering, cascades,
//! duplication) return [`DbError`] so domain failures and driver failures
//! stay distinguishable for the caller.

use parkett_core::error::CoreError;
use parkett_core::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        DbError::Core(CoreError::NotFound { entity, id })
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        DbError::Core(CoreError::InvalidState(message.into()))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DbError::Core(CoreError::Conflict(message.into()))
    }
}
