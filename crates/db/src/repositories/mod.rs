//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-row invariants
//! (discount cascades, reordering, exclusive selection, duplication) run
//! inside single transactions here; nothing above this layer issues
//! partial writes.

mod aggregation;
mod ordering;

pub mod offer_repo;
pub mod phase_repo;
pub mod product_repo;
pub mod project_repo;
pub mod room_product_repo;
pub mod room_repo;
pub mod variant_repo;

pub use offer_repo::OfferRepo;
pub use phase_repo::PhaseRepo;
pub use product_repo::ProductRepo;
pub use project_repo::ProjectRepo;
pub use room_product_repo::RoomProductRepo;
pub use room_repo::RoomRepo;
pub use variant_repo::{CascadeOutcome, VariantRepo};
