//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod offer;
pub mod ordering;
pub mod phase;
pub mod product;
pub mod project;
pub mod room;
pub mod room_product;
pub mod variant;
