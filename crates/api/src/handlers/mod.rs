//! HTTP handlers: thin request/response marshalling over the repository
//! layer.

pub mod health;
pub mod offer;
pub mod phase;
pub mod product;
pub mod project;
pub mod room;
pub mod room_product;
pub mod variant;
