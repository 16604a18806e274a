//! Pure domain logic for the parkett offer engine.
//!
//! Everything in this crate is side-effect free: pricing arithmetic,
//! discount-cascade resolution, offer snapshot types, and validation
//! helpers. Persistence lives in `parkett-db`, HTTP in `parkett-api`.

pub mod discount;
pub mod error;
pub mod offer;
pub mod pricing;
pub mod types;
pub mod validation;
