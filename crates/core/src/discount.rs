//! Discount cascade resolver.
//!
//! Decides the discount state a Room carries, given the discount
//! configuration of its owning Variant and that Variant's Phase. This is
//! the only place room-level discount state is derived; the store invokes
//! it at room creation and whenever an ancestor's discount toggle flips.

use serde::Serialize;

/// Discount configuration of an ancestor node, as far as the resolver is
/// concerned.
#[derive(Debug, Clone, Copy)]
pub struct DiscountConfig {
    pub enabled: bool,
    /// Percent, 0-100. Only meaningful when `enabled` is true.
    pub percent: f64,
}

/// The resolved discount state written to a Room (and mirrored onto its
/// line items during a cascade).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedDiscount {
    pub discount: f64,
    pub discount_enabled: bool,
}

impl ResolvedDiscount {
    /// The "no discount" state forced whenever an ancestor toggle is off.
    pub const OFF: ResolvedDiscount = ResolvedDiscount {
        discount: 0.0,
        discount_enabled: false,
    };
}

/// Resolve the discount state for a Room.
///
/// Precedence, first match wins:
/// 1. Either ancestor toggle off: `{0, false}`, ignoring any explicit
///    value.
/// 2. Caller supplied an explicit discount: `{explicit, true}`.
/// 3. Otherwise the Room inherits the Phase's current discount.
pub fn resolve_room_discount(
    phase: DiscountConfig,
    variant: DiscountConfig,
    explicit: Option<f64>,
) -> ResolvedDiscount {
    if !variant.enabled || !phase.enabled {
        return ResolvedDiscount::OFF;
    }
    match explicit {
        Some(value) => ResolvedDiscount {
            discount: value,
            discount_enabled: true,
        },
        None => ResolvedDiscount {
            discount: phase.percent,
            discount_enabled: true,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
