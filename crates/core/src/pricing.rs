//! Price line calculator: pure arithmetic for line, room, and variant
//! totals.
//!
//! Line totals stay unrounded; rounding to two decimals happens only at
//! presentation boundaries (room/variant/offer subtotals) so that rounding
//! error never compounds across lines.

/// Round a monetary amount to two decimal places for presentation.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Total for a single line item: `quantity * unit_price * (1 - discount/100)`.
///
/// An absent discount is treated as zero. The result is intentionally not
/// rounded.
pub fn line_total(quantity: f64, unit_price: f64, discount_percent: Option<f64>) -> f64 {
    let discount = discount_percent.unwrap_or(0.0);
    quantity * unit_price * (1.0 - discount / 100.0)
}

/// Room subtotal: sum of its line totals, rounded for presentation.
pub fn room_total(line_totals: impl IntoIterator<Item = f64>) -> f64 {
    round2(line_totals.into_iter().sum())
}

/// Variant subtotal: sum of its room totals, rounded for presentation.
pub fn variant_total(room_totals: impl IntoIterator<Item = f64>) -> f64 {
    round2(room_totals.into_iter().sum())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
