//! Shared domain validation helpers.
//!
//! Range checks used by the store before any write is issued.

use crate::error::CoreError;

/// Validate that a discount/commission percentage falls within `[0, 100]`.
///
/// Returns a `CoreError::Validation` naming the field if out of range.
pub fn validate_percent(value: f64, name: &str) -> Result<(), CoreError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{name} must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}

/// Validate that a quantity-like value (area, quantity, unit price) is not
/// negative.
pub fn validate_non_negative(value: f64, name: &str) -> Result<(), CoreError> {
    if value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{name} must not be negative, got {value}"
        )));
    }
    Ok(())
}
