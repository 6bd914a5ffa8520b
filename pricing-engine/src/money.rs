//! Money calculation utilities using rust_decimal for precision
//!
//! Calculations run on `Decimal`; stored fields are `f64`, rounded to
//! 2 decimal places (half-up) at the storage boundary.

use rust_decimal::prelude::*;
use shared::PricingError;

/// Rounding for stored monetary values (2 decimal places, half-up)
pub(crate) const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub(crate) fn require_finite(value: f64, field: &'static str) -> Result<(), PricingError> {
    if !value.is_finite() {
        return Err(PricingError::invalid(
            field,
            format!("must be a finite number, got {value}"),
        ));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
///
/// Inputs are pre-validated via `require_finite()` at the boundary. If a
/// non-finite value somehow reaches here, logs an error and returns ZERO to
/// avoid silent corruption in financial calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}
