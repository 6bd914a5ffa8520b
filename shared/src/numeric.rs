//! Flexible numeric parsing for spreadsheet-style inputs
//!
//! ERP exports carry numbers as bare JSON numbers, quoted strings, grouped
//! strings ("1,234.50"), or empty fields. [`parse_decimal`] is the explicit
//! typed parse step; [`decimal_or_zero`] and [`decimal_from_value`] apply the
//! zero-fallback deliberately at the ingestion boundary, logging before
//! degrading. The fallback is never buried inside arithmetic helpers.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;
use std::str::FromStr;

use crate::error::NumericError;

/// Parse a numeric string into a `Decimal`.
///
/// Accepts plain decimals ("12.5", "-3"), grouped decimals ("1,234.50"),
/// and surrounding whitespace. An empty or whitespace-only string is
/// reported as [`NumericError::Empty`] so callers can distinguish "absent"
/// from "garbage".
pub fn parse_decimal(raw: &str) -> Result<Decimal, NumericError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NumericError::Empty);
    }

    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).map_err(|_| NumericError::Malformed(raw.to_string()))
}

/// Parse a numeric string, deliberately degrading to zero on failure.
///
/// Absent input is quietly zero; malformed input is logged before the
/// fallback so silent data loss stays visible in the logs.
pub fn decimal_or_zero(raw: &str) -> Decimal {
    match parse_decimal(raw) {
        Ok(value) => value,
        Err(NumericError::Empty) => Decimal::ZERO,
        Err(err) => {
            tracing::warn!(raw, error = %err, "non-numeric input coerced to zero");
            Decimal::ZERO
        }
    }
}

/// Extract a decimal from a loosely typed JSON field.
///
/// Numbers and numeric strings parse; booleans map to 0/1 (check fields in
/// ERP exports arrive as either); null and absent fields are zero. Anything
/// else is logged and coerced to zero.
pub fn decimal_from_value(value: &Value) -> Decimal {
    match value {
        Value::Null => Decimal::ZERO,
        Value::Number(n) => n
            .as_f64()
            .and_then(Decimal::from_f64)
            .unwrap_or_else(|| {
                tracing::warn!(%value, "unrepresentable number coerced to zero");
                Decimal::ZERO
            }),
        Value::String(s) => decimal_or_zero(s),
        Value::Bool(b) => {
            if *b {
                Decimal::ONE
            } else {
                Decimal::ZERO
            }
        }
        other => {
            tracing::warn!(value = %other, "non-numeric JSON value coerced to zero");
            Decimal::ZERO
        }
    }
}
