//! Input validation for composer records
//!
//! Finite and range checks run once at the boundary, before any arithmetic;
//! the composition stages are infallible after that. Out-of-range numeric
//! configuration is rejected here, never coerced; zero-coercion happens only
//! in the ingestion layer, where it is deliberate and logged.

use shared::PricingError;
use shared::models::{ItemDetails, PricingRule, TransactionArgs};

use crate::money::require_finite;

/// Percentage fields must stay within [0, 100]
fn require_percentage(value: f64, field: &'static str) -> Result<(), PricingError> {
    require_finite(value, field)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(PricingError::invalid(
            field,
            format!("must be between 0 and 100, got {value}"),
        ));
    }
    Ok(())
}

fn require_non_negative(value: f64, field: &'static str) -> Result<(), PricingError> {
    require_finite(value, field)?;
    if value < 0.0 {
        return Err(PricingError::invalid(
            field,
            format!("must be non-negative, got {value}"),
        ));
    }
    Ok(())
}

/// Validate a pricing rule before composition
pub fn validate_pricing_rule(rule: &PricingRule) -> Result<(), PricingError> {
    require_non_negative(rule.rate, "rate")?;
    require_finite(rule.margin_rate_or_amount, "margin_rate_or_amount")?;
    require_finite(rule.discount_amount, "discount_amount")?;
    require_percentage(rule.discount_percentage, "discount_percentage")?;
    require_percentage(rule.trade_mark_pct, "trade_mark_pct")?;
    require_percentage(rule.scheme_pct, "scheme_pct")?;
    require_percentage(rule.freight_pct, "freight_pct")?;
    require_percentage(rule.extra_pct, "extra_pct")?;
    // Non-negative also keeps the GST back-out denominator (1 + rate/100)
    // strictly positive.
    require_non_negative(rule.gst_rate, "gst_rate")?;
    require_percentage(rule.additional_discount_pct, "additional_discount_pct")?;
    Ok(())
}

/// Validate the mutable item-details record before composition
pub fn validate_item_details(details: &ItemDetails) -> Result<(), PricingError> {
    require_non_negative(details.price_list_rate, "price_list_rate")?;
    if let Some(amount) = details.discount_amount {
        require_finite(amount, "discount_amount")?;
    }
    if let Some(pct) = details.discount_percentage {
        require_finite(pct, "discount_percentage")?;
    }
    if let Some(margin) = details.margin_rate_or_amount {
        require_finite(margin, "margin_rate_or_amount")?;
    }
    Ok(())
}

/// Validate the read-only transaction context before composition
pub fn validate_transaction_args(args: &TransactionArgs) -> Result<(), PricingError> {
    require_non_negative(args.price_list_rate, "price_list_rate")?;
    require_finite(args.conversion_factor, "conversion_factor")?;
    if args.conversion_factor <= 0.0 {
        return Err(PricingError::invalid(
            "conversion_factor",
            format!("must be positive, got {}", args.conversion_factor),
        ));
    }
    Ok(())
}
