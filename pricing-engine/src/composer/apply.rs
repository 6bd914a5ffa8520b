//! Price Discount Composer
//!
//! The document-entry discount application flow: margin handling, the
//! explicit rate override, the component discount waterfall, and the
//! additional discount layer applied last.

use rust_decimal::Decimal;
use shared::PricingError;
use shared::models::{ItemDetails, MarginType, PricingRule, RateOrDiscount, TransactionArgs};

use super::additional::apply_additional_discount;
use super::waterfall::run_waterfall;
use crate::money::{to_decimal, to_f64};
use crate::validation;

/// Apply a matched pricing rule to a line item's details.
///
/// All output is communicated by mutating `details` in place. Validation
/// failures (non-finite or out-of-range inputs) are reported before any
/// stage runs; once validation passes, the flow is infallible.
///
/// Stages accumulate rather than replace, so a rule must be applied to a
/// given record exactly once.
pub fn apply_price_discount_rule(
    rule: &PricingRule,
    details: &mut ItemDetails,
    args: &TransactionArgs,
) -> Result<(), PricingError> {
    validation::validate_pricing_rule(rule)?;
    validation::validate_item_details(details)?;
    validation::validate_transaction_args(args)?;

    details.applied_rate_or_discount = Some(rule.rate_or_discount);

    apply_margin(rule, details, args);

    match rule.rate_or_discount {
        RateOrDiscount::Rate => apply_rate_override(rule, details, args),
        RateOrDiscount::DiscountAmount | RateOrDiscount::DiscountPercentage => {
            apply_discount(rule, details, args)
        }
    }

    apply_additional_discount(rule, details, args);

    Ok(())
}

/// Margin stage.
///
/// An Amount margin requires matching currencies; a Percentage margin
/// applies regardless. With multiple-rule stacking enabled an existing
/// margin accumulates, otherwise the rule's value overwrites it.
fn apply_margin(rule: &PricingRule, details: &mut ItemDetails, args: &TransactionArgs) {
    let margin_applies = match rule.margin_type {
        Some(MarginType::Percentage) => true,
        Some(MarginType::Amount) => rule.currency == args.currency,
        None => false,
    };
    if !margin_applies {
        return;
    }

    details.margin_type = rule.margin_type;
    details.has_margin = true;

    if rule.apply_multiple_pricing_rules && details.margin_rate_or_amount.is_some() {
        let current = details.margin_rate_or_amount.unwrap_or(0.0);
        details.margin_rate_or_amount = Some(to_f64(
            to_decimal(current) + to_decimal(rule.margin_rate_or_amount),
        ));
    } else {
        details.margin_rate_or_amount = Some(rule.margin_rate_or_amount);
    }
}

/// Rate stage: an explicit rate override supersedes any discount.
///
/// The rate converts through the transaction's conversion factor when the
/// rule's unit-of-measure differs from the document line's. The discount
/// percentage resets to zero in this branch whether or not the currency
/// matched.
fn apply_rate_override(rule: &PricingRule, details: &mut ItemDetails, args: &TransactionArgs) {
    let rate = if rule.currency == args.currency {
        rule.rate
    } else {
        0.0
    };

    if rate != 0.0 {
        let factor = if rule.uom != args.uom {
            args.conversion_factor
        } else {
            1.0
        };
        details.price_list_rate = to_f64(to_decimal(rate) * to_decimal(factor));
    }

    details.discount_percentage = Some(0.0);
}

/// Discount stage: flat amount, or the percentage waterfall.
fn apply_discount(rule: &PricingRule, details: &mut ItemDetails, args: &TransactionArgs) {
    let is_percentage = rule.rate_or_discount == RateOrDiscount::DiscountPercentage;
    let rule_value = if is_percentage {
        rule.discount_percentage
    } else {
        rule.discount_amount
    };

    if rule.apply_discount_on_rate && details.discount_percentage.is_some_and(|p| p != 0.0) {
        // Multi-rule stacking: compound onto the remaining headroom of the
        // branch's own field.
        let field = if is_percentage {
            &mut details.discount_percentage
        } else {
            &mut details.discount_amount
        };
        let existing = to_decimal(field.unwrap_or(0.0));
        let updated = existing
            + (Decimal::ONE_HUNDRED - existing) * to_decimal(rule_value) / Decimal::ONE_HUNDRED;
        *field = Some(to_f64(updated));
        return;
    }

    if args.price_list_rate > 0.0 {
        if is_percentage {
            // The percentage remaps to an amount computed by the waterfall.
            let breakdown = run_waterfall(args.price_list_rate, rule);
            tracing::debug!(
                rule = %rule.name,
                total_discount = breakdown.total_discount,
                consumed_pct = breakdown.consumed_pct,
                "component waterfall applied"
            );
            details.waterfall_pct = Some(breakdown.consumed_pct);
            accumulate(&mut details.discount_amount, breakdown.total_discount);

            if details.discount_amount.is_some_and(|a| a != 0.0) {
                let amount = to_decimal(details.discount_amount.unwrap_or(0.0));
                details.discount_percentage = Some(to_f64(
                    amount / to_decimal(args.price_list_rate) * Decimal::ONE_HUNDRED,
                ));
            }
        } else {
            accumulate(&mut details.discount_amount, rule.discount_amount);
        }
    } else {
        // No positive price in the context: accumulate the rule's raw value
        // onto the branch's own field.
        let field = if is_percentage {
            &mut details.discount_percentage
        } else {
            &mut details.discount_amount
        };
        accumulate(field, rule_value);
    }
}

/// Accumulate onto an optional field, creating it at zero first.
fn accumulate(field: &mut Option<f64>, value: f64) {
    let current = field.unwrap_or(0.0);
    *field = Some(to_f64(to_decimal(current) + to_decimal(value)));
}
