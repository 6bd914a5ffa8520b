//! Additional discount layer
//!
//! A date-windowed discount applied after everything else, on the
//! already-discounted net price. It never compounds with the waterfall
//! inside the same base: the waterfall's percentages are relative to the
//! original price, this layer's percentage is relative to what is left.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{ItemDetails, PricingRule, TransactionArgs};

use crate::money::{to_decimal, to_f64};

/// Apply the rule's additional discount if its guards pass.
///
/// Guards, in order: the layer is enabled; its percentage is positive; the
/// effective document date falls inside the validity window; the base price
/// is positive; and the existing discount leaves a positive net. Any failed
/// guard makes the stage a no-op.
pub fn apply_additional_discount(
    rule: &PricingRule,
    details: &mut ItemDetails,
    args: &TransactionArgs,
) {
    if !rule.additional_discount {
        return;
    }
    if rule.additional_discount_pct <= 0.0 {
        return;
    }

    let doc_date = args.effective_date();
    if !within_window(
        doc_date,
        rule.additional_valid_from,
        rule.additional_valid_to,
    ) {
        return;
    }

    // Base: the line's (possibly rate-overridden) price-list rate, falling
    // back to the context's.
    let base = if details.price_list_rate > 0.0 {
        details.price_list_rate
    } else {
        args.price_list_rate
    };
    if base <= 0.0 {
        return;
    }

    let current = to_decimal(details.discount_amount.unwrap_or(0.0));
    let net_after_existing = to_decimal(base) - current;
    if net_after_existing <= Decimal::ZERO {
        return;
    }

    let extra =
        net_after_existing * to_decimal(rule.additional_discount_pct) / Decimal::ONE_HUNDRED;
    let updated = current + extra;

    details.discount_amount = Some(to_f64(updated));
    details.discount_percentage = Some(to_f64(updated * Decimal::ONE_HUNDRED / to_decimal(base)));
    details.additional_discount_amount = Some(to_f64(extra));
    details.additional_discount_applied = true;

    tracing::debug!(
        rule = %rule.name,
        extra = to_f64(extra),
        %doc_date,
        "additional discount applied"
    );
}

/// Inclusive validity window; a missing bound is unbounded on that side.
fn within_window(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    if let Some(from) = from
        && date < from
    {
        return false;
    }
    if let Some(to) = to
        && date > to
    {
        return false;
    }
    true
}
