//! Component discount waterfall
//!
//! The base discount comes off the price-list rate first; the four component
//! discounts then apply sequentially, each against the amount left by the
//! previous one (see [`COMPONENT_ORDER`]). A GST back-out then removes the
//! tax-inclusive portion from the discount base.

use rust_decimal::prelude::*;
use shared::models::{COMPONENT_ORDER, DiscountComponent, PricingRule};

use crate::money::{DECIMAL_PLACES, to_decimal, to_f64};

/// Breakdown of one waterfall run, intermediate values included.
///
/// Stored values are rounded to 2 decimal places; the internal chain runs
/// unrounded.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallBreakdown {
    /// Discount taken off the price-list rate by the rule's base percentage
    pub base_discount: f64,
    /// Per-component discounts, in application order
    pub component_discounts: [(DiscountComponent, f64); 4],
    /// Remainder after the base discount (the waterfall's starting amount)
    pub remainder_before: f64,
    /// Remainder after all four components
    pub remainder_after: f64,
    /// Tax-inclusive portion removed from the discount base
    pub gst_backout: f64,
    /// Total discount: base + components + GST back-out
    pub total_discount: f64,
    /// Diagnostic: share of `remainder_before` consumed by the components,
    /// in percent, rounded to 2 decimal places. Nothing downstream branches
    /// on this value.
    pub consumed_pct: f64,
}

/// Run the fixed-order discount waterfall over a price-list rate.
///
/// The GST back-out assumes the price-list rate is tax-inclusive:
/// `gst_price - gst_price / (1 + rate/100)` is the tax share of what is left
/// after the discounts, and it is added to the discount total so the
/// discount applies to the tax-exclusive base.
pub fn run_waterfall(price_list_rate: f64, rule: &PricingRule) -> WaterfallBreakdown {
    let hundred = Decimal::ONE_HUNDRED;
    let price = to_decimal(price_list_rate);

    // Base discount from the price-list rate
    let base_discount = price * to_decimal(rule.discount_percentage) / hundred;
    let remainder_before = price - base_discount;

    // Components in fixed order, each against the shrinking remainder
    let mut remaining = remainder_before;
    let mut total = base_discount;
    let mut component_discounts = [(DiscountComponent::TradeMark, 0.0); 4];
    for (slot, component) in component_discounts.iter_mut().zip(COMPONENT_ORDER) {
        let discount = remaining * to_decimal(rule.component_pct(component)) / hundred;
        remaining -= discount;
        total += discount;
        *slot = (component, to_f64(discount));
    }
    let remainder_after = remaining;

    // GST back-out on what the discounts leave of the price
    let gst_price = price - total;
    let gst_backout = gst_price - gst_price / (Decimal::ONE + to_decimal(rule.gst_rate) / hundred);
    total += gst_backout;

    let consumed_pct = if remainder_before.is_zero() {
        Decimal::ZERO
    } else {
        ((remainder_before - remainder_after) * hundred / remainder_before)
            .round_dp(DECIMAL_PLACES)
    };

    WaterfallBreakdown {
        base_discount: to_f64(base_discount),
        component_discounts,
        remainder_before: to_f64(remainder_before),
        remainder_after: to_f64(remainder_after),
        gst_backout: to_f64(gst_backout),
        total_discount: to_f64(total),
        consumed_pct: consumed_pct.to_f64().unwrap_or_default(),
    }
}
