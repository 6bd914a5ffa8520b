//! Discount-composition engine for ERP item pricing
//!
//! Applies a matched pricing rule to a line item's details during
//! sales/purchase document entry: margin handling, explicit rate overrides,
//! the fixed-order component discount waterfall with GST back-out, and the
//! date-windowed additional discount layer applied last.
//!
//! The engine is fully synchronous and owns no I/O; callers pass the rule,
//! the mutable item-details record, and the transaction context, and read
//! the result back from the record.

pub mod composer;
pub mod money;
pub mod validation;

// Re-exports
pub use composer::{
    DiscountStrategy, PriceDiscountComposer, PricingPipeline, WaterfallBreakdown,
    apply_price_discount_rule, run_waterfall,
};
pub use money::{MONEY_TOLERANCE, money_eq, to_decimal, to_f64};
