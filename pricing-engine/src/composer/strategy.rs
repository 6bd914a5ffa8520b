//! Strategy seam for discount composition
//!
//! Host applications select a composition strategy explicitly at
//! construction time instead of rebinding a shared dispatch table at
//! process start. The standard strategy is [`PriceDiscountComposer`];
//! deployments with different discount chains implement
//! [`DiscountStrategy`] and inject their own.

use shared::PricingError;
use shared::models::{ItemDetails, PricingRule, TransactionArgs};

use super::apply::apply_price_discount_rule;

/// A discount-composition strategy applied during document entry.
pub trait DiscountStrategy: Send + Sync {
    /// Apply a matched rule to a line, mutating `details` in place.
    fn apply(
        &self,
        rule: &PricingRule,
        details: &mut ItemDetails,
        args: &TransactionArgs,
    ) -> Result<(), PricingError>;
}

/// The standard composer: margin, rate-or-discount branch with the
/// component waterfall and GST back-out, then the additional discount layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceDiscountComposer;

impl DiscountStrategy for PriceDiscountComposer {
    fn apply(
        &self,
        rule: &PricingRule,
        details: &mut ItemDetails,
        args: &TransactionArgs,
    ) -> Result<(), PricingError> {
        apply_price_discount_rule(rule, details, args)
    }
}

/// Entry point holding the injected strategy.
pub struct PricingPipeline {
    strategy: Box<dyn DiscountStrategy>,
}

impl std::fmt::Debug for PricingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricingPipeline")
            .field("strategy", &"<DiscountStrategy>")
            .finish()
    }
}

impl PricingPipeline {
    pub fn new(strategy: Box<dyn DiscountStrategy>) -> Self {
        Self { strategy }
    }

    /// Apply a matched rule through the injected strategy.
    pub fn apply(
        &self,
        rule: &PricingRule,
        details: &mut ItemDetails,
        args: &TransactionArgs,
    ) -> Result<(), PricingError> {
        self.strategy.apply(rule, details, args)
    }
}

impl Default for PricingPipeline {
    fn default() -> Self {
        Self::new(Box::new(PriceDiscountComposer))
    }
}
