//! Item details record - mutated in place by the discount composer
//!
//! Created upstream per document line (the item-detail resolution chain
//! fills `price_list_rate` before composition), passed through the composer
//! exactly once, then persisted by the caller into the transaction line.

use serde::{Deserialize, Serialize};

use super::pricing_rule::{MarginType, RateOrDiscount};

/// Per-line pricing state.
///
/// Accumulator fields are `Option` to mirror the source records: a stage that
/// accumulates creates the field at zero first, and downstream consumers can
/// tell "never touched" from "computed as zero".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemDetails {
    /// Price-list rate for the line; may be overridden by a Rate rule
    #[serde(default)]
    pub price_list_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default)]
    pub has_margin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_type: Option<MarginType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_rate_or_amount: Option<f64>,
    /// Diagnostic: share of the post-base remainder consumed by the
    /// component waterfall, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waterfall_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_discount_amount: Option<f64>,
    #[serde(default)]
    pub additional_discount_applied: bool,
    /// Which rule mode was applied to this line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_rate_or_discount: Option<RateOrDiscount>,
}

impl ItemDetails {
    /// Fresh record for a line whose price-list rate is already resolved.
    pub fn new(price_list_rate: f64) -> Self {
        Self {
            price_list_rate,
            ..Default::default()
        }
    }
}
