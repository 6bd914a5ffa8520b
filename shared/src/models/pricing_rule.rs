//! Pricing Rule Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PricingError;
use crate::numeric::decimal_from_value;

/// What a matched rule applies to the line item: an explicit rate override
/// or one of the two discount modes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateOrDiscount {
    Rate,
    DiscountAmount,
    DiscountPercentage,
}

/// Margin type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarginType {
    Amount,
    Percentage,
}

/// Waterfall discount components.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountComponent {
    TradeMark,
    Scheme,
    Freight,
    ExtraDiscount,
}

/// Fixed application order of the waterfall components.
///
/// The order is a business rule, not an implementation detail: each component
/// discounts the remainder left by the previous one, so reordering changes
/// the result.
pub const COMPONENT_ORDER: [DiscountComponent; 4] = [
    DiscountComponent::TradeMark,
    DiscountComponent::Scheme,
    DiscountComponent::Freight,
    DiscountComponent::ExtraDiscount,
];

/// Pricing rule entity, as matched upstream for a line item.
///
/// Matching and selection happen in the host ERP; this record carries only
/// what the discount composer consumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingRule {
    /// Rule document name (the ERP's primary key)
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub rate_or_discount: RateOrDiscount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_type: Option<MarginType>,
    #[serde(default)]
    pub margin_rate_or_amount: f64,
    #[serde(default)]
    pub apply_multiple_pricing_rules: bool,
    #[serde(default)]
    pub apply_discount_on_rate: bool,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
    /// Explicit rate, used when `rate_or_discount` is `Rate`
    #[serde(default)]
    pub rate: f64,
    /// Flat discount, used when `rate_or_discount` is `DiscountAmount`
    #[serde(default)]
    pub discount_amount: f64,
    /// Base discount percentage, used when `rate_or_discount` is
    /// `DiscountPercentage`
    #[serde(default)]
    pub discount_percentage: f64,
    /// Waterfall component percentages (see [`COMPONENT_ORDER`])
    #[serde(default)]
    pub trade_mark_pct: f64,
    #[serde(default)]
    pub scheme_pct: f64,
    #[serde(default)]
    pub freight_pct: f64,
    #[serde(default)]
    pub extra_pct: f64,
    /// GST rate assumed included in the price-list rate
    #[serde(default)]
    pub gst_rate: f64,
    /// Whether the date-windowed additional discount layer is enabled
    #[serde(default)]
    pub additional_discount: bool,
    #[serde(default)]
    pub additional_discount_pct: f64,
    /// Validity window for the additional discount (inclusive; a missing
    /// bound is unbounded on that side)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_valid_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_valid_to: Option<NaiveDate>,
}

impl PricingRule {
    /// Percentage configured for one waterfall component.
    pub fn component_pct(&self, component: DiscountComponent) -> f64 {
        match component {
            DiscountComponent::TradeMark => self.trade_mark_pct,
            DiscountComponent::Scheme => self.scheme_pct,
            DiscountComponent::Freight => self.freight_pct,
            DiscountComponent::ExtraDiscount => self.extra_pct,
        }
    }

    /// Build a rule from a raw ERP export record.
    ///
    /// Export records are loosely typed: numbers arrive as JSON numbers or
    /// strings (possibly digit-grouped), check fields as 0/1, dates as
    /// "YYYY-MM-DD" strings. Numeric fields degrade to zero (with a warning
    /// in the log). Malformed dates are a hard error: a bad date could
    /// silently widen a discount window, so it stops the transaction instead.
    pub fn from_record(record: &Value) -> Result<Self, PricingError> {
        let name = record
            .get("name")
            .and_then(Value::as_str)
            .ok_or(PricingError::MissingField("name"))?
            .to_string();

        let rate_or_discount = match record.get("rate_or_discount") {
            Some(Value::String(s)) => parse_rate_or_discount(s)?,
            _ => return Err(PricingError::MissingField("rate_or_discount")),
        };

        Ok(Self {
            name,
            title: record
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string),
            rate_or_discount,
            margin_type: parse_margin_type(record.get("margin_type"))?,
            margin_rate_or_amount: num(record, "margin_rate_or_amount"),
            apply_multiple_pricing_rules: flag(record, "apply_multiple_pricing_rules"),
            apply_discount_on_rate: flag(record, "apply_discount_on_rate"),
            currency: record
                .get("currency")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            uom: record
                .get("uom")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            rate: num(record, "rate"),
            discount_amount: num(record, "discount_amount"),
            discount_percentage: num(record, "discount_percentage"),
            trade_mark_pct: num(record, "trade_mark_pct"),
            scheme_pct: num(record, "scheme_pct"),
            freight_pct: num(record, "freight_pct"),
            extra_pct: num(record, "extra_pct"),
            gst_rate: num(record, "gst_rate"),
            additional_discount: flag(record, "additional_discount"),
            additional_discount_pct: num(record, "additional_discount_pct"),
            additional_valid_from: date(record, "additional_valid_from")?,
            additional_valid_to: date(record, "additional_valid_to")?,
        })
    }
}

/// Numeric field with deliberate zero-fallback.
fn num(record: &Value, key: &str) -> f64 {
    record
        .get(key)
        .map(decimal_from_value)
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// Check field: booleans, or 0/1 numbers as ERP exports write them.
fn flag(record: &Value, key: &str) -> bool {
    match record.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(v) => decimal_from_value(v) != Decimal::ZERO,
        None => false,
    }
}

/// Date field: "YYYY-MM-DD" or absent. Malformed input is a hard error.
fn date(record: &Value, key: &'static str) -> Result<Option<NaiveDate>, PricingError> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| PricingError::MalformedDate(key, s.clone())),
        Some(other) => Err(PricingError::MalformedDate(key, other.to_string())),
    }
}

fn parse_rate_or_discount(raw: &str) -> Result<RateOrDiscount, PricingError> {
    match normalize_variant(raw).as_str() {
        "RATE" => Ok(RateOrDiscount::Rate),
        "DISCOUNT_AMOUNT" => Ok(RateOrDiscount::DiscountAmount),
        "DISCOUNT_PERCENTAGE" => Ok(RateOrDiscount::DiscountPercentage),
        _ => Err(PricingError::UnknownVariant(
            "rate_or_discount",
            raw.to_string(),
        )),
    }
}

fn parse_margin_type(value: Option<&Value>) -> Result<Option<MarginType>, PricingError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => match normalize_variant(s).as_str() {
            "AMOUNT" => Ok(Some(MarginType::Amount)),
            "PERCENTAGE" => Ok(Some(MarginType::Percentage)),
            _ => Err(PricingError::UnknownVariant("margin_type", s.clone())),
        },
        Some(other) => Err(PricingError::UnknownVariant(
            "margin_type",
            other.to_string(),
        )),
    }
}

/// Export records spell variants as titles ("Discount Percentage"); the JSON
/// wire format uses SCREAMING_SNAKE_CASE. Accept both.
fn normalize_variant(raw: &str) -> String {
    raw.trim().to_uppercase().replace(' ', "_")
}
