use super::*;

use chrono::NaiveDate;
use serde_json::json;
use shared::PricingError;
use shared::models::{ItemDetails, MarginType, PricingRule, RateOrDiscount, TransactionArgs};

use crate::money::money_eq;

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn make_rule(rate_or_discount: RateOrDiscount) -> PricingRule {
    PricingRule {
        name: "PRLE-0042".to_string(),
        title: None,
        rate_or_discount,
        margin_type: None,
        margin_rate_or_amount: 0.0,
        apply_multiple_pricing_rules: false,
        apply_discount_on_rate: false,
        currency: "INR".to_string(),
        uom: None,
        rate: 0.0,
        discount_amount: 0.0,
        discount_percentage: 0.0,
        trade_mark_pct: 0.0,
        scheme_pct: 0.0,
        freight_pct: 0.0,
        extra_pct: 0.0,
        gst_rate: 0.0,
        additional_discount: false,
        additional_discount_pct: 0.0,
        additional_valid_from: None,
        additional_valid_to: None,
    }
}

fn make_args(price_list_rate: f64) -> TransactionArgs {
    TransactionArgs {
        doctype: "Sales Invoice".to_string(),
        currency: "INR".to_string(),
        uom: Some("Nos".to_string()),
        conversion_factor: 1.0,
        price_list_rate,
        transaction_date: Some(d(2025, 6, 15)),
        posting_date: None,
        customer: Some("CUST-0007".to_string()),
    }
}

/// Waterfall rule from the worked example: 10% base, components 5/3/2/1,
/// GST 18%.
fn waterfall_rule() -> PricingRule {
    let mut rule = make_rule(RateOrDiscount::DiscountPercentage);
    rule.discount_percentage = 10.0;
    rule.trade_mark_pct = 5.0;
    rule.scheme_pct = 3.0;
    rule.freight_pct = 2.0;
    rule.extra_pct = 1.0;
    rule.gst_rate = 18.0;
    rule
}

/// Amount/percentage consistency: percentage = amount / price_list_rate * 100
/// within the money tolerance (compared in percent space).
fn assert_consistent(details: &ItemDetails, price_list_rate: f64) {
    let amount = details.discount_amount.unwrap_or(0.0);
    let pct = details.discount_percentage.unwrap_or(0.0);
    assert!(
        money_eq(pct, amount * 100.0 / price_list_rate),
        "inconsistent: amount {amount}, percentage {pct} at rate {price_list_rate}"
    );
}

// ==================== Waterfall Branch ====================

#[test]
fn test_waterfall_worked_example() {
    init_logging();

    // 1000 at 10% -> 100 off, 900 left; components shrink the remainder to
    // 804.63537; GST back-out adds 122.74; total 318.11 (31.81%)
    let rule = waterfall_rule();
    let mut details = ItemDetails::new(1000.0);
    let args = make_args(1000.0);

    apply_price_discount_rule(&rule, &mut details, &args).unwrap();

    assert_eq!(details.discount_amount, Some(318.11));
    assert_eq!(details.discount_percentage, Some(31.81));
    assert_eq!(details.waterfall_pct, Some(10.6));
    assert_eq!(
        details.applied_rate_or_discount,
        Some(RateOrDiscount::DiscountPercentage)
    );
    assert_consistent(&details, 1000.0);
}

#[test]
fn test_waterfall_without_components_matches_plain_percentage() {
    let mut rule = make_rule(RateOrDiscount::DiscountPercentage);
    rule.discount_percentage = 10.0;

    let mut details = ItemDetails::new(500.0);
    apply_price_discount_rule(&rule, &mut details, &make_args(500.0)).unwrap();

    assert_eq!(details.discount_amount, Some(50.0));
    assert_eq!(details.discount_percentage, Some(10.0));
    assert_eq!(details.waterfall_pct, Some(0.0));
    assert_consistent(&details, 500.0);
}

#[test]
fn test_zero_price_in_context_accumulates_raw_percentage() {
    let mut rule = make_rule(RateOrDiscount::DiscountPercentage);
    rule.discount_percentage = 12.0;

    let mut details = ItemDetails::new(0.0);
    apply_price_discount_rule(&rule, &mut details, &make_args(0.0)).unwrap();

    // No waterfall without a positive price: the raw field value carries over
    assert_eq!(details.discount_percentage, Some(12.0));
    assert_eq!(details.discount_amount, None);
    assert_eq!(details.waterfall_pct, None);
}

// ==================== Flat Amount Branch ====================

#[test]
fn test_flat_amount_accumulates() {
    let mut rule = make_rule(RateOrDiscount::DiscountAmount);
    rule.discount_amount = 25.0;

    let mut details = ItemDetails::new(500.0);
    let args = make_args(500.0);

    apply_price_discount_rule(&rule, &mut details, &args).unwrap();
    assert_eq!(details.discount_amount, Some(25.0));
    // Flat amounts do not recompute the percentage
    assert_eq!(details.discount_percentage, None);

    // A second matched rule accumulates onto the same field
    apply_price_discount_rule(&rule, &mut details, &args).unwrap();
    assert_eq!(details.discount_amount, Some(50.0));
}

// ==================== Rate Branch ====================

#[test]
fn test_rate_override_supersedes_discount() {
    let mut rule = make_rule(RateOrDiscount::Rate);
    rule.rate = 250.0;
    rule.uom = Some("Nos".to_string());

    let mut details = ItemDetails::new(300.0);
    details.discount_percentage = Some(15.0);

    apply_price_discount_rule(&rule, &mut details, &make_args(300.0)).unwrap();

    assert_eq!(details.price_list_rate, 250.0);
    assert_eq!(details.discount_percentage, Some(0.0));
}

#[test]
fn test_rate_override_converts_differing_uom() {
    // Rule priced per box, document line in pieces: 250 * 12
    let mut rule = make_rule(RateOrDiscount::Rate);
    rule.rate = 250.0;
    rule.uom = Some("Box".to_string());

    let mut args = make_args(300.0);
    args.conversion_factor = 12.0;

    let mut details = ItemDetails::new(300.0);
    apply_price_discount_rule(&rule, &mut details, &args).unwrap();

    assert_eq!(details.price_list_rate, 3000.0);
    assert_eq!(details.discount_percentage, Some(0.0));
}

#[test]
fn test_rate_override_currency_mismatch_keeps_price() {
    let mut rule = make_rule(RateOrDiscount::Rate);
    rule.rate = 250.0;
    rule.currency = "USD".to_string();

    let mut details = ItemDetails::new(300.0);
    details.discount_percentage = Some(15.0);

    apply_price_discount_rule(&rule, &mut details, &make_args(300.0)).unwrap();

    // Price untouched, but the discount reset still happens
    assert_eq!(details.price_list_rate, 300.0);
    assert_eq!(details.discount_percentage, Some(0.0));
}

// ==================== Margin Stage ====================

#[test]
fn test_margin_stacks_with_multiple_rules() {
    let mut rule = make_rule(RateOrDiscount::DiscountAmount);
    rule.margin_type = Some(MarginType::Percentage);
    rule.margin_rate_or_amount = 5.0;
    rule.apply_multiple_pricing_rules = true;

    let mut details = ItemDetails::new(100.0);
    let args = make_args(100.0);

    apply_price_discount_rule(&rule, &mut details, &args).unwrap();
    assert_eq!(details.margin_rate_or_amount, Some(5.0));
    assert!(details.has_margin);
    assert_eq!(details.margin_type, Some(MarginType::Percentage));

    apply_price_discount_rule(&rule, &mut details, &args).unwrap();
    assert_eq!(details.margin_rate_or_amount, Some(10.0));
}

#[test]
fn test_margin_overwrites_without_stacking() {
    let mut rule = make_rule(RateOrDiscount::DiscountAmount);
    rule.margin_type = Some(MarginType::Percentage);
    rule.margin_rate_or_amount = 5.0;

    let mut details = ItemDetails::new(100.0);
    details.margin_rate_or_amount = Some(8.0);

    apply_price_discount_rule(&rule, &mut details, &make_args(100.0)).unwrap();
    assert_eq!(details.margin_rate_or_amount, Some(5.0));
}

#[test]
fn test_amount_margin_requires_currency_match() {
    let mut rule = make_rule(RateOrDiscount::DiscountAmount);
    rule.margin_type = Some(MarginType::Amount);
    rule.margin_rate_or_amount = 20.0;
    rule.currency = "USD".to_string();

    let mut details = ItemDetails::new(100.0);
    apply_price_discount_rule(&rule, &mut details, &make_args(100.0)).unwrap();

    assert!(!details.has_margin);
    assert_eq!(details.margin_rate_or_amount, None);

    // Percentage margin applies regardless of currency
    rule.margin_type = Some(MarginType::Percentage);
    apply_price_discount_rule(&rule, &mut details, &make_args(100.0)).unwrap();
    assert!(details.has_margin);
    assert_eq!(details.margin_rate_or_amount, Some(20.0));
}

// ==================== Multi-Rule Stacking ====================

#[test]
fn test_apply_discount_on_rate_compounds_headroom() {
    // Existing 40% leaves 60 points of headroom; a 10% rule consumes a
    // tenth of it: 40 + 60 * 0.10 = 46
    let mut rule = make_rule(RateOrDiscount::DiscountPercentage);
    rule.discount_percentage = 10.0;
    rule.apply_discount_on_rate = true;

    let mut details = ItemDetails::new(1000.0);
    details.discount_percentage = Some(40.0);

    apply_price_discount_rule(&rule, &mut details, &make_args(1000.0)).unwrap();

    assert_eq!(details.discount_percentage, Some(46.0));
    // The stacking branch bypasses the waterfall entirely
    assert_eq!(details.discount_amount, None);
    assert_eq!(details.waterfall_pct, None);
}

// ==================== Additional Discount Stage ====================

fn windowed_rule() -> PricingRule {
    let mut rule = waterfall_rule();
    rule.additional_discount = true;
    rule.additional_discount_pct = 5.0;
    rule.additional_valid_from = Some(d(2025, 6, 1));
    rule.additional_valid_to = Some(d(2025, 6, 30));
    rule
}

#[test]
fn test_additional_discount_on_discounted_net() {
    // After the waterfall: 318.11 off 1000, net 681.89.
    // 5% of the net = 34.0945 -> total 352.20, 35.22%
    let rule = windowed_rule();
    let mut details = ItemDetails::new(1000.0);

    apply_price_discount_rule(&rule, &mut details, &make_args(1000.0)).unwrap();

    assert_eq!(details.discount_amount, Some(352.2));
    assert_eq!(details.discount_percentage, Some(35.22));
    assert_eq!(details.additional_discount_amount, Some(34.09));
    assert!(details.additional_discount_applied);
    assert_consistent(&details, 1000.0);
}

#[test]
fn test_additional_discount_outside_window_is_noop() {
    let rule = windowed_rule();
    let mut details = ItemDetails::new(1000.0);
    let mut args = make_args(1000.0);
    args.transaction_date = Some(d(2025, 7, 1));

    apply_price_discount_rule(&rule, &mut details, &args).unwrap();

    // The waterfall still ran; only the additional layer stayed out
    assert_eq!(details.discount_amount, Some(318.11));
    assert_eq!(details.additional_discount_amount, None);
    assert!(!details.additional_discount_applied);
}

#[test]
fn test_additional_discount_falls_back_to_posting_date() {
    let rule = windowed_rule();
    let mut details = ItemDetails::new(1000.0);
    let mut args = make_args(1000.0);
    args.transaction_date = None;
    args.posting_date = Some(d(2025, 6, 20));

    apply_price_discount_rule(&rule, &mut details, &args).unwrap();
    assert!(details.additional_discount_applied);
}

#[test]
fn test_additional_discount_exhausted_net_is_noop() {
    // Existing discount at or above the base leaves nothing to discount;
    // the stage must neither error nor mutate.
    let mut rule = make_rule(RateOrDiscount::DiscountAmount);
    rule.additional_discount = true;
    rule.additional_discount_pct = 5.0;

    let mut details = ItemDetails::new(100.0);
    details.discount_amount = Some(150.0);

    apply_price_discount_rule(&rule, &mut details, &make_args(100.0)).unwrap();

    assert_eq!(details.discount_amount, Some(150.0));
    assert!(!details.additional_discount_applied);
}

#[test]
fn test_additional_discount_requires_flag_and_percentage() {
    // Enabled flag with zero percentage: no-op
    let mut rule = waterfall_rule();
    rule.additional_discount = true;
    rule.additional_discount_pct = 0.0;

    let mut details = ItemDetails::new(1000.0);
    apply_price_discount_rule(&rule, &mut details, &make_args(1000.0)).unwrap();
    assert!(!details.additional_discount_applied);

    // Percentage without the flag: no-op
    let mut rule = waterfall_rule();
    rule.additional_discount_pct = 5.0;

    let mut details = ItemDetails::new(1000.0);
    apply_price_discount_rule(&rule, &mut details, &make_args(1000.0)).unwrap();
    assert!(!details.additional_discount_applied);
}

#[test]
fn test_additional_discount_unbounded_window() {
    let mut rule = windowed_rule();
    rule.additional_valid_from = None;
    rule.additional_valid_to = None;

    let mut details = ItemDetails::new(1000.0);
    apply_price_discount_rule(&rule, &mut details, &make_args(1000.0)).unwrap();
    assert!(details.additional_discount_applied);
}

// ==================== Validation Boundary ====================

#[test]
fn test_non_finite_rule_is_rejected_before_any_stage() {
    let mut rule = waterfall_rule();
    rule.discount_amount = f64::NAN;

    let mut details = ItemDetails::new(1000.0);
    let err = apply_price_discount_rule(&rule, &mut details, &make_args(1000.0)).unwrap_err();

    assert!(matches!(err, PricingError::InvalidValue("discount_amount", _)));
    // Nothing was touched
    assert_eq!(details.applied_rate_or_discount, None);
    assert_eq!(details.discount_amount, None);
}

// ==================== Record Ingestion ====================

#[test]
fn test_record_ingestion_through_composer() {
    init_logging();

    let record = json!({
        "name": "PRLE-0042",
        "rate_or_discount": "Discount Percentage",
        "currency": "INR",
        "discount_percentage": "10",
        "trade_mark_pct": 5,
        "scheme_pct": 3,
        "freight_pct": 2,
        "extra_pct": 1,
        "gst_rate": "18",
        "additional_discount": 1,
        "additional_discount_pct": 5,
        "additional_valid_from": "2025-06-01",
        "additional_valid_to": "2025-06-30"
    });
    let rule = PricingRule::from_record(&record).unwrap();

    let mut details = ItemDetails::new(1000.0);
    apply_price_discount_rule(&rule, &mut details, &make_args(1000.0)).unwrap();

    assert_eq!(details.discount_amount, Some(352.2));
    assert_eq!(details.discount_percentage, Some(35.22));
    assert!(details.additional_discount_applied);
}

// ==================== Strategy Injection ====================

struct FlatTen;

impl DiscountStrategy for FlatTen {
    fn apply(
        &self,
        _rule: &PricingRule,
        details: &mut ItemDetails,
        _args: &TransactionArgs,
    ) -> Result<(), PricingError> {
        details.discount_amount = Some(10.0);
        Ok(())
    }
}

#[test]
fn test_pipeline_uses_injected_strategy() {
    let pipeline = PricingPipeline::new(Box::new(FlatTen));
    let rule = waterfall_rule();
    let mut details = ItemDetails::new(1000.0);

    pipeline.apply(&rule, &mut details, &make_args(1000.0)).unwrap();

    assert_eq!(details.discount_amount, Some(10.0));
    assert_eq!(details.waterfall_pct, None);
}

#[test]
fn test_default_pipeline_is_standard_composer() {
    let pipeline = PricingPipeline::default();
    let rule = waterfall_rule();
    let mut details = ItemDetails::new(1000.0);

    pipeline.apply(&rule, &mut details, &make_args(1000.0)).unwrap();

    assert_eq!(details.discount_amount, Some(318.11));
    assert_eq!(details.waterfall_pct, Some(10.6));
}
