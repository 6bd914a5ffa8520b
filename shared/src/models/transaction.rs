//! Transaction context passed by the document-entry caller

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Read-only context of the sales/purchase document being entered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionArgs {
    /// Document type entering the line ("Sales Invoice", "Purchase Order", ...)
    pub doctype: String,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
    /// Stock-to-transaction unit conversion factor
    #[serde(default = "default_conversion_factor")]
    pub conversion_factor: f64,
    /// Price-list rate as resolved upstream for this line
    #[serde(default)]
    pub price_list_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posting_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

fn default_conversion_factor() -> f64 {
    1.0
}

impl TransactionArgs {
    /// Effective document date: transaction date, else posting date, else
    /// today's local calendar date.
    pub fn effective_date(&self) -> NaiveDate {
        self.transaction_date
            .or(self.posting_date)
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Default for TransactionArgs {
    fn default() -> Self {
        Self {
            doctype: String::new(),
            currency: String::new(),
            uom: None,
            conversion_factor: 1.0,
            price_list_rate: 0.0,
            transaction_date: None,
            posting_date: None,
            customer: None,
        }
    }
}
