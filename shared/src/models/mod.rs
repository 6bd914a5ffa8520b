//! Data models
//!
//! Exchanged between the pricing engine and host applications (via JSON).
//! Monetary and percentage fields are `f64` at rest; the engine converts to
//! `rust_decimal::Decimal` for arithmetic.

pub mod item_details;
pub mod pricing_rule;
pub mod transaction;

// Re-exports
pub use item_details::*;
pub use pricing_rule::*;
pub use transaction::*;
