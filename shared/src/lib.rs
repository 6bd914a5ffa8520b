//! Shared types for the pricing engine
//!
//! Data models exchanged with the host ERP, error types, and numeric
//! parsing utilities. No calculation logic lives here.

pub mod error;
pub mod models;
pub mod numeric;

// Re-exports
pub use error::{NumericError, PricingError};
pub use serde::{Deserialize, Serialize};
