//! Error types for pricing composition

use thiserror::Error;

/// Failure of the explicit numeric parse step.
///
/// `Empty` marks an absent value (callers usually treat it as zero without
/// logging); `Malformed` marks actual garbage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumericError {
    #[error("empty numeric input")]
    Empty,

    #[error("malformed numeric input: {0:?}")]
    Malformed(String),
}

/// Errors surfaced by record ingestion and boundary validation.
///
/// The composition stages themselves are infallible once inputs pass
/// validation; everything here is reported before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown {0} variant: {1:?}")]
    UnknownVariant(&'static str, String),

    #[error("malformed date in {0}: {1:?}")]
    MalformedDate(&'static str, String),
}

impl PricingError {
    /// Create an `InvalidValue` error with a formatted message.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue(field, message.into())
    }
}
