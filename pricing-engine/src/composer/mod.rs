//! Discount Composer Module
//!
//! Applies a matched pricing rule to a line item's details during document
//! entry. The flow is strictly sequential: margin handling, then the
//! exclusive rate-or-discount branch, then the additional discount layer.
//! No loops, no retries, no backtracking.
//!
//! Stages mutate by accumulation; callers must apply a rule to a given
//! record exactly once per line.

mod additional;
mod apply;
mod strategy;
mod waterfall;

pub use additional::*;
pub use apply::*;
pub use strategy::*;
pub use waterfall::*;

#[cfg(test)]
mod tests;
