//! Rule builders, one module per valuation method.
//!
//! Builders are pure: `(surveys, rows) -> Vec<PricingRule>`. The subject
//! property and the defaults reach the rules at evaluation time through
//! [`PricingContext`](crate::context::PricingContext). Rebuild the whole
//! list whenever the survey columns or factor rows change.

pub mod common;
pub mod direct_comparison;
pub mod sale_grid;
pub mod wqs;
