//! Shared context handed to every pricing rule.

use appraise_engine::DerivedFieldRule;

use crate::defaults::PricingDefaults;
use crate::survey::PropertyRecord;

/// Read-only data every rule of a valuation form may consult.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingContext {
    /// The subject property being valued.
    pub property: PropertyRecord,
    pub defaults: PricingDefaults,
}

impl PricingContext {
    pub fn new(property: PropertyRecord, defaults: PricingDefaults) -> Self {
        PricingContext { property, defaults }
    }
}

pub type PricingRule = DerivedFieldRule<PricingContext>;
