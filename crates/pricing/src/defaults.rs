//! Hardcoded fallbacks the rule builders use when data is absent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default inputs substituted when a field is still system-owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingDefaults {
    /// Offering-price adjustment percent.
    #[serde(deserialize_with = "crate::lenient::decimal")]
    pub offering_adjustment_pct: Decimal,
    /// Annual adjustment percent applied to a selling price per year of age.
    #[serde(deserialize_with = "crate::lenient::decimal")]
    pub selling_adjustment_year_pct: Decimal,
    /// Magnitude of the percent implied by an Inferior/Better rating.
    #[serde(deserialize_with = "crate::lenient::decimal")]
    pub qualitative_magnitude: Decimal,
    /// Granularity of the rounded final value.
    #[serde(deserialize_with = "crate::lenient::decimal")]
    pub final_value_step: Decimal,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        PricingDefaults {
            offering_adjustment_pct: Decimal::from(5),
            selling_adjustment_year_pct: Decimal::from(3),
            qualitative_magnitude: Decimal::from(5),
            final_value_step: Decimal::ONE,
        }
    }
}
