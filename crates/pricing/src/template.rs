//! Pricing templates: which factors a collateral type must carry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::survey::{QualitativeRow, Survey};

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFactor {
    pub factor_code: String,
    #[serde(default)]
    pub display_seq: Option<u32>,
    #[serde(default = "yes")]
    pub mandatory: bool,
    /// Default score weight for WQS rows.
    #[serde(default, deserialize_with = "crate::lenient::option_decimal")]
    pub weight: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub template_code: String,
    #[serde(default)]
    pub collateral_type: Option<String>,
    #[serde(default)]
    pub comparative_factors: Vec<TemplateFactor>,
    #[serde(default)]
    pub calculation_factors: Vec<TemplateFactor>,
}

fn in_display_order(factors: &[TemplateFactor]) -> Vec<&TemplateFactor> {
    let mut sorted: Vec<&TemplateFactor> = factors.iter().collect();
    // Stable: factors without a sequence keep their listed order at the end.
    sorted.sort_by_key(|f| f.display_seq.unwrap_or(u32::MAX));
    sorted
}

impl Template {
    pub fn comparative_codes(&self) -> Vec<String> {
        in_display_order(&self.comparative_factors)
            .into_iter()
            .map(|f| f.factor_code.clone())
            .collect()
    }

    /// Calculation factors as table rows, in display order.
    pub fn calculation_rows(&self) -> Vec<QualitativeRow> {
        in_display_order(&self.calculation_factors)
            .into_iter()
            .map(|f| QualitativeRow {
                factor_code: f.factor_code.clone(),
                weight: f.weight,
            })
            .collect()
    }

    /// `(survey id, factor code)` pairs where a mandatory comparative
    /// factor has no value.
    pub fn missing_mandatory(&self, surveys: &[Survey]) -> Vec<(String, String)> {
        let mut missing = Vec::new();
        for survey in surveys {
            for f in self.comparative_factors.iter().filter(|f| f.mandatory) {
                if !survey.has_factor(&f.factor_code) {
                    missing.push((survey.id.clone(), f.factor_code.clone()));
                }
            }
        }
        missing
    }
}
