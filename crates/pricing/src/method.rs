//! Valuation methods and the per-method table layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use appraise_engine::{FieldPath, RuleSet};

use crate::context::{PricingContext, PricingRule};
use crate::error::PricingError;
use crate::paths::{comparative, direct_comparison, sale_grid, wqs, FinalField};
use crate::rules;
use crate::survey::{QualitativeRow, Survey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValuationMethod {
    #[serde(rename = "DC")]
    DirectComparison,
    #[serde(rename = "SAG")]
    SaleAdjustmentGrid,
    #[serde(rename = "WQS")]
    WeightedQualityScore,
}

impl ValuationMethod {
    pub const ALL: [ValuationMethod; 3] = [
        ValuationMethod::DirectComparison,
        ValuationMethod::SaleAdjustmentGrid,
        ValuationMethod::WeightedQualityScore,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ValuationMethod::DirectComparison => "DC",
            ValuationMethod::SaleAdjustmentGrid => "SAG",
            ValuationMethod::WeightedQualityScore => "WQS",
        }
    }

    /// Accepts the short code or the kebab-case name, case-insensitively.
    pub fn parse(raw: &str) -> Result<Self, PricingError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dc" | "direct-comparison" => Ok(ValuationMethod::DirectComparison),
            "sag" | "sale-adjustment-grid" => Ok(ValuationMethod::SaleAdjustmentGrid),
            "wqs" | "weighted-quality-score" => Ok(ValuationMethod::WeightedQualityScore),
            _ => Err(PricingError::UnknownMethod(raw.to_string())),
        }
    }

    pub fn build_rules(self, surveys: &[Survey], rows: &[QualitativeRow]) -> Vec<PricingRule> {
        match self {
            ValuationMethod::DirectComparison => rules::direct_comparison::build(surveys, rows),
            ValuationMethod::SaleAdjustmentGrid => rules::sale_grid::build(surveys, rows),
            ValuationMethod::WeightedQualityScore => rules::wqs::build(surveys, rows),
        }
    }

    /// Build and order every rule of the form in one graph.
    pub fn build_rule_set(
        self,
        surveys: &[Survey],
        rows: &[QualitativeRow],
    ) -> Result<RuleSet<PricingContext>, PricingError> {
        let rules = self.build_rules(surveys, rows);
        let set = RuleSet::new(rules)?;
        tracing::debug!(
            target: "appraise.pricing",
            method = self.code(),
            columns = surveys.len(),
            rows = rows.len(),
            rules = set.len(),
            "rule set built"
        );
        Ok(set)
    }

    // ──────────────────────────────────────────────
    // Table layout
    // ──────────────────────────────────────────────

    pub fn final_value(self, field: FinalField) -> FieldPath {
        match self {
            ValuationMethod::DirectComparison => direct_comparison::final_value(field),
            ValuationMethod::SaleAdjustmentGrid => sale_grid::final_value(field),
            ValuationMethod::WeightedQualityScore => wqs::final_value(field),
        }
    }

    pub fn calculation(self, column: usize, field: crate::paths::CalcField) -> FieldPath {
        match self {
            ValuationMethod::DirectComparison => direct_comparison::calculation(column, field),
            ValuationMethod::SaleAdjustmentGrid => sale_grid::calculation(column, field),
            ValuationMethod::WeightedQualityScore => wqs::calculation(column, field),
        }
    }

    /// The factor-code cell of a method row.
    pub fn row_factor_code(self, row: usize) -> FieldPath {
        match self {
            ValuationMethod::DirectComparison => comparative::qualitative_factor_code(row),
            ValuationMethod::SaleAdjustmentGrid => comparative::qualitative_factor_code(row),
            ValuationMethod::WeightedQualityScore => wqs::score_factor_code(row),
        }
    }

    /// Arrays whose elements are indexed by comparator column, given the
    /// current number of rows.
    pub fn column_arrays(self, rows: usize) -> Vec<FieldPath> {
        let mut arrays = vec![FieldPath::from_segments(["comparativeSurveys"])];
        match self {
            ValuationMethod::DirectComparison | ValuationMethod::SaleAdjustmentGrid => {
                arrays.push(self.calculations_array());
                for r in 0..rows {
                    arrays.push(comparative::qualitative_row(r).child("qualitatives"));
                    arrays.push(self.adjustment_row(r).child("surveys"));
                }
            }
            ValuationMethod::WeightedQualityScore => {
                arrays.push(self.calculations_array());
                for r in 0..rows {
                    arrays.push(wqs::score_row(r).child("surveys"));
                }
            }
        }
        arrays
    }

    /// Arrays whose elements are indexed by factor row.
    pub fn row_arrays(self) -> Vec<FieldPath> {
        match self {
            ValuationMethod::DirectComparison => vec![
                FieldPath::from_segments(["qualitatives"]),
                FieldPath::from_segments(["directComparisonAdjustmentFactors"]),
            ],
            ValuationMethod::SaleAdjustmentGrid => vec![
                FieldPath::from_segments(["qualitatives"]),
                FieldPath::from_segments(["saleAdjustmentGridAdjustmentFactors"]),
            ],
            ValuationMethod::WeightedQualityScore => vec![FieldPath::from_segments(["wqsScores"])],
        }
    }

    fn calculations_array(self) -> FieldPath {
        let name = match self {
            ValuationMethod::DirectComparison => "directComparisonCalculations",
            ValuationMethod::SaleAdjustmentGrid => "saleAdjustmentGridCalculations",
            ValuationMethod::WeightedQualityScore => "wqsCalculations",
        };
        FieldPath::from_segments([name])
    }

    /// Adjustment-factor row; the WQS layout has none and maps to its score row.
    pub fn adjustment_row(self, row: usize) -> FieldPath {
        match self {
            ValuationMethod::DirectComparison => direct_comparison::adjustment_row(row),
            ValuationMethod::SaleAdjustmentGrid => sale_grid::adjustment_row(row),
            ValuationMethod::WeightedQualityScore => wqs::score_row(row),
        }
    }
}

impl fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ValuationMethod {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValuationMethod::parse(s)
    }
}
