//! Sale Adjustment Grid rules: factor adjustments apply directly to the
//! adjusted value.

use super::common;
use crate::context::PricingRule;
use crate::paths::sale_grid::{adjustment, calculation, final_value};
use crate::paths::CalcField;
use crate::survey::{QualitativeRow, Survey};

pub fn build(surveys: &[Survey], rows: &[QualitativeRow]) -> Vec<PricingRule> {
    let columns = surveys.len();
    let mut rules = Vec::new();

    for (column, survey) in surveys.iter().enumerate() {
        rules.extend(common::price_input_rules(calculation, column, survey));
        rules.push(common::adjusted_value_rule(calculation, column, survey));
        for row in 0..rows.len() {
            rules.push(common::qualitative_percent_rule(adjustment, row, column));
            rules.push(common::adjust_amount_rule(
                adjustment,
                calculation,
                row,
                column,
                CalcField::AdjustedValue,
            ));
        }
        rules.extend(common::factor_total_rules(adjustment, calculation, rows.len(), column));
        rules.push(common::total_adjust_value_rule(calculation, column, CalcField::AdjustedValue));
        rules.push(common::weight_rule(calculation, column, columns));
        rules.push(common::weighted_value_rule(calculation, column));
    }

    if columns > 0 {
        rules.extend(common::final_value_rules(calculation, final_value, columns));
    }
    rules
}
