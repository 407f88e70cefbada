//! Weighted Quality Score rules.
//!
//! Each comparator gets a total score from the weighted factor scores; a
//! least-squares line of adjusted value over total score is then read at
//! the subject's own total score.

use rust_decimal::Decimal;

use appraise_engine::{FieldPath, FieldValue, Precision};

use super::common;
use crate::calc::{calc_linear_fit, calc_weighted_score, round2, LinearFit};
use crate::context::PricingRule;
use crate::paths::wqs::{
    calculation, collateral_score, final_value, score_weight, survey_score,
};
use crate::paths::{CalcField, FinalField};
use crate::survey::{QualitativeRow, Survey};

pub fn build(surveys: &[Survey], rows: &[QualitativeRow]) -> Vec<PricingRule> {
    let columns = surveys.len();
    let mut rules: Vec<PricingRule> = rows
        .iter()
        .enumerate()
        .map(|(row, r)| {
            PricingRule::constant(score_weight(row), r.weight.unwrap_or(Decimal::ONE))
                .auto_default()
                .precision(Precision::Exact)
        })
        .collect();

    for (column, survey) in surveys.iter().enumerate() {
        rules.extend(common::price_input_rules(calculation, column, survey));
        rules.push(common::adjusted_value_rule(calculation, column, survey));
        rules.push(total_score_rule(
            calculation(column, CalcField::TotalScore),
            rows.len(),
            move |row| survey_score(row, column),
        ));
    }
    rules.push(total_score_rule(
        final_value(FinalField::CollateralTotalScore),
        rows.len(),
        collateral_score,
    ));

    if columns > 0 {
        rules.extend(fit_rules(columns));
        rules.push(common::rounded_final_value_rule(final_value));
    }
    rules
}

/// `Σ_r weight_r × score(r)` over every score row.
fn total_score_rule<F>(target: FieldPath, rows: usize, score: F) -> PricingRule
where
    F: Fn(usize) -> FieldPath,
{
    let pairs: Vec<(FieldPath, FieldPath)> =
        (0..rows).map(|r| (score_weight(r), score(r))).collect();
    let deps = pairs
        .iter()
        .flat_map(|(w, s)| [w.clone(), s.clone()])
        .collect();
    PricingRule::new(target, deps, move |ctx| {
        let v = calc_weighted_score(
            pairs
                .iter()
                .map(|(w, s)| (ctx.number_or_zero(w), ctx.number_or_zero(s))),
        )?;
        Ok(FieldValue::Number(v))
    })
    .auto_default()
}

fn fit_rules(columns: usize) -> Vec<PricingRule> {
    let points: Vec<(FieldPath, FieldPath)> = (0..columns)
        .map(|c| {
            (
                calculation(c, CalcField::TotalScore),
                calculation(c, CalcField::AdjustedValue),
            )
        })
        .collect();
    let deps: Vec<FieldPath> = points
        .iter()
        .flat_map(|(x, y)| [x.clone(), y.clone()])
        .collect();

    let fit_field = |field: FinalField| {
        let points = points.clone();
        PricingRule::new(final_value(field), deps.clone(), move |ctx| {
            let xy: Vec<(Decimal, Decimal)> = points
                .iter()
                .map(|(x, y)| (ctx.number_or_zero(x), ctx.number_or_zero(y)))
                .collect();
            let fit = calc_linear_fit(&xy)?;
            let v = match field {
                FinalField::Slope => fit.slope,
                _ => fit.intercept,
            };
            Ok(FieldValue::Number(v))
        })
        .auto_default()
        .precision(Precision::Scale(common::RATIO_SCALE))
    };

    let slope = final_value(FinalField::Slope);
    let intercept = final_value(FinalField::Intercept);
    let collateral = final_value(FinalField::CollateralTotalScore);
    let deps = vec![slope.clone(), intercept.clone(), collateral.clone()];
    let estimate = PricingRule::new(final_value(FinalField::FinalValue), deps, move |ctx| {
        let line = LinearFit {
            slope: ctx.number_or_zero(&slope),
            intercept: ctx.number_or_zero(&intercept),
        };
        Ok(FieldValue::Number(round2(line.at(ctx.number_or_zero(&collateral))?)))
    })
    .auto_default();

    vec![
        fit_field(FinalField::Slope),
        fit_field(FinalField::Intercept),
        estimate,
    ]
}
