//! Rule helpers shared by the method builders.
//!
//! Helpers take the method's registry functions as plain function pointers
//! so each builder keeps its own table layout.

use rust_decimal::Decimal;

use appraise_engine::{Activation, FieldPath, FieldValue, Precision};

use crate::calc::{
    calc_adjust_amount, calc_adjusted_value, calc_adjusted_value_from_selling_price,
    calc_equal_weight, calc_final_value_rounded_value, calc_sum, calc_total_adjust_value,
    calc_weighted_adjust_value, round2,
};
use crate::context::PricingRule;
use crate::paths::comparative;
use crate::paths::{AdjustField, CalcField, FinalField};
use crate::survey::{factor, PriceBasis, QualitativeLevel, Survey};

pub type CalcPath = fn(usize, CalcField) -> FieldPath;
pub type AdjustPath = fn(usize, usize, AdjustField) -> FieldPath;
pub type FinalPath = fn(FinalField) -> FieldPath;

/// Scale kept for ratios (weights, regression coefficients).
pub const RATIO_SCALE: u32 = 10;

fn number(v: Decimal) -> FieldValue {
    FieldValue::Number(v)
}

// ──────────────────────────────────────────────
// Per-comparator price inputs
// ──────────────────────────────────────────────

/// Defaults for the editable price inputs of one comparator column.
///
/// Only the inputs of the survey's price basis are defaulted; a survey
/// with neither price gets no input rules.
pub fn price_input_rules(calc: CalcPath, column: usize, survey: &Survey) -> Vec<PricingRule> {
    let mut rules = Vec::new();
    match survey.price_basis() {
        PriceBasis::Offering => {
            if let Some(price) = survey.factor_number(factor::OFFERING_PRICE) {
                rules.push(
                    PricingRule::constant(calc(column, CalcField::OfferingPrice), price)
                        .auto_default(),
                );
            }
            rules.push(
                PricingRule::new(
                    calc(column, CalcField::OfferingPriceAdjustmentPct),
                    Vec::new(),
                    |ctx| Ok(number(ctx.shared().defaults.offering_adjustment_pct)),
                )
                .auto_default(),
            );
            rules.push(
                PricingRule::constant(
                    calc(column, CalcField::OfferingPriceAdjustmentAmt),
                    Decimal::ZERO,
                )
                .auto_default(),
            );
        }
        PriceBasis::Selling => {
            if let Some(price) = survey.factor_number(factor::SELLING_PRICE) {
                rules.push(
                    PricingRule::constant(calc(column, CalcField::SellingPrice), price)
                        .auto_default(),
                );
            }
            let years = survey
                .factor_number(factor::NUMBER_OF_YEARS)
                .unwrap_or(Decimal::ZERO);
            rules.push(
                PricingRule::constant(calc(column, CalcField::NumberOfYears), years)
                    .auto_default(),
            );
            rules.push(
                PricingRule::new(
                    calc(column, CalcField::SellingPriceAdjustmentYear),
                    Vec::new(),
                    |ctx| Ok(number(ctx.shared().defaults.selling_adjustment_year_pct)),
                )
                .auto_default(),
            );
        }
        PriceBasis::None => {}
    }
    rules
}

/// Adjusted value: offering price first, selling price as fallback, else 0.
///
/// The basis is fixed when the rules are built from the survey data.
pub fn adjusted_value_rule(calc: CalcPath, column: usize, survey: &Survey) -> PricingRule {
    let target = calc(column, CalcField::AdjustedValue);
    let rule = match survey.price_basis() {
        PriceBasis::Offering => {
            let price = calc(column, CalcField::OfferingPrice);
            let pct = calc(column, CalcField::OfferingPriceAdjustmentPct);
            let amt = calc(column, CalcField::OfferingPriceAdjustmentAmt);
            let deps = vec![price.clone(), pct.clone(), amt.clone()];
            PricingRule::new(target, deps, move |ctx| {
                let v = calc_adjusted_value(
                    ctx.number_or_zero(&price),
                    ctx.number_or_zero(&pct),
                    ctx.number_or_zero(&amt),
                )?;
                Ok(number(v))
            })
        }
        PriceBasis::Selling => {
            let price = calc(column, CalcField::SellingPrice);
            let years = calc(column, CalcField::NumberOfYears);
            let annual = calc(column, CalcField::SellingPriceAdjustmentYear);
            let deps = vec![price.clone(), years.clone(), annual.clone()];
            PricingRule::new(target, deps, move |ctx| {
                let v = calc_adjusted_value_from_selling_price(
                    ctx.number_or_zero(&price),
                    ctx.number_or_zero(&years),
                    ctx.number_or_zero(&annual),
                )?;
                Ok(number(v))
            })
        }
        PriceBasis::None => PricingRule::constant(target, Decimal::ZERO),
    };
    rule.auto_default()
}

// ──────────────────────────────────────────────
// Adjustment-factor table
// ──────────────────────────────────────────────

/// Percent implied by the qualitative rating of `(row, column)`.
///
/// Inferior comparators adjust upward, better ones downward; Equal, a
/// missing rating and an unknown code all give 0.
pub fn qualitative_percent_rule(adjust: AdjustPath, row: usize, column: usize) -> PricingRule {
    let level = comparative::qualitative_level(row, column);
    PricingRule::new(
        adjust(row, column, AdjustField::Percent),
        vec![level.clone()],
        move |ctx| {
            let magnitude = ctx.shared().defaults.qualitative_magnitude;
            let pct = match ctx.text(&level).and_then(QualitativeLevel::parse) {
                Some(QualitativeLevel::Inferior) => magnitude,
                Some(QualitativeLevel::Better) => -magnitude,
                Some(QualitativeLevel::Equal) | None => Decimal::ZERO,
            };
            Ok(number(pct))
        },
    )
    .auto_default()
}

/// `base * adjustPercent / 100` for one factor row and comparator.
pub fn adjust_amount_rule(
    adjust: AdjustPath,
    calc: CalcPath,
    row: usize,
    column: usize,
    base: CalcField,
) -> PricingRule {
    let pct = adjust(row, column, AdjustField::Percent);
    let base = calc(column, base);
    PricingRule::new(
        adjust(row, column, AdjustField::Amount),
        vec![pct.clone(), base.clone()],
        move |ctx| {
            let v = calc_adjust_amount(ctx.number_or_zero(&base), ctx.number_or_zero(&pct))?;
            Ok(number(v))
        },
    )
    .auto_default()
}

/// Column totals of the adjustment percents and amounts.
pub fn factor_total_rules(
    adjust: AdjustPath,
    calc: CalcPath,
    rows: usize,
    column: usize,
) -> Vec<PricingRule> {
    [
        (AdjustField::Percent, CalcField::TotalFactorDiffPercent),
        (AdjustField::Amount, CalcField::TotalFactorDiffAmount),
    ]
    .into_iter()
    .map(|(cell, total)| {
        let cells: Vec<FieldPath> = (0..rows).map(|r| adjust(r, column, cell)).collect();
        let reads = cells.clone();
        PricingRule::new(calc(column, total), cells, move |ctx| {
            Ok(number(calc_sum(reads.iter().map(|p| ctx.number_or_zero(p)))?))
        })
        .auto_default()
    })
    .collect()
}

/// `base + totalFactorDiffAmount`.
pub fn total_adjust_value_rule(calc: CalcPath, column: usize, base: CalcField) -> PricingRule {
    let base = calc(column, base);
    let amount = calc(column, CalcField::TotalFactorDiffAmount);
    PricingRule::new(
        calc(column, CalcField::TotalAdjustValue),
        vec![base.clone(), amount.clone()],
        move |ctx| {
            let v = calc_total_adjust_value(ctx.number_or_zero(&base), ctx.number_or_zero(&amount))?;
            Ok(number(v))
        },
    )
    .auto_default()
}

// ──────────────────────────────────────────────
// Weighting and final value
// ──────────────────────────────────────────────

/// Equal weight `1 / columns`, kept to [`RATIO_SCALE`] places.
///
/// Also replaces a user entry outside `[0, 1]` or that is not a number.
pub fn weight_rule(calc: CalcPath, column: usize, columns: usize) -> PricingRule {
    PricingRule::new(calc(column, CalcField::Weight), Vec::new(), move |_| {
        Ok(number(calc_equal_weight(columns)?))
    })
    .when(Activation::AutoDefaultWithin(Decimal::ZERO..=Decimal::ONE))
    .precision(Precision::Scale(RATIO_SCALE))
}

pub fn weighted_value_rule(calc: CalcPath, column: usize) -> PricingRule {
    let total = calc(column, CalcField::TotalAdjustValue);
    let weight = calc(column, CalcField::Weight);
    PricingRule::new(
        calc(column, CalcField::WeightedAdjustValue),
        vec![total.clone(), weight.clone()],
        move |ctx| {
            let v =
                calc_weighted_adjust_value(ctx.number_or_zero(&total), ctx.number_or_zero(&weight))?;
            Ok(number(v))
        },
    )
    .auto_default()
}

/// `finalValue = round2(Σ weightedAdjustValue)` and the rounded final value.
pub fn final_value_rules(calc: CalcPath, fin: FinalPath, columns: usize) -> Vec<PricingRule> {
    let weighted: Vec<FieldPath> = (0..columns)
        .map(|c| calc(c, CalcField::WeightedAdjustValue))
        .collect();
    let reads = weighted.clone();
    let final_value = PricingRule::new(fin(FinalField::FinalValue), weighted, move |ctx| {
        let sum = calc_sum(reads.iter().map(|p| ctx.number_or_zero(p)))?;
        Ok(number(round2(sum)))
    })
    .auto_default();

    vec![final_value, rounded_final_value_rule(fin)]
}

/// Tracks `finalValue`, rounded to the configured step, until overridden.
pub fn rounded_final_value_rule(fin: FinalPath) -> PricingRule {
    let source = fin(FinalField::FinalValue);
    PricingRule::new(
        fin(FinalField::FinalValueRounded),
        vec![source.clone()],
        move |ctx| {
            let step = ctx.shared().defaults.final_value_step;
            let v = calc_final_value_rounded_value(ctx.number_or_zero(&source), step)?;
            Ok(number(v))
        },
    )
    .auto_default()
}
