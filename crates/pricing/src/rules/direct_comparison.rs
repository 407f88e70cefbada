//! Direct Comparison rules.
//!
//! Like the sale grid, plus a second revision per comparator: land and
//! building area differences against the subject are priced and added to
//! the adjusted value before the factor adjustments apply.

use rust_decimal::Decimal;

use appraise_engine::FieldValue;

use super::common;
use crate::calc::{calc_diff, calc_increase_decrease, calc_total_second_revision};
use crate::context::PricingRule;
use crate::paths::direct_comparison::{adjustment, calculation, final_value};
use crate::paths::CalcField;
use crate::survey::{factor, QualitativeRow, Survey};

/// Every rule of a Direct Comparison form with `surveys` as columns and
/// `rows` as adjustment-factor rows.
pub fn build(surveys: &[Survey], rows: &[QualitativeRow]) -> Vec<PricingRule> {
    let columns = surveys.len();
    let mut rules = Vec::new();

    for (column, survey) in surveys.iter().enumerate() {
        rules.extend(common::price_input_rules(calculation, column, survey));
        rules.push(common::adjusted_value_rule(calculation, column, survey));
        rules.extend(second_revision_rules(column, survey));

        for row in 0..rows.len() {
            rules.push(common::qualitative_percent_rule(adjustment, row, column));
            rules.push(common::adjust_amount_rule(
                adjustment,
                calculation,
                row,
                column,
                CalcField::TotalSecondRevision,
            ));
        }
        rules.extend(common::factor_total_rules(adjustment, calculation, rows.len(), column));
        rules.push(common::total_adjust_value_rule(
            calculation,
            column,
            CalcField::TotalSecondRevision,
        ));
        rules.push(common::weight_rule(calculation, column, columns));
        rules.push(common::weighted_value_rule(calculation, column));
    }

    if columns > 0 {
        rules.extend(common::final_value_rules(calculation, final_value, columns));
    }
    rules
}

/// Area difference between the subject and the survey: `subject − survey`,
/// 0 when either side lacks the factor.
fn area_deficient_rule(column: usize, field: CalcField, code: &'static str, survey: &Survey) -> PricingRule {
    let comparator = survey.factor_number(code);
    PricingRule::new(calculation(column, field), Vec::new(), move |ctx| {
        let subject = ctx.shared().property.factor_number(code);
        let diff = match (subject, comparator) {
            (Some(s), Some(c)) => calc_diff(s, c)?,
            _ => Decimal::ZERO,
        };
        Ok(FieldValue::Number(diff))
    })
    .auto_default()
}

fn increment_rule(column: usize, target: CalcField, area: CalcField, price: CalcField) -> PricingRule {
    let area = calculation(column, area);
    let price = calculation(column, price);
    PricingRule::new(
        calculation(column, target),
        vec![area.clone(), price.clone()],
        move |ctx| {
            let v = calc_increase_decrease(ctx.number_or_zero(&area), ctx.number_or_zero(&price))?;
            Ok(FieldValue::Number(v))
        },
    )
    .auto_default()
}

fn second_revision_rules(column: usize, survey: &Survey) -> Vec<PricingRule> {
    let adjusted = calculation(column, CalcField::AdjustedValue);
    let land = calculation(column, CalcField::LandDifferenceValue);
    let building = calculation(column, CalcField::BuildingDifferenceValue);
    let deps = vec![adjusted.clone(), land.clone(), building.clone()];

    vec![
        area_deficient_rule(column, CalcField::LandAreaDeficient, factor::LAND_AREA, survey),
        area_deficient_rule(column, CalcField::UsableAreaDeficient, factor::USABLE_AREA, survey),
        increment_rule(
            column,
            CalcField::LandDifferenceValue,
            CalcField::LandAreaDeficient,
            CalcField::LandPrice,
        ),
        increment_rule(
            column,
            CalcField::BuildingDifferenceValue,
            CalcField::UsableAreaDeficient,
            CalcField::BuildingPrice,
        ),
        PricingRule::new(calculation(column, CalcField::TotalSecondRevision), deps, move |ctx| {
            let v = calc_total_second_revision(
                ctx.number_or_zero(&adjusted),
                ctx.number_or_zero(&land),
                ctx.number_or_zero(&building),
            )?;
            Ok(FieldValue::Number(v))
        })
        .auto_default(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PricingContext;
    use crate::paths::{comparative, FinalField};
    use crate::survey::PropertyRecord;
    use appraise_engine::{Engine, FormState, RuleSet};
    use serde_json::json;

    fn context() -> PricingContext {
        let property: PropertyRecord = serde_json::from_value(json!({
            "id": "P-1",
            "factorData": [
                { "factorCode": "landArea", "value": 120 },
                { "factorCode": "usableArea", "value": "95" }
            ]
        }))
        .unwrap();
        PricingContext::new(property, Default::default())
    }

    #[test]
    fn second_revision_feeds_adjustments() {
        let survey = Survey::new("S-1")
            .with_factor(factor::OFFERING_PRICE, json!(1_000_000))
            .with_factor(factor::LAND_AREA, json!(100))
            .with_factor(factor::USABLE_AREA, json!(100));
        let rows = vec![QualitativeRow::new("location")];
        let set = RuleSet::new(build(&[survey], &rows)).unwrap();

        let mut store = FormState::new();
        store.insert(comparative::qualitative_level(0, 0), "I");
        store.insert(calculation(0, CalcField::LandPrice), 1_000);
        store.insert(calculation(0, CalcField::BuildingPrice), 2_000);
        Engine::default().recompute(&set, &mut store, &context()).unwrap();

        let calc = |f| store.number(&calculation(0, f)).unwrap();
        assert_eq!(calc(CalcField::AdjustedValue), Decimal::from(1_050_000));
        assert_eq!(calc(CalcField::LandAreaDeficient), Decimal::from(20));
        assert_eq!(calc(CalcField::LandDifferenceValue), Decimal::from(20_000));
        assert_eq!(calc(CalcField::UsableAreaDeficient), Decimal::from(-5));
        assert_eq!(calc(CalcField::BuildingDifferenceValue), Decimal::from(-10_000));
        assert_eq!(calc(CalcField::TotalSecondRevision), Decimal::from(1_060_000));
        // Inferior: +5% of the second revision.
        assert_eq!(calc(CalcField::TotalFactorDiffAmount), Decimal::from(53_000));
        assert_eq!(calc(CalcField::TotalAdjustValue), Decimal::from(1_113_000));
        assert_eq!(calc(CalcField::Weight), Decimal::ONE);
        assert_eq!(
            store.number(&final_value(FinalField::FinalValue)),
            Some(Decimal::from(1_113_000))
        );
    }

    #[test]
    fn no_surveys_builds_no_final_rules() {
        assert!(build(&[], &[]).is_empty());
    }
}
