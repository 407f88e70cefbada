//! End-to-end valuation scenarios over the JSON fixtures in `fixtures/`.
//!
//! Each test generates a form the way the "Generate" button does, then
//! drives it through user edits and checks the cascade.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use appraise_engine::{Engine, FormState, RuleSet};
use appraise_pricing::paths::{comparative, sale_grid, wqs, AdjustField, CalcField, FinalField};
use appraise_pricing::{
    PricingContext, PricingDefaults, PropertyRecord, Survey, Template, ValuationForm,
    ValuationMethod,
};

fn fixture<T: DeserializeOwned>(name: &str) -> T {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("Invalid JSON in {}: {}", name, e))
}

fn context() -> PricingContext {
    PricingContext::new(fixture::<PropertyRecord>("property.json"), PricingDefaults::default())
}

fn generate_with(method: ValuationMethod, surveys: &str, ctx: PricingContext) -> ValuationForm {
    let template: Template = fixture("template.json");
    let surveys: Vec<Survey> = fixture(surveys);
    ValuationForm::generate(method, &template, surveys, ctx, Engine::default())
        .unwrap_or_else(|e| panic!("generate failed: {}", e))
        .0
}

fn generate(method: ValuationMethod) -> ValuationForm {
    generate_with(method, "surveys.json", context())
}

fn d(v: i64) -> Decimal {
    Decimal::from(v)
}

fn sag(form: &ValuationForm, column: usize, field: CalcField) -> Decimal {
    form.store()
        .number(&sale_grid::calculation(column, field))
        .unwrap_or_else(|| panic!("no {:?} in column {}", field, column))
}

// ──────────────────────────────────────────────
// Worked example
// ──────────────────────────────────────────────

#[test]
fn three_offering_prices_average_to_final_value() {
    let form = generate(ValuationMethod::SaleAdjustmentGrid);
    assert_eq!(sag(&form, 0, CalcField::AdjustedValue), d(1_050_000));
    assert_eq!(sag(&form, 1, CalcField::AdjustedValue), d(1_260_000));
    // Offering price wins over the selling price the survey also carries.
    assert_eq!(sag(&form, 2, CalcField::AdjustedValue), d(945_000));
    assert_eq!(form.final_value(), Some(d(1_085_000)));
    assert_eq!(form.final_value_rounded(), Some(d(1_085_000)));
}

#[test]
fn direct_comparison_prices_area_differences() {
    let mut form = generate(ValuationMethod::DirectComparison);
    let calc = |f: &ValuationForm, c, field| {
        f.store()
            .number(&ValuationMethod::DirectComparison.calculation(c, field))
            .unwrap()
    };
    // Subject land area 105 against 100 / 110 / 95.
    assert_eq!(calc(&form, 0, CalcField::LandAreaDeficient), d(5));
    assert_eq!(calc(&form, 1, CalcField::LandAreaDeficient), d(-5));
    assert_eq!(calc(&form, 2, CalcField::UsableAreaDeficient), d(10));
    // No unit prices yet: the second revision equals the adjusted value.
    assert_eq!(form.final_value(), Some(d(1_085_000)));

    let land_price = ValuationMethod::DirectComparison.calculation(0, CalcField::LandPrice);
    form.edit(&land_price, 3_000).unwrap();
    assert_eq!(calc(&form, 0, CalcField::LandDifferenceValue), d(15_000));
    assert_eq!(calc(&form, 0, CalcField::TotalSecondRevision), d(1_065_000));
    assert_eq!(calc(&form, 0, CalcField::TotalAdjustValue), d(1_065_000));
    // 1,065,000 / 3 = 355,000
    assert_eq!(form.final_value(), Some(d(1_090_000)));
}

// ──────────────────────────────────────────────
// Adjusted value sources
// ──────────────────────────────────────────────

#[test]
fn selling_price_only_survey_ignores_offering_path() {
    let mut form = generate_with(
        ValuationMethod::SaleAdjustmentGrid,
        "selling_surveys.json",
        context(),
    );
    assert_eq!(sag(&form, 0, CalcField::AdjustedValue), d(848_000));
    assert_eq!(sag(&form, 1, CalcField::AdjustedValue), d(0));
    assert_eq!(form.final_value(), Some(d(424_000)));

    let stray = sale_grid::calculation(0, CalcField::OfferingPrice);
    let report = form.edit(&stray, 5_000_000).unwrap();
    assert!(report.is_noop());
    assert_eq!(sag(&form, 0, CalcField::AdjustedValue), d(848_000));

    let years = sale_grid::calculation(0, CalcField::NumberOfYears);
    form.edit(&years, 5).unwrap();
    // 800,000 × (1 + 3 × 5 / 100)
    assert_eq!(sag(&form, 0, CalcField::AdjustedValue), d(920_000));
}

// ──────────────────────────────────────────────
// Engine properties
// ──────────────────────────────────────────────

#[test]
fn second_pass_is_a_no_op_for_every_method() {
    for method in ValuationMethod::ALL {
        let mut form = generate(method);
        let report = form.recompute().unwrap();
        assert!(report.is_noop(), "{} wrote {:?}", method, report.written_paths());
    }
}

#[test]
fn declaration_order_does_not_change_the_result() {
    let surveys: Vec<Survey> = fixture("surveys.json");
    let template: Template = fixture("template.json");
    let rows = template.calculation_rows();
    let method = ValuationMethod::DirectComparison;

    let forward = RuleSet::new(method.build_rules(&surveys, &rows)).unwrap();
    let mut reversed_rules = method.build_rules(&surveys, &rows);
    reversed_rules.reverse();
    let reversed = RuleSet::new(reversed_rules).unwrap();

    let ctx = context();
    let mut a = FormState::new();
    let mut b = FormState::new();
    Engine::default().recompute(&forward, &mut a, &ctx).unwrap();
    Engine::default().recompute(&reversed, &mut b, &ctx).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.number(&method.final_value(FinalField::FinalValue)),
        Some(d(1_085_000))
    );
}

#[test]
fn overridden_field_survives_upstream_changes() {
    let mut form = generate(ValuationMethod::SaleAdjustmentGrid);
    let adjusted = sale_grid::calculation(0, CalcField::AdjustedValue);
    form.edit(&adjusted, 1_000_000).unwrap();

    let price = sale_grid::calculation(0, CalcField::OfferingPrice);
    form.edit(&price, 2_000_000).unwrap();
    form.recompute().unwrap();
    form.settle().unwrap();

    assert_eq!(sag(&form, 0, CalcField::AdjustedValue), d(1_000_000));
    assert!(form.store().is_overridden(&adjusted));
    // 333,333.33 + 420,000 + 315,000
    assert_eq!(form.final_value(), Some(Decimal::new(106_833_333, 2)));

    form.reset_field(&adjusted).unwrap();
    assert_eq!(sag(&form, 0, CalcField::AdjustedValue), d(2_100_000));
}

#[test]
fn regenerate_clears_every_override() {
    let mut form = generate(ValuationMethod::SaleAdjustmentGrid);
    form.edit(&sale_grid::calculation(1, CalcField::AdjustedValue), 1).unwrap();
    form.edit(&sale_grid::final_value(FinalField::FinalValueRounded), 1).unwrap();
    form.regenerate().unwrap();
    assert_eq!(form.store().overridden_paths().count(), 0);
    assert_eq!(form.final_value_rounded(), Some(d(1_085_000)));
}

#[test]
fn out_of_range_weight_is_replaced_valid_one_kept() {
    let mut form = generate(ValuationMethod::SaleAdjustmentGrid);
    let w1 = sale_grid::calculation(1, CalcField::Weight);
    form.edit(&w1, Decimal::new(15, 1)).unwrap();
    assert_eq!(form.store().number(&w1), Some(Decimal::new(3_333_333_333, 10)));
    assert!(form.store().is_overridden(&w1));
    assert_eq!(form.final_value(), Some(d(1_085_000)));

    form.edit(&w1, Decimal::new(5, 1)).unwrap();
    assert_eq!(form.store().number(&w1), Some(Decimal::new(5, 1)));
    // 350,000 + 630,000 + 315,000
    assert_eq!(form.final_value(), Some(d(1_295_000)));

    let issues = form.validate(None);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].check, "weight-sum");

    for column in 0..3 {
        let w = form
            .store()
            .number(&sale_grid::calculation(column, CalcField::Weight))
            .unwrap();
        assert!((Decimal::ZERO..=Decimal::ONE).contains(&w));
    }
}

// ──────────────────────────────────────────────
// Qualitative defaults and final value
// ──────────────────────────────────────────────

#[test]
fn qualitative_ratings_drive_signed_percent_defaults() {
    let mut form = generate(ValuationMethod::SaleAdjustmentGrid);
    form.edit(&comparative::qualitative_level(0, 0), "B").unwrap();
    form.edit(&comparative::qualitative_level(0, 1), "I").unwrap();

    let cell = |f: &ValuationForm, c, field| {
        f.store()
            .number(&sale_grid::adjustment(0, c, field))
            .unwrap()
    };
    assert_eq!(cell(&form, 0, AdjustField::Percent), d(-5));
    assert_eq!(cell(&form, 0, AdjustField::Amount), d(-52_500));
    assert_eq!(cell(&form, 1, AdjustField::Percent), d(5));
    assert_eq!(cell(&form, 1, AdjustField::Amount), d(63_000));
    assert_eq!(cell(&form, 2, AdjustField::Percent), Decimal::ZERO);
    assert_eq!(sag(&form, 0, CalcField::TotalAdjustValue), d(997_500));

    // A typed percent sticks even when the rating changes back.
    let pct = sale_grid::adjustment(0, 1, AdjustField::Percent);
    form.edit(&pct, 2).unwrap();
    form.edit(&comparative::qualitative_level(0, 1), "E").unwrap();
    assert_eq!(cell(&form, 1, AdjustField::Percent), d(2));
    assert_eq!(cell(&form, 1, AdjustField::Amount), d(25_200));
}

#[test]
fn rounded_final_value_tracks_until_overridden() {
    let mut ctx = context();
    ctx.defaults.final_value_step = d(1_000);
    let mut form = generate_with(ValuationMethod::SaleAdjustmentGrid, "surveys.json", ctx);

    let pct = sale_grid::calculation(0, CalcField::OfferingPriceAdjustmentPct);
    form.edit(&pct, Decimal::new(55, 1)).unwrap();
    assert_eq!(form.final_value(), Some(Decimal::new(108_666_667, 2)));
    assert_eq!(form.final_value_rounded(), Some(d(1_087_000)));

    let rounded = sale_grid::final_value(FinalField::FinalValueRounded);
    form.edit(&rounded, 1_080_000).unwrap();
    form.edit(&pct, 0).unwrap();
    assert_eq!(form.final_value_rounded(), Some(d(1_080_000)));
}

// ──────────────────────────────────────────────
// Weighted Quality Score
// ──────────────────────────────────────────────

#[test]
fn wqs_uses_template_weights() {
    let mut form = generate(ValuationMethod::WeightedQualityScore);
    assert_eq!(form.store().number(&wqs::score_weight(0)), Some(Decimal::new(6, 1)));
    assert_eq!(form.store().number(&wqs::score_weight(1)), Some(Decimal::new(4, 1)));

    // Scores (location, shape) per survey: total 0.6 × l + 0.4 × s.
    let scores = [(2, 2), (4, 4), (1, 1)];
    for (column, (l, s)) in scores.into_iter().enumerate() {
        form.edit(&wqs::survey_score(0, column), l).unwrap();
        form.edit(&wqs::survey_score(1, column), s).unwrap();
    }
    form.edit(&wqs::collateral_score(0), 3).unwrap();
    form.edit(&wqs::collateral_score(1), 3).unwrap();

    let total = |c| {
        form.store()
            .number(&wqs::calculation(c, CalcField::TotalScore))
            .unwrap()
    };
    assert_eq!(total(0), d(2));
    assert_eq!(total(1), d(4));
    assert_eq!(total(2), d(1));
    assert_eq!(
        form.store().number(&wqs::final_value(FinalField::CollateralTotalScore)),
        Some(d(3))
    );
    // Points (1, 945,000), (2, 1,050,000), (4, 1,260,000) lie on
    // y = 840,000 + 105,000 x.
    assert_eq!(
        form.store().number(&wqs::final_value(FinalField::Slope)),
        Some(d(105_000))
    );
    assert_eq!(form.final_value(), Some(d(1_155_000)));

    let reopened = ValuationForm::open(
        &form.document(),
        &fixture::<Vec<Survey>>("surveys.json"),
        context(),
        Engine::default(),
    )
    .unwrap();
    assert_eq!(reopened.rows()[0].weight, Some(Decimal::new(6, 1)));
}
