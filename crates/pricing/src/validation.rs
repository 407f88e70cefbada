//! Save-time checks on a valuation form.
//!
//! The engine only fills defaults; acceptance of a form happens here,
//! when the user saves. Checks collect issues rather than stopping at the
//! first one.

use rust_decimal::Decimal;
use serde::Serialize;

use appraise_engine::{FieldPath, FormState};

use crate::method::ValuationMethod;
use crate::paths::{CalcField, FinalField};
use crate::survey::Survey;
use crate::template::Template;

/// One problem found on save.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationIssue {
    pub check: &'static str,
    pub message: String,
    pub path: Option<FieldPath>,
}

impl ValidationIssue {
    fn new(check: &'static str, message: String, path: Option<FieldPath>) -> Self {
        ValidationIssue {
            check,
            message,
            path,
        }
    }
}

/// Allowed distance of the weight total from 1.
pub const WEIGHT_SUM_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

pub fn validate(
    method: ValuationMethod,
    store: &FormState,
    surveys: &[Survey],
    template: Option<&Template>,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if method != ValuationMethod::WeightedQualityScore {
        check_weights(method, store, surveys.len(), &mut issues);
    }

    let final_path = method.final_value(FinalField::FinalValue);
    if store.number(&final_path).is_none() {
        issues.push(ValidationIssue::new(
            "final-value",
            "final value is missing".to_string(),
            Some(final_path),
        ));
    }

    if let Some(template) = template {
        for (survey_id, factor_code) in template.missing_mandatory(surveys) {
            issues.push(ValidationIssue::new(
                "mandatory-factor",
                format!(
                    "survey '{}' has no value for mandatory factor '{}'",
                    survey_id, factor_code
                ),
                None,
            ));
        }
    }
    issues
}

fn check_weights(
    method: ValuationMethod,
    store: &FormState,
    columns: usize,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut sum = Decimal::ZERO;
    for column in 0..columns {
        let path = method.calculation(column, CalcField::Weight);
        match store.number(&path) {
            Some(w) if (Decimal::ZERO..=Decimal::ONE).contains(&w) => sum += w,
            Some(w) => issues.push(ValidationIssue::new(
                "weight-range",
                format!("weight {} of column {} is outside [0, 1]", w, column),
                Some(path),
            )),
            None => issues.push(ValidationIssue::new(
                "weight-range",
                format!("weight of column {} is missing or not a number", column),
                Some(path),
            )),
        }
    }
    if columns > 0 && (sum - Decimal::ONE).abs() > WEIGHT_SUM_TOLERANCE {
        issues.push(ValidationIssue::new(
            "weight-sum",
            format!("weights add up to {}, expected 1", sum.normalize()),
            None,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::sale_grid;
    use crate::survey::factor;
    use serde_json::json;

    fn store(weights: &[Decimal]) -> FormState {
        let mut s = FormState::new();
        for (c, w) in weights.iter().enumerate() {
            s.insert(sale_grid::calculation(c, CalcField::Weight), *w);
        }
        s.insert(sale_grid::final_value(FinalField::FinalValue), 1_000);
        s
    }

    fn checks(issues: &[ValidationIssue]) -> Vec<&'static str> {
        issues.iter().map(|i| i.check).collect()
    }

    #[test]
    fn thirds_pass_within_tolerance() {
        let third = Decimal::new(3_333_333_333, 10);
        let s = store(&[third, third, third]);
        let surveys: Vec<Survey> = (0..3).map(|i| Survey::new(i.to_string())).collect();
        assert!(validate(ValuationMethod::SaleAdjustmentGrid, &s, &surveys, None).is_empty());
    }

    #[test]
    fn weight_sum_tolerance_is_one_hundredth() {
        assert_eq!(WEIGHT_SUM_TOLERANCE, Decimal::new(1, 2));
        let surveys = vec![Survey::new("A"), Survey::new("B")];
        let edge = store(&[Decimal::new(5, 1), Decimal::new(49, 2)]);
        assert!(validate(ValuationMethod::SaleAdjustmentGrid, &edge, &surveys, None).is_empty());
        let short = store(&[Decimal::new(5, 1), Decimal::new(489, 3)]);
        let issues = validate(ValuationMethod::SaleAdjustmentGrid, &short, &surveys, None);
        assert_eq!(checks(&issues), vec!["weight-sum"]);
    }

    #[test]
    fn out_of_range_and_bad_sum_are_reported() {
        let s = store(&[Decimal::new(15, 1), Decimal::new(2, 1)]);
        let surveys = vec![Survey::new("A"), Survey::new("B")];
        let issues = validate(ValuationMethod::SaleAdjustmentGrid, &s, &surveys, None);
        assert_eq!(checks(&issues), vec!["weight-range", "weight-sum"]);
    }

    #[test]
    fn missing_mandatory_factor_and_final_value() {
        let template: Template = serde_json::from_value(json!({
            "templateCode": "T",
            "comparativeFactors": [{ "factorCode": "landArea" }]
        }))
        .unwrap();
        let surveys = vec![
            Survey::new("A").with_factor(factor::LAND_AREA, json!(10)),
            Survey::new("B"),
        ];
        let issues = validate(
            ValuationMethod::WeightedQualityScore,
            &FormState::new(),
            &surveys,
            Some(&template),
        );
        assert_eq!(checks(&issues), vec!["final-value", "mandatory-factor"]);
        assert!(issues[1].message.contains("'B'"));
    }
}
