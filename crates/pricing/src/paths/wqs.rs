//! Weighted Quality Score table paths.

use appraise_engine::FieldPath;

use super::{CalcField, FinalField};

const SCORES: &str = "wqsScores";
const CALCULATIONS: &str = "wqsCalculations";
const FINAL_VALUE: &str = "wqsFinalValue";

pub fn score_factor_code(row: usize) -> FieldPath {
    FieldPath::from_segments([SCORES, row.to_string().as_str(), "factorCode"])
}

pub fn score_weight(row: usize) -> FieldPath {
    FieldPath::from_segments([SCORES, row.to_string().as_str(), "weight"])
}

/// Template weight the row was generated with; `weight` resets to it.
pub fn default_weight(row: usize) -> FieldPath {
    FieldPath::from_segments([SCORES, row.to_string().as_str(), "defaultWeight"])
}

/// The subject property's score on one factor row.
pub fn collateral_score(row: usize) -> FieldPath {
    FieldPath::from_segments([SCORES, row.to_string().as_str(), "collateral"])
}

pub fn survey_score(row: usize, column: usize) -> FieldPath {
    FieldPath::from_segments([
        SCORES,
        row.to_string().as_str(),
        "surveys",
        column.to_string().as_str(),
        "surveyScore",
    ])
}

pub fn score_row(row: usize) -> FieldPath {
    FieldPath::from_segments([SCORES, row.to_string().as_str()])
}

pub fn calculation(column: usize, field: CalcField) -> FieldPath {
    FieldPath::from_segments([CALCULATIONS, column.to_string().as_str(), field.key()])
}

pub fn calculation_column(column: usize) -> FieldPath {
    FieldPath::from_segments([CALCULATIONS, column.to_string().as_str()])
}

pub fn final_value(field: FinalField) -> FieldPath {
    FieldPath::from_segments([FINAL_VALUE, field.key()])
}
