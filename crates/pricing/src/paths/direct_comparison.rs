//! Direct Comparison table paths.

use appraise_engine::FieldPath;

use super::{AdjustField, CalcField, FinalField};

const CALCULATIONS: &str = "directComparisonCalculations";
const ADJUSTMENT_FACTORS: &str = "directComparisonAdjustmentFactors";
const FINAL_VALUE: &str = "directComparisonFinalValue";

pub fn calculation(column: usize, field: CalcField) -> FieldPath {
    FieldPath::from_segments([CALCULATIONS, column.to_string().as_str(), field.key()])
}

pub fn calculation_column(column: usize) -> FieldPath {
    FieldPath::from_segments([CALCULATIONS, column.to_string().as_str()])
}

pub fn adjustment_factor_code(row: usize) -> FieldPath {
    FieldPath::from_segments([ADJUSTMENT_FACTORS, row.to_string().as_str(), "factorCode"])
}

pub fn adjustment(row: usize, column: usize, field: AdjustField) -> FieldPath {
    FieldPath::from_segments([
        ADJUSTMENT_FACTORS,
        row.to_string().as_str(),
        "surveys",
        column.to_string().as_str(),
        field.key(),
    ])
}

pub fn adjustment_row(row: usize) -> FieldPath {
    FieldPath::from_segments([ADJUSTMENT_FACTORS, row.to_string().as_str()])
}

pub fn final_value(field: FinalField) -> FieldPath {
    FieldPath::from_segments([FINAL_VALUE, field.key()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_indices() {
        assert_eq!(
            calculation(2, CalcField::OfferingPrice).as_str(),
            "directComparisonCalculations.2.offeringPrice"
        );
        assert_eq!(
            adjustment(0, 3, AdjustField::Amount).as_str(),
            "directComparisonAdjustmentFactors.0.surveys.3.adjustAmount"
        );
        assert_eq!(
            final_value(FinalField::FinalValueRounded).as_str(),
            "directComparisonFinalValue.finalValueRounded"
        );
    }
}
