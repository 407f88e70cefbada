//! Sale Adjustment Grid table paths.

use appraise_engine::FieldPath;

use super::{AdjustField, CalcField, FinalField};

const CALCULATIONS: &str = "saleAdjustmentGridCalculations";
const ADJUSTMENT_FACTORS: &str = "saleAdjustmentGridAdjustmentFactors";
const FINAL_VALUE: &str = "saleAdjustmentGridFinalValue";

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
            calculation(0, CalcField::Weight).as_str(),
            "saleAdjustmentGridCalculations.0.weight"
        );
        assert_eq!(
            adjustment(4, 1, AdjustField::Percent).as_str(),
            "saleAdjustmentGridAdjustmentFactors.4.surveys.1.adjustPercent"
        );
    }
}
