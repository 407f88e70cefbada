//! Paths shared by every method's header: the comparator columns and the
//! qualitative rating table.

use appraise_engine::FieldPath;

pub fn survey_id(column: usize) -> FieldPath {
    FieldPath::from_segments(["comparativeSurveys", column.to_string().as_str(), "surveyId"])
}

pub fn survey_column(column: usize) -> FieldPath {
    FieldPath::from_segments(["comparativeSurveys", column.to_string().as_str()])
}

pub fn comparative_factor_code(row: usize) -> FieldPath {
    FieldPath::from_segments(["comparativeFactors", row.to_string().as_str(), "factorCode"])
}

pub fn qualitative_factor_code(row: usize) -> FieldPath {
    FieldPath::from_segments(["qualitatives", row.to_string().as_str(), "factorCode"])
}

pub fn qualitative_level(row: usize, column: usize) -> FieldPath {
    FieldPath::from_segments([
        "qualitatives",
        row.to_string().as_str(),
        "qualitatives",
        column.to_string().as_str(),
        "qualitativeLevel",
    ])
}

pub fn qualitative_row(row: usize) -> FieldPath {
    FieldPath::from_segments(["qualitatives", row.to_string().as_str()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_header_paths() {
        assert_eq!(survey_id(2).as_str(), "comparativeSurveys.2.surveyId");
        assert_eq!(
            qualitative_level(1, 0).as_str(),
            "qualitatives.1.qualitatives.0.qualitativeLevel"
        );
    }
}
