use appraise_engine::EngineError;

/// Errors from building rules, generating forms or reading form shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("unknown valuation method '{0}' (expected DC, SAG or WQS)")]
    UnknownMethod(String),

    #[error("a valuation form needs at least one comparative survey")]
    NoSurveys,

    #[error("column {column} is out of range ({columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },

    #[error("row {row} is out of range ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    /// A form column names a survey that was not supplied.
    #[error("form column {column} references survey '{survey_id}', which was not supplied")]
    UnknownSurvey { column: usize, survey_id: String },

    /// A form column carries no survey id.
    #[error("form column {column} has no survey id")]
    MissingSurveyId { column: usize },

    #[error(transparent)]
    Engine(#[from] EngineError),
}
