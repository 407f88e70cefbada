//! A valuation form: one method's table, its surveys and factor rows, and
//! the session that keeps it consistent.
//!
//! Every change to the survey columns or factor rows rebuilds the whole
//! rule set; nothing edits a rule list in place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use appraise_engine::{Engine, FieldPath, FieldValue, FormSession, FormState, PassReport};

use crate::context::PricingContext;
use crate::error::PricingError;
use crate::method::ValuationMethod;
use crate::paths::{comparative, wqs, FinalField};
use crate::survey::{QualitativeLevel, QualitativeRow, Survey};
use crate::template::Template;
use crate::validation::{self, ValidationIssue};

/// Serialized form: the nested value tree plus the user-owned paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDocument {
    pub method: ValuationMethod,
    pub values: serde_json::Value,
    #[serde(default)]
    pub overridden: Vec<FieldPath>,
}

impl FormDocument {
    pub fn from_store(method: ValuationMethod, store: &FormState) -> Self {
        FormDocument {
            method,
            values: store.to_json(),
            overridden: store.overridden_paths().cloned().collect(),
        }
    }

    /// Rebuild the store; listed paths become user-owned at their stored value.
    pub fn to_store(&self) -> Result<FormState, PricingError> {
        let mut store = FormState::from_json(&self.values)?;
        for path in &self.overridden {
            let value = store.get(path).cloned().unwrap_or_default();
            store.edit(path, value);
        }
        Ok(store)
    }
}

pub struct ValuationForm {
    method: ValuationMethod,
    surveys: Vec<Survey>,
    rows: Vec<QualitativeRow>,
    session: FormSession<PricingContext>,
}

impl ValuationForm {
    /// The "Generate" action: lay out the table from the template's
    /// calculation factors, clear every override and run a full pass.
    pub fn generate(
        method: ValuationMethod,
        template: &Template,
        surveys: Vec<Survey>,
        context: PricingContext,
        engine: Engine,
    ) -> Result<(Self, PassReport), PricingError> {
        if surveys.is_empty() {
            return Err(PricingError::NoSurveys);
        }
        let rows = template.calculation_rows();
        let mut store = FormState::new();
        for (i, code) in template.comparative_codes().into_iter().enumerate() {
            store.insert(comparative::comparative_factor_code(i), code);
        }
        for (column, survey) in surveys.iter().enumerate() {
            write_column_header(method, &mut store, column, survey, rows.len());
        }
        for (row, r) in rows.iter().enumerate() {
            write_row_header(method, &mut store, row, r, surveys.len());
        }

        let rules = method.build_rule_set(&surveys, &rows)?;
        let mut session = FormSession::new(engine, rules, store, context);
        let report = session.generate()?;
        tracing::info!(
            target: "appraise.pricing",
            method = method.code(),
            template = %template.template_code,
            columns = surveys.len(),
            rows = rows.len(),
            writes = report.writes.len(),
            "valuation form generated"
        );
        Ok((
            ValuationForm {
                method,
                surveys,
                rows,
                session,
            },
            report,
        ))
    }

    /// Reopen a saved form. Columns follow the survey ids stored in the
    /// form; `surveys` may list them in any order.
    pub fn open(
        document: &FormDocument,
        surveys: &[Survey],
        context: PricingContext,
        engine: Engine,
    ) -> Result<Self, PricingError> {
        let method = document.method;
        let store = document.to_store()?;
        let surveys = surveys_in_form_order(&store, surveys)?;
        let rows = rows_from_form(method, &store);
        let rules = method.build_rule_set(&surveys, &rows)?;
        Ok(ValuationForm {
            method,
            surveys,
            rows,
            session: FormSession::new(engine, rules, store, context),
        })
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.session = self.session.with_max_passes(max_passes);
        self
    }

    pub fn method(&self) -> ValuationMethod {
        self.method
    }

    pub fn surveys(&self) -> &[Survey] {
        &self.surveys
    }

    pub fn rows(&self) -> &[QualitativeRow] {
        &self.rows
    }

    pub fn store(&self) -> &FormState {
        self.session.store()
    }

    pub fn session(&self) -> &FormSession<PricingContext> {
        &self.session
    }

    pub fn document(&self) -> FormDocument {
        FormDocument::from_store(self.method, self.session.store())
    }

    pub fn final_value(&self) -> Option<Decimal> {
        self.store()
            .number(&self.method.final_value(FinalField::FinalValue))
    }

    pub fn final_value_rounded(&self) -> Option<Decimal> {
        self.store()
            .number(&self.method.final_value(FinalField::FinalValueRounded))
    }

    /// Save-time checks; see [`crate::validation`].
    pub fn validate(&self, template: Option<&Template>) -> Vec<ValidationIssue> {
        validation::validate(self.method, self.store(), &self.surveys, template)
    }

    // ──────────────────────────────────────────────
    // Value transitions
    // ──────────────────────────────────────────────

    pub fn recompute(&mut self) -> Result<PassReport, PricingError> {
        Ok(self.session.recompute()?)
    }

    pub fn settle(&mut self) -> Result<PassReport, PricingError> {
        Ok(self.session.settle()?)
    }

    pub fn edit(
        &mut self,
        path: &FieldPath,
        value: impl Into<FieldValue>,
    ) -> Result<PassReport, PricingError> {
        Ok(self.session.edit(path, value)?)
    }

    pub fn reset_field(&mut self, path: &FieldPath) -> Result<PassReport, PricingError> {
        Ok(self.session.reset_field(path)?)
    }

    /// Re-run "Generate" on the current shape: every override is cleared.
    pub fn regenerate(&mut self) -> Result<PassReport, PricingError> {
        Ok(self.session.generate()?)
    }

    // ──────────────────────────────────────────────
    // Shape transitions
    // ──────────────────────────────────────────────

    pub fn add_survey(&mut self, survey: Survey) -> Result<PassReport, PricingError> {
        let column = self.surveys.len();
        let (method, rows) = (self.method, self.rows.len());
        let mut surveys = self.surveys.clone();
        surveys.push(survey.clone());
        let rules = method.build_rule_set(&surveys, &self.rows)?;
        let report = self.session.reshape(
            |store| write_column_header(method, store, column, &survey, rows),
            rules,
        )?;
        self.surveys = surveys;
        Ok(report)
    }

    pub fn remove_survey(&mut self, column: usize) -> Result<PassReport, PricingError> {
        let columns = self.surveys.len();
        if column >= columns {
            return Err(PricingError::ColumnOutOfRange { column, columns });
        }
        if columns == 1 {
            return Err(PricingError::NoSurveys);
        }
        let mut surveys = self.surveys.clone();
        surveys.remove(column);
        let rules = self.method.build_rule_set(&surveys, &self.rows)?;
        let arrays = self.method.column_arrays(self.rows.len());
        let report = self.session.reshape(
            |store| {
                for array in &arrays {
                    store.remove_element(array, column);
                }
            },
            rules,
        )?;
        self.surveys = surveys;
        Ok(report)
    }

    pub fn add_row(&mut self, row: QualitativeRow) -> Result<PassReport, PricingError> {
        let index = self.rows.len();
        let (method, columns) = (self.method, self.surveys.len());
        let mut rows = self.rows.clone();
        rows.push(row.clone());
        let rules = method.build_rule_set(&self.surveys, &rows)?;
        let report = self.session.reshape(
            |store| write_row_header(method, store, index, &row, columns),
            rules,
        )?;
        self.rows = rows;
        Ok(report)
    }

    pub fn remove_row(&mut self, row: usize) -> Result<PassReport, PricingError> {
        let count = self.rows.len();
        if row >= count {
            return Err(PricingError::RowOutOfRange { row, rows: count });
        }
        let mut rows = self.rows.clone();
        rows.remove(row);
        let rules = self.method.build_rule_set(&self.surveys, &rows)?;
        let arrays = self.method.row_arrays();
        let report = self.session.reshape(
            |store| {
                for array in &arrays {
                    store.remove_element(array, row);
                }
            },
            rules,
        )?;
        self.rows = rows;
        Ok(report)
    }
}

fn write_column_header(
    method: ValuationMethod,
    store: &mut FormState,
    column: usize,
    survey: &Survey,
    rows: usize,
) {
    store.insert(comparative::survey_id(column), survey.id.clone());
    if method != ValuationMethod::WeightedQualityScore {
        for row in 0..rows {
            store.insert(
                comparative::qualitative_level(row, column),
                QualitativeLevel::Equal.code(),
            );
        }
    }
}

fn write_row_header(
    method: ValuationMethod,
    store: &mut FormState,
    row: usize,
    r: &QualitativeRow,
    columns: usize,
) {
    match method {
        ValuationMethod::WeightedQualityScore => {
            store.insert(wqs::score_factor_code(row), r.factor_code.clone());
            if let Some(weight) = r.weight {
                store.insert(wqs::default_weight(row), weight);
            }
        }
        _ => {
            store.insert(comparative::qualitative_factor_code(row), r.factor_code.clone());
            store.insert(
                method.adjustment_row(row).child("factorCode"),
                r.factor_code.clone(),
            );
            for column in 0..columns {
                store.insert(
                    comparative::qualitative_level(row, column),
                    QualitativeLevel::Equal.code(),
                );
            }
        }
    }
}

fn text_of(store: &FormState, path: &FieldPath) -> Option<String> {
    match store.get(path)? {
        FieldValue::Null => None,
        FieldValue::Text(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Factor rows as laid out in a saved form.
pub fn rows_from_form(method: ValuationMethod, store: &FormState) -> Vec<QualitativeRow> {
    let mut rows = Vec::new();
    while let Some(code) = text_of(store, &method.row_factor_code(rows.len())) {
        let mut row = QualitativeRow::new(code);
        if method == ValuationMethod::WeightedQualityScore {
            row.weight = store.number(&wqs::default_weight(rows.len()));
        }
        rows.push(row);
    }
    rows
}

/// Order `supplied` by the survey ids of the form's columns.
pub fn surveys_in_form_order(
    store: &FormState,
    supplied: &[Survey],
) -> Result<Vec<Survey>, PricingError> {
    let mut ordered = Vec::new();
    let mut column = 0;
    while store
        .iter()
        .any(|(p, _)| p.starts_with(&comparative::survey_column(column)))
    {
        let survey_id = text_of(store, &comparative::survey_id(column))
            .ok_or(PricingError::MissingSurveyId { column })?;
        let survey = supplied
            .iter()
            .find(|s| s.id == survey_id)
            .ok_or_else(|| PricingError::UnknownSurvey {
                column,
                survey_id: survey_id.clone(),
            })?;
        ordered.push(survey.clone());
        column += 1;
    }
    if ordered.is_empty() {
        return Err(PricingError::NoSurveys);
    }
    Ok(ordered)
}
